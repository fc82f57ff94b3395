//! Automaton analyzer
//!
//! Read-only checks over a finished transition table: completeness against
//! the state registry and state classification by graph position.

use super::{StateId, StateSet, Symbol, TransitionGraph, TransitionTable};
use crate::error::{Error, Result};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Position of a state in the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateClass {
    /// Outgoing edges only
    Start,
    /// Both incoming and outgoing edges
    Inner,
    /// Incoming edges only; reached states that can only reduce or accept
    Terminal,
    /// No edges at all
    Isolated,
}

impl StateClass {
    pub fn name(&self) -> &'static str {
        match self {
            StateClass::Start => "Start",
            StateClass::Inner => "Inner",
            StateClass::Terminal => "Terminal",
            StateClass::Isolated => "Isolated",
        }
    }
}

/// Classify every state of `states` by its edges in `graph`
pub fn classify<S: Symbol>(
    graph: &TransitionGraph<S>,
    states: &StateSet,
) -> HashMap<StateId, StateClass> {
    states
        .ids()
        .map(|id| {
            let class = match graph.state_index.get(&id) {
                None => StateClass::Isolated,
                Some(&idx) => {
                    let has_incoming = graph
                        .graph
                        .edges_directed(idx, Direction::Incoming)
                        .next()
                        .is_some();
                    let has_outgoing = graph
                        .graph
                        .edges_directed(idx, Direction::Outgoing)
                        .next()
                        .is_some();
                    match (has_incoming, has_outgoing) {
                        (false, true) => StateClass::Start,
                        (true, true) => StateClass::Inner,
                        (true, false) => StateClass::Terminal,
                        (false, false) => StateClass::Isolated,
                    }
                }
            };
            (id, class)
        })
        .collect()
}

/// Outcome of a completeness check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Transition endpoints unknown to the state registry
    pub foreign_states: Vec<StateId>,
    /// Registered states the start state cannot reach
    pub unreachable_states: Vec<StateId>,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.foreign_states.is_empty() && self.unreachable_states.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(Error::Incomplete {
                foreign: self.foreign_states,
                unreachable: self.unreachable_states,
            })
        }
    }
}

/// Check that `table` only references states of `states` and that every
/// registered state is reachable from `start`.
///
/// Determinism needs no check here: the table refuses conflicting inserts.
pub fn validate<S: Symbol>(
    table: &TransitionTable<S>,
    states: &StateSet,
    start: StateId,
) -> ValidationReport {
    let mut foreign = BTreeSet::new();
    if !states.contains(start) {
        foreign.insert(start);
    }
    for transition in table {
        for state in [transition.origin(), transition.destination()] {
            if !states.contains(state) {
                foreign.insert(state);
            }
        }
    }

    let graph = TransitionGraph::from_table(table);
    let reached: HashSet<StateId> = graph.reachable_from(start).into_iter().collect();
    let unreachable_states: Vec<StateId> =
        states.ids().filter(|id| !reached.contains(id)).collect();

    let report = ValidationReport {
        foreign_states: foreign.into_iter().collect(),
        unreachable_states,
    };

    if report.is_complete() {
        tracing::debug!("Automaton with {} states is complete", states.len());
    } else {
        tracing::warn!(
            "Automaton incomplete: foreign {:?}, unreachable {:?}",
            report.foreign_states,
            report.unreachable_states
        );
    }
    report
}
