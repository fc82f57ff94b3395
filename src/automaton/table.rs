//! Goto table: the transition set of one automaton

use crate::automaton::{AutomatonId, StateId, StateSet, Symbol, Transition};
use crate::config::TableConfig;
use crate::error::{Conflict, Error, Result};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Outgoing edges of one origin state
#[derive(Debug, Clone)]
struct Row<S> {
    /// Positions in `TransitionTable::transitions`, in insertion order
    order: Vec<usize>,
    targets: HashMap<S, StateId>,
}

impl<S> Default for Row<S> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            targets: HashMap::new(),
        }
    }
}

/// The partial function `(state, symbol) -> state` of an LR automaton.
///
/// The table owns every [`Transition`] and indexes them twice: by
/// `(origin, symbol)` for lookups and by origin for enumeration. It is built
/// insert-only while the table is open, then [`freeze`](Self::freeze) makes
/// it read-only for the parser driver.
///
/// At most one destination exists per `(origin, symbol)`. Inserts that would
/// break this are rejected with [`Error::Conflict`] and leave the table
/// untouched; choosing which destination wins is up to the caller.
#[derive(Debug, Clone)]
pub struct TransitionTable<S> {
    transitions: Vec<Transition<S>>,
    rows: HashMap<StateId, Row<S>>,
    /// When set, both endpoints of every insert must carry this tag
    owner: Option<AutomatonId>,
    frozen: bool,
}

impl<S: Symbol> TransitionTable<S> {
    /// An open table that accepts states from any automaton
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            rows: HashMap::new(),
            owner: None,
            frozen: false,
        }
    }

    /// An open table that rejects states not minted by `states`
    pub fn owned_by(states: &StateSet) -> Self {
        Self {
            owner: Some(states.id()),
            ..Self::new()
        }
    }

    pub fn with_config(states: &StateSet, config: &TableConfig) -> Self {
        Self {
            transitions: Vec::with_capacity(config.initial_capacity),
            rows: HashMap::with_capacity(states.len()),
            owner: config.check_ownership.then(|| states.id()),
            frozen: false,
        }
    }

    /// Adds a transition.
    ///
    /// Returns `Ok(true)` when the transition is new and `Ok(false)` when the
    /// exact same transition is already present.
    pub fn insert(&mut self, transition: Transition<S>) -> Result<bool> {
        self.check_insertable(&transition)?;

        let row = self.rows.entry(transition.origin()).or_default();
        match row.targets.get(transition.symbol()) {
            Some(&existing) if existing == transition.destination() => {
                tracing::debug!("Already present: {}", transition);
                return Ok(false);
            }
            Some(&existing) => {
                let conflict = Conflict {
                    origin: transition.origin(),
                    symbol: transition.symbol().to_string(),
                    existing,
                    rejected: transition.destination(),
                };
                tracing::warn!("{}", conflict);
                return Err(Error::Conflict(conflict));
            }
            None => {}
        }

        tracing::debug!("Inserting {}", transition);
        row.targets
            .insert(transition.symbol().clone(), transition.destination());
        row.order.push(self.transitions.len());
        self.transitions.push(transition);
        Ok(true)
    }

    /// Shorthand for `insert(Transition::new(origin, symbol, destination))`
    pub fn add(&mut self, origin: StateId, symbol: S, destination: StateId) -> Result<bool> {
        self.insert(Transition::new(origin, symbol, destination))
    }

    /// Inserts every transition, collecting conflicts instead of stopping at
    /// the first one.
    ///
    /// The whole batch is checked against the frozen flag and the ownership
    /// rule first; if any entry fails, nothing is inserted and that error is
    /// returned. Otherwise returns the number of transitions actually added.
    /// Conflicting entries are skipped and reported together as
    /// [`Error::Conflicts`]; the non-conflicting ones stay inserted.
    pub fn insert_all<I>(&mut self, transitions: I) -> Result<usize>
    where
        I: IntoIterator<Item = Transition<S>>,
    {
        let batch: Vec<Transition<S>> = transitions.into_iter().collect();
        for transition in &batch {
            self.check_insertable(transition)?;
        }

        let mut added = 0;
        let mut conflicts = Vec::new();

        for transition in batch {
            match self.insert(transition) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(Error::Conflict(conflict)) => conflicts.push(conflict),
                Err(e) => return Err(e),
            }
        }

        if conflicts.is_empty() {
            Ok(added)
        } else {
            tracing::warn!(
                "{} conflict(s) while inserting, {} transition(s) added",
                conflicts.len(),
                added
            );
            Err(Error::Conflicts(conflicts))
        }
    }

    /// Frozen and ownership checks shared by single and bulk inserts
    fn check_insertable(&self, transition: &Transition<S>) -> Result<()> {
        if self.frozen {
            return Err(Error::FrozenTable {
                origin: transition.origin(),
                symbol: transition.symbol().to_string(),
            });
        }

        if let Some(owner) = self.owner {
            for state in [transition.origin(), transition.destination()] {
                if state.automaton() != owner {
                    tracing::warn!("Rejecting {}: {} is foreign", transition, state);
                    return Err(Error::ForeignState {
                        state,
                        expected: owner,
                    });
                }
            }
        }
        Ok(())
    }

    /// Destination of `state` on `symbol`, or `None` when the automaton has
    /// no such edge
    pub fn lookup<Q>(&self, state: StateId, symbol: &Q) -> Option<StateId>
    where
        S: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.rows.get(&state)?.targets.get(symbol).copied()
    }

    /// Outgoing transitions of `state` in insertion order.
    ///
    /// Each call starts a fresh enumeration; unknown states yield nothing.
    pub fn transitions_from(
        &self,
        state: StateId,
    ) -> impl Iterator<Item = &Transition<S>> + Clone + '_ {
        let order = self
            .rows
            .get(&state)
            .map(|row| row.order.as_slice())
            .unwrap_or_default();
        order.iter().map(move |&idx| &self.transitions[idx])
    }

    /// Symbols with an outgoing edge from `state`
    pub fn symbols_from(&self, state: StateId) -> impl Iterator<Item = &S> + '_ {
        self.transitions_from(state).map(Transition::symbol)
    }

    /// Makes the table read-only. Later inserts fail with `FrozenTable`.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        tracing::info!(
            "Transition table frozen with {} transitions over {} origin states",
            self.transitions.len(),
            self.rows.len()
        );
    }

    /// Freezes the table and hands it out for lock-free shared reading
    pub fn into_shared(mut self) -> Arc<Self> {
        self.freeze();
        Arc::new(self)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn owner(&self) -> Option<AutomatonId> {
        self.owner
    }

    pub fn contains(&self, transition: &Transition<S>) -> bool {
        self.lookup(transition.origin(), transition.symbol()) == Some(transition.destination())
    }

    /// All transitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S>> + Clone + '_ {
        self.transitions.iter()
    }

    /// Distinct origin states, in the order they were first seen
    pub fn origins(&self) -> Vec<StateId> {
        let mut seen = HashSet::new();
        self.transitions
            .iter()
            .map(Transition::origin)
            .filter(|origin| seen.insert(*origin))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<S: Symbol> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S: Symbol> IntoIterator for &'a TransitionTable<S> {
    type Item = &'a Transition<S>;
    type IntoIter = std::slice::Iter<'a, Transition<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

impl<S: Symbol> fmt::Display for TransitionTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.frozen { "frozen" } else { "open" };
        writeln!(f, "TransitionTable ({}, {} entries):", status, self.len())?;
        for transition in &self.transitions {
            writeln!(f, "  {}", transition)?;
        }
        Ok(())
    }
}
