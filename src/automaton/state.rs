//! State representation

use crate::Result;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_AUTOMATON: AtomicU32 = AtomicU32::new(0);

/// Tag shared by every state of one automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AutomatonId(u32);

impl AutomatonId {
    fn next() -> Self {
        Self(NEXT_AUTOMATON.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AutomatonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of an automaton state.
///
/// Assigned by [`StateSet`] at creation and never reused. The index is the
/// state's position in its set; the automaton tag lets a table reject states
/// minted by a different set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId {
    automaton: AutomatonId,
    index: usize,
}

impl StateId {
    pub fn automaton(&self) -> AutomatonId {
        self.automaton
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.index)
    }
}

/// A state of the LR automaton.
///
/// Item sets live with the construction algorithm; the state itself only
/// carries its identity and an optional human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub label: Option<String>,
}

impl State {
    /// Get a short display string
    pub fn display_short(&self) -> String {
        match &self.label {
            Some(label) => format!("{} ({})", self.id, label),
            None => self.id.to_string(),
        }
    }
}

/// Registry of the states of one automaton.
///
/// Cloning yields an independent registry under a fresh [`AutomatonId`]:
/// the copied states are re-tagged, so ids minted by the original and the
/// clone never compare equal.
#[derive(Debug)]
pub struct StateSet {
    id: AutomatonId,
    states: Vec<State>,
}

impl StateSet {
    pub fn new() -> Self {
        Self {
            id: AutomatonId::next(),
            states: Vec::new(),
        }
    }

    pub fn id(&self) -> AutomatonId {
        self.id
    }

    pub fn add_state(&mut self) -> StateId {
        self.push(None)
    }

    pub fn add_labeled_state(&mut self, label: impl Into<String>) -> StateId {
        self.push(Some(label.into()))
    }

    fn push(&mut self, label: Option<String>) -> StateId {
        let id = StateId {
            automaton: self.id,
            index: self.states.len(),
        };
        self.states.push(State { id, label });
        id
    }

    pub fn contains(&self, id: StateId) -> bool {
        id.automaton == self.id && id.index() < self.states.len()
    }

    pub fn get(&self, id: StateId) -> Option<&State> {
        if id.automaton != self.id {
            return None;
        }
        self.states.get(id.index())
    }

    /// Fails with `ForeignState` unless `id` was minted by this set
    pub fn check(&self, id: StateId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::ForeignState {
                state: id,
                expected: self.id,
            })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().map(|state| state.id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Clone for StateSet {
    fn clone(&self) -> Self {
        let id = AutomatonId::next();
        let states = self
            .states
            .iter()
            .map(|state| State {
                id: StateId {
                    automaton: id,
                    index: state.id.index,
                },
                label: state.label.clone(),
            })
            .collect();
        Self { id, states }
    }
}

impl Default for StateSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut states = StateSet::new();
        let s0 = states.add_state();
        let s1 = states.add_labeled_state("E -> E . + T");

        assert_eq!(s0.index(), 0);
        assert_eq!(s1.index(), 1);
        assert_eq!(s0.to_string(), "S0");
        assert_eq!(states.len(), 2);
        assert_eq!(
            states.get(s1).map(State::display_short).as_deref(),
            Some("S1 (E -> E . + T)")
        );
    }

    #[test]
    fn test_sets_do_not_share_states() {
        let mut first = StateSet::new();
        let mut second = StateSet::new();
        let a = first.add_state();
        let b = second.add_state();

        assert_ne!(first.id(), second.id());
        assert_ne!(a, b);
        assert!(first.contains(a));
        assert!(!first.contains(b));
        assert!(first.get(b).is_none());
        assert!(matches!(
            first.check(b),
            Err(Error::ForeignState { state, expected }) if state == b && expected == first.id()
        ));
    }

    #[test]
    fn test_cloned_set_mints_distinct_ids() {
        let mut states = StateSet::new();
        let s0 = states.add_labeled_state("start");
        let mut fork = states.clone();

        assert_ne!(fork.id(), states.id());
        assert_eq!(fork.len(), 1);
        assert!(!fork.contains(s0));
        let copied = fork.ids().next().unwrap();
        assert_eq!(copied.index(), 0);
        assert_eq!(copied.automaton(), fork.id());
        assert_eq!(fork.get(copied).and_then(|s| s.label.as_deref()), Some("start"));

        let a = states.add_state();
        let b = fork.add_state();
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(states.check(b).is_err());
        assert!(fork.check(a).is_err());
    }
}
