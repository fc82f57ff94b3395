//! Transition representation

use crate::automaton::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A goto edge: `origin` moves to `destination` on `symbol`.
///
/// Immutable once built. Replacing an edge means building a new
/// `Transition`, never editing one held by a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[doc(alias = "Goto")]
pub struct Transition<S> {
    origin: StateId,
    symbol: S,
    destination: StateId,
}

impl<S> Transition<S> {
    pub fn new(origin: StateId, symbol: S, destination: StateId) -> Self {
        Self {
            origin,
            symbol,
            destination,
        }
    }

    /// State the transition departs from
    pub fn origin(&self) -> StateId {
        self.origin
    }

    /// Symbol that triggers the transition
    pub fn symbol(&self) -> &S {
        &self.symbol
    }

    /// State the transition arrives at
    pub fn destination(&self) -> StateId {
        self.destination
    }

    pub fn into_parts(self) -> (StateId, S, StateId) {
        (self.origin, self.symbol, self.destination)
    }

    /// A self-loop, e.g. `S3 --'*'--> S3`
    pub fn is_loop(&self) -> bool {
        self.origin == self.destination
    }
}

impl<S: fmt::Display> fmt::Display for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.origin, self.symbol, self.destination)
    }
}
