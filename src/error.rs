//! This module defines all error types used throughout the crate.

use crate::automaton::{AutomatonId, StateId};
use std::fmt;
use std::io;
use thiserror::Error;

/// A rejected insert: the pair `(origin, symbol)` already leads to `existing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub origin: StateId,
    pub symbol: String,
    pub existing: StateId,
    pub rejected: StateId,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state {} on `{}` already goes to {}, refusing {}",
            self.origin, self.symbol, self.existing, self.rejected
        )
    }
}

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Non-deterministic insert: same (origin, symbol) with another destination
    #[error("Goto conflict: {0}")]
    Conflict(Conflict),

    /// Every conflict collected by a bulk insert
    #[error("{} goto conflict(s): {}", .0.len(), format_conflicts(.0))]
    Conflicts(Vec<Conflict>),

    /// Insert attempted after the table was frozen
    #[error("Transition table is frozen, cannot insert {origin} on `{symbol}`")]
    FrozenTable { origin: StateId, symbol: String },

    /// A state that belongs to another automaton
    #[error("State {state}@{} does not belong to automaton {expected}", .state.automaton())]
    ForeignState {
        state: StateId,
        expected: AutomatonId,
    },

    /// Completeness validation failed
    #[error(
        "Automaton is incomplete: {} foreign state(s), {} unreachable state(s)",
        .foreign.len(),
        .unreachable.len()
    )]
    Incomplete {
        foreign: Vec<StateId>,
        unreachable: Vec<StateId>,
    },

    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(Conflict::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if error reports one or more goto conflicts
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_) | Error::Conflicts(_))
    }

    /// Check if error is an insert into a frozen table
    pub fn is_frozen(&self) -> bool {
        matches!(self, Error::FrozenTable { .. })
    }

    /// Conflicts carried by this error, if any
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            Error::Conflict(conflict) => std::slice::from_ref(conflict),
            Error::Conflicts(conflicts) => conflicts,
            _ => &[],
        }
    }
}

impl From<Conflict> for Error {
    fn from(conflict: Conflict) -> Self {
        Error::Conflict(conflict)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
