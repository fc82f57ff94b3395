//! Symbol representation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Anything usable as a transition label.
///
/// Symbols are opaque to the table: they only need value equality, hashing
/// and a printable form for diagnostics. Every type meeting those bounds is a
/// `Symbol`, so `&str`, `char` or an interned id work as well as
/// [`GrammarSymbol`].
pub trait Symbol: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> Symbol for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

/// A terminal or non-terminal of a context-free grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrammarSymbol {
    Terminal(String),
    NonTerminal(String),
    /// The `$` end marker
    EndOfInput,
}

impl GrammarSymbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Self::Terminal(name.into())
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Self::NonTerminal(name.into())
    }

    /// Terminals and the end marker drive shifts, non-terminals drive gotos
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_) | Self::EndOfInput)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Terminal(name) | Self::NonTerminal(name) => name,
            Self::EndOfInput => "$",
        }
    }
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(name) => write!(f, "'{}'", name),
            Self::NonTerminal(name) => write!(f, "{}", name),
            Self::EndOfInput => write!(f, "$"),
        }
    }
}
