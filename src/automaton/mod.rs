//! Automaton module - States, goto transitions and the transition table

pub mod analyzer;
pub mod graph;
pub mod state;
pub mod symbol;
pub mod table;
pub mod transition;

// Re-export key types
pub use analyzer::{StateClass, ValidationReport};
pub use graph::{GraphStats, TransitionGraph};
pub use state::{AutomatonId, State, StateId, StateSet};
pub use symbol::{GrammarSymbol, Symbol};
pub use table::TransitionTable;
pub use transition::Transition;

/// Alias matching the usual LR vocabulary
pub type Goto<S> = Transition<S>;
