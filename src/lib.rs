//! LR goto tables
//!
//! The transition backbone of a bottom-up (LR) parsing automaton.
//!
//! This library provides functionality for:
//! - Registering automaton states and minting stable state ids
//! - Building a deterministic `(state, symbol) -> state` transition table
//! - Freezing the table for lock-free use by parser drivers
//! - Validating and inspecting the resulting automaton
//!
//! ```
//! use lr_goto::automaton::{StateSet, TransitionTable};
//!
//! let mut states = StateSet::new();
//! let s0 = states.add_state();
//! let s1 = states.add_state();
//!
//! let mut table = TransitionTable::owned_by(&states);
//! table.add(s0, "a", s1)?;
//! table.freeze();
//!
//! assert_eq!(table.lookup(s0, "a"), Some(s1));
//! assert_eq!(table.lookup(s0, "b"), None);
//! assert!(table.add(s1, "a", s0).unwrap_err().is_frozen());
//! # Ok::<(), lr_goto::Error>(())
//! ```

pub mod automaton;
pub mod config;
pub mod error;

pub use automaton::{StateId, StateSet, Transition, TransitionTable};
pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging from the `[logging]` section.
///
/// `RUST_LOG`, when set and valid, overrides the configured level.
pub fn init_logging(config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.env_filter()?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "lr-goto");
    }

    #[test]
    fn test_init_logging_from_config() {
        let config = Config::default();
        assert!(init_logging(&config.logging).is_ok());
        // the global subscriber can only be installed once
        assert!(init_logging(&config.logging).is_err());
    }
}
