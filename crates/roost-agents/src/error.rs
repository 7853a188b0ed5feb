//! Error types for the roost-agents crate.
//!
//! Behavior itself never fails: a rejected transition or a stale id is a
//! silent no-op. Errors only come out of tunable validation.

use roost_world::WorldError;

/// Errors that can occur while validating agent configuration.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An adult, juvenile, or egg tunable is out of its allowed range.
    #[error("invalid {section} tunable `{name}`: {reason}")]
    InvalidTunable {
        /// Tunable section (`adult`, `juvenile`, or `egg`).
        section: &'static str,
        /// Name of the offending field.
        name: &'static str,
        /// Explanation of the allowed range.
        reason: String,
    },

    /// A feed tunable failed validation in the world crate.
    #[error("invalid feed tunables: {source}")]
    Feed {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}
