//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the run so
//! `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: roost_core::ConfigError,
    },

    /// The configured viewport was rejected.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: roost_world::WorldError,
    },

    /// The tick loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: roost_core::RunnerError,
    },

    /// A frame could not be encoded.
    #[error("frame encoding error: {source}")]
    Frame {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
