//! Error types for the `roost-world` crate.
//!
//! Only construction and configuration can fail here. Runtime lookups of
//! stale ids are not errors; they return `None` or `false`.

/// Errors that can occur while building world state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The viewport has a non-positive or non-finite dimension.
    #[error("invalid viewport {width}x{height}: dimensions must be finite and positive")]
    InvalidViewport {
        /// Requested width in pixels.
        width: f64,
        /// Requested height in pixels.
        height: f64,
    },

    /// A feed tunable is out of its allowed range.
    #[error("invalid feed tunable `{name}`: {reason}")]
    InvalidTunable {
        /// Name of the offending field.
        name: &'static str,
        /// Explanation of the allowed range.
        reason: String,
    },
}
