//! Unified error handling for home inference.
//!
//! Only failures that affect a whole run are errors here. Per-user outcomes
//! (empty trace, no nighttime data) are values: see
//! [`HomeResult::unresolved`](crate::HomeResult::unresolved).

use thiserror::Error;

/// Result type alias using [`HomeInferError`].
pub type Result<T> = std::result::Result<T, HomeInferError>;

/// Errors produced by the home inference engine.
#[derive(Error, Debug)]
pub enum HomeInferError {
    /// A coordinate reference system identifier could not be resolved.
    ///
    /// This is a configuration error: it would fail every user identically,
    /// so it aborts the run instead of being captured per-user.
    #[error("unsupported coordinate reference system '{crs}': {detail}")]
    UnsupportedReferenceSystem { crs: String, detail: String },

    /// Reverse projection of a winning cell center failed.
    #[error("reverse projection of cell center (y={y}, x={x}) failed: {detail}")]
    ReverseProjection { y: f64, x: f64, detail: String },
}
