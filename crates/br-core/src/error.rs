//! Core error type.
//!
//! Sub-crates define their own error enums and either wrap `CoreError` as one
//! variant (via `#[from]`) or keep it separate, whichever keeps error sites
//! clean.  Scheduling itself is infallible; these errors only come from the
//! edges (configuration and text parsing).

use thiserror::Error;

/// The top-level error type for `br-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `br-core`.
pub type CoreResult<T> = Result<T, CoreError>;
