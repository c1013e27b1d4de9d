//! Error types for the gstbill-core library.
//!
//! The computation pipeline itself never fails; these errors cover the
//! edges where data enters from disk or JSON.

use thiserror::Error;

/// Main error type for the gstbill library.
#[derive(Error, Debug)]
pub enum GstBillError {
    /// Malformed JSON in a bundle or configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the gstbill library.
pub type Result<T> = std::result::Result<T, GstBillError>;
