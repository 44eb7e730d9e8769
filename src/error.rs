//! Error types for the machine storage classifier
//!
//! Classification itself never fails. Errors only arise at the edges of the
//! crate: loading configuration, parsing machine snapshots, and reading files.

use thiserror::Error;

/// Unified error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // =========================================================================
    // Snapshot Errors
    // =========================================================================
    #[error("Snapshot parse error: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error("Unknown node status code: {code}")]
    UnknownNodeStatus { code: u32 },

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error was caused by bad input rather than the environment
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
