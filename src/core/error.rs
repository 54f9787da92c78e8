//! Reader errors
//!
//! Library-level failures are typed; CLI handlers wrap them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// The configured extension list is absent or has no usable entries.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The search produced no candidate files.
    #[error("no files found under {} matching {include}", .base.display())]
    NoFilesFound { base: PathBuf, include: String },

    /// An extension or exclude pattern cannot form a valid glob.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The settings file exists but could not be parsed.
    #[error("failed to load settings from {}: {reason}", .path.display())]
    Settings { path: PathBuf, reason: String },

    /// The search collaborator failed.
    #[error("file search failed: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ReaderError {
    /// Stable code used when the error is surfaced in a result item
    pub fn code(&self) -> &'static str {
        match self {
            ReaderError::Configuration(_) => "CONFIGURATION_ERROR",
            ReaderError::NoFilesFound { .. } => "NO_FILES_FOUND",
            ReaderError::InvalidPattern { .. } => "INVALID_PATTERN",
            ReaderError::Settings { .. } => "SETTINGS_ERROR",
            ReaderError::Search(_) => "SEARCH_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ReaderError::Configuration("x".into()).code(),
            "CONFIGURATION_ERROR"
        );
        let err = ReaderError::NoFilesFound {
            base: PathBuf::from("/repo"),
            include: "**/*.rs".into(),
        };
        assert_eq!(err.code(), "NO_FILES_FOUND");
    }

    #[test]
    fn test_no_files_found_message() {
        let err = ReaderError::NoFilesFound {
            base: PathBuf::from("/repo"),
            include: "**/*.{ts,js}".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/repo"));
        assert!(msg.contains("**/*.{ts,js}"));
    }
}
