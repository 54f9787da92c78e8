//! Safe file reading
//!
//! Provides consistent handling for:
//! - Oversized files
//! - Binary files
//! - Non-UTF-8 files

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Default maximum file size in bytes (4 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Number of leading bytes inspected for NUL when detecting binaries
const BINARY_SNIFF_LEN: usize = 8192;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Skip non-UTF-8 files entirely
    Skip,
    /// Replace invalid sequences with U+FFFD
    #[default]
    Lossy,
}

/// Configuration for file reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Files larger than this are skipped (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Lossy,
        }
    }
}

/// Text read from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileText {
    pub content: String,
    /// Whether invalid UTF-8 was replaced
    pub lossy_conversion: bool,
}

/// Why a file was not read
#[derive(Debug, Error)]
pub enum FileSkip {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("file exceeds size limit ({size} > {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("file appears to be binary (contains null bytes)")]
    Binary,

    #[error("file contains invalid UTF-8 sequences")]
    InvalidUtf8,
}

/// Read a file's full text with the given configuration
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> Result<FileText, FileSkip> {
    let mut file = fs::File::open(path)?;
    let size = file.metadata()?.len();

    if size > config.max_file_size {
        return Err(FileSkip::TooLarge {
            size,
            limit: config.max_file_size,
        });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    file.read_to_end(&mut bytes)?;

    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(FileSkip::Binary);
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(FileText {
            content,
            lossy_conversion: false,
        }),
        Err(err) => match config.encoding_strategy {
            EncodingStrategy::Skip => Err(FileSkip::InvalidUtf8),
            EncodingStrategy::Lossy => Ok(FileText {
                content: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                lossy_conversion: true,
            }),
        },
    }
}
