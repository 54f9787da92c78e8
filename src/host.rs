//! Host collaborator interfaces
//!
//! The reader never touches the editor or filesystem directly. Search,
//! open, counting, encoding, notification, telemetry, configuration and
//! the focused document all come in through these traits, so the core
//! logic runs the same against the local backends and against fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::error::ReaderError;
use crate::core::model::{ReaderConfig, SourceFile};

/// Handle to one file returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    /// Location the opener can read from
    pub location: PathBuf,
    /// Path relative to the base folder, '/'-separated
    pub relative: String,
}

impl FileHandle {
    pub fn new(location: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            relative: relative.into(),
        }
    }
}

/// Text and classification of an opened file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedDocument {
    pub content: String,
    pub language_id: String,
}

/// Finds candidate files under a base folder
#[async_trait]
pub trait FileSearch: Send + Sync {
    async fn find_files(
        &self,
        base: &Path,
        include: &str,
        exclude: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<FileHandle>>;
}

/// Opens one file for reading
#[async_trait]
pub trait DocumentOpener: Send + Sync {
    async fn open(&self, handle: &FileHandle) -> Result<OpenedDocument>;
}

/// Estimates the token cost of encoded text
#[async_trait]
pub trait TokenCounter: Send + Sync {
    async fn count(&self, encoded: &str) -> Result<usize>;
}

/// Turns a file into the text a prompt builder would send
pub trait PromptEncoder: Send + Sync {
    fn encode(&self, file: &SourceFile) -> String;
}

/// Shows a short informational message to the user
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
}

/// A named telemetry event with string properties and numeric measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            measurements: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_measurement(mut self, key: impl Into<String>, value: f64) -> Self {
        self.measurements.insert(key.into(), value);
        self
    }
}

/// Records telemetry events; delivery is fire-and-forget
pub trait TelemetrySink: Send + Sync {
    fn send_event(&self, event: TelemetryEvent);
}

/// Supplies the reader settings snapshot
pub trait ConfigurationSource: Send + Sync {
    fn snapshot(&self) -> Result<ReaderConfig, ReaderError>;
}

/// Language of the document currently focused in the host, if any
pub trait ActiveDocument: Send + Sync {
    fn language_id(&self) -> Option<String>;
}

/// No focused document
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActiveDocument;

impl ActiveDocument for NoActiveDocument {
    fn language_id(&self) -> Option<String> {
        None
    }
}

/// A fixed configuration snapshot
impl ConfigurationSource for ReaderConfig {
    fn snapshot(&self) -> Result<ReaderConfig, ReaderError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_event_builder() {
        let event = TelemetryEvent::new("filesProcessed")
            .with_property("languageId", "rust")
            .with_measurement("processedFiles", 3.0);
        assert_eq!(event.name, "filesProcessed");
        assert_eq!(event.properties.get("languageId").map(String::as_str), Some("rust"));
        assert_eq!(event.measurements.get("processedFiles"), Some(&3.0));
    }

    #[test]
    fn test_reader_config_is_configuration_source() {
        let config = ReaderConfig {
            file_extensions: Some(vec!["rs".into()]),
            ..Default::default()
        };
        assert_eq!(config.snapshot().unwrap(), config);
    }

    #[test]
    fn test_no_active_document() {
        assert_eq!(NoActiveDocument.language_id(), None);
    }
}
