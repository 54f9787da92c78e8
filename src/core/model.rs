//! Reader data model and unified result model
//!
//! `SourceFile`, `ReaderConfig` and `ReportSummary` describe one read
//! invocation. `ResultItem`/`ResultSet` are what commands render.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cap on the number of candidate files returned by a search
pub const DEFAULT_MAX_FILES: usize = 1000;

/// One accepted file, read in full
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the base folder, using '/' as separator
    pub path: String,
    pub content: String,
    pub language_id: String,
}

impl SourceFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        language_id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language_id: language_id.into(),
        }
    }
}

/// Read-only snapshot of the reader settings
///
/// `None` means the key was absent from every configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extensions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_patterns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,
}

impl ReaderConfig {
    /// Effective cap on candidate files
    pub fn max_files_or_default(&self) -> usize {
        self.max_files.unwrap_or(DEFAULT_MAX_FILES)
    }

    /// Overlay `other` on top of `self`; keys present in `other` win
    pub fn merged_with(mut self, other: ReaderConfig) -> Self {
        if other.file_extensions.is_some() {
            self.file_extensions = other.file_extensions;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.max_files.is_some() {
            self.max_files = other.max_files;
        }
        self
    }
}

/// Per-language occurrence counter
#[derive(Debug, Clone, Default)]
pub struct LanguageTally {
    counts: BTreeMap<String, usize>,
}

impl LanguageTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, language_id: &str) {
        *self.counts.entry(language_id.to_string()).or_insert(0) += 1;
    }

    /// Freeze the tally into a sorted map
    pub fn snapshot(&self) -> BTreeMap<String, usize> {
        self.counts.clone()
    }
}

/// Outcome of a successful read
#[derive(Debug, Clone, Default)]
pub struct ReadReport {
    /// Accepted files, in search order
    pub files: Vec<SourceFile>,
    /// Tokens spent on each accepted file, parallel to `files`
    pub file_tokens: Vec<usize>,
    pub summary: ReportSummary,
}

/// Counters describing a read, suitable for stats output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of candidates returned by the search
    pub total_candidates: usize,
    pub processed_files: usize,
    pub total_tokens: usize,
    pub max_tokens: usize,
    /// Candidates dropped because they could not be read or counted
    pub skipped_unreadable: usize,
    pub languages: BTreeMap<String, usize>,
}

impl ReportSummary {
    pub fn hit_token_limit(&self) -> bool {
        self.processed_files < self.total_candidates
    }
}

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    File,
    Summary,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Content size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to the base folder, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Token cost of the encoded file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,

    /// File content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload for summaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            language: None,
            tokens: None,
            excerpt: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a file result without content
    pub fn file(path: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::File);
        item.path = Some(path.into());
        item
    }

    /// Create a file result from an accepted source file
    pub fn source(file: &SourceFile, tokens: usize) -> Self {
        let mut item = Self::file(file.path.clone());
        item.language = Some(file.language_id.clone());
        item.tokens = Some(tokens);
        item.meta = Meta {
            size: Some(file.content.len() as u64),
            hash: Some(crate::core::util::content_hash(&file.content)),
        };
        item.excerpt = Some(file.content.clone());
        item
    }

    /// Create a summary result carrying structured data
    pub fn summary(data: serde_json::Value) -> Self {
        let mut item = Self::empty(Kind::Summary);
        item.data = Some(data);
        item
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        let mut item = Self::empty(Kind::Error);
        item.errors.push(error);
        item
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }
}

impl From<&ReadReport> for ResultSet {
    fn from(report: &ReadReport) -> Self {
        report
            .files
            .iter()
            .zip(report.file_tokens.iter())
            .map(|(file, tokens)| ResultItem::source(file, *tokens))
            .collect()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_merge_overrides_present_keys() {
        let base = ReaderConfig {
            file_extensions: Some(vec!["rs".into()]),
            exclude_patterns: Some(vec!["target/**".into()]),
            max_files: Some(10),
        };
        let overlay = ReaderConfig {
            file_extensions: Some(vec!["ts".into()]),
            ..Default::default()
        };
        let merged = base.merged_with(overlay);
        assert_eq!(merged.file_extensions, Some(vec!["ts".to_string()]));
        assert_eq!(merged.exclude_patterns, Some(vec!["target/**".to_string()]));
        assert_eq!(merged.max_files, Some(10));
    }

    #[test]
    fn test_config_max_files_default() {
        assert_eq!(ReaderConfig::default().max_files_or_default(), DEFAULT_MAX_FILES);
    }

    #[test]
    fn test_config_serializes_camel_case() {
        let config = ReaderConfig {
            file_extensions: Some(vec!["rs".into()]),
            exclude_patterns: None,
            max_files: Some(5),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"fileExtensions\""));
        assert!(json.contains("\"maxFiles\":5"));
        assert!(!json.contains("excludePatterns"));
    }

    #[test]
    fn test_language_tally() {
        let mut tally = LanguageTally::new();
        tally.record("rust");
        tally.record("python");
        tally.record("rust");
        let snapshot = tally.snapshot();
        assert_eq!(snapshot.values().sum::<usize>(), 3);
        assert_eq!(snapshot.get("rust"), Some(&2));
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["python", "rust"]);
    }

    #[test]
    fn test_summary_hit_token_limit() {
        let summary = ReportSummary {
            total_candidates: 4,
            processed_files: 3,
            ..Default::default()
        };
        assert!(summary.hit_token_limit());
    }

    #[test]
    fn test_result_item_source() {
        let file = SourceFile::new("src/main.rs", "fn main() {}", "rust");
        let item = ResultItem::source(&file, 7);
        assert_eq!(item.kind, Kind::File);
        assert_eq!(item.path.as_deref(), Some("src/main.rs"));
        assert_eq!(item.language.as_deref(), Some("rust"));
        assert_eq!(item.tokens, Some(7));
        assert_eq!(item.meta.size, Some(12));
        assert!(item.meta.hash.is_some());
    }

    #[test]
    fn test_result_set_from_report_keeps_order() {
        let report = ReadReport {
            files: vec![
                SourceFile::new("b.rs", "b", "rust"),
                SourceFile::new("a.rs", "a", "rust"),
            ],
            file_tokens: vec![3, 4],
            summary: ReportSummary::default(),
        };
        let set = ResultSet::from(&report);
        assert_eq!(set.items.len(), 2);
        assert_eq!(set.items[0].path.as_deref(), Some("b.rs"));
        assert_eq!(set.items[1].tokens, Some(4));
    }

    #[test]
    fn test_result_item_error() {
        let item = ResultItem::error(ItemError::new("NO_FILES_FOUND", "nothing"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors[0].code, "NO_FILES_FOUND");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"error\""));
        assert!(!json.contains("\"path\""));
    }
}
