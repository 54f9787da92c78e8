//! Include/exclude glob construction
//!
//! Extensions become a single brace glob (`**/*.{rs,ts}`) and exclude
//! patterns a single alternation (`{a,b}`), the shape an editor's
//! find-files API accepts. `CompiledPatterns` matches relative paths
//! against both for the local search backend.

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::ReaderError;

static EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_+\-.]+$").expect("valid extension regex"));

/// Normalize one configured extension: trim, strip a leading `*.` or `.`
fn normalize_extension(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("*.").unwrap_or(trimmed);
    trimmed.strip_prefix('.').unwrap_or(trimmed)
}

/// Build the search glob from configured file extensions
pub fn include_glob(extensions: Option<&[String]>) -> Result<String, ReaderError> {
    let extensions = extensions.ok_or_else(|| {
        ReaderError::Configuration("fileExtensions is not configured".to_string())
    })?;

    let mut normalized: Vec<&str> = Vec::new();
    for raw in extensions {
        let ext = normalize_extension(raw);
        if ext.is_empty() {
            continue;
        }
        if !EXTENSION_RE.is_match(ext) {
            return Err(ReaderError::InvalidPattern {
                pattern: raw.clone(),
                reason: "extensions may only contain letters, digits, '_', '+', '-' and '.'"
                    .to_string(),
            });
        }
        if !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }

    match normalized.as_slice() {
        [] => Err(ReaderError::Configuration(
            "fileExtensions is empty".to_string(),
        )),
        [single] => Ok(format!("**/*.{}", single)),
        many => Ok(format!("**/*.{{{}}}", many.join(","))),
    }
}

/// Build the optional exclude glob from configured exclude patterns
pub fn exclude_glob(patterns: Option<&[String]>) -> Option<String> {
    let patterns: Vec<&str> = patterns?
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    match patterns.as_slice() {
        [] => None,
        [single] => Some((*single).to_string()),
        many => Some(format!("{{{}}}", many.join(","))),
    }
}

fn build_glob(pattern: &str) -> Result<Glob, ReaderError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| ReaderError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

/// Split a pattern wrapped in one outer `{...}` into its top-level branches
///
/// `{a,b/{c,d}}` yields `["a", "b/{c,d}"]`. Anything else is returned whole.
pub fn top_level_alternatives(pattern: &str) -> Vec<&str> {
    let inner = match pattern
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(inner) => inner,
        None => return vec![pattern],
    };

    let mut branches = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    // The leading brace closes early: `{a}/{b}`
                    return vec![pattern];
                }
                depth -= 1;
            }
            ',' if depth == 0 => {
                branches.push(&inner[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    branches.push(&inner[start..]);
    branches
}

/// Compiled include glob with an optional exclude glob
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    include: GlobMatcher,
    exclude: Option<GlobSet>,
}

impl CompiledPatterns {
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self, ReaderError> {
        let include = build_glob(include)?.compile_matcher();

        let exclude = match exclude {
            Some(pattern) => {
                let mut builder = GlobSetBuilder::new();
                for branch in top_level_alternatives(pattern) {
                    builder.add(build_glob(branch)?);
                }
                let set = builder.build().map_err(|e| ReaderError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.kind().to_string(),
                })?;
                Some(set)
            }
            None => None,
        };

        Ok(Self { include, exclude })
    }

    /// Test a '/'-separated path relative to the base folder
    pub fn matches(&self, relative: &str) -> bool {
        if !self.include.is_match(relative) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(relative),
            None => true,
        }
    }

    /// Whether a directory is excluded as a whole (`**/node_modules`)
    pub fn excludes_dir(&self, relative: &str) -> bool {
        self.exclude
            .as_ref()
            .map(|exclude| exclude.is_match(relative))
            .unwrap_or(false)
    }
}
