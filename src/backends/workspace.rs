//! Local workspace backend
//!
//! Implements file search and open over the local filesystem. Search uses
//! the ignore crate for traversal and globset for matching; results are
//! sorted by path so repeated reads see the same order.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::file_reader::{read_file_with_config, FileReadConfig};
use crate::core::language::language_for_path;
use crate::core::paths::make_relative;
use crate::core::patterns::CompiledPatterns;
use crate::host::{ActiveDocument, DocumentOpener, FileHandle, FileSearch, OpenedDocument};

/// Filesystem-backed search and open
#[derive(Debug, Clone, Default)]
pub struct LocalWorkspace {
    /// Honor .gitignore and other ignore files
    respect_ignore: bool,
    read_config: FileReadConfig,
}

impl LocalWorkspace {
    pub fn new(respect_ignore: bool) -> Self {
        Self {
            respect_ignore,
            read_config: FileReadConfig::default(),
        }
    }

    pub fn with_read_config(mut self, read_config: FileReadConfig) -> Self {
        self.read_config = read_config;
        self
    }
}

/// Walk `base` and collect files matching the patterns, sorted by path
fn walk_matching(
    base: &Path,
    patterns: &CompiledPatterns,
    respect_ignore: bool,
    max_results: usize,
) -> Vec<FileHandle> {
    let mut builder = WalkBuilder::new(base);
    builder
        .hidden(true)
        .git_ignore(respect_ignore)
        .git_global(respect_ignore)
        .git_exclude(respect_ignore)
        .ignore(respect_ignore)
        .parents(respect_ignore)
        .require_git(false);

    // Prune excluded directories so folder patterns like `**/node_modules` apply
    let prune = patterns.clone();
    let root = base.to_path_buf();
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 || !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            return true;
        }
        match make_relative(entry.path(), &root) {
            Some(relative) => !prune.excludes_dir(&relative),
            None => true,
        }
    });

    let mut handles = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping walk entry");
                continue;
            }
        };

        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let relative = match make_relative(entry.path(), base) {
            Some(r) => r,
            None => continue,
        };

        if patterns.matches(&relative) {
            handles.push(FileHandle::new(entry.path(), relative));
        }
    }

    handles.sort_by(|a, b| a.relative.cmp(&b.relative));
    handles.truncate(max_results);
    handles
}

#[async_trait]
impl FileSearch for LocalWorkspace {
    async fn find_files(
        &self,
        base: &Path,
        include: &str,
        exclude: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<FileHandle>> {
        if !base.is_dir() {
            anyhow::bail!("base folder {} is not a directory", base.display());
        }

        let patterns = CompiledPatterns::new(include, exclude)?;
        let base = base.to_path_buf();
        let respect_ignore = self.respect_ignore;

        let handles = tokio::task::spawn_blocking(move || {
            walk_matching(&base, &patterns, respect_ignore, max_results)
        })
        .await
        .context("file search task failed")?;

        debug!(count = handles.len(), "search finished");
        Ok(handles)
    }
}

#[async_trait]
impl DocumentOpener for LocalWorkspace {
    async fn open(&self, handle: &FileHandle) -> Result<OpenedDocument> {
        let location = handle.location.clone();
        let config = self.read_config;

        let text = tokio::task::spawn_blocking(move || read_file_with_config(&location, &config))
            .await
            .context("file read task failed")?
            .with_context(|| format!("Failed to open {}", handle.relative))?;

        if text.lossy_conversion {
            debug!(path = %handle.relative, "replaced invalid UTF-8 sequences");
        }

        Ok(OpenedDocument {
            content: text.content,
            language_id: language_for_path(&handle.location).to_string(),
        })
    }
}

/// Focused document given as a path, classified by extension
#[derive(Debug, Clone)]
pub struct PathActiveDocument {
    path: PathBuf,
}

impl PathActiveDocument {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ActiveDocument for PathActiveDocument {
    fn language_id(&self) -> Option<String> {
        Some(language_for_path(&self.path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn relatives(handles: &[FileHandle]) -> Vec<&str> {
        handles.iter().map(|h| h.relative.as_str()).collect()
    }

    #[tokio::test]
    async fn test_find_files_sorted_and_filtered() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("src/b.rs"), "b");
        write_file(&temp.path().join("src/a.rs"), "a");
        write_file(&temp.path().join("README.md"), "readme");
        write_file(&temp.path().join("build.rs"), "build");

        let workspace = LocalWorkspace::new(true);
        let handles = workspace
            .find_files(temp.path(), "**/*.rs", None, 100)
            .await
            .unwrap();

        assert_eq!(relatives(&handles), vec!["build.rs", "src/a.rs", "src/b.rs"]);
    }

    #[tokio::test]
    async fn test_find_files_respects_exclude_and_max() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.ts"), "a");
        write_file(&temp.path().join("b.ts"), "b");
        write_file(&temp.path().join("c.ts"), "c");
        write_file(&temp.path().join("node_modules/dep/index.ts"), "dep");

        let workspace = LocalWorkspace::new(true);
        let handles = workspace
            .find_files(temp.path(), "**/*.ts", Some("{**/node_modules/**}"), 2)
            .await
            .unwrap();

        assert_eq!(relatives(&handles), vec!["a.ts", "b.ts"]);
    }

    #[tokio::test]
    async fn test_find_files_prunes_excluded_folder() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("app.js"), "app");
        write_file(&temp.path().join("node_modules/dep/index.js"), "dep");
        write_file(&temp.path().join("web/node_modules/x.js"), "x");

        let workspace = LocalWorkspace::new(true);
        let handles = workspace
            .find_files(temp.path(), "**/*.js", Some("**/node_modules"), 100)
            .await
            .unwrap();

        assert_eq!(relatives(&handles), vec!["app.js"]);
    }

    #[tokio::test]
    async fn test_find_files_gitignore_without_git_repo() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "gen/\n");
        write_file(&temp.path().join("a.rs"), "a");
        write_file(&temp.path().join("gen/b.rs"), "b");

        let respecting = LocalWorkspace::new(true)
            .find_files(temp.path(), "**/*.rs", None, 100)
            .await
            .unwrap();
        assert_eq!(relatives(&respecting), vec!["a.rs"]);

        let ignoring = LocalWorkspace::new(false)
            .find_files(temp.path(), "**/*.rs", None, 100)
            .await
            .unwrap();
        assert_eq!(relatives(&ignoring), vec!["a.rs", "gen/b.rs"]);
    }

    #[tokio::test]
    async fn test_find_files_skips_hidden() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".hidden/secret.rs"), "x");
        write_file(&temp.path().join("main.rs"), "fn main() {}");

        let workspace = LocalWorkspace::new(false);
        let handles = workspace
            .find_files(temp.path(), "**/*.rs", None, 100)
            .await
            .unwrap();

        assert_eq!(relatives(&handles), vec!["main.rs"]);
    }

    #[tokio::test]
    async fn test_find_files_missing_base() {
        let temp = tempdir().unwrap();
        let workspace = LocalWorkspace::new(true);
        let result = workspace
            .find_files(&temp.path().join("missing"), "**/*.rs", None, 10)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_open_classifies_language() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tool.py");
        write_file(&path, "print('hi')\n");

        let workspace = LocalWorkspace::new(true);
        let document = workspace
            .open(&FileHandle::new(&path, "tool.py"))
            .await
            .unwrap();

        assert_eq!(document.content, "print('hi')\n");
        assert_eq!(document.language_id, "python");
    }

    #[tokio::test]
    async fn test_open_rejects_oversized_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("big.rs");
        write_file(&path, &"x".repeat(64));

        let workspace = LocalWorkspace::new(true).with_read_config(FileReadConfig {
            max_file_size: 16,
            ..Default::default()
        });
        let err = workspace
            .open(&FileHandle::new(&path, "big.rs"))
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("size limit"));
    }

    #[test]
    fn test_path_active_document() {
        let active = PathActiveDocument::new(PathBuf::from("src/App.tsx"));
        assert_eq!(active.language_id().as_deref(), Some("typescriptreact"));
    }
}
