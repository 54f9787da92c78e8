//! Repository read flow - Gather source files into a token budget
//!
//! Resolves the include/exclude globs from configuration, searches the base
//! folder, then opens, encodes and counts candidates one at a time,
//! accepting each while the running total stays within the budget.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backends::notify::StderrNotifier;
use crate::backends::settings::SettingsSource;
use crate::backends::telemetry::{JsonlTelemetry, TracingTelemetry};
use crate::backends::workspace::{LocalWorkspace, PathActiveDocument};
use crate::core::encode::FencedEncoder;
use crate::core::error::ReaderError;
use crate::core::file_reader::FileReadConfig;
use crate::core::model::{LanguageTally, ReadReport, ReportSummary, ResultSet, SourceFile};
use crate::core::patterns::{exclude_glob, include_glob};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::tokenizer::{BpeCounter, TokenModel};
use crate::host::{
    ActiveDocument, ConfigurationSource, DocumentOpener, FileHandle, FileSearch,
    NoActiveDocument, Notifier, PromptEncoder, TelemetryEvent, TelemetrySink, TokenCounter,
};

/// Telemetry event emitted when the search finds nothing
pub const EVENT_NO_FILES_FOUND: &str = "noFilesFound";
/// Telemetry event summarizing a successful read
pub const EVENT_FILES_PROCESSED: &str = "filesProcessed";

/// Default token budget for the CLI
pub const DEFAULT_MAX_TOKENS: usize = 128_000;

/// Host capabilities the reader depends on
#[derive(Clone, Copy)]
pub struct ReaderHost<'a> {
    pub config: &'a dyn ConfigurationSource,
    pub search: &'a dyn FileSearch,
    pub opener: &'a dyn DocumentOpener,
    pub encoder: &'a dyn PromptEncoder,
    pub notifier: &'a dyn Notifier,
    pub telemetry: &'a dyn TelemetrySink,
    pub active_document: &'a dyn ActiveDocument,
}

/// Reads a repository's files into a token budget
pub struct RepositoryReader<'a> {
    base: PathBuf,
    host: ReaderHost<'a>,
    counter: &'a dyn TokenCounter,
    max_tokens: usize,
}

/// Progress message shown after a read
pub fn progress_message(processed: usize, total: usize) -> String {
    if processed < total {
        format!(
            "Processed {}/{} files due to LLM token limit",
            processed, total
        )
    } else {
        format!("Processed {} files", processed)
    }
}

fn summary_event(summary: &ReportSummary) -> TelemetryEvent {
    let mut event = TelemetryEvent::new(EVENT_FILES_PROCESSED)
        .with_measurement("processedFiles", summary.processed_files as f64)
        .with_measurement("totalFiles", summary.total_candidates as f64);
    for (language, count) in &summary.languages {
        event = event.with_measurement(format!("language.{}", language), *count as f64);
    }
    event
}

impl<'a> RepositoryReader<'a> {
    pub fn new(
        base: impl Into<PathBuf>,
        host: ReaderHost<'a>,
        counter: &'a dyn TokenCounter,
        max_tokens: usize,
    ) -> Self {
        Self {
            base: base.into(),
            host,
            counter,
            max_tokens,
        }
    }

    /// Search, open and budget the repository's files
    ///
    /// Fails with `ReaderError::Configuration` before searching when no
    /// extensions are configured, and with `ReaderError::NoFilesFound`
    /// (after one `noFilesFound` telemetry event) when the search is empty.
    pub async fn read_files(&self) -> Result<ReadReport, ReaderError> {
        let config = self.host.config.snapshot()?;
        let include = include_glob(config.file_extensions.as_deref())?;
        let exclude = exclude_glob(config.exclude_patterns.as_deref());
        let max_files = config.max_files_or_default();

        debug!(
            base = %self.base.display(),
            include = %include,
            exclude = exclude.as_deref().unwrap_or(""),
            max_files,
            "searching for files"
        );

        let handles = self
            .host
            .search
            .find_files(&self.base, &include, exclude.as_deref(), max_files)
            .await
            .map_err(|e| ReaderError::Search(e.into()))?;

        if handles.is_empty() {
            let language = self.host.active_document.language_id();
            self.host.telemetry.send_event(
                TelemetryEvent::new(EVENT_NO_FILES_FOUND)
                    .with_property("languageId", language.as_deref().unwrap_or("none")),
            );
            return Err(ReaderError::NoFilesFound {
                base: self.base.clone(),
                include,
            });
        }

        let report = self.fill_budget(&handles).await;
        let summary = &report.summary;

        info!(
            processed = summary.processed_files,
            total = summary.total_candidates,
            tokens = summary.total_tokens,
            "read complete"
        );

        self.host.notifier.info(&progress_message(
            summary.processed_files,
            summary.total_candidates,
        ));
        self.host.telemetry.send_event(summary_event(summary));

        Ok(report)
    }

    /// Greedy single pass: file i is accepted iff running + cost_i <= budget
    async fn fill_budget(&self, handles: &[FileHandle]) -> ReadReport {
        let mut files = Vec::new();
        let mut file_tokens = Vec::new();
        let mut running = 0usize;
        let mut tally = LanguageTally::new();
        let mut skipped_unreadable = 0usize;

        for handle in handles {
            let document = match self.host.opener.open(handle).await {
                Ok(document) => document,
                Err(e) => {
                    let error = format!("{:#}", e);
                    warn!(path = %handle.relative, error = %error, "skipping unreadable file");
                    skipped_unreadable += 1;
                    continue;
                }
            };

            let file = SourceFile::new(
                handle.relative.clone(),
                document.content,
                document.language_id,
            );
            let encoded = self.host.encoder.encode(&file);

            let cost = match self.counter.count(&encoded).await {
                Ok(cost) => cost,
                Err(e) => {
                    let error = format!("{:#}", e);
                    warn!(path = %file.path, error = %error, "skipping file, token count failed");
                    skipped_unreadable += 1;
                    continue;
                }
            };

            if running.saturating_add(cost) > self.max_tokens {
                debug!(path = %file.path, cost, running, "over token budget");
                continue;
            }

            running += cost;
            tally.record(&file.language_id);
            files.push(file);
            file_tokens.push(cost);
        }

        let summary = ReportSummary {
            total_candidates: handles.len(),
            processed_files: files.len(),
            total_tokens: running,
            max_tokens: self.max_tokens,
            skipped_unreadable,
            languages: tally.snapshot(),
        };

        ReadReport {
            files,
            file_tokens,
            summary,
        }
    }
}

/// Options for the read command
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub settings: SettingsSource,
    pub max_tokens: usize,
    pub token_model: TokenModel,
    pub respect_ignore: bool,
    pub read_config: FileReadConfig,
    pub active_file: Option<PathBuf>,
    pub telemetry_log: Option<PathBuf>,
    pub show_stats: bool,
    pub quiet: bool,
}

fn print_stats(summary: &ReportSummary, model: TokenModel) {
    eprintln!("📚 Read Statistics:");
    eprintln!(
        "   Files: {}/{}",
        summary.processed_files, summary.total_candidates
    );
    eprintln!(
        "   Tokens: {}/{} (model: {})",
        summary.total_tokens, summary.max_tokens, model
    );
    if summary.hit_token_limit() {
        eprintln!(
            "   Skipped: {} (token limit or unreadable)",
            summary.total_candidates - summary.processed_files
        );
    }
    if summary.skipped_unreadable > 0 {
        eprintln!("   Unreadable: {}", summary.skipped_unreadable);
    }
    for (language, count) in &summary.languages {
        eprintln!("   {}: {}", language, count);
    }
    eprintln!();
}

/// Run the read command against the local filesystem
pub async fn run_read(root: &Path, opts: ReadOptions, config: RenderConfig) -> Result<()> {
    let workspace = LocalWorkspace::new(opts.respect_ignore).with_read_config(opts.read_config);
    let counter = BpeCounter::new(opts.token_model);
    let notifier = StderrNotifier::new(opts.quiet);

    let path_active = opts.active_file.clone().map(PathActiveDocument::new);
    let active: &dyn ActiveDocument = match &path_active {
        Some(document) => document,
        None => &NoActiveDocument,
    };

    let jsonl_telemetry = opts.telemetry_log.clone().map(JsonlTelemetry::new);
    let tracing_telemetry = TracingTelemetry;
    let telemetry: &dyn TelemetrySink = match &jsonl_telemetry {
        Some(sink) => sink,
        None => &tracing_telemetry,
    };

    let host = ReaderHost {
        config: &opts.settings,
        search: &workspace,
        opener: &workspace,
        encoder: &FencedEncoder,
        notifier: &notifier,
        telemetry,
        active_document: active,
    };

    let reader = RepositoryReader::new(root, host, &counter, opts.max_tokens);
    let report = reader
        .read_files()
        .await
        .with_context(|| format!("Failed to read repository at {}", root.display()))?;

    if opts.show_stats {
        print_stats(&report.summary, counter.model());
    }

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&ResultSet::from(&report)));

    Ok(())
}
