//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::backends::settings::SettingsSource;
use crate::core::file_reader::{EncodingStrategy, FileReadConfig, DEFAULT_MAX_FILE_SIZE};
use crate::core::model::ReaderConfig;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::tokenizer::TokenModel;
use crate::flows::read::{ReadOptions, DEFAULT_MAX_TOKENS};

/// repo-reader - gather a repository's source files into an LLM token budget.
#[derive(Parser, Debug)]
#[command(name = "repo-reader")]
#[command(
    author,
    version,
    about,
    long_about = r#"repo-reader finds the source files of a repository by extension, reads them,
and keeps as many as fit in a token budget, in stable path order.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools/LLMs)
- json: a single JSON array
- md: human-friendly Markdown with fenced file contents
- raw: file contents only (unstable; intended for debugging)

Examples:
    repo-reader read --ext rs --ext toml
    repo-reader read --max-tokens 8000 --stats
    repo-reader --format md read --exclude "**/target/**"
    repo-reader config
"#
)]
pub struct Cli {
    /// Root directory to read.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory to read (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and the default settings\n\
file is looked up at ROOT/.vscode/settings.json."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping and prompts."
    )]
    pub format: String,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress the progress message and lower logging to warnings. Results are\n\
still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug logging on stderr: search globs, per-file skip reasons and\n\
budget rejections. RUST_LOG overrides this."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings layering shared by every command
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Settings file (JSON with comments).
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Settings file to load (relative to ROOT unless absolute).\n\n\
If omitted, ROOT/.vscode/settings.json is used when present. An explicitly\n\
given file must exist."
    )]
    pub settings: Option<PathBuf>,

    /// Settings namespace (default: repoReader).
    #[arg(
        long,
        value_name = "NS",
        env = "REPO_READER_NAMESPACE",
        long_help = "Namespace the settings keys live under, either flat\n\
(\"NS.fileExtensions\") or nested ({\"NS\": {\"fileExtensions\": [...]}})."
    )]
    pub namespace: Option<String>,

    /// File extensions to include (overrides fileExtensions).
    #[arg(
        long = "ext",
        value_name = "EXT",
        value_delimiter = ',',
        long_help = "File extensions to include, without the dot. Repeat or comma-separate.\n\n\
Example: --ext rs,toml --ext md"
    )]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude (overrides excludePatterns).
    #[arg(
        long,
        value_name = "PATTERN",
        long_help = "Glob patterns matched against root-relative paths. Repeatable.\n\n\
Example: --exclude \"**/node_modules/**\" --exclude \"**/target/**\""
    )]
    pub exclude: Vec<String>,

    /// Maximum number of candidate files (overrides maxFiles).
    #[arg(
        long,
        value_name = "N",
        long_help = "Maximum number of candidate files returned by the search (default 1000)."
    )]
    pub max_files: Option<usize>,
}

impl SettingsArgs {
    /// CLI overrides; an empty list means the key was not given
    fn overrides(&self) -> ReaderConfig {
        ReaderConfig {
            file_extensions: (!self.extensions.is_empty()).then(|| self.extensions.clone()),
            exclude_patterns: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            max_files: self.max_files,
        }
    }

    fn source(&self, root: &Path) -> SettingsSource {
        SettingsSource::for_base(
            root,
            self.settings.as_deref(),
            self.namespace.as_deref(),
            self.overrides(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the repository's files into the token budget.
    #[command(
        long_about = "Search ROOT for files with the configured extensions, open each in path\n\
order, and keep every file whose encoded token cost still fits the budget.\n\n\
A file that does not fit is skipped; later, smaller files may still be taken.\n\
The progress message on stderr reports K/N when the budget cut files.\n\n\
Examples:\n\
  repo-reader read --ext rs\n\
  repo-reader read --max-tokens 32000 --model o200k --stats\n\
  repo-reader read --settings team-settings.json --namespace team\n"
    )]
    Read {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Token budget for accepted files.
        #[arg(
            long,
            value_name = "N",
            default_value_t = DEFAULT_MAX_TOKENS,
            long_help = "Token budget. A file is accepted only while the running total plus its\n\
cost stays within this limit."
        )]
        max_tokens: usize,

        /// Tokenizer model (cl100k/o200k/heuristic).
        #[arg(
            long,
            value_name = "MODEL",
            default_value = "cl100k",
            long_help = "Tokenizer used to cost each encoded file.\n\n\
Supported values:\n\
- cl100k (default; aliases gpt4, gpt-4, claude3)\n\
- o200k (aliases gpt4o, gpt-4o)\n\
- heuristic (fast character-based estimate)"
        )]
        model: String,

        /// Disable .gitignore and other ignore rules.
        #[arg(
            long,
            long_help = "Disable respect for ignore files (.gitignore, .ignore, global\n\
ignores).\n\n\
Hidden files are still skipped."
        )]
        no_ignore: bool,

        /// Skip files larger than this many bytes.
        #[arg(
            long,
            value_name = "BYTES",
            default_value_t = DEFAULT_MAX_FILE_SIZE,
            long_help = "Files larger than this are treated as unreadable and skipped\n\
(default 4 MiB)."
        )]
        max_file_size: u64,

        /// Skip files that are not valid UTF-8.
        #[arg(
            long,
            long_help = "Treat files with invalid UTF-8 as unreadable. By default invalid\n\
sequences are replaced with U+FFFD and the file is kept."
        )]
        strict_utf8: bool,

        /// File treated as the focused document.
        #[arg(
            long,
            value_name = "FILE",
            long_help = "File whose language is reported in the noFilesFound telemetry event."
        )]
        active_file: Option<PathBuf>,

        /// Append telemetry events to this JSONL file.
        #[arg(
            long,
            value_name = "FILE",
            env = "REPO_READER_TELEMETRY_LOG",
            long_help = "Append telemetry events as JSON lines to FILE. Without it, events are\n\
emitted as tracing records."
        )]
        telemetry_log: Option<PathBuf>,

        /// Show read statistics on stderr.
        #[arg(
            long,
            long_help = "Print file counts, token totals and the per-language tally to stderr."
        )]
        stats: bool,
    },

    /// Show the resolved configuration and search globs.
    #[command(
        long_about = "Resolve settings (defaults < settings file < CLI flags) and print them with\n\
the include/exclude globs a read would use. No files are read.\n\n\
Examples:\n\
  repo-reader config\n\
  repo-reader config --ext ts,tsx --exclude \"**/dist/**\"\n"
    )]
    Config {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Read {
            settings,
            max_tokens,
            model,
            no_ignore,
            max_file_size,
            strict_utf8,
            active_file,
            telemetry_log,
            stats,
        } => {
            let token_model: TokenModel = model.parse().map_err(anyhow::Error::msg)?;

            let opts = ReadOptions {
                settings: settings.source(&root),
                max_tokens,
                token_model,
                respect_ignore: !no_ignore,
                read_config: FileReadConfig {
                    max_file_size,
                    encoding_strategy: if strict_utf8 {
                        EncodingStrategy::Skip
                    } else {
                        EncodingStrategy::Lossy
                    },
                },
                active_file,
                telemetry_log,
                show_stats: stats,
                quiet: cli.quiet,
            };
            crate::flows::read::run_read(&root, opts, render_config).await
        }

        Commands::Config { settings } => {
            crate::flows::inspect::run_config(&settings.source(&root), render_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_read_overrides() {
        let cli = Cli::try_parse_from([
            "repo-reader",
            "read",
            "--ext",
            "rs,toml",
            "--ext",
            "md",
            "--exclude",
            "**/target/**",
            "--max-files",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Read {
                settings,
                max_tokens,
                ..
            } => {
                let overrides = settings.overrides();
                assert_eq!(
                    overrides.file_extensions,
                    Some(vec!["rs".to_string(), "toml".into(), "md".into()])
                );
                assert_eq!(overrides.exclude_patterns, Some(vec!["**/target/**".to_string()]));
                assert_eq!(overrides.max_files, Some(5));
                assert_eq!(max_tokens, DEFAULT_MAX_TOKENS);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_absent_overrides_stay_absent() {
        let cli = Cli::try_parse_from(["repo-reader", "config"]).unwrap();
        match cli.command {
            Commands::Config { settings } => {
                assert_eq!(settings.overrides(), ReaderConfig::default());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["repo-reader", "read", "--format", "md", "-q", "--pretty"])
            .unwrap();
        assert_eq!(cli.format, "md");
        assert!(cli.quiet);
        assert!(cli.pretty);
    }
}
