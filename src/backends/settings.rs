//! Settings file backend
//!
//! Loads reader settings from a VS Code style `settings.json`. The file may
//! contain `//` and `/* */` comments and trailing commas. Keys live under a
//! namespace, either flat (`"repoReader.fileExtensions"`) or nested
//! (`{"repoReader": {"fileExtensions": [...]}}`). Flat keys win.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::ReaderError;
use crate::core::model::ReaderConfig;
use crate::core::paths::{resolve_under, workspace_settings_path};
use crate::host::ConfigurationSource;

/// Default settings namespace
pub const DEFAULT_NAMESPACE: &str = "repoReader";

/// Setting keys read under the namespace
const SETTING_KEYS: [&str; 3] = ["fileExtensions", "excludePatterns", "maxFiles"];

/// Settings file layer with per-key overrides on top
#[derive(Debug, Clone)]
pub struct SettingsSource {
    path: Option<PathBuf>,
    /// An explicitly requested file must exist
    required: bool,
    namespace: String,
    overrides: ReaderConfig,
}

impl SettingsSource {
    /// Resolve the settings file for `base`
    ///
    /// An explicit path is resolved against `base` and must exist. Without
    /// one, `<base>/.vscode/settings.json` is used when present.
    pub fn for_base(
        base: &Path,
        explicit: Option<&Path>,
        namespace: Option<&str>,
        overrides: ReaderConfig,
    ) -> Self {
        let (path, required) = match explicit {
            Some(p) => (Some(resolve_under(base, p)), true),
            None => {
                let default = workspace_settings_path(base);
                (default.is_file().then_some(default), false)
            }
        };

        Self {
            path,
            required,
            namespace: namespace.unwrap_or(DEFAULT_NAMESPACE).to_string(),
            overrides,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn load_file(&self, path: &Path) -> Result<ReaderConfig, ReaderError> {
        let settings_error = |reason: String| ReaderError::Settings {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            if self.required {
                return Err(settings_error("file not found".to_string()));
            }
            return Ok(ReaderConfig::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
        let value: Value = serde_json::from_str(&strip_jsonc(&raw))
            .map_err(|e| settings_error(e.to_string()))?;

        let config = extract_namespace(&value, &self.namespace).map_err(settings_error)?;
        debug!(path = %path.display(), namespace = %self.namespace, "loaded settings");
        Ok(config)
    }
}

impl ConfigurationSource for SettingsSource {
    fn snapshot(&self) -> Result<ReaderConfig, ReaderError> {
        let base = match &self.path {
            Some(path) => self.load_file(path)?,
            None => ReaderConfig::default(),
        };
        Ok(base.merged_with(self.overrides.clone()))
    }
}

/// Pick the namespaced keys out of a settings document
fn extract_namespace(value: &Value, namespace: &str) -> Result<ReaderConfig, String> {
    let root = value
        .as_object()
        .ok_or_else(|| "settings root must be a JSON object".to_string())?;
    let nested = root.get(namespace).and_then(Value::as_object);

    let mut picked = Map::new();
    for key in SETTING_KEYS {
        let flat = root.get(&format!("{}.{}", namespace, key));
        let found = flat.or_else(|| nested.and_then(|n| n.get(key)));
        if let Some(v) = found {
            picked.insert(key.to_string(), v.clone());
        }
    }

    serde_json::from_value(Value::Object(picked)).map_err(|e| e.to_string())
}

/// Remove comments and trailing commas so the text parses as strict JSON
pub fn strip_jsonc(input: &str) -> String {
    let without_comments = strip_comments(input);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 1;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some(&'}') | Some(&']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}
