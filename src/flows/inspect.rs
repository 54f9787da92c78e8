//! Config inspection flow - Show the resolved settings and globs
//!
//! Useful for checking which settings file was picked up and what the
//! reader would search for, without reading any files.

use anyhow::Result;
use serde_json::json;

use crate::backends::settings::SettingsSource;
use crate::core::error::ReaderError;
use crate::core::model::{ItemError, ResultItem, ResultSet};
use crate::core::patterns::{exclude_glob, include_glob};
use crate::core::paths::normalize_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::host::ConfigurationSource;

/// Resolve configuration into a summary item, or an error item
pub fn inspect_config(settings: &SettingsSource) -> ResultItem {
    match describe(settings) {
        Ok(item) => item,
        Err(e) => ResultItem::error(ItemError::new(e.code(), e.to_string())),
    }
}

fn describe(settings: &SettingsSource) -> Result<ResultItem, ReaderError> {
    let config = settings.snapshot()?;
    let include = include_glob(config.file_extensions.as_deref())?;
    let exclude = exclude_glob(config.exclude_patterns.as_deref());
    let max_files = config.max_files_or_default();

    Ok(ResultItem::summary(json!({
        "settingsFile": settings.path().map(normalize_path),
        "namespace": settings.namespace(),
        "config": config,
        "effectiveMaxFiles": max_files,
        "includeGlob": include,
        "excludeGlob": exclude,
    })))
}

/// Run the config command
///
/// Fails after rendering when the configuration cannot drive a read.
pub fn run_config(settings: &SettingsSource, config: RenderConfig) -> Result<()> {
    let item = inspect_config(settings);
    let failed = !item.errors.is_empty();

    let mut result_set = ResultSet::new();
    result_set.push(item);

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    if failed {
        anyhow::bail!("configuration cannot be used for a read");
    }
    Ok(())
}
