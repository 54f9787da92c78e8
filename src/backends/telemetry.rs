//! Telemetry sinks
//!
//! Delivery is fire-and-forget: a sink never fails the read that emits it.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::host::{TelemetryEvent, TelemetrySink};

/// One telemetry log line
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    event: &'a str,
    timestamp: String,
    properties: &'a BTreeMap<String, String>,
    measurements: &'a BTreeMap<String, f64>,
}

/// Appends events as JSON lines to a log file
#[derive(Debug, Clone)]
pub struct JsonlTelemetry {
    path: PathBuf,
}

impl JsonlTelemetry {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn append(&self, event: &TelemetryEvent) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let record = LogRecord {
            event: &event.name,
            timestamp: chrono::Utc::now().to_rfc3339(),
            properties: &event.properties,
            measurements: &event.measurements,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open telemetry log: {:?}", self.path))?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        Ok(())
    }
}

impl TelemetrySink for JsonlTelemetry {
    fn send_event(&self, event: TelemetryEvent) {
        if let Err(e) = self.append(&event) {
            warn!(event = %event.name, error = %format!("{:#}", e), "dropping telemetry event");
        }
    }
}

/// Emits events as tracing records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn send_event(&self, event: TelemetryEvent) {
        info!(
            event = %event.name,
            properties = ?event.properties,
            measurements = ?event.measurements,
            "telemetry"
        );
    }
}

/// Records events for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(test)]
impl MemoryTelemetry {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl TelemetrySink for MemoryTelemetry {
    fn send_event(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}
