//! Backends module - Local implementations of the host collaborators
//!
//! Provides:
//! - workspace: File search and open over the local filesystem
//! - settings: Settings file loading with CLI overrides
//! - notify: User-facing progress messages
//! - telemetry: Telemetry sinks (JSONL log, tracing)

pub mod notify;
pub mod settings;
pub mod telemetry;
pub mod workspace;
