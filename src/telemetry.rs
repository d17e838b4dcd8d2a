//! Analytics initialization: once per process, fire-and-forget.
//!
//! The collector runs on a detached thread so a slow or failing collector
//! can never delay the first frame. Errors are logged and dropped.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::TelemetryError;
use crate::types::AnalyticsConfig;

/// Something that records a session start.
pub trait Collector: Send + 'static {
    fn initialize(&self, config: &AnalyticsConfig) -> Result<(), TelemetryError>;
}

/// One startup record.
#[derive(Debug, Serialize)]
struct SessionStart<'a> {
    event: &'static str,
    measurement_id: &'a str,
    app_id: Option<&'a str>,
    project_id: Option<&'a str>,
    pid: u32,
    unix_time: u64,
}

/// Appends `session_start` records as JSON lines to a local file.
#[derive(Debug, Clone)]
pub struct JsonlCollector {
    path: PathBuf,
}

impl JsonlCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Collector for JsonlCollector {
    fn initialize(&self, config: &AnalyticsConfig) -> Result<(), TelemetryError> {
        let unix_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let record = SessionStart {
            event: "session_start",
            measurement_id: &config.measurement_id,
            app_id: config.app_id.as_deref(),
            project_id: config.project_id.as_deref(),
            pid: std::process::id(),
            unix_time,
        };
        let line = serde_json::to_string(&record)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Once-only gate around a collector.
#[derive(Debug, Default)]
pub struct Telemetry {
    started: AtomicBool,
}

impl Telemetry {
    pub const fn new() -> Self {
        Self {
            started: AtomicBool::new(false),
        }
    }

    /// The process-wide instance used by the binary.
    pub fn global() -> &'static Telemetry {
        static GLOBAL: Telemetry = Telemetry::new();
        &GLOBAL
    }

    /// Start the collector in the background, the first time only.
    ///
    /// Returns the worker's handle on the first call, None afterwards or
    /// when there is nothing to initialize. Callers normally drop the handle.
    pub fn initialize<C: Collector>(
        &self,
        collector: C,
        config: Option<&AnalyticsConfig>,
    ) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let Some(config) = config.cloned() else {
            warn!(error = %TelemetryError::NotConfigured, "analytics skipped");
            return None;
        };

        let spawned = thread::Builder::new()
            .name("analytics".into())
            .spawn(move || match collector.initialize(&config) {
                Ok(()) => info!(measurement_id = %config.measurement_id, "analytics initialized"),
                Err(e) => warn!(error = %e, "analytics initialization failed"),
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "could not start analytics thread");
                None
            }
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

// ============================================================================
// TESTS
// ============================================================================
