//! Structured logging setup
//!
//! The library only emits `tracing` events; binaries and tests install a
//! subscriber once through [`init_tracing`]. `RUST_LOG` overrides the
//! configured filter when set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Once;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Subscriber settings for the loot engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub level: LogLevel,
    /// Per-target overrides, e.g. `loot_core::drops` → debug
    pub targets: BTreeMap<String, LogLevel>,
    pub with_target: bool,
    pub with_source_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let mut targets = BTreeMap::new();
        // per-drop spawn/pickup chatter stays quiet unless asked for
        targets.insert("loot_core::drops".to_string(), LogLevel::Info);
        targets.insert("loot_core::hotreload".to_string(), LogLevel::Debug);
        Self {
            level: LogLevel::Info,
            targets,
            with_target: true,
            with_source_location: false,
        }
    }
}

impl TracingConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_target_level(mut self, target: &str, level: LogLevel) -> Self {
        self.targets.insert(target.to_string(), level);
        self
    }

    /// Debug output for table resolution and the drop lifecycle
    pub fn verbose_drops() -> Self {
        Self::default()
            .with_target_level("loot_core::loot", LogLevel::Debug)
            .with_target_level("loot_core::drops", LogLevel::Debug)
            .with_target_level("loot_core::session", LogLevel::Debug)
    }

    /// `EnvFilter` directive string: default level first, then targets in order
    pub fn directives(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber. First call wins; later calls are no-ops.
pub fn init_tracing(config: &TracingConfig) {
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.directives()));

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location)
            .compact()
            .try_init();

        // a host app may already own the global subscriber
        if result.is_err() {
            tracing::debug!("Global subscriber already installed");
        }
    });
}

/// Entered span that reports elapsed time, and throughput when given a count
pub struct TimingSpan {
    label: &'static str,
    started: Instant,
    units: Option<u64>,
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
            units: None,
            _span: tracing::info_span!("loot_op", label).entered(),
        }
    }

    /// Also log `units / second` (rolls, kills, drops) when the span closes
    pub fn counting(label: &'static str, units: u64) -> Self {
        let mut span = Self::new(label);
        span.units = Some(units);
        span
    }
}

impl Drop for TimingSpan {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        match self.units {
            Some(units) if elapsed > 0.0 => tracing::info!(
                label = self.label,
                elapsed_ms = elapsed * 1000.0,
                per_sec = units as f64 / elapsed,
                "Finished"
            ),
            _ => tracing::info!(label = self.label, elapsed_ms = elapsed * 1000.0, "Finished"),
        }
    }
}
