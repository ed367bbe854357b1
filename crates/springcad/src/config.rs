//! Pipeline configuration: tolerances, sweep resolution and tracing.

use serde::{Deserialize, Serialize};
use springcad_math::Tolerance;
use springcad_sweep::PipeOptions;
use tracing::Level;

/// Verbosity of pipeline tracing when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceLevel {
    /// Stage summaries only.
    Info,
    /// Per-segment detail.
    #[default]
    Debug,
    /// Everything, including per-ring sweep detail.
    Trace,
}

impl From<TraceLevel> for Level {
    fn from(l: TraceLevel) -> Self {
        match l {
            TraceLevel::Info => Level::INFO,
            TraceLevel::Debug => Level::DEBUG,
            TraceLevel::Trace => Level::TRACE,
        }
    }
}

/// Switch for structured diagnostic events from the pipeline.
///
/// Warnings and errors are always emitted; anything more verbose only
/// when `enabled` is set and the event is within `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Emit events below `warn`.
    pub enabled: bool,
    /// Most verbose level emitted when enabled.
    pub level: TraceLevel,
}

impl TraceConfig {
    /// Tracing switched on at `level`.
    pub fn on(level: TraceLevel) -> Self {
        Self {
            enabled: true,
            level,
        }
    }

    /// Whether an event at `level` should be emitted.
    pub fn allows(&self, level: Level) -> bool {
        level <= Level::WARN || (self.enabled && level <= Level::from(self.level))
    }
}

/// Settings shared by every stage of the spring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Geometric confusion tolerance in mm.
    pub tolerance: f64,
    /// Path samples per helix turn when sweeping.
    pub samples_per_turn: usize,
    /// Sides of the polygon approximating the wire cross-section.
    pub profile_segments: usize,
    /// Samples used to fit a cubic pitch blend.
    pub transition_samples: usize,
    /// Sanity cap on total turns.
    pub max_turns: f64,
    /// Diagnostic tracing.
    pub trace: TraceConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-7,
            samples_per_turn: 48,
            profile_segments: 24,
            transition_samples: 16,
            max_turns: 1e4,
            trace: TraceConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Tolerance bundle for geometry construction.
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::with_linear(self.tolerance)
    }

    /// Pipe sweep options derived from this configuration.
    pub fn pipe_options(&self) -> PipeOptions {
        PipeOptions {
            profile_segments: self.profile_segments.max(3),
            density: self.samples_per_turn.max(4) as f64 / 48.0,
            tolerance: self.tolerance(),
            trace: self.trace.allows(Level::DEBUG),
            ..PipeOptions::default()
        }
    }
}

/// Emit a tracing event only when the pipeline's [`TraceConfig`] allows it.
#[macro_export]
macro_rules! pipeline_event {
    ($trace:expr, $lvl:ident, $($arg:tt)+) => {
        if $trace.allows(::tracing::Level::$lvl) {
            ::tracing::event!(::tracing::Level::$lvl, $($arg)+);
        }
    };
}
