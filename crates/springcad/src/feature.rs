//! The parametric spring feature: owns the parameters, tracks which of
//! them changed, and recomputes the pipeline on demand.
//!
//! Outputs are withheld while the feature is dirty, so a reader never sees
//! values derived from older parameters than the current ones. A failed
//! recompute keeps the last good shape and derived values and records the
//! error; it is not retried until a parameter changes.

use std::collections::BTreeSet;

use serde::Serialize;
use springcad_kernel::Shape;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::design::{DesignReport, Material};
use crate::params::SpringParameters;
use crate::partition::Partition;
use crate::pipeline::{build_spring, SpringOutput};
use crate::{pipeline_event, Result, SpringError};

/// Recompute state of a [`SpringFeature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureState {
    /// Outputs match the parameters.
    Clean,
    /// A parameter changed since the last recompute.
    Dirty,
    /// The pipeline is running.
    Recomputing,
    /// The last recompute failed; outputs are from the last success.
    Error,
}

/// A spring with editable parameters and derived outputs.
#[derive(Debug)]
pub struct SpringFeature {
    params: SpringParameters,
    config: PipelineConfig,
    state: FeatureState,
    dirty: BTreeSet<&'static str>,
    output: Option<SpringOutput>,
    last_error: Option<SpringError>,
}

impl SpringFeature {
    /// New feature with the default pipeline configuration.
    pub fn new(params: SpringParameters) -> Self {
        Self::with_config(params, PipelineConfig::default())
    }

    /// New feature; every parameter starts dirty.
    pub fn with_config(params: SpringParameters, config: PipelineConfig) -> Self {
        Self {
            params,
            config,
            state: FeatureState::Dirty,
            dirty: SpringParameters::FIELDS.iter().copied().collect(),
            output: None,
            last_error: None,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &SpringParameters {
        &self.params
    }

    /// Pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Recompute state.
    pub fn state(&self) -> FeatureState {
        self.state
    }

    /// Error from the most recent failed recompute.
    pub fn last_error(&self) -> Option<&SpringError> {
        self.last_error.as_ref()
    }

    /// Names of parameters changed since the last recompute.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dirty.iter().copied()
    }

    /// Replace the parameters, marking whichever fields differ.
    pub fn set_params(&mut self, params: SpringParameters) {
        let changed = self.params.changed_fields(&params);
        if changed.is_empty() {
            return;
        }
        pipeline_event!(
            self.config.trace,
            DEBUG,
            fields = ?changed,
            "spring parameters changed"
        );
        self.dirty.extend(changed);
        self.params = params;
        self.state = FeatureState::Dirty;
    }

    /// Edit the parameters in place.
    pub fn update(&mut self, edit: impl FnOnce(&mut SpringParameters)) {
        let mut params = self.params.clone();
        edit(&mut params);
        self.set_params(params);
    }

    /// Replace the pipeline configuration.
    pub fn set_config(&mut self, config: PipelineConfig) {
        if config != self.config {
            self.config = config;
            self.dirty.insert("pipeline");
            self.state = FeatureState::Dirty;
        }
    }

    /// True when a tracked field changed since the last recompute.
    pub fn must_execute(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Run the pipeline, publishing outputs only on success.
    pub fn execute(&mut self) -> Result<()> {
        self.state = FeatureState::Recomputing;
        self.dirty.clear();
        match build_spring(&self.params, &self.config) {
            Ok(output) => {
                self.output = Some(output);
                self.last_error = None;
                self.state = FeatureState::Clean;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "spring recompute failed; keeping last good shape");
                self.last_error = Some(e.clone());
                self.state = FeatureState::Error;
                Err(e)
            }
        }
    }

    /// Recompute if anything is dirty, otherwise report the standing
    /// error, if any.
    pub fn ensure_current(&mut self) -> Result<()> {
        if self.must_execute() {
            return self.execute();
        }
        match (&self.state, &self.last_error) {
            (FeatureState::Error, Some(e)) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    /// Last good pipeline output; `None` while the feature is dirty.
    pub fn output(&self) -> Option<&SpringOutput> {
        match self.state {
            FeatureState::Dirty | FeatureState::Recomputing => None,
            FeatureState::Clean | FeatureState::Error => self.output.as_ref(),
        }
    }

    /// Last good shape, or an empty shape while dirty or before the first
    /// success.
    pub fn shape(&self) -> &Shape {
        const EMPTY: &Shape = &Shape::Empty;
        self.output().map_or(EMPTY, |o| &o.shape)
    }

    /// Last good wire length.
    pub fn length(&self) -> Option<f64> {
        self.output().map(|o| o.length)
    }

    /// Last good path height.
    pub fn height(&self) -> Option<f64> {
        self.output().map(|o| o.height)
    }

    /// Last good partition.
    pub fn partition(&self) -> Option<&Partition> {
        self.output().map(|o| &o.partition)
    }

    /// Recompute if needed, then summarize the feature.
    ///
    /// A failed recompute is not an error here; it shows up in the
    /// report's `state` and `error` fields.
    pub fn report(&mut self, material: &Material) -> FeatureReport {
        let _ = self.ensure_current();
        FeatureReport {
            state: self.state,
            error: self.last_error.as_ref().map(ToString::to_string),
            params: self.params.clone(),
            length: self.length(),
            height: self.height(),
            partition: self.partition().cloned(),
            design: DesignReport::compute(&self.params, material),
            solid: self.output().map(|o| SolidSummary::of(&o.shape)),
        }
    }
}

/// Triangle count, volume and bounds of a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidSummary {
    /// Number of separate solids.
    pub solids: usize,
    /// Total triangles.
    pub triangles: usize,
    /// Total enclosed volume.
    pub volume: f64,
    /// Minimum corner of the bounding box.
    pub min: [f64; 3],
    /// Maximum corner of the bounding box.
    pub max: [f64; 3],
}

impl SolidSummary {
    /// Summarize `shape`.
    pub fn of(shape: &Shape) -> Self {
        let bb = shape.bounding_box();
        Self {
            solids: shape.solids().len(),
            triangles: shape.num_triangles(),
            volume: shape.volume(),
            min: [bb.min.x, bb.min.y, bb.min.z],
            max: [bb.max.x, bb.max.y, bb.max.z],
        }
    }
}

impl FeatureReport {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Everything worth reporting about a feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    /// Recompute state.
    pub state: FeatureState,
    /// Last error message.
    pub error: Option<String>,
    /// Current parameters.
    pub params: SpringParameters,
    /// Wire length, legs included.
    pub length: Option<f64>,
    /// Path height.
    pub height: Option<f64>,
    /// Pitch and coil layout.
    pub partition: Option<Partition>,
    /// Design calculations for the current parameters.
    pub design: DesignReport,
    /// Summary of the last good solid.
    pub solid: Option<SolidSummary>,
}
