#![warn(missing_docs)]

//! springcad: parametric helical springs.
//!
//! Builds compression, extension and torsion springs from a handful of
//! engineering parameters. The pipeline runs in four steps:
//!
//! 1. [`SpringParameters::validate`] checks bounds.
//! 2. [`Partition::compute`] splits the coils into closed ends, pitch
//!    transitions and the main body according to the end type.
//! 3. [`SpringPath::build`] lays those rows out on the `(angle, height)`
//!    chart of a cylinder or cone and joins them into one tangent-continuous
//!    wire.
//! 4. [`form_solid`] sweeps the wire cross-section along the path, grinds
//!    ground ends flat and runs the variant's post-processing.
//!
//! [`SpringFeature`] wraps the pipeline with change tracking and keeps the
//! last good shape when a recompute fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use springcad::{EndType, SpringFeature, SpringParameters};
//!
//! let params = SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, EndType::ClosedGround);
//! let mut spring = SpringFeature::new(params);
//! spring.ensure_current().unwrap();
//! println!("wire length {:.2} mm", spring.length().unwrap());
//! ```

pub mod config;
pub mod design;
pub mod document;
mod error;
pub mod feature;
pub mod former;
pub mod params;
pub mod partition;
pub mod path;
pub mod pipeline;
pub mod variant;

pub use config::{PipelineConfig, TraceConfig, TraceLevel};
pub use design::{DesignReport, Material};
pub use document::SpringDocument;
pub use error::{ConfigError, Result, SpringError};
pub use feature::{FeatureReport, FeatureState, SolidSummary, SpringFeature};
pub use former::form_solid;
pub use params::{AlgorithmVersion, Dimensioning, EndType, Handedness, SpringParameters};
pub use partition::{Partition, PartitionSegment, SegmentKind, SegmentRole};
pub use path::{ChartCurve, HelixSegment, SpringPath};
pub use pipeline::{build_spring, SpringOutput};
pub use variant::{PostProcess, SpringVariant};

pub use springcad_kernel::{Shape, Solid};
