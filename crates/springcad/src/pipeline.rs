//! The recompute pipeline: validate, partition, build the path, form the
//! solid.

use springcad_kernel::Shape;

use crate::config::PipelineConfig;
use crate::former::form_solid;
use crate::params::SpringParameters;
use crate::partition::Partition;
use crate::path::SpringPath;
use crate::{pipeline_event, Result};

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct SpringOutput {
    /// Pitch and coil layout.
    pub partition: Partition,
    /// The helical wire path.
    pub path: SpringPath,
    /// The finished solid (a compound when the variant adds pieces).
    pub shape: Shape,
    /// Total wire length, legs included.
    pub length: f64,
    /// Height of the helical path.
    pub height: f64,
}

/// Run the full pipeline for `params`.
///
/// The algorithm version and the variant's post-processing step are
/// resolved once here and passed down explicitly.
pub fn build_spring(params: &SpringParameters, config: &PipelineConfig) -> Result<SpringOutput> {
    params.validate(config)?;
    pipeline_event!(
        config.trace,
        INFO,
        end_type = %params.effective_end_type(),
        algorithm = ?params.algorithm,
        variant = ?params.variant,
        "building spring"
    );

    let partition = Partition::compute(params, config)?;
    let path = SpringPath::build(&partition, params.handedness, config)?;
    let post = params
        .variant
        .post_process(params.profile_radius(), config.profile_segments);
    let shape = form_solid(&path, &partition, params.free_length_value(), config, &post)?;

    let length = path.length() + params.variant.extra_length(&path);
    let height = partition.height;
    pipeline_event!(
        config.trace,
        INFO,
        length,
        height,
        solids = shape.solids().len(),
        "spring built"
    );
    Ok(SpringOutput {
        partition,
        path,
        shape,
        length,
        height,
    })
}
