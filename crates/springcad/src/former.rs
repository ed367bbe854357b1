//! Solid former: sweeps the wire profile along the path, grinds the ends
//! flat for ground end types, then hands the body to the variant's
//! post-processing step.

use springcad_kernel::{Aabb3, Shape};
use springcad_math::Point3;
use springcad_sweep::pipe;

use crate::config::PipelineConfig;
use crate::partition::Partition;
use crate::path::SpringPath;
use crate::variant::PostProcess;
use crate::{pipeline_event, Result};

/// Slab boxes that remove everything below `z = 0` and above
/// `z = free_length`.
///
/// Each box covers `bounds` grown by the wire diameter in x and y and is
/// at least `max(pitch, d) + d` thick, so one box always swallows the
/// whole protruding end coil.
pub fn ground_cutters(bounds: &Aabb3, free_length: f64, pitch: f64, d: f64) -> [Aabb3; 2] {
    let thickness = pitch.max(d) + d;
    let (x0, y0) = (bounds.min.x - d, bounds.min.y - d);
    let (x1, y1) = (bounds.max.x + d, bounds.max.y + d);
    let bottom = Aabb3::new(
        Point3::new(x0, y0, (-thickness).min(bounds.min.z - d)),
        Point3::new(x1, y1, 0.0),
    );
    let top = Aabb3::new(
        Point3::new(x0, y0, free_length),
        Point3::new(x1, y1, (free_length + thickness).max(bounds.max.z + d)),
    );
    [bottom, top]
}

/// Sweep, grind and post-process one spring.
pub fn form_solid(
    path: &SpringPath,
    partition: &Partition,
    free_length: f64,
    config: &PipelineConfig,
    post: &PostProcess,
) -> Result<Shape> {
    let d = 2.0 * partition.profile_radius;
    let mut body = pipe(path.wire(), partition.profile_radius, &config.pipe_options())?;
    pipeline_event!(
        config.trace,
        DEBUG,
        triangles = body.num_triangles(),
        volume = body.volume(),
        "coil body swept"
    );

    if partition.end_type.is_ground() {
        let cutters = ground_cutters(&body.bounding_box(), free_length, partition.body_pitch, d);
        body = body.difference(&cutters, config.tolerance)?;
        pipeline_event!(
            config.trace,
            DEBUG,
            z_min = body.bounding_box().min.z,
            z_max = body.bounding_box().max.z,
            "ends ground flat"
        );
    }

    post(path, body)
}
