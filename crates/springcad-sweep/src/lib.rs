#![warn(missing_docs)]

//! Pipe sweeps for springcad.
//!
//! The spring body is a circular wire profile swept along a [`Wire`] of
//! helical edges. Profiles are carried by rotation-minimizing frames so a
//! round wire stays round through pitch changes and cone tapers.
//!
//! [`Wire`]: springcad_geom::Wire

mod frenet;
mod pipe;

pub use frenet::{rotation_minimizing_frames, FrenetFrame};
pub use pipe::{pipe, PipeOptions, ProfileOrientation, TransitionMode};

use springcad_geom::GeomError;
use springcad_kernel::KernelError;
use thiserror::Error;

/// Errors from sweep operations.
#[derive(Debug, Clone, Error)]
pub enum SweepError {
    /// The path has zero length.
    #[error("path has zero length")]
    ZeroLengthPath,

    /// Sampling the path produced too few distinct rings.
    #[error("path sampling produced only {0} rings")]
    TooFewSamples(usize),

    /// The profile is invalid.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// The path wire is malformed.
    #[error(transparent)]
    Geometry(#[from] GeomError),

    /// The swept mesh is not a valid solid.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
