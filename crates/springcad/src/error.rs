//! Error types for spring construction.

use springcad_geom::GeomError;
use springcad_kernel::KernelError;
use springcad_sweep::SweepError;
use thiserror::Error;

/// Errors that can occur while recomputing a spring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpringError {
    /// Parameters rejected before any geometry is built.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Path or solid construction failed.
    #[error("geometry construction failed: {0}")]
    GeometryConstruction(String),

    /// The solid kernel failed for reasons outside the spring math.
    #[error("kernel failure: {0}")]
    KernelFailure(String),
}

impl SpringError {
    /// Shorthand for [`SpringError::InvalidParameters`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        SpringError::InvalidParameters(msg.into())
    }

    /// Shorthand for [`SpringError::GeometryConstruction`].
    pub fn geometry(msg: impl Into<String>) -> Self {
        SpringError::GeometryConstruction(msg.into())
    }
}

impl From<GeomError> for SpringError {
    fn from(e: GeomError) -> Self {
        SpringError::GeometryConstruction(e.to_string())
    }
}

impl From<SweepError> for SpringError {
    fn from(e: SweepError) -> Self {
        match e {
            SweepError::Kernel(k) => k.into(),
            other => SpringError::GeometryConstruction(format!("sweep failed: {other}")),
        }
    }
}

impl From<KernelError> for SpringError {
    fn from(e: KernelError) -> Self {
        SpringError::KernelFailure(e.to_string())
    }
}

/// Result type for spring operations.
pub type Result<T> = std::result::Result<T, SpringError>;

/// Errors reading or writing spring definition files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text could not be parsed into a spring document.
    #[error("failed to parse spring document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The document could not be serialized.
    #[error("failed to write spring document: {0}")]
    Write(#[from] toml::ser::Error),

    /// The document parsed but its values are out of range.
    #[error(transparent)]
    Invalid(#[from] SpringError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_errors_map_to_kernel_failure() {
        let e: SpringError = KernelError::EmptySolid.into();
        assert!(matches!(e, SpringError::KernelFailure(_)));
        let e: SpringError = SweepError::Kernel(KernelError::NonFinite).into();
        assert!(matches!(e, SpringError::KernelFailure(_)));
    }

    #[test]
    fn test_geometry_errors_map_to_geometry_construction() {
        let e: SpringError = GeomError::EmptyWire.into();
        assert!(matches!(e, SpringError::GeometryConstruction(_)));
        let e: SpringError = SweepError::ZeroLengthPath.into();
        assert_eq!(
            e.to_string(),
            "geometry construction failed: sweep failed: path has zero length"
        );
    }
}
