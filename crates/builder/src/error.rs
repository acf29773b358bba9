use file_format::{ExportError, LoadError};
use gate_kernel::SceneError;
use thiserror::Error;

use crate::library::SegmentId;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("segment extent must be positive, got {extent}")]
    InvalidExtent { extent: f64 },

    #[error("base segment {0:?} is not in the library")]
    MissingSegment(SegmentId),

    #[error("tiling produced no segments for a {width} x {height} target")]
    EmptyTiling { width: f64, height: f64 },
}
