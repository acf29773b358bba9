//! Helper functions: error type, stage runner, coordinate math.

use std::path::{Path, PathBuf};

use file_format::obj::{GATE_OBJ_FILE, SCENE_OBJ_FILE};
use gate_builder::pipeline::{GatePipeline, StageReport};
use gate_builder::BuildError;
use gate_kernel::geometry::BoundingBox;
use gate_kernel::Point3d;
use gate_types::GateSpec;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("OBJ import of {path} failed: {reason}")]
    ObjImport { path: PathBuf, reason: String },

    #[error("object not found: {name}")]
    ObjectNotFound { name: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}

// ── Stage Runner ────────────────────────────────────────────────────────────

/// Output of running both stages into one directory.
pub struct RenderedGate {
    pub pipeline: GatePipeline,
    pub geometry: StageReport,
    pub accessories: StageReport,
    pub out_dir: PathBuf,
}

impl RenderedGate {
    pub fn gate_obj(&self) -> PathBuf {
        self.out_dir.join(GATE_OBJ_FILE)
    }

    pub fn scene_obj(&self) -> PathBuf {
        self.out_dir.join(SCENE_OBJ_FILE)
    }
}

/// Run the geometry stage, then the accessory stage, the way `gate-render
/// render` does.
pub fn render_to(mut pipeline: GatePipeline, spec: &GateSpec, out_dir: &Path) -> Result<RenderedGate, HarnessError> {
    let texture = pipeline.texture_for(spec);
    let geometry = pipeline.run_geometry(spec, out_dir, &texture)?;
    let accessories = pipeline.run_accessories(spec, out_dir, &texture)?;
    Ok(RenderedGate {
        pipeline,
        geometry,
        accessories,
        out_dir: out_dir.to_path_buf(),
    })
}

// ── Coordinates ─────────────────────────────────────────────────────────────

/// Map an exported (Y-up) position back into the Z-up working frame.
pub fn undo_export_rotation(p: [f32; 3]) -> Point3d {
    Point3d::new(p[0] as f64, -(p[2] as f64), p[1] as f64)
}

/// Bounding box of a flat `[x, y, z, ...]` position buffer in export space,
/// returned in the working frame.
pub fn working_bounds(positions: &[f32]) -> BoundingBox {
    let points: Vec<Point3d> = positions
        .chunks_exact(3)
        .map(|c| undo_export_rotation([c[0], c[1], c[2]]))
        .collect();
    BoundingBox::from_points(&points)
}
