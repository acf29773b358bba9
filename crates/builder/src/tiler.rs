//! Segment tiling: fill a gate rectangle with copies of a base segment.
//!
//! Linear tiling steps whole copies along one axis from the origin edge and
//! cuts a final partial copy to the exact remaining extent. Grid tiling
//! rescales cells instead so a whole number of them fits each axis.

use gate_kernel::geometry::{Axis, BoundingBox, Plane, Point3d, Vec3};
use gate_kernel::mesh::bisect::KeepSide;
use gate_kernel::scene::{ObjectId, Scene, SceneObject};
use gate_kernel::Tolerance;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::BuildError;
use crate::library::BaseSegment;

pub const GATE_SOLID_NAME: &str = "brama-koniec";
pub const SEGMENT_PREFIX: &str = "segment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilingMode {
    /// Whole copies stepped along `X` or `Z`; the other in-plane axis is
    /// stretched to the gate.
    Linear(Axis),
    /// Rescaled cells on both in-plane axes, no cutting.
    Grid,
}

/// Outcome of walking one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearPlan {
    pub full: usize,
    /// Extent of the trailing cut segment, if any.
    pub partial: Option<f64>,
}

impl LinearPlan {
    pub fn pieces(&self) -> usize {
        self.full + usize::from(self.partial.is_some())
    }

    pub fn covered(&self, extent: f64) -> f64 {
        self.full as f64 * extent + self.partial.unwrap_or(0.0)
    }
}

/// Count whole segments that fit `target` and the remainder worth a cut copy.
pub fn plan_linear(target: f64, extent: f64, tol: &Tolerance) -> Result<LinearPlan, BuildError> {
    if !extent.is_finite() || extent <= 0.0 {
        return Err(BuildError::InvalidExtent { extent });
    }
    let target = target.max(0.0);
    let mut full = 0usize;
    while (full + 1) as f64 * extent <= target + tol.rounding {
        full += 1;
    }
    let remaining = target - full as f64 * extent;
    let partial = (remaining > tol.min_partial).then_some(remaining);
    Ok(LinearPlan { full, partial })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPlan {
    pub cols: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridPlan {
    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }
}

/// Whole cells per axis, at least one, each rescaled to fill the target exactly.
pub fn plan_grid(width: f64, height: f64, cell_width: f64, cell_height: f64, tol: &Tolerance) -> Result<GridPlan, BuildError> {
    for extent in [cell_width, cell_height] {
        if !extent.is_finite() || extent <= 0.0 {
            return Err(BuildError::InvalidExtent { extent });
        }
    }
    let count = |target: f64, extent: f64| ((target / extent + tol.rounding).floor() as usize).max(1);
    let cols = count(width, cell_width);
    let rows = count(height, cell_height);
    Ok(GridPlan {
        cols,
        rows,
        cell_width: width / cols as f64,
        cell_height: height / rows as f64,
    })
}

/// Target rectangle in the XZ plane, starting at `anchor` (its min corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRequest {
    pub width: f64,
    pub height: f64,
    pub anchor: Point3d,
    pub mode: TilingMode,
}

impl TileRequest {
    /// Gate rectangle centred on X = 0, standing on Z = 0.
    pub fn centered(width: f64, height: f64, mode: TilingMode) -> Self {
        Self {
            width,
            height,
            anchor: Point3d::new(-width / 2.0, 0.0, 0.0),
            mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileLayout {
    Linear { axis: Axis, plan: LinearPlan, extent: f64 },
    Grid(GridPlan),
}

/// The merged gate solid and how it was laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiledSolid {
    pub id: ObjectId,
    pub layout: TileLayout,
    pub pieces: usize,
    pub bounds: BoundingBox,
}

fn segment_name(index: usize) -> String {
    format!("{SEGMENT_PREFIX}{:03}", index + 1)
}

/// Tile `segment` over the requested rectangle and merge the copies into
/// one solid named [`GATE_SOLID_NAME`].
#[instrument(skip(scene, segment), fields(segment = segment.name()))]
pub fn tile(scene: &mut Scene, segment: &BaseSegment, request: &TileRequest) -> Result<TiledSolid, BuildError> {
    let tol = scene.tolerance;
    let dims = segment.dimensions();
    let mut placed: Vec<ObjectId> = Vec::new();

    let layout = match request.mode {
        TilingMode::Linear(axis) => {
            let (step_axis, cross_axis, target, cross_target) = match axis {
                Axis::X => (Axis::X, Axis::Z, request.width, request.height),
                _ => (Axis::Z, Axis::X, request.height, request.width),
            };
            let extent = dims.component(step_axis);
            let plan = plan_linear(target, extent, &tol)?;
            let cross_dim = dims.component(cross_axis);
            if !cross_dim.is_finite() || cross_dim <= 0.0 {
                return Err(BuildError::InvalidExtent { extent: cross_dim });
            }
            let factors = Vec3::ONE.with_component(cross_axis, cross_target / cross_dim);

            for i in 0..plan.pieces() {
                let mut mesh = segment.normalized_copy();
                mesh.scale_about(factors, Point3d::ORIGIN);
                let mut object = SceneObject::new(segment_name(i), mesh);
                object.location = request.anchor + step_axis.unit() * (i as f64 * extent);
                let id = scene.add(object);
                placed.push(id);
                debug!(index = i, offset = i as f64 * extent, "placed segment");
            }

            if let (Some(remaining), Some(&last)) = (plan.partial, placed.last()) {
                let cut_at = request.anchor.component(step_axis) + target;
                scene.bisect(last, &Plane::axis_aligned(step_axis, cut_at), KeepSide::Negative)?;
                debug!(remaining, cut_at, "cut partial segment");
            }
            TileLayout::Linear { axis: step_axis, plan, extent }
        }
        TilingMode::Grid => {
            let grid = plan_grid(request.width, request.height, dims.x, dims.z, &tol)?;
            let factors = Vec3::new(grid.cell_width / dims.x, 1.0, grid.cell_height / dims.z);
            for row in 0..grid.rows {
                for col in 0..grid.cols {
                    let mut mesh = segment.normalized_copy();
                    mesh.scale_about(factors, Point3d::ORIGIN);
                    let mut object = SceneObject::new(segment_name(placed.len()), mesh);
                    object.location = request.anchor
                        + Vec3::new(col as f64 * grid.cell_width, 0.0, row as f64 * grid.cell_height);
                    placed.push(scene.add(object));
                }
            }
            TileLayout::Grid(grid)
        }
    };

    if placed.is_empty() {
        return Err(BuildError::EmptyTiling {
            width: request.width,
            height: request.height,
        });
    }

    let pieces = placed.len();
    let id = scene.merge(&placed, GATE_SOLID_NAME)?;
    let bounds = scene.world_bounding_box(id)?;
    info!(pieces, ?layout, "tiled gate solid");
    Ok(TiledSolid { id, layout, pieces, bounds })
}
