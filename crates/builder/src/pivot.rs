//! Swing-gate leaves: split, re-origin to the hinge corner, rotate, correct.

use gate_kernel::geometry::{Axis, BoundingBox, Extent, Plane, Point3d, Vec3};
use gate_kernel::mesh::bisect::KeepSide;
use gate_kernel::scene::{ObjectId, Scene};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::LeafCalibration;
use crate::error::BuildError;

pub const LEFT_LEAF_NAME: &str = "skrzydlo-lewe";
pub const RIGHT_LEAF_NAME: &str = "skrzydlo-prawe";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafConfig {
    /// Closed gate, no leaves.
    #[default]
    None,
    SingleRight,
    SingleLeft,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HingeSide {
    Left,
    Right,
}

impl HingeSide {
    /// Rotations about a right hinge are positive.
    fn sign(self) -> f64 {
        match self {
            HingeSide::Left => -1.0,
            HingeSide::Right => 1.0,
        }
    }

    fn extent(self) -> Extent {
        match self {
            HingeSide::Left => Extent::Min,
            HingeSide::Right => Extent::Max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: ObjectId,
    pub name: String,
    pub side: HingeSide,
    /// Hinge corner the leaf rotated about, before the lateral correction.
    pub pivot: Point3d,
    /// Signed rotation about +Z in degrees.
    pub angle_deg: f64,
    /// Translation along +Y applied after the rotation.
    pub lateral_offset: f64,
    pub width: f64,
}

/// Pull-back after rotating a leaf of `distance` about its hinge: the arc's
/// sagitta plus a width-scaled calibration term.
pub fn lateral_offset(distance: f64, angle_deg: f64, gate_width: f64, divisor: f64) -> f64 {
    distance * (1.0 - angle_deg.to_radians().cos()) + gate_width / divisor
}

/// Hinge pivot: the back corner at floor level on the hinge side.
pub fn hinge_pivot(bounds: &BoundingBox, side: HingeSide) -> Point3d {
    bounds.corner(side.extent(), Extent::Max, Extent::Min)
}

struct LeafSpec {
    name: &'static str,
    side: HingeSide,
    angle_deg: f64,
    divisor: f64,
    keep: Option<KeepSide>,
}

fn leaf_specs(config: LeafConfig, cal: &LeafCalibration) -> Vec<LeafSpec> {
    match config {
        LeafConfig::None => Vec::new(),
        LeafConfig::SingleRight => vec![LeafSpec {
            name: RIGHT_LEAF_NAME,
            side: HingeSide::Right,
            angle_deg: cal.single_angle_deg,
            divisor: cal.single_offset_divisor,
            keep: None,
        }],
        LeafConfig::SingleLeft => vec![LeafSpec {
            name: LEFT_LEAF_NAME,
            side: HingeSide::Left,
            angle_deg: cal.single_angle_deg,
            divisor: cal.single_offset_divisor,
            keep: None,
        }],
        LeafConfig::Double => vec![
            LeafSpec {
                name: LEFT_LEAF_NAME,
                side: HingeSide::Left,
                angle_deg: cal.double_left_angle_deg,
                divisor: cal.double_offset_divisor,
                keep: Some(KeepSide::Negative),
            },
            LeafSpec {
                name: RIGHT_LEAF_NAME,
                side: HingeSide::Right,
                angle_deg: cal.double_right_angle_deg,
                divisor: cal.double_offset_divisor,
                keep: Some(KeepSide::Positive),
            },
        ],
    }
}

/// Turn the joined gate solid into rotated leaves.
///
/// The solid itself is hidden, not removed, once leaves exist. Returns no
/// leaves for [`LeafConfig::None`], leaving the solid untouched.
#[instrument(skip(scene, cal))]
pub fn split_leaves(
    scene: &mut Scene,
    solid: ObjectId,
    config: LeafConfig,
    cal: &LeafCalibration,
) -> Result<Vec<Leaf>, BuildError> {
    let bounds = scene.world_bounding_box(solid)?;
    let gate_width = bounds.size().x;
    let center_x = bounds.center().x;
    let mut leaves = Vec::new();

    for spec in leaf_specs(config, cal) {
        let id = scene.copy_independent(solid, spec.name)?;
        if let Some(keep) = spec.keep {
            scene.bisect(id, &Plane::axis_aligned(Axis::X, center_x), keep)?;
        }
        let leaf_bounds = scene.world_bounding_box(id)?;
        let width = leaf_bounds.size().x;
        let pivot = hinge_pivot(&leaf_bounds, spec.side);
        let angle_deg = spec.side.sign() * spec.angle_deg;
        let offset = lateral_offset(width, spec.angle_deg, gate_width, spec.divisor);

        scene.set_origin(id, pivot)?;
        scene.rotate_z(id, angle_deg.to_radians())?;
        scene.translate(id, Vec3::Y * offset)?;

        info!(leaf = spec.name, angle_deg, offset, "rotated leaf");
        leaves.push(Leaf {
            id,
            name: spec.name.to_string(),
            side: spec.side,
            pivot,
            angle_deg,
            lateral_offset: offset,
            width,
        });
    }

    if !leaves.is_empty() {
        scene.hide(solid)?;
    }
    Ok(leaves)
}
