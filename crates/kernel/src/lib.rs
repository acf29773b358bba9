//! Mesh kernel for parametric gate geometry.
//!
//! Provides the math types in [`geometry`], polygon meshes with cutting and
//! closure checks in [`mesh`], and the owned object arena in [`scene`] that
//! the builder drives.

pub mod geometry;
pub mod mesh;
pub mod scene;

pub use geometry::{Axis, BoundingBox, Extent, Plane, Point2d, Point3d, Transform, Vec3};
pub use mesh::audit::{audit_closure, ClosureAudit};
pub use mesh::bisect::{CapReport, KeepSide};
pub use mesh::{Mesh, Polygon};
pub use scene::{ObjectId, Scene, SceneError, SceneObject};

use serde::{Deserialize, Serialize};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (meters).
    pub coincidence: f64,
    /// Slack when comparing accumulated lengths against a target.
    pub rounding: f64,
    /// Remainders shorter than this are not worth a partial copy.
    pub min_partial: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-7,
            rounding: 1e-6,
            min_partial: 1e-4,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}
