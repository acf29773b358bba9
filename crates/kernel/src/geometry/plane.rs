use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::{Axis, Vec3};

/// A cutting plane given by a point on it and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
}

impl Plane {
    /// Returns `None` for a zero-length normal.
    pub fn new(origin: Point3d, normal: Vec3) -> Option<Self> {
        normal.normalized().map(|normal| Self { origin, normal })
    }

    /// Plane perpendicular to `axis` at coordinate `offset`, normal along +axis.
    pub fn axis_aligned(axis: Axis, offset: f64) -> Self {
        Self {
            origin: Point3d::ORIGIN.with_component(axis, offset),
            normal: axis.unit(),
        }
    }

    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    /// Orthonormal in-plane basis `(u, v)` with `u x v == normal`.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let helper = if self.normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u = helper.cross(&self.normal);
        let u = u.normalized().unwrap_or(Vec3::X);
        let v = self.normal.cross(&u);
        (u, v)
    }

    pub fn project(&self, p: &Point3d, basis: &(Vec3, Vec3)) -> Point2d {
        let d = *p - self.origin;
        Point2d::new(d.dot(&basis.0), d.dot(&basis.1))
    }

    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            normal: -self.normal,
        }
    }
}
