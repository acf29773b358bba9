use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::{Axis, Vec3};

/// A 4x4 affine transformation matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub m: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::scaling(1.0, 1.0, 1.0)
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            dx,  dy,  dz,  1.0,
        ];
        Self { m }
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        #[rustfmt::skip]
        let m = [
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Rotation around the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Rotation around the Z axis by `angle` radians (counter-clockwise seen from above).
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = [
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Conjugate `self` so that it acts around `pivot` instead of the origin.
    pub fn about(&self, pivot: Point3d) -> Self {
        let to_origin = Self::translation(-pivot.x, -pivot.y, -pivot.z);
        let back = Self::translation(pivot.x, pivot.y, pivot.z);
        back.then(self).then(&to_origin)
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let x = self.at(0, 0) * p.x + self.at(0, 1) * p.y + self.at(0, 2) * p.z + self.at(0, 3);
        let y = self.at(1, 0) * p.x + self.at(1, 1) * p.y + self.at(1, 2) * p.z + self.at(1, 3);
        let z = self.at(2, 0) * p.x + self.at(2, 1) * p.y + self.at(2, 2) * p.z + self.at(2, 3);
        Point3d::new(x, y, z)
    }

    /// Transform a direction (translation is ignored).
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let x = self.at(0, 0) * v.x + self.at(0, 1) * v.y + self.at(0, 2) * v.z;
        let y = self.at(1, 0) * v.x + self.at(1, 1) * v.y + self.at(1, 2) * v.z;
        let z = self.at(2, 0) * v.x + self.at(2, 1) * v.y + self.at(2, 2) * v.z;
        Vec3::new(x, y, z)
    }

    /// Matrix product `self * other`: `other` is applied first.
    pub fn then(&self, other: &Transform) -> Transform {
        let mut result = [0.0f64; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * other.at(k, col);
                }
                result[col * 4 + row] = sum;
            }
        }
        Transform { m: result }
    }

    /// Whether the linear part flips orientation (negative determinant).
    pub fn is_mirroring(&self) -> bool {
        let a = Vec3::new(self.at(0, 0), self.at(1, 0), self.at(2, 0));
        let b = Vec3::new(self.at(0, 1), self.at(1, 1), self.at(2, 1));
        let c = Vec3::new(self.at(0, 2), self.at(1, 2), self.at(2, 2));
        a.dot(&b.cross(&c)) < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Which end of an axis interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extent {
    Min,
    Max,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Box with the given volumetric centre and edge lengths.
    pub fn from_center_size(center: Point3d, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut bb = *self;
        bb.expand_to_include(&other.min);
        bb.expand_to_include(&other.max);
        bb
    }

    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn bound(&self, axis: Axis, extent: Extent) -> f64 {
        match extent {
            Extent::Min => self.min.component(axis),
            Extent::Max => self.max.component(axis),
        }
    }

    /// One of the eight corners, picked per axis.
    pub fn corner(&self, x: Extent, y: Extent, z: Extent) -> Point3d {
        Point3d::new(
            self.bound(Axis::X, x),
            self.bound(Axis::Y, y),
            self.bound(Axis::Z, z),
        )
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.min.distance_to(&other.min) <= tol && self.max.distance_to(&other.max) <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_z_90() {
        let p = Transform::rotation_z(FRAC_PI_2).transform_point(&Point3d::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_x_minus_90_maps_z_up_to_y_up() {
        let p = Transform::rotation_x(-FRAC_PI_2).transform_point(&Point3d::new(0.0, 2.0, 3.0));
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_pivot_keeps_pivot_fixed() {
        let pivot = Point3d::new(2.0, 1.0, 0.0);
        let t = Transform::rotation_z(0.3).about(pivot);
        let p = t.transform_point(&pivot);
        assert_relative_eq!(p.x, pivot.x, epsilon = 1e-12);
        assert_relative_eq!(p.y, pivot.y, epsilon = 1e-12);
    }

    #[test]
    fn test_mirroring_detection() {
        assert!(!Transform::scaling(2.0, 1.0, 0.5).is_mirroring());
        assert!(Transform::scaling(-1.0, 1.0, 1.0).is_mirroring());
    }

    #[test]
    fn test_bounding_box_corner() {
        let bb = BoundingBox::new(Point3d::new(-1.0, 0.0, 0.0), Point3d::new(1.0, 0.5, 2.0));
        let c = bb.corner(Extent::Max, Extent::Max, Extent::Min);
        assert_eq!(c, Point3d::new(1.0, 0.5, 0.0));
        assert_relative_eq!(bb.size().z, 2.0);
        assert_eq!(bb.center(), Point3d::new(0.0, 0.25, 1.0));
    }
}
