pub mod plane;
pub mod point;
pub mod transform;
pub mod vector;

pub use plane::Plane;
pub use point::{Point2d, Point3d};
pub use transform::{BoundingBox, Extent, Transform};
pub use vector::{Axis, Vec3};
