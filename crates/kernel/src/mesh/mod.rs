//! Polygon meshes with owned vertex and face buffers.
//!
//! A [`Mesh`] is the data block behind every scene object. Faces are convex
//! polygons wound counter-clockwise when seen from outside the solid, and
//! every vertex is shared by index between the faces that meet at it, which
//! is what lets [`audit::audit_closure`] detect open boundaries.

pub mod audit;
pub mod bisect;
pub mod primitives;
pub mod triangulate;

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point3d, Transform, Vec3};

/// A single polygonal face referencing vertices of its mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub indices: Vec<u32>,
}

impl Polygon {
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }

    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: vec![a, b, c],
        }
    }

    /// Directed edges in winding order, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |k| (self.indices[k], self.indices[(k + 1) % n]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3d>,
    pub faces: Vec<Polygon>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangles a fan triangulation of every face produces.
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.indices.len().saturating_sub(2))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn add_vertex(&mut self, p: Point3d) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.positions)
    }

    /// Apply an affine transform to every vertex. Mirroring transforms also
    /// reverse the winding so faces keep pointing outward.
    pub fn transform(&mut self, t: &Transform) {
        for p in &mut self.positions {
            *p = t.transform_point(p);
        }
        if t.is_mirroring() {
            for face in &mut self.faces {
                face.indices.reverse();
            }
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = *p + offset;
        }
    }

    /// Non-uniform scale around `pivot`.
    pub fn scale_about(&mut self, factors: Vec3, pivot: Point3d) {
        let t = Transform::scaling(factors.x, factors.y, factors.z).about(pivot);
        self.transform(&t);
    }

    /// Append another mesh's geometry, offsetting its indices.
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.faces.extend(other.faces.iter().map(|f| Polygon {
            indices: f.indices.iter().map(|&i| i + offset).collect(),
        }));
    }

    /// Unit face normal by Newell's method, or zero for a degenerate face.
    pub fn face_normal(&self, face: &Polygon) -> Vec3 {
        let mut n = Vec3::ZERO;
        for (a, b) in face.edges() {
            let pa = self.positions[a as usize];
            let pb = self.positions[b as usize];
            n.x += (pa.y - pb.y) * (pa.z + pb.z);
            n.y += (pa.z - pb.z) * (pa.x + pb.x);
            n.z += (pa.x - pb.x) * (pa.y + pb.y);
        }
        n.normalized().unwrap_or(Vec3::ZERO)
    }

    /// Enclosed volume by the divergence theorem. Positive for outward winding.
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for face in &self.faces {
            let Some((&first, rest)) = face.indices.split_first() else {
                continue;
            };
            let p0 = self.positions[first as usize].to_vec3();
            for pair in rest.windows(2) {
                let p1 = self.positions[pair[0] as usize].to_vec3();
                let p2 = self.positions[pair[1] as usize].to_vec3();
                volume += p0.dot(&p1.cross(&p2));
            }
        }
        volume / 6.0
    }
}

/// Boolean-free union: concatenates all geometry into one new mesh.
pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
    let mut out = Mesh::new();
    for mesh in meshes {
        out.append(mesh);
    }
    out
}
