use gate_kernel::geometry::{Axis, Point3d, Transform, Vec3};
use gate_kernel::mesh::{Mesh, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One triangle corner: indices into the position, UV and normal streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corner {
    pub position: u32,
    pub uv: u32,
    pub normal: u32,
}

/// A triangle mesh ready for export.
///
/// Positions are shared between faces; normals are flat (one per source
/// polygon) and UVs are stored per corner, so each stream is indexed
/// separately the way OBJ `f v/vt/vn` records expect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Face normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Texture coordinates [u, v, u, v, ...]
    pub uvs: Vec<f32>,
    /// Triangle corners, three per triangle.
    pub corners: Vec<Corner>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    pub fn uv_count(&self) -> usize {
        self.uvs.len() / 2
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    pub fn add_position(&mut self, p: Point3d) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend([p.x as f32, p.y as f32, p.z as f32]);
        idx
    }

    pub fn add_normal(&mut self, n: Vec3) -> u32 {
        let idx = self.normal_count() as u32;
        self.normals.extend([n.x as f32, n.y as f32, n.z as f32]);
        idx
    }

    pub fn add_uv(&mut self, u: f64, v: f64) -> u32 {
        let idx = self.uv_count() as u32;
        self.uvs.extend([u as f32, v as f32]);
        idx
    }

    pub fn position(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[Corner]> + '_ {
        self.corners.chunks_exact(3)
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let p = self.vertex_count() as u32;
        let n = self.normal_count() as u32;
        let t = self.uv_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.corners.extend(other.corners.iter().map(|c| Corner {
            position: c.position + p,
            uv: c.uv + t,
            normal: c.normal + n,
        }));
    }

    /// Axis-aligned bounds of the positions as `(min, max)`.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut chunks = self.positions.chunks_exact(3);
        let first = chunks.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for c in chunks {
            for k in 0..3 {
                min[k] = min[k].min(c[k]);
                max[k] = max[k].max(c[k]);
            }
        }
        Some((min, max))
    }
}

/// Planar box projection: drop the axis the normal points along most.
fn box_uv(p: &Point3d, normal: &Vec3) -> (f64, f64) {
    match normal.dominant_axis() {
        Axis::X => (p.y, p.z),
        Axis::Y => (p.x, p.z),
        Axis::Z => (p.x, p.y),
    }
}

/// Tessellate a polygon mesh, applying `transform` to positions and normals.
///
/// UVs are projected from the untransformed geometry so a texture keeps its
/// orientation on the part regardless of export reorientation. Faces are
/// fan-triangulated, which is exact for the convex polygons the kernel
/// produces.
pub fn tessellate_mesh_with(mesh: &Mesh, transform: &Transform) -> TriangleMesh {
    let mut out = TriangleMesh::new();
    for p in &mesh.positions {
        out.add_position(transform.transform_point(p));
    }

    let mut skipped = 0usize;
    for face in &mesh.faces {
        if face.indices.len() < 3 {
            skipped += 1;
            continue;
        }
        tessellate_face(mesh, face, transform, &mut out);
    }
    if skipped > 0 {
        debug!(skipped, "skipped faces with fewer than three vertices");
    }
    out
}

pub fn tessellate_mesh(mesh: &Mesh) -> TriangleMesh {
    tessellate_mesh_with(mesh, &Transform::identity())
}

fn tessellate_face(mesh: &Mesh, face: &Polygon, transform: &Transform, out: &mut TriangleMesh) {
    let normal = mesh.face_normal(face);
    let exported_normal = transform
        .transform_vector(&normal)
        .normalized()
        .unwrap_or(Vec3::ZERO);
    let n = out.add_normal(exported_normal);

    let corners: Vec<Corner> = face
        .indices
        .iter()
        .map(|&i| {
            let (u, v) = box_uv(&mesh.positions[i as usize], &normal);
            Corner {
                position: i,
                uv: out.add_uv(u, v),
                normal: n,
            }
        })
        .collect();

    // Fan triangulation (works for convex polygons)
    for k in 1..(corners.len() - 1) {
        out.corners.extend([corners[0], corners[k], corners[k + 1]]);
    }
}
