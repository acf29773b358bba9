use crate::geometry::{BoundingBox, Point3d, Vec3};

use super::{Mesh, Polygon};

// Corner order: bottom ring (z0) then top ring (z1), each counter-clockwise
// seen from above starting at (x0, y0).
#[rustfmt::skip]
const BOX_FACES: [[u32; 4]; 6] = [
    [0, 3, 2, 1], // bottom (-Z)
    [4, 5, 6, 7], // top    (+Z)
    [0, 1, 5, 4], // front  (-Y)
    [3, 7, 6, 2], // back   (+Y)
    [0, 4, 7, 3], // left   (-X)
    [1, 2, 6, 5], // right  (+X)
];

/// Axis-aligned box spanning `min`..`max`, six outward-wound quads.
pub fn make_box(min: Point3d, max: Point3d) -> Mesh {
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let positions = vec![
        Point3d::new(x0, y0, z0),
        Point3d::new(x1, y0, z0),
        Point3d::new(x1, y1, z0),
        Point3d::new(x0, y1, z0),
        Point3d::new(x0, y0, z1),
        Point3d::new(x1, y0, z1),
        Point3d::new(x1, y1, z1),
        Point3d::new(x0, y1, z1),
    ];
    let faces = BOX_FACES
        .iter()
        .map(|f| Polygon::new(f.to_vec()))
        .collect();
    Mesh { positions, faces }
}

pub fn make_box_centered(center: Point3d, size: Vec3) -> Mesh {
    let bb = BoundingBox::from_center_size(center, size);
    make_box(bb.min, bb.max)
}

/// Several disjoint (or face-touching) boxes as one mesh of closed shells.
pub fn make_boxes(boxes: &[BoundingBox]) -> Mesh {
    let mut mesh = Mesh::new();
    for bb in boxes {
        mesh.append(&make_box(bb.min, bb.max));
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_normals_point_outward() {
        let mesh = make_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        let center = mesh.bounding_box().center();
        for face in &mesh.faces {
            let n = mesh.face_normal(face);
            let on_face = mesh.positions[face.indices[0] as usize];
            assert!((on_face - center).dot(&n) > 0.0);
        }
    }

    #[test]
    fn test_centered_box_extent() {
        let mesh = make_box_centered(Point3d::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.5, 1.0));
        let bb = mesh.bounding_box();
        assert_eq!(bb.min, Point3d::new(0.0, -0.25, -0.5));
        assert_eq!(bb.max, Point3d::new(2.0, 0.25, 0.5));
    }
}
