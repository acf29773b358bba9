use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::Mesh;

/// Edge-manifold check for a polygon mesh.
///
/// A closed mesh has every undirected edge used exactly twice, once in each
/// direction. Edges used once are open boundaries, anything else is
/// non-manifold or inconsistently wound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureAudit {
    pub boundary_edges: usize,
    pub non_manifold_edges: usize,
    pub degenerate_faces: usize,
}

impl ClosureAudit {
    pub fn is_closed(&self) -> bool {
        self.boundary_edges == 0 && self.non_manifold_edges == 0
    }
}

#[instrument(skip(mesh), fields(faces = mesh.face_count()))]
pub fn audit_closure(mesh: &Mesh) -> ClosureAudit {
    // (forward uses, backward uses) per undirected edge.
    let mut uses: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
    let mut audit = ClosureAudit::default();

    for face in &mesh.faces {
        if face.indices.len() < 3 {
            audit.degenerate_faces += 1;
            continue;
        }
        for (a, b) in face.edges() {
            if a == b {
                continue;
            }
            let entry = uses.entry((a.min(b), a.max(b))).or_default();
            if a < b {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    for &(fwd, back) in uses.values() {
        match (fwd, back) {
            (1, 1) => {}
            (1, 0) | (0, 1) => audit.boundary_edges += 1,
            _ => audit.non_manifold_edges += 1,
        }
    }

    debug!(
        boundary = audit.boundary_edges,
        non_manifold = audit.non_manifold_edges,
        degenerate = audit.degenerate_faces,
        "closure audit"
    );
    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3d;
    use crate::mesh::primitives::make_box;

    #[test]
    fn test_box_is_closed() {
        let audit = audit_closure(&make_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)));
        assert!(audit.is_closed());
        assert_eq!(audit.degenerate_faces, 0);
    }

    #[test]
    fn test_missing_face_leaves_boundary() {
        let mut mesh = make_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        mesh.faces.pop();
        let audit = audit_closure(&mesh);
        assert_eq!(audit.boundary_edges, 4);
        assert!(!audit.is_closed());
    }

    #[test]
    fn test_flipped_face_is_non_manifold() {
        let mut mesh = make_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        mesh.faces[0].indices.reverse();
        let audit = audit_closure(&mesh);
        assert_eq!(audit.non_manifold_edges, 4);
    }
}
