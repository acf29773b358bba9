//! Half-space cut with boundary capping.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::triangulate::{ear_clip, signed_area2};
use super::{Mesh, Polygon};
use crate::geometry::{Plane, Point2d};
use crate::Tolerance;

/// Which half-space of a cutting plane survives, relative to its normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepSide {
    /// Keep geometry on the side the normal points to.
    Positive,
    /// Keep geometry behind the plane.
    Negative,
}

/// What a cut produced, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapReport {
    pub cap_loops: usize,
    pub cap_triangles: usize,
    /// Boundary chains that did not close and were left uncapped.
    pub open_chains: usize,
}

struct Clipper<'a> {
    source: &'a Mesh,
    dist: Vec<f64>,
    out: Mesh,
    remap: Vec<Option<u32>>,
    cuts: HashMap<(u32, u32), u32>,
    on_plane: Vec<bool>,
}

impl<'a> Clipper<'a> {
    fn keep_vertex(&mut self, i: u32) -> u32 {
        if let Some(mapped) = self.remap[i as usize] {
            return mapped;
        }
        let mapped = self.out.add_vertex(self.source.positions[i as usize]);
        self.remap[i as usize] = Some(mapped);
        self.on_plane.push(self.dist[i as usize] == 0.0);
        mapped
    }

    fn cut_vertex(&mut self, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&mapped) = self.cuts.get(&key) {
            return mapped;
        }
        let (lo, hi) = key;
        let (dl, dh) = (self.dist[lo as usize], self.dist[hi as usize]);
        let t = dl / (dl - dh);
        let p = self.source.positions[lo as usize].lerp(&self.source.positions[hi as usize], t);
        let mapped = self.out.add_vertex(p);
        self.on_plane.push(true);
        self.cuts.insert(key, mapped);
        mapped
    }
}

/// Split `mesh` by `plane`, discard the excluded half and close every cut
/// boundary with a triangulated cap.
///
/// Faces lying in the plane are kept only when they face the discarded side,
/// so two shells touching along the plane are separated cleanly.
pub fn bisect_and_cap(mesh: &Mesh, plane: &Plane, keep: KeepSide, tol: &Tolerance) -> (Mesh, CapReport) {
    let keep_plane = match keep {
        KeepSide::Positive => *plane,
        KeepSide::Negative => plane.flipped(),
    };
    let eps = tol.coincidence;
    let dist: Vec<f64> = mesh
        .positions
        .iter()
        .map(|p| {
            let d = keep_plane.signed_distance(p);
            if d.abs() <= eps { 0.0 } else { d }
        })
        .collect();

    let mut clip = Clipper {
        source: mesh,
        remap: vec![None; mesh.positions.len()],
        dist,
        out: Mesh::new(),
        cuts: HashMap::new(),
        on_plane: Vec::new(),
    };

    for face in &mesh.faces {
        let has_pos = face.indices.iter().any(|&i| clip.dist[i as usize] > 0.0);
        let has_neg = face.indices.iter().any(|&i| clip.dist[i as usize] < 0.0);

        if !has_neg {
            if !has_pos && mesh.face_normal(face).dot(&keep_plane.normal) >= 0.0 {
                continue;
            }
            let indices = face.indices.iter().map(|&i| clip.keep_vertex(i)).collect();
            clip.out.faces.push(Polygon::new(indices));
            continue;
        }
        if !has_pos {
            continue;
        }

        let n = face.indices.len();
        let mut clipped = Vec::with_capacity(n + 2);
        for k in 0..n {
            let a = face.indices[k];
            let b = face.indices[(k + 1) % n];
            let (da, db) = (clip.dist[a as usize], clip.dist[b as usize]);
            if da >= 0.0 {
                clipped.push(clip.keep_vertex(a));
            }
            if (da > 0.0 && db < 0.0) || (da < 0.0 && db > 0.0) {
                clipped.push(clip.cut_vertex(a, b));
            }
        }
        if clipped.len() >= 3 {
            clip.out.faces.push(Polygon::new(clipped));
        }
    }

    let Clipper { mut out, on_plane, .. } = clip;
    let report = cap_boundaries(&mut out, &on_plane, &keep_plane, eps);
    debug!(
        faces = out.face_count(),
        cap_loops = report.cap_loops,
        cap_triangles = report.cap_triangles,
        "bisected mesh"
    );
    (out, report)
}

/// Chain open edges lying in the plane into loops and triangulate them.
fn cap_boundaries(mesh: &mut Mesh, on_plane: &[bool], keep_plane: &Plane, eps: f64) -> CapReport {
    let directed: HashSet<(u32, u32)> = mesh.faces.iter().flat_map(|f| f.edges()).collect();

    // Cap edges run opposite to the open face edges they close.
    let mut next: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for face in &mesh.faces {
        for (a, b) in face.edges() {
            if !directed.contains(&(b, a)) && on_plane[a as usize] && on_plane[b as usize] {
                next.entry(b).or_default().push(a);
            }
        }
    }

    let mut report = CapReport::default();
    let mut loops: Vec<Vec<u32>> = Vec::new();
    let edge_budget: usize = next.values().map(Vec::len).sum();

    while let Some((&start, _)) = next.iter().find(|(_, ends)| !ends.is_empty()) {
        let mut chain = vec![start];
        let mut current = start;
        let closed = loop {
            let Some(following) = next.get_mut(&current).and_then(Vec::pop) else {
                break false;
            };
            if following == start {
                break true;
            }
            if chain.len() > edge_budget {
                break false;
            }
            chain.push(following);
            current = following;
        };
        if closed && chain.len() >= 3 {
            loops.push(chain);
        } else {
            report.open_chains += 1;
        }
    }

    if report.open_chains > 0 {
        warn!(open_chains = report.open_chains, "cut boundary did not close into loops");
    }

    // Caps face out of the kept solid, i.e. against the keep normal.
    let cap_plane = keep_plane.flipped();
    let basis = cap_plane.basis();
    for chain in loops {
        let mut flat: Vec<Point2d> = chain
            .iter()
            .map(|&i| cap_plane.project(&mesh.positions[i as usize], &basis))
            .collect();
        let clockwise = signed_area2(&flat) < 0.0;
        if clockwise {
            // A hole in the cross-section; capped on its own without bridging.
            debug!(vertices = chain.len(), "clockwise cap loop");
            flat.reverse();
        }
        let last = chain.len() - 1;
        for tri in ear_clip(&flat, eps) {
            let [a, b, c] = if clockwise {
                [chain[last - tri[2]], chain[last - tri[1]], chain[last - tri[0]]]
            } else {
                [chain[tri[0]], chain[tri[1]], chain[tri[2]]]
            };
            mesh.faces.push(Polygon::triangle(a, b, c));
            report.cap_triangles += 1;
        }
        report.cap_loops += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Axis, Point3d, Vec3};
    use crate::mesh::audit::audit_closure;
    use crate::mesh::primitives::make_box;
    use approx::assert_relative_eq;

    fn unit_box() -> Mesh {
        make_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_axis_cut_keeps_lower_part_closed() {
        let plane = Plane::axis_aligned(Axis::Z, 0.25);
        let (cut, report) = bisect_and_cap(&unit_box(), &plane, KeepSide::Negative, &Tolerance::default());
        assert_eq!(report.cap_loops, 1);
        assert_eq!(report.cap_triangles, 2);
        assert!(audit_closure(&cut).is_closed());
        let bb = cut.bounding_box();
        assert_relative_eq!(bb.max.z, 0.25, epsilon = 1e-12);
        assert_relative_eq!(cut.signed_volume(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_oblique_cut_is_closed() {
        let plane = Plane::new(Point3d::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.7, 0.3)).unwrap();
        for keep in [KeepSide::Positive, KeepSide::Negative] {
            let (cut, report) = bisect_and_cap(&unit_box(), &plane, keep, &Tolerance::default());
            assert_eq!(report.open_chains, 0);
            assert!(audit_closure(&cut).is_closed(), "{keep:?}");
            assert!(cut.signed_volume() > 0.0);
        }
    }

    #[test]
    fn test_halves_sum_to_whole() {
        let plane = Plane::new(Point3d::new(0.3, 0.5, 0.5), Vec3::new(1.0, -0.4, 0.2)).unwrap();
        let tol = Tolerance::default();
        let (a, _) = bisect_and_cap(&unit_box(), &plane, KeepSide::Positive, &tol);
        let (b, _) = bisect_and_cap(&unit_box(), &plane, KeepSide::Negative, &tol);
        assert_relative_eq!(a.signed_volume() + b.signed_volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_plane_missing_mesh_keeps_or_drops_everything() {
        let plane = Plane::axis_aligned(Axis::X, 5.0);
        let tol = Tolerance::default();
        let (kept, _) = bisect_and_cap(&unit_box(), &plane, KeepSide::Negative, &tol);
        assert_eq!(kept.face_count(), 6);
        let (gone, _) = bisect_and_cap(&unit_box(), &plane, KeepSide::Positive, &tol);
        assert!(gone.is_empty());
        assert_eq!(gone.vertex_count(), 0);
    }

    #[test]
    fn test_cut_along_touching_faces_separates_shells() {
        let mut two = make_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
        two.append(&make_box(Point3d::new(1.0, 0.0, 0.0), Point3d::new(2.0, 1.0, 1.0)));
        let plane = Plane::axis_aligned(Axis::X, 1.0);
        let (left, report) = bisect_and_cap(&two, &plane, KeepSide::Negative, &Tolerance::default());
        assert_eq!(report.cap_loops, 0);
        assert_eq!(left.face_count(), 6);
        assert!(audit_closure(&left).is_closed());
        assert_relative_eq!(left.bounding_box().max.x, 1.0);
    }
}
