//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use std::collections::BTreeSet;

use gate_builder::tiler::LinearPlan;
use gate_kernel::geometry::BoundingBox;
use gate_kernel::mesh::Mesh;
use gate_kernel::{audit_closure, Tolerance};
use gate_tessellation::TriangleMesh;

use crate::obj_import::ImportedObject;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

// ── Tiling Oracles ──────────────────────────────────────────────────────────

/// Full segments plus the partial remainder cover `target`, and the full
/// count is `floor(target / extent)` up to the rounding slack.
pub fn check_tiling_coverage(plan: &LinearPlan, target: f64, extent: f64, tol: &Tolerance) -> OracleVerdict {
    let covered = plan.covered(extent);
    let gap = (covered - target).abs();
    if gap > tol.min_partial + tol.rounding {
        return OracleVerdict::fail(
            "tiling_coverage",
            format!("covered {covered:.6} of {target:.6} (gap {gap:.2e})"),
        )
        .with_value(gap);
    }

    let expected_full = ((target + tol.rounding) / extent).floor() as usize;
    if plan.full != expected_full {
        return OracleVerdict::fail(
            "tiling_coverage",
            format!("expected {expected_full} full segments, got {}", plan.full),
        );
    }
    OracleVerdict::pass(
        "tiling_coverage",
        format!("{} full + {:?} partial covers {target:.6}", plan.full, plan.partial),
    )
    .with_value(gap)
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Every directed edge is matched by its reverse exactly once.
pub fn check_closed(mesh: &Mesh) -> OracleVerdict {
    let audit = audit_closure(mesh);
    if audit.is_closed() {
        OracleVerdict::pass("closed_mesh", format!("{} faces, no open edges", mesh.face_count()))
    } else {
        OracleVerdict::fail(
            "closed_mesh",
            format!(
                "{} boundary edges, {} non-manifold edges",
                audit.boundary_edges, audit.non_manifold_edges
            ),
        )
        .with_value(audit.boundary_edges as f64)
    }
}

/// Largest per-coordinate difference between two boxes.
fn bounds_deviation(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let d = [
        a.min.x - b.min.x,
        a.min.y - b.min.y,
        a.min.z - b.min.z,
        a.max.x - b.max.x,
        a.max.y - b.max.y,
        a.max.z - b.max.z,
    ];
    d.iter().fold(0.0f64, |m, v| m.max(v.abs()))
}

pub fn check_bounds_match(actual: &BoundingBox, expected: &BoundingBox, tol: f64) -> OracleVerdict {
    let deviation = bounds_deviation(actual, expected);
    if deviation <= tol {
        OracleVerdict::pass("bounds_match", format!("deviation {deviation:.2e}")).with_value(deviation)
    } else {
        OracleVerdict::fail(
            "bounds_match",
            format!("expected {expected:?}, got {actual:?} (deviation {deviation:.2e}, tol {tol})"),
        )
        .with_value(deviation)
    }
}

/// `left` and `right` are mirror images across the plane `x = center_x`.
pub fn check_mirror_pair(left: &BoundingBox, right: &BoundingBox, center_x: f64, tol: f64) -> OracleVerdict {
    let mirrored = BoundingBox::new(
        left.min.with_component(gate_kernel::Axis::X, 2.0 * center_x - left.max.x),
        left.max.with_component(gate_kernel::Axis::X, 2.0 * center_x - left.min.x),
    );
    let deviation = bounds_deviation(&mirrored, right);
    if deviation <= tol {
        OracleVerdict::pass("mirror_pair", format!("mirrored across x={center_x:.4}")).with_value(deviation)
    } else {
        OracleVerdict::fail(
            "mirror_pair",
            format!("mirror of {left:?} is {mirrored:?}, got {right:?}"),
        )
        .with_value(deviation)
    }
}

// ── Export Oracles ──────────────────────────────────────────────────────────

/// Re-imported object has the same vertices, triangles and (working-frame)
/// bounds as the mesh handed to the writer.
pub fn check_round_trip(
    imported: &ImportedObject,
    exported: &TriangleMesh,
    world_bounds: &BoundingBox,
    tol: f64,
) -> OracleVerdict {
    let referenced: BTreeSet<u32> = exported.corners.iter().map(|c| c.position).collect();
    if imported.vertex_count != referenced.len() {
        return OracleVerdict::fail(
            "round_trip",
            format!("{}: {} vertices re-imported, {} written", imported.name, imported.vertex_count, referenced.len()),
        );
    }
    if imported.triangle_count != exported.triangle_count() {
        return OracleVerdict::fail(
            "round_trip",
            format!(
                "{}: {} triangles re-imported, {} written",
                imported.name,
                imported.triangle_count,
                exported.triangle_count()
            ),
        );
    }
    let bounds = check_bounds_match(&imported.bounds, world_bounds, tol);
    if !bounds.passed {
        return OracleVerdict::fail("round_trip", format!("{}: {}", imported.name, bounds.detail));
    }
    OracleVerdict::pass(
        "round_trip",
        format!("{}: {} vertices, {} triangles", imported.name, imported.vertex_count, imported.triangle_count),
    )
}
