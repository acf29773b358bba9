//! Property-based tests for kernel invariants using the `proptest` crate.

use proptest::prelude::*;

use gate_kernel::geometry::{BoundingBox, Plane, Point3d, Transform, Vec3};
use gate_kernel::mesh::bisect::{bisect_and_cap, KeepSide};
use gate_kernel::mesh::primitives::make_box;
use gate_kernel::{audit_closure, Tolerance};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
}

/// Arbitrary positive dimension suitable for box extents (avoids degenerate zero-size).
fn arb_positive_dim() -> impl Strategy<Value = f64> {
    0.05f64..10.0
}

fn arb_angle() -> impl Strategy<Value = f64> {
    -std::f64::consts::PI..std::f64::consts::PI
}

/// Fraction along each axis used to place a cutting plane inside a box.
fn arb_fraction() -> impl Strategy<Value = f64> {
    0.05f64..0.95
}

fn arb_direction() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_filter("non-zero direction", |(x, y, z)| x * x + y * y + z * z > 0.01)
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Rotation about a pivot keeps the pivot fixed
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rotation_about_pivot_fixes_pivot(
        (px, py, pz) in arb_point(),
        angle in arb_angle(),
    ) {
        let pivot = Point3d::new(px, py, pz);
        let t = Transform::rotation_z(angle).about(pivot);
        let moved = t.transform_point(&pivot);
        prop_assert!(moved.distance_to(&pivot) < TOL);
    }
}

// ---------------------------------------------------------------------------
// 2. Rotation about Z preserves distances
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rotation_preserves_distance(
        (ax, ay, az) in arb_point(),
        (bx, by, bz) in arb_point(),
        angle in arb_angle(),
    ) {
        let a = Point3d::new(ax, ay, az);
        let b = Point3d::new(bx, by, bz);
        let t = Transform::rotation_z(angle);
        let d0 = a.distance_to(&b);
        let d1 = t.transform_point(&a).distance_to(&t.transform_point(&b));
        prop_assert!((d0 - d1).abs() < TOL * d0.max(1.0));
    }
}

// ---------------------------------------------------------------------------
// 3. Export rotation round trip: +90 after -90 about X is the identity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn export_rotation_roundtrip((x, y, z) in arb_point()) {
        let p = Point3d::new(x, y, z);
        let half_pi = std::f64::consts::FRAC_PI_2;
        let there = Transform::rotation_x(-half_pi).transform_point(&p);
        prop_assert!((there.x - x).abs() < TOL);
        prop_assert!((there.y - z).abs() < TOL);
        prop_assert!((there.z + y).abs() < TOL);
        let back = Transform::rotation_x(half_pi).transform_point(&there);
        prop_assert!(back.distance_to(&p) < TOL);
    }
}

// ---------------------------------------------------------------------------
// 4. Any plane through a box leaves a closed solid on either side
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bisected_box_is_closed(
        (w, d, h) in (arb_positive_dim(), arb_positive_dim(), arb_positive_dim()),
        (fx, fy, fz) in (arb_fraction(), arb_fraction(), arb_fraction()),
        (nx, ny, nz) in arb_direction(),
        positive in any::<bool>(),
    ) {
        let mesh = make_box(Point3d::ORIGIN, Point3d::new(w, d, h));
        let plane = Plane::new(Point3d::new(fx * w, fy * d, fz * h), Vec3::new(nx, ny, nz)).unwrap();
        let keep = if positive { KeepSide::Positive } else { KeepSide::Negative };
        let (cut, report) = bisect_and_cap(&mesh, &plane, keep, &Tolerance::default());
        prop_assert_eq!(report.open_chains, 0);
        let audit = audit_closure(&cut);
        prop_assert!(audit.is_closed(), "audit: {:?}", audit);
        prop_assert!(cut.signed_volume() > 0.0);
    }
}

// ---------------------------------------------------------------------------
// 5. The two halves of a cut add up to the original volume
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bisected_halves_conserve_volume(
        (w, d, h) in (arb_positive_dim(), arb_positive_dim(), arb_positive_dim()),
        (fx, fy, fz) in (arb_fraction(), arb_fraction(), arb_fraction()),
        (nx, ny, nz) in arb_direction(),
    ) {
        let mesh = make_box(Point3d::ORIGIN, Point3d::new(w, d, h));
        let plane = Plane::new(Point3d::new(fx * w, fy * d, fz * h), Vec3::new(nx, ny, nz)).unwrap();
        let tol = Tolerance::default();
        let (a, _) = bisect_and_cap(&mesh, &plane, KeepSide::Positive, &tol);
        let (b, _) = bisect_and_cap(&mesh, &plane, KeepSide::Negative, &tol);
        let whole = w * d * h;
        prop_assert!((a.signed_volume() + b.signed_volume() - whole).abs() < TOL * whole.max(1.0));
    }
}

// ---------------------------------------------------------------------------
// 6. A cut's bounding box never grows beyond the source
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bisected_box_stays_inside_source(
        (w, d, h) in (arb_positive_dim(), arb_positive_dim(), arb_positive_dim()),
        (fx, fy, fz) in (arb_fraction(), arb_fraction(), arb_fraction()),
        (nx, ny, nz) in arb_direction(),
    ) {
        let source = BoundingBox::new(Point3d::ORIGIN, Point3d::new(w, d, h));
        let mesh = make_box(source.min, source.max);
        let plane = Plane::new(Point3d::new(fx * w, fy * d, fz * h), Vec3::new(nx, ny, nz)).unwrap();
        let (cut, _) = bisect_and_cap(&mesh, &plane, KeepSide::Negative, &Tolerance::default());
        let bb = cut.bounding_box();
        prop_assert!(bb.min.x >= -TOL && bb.min.y >= -TOL && bb.min.z >= -TOL);
        prop_assert!(bb.max.x <= w + TOL && bb.max.y <= d + TOL && bb.max.z <= h + TOL);
    }
}
