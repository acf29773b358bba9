//! Pipeline-level properties: tiling coverage, cut closure, idempotent
//! regeneration and mirrored accessory pairs.

use gate_builder::pipeline::GatePipeline;
use gate_builder::tiler::plan_linear;
use gate_builder::GATE_SOLID_NAME;
use gate_kernel::geometry::{Plane, Point3d, Vec3};
use gate_kernel::mesh::primitives::make_box;
use gate_kernel::scene::SceneObject;
use gate_kernel::{KeepSide, Tolerance};
use gate_types::{AccessoryKind, GateSpec, GateType, LeafCount, StyleOption};
use test_harness::assertions::{assert_all, assert_verdict};
use test_harness::oracle::{check_bounds_match, check_closed, check_mirror_pair, check_tiling_coverage};

// ── Tiling Coverage ─────────────────────────────────────────────────────

#[test]
fn tiling_covers_every_target() {
    let tol = Tolerance::default();
    let mut verdicts = Vec::new();
    for extent in [0.077, 0.1, 0.12, 0.4] {
        for step in 0..=60 {
            let target = step as f64 * 0.05;
            let plan = plan_linear(target, extent, &tol).unwrap();
            verdicts.push(check_tiling_coverage(&plan, target, extent, &tol));
        }
    }
    assert_all(&verdicts, "tiling grid").unwrap();
}

// ── Cut Closure ─────────────────────────────────────────────────────────

#[test]
fn gate_solid_stays_closed_under_oblique_cuts() {
    let mut pipeline = GatePipeline::default();
    let outcome = pipeline.build_geometry(&GateSpec::new(GateType::Sectional, 3000.0, 2125.0)).unwrap();
    let center = outcome.solid.bounds.center();

    let normals = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.3, 1.0, -0.7),
        Vec3::new(-0.2, 0.5, 1.0),
    ];
    let mut verdicts = vec![check_closed(&pipeline.scene.world_mesh(outcome.solid.id).unwrap())];
    for (i, normal) in normals.iter().enumerate() {
        let plane = Plane::new(center, *normal).unwrap();
        for keep in [KeepSide::Positive, KeepSide::Negative] {
            let copy = pipeline
                .scene
                .copy_independent(outcome.solid.id, &format!("brama-ciecie-{i}"))
                .unwrap();
            pipeline.scene.bisect(copy, &plane, keep).unwrap();
            verdicts.push(check_closed(&pipeline.scene.world_mesh(copy).unwrap()));
        }
    }
    assert_all(&verdicts, "oblique cuts").unwrap();
}

// ── Idempotent Regeneration ─────────────────────────────────────────────

#[test]
fn regeneration_over_stale_scene_matches_clean_run() {
    let spec = GateSpec::new(GateType::Swing, 2500.0, 2000.0)
        .with_style(LeafCount::Double)
        .with_option(AccessoryKind::KEY, vec!["Okna", "Kratki wentylacyjne"]);

    let mut clean = GatePipeline::default();
    let clean_outcome = clean.build_geometry(&spec).unwrap();

    let mut stale = GatePipeline::default();
    let first = stale.build_geometry(&spec).unwrap();
    stale.build_accessories(&spec, &first.bounds).unwrap();
    // Leftovers from an interrupted run.
    stale.scene.add(SceneObject::new(
        "segment.042",
        make_box(Point3d::new(5.0, 5.0, 5.0), Point3d::new(6.0, 6.0, 6.0)),
    ));
    stale.scene.add(SceneObject::new(
        "brama-koniec",
        make_box(Point3d::ORIGIN, Point3d::new(9.0, 1.0, 9.0)),
    ));
    let second = stale.build_geometry(&spec).unwrap();

    assert_eq!(second.bounds, clean_outcome.bounds);
    assert_verdict(
        &check_bounds_match(&second.solid.bounds, &clean_outcome.solid.bounds, 1e-12),
        "stale regeneration",
    )
    .unwrap();

    let names = stale.scene.names();
    assert_eq!(names.iter().filter(|n| **n == GATE_SOLID_NAME).count(), 1);
    assert!(!names.iter().any(|n| n.starts_with("segment.") || n.starts_with("akc-")));
    assert_eq!(names.len(), clean.scene.names().len());
}

// ── Mirrored Accessory Pairs ────────────────────────────────────────────

#[test]
fn left_and_right_accessories_mirror_across_gate_center() {
    let spec = GateSpec::new(GateType::Sectional, 4000.0, 2250.0)
        .with_option(AccessoryKind::KEY, vec!["Okna", "Kratki wentylacyjne"]);
    let mut pipeline = GatePipeline::default();
    let geometry = pipeline.build_geometry(&spec).unwrap();
    let outcome = pipeline.build_accessories(&spec, &geometry.bounds).unwrap();

    let bounds_of = |name: &str| {
        outcome
            .placed
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("{name} not placed"))
            .bounds
    };
    let center_x = geometry.solid.bounds.center().x;
    let verdicts = vec![
        check_mirror_pair(&bounds_of("akc-okno-lewe"), &bounds_of("akc-okno-prawe"), center_x, 1e-9),
        check_mirror_pair(&bounds_of("akc-kratka-lewa"), &bounds_of("akc-kratka-prawa"), center_x, 1e-9),
    ];
    assert_all(&verdicts, "mirrored pairs").unwrap();

    // Wide gates get a centred third window.
    let middle = bounds_of("akc-okno-srodek");
    assert!((middle.center().x - center_x).abs() < 1e-9);
}
