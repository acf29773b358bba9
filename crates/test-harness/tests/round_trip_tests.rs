//! Exported OBJ files re-imported through an independent reader.

use file_format::obj::ObjObject;
use gate_builder::pipeline::GatePipeline;
use gate_builder::GATE_SOLID_NAME;
use gate_types::{AccessoryKind, FillPattern, GateSpec, GateType, LeafCount, StyleOption};
use test_harness::assertions::{assert_all, assert_object_names};
use test_harness::obj_import::find;
use test_harness::oracle::check_round_trip;
use test_harness::{import_obj, render_to};

const ROUND_TRIP_TOL: f64 = 1e-4;

// ── Gate Body ───────────────────────────────────────────────────────────

#[test]
fn gate_obj_round_trips_for_every_family() {
    let specs = [
        GateSpec::new(GateType::Sectional, 3000.0, 2125.0),
        GateSpec::new(GateType::Sectional, 2200.0, 2000.0).with_style(FillPattern::Caisson),
        GateSpec::new(GateType::Roller, 2800.0, 2200.0),
        GateSpec::new(GateType::TiltUp, 2500.0, 2100.0),
    ];

    for spec in &specs {
        let dir = tempfile::tempdir().unwrap();
        let rendered = render_to(GatePipeline::default(), spec, dir.path()).unwrap();
        let scene = &rendered.pipeline.scene;
        let id = scene.require(GATE_SOLID_NAME).unwrap();
        let object = scene.get(id).unwrap();
        let exported = ObjObject::from_scene_object(object);

        let imported = import_obj(&rendered.gate_obj()).unwrap();
        assert_object_names(&imported, &[GATE_SOLID_NAME], spec.gate_type.label()).unwrap();
        let verdict = check_round_trip(&imported[0], &exported.mesh, &object.world_bounding_box(), ROUND_TRIP_TOL);
        assert!(verdict.passed, "{:?}: {}", spec.gate_type, verdict.detail);
        assert!(imported[0].has_normals && imported[0].has_uvs);
        assert_eq!(imported[0].material.as_deref(), Some("gate_material"));
    }
}

// ── Combined Scene ──────────────────────────────────────────────────────

#[test]
fn scene_obj_round_trips_every_object() {
    let spec = GateSpec::new(GateType::Sectional, 3000.0, 2125.0).with_option(
        AccessoryKind::KEY,
        vec!["Szyny", "Okna", "Kratki wentylacyjne", "Drzwi przejściowe"],
    );
    let dir = tempfile::tempdir().unwrap();
    let rendered = render_to(GatePipeline::default(), &spec, dir.path()).unwrap();
    let imported = import_obj(&rendered.scene_obj()).unwrap();

    let scene = &rendered.pipeline.scene;
    let visible: Vec<_> = scene.visible_objects().map(|(_, o)| o).collect();
    assert_eq!(imported.len(), visible.len());

    let verdicts: Vec<_> = visible
        .iter()
        .map(|object| {
            let exported = ObjObject::from_scene_object(object);
            let back = find(&imported, &object.name).unwrap();
            check_round_trip(back, &exported.mesh, &object.world_bounding_box(), ROUND_TRIP_TOL)
        })
        .collect();
    assert_all(&verdicts, "combined scene").unwrap();
}

#[test]
fn rotated_leaves_round_trip() {
    let spec = GateSpec::new(GateType::Swing, 3000.0, 2000.0).with_style(LeafCount::Double);
    let dir = tempfile::tempdir().unwrap();
    let rendered = render_to(GatePipeline::default(), &spec, dir.path()).unwrap();
    let imported = import_obj(&rendered.gate_obj()).unwrap();

    let scene = &rendered.pipeline.scene;
    for name in ["skrzydlo-lewe", "skrzydlo-prawe"] {
        let object = scene.get(scene.require(name).unwrap()).unwrap();
        let exported = ObjObject::from_scene_object(object);
        let verdict = check_round_trip(
            find(&imported, name).unwrap(),
            &exported.mesh,
            &object.world_bounding_box(),
            ROUND_TRIP_TOL,
        );
        assert!(verdict.passed, "{}", verdict.detail);
    }
}
