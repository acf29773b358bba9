use std::path::Path;

use chrono::Utc;
use gate_builder::library::install_templates;
use gate_builder::pipeline::{GatePipeline, Stage, GENERATED_PREFIXES};
use gate_builder::{AccessoryTemplate, BuildError, PipelineConfig, SegmentLibrary, GATE_SOLID_NAME};
use gate_kernel::Scene;
use file_format::obj::{GATE_OBJ_FILE, SCENE_MTL_FILE, SCENE_OBJ_FILE};
use file_format::{load_bounds, load_manifest, LoadError, GATE_DATA_FILE, MANIFEST_FILE};
use gate_types::{AccessoryKind, GateSpec, GateType, LeafCount, StyleOption};

// ── Helper Functions ─────────────────────────────────────────────────────

fn swing_double() -> GateSpec {
    GateSpec::new(GateType::Swing, 2500.0, 2000.0)
        .with_style(LeafCount::Double)
        .with_option(AccessoryKind::KEY, vec!["Okna", "Szyny"])
}

fn count_objects(obj: &str) -> usize {
    obj.lines().filter(|l| l.starts_with("o ")).count()
}

fn sectional() -> GateSpec {
    GateSpec::new(GateType::Sectional, 3000.0, 2125.0)
}

fn write_checkpoint(spec: &GateSpec, dir: &Path) {
    GatePipeline::default()
        .run_geometry(spec, dir, "textures/bialy.png")
        .unwrap();
}

// ── Geometry Stage ───────────────────────────────────────────────────────

#[test]
fn geometry_stage_writes_checkpoint_before_split() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = GatePipeline::default();
    let report = pipeline.run_geometry(&swing_double(), dir.path(), "textures/bialy.png").unwrap();

    assert_eq!(report.stage, Stage::Geometry);
    let bounds = load_bounds(&dir.path().join(GATE_DATA_FILE)).unwrap();
    assert_eq!(bounds, report.bounds);
    assert!((bounds.width() - 2.5).abs() < 1e-9);
    assert!((bounds.height() - 2.0).abs() < 1e-9);

    // Hidden joined solid stays out of the export; both leaves go in.
    let obj = std::fs::read_to_string(dir.path().join(GATE_OBJ_FILE)).unwrap();
    assert_eq!(count_objects(&obj), 2);
    assert!(obj.contains("o skrzydlo-lewe"));
    assert!(obj.contains("o skrzydlo-prawe"));
}

#[test]
fn geometry_stage_is_idempotent() {
    let spec = GateSpec::new(GateType::Sectional, 3000.0, 2125.0);
    let mut pipeline = GatePipeline::default();
    let first = pipeline.build_geometry(&spec).unwrap();
    let objects_after_first = pipeline.scene.len();
    let second = pipeline.build_geometry(&spec).unwrap();

    assert_eq!(first.bounds, second.bounds);
    assert_eq!(pipeline.scene.len(), objects_after_first);
    let solids = pipeline.scene.objects().filter(|(_, o)| o.name == GATE_SOLID_NAME).count();
    assert_eq!(solids, 1);
}

// ── Accessory Stage ──────────────────────────────────────────────────────

#[test]
fn accessory_stage_reads_checkpoint_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let spec = swing_double();
    GatePipeline::default()
        .run_geometry(&spec, dir.path(), "textures/bialy.png")
        .unwrap();

    // A fresh pipeline sees nothing of stage one but the file.
    let mut accessories = GatePipeline::default();
    let report = accessories.run_accessories(&spec, dir.path(), "textures/bialy.png").unwrap();
    assert_eq!(report.stage, Stage::Accessories);

    let obj = std::fs::read_to_string(dir.path().join(SCENE_OBJ_FILE)).unwrap();
    // Swing gates drop rails: two windows only.
    assert_eq!(count_objects(&obj), 2);
    assert!(obj.contains("o akc-okno-lewe"));
    assert!(!obj.contains("szyny"));
    assert!(accessories.warnings.is_empty());
}

#[test]
fn accessory_stage_without_checkpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = GatePipeline::default()
        .run_accessories(&swing_double(), dir.path(), "textures/bialy.png")
        .unwrap_err();
    assert!(matches!(err, BuildError::Load(LoadError::Io { .. })));
}

#[test]
fn standalone_accessory_stage_with_nothing_selected_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let spec = sectional();
    write_checkpoint(&spec, dir.path());

    let mut accessories = GatePipeline::default();
    let report = accessories.run_accessories(&spec, dir.path(), "textures/bialy.png").unwrap();
    assert_eq!(report.artifacts, vec![SCENE_OBJ_FILE.to_string(), SCENE_MTL_FILE.to_string()]);
    assert!(accessories.warnings.is_empty());

    let obj = std::fs::read_to_string(dir.path().join(SCENE_OBJ_FILE)).unwrap();
    assert_eq!(count_objects(&obj), 0);
    assert!(dir.path().join(SCENE_MTL_FILE).exists());

    let manifest = accessories.write_manifest(&spec, dir.path(), &[report]).unwrap();
    assert!(manifest.exists());
}

#[test]
fn standalone_accessory_stage_skips_missing_rail_template() {
    let dir = tempfile::tempdir().unwrap();
    let spec = sectional().with_option(AccessoryKind::KEY, "Szyny");
    write_checkpoint(&spec, dir.path());

    let mut scene = Scene::new();
    install_templates(&mut scene, &[AccessoryTemplate::Window]);
    let mut accessories = GatePipeline::with_scene(PipelineConfig::default(), scene, SegmentLibrary::standard());
    let report = accessories.run_accessories(&spec, dir.path(), "textures/bialy.png").unwrap();
    assert_eq!(report.stage, Stage::Accessories);
    assert!(accessories.warnings.iter().any(|w| w.contains("szyny-na-brame")));

    let obj = std::fs::read_to_string(dir.path().join(SCENE_OBJ_FILE)).unwrap();
    assert_eq!(count_objects(&obj), 0);
}

#[test]
fn accessory_rerun_replaces_previous_accessories() {
    let spec = GateSpec::new(GateType::Sectional, 3000.0, 2125.0).with_option(AccessoryKind::KEY, "Kratki wentylacyjne");
    let mut pipeline = GatePipeline::default();
    let geometry = pipeline.build_geometry(&spec).unwrap();
    let first = pipeline.build_accessories(&spec, &geometry.bounds).unwrap();
    let second = pipeline.build_accessories(&spec, &geometry.bounds).unwrap();

    assert_eq!(first.placed.len(), 2);
    assert_eq!(second.placed.len(), 2);
    let vents = pipeline
        .scene
        .objects()
        .filter(|(_, o)| o.name.starts_with("akc-kratka"))
        .count();
    assert_eq!(vents, 2);
}

// ── Full Run ─────────────────────────────────────────────────────────────

#[test]
fn full_run_writes_manifest_last() {
    let dir = tempfile::tempdir().unwrap();
    let spec = GateSpec::new(GateType::Roller, 3000.0, 2125.0).with_option(AccessoryKind::KEY, vec!["Okna", "Szyny"]);
    let mut pipeline = GatePipeline::new(PipelineConfig::default());
    let texture = pipeline.texture_for(&spec);

    let geometry = pipeline.run_geometry(&spec, dir.path(), &texture).unwrap();
    let accessories = pipeline.run_accessories(&spec, dir.path(), &texture).unwrap();
    let path = pipeline.write_manifest(&spec, dir.path(), &[geometry, accessories]).unwrap();
    assert_eq!(path, dir.path().join(MANIFEST_FILE));

    let manifest = load_manifest(&path).unwrap();
    assert_eq!(manifest.gate_type, "Brama roletowa");
    assert_eq!(manifest.stages, vec!["geometry".to_string(), "accessories".to_string()]);
    assert!(manifest.completed >= manifest.started);
    // Roller gates cannot carry windows.
    assert_eq!(manifest.warnings.len(), 1);

    // Gate body plus the rail in the combined scene.
    let obj = std::fs::read_to_string(dir.path().join(SCENE_OBJ_FILE)).unwrap();
    assert!(obj.contains(&format!("o {GATE_SOLID_NAME}")));
    assert!(obj.contains("o akc-szyny"));
}

#[test]
fn manifest_records_when_the_run_began() {
    let dir = tempfile::tempdir().unwrap();
    let spec = sectional();
    let before = Utc::now();
    let mut pipeline = GatePipeline::default();
    let started = pipeline.started;
    assert!(started >= before);

    let geometry = pipeline.run_geometry(&spec, dir.path(), "textures/bialy.png").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));
    let path = pipeline.write_manifest(&spec, dir.path(), &[geometry]).unwrap();

    let manifest = load_manifest(&path).unwrap();
    assert_eq!(manifest.started, started);
    assert!(manifest.completed > manifest.started);
}

#[test]
fn purge_removes_every_generated_prefix() {
    let mut pipeline = GatePipeline::default();
    let spec = swing_double();
    let geometry = pipeline.build_geometry(&spec).unwrap();
    pipeline.build_accessories(&spec, &geometry.bounds).unwrap();

    pipeline.purge_generated();
    for name in pipeline.scene.names() {
        assert!(!GENERATED_PREFIXES.iter().any(|p| name.starts_with(p)), "{name} survived purge");
    }
}
