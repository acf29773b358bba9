//! Two-stage gate pipeline with file checkpoints.
//!
//! The geometry stage builds the gate body and writes the bounding box
//! checkpoint plus `gate.obj`. The accessory stage reads only that
//! checkpoint and the gate spec, places accessories and writes the combined
//! `scene.obj`. Both stages purge what a previous run generated first, so
//! rerunning on a populated scene gives the same result as a clean one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use file_format::obj::{GATE_MTL_FILE, GATE_OBJ_FILE, SCENE_MTL_FILE, SCENE_OBJ_FILE};
use file_format::{
    collect_objects, export_obj, load_bounds, save_bounds, save_manifest, ExportError, RenderManifest,
    GATE_DATA_FILE, MANIFEST_FILE,
};
use gate_kernel::geometry::{BoundingBox, Point3d};
use gate_kernel::scene::Scene;
use gate_types::{GateBounds, GateSpec, StyleOption};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::accessories::{
    apply_placements, plan_accessories, resolve_templates, template_sizes, PlacedAccessory, PlacementPlan,
    ACCESSORY_PREFIX,
};
use crate::config::PipelineConfig;
use crate::dispatcher::{dispatch, GatePlan};
use crate::error::BuildError;
use crate::library::{install_templates, AccessoryTemplate, SegmentLibrary};
use crate::pivot::{split_leaves, Leaf};
use crate::tiler::{tile, TileRequest, TiledSolid, SEGMENT_PREFIX};

/// Name prefixes of every object the pipeline generates.
pub const GENERATED_PREFIXES: [&str; 4] = ["brama-", SEGMENT_PREFIX, "skrzydlo-", ACCESSORY_PREFIX];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Geometry,
    Accessories,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Geometry => "geometry",
            Stage::Accessories => "accessories",
        }
    }
}

pub fn to_gate_bounds(bb: &BoundingBox) -> GateBounds {
    GateBounds::from_min_max(bb.min.to_array(), bb.max.to_array())
}

pub fn from_gate_bounds(bounds: &GateBounds) -> BoundingBox {
    BoundingBox::new(Point3d::from_array(bounds.min()), Point3d::from_array(bounds.max()))
}

fn is_generated(name: &str) -> bool {
    GENERATED_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn is_gate_body(name: &str) -> bool {
    name.starts_with("brama-") || name.starts_with("skrzydlo-")
}

#[derive(Debug, Clone)]
pub struct GeometryOutcome {
    pub plan: GatePlan,
    pub solid: TiledSolid,
    /// Bounds of the joined solid, taken before any leaf split.
    pub bounds: GateBounds,
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone)]
pub struct AccessoryOutcome {
    pub plan: PlacementPlan,
    pub placed: Vec<PlacedAccessory>,
}

#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    /// Files written, relative to the output directory.
    pub artifacts: Vec<String>,
    pub bounds: GateBounds,
}

pub struct GatePipeline {
    pub config: PipelineConfig,
    pub scene: Scene,
    pub library: SegmentLibrary,
    /// Skipped sub-steps and input fallbacks, in the order they happened.
    pub warnings: Vec<String>,
    /// When this run began; stamped into the render manifest.
    pub started: DateTime<Utc>,
}

impl GatePipeline {
    /// Fresh scene with every accessory template installed.
    pub fn new(config: PipelineConfig) -> Self {
        let mut scene = Scene::with_tolerance(config.tolerance);
        install_templates(&mut scene, &AccessoryTemplate::ALL);
        Self::with_scene(config, scene, SegmentLibrary::standard())
    }

    pub fn with_scene(config: PipelineConfig, mut scene: Scene, library: SegmentLibrary) -> Self {
        scene.tolerance = config.tolerance;
        Self {
            config,
            scene,
            library,
            warnings: Vec::new(),
            started: Utc::now(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Remove everything a previous run generated; templates stay.
    pub fn purge_generated(&mut self) -> usize {
        let removed = self.scene.remove_where(|o| is_generated(&o.name));
        if removed > 0 {
            info!(removed, "purged stale generated objects");
        }
        removed
    }

    pub fn texture_for(&self, spec: &GateSpec) -> String {
        self.config.palette.texture_for(spec.color()).to_string()
    }

    /// Stage one in memory: tile the gate body and split it into leaves.
    #[instrument(skip_all, fields(gate_type = spec.gate_type.label()))]
    pub fn build_geometry(&mut self, spec: &GateSpec) -> Result<GeometryOutcome, BuildError> {
        self.purge_generated();
        if spec.below_minimum() {
            self.warn(format!(
                "gate {}x{} mm is below the configurator minimum",
                spec.width_mm, spec.height_mm
            ));
        }

        let plan = dispatch(spec, &self.library, &self.config.placement);
        for note in &plan.dropped {
            self.warnings.push(note.clone());
        }

        let segment = self
            .library
            .get(plan.segment)
            .ok_or(BuildError::MissingSegment(plan.segment))?;
        let request = TileRequest::centered(spec.width_m(), spec.height_m(), plan.tiling);
        let solid = tile(&mut self.scene, segment, &request)?;
        let bounds = to_gate_bounds(&solid.bounds);

        let leaves = split_leaves(&mut self.scene, solid.id, plan.leaves, &self.config.leaves)?;
        info!(pieces = solid.pieces, leaves = leaves.len(), "gate geometry built");
        Ok(GeometryOutcome {
            plan,
            solid,
            bounds,
            leaves,
        })
    }

    /// Stage two in memory: place accessories around `bounds`.
    #[instrument(skip_all, fields(gate_type = spec.gate_type.label()))]
    pub fn build_accessories(&mut self, spec: &GateSpec, bounds: &GateBounds) -> Result<AccessoryOutcome, BuildError> {
        self.scene.remove_where(|o| o.name.starts_with(ACCESSORY_PREFIX));

        let plan = dispatch(spec, &self.library, &self.config.placement);
        let ids = resolve_templates(&self.scene);
        let sizes = template_sizes(&self.scene, &ids)?;
        let placement = plan_accessories(
            &from_gate_bounds(bounds),
            &plan.accessories,
            &sizes,
            &self.config.placement,
            &self.config.tolerance,
        );
        for template in &placement.missing {
            self.warn(format!("accessory template '{}' not found, skipping", template.name()));
        }

        let placed = apply_placements(&mut self.scene, &placement, &ids);
        if placed.len() < placement.placements.len() {
            self.warn(format!(
                "placed {} of {} accessories",
                placed.len(),
                placement.placements.len()
            ));
        }
        Ok(AccessoryOutcome { plan: placement, placed })
    }

    /// Geometry stage with checkpoints: writes `gate_data.json`, then the
    /// gate body to `gate.obj`/`gate.mtl`.
    pub fn run_geometry(&mut self, spec: &GateSpec, out_dir: &Path, texture: &str) -> Result<StageReport, BuildError> {
        let outcome = self.build_geometry(spec)?;
        std::fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
        save_bounds(&out_dir.join(GATE_DATA_FILE), &outcome.bounds)?;

        let objects = collect_objects(&self.scene, |o| is_gate_body(&o.name));
        export_obj(out_dir, GATE_OBJ_FILE, GATE_MTL_FILE, &objects, texture)?;

        Ok(StageReport {
            stage: Stage::Geometry,
            artifacts: vec![
                GATE_DATA_FILE.to_string(),
                GATE_OBJ_FILE.to_string(),
                GATE_MTL_FILE.to_string(),
            ],
            bounds: outcome.bounds,
        })
    }

    /// Accessory stage with checkpoints: reads `gate_data.json`, writes every
    /// visible object to `scene.obj`/`scene.mtl`.
    pub fn run_accessories(&mut self, spec: &GateSpec, out_dir: &Path, texture: &str) -> Result<StageReport, BuildError> {
        let bounds = load_bounds(&out_dir.join(GATE_DATA_FILE))?;
        self.build_accessories(spec, &bounds)?;

        let objects = collect_objects(&self.scene, |_| true);
        export_obj(out_dir, SCENE_OBJ_FILE, SCENE_MTL_FILE, &objects, texture)?;

        Ok(StageReport {
            stage: Stage::Accessories,
            artifacts: vec![SCENE_OBJ_FILE.to_string(), SCENE_MTL_FILE.to_string()],
            bounds,
        })
    }

    /// Write the completion marker for the stages that ran.
    pub fn write_manifest(&self, spec: &GateSpec, out_dir: &Path, reports: &[StageReport]) -> Result<PathBuf, BuildError> {
        let mut manifest = RenderManifest::started_at(spec.gate_type.label(), self.started);
        for report in reports {
            manifest.record_stage(report.stage.name(), report.artifacts.iter().cloned());
            manifest.bounds = Some(report.bounds);
        }
        manifest.warnings = self.warnings.clone();
        let path = out_dir.join(MANIFEST_FILE);
        save_manifest(&path, &mut manifest)?;
        info!(path = %path.display(), "wrote render manifest");
        Ok(path)
    }
}

impl Default for GatePipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_types::GateType;

    #[test]
    fn test_bounds_conversion_round_trip() {
        let bb = BoundingBox::new(Point3d::new(-1.5, 0.0, 0.0), Point3d::new(1.5, 0.04, 2.125));
        let back = from_gate_bounds(&to_gate_bounds(&bb));
        assert!(back.approx_eq(&bb, 1e-12));
    }

    #[test]
    fn test_purge_keeps_templates() {
        let mut pipeline = GatePipeline::default();
        pipeline.build_geometry(&GateSpec::default()).unwrap();
        let templates = AccessoryTemplate::ALL.len();
        assert_eq!(pipeline.scene.len(), templates + 1);
        assert_eq!(pipeline.purge_generated(), 1);
        assert_eq!(pipeline.scene.len(), templates);
    }

    #[test]
    fn test_below_minimum_is_warned() {
        let mut pipeline = GatePipeline::default();
        pipeline
            .build_geometry(&GateSpec::new(GateType::Sectional, 2000.0, 1900.0))
            .unwrap();
        assert_eq!(pipeline.warnings.len(), 1);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Geometry.name(), "geometry");
        assert_eq!(Stage::Accessories.name(), "accessories");
    }
}
