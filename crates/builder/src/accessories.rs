//! Accessory placement relative to the gate's bounding box.
//!
//! Planning is a pure function of the persisted bounds, the selection and
//! the template sizes; it never looks at the gate mesh. Applying a plan
//! copies the named templates into the scene.

use std::collections::BTreeMap;

use gate_kernel::geometry::{BoundingBox, Point3d, Vec3};
use gate_kernel::scene::{ObjectId, Scene};
use gate_kernel::Tolerance;
use gate_types::{AccessorySelection, HandleStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PlacementRules;
use crate::error::BuildError;
use crate::library::AccessoryTemplate;

pub const ACCESSORY_PREFIX: &str = "akc-";

/// Vertical placement policy for windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WindowRow {
    /// Window centre this far above the gate's lower face.
    FixedHeight(f64),
    /// Centred on a whole tiled segment, counted down from the topmost one.
    SegmentRow { extent: f64, from_top: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryRequest {
    pub selection: AccessorySelection,
    pub handle: HandleStyle,
    pub window_row: WindowRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub template: AccessoryTemplate,
    pub name: String,
    /// World position of the placed copy's bounding box centre.
    pub center: Point3d,
    pub scale: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPlan {
    pub placements: Vec<Placement>,
    /// Requested templates that were not available.
    pub missing: Vec<AccessoryTemplate>,
}

pub type TemplateSizes = BTreeMap<AccessoryTemplate, Vec3>;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAccessory {
    pub id: ObjectId,
    pub name: String,
    pub template: AccessoryTemplate,
    pub bounds: BoundingBox,
}

fn accessory_name(suffix: &str) -> String {
    format!("{ACCESSORY_PREFIX}{suffix}")
}

/// Height of the window centre above the world origin.
pub fn window_center_z(bounds: &BoundingBox, row: WindowRow, tol: &Tolerance) -> f64 {
    match row {
        WindowRow::FixedHeight(h) => bounds.min.z + h,
        WindowRow::SegmentRow { extent, from_top } => {
            let height = bounds.size().z;
            let rows = if extent > 0.0 {
                (height / extent + tol.rounding).floor() as usize
            } else {
                0
            };
            if rows == 0 {
                return bounds.center().z;
            }
            let index = rows.saturating_sub(from_top.max(1));
            bounds.min.z + (index as f64 + 0.5) * extent
        }
    }
}

/// Handle height offset for a handle style; `None` means no handle.
fn handle_offset(style: HandleStyle, rules: &PlacementRules) -> Option<f64> {
    match style {
        HandleStyle::Start => None,
        HandleStyle::Standard => Some(0.0),
        HandleStyle::Escutcheon => Some(rules.handle_escutcheon_offset),
        HandleStyle::Grip => Some(rules.handle_grip_offset),
    }
}

struct Planner<'a> {
    sizes: &'a TemplateSizes,
    plan: PlacementPlan,
}

impl Planner<'_> {
    fn size(&mut self, template: AccessoryTemplate) -> Option<Vec3> {
        let size = self.sizes.get(&template).copied();
        if size.is_none() && !self.plan.missing.contains(&template) {
            self.plan.missing.push(template);
        }
        size
    }

    fn push(&mut self, template: AccessoryTemplate, suffix: &str, center: Point3d, scale: Vec3) {
        self.plan.placements.push(Placement {
            template,
            name: accessory_name(suffix),
            center,
            scale,
        });
    }
}

/// Compute where every requested accessory goes.
pub fn plan_accessories(
    bounds: &BoundingBox,
    request: &AccessoryRequest,
    sizes: &TemplateSizes,
    rules: &PlacementRules,
    tol: &Tolerance,
) -> PlacementPlan {
    let mut planner = Planner {
        sizes,
        plan: PlacementPlan::default(),
    };
    let (min, max) = (bounds.min, bounds.max);
    let center = bounds.center();
    let gate = bounds.size();
    let selection = request.selection;

    if selection.rails {
        if let Some(s) = planner.size(AccessoryTemplate::Rail) {
            let width = gate.x + rules.rail_padding;
            let height = gate.z + rules.rail_padding;
            planner.push(
                AccessoryTemplate::Rail,
                "szyny",
                Point3d::new(center.x, max.y + s.y / 2.0, min.z + height / 2.0),
                Vec3::new(width / s.x, 1.0, height / s.z),
            );
        }
    }

    if selection.windows {
        if let Some(s) = planner.size(AccessoryTemplate::Window) {
            let z = window_center_z(bounds, request.window_row, tol);
            let y = min.y - s.y / 2.0;
            let inset = rules.window_margin + s.x / 2.0;
            planner.push(AccessoryTemplate::Window, "okno-lewe", Point3d::new(min.x + inset, y, z), Vec3::ONE);
            planner.push(AccessoryTemplate::Window, "okno-prawe", Point3d::new(max.x - inset, y, z), Vec3::ONE);
            if gate.x > rules.center_window_min_width {
                planner.push(AccessoryTemplate::Window, "okno-srodek", Point3d::new(center.x, y, z), Vec3::ONE);
            }
        }
    }

    if selection.vents {
        if let Some(s) = planner.size(AccessoryTemplate::Vent) {
            let z = min.z + rules.vent_height;
            let y = min.y - s.y / 2.0;
            let inset = rules.vent_margin + s.x / 2.0;
            planner.push(AccessoryTemplate::Vent, "kratka-lewa", Point3d::new(min.x + inset, y, z), Vec3::ONE);
            planner.push(AccessoryTemplate::Vent, "kratka-prawa", Point3d::new(max.x - inset, y, z), Vec3::ONE);
        }
    }

    let mut door: Option<(Point3d, Vec3)> = None;
    if selection.pass_door {
        if let Some(s) = planner.size(AccessoryTemplate::PassDoor) {
            let clear_height = gate.z - rules.door_top_clearance;
            let scale_z = if s.z > clear_height && clear_height > 0.0 {
                clear_height / s.z
            } else {
                1.0
            };
            let placed = Vec3::new(s.x, s.y, s.z * scale_z);
            let c = Point3d::new(
                min.x + rules.door_margin(gate.x) + s.x / 2.0,
                min.y - s.y / 2.0,
                min.z + placed.z / 2.0,
            );
            planner.push(AccessoryTemplate::PassDoor, "drzwi", c, Vec3::new(1.0, 1.0, scale_z));
            door = Some((c, placed));
        }
    }

    if let Some(offset) = handle_offset(request.handle, rules) {
        if let Some(s) = planner.size(AccessoryTemplate::Handle) {
            let c = match door {
                Some((dc, ds)) => Point3d::new(
                    dc.x + ds.x / 2.0 - rules.handle_door_edge_offset,
                    min.y - ds.y - s.y / 2.0,
                    min.z + rules.handle_door_height + offset,
                ),
                None => Point3d::new(center.x, min.y - s.y / 2.0, min.z + rules.handle_gate_height + offset),
            };
            planner.push(AccessoryTemplate::Handle, "klamka", c, Vec3::ONE);
        }
    }

    planner.plan
}

/// Find installed templates by name. Missing ones are simply absent.
pub fn resolve_templates(scene: &Scene) -> BTreeMap<AccessoryTemplate, ObjectId> {
    AccessoryTemplate::ALL
        .iter()
        .filter_map(|&t| scene.find_by_name(t.name()).map(|id| (t, id)))
        .collect()
}

pub fn template_sizes(scene: &Scene, ids: &BTreeMap<AccessoryTemplate, ObjectId>) -> Result<TemplateSizes, BuildError> {
    ids.iter()
        .map(|(&t, &id)| Ok((t, scene.world_bounding_box(id)?.size())))
        .collect()
}

fn place_one(scene: &mut Scene, p: &Placement, template_id: ObjectId) -> Result<PlacedAccessory, BuildError> {
    let id = scene.copy_independent(template_id, &p.name)?;
    scene.recenter_origin(id)?;
    scene.scale(id, p.scale)?;
    scene.set_location(id, p.center)?;
    Ok(PlacedAccessory {
        id,
        name: p.name.clone(),
        template: p.template,
        bounds: scene.world_bounding_box(id)?,
    })
}

/// Copy templates into the scene according to `plan`.
///
/// A placement whose template cannot be copied is skipped with a warning;
/// the returned list holds only what was placed.
pub fn apply_placements(
    scene: &mut Scene,
    plan: &PlacementPlan,
    ids: &BTreeMap<AccessoryTemplate, ObjectId>,
) -> Vec<PlacedAccessory> {
    let mut placed = Vec::new();
    for p in &plan.placements {
        let Some(&template_id) = ids.get(&p.template) else {
            warn!(template = p.template.name(), "template vanished before placement");
            continue;
        };
        let result = place_one(scene, p, template_id);
        match result {
            Ok(accessory) => {
                debug!(name = %accessory.name, center = ?p.center, "placed accessory");
                placed.push(accessory);
            }
            Err(err) => warn!(name = %p.name, %err, "skipping accessory"),
        }
    }
    info!(count = placed.len(), "placed accessories");
    placed
}
