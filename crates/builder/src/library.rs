//! Procedural base segments and accessory templates.
//!
//! Every shape is a union of disjoint closed boxes, so any copy stays a
//! closed solid through tiling, cutting and merging.

use std::collections::BTreeMap;

use gate_kernel::geometry::{BoundingBox, Point3d, Vec3};
use gate_kernel::mesh::primitives::make_boxes;
use gate_kernel::mesh::Mesh;
use gate_kernel::scene::{ObjectId, Scene, SceneObject};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn b(min: [f64; 3], max: [f64; 3]) -> BoundingBox {
    BoundingBox::new(Point3d::from_array(min), Point3d::from_array(max))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentId {
    PlainPanel,
    LowRibPanel,
    HighRibPanel,
    CaissonCell,
    Slat77,
    Slat100,
    VerticalBoard,
    HorizontalBoard,
}

impl SegmentId {
    pub const ALL: [SegmentId; 8] = [
        SegmentId::PlainPanel,
        SegmentId::LowRibPanel,
        SegmentId::HighRibPanel,
        SegmentId::CaissonCell,
        SegmentId::Slat77,
        SegmentId::Slat100,
        SegmentId::VerticalBoard,
        SegmentId::HorizontalBoard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SegmentId::PlainPanel => "panel-gladki",
            SegmentId::LowRibPanel => "panel-niskie-przetloczenia",
            SegmentId::HighRibPanel => "panel-wysokie-przetloczenia",
            SegmentId::CaissonCell => "kaseton",
            SegmentId::Slat77 => "profil-77",
            SegmentId::Slat100 => "profil-100",
            SegmentId::VerticalBoard => "deska-pionowa",
            SegmentId::HorizontalBoard => "deska-pozioma",
        }
    }

    /// Boxes in segment space: X along the gate width, Y depth with the
    /// visible face towards -Y, Z up.
    fn boxes(self) -> Vec<BoundingBox> {
        match self {
            SegmentId::PlainPanel => vec![b([0.0, 0.0, 0.0], [1.0, 0.04, 0.4])],
            SegmentId::LowRibPanel => vec![
                b([0.0, 0.0, 0.0], [1.0, 0.04, 0.4]),
                b([0.0, -0.004, 0.095], [1.0, 0.0, 0.105]),
                b([0.0, -0.004, 0.295], [1.0, 0.0, 0.305]),
            ],
            SegmentId::HighRibPanel => vec![
                b([0.0, 0.0, 0.0], [1.0, 0.04, 0.4]),
                b([0.0, -0.01, 0.09], [1.0, 0.0, 0.11]),
                b([0.0, -0.01, 0.29], [1.0, 0.0, 0.31]),
            ],
            SegmentId::CaissonCell => vec![
                b([0.0, 0.0, 0.0], [0.4, 0.04, 0.4]),
                b([0.05, -0.008, 0.05], [0.35, 0.0, 0.35]),
            ],
            SegmentId::Slat77 => vec![
                b([0.0, 0.0, 0.0], [1.0, 0.02, 0.077]),
                b([0.0, -0.003, 0.035], [1.0, 0.0, 0.042]),
            ],
            SegmentId::Slat100 => vec![
                b([0.0, 0.0, 0.0], [1.0, 0.025, 0.1]),
                b([0.0, -0.003, 0.046], [1.0, 0.0, 0.054]),
            ],
            SegmentId::VerticalBoard => vec![
                b([0.0, 0.0, 0.0], [0.114, 0.03, 1.0]),
                b([0.0, 0.03, 0.0], [0.12, 0.036, 1.0]),
            ],
            SegmentId::HorizontalBoard => vec![
                b([0.0, 0.0, 0.0], [1.0, 0.03, 0.114]),
                b([0.0, 0.03, 0.0], [1.0, 0.036, 0.12]),
            ],
        }
    }
}

/// An immutable named solid that tiling copies from.
#[derive(Debug, Clone)]
pub struct BaseSegment {
    id: SegmentId,
    mesh: Mesh,
    bounds: BoundingBox,
}

impl BaseSegment {
    pub fn build(id: SegmentId) -> Self {
        let mesh = make_boxes(&id.boxes());
        let bounds = mesh.bounding_box();
        Self { id, mesh, bounds }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Intrinsic (width, depth, height).
    pub fn dimensions(&self) -> Vec3 {
        self.bounds.size()
    }

    /// Fresh mesh copy with its bounding box minimum moved to the origin.
    pub fn normalized_copy(&self) -> Mesh {
        let mut mesh = self.mesh.clone();
        mesh.translate(-self.bounds.min.to_vec3());
        mesh
    }
}

#[derive(Debug, Clone)]
pub struct SegmentLibrary {
    segments: BTreeMap<SegmentId, BaseSegment>,
}

impl SegmentLibrary {
    pub fn empty() -> Self {
        Self {
            segments: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self {
            segments: SegmentId::ALL.iter().map(|&id| (id, BaseSegment::build(id))).collect(),
        }
    }

    pub fn insert(&mut self, segment: BaseSegment) {
        self.segments.insert(segment.id(), segment);
    }

    pub fn get(&self, id: SegmentId) -> Option<&BaseSegment> {
        self.segments.get(&id)
    }
}

impl Default for SegmentLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

/// Template meshes the accessory placer copies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessoryTemplate {
    Rail,
    Window,
    Vent,
    PassDoor,
    Handle,
}

impl AccessoryTemplate {
    pub const ALL: [AccessoryTemplate; 5] = [
        AccessoryTemplate::Rail,
        AccessoryTemplate::Window,
        AccessoryTemplate::Vent,
        AccessoryTemplate::PassDoor,
        AccessoryTemplate::Handle,
    ];

    /// Scene object name the template is installed under.
    pub fn name(self) -> &'static str {
        match self {
            AccessoryTemplate::Rail => "szyny-na-brame",
            AccessoryTemplate::Window => "okno",
            AccessoryTemplate::Vent => "kratka-wentylacyjna",
            AccessoryTemplate::PassDoor => "drzwi-przejsciowe",
            AccessoryTemplate::Handle => "klamka",
        }
    }

    fn boxes(self) -> Vec<BoundingBox> {
        match self {
            // Two guide posts and a header beam, 1 x 1 m, stretched to the gate.
            AccessoryTemplate::Rail => vec![
                b([-0.5, -0.03, -0.5], [-0.45, 0.03, 0.5]),
                b([0.45, -0.03, -0.5], [0.5, 0.03, 0.5]),
                b([-0.45, -0.03, 0.45], [0.45, 0.03, 0.5]),
            ],
            AccessoryTemplate::Window => vec![
                b([-0.3, -0.015, -0.15], [0.3, 0.015, -0.12]),
                b([-0.3, -0.015, 0.12], [0.3, 0.015, 0.15]),
                b([-0.3, -0.015, -0.12], [-0.27, 0.015, 0.12]),
                b([0.27, -0.015, -0.12], [0.3, 0.015, 0.12]),
                b([-0.27, -0.004, -0.12], [0.27, 0.004, 0.12]),
            ],
            AccessoryTemplate::Vent => {
                let mut boxes = vec![b([-0.15, 0.0, -0.075], [0.15, 0.005, 0.075])];
                for k in 0..4 {
                    let z = -0.06 + 0.04 * k as f64;
                    boxes.push(b([-0.13, -0.005, z], [0.13, 0.0, z + 0.015]));
                }
                boxes
            }
            AccessoryTemplate::PassDoor => vec![
                b([-0.45, -0.025, -1.0], [-0.41, 0.025, 1.0]),
                b([0.41, -0.025, -1.0], [0.45, 0.025, 1.0]),
                b([-0.41, -0.025, 0.96], [0.41, 0.025, 1.0]),
                b([-0.41, -0.015, -1.0], [0.41, 0.015, 0.96]),
            ],
            AccessoryTemplate::Handle => vec![
                b([-0.02, 0.0, -0.1], [0.02, 0.01, 0.1]),
                b([-0.1, -0.05, 0.03], [0.02, 0.0, 0.05]),
            ],
        }
    }

    /// Mesh centred on its bounding box, ready to be copied and placed.
    pub fn build(self) -> Mesh {
        let mut mesh = make_boxes(&self.boxes());
        let center = mesh.bounding_box().center();
        mesh.translate(-center.to_vec3());
        mesh
    }
}

/// Add hidden template objects for `templates`; returns their ids.
pub fn install_templates(scene: &mut Scene, templates: &[AccessoryTemplate]) -> BTreeMap<AccessoryTemplate, ObjectId> {
    templates
        .iter()
        .map(|&template| {
            let mut object = SceneObject::new(template.name(), template.build());
            object.hidden = true;
            let id = scene.add(object);
            debug!(template = template.name(), "installed accessory template");
            (template, id)
        })
        .collect()
}
