//! Style tables: what each gate family builds for a given selection.

use gate_kernel::geometry::Axis;
use gate_types::{
    AccessorySelection, FillPattern, GateSpec, GateType, HandleStyle, LeafCount, ProfileHeight,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::accessories::{AccessoryRequest, WindowRow};
use crate::config::PlacementRules;
use crate::library::{SegmentId, SegmentLibrary};
use crate::pivot::LeafConfig;
use crate::tiler::TilingMode;

/// Everything the pipeline needs to know about one gate, resolved from its spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatePlan {
    pub gate_type: GateType,
    pub segment: SegmentId,
    pub tiling: TilingMode,
    pub leaves: LeafConfig,
    pub accessories: AccessoryRequest,
    /// Selections this family cannot carry.
    pub dropped: Vec<String>,
}

/// Base segment and tiling mode for a gate family and style.
pub fn segment_for(gate_type: GateType, pattern: FillPattern, profile: ProfileHeight) -> (SegmentId, TilingMode) {
    use FillPattern as F;
    let along_z = TilingMode::Linear(Axis::Z);
    let along_x = TilingMode::Linear(Axis::X);

    match gate_type {
        GateType::Sectional => match pattern {
            F::Start | F::Plain => (SegmentId::PlainPanel, along_z),
            F::LowRib => (SegmentId::LowRibPanel, along_z),
            F::HighRib => (SegmentId::HighRibPanel, along_z),
            F::Caisson => (SegmentId::CaissonCell, TilingMode::Grid),
            F::VerticalBoards => (SegmentId::VerticalBoard, along_x),
            F::HorizontalBoards => (SegmentId::HorizontalBoard, along_z),
        },
        GateType::Roller => match profile {
            ProfileHeight::Start | ProfileHeight::Mm77 => (SegmentId::Slat77, along_z),
            ProfileHeight::Mm100 => (SegmentId::Slat100, along_z),
        },
        GateType::TiltUp | GateType::Swing => match pattern {
            F::Start | F::VerticalBoards => (SegmentId::VerticalBoard, along_x),
            F::HorizontalBoards => (SegmentId::HorizontalBoard, along_z),
            F::Plain => (SegmentId::PlainPanel, along_z),
            F::LowRib => (SegmentId::LowRibPanel, along_z),
            F::HighRib => (SegmentId::HighRibPanel, along_z),
            F::Caisson => (SegmentId::CaissonCell, TilingMode::Grid),
        },
    }
}

/// Leaf configuration; only swing gates open on hinges.
pub fn leaves_for(gate_type: GateType, count: LeafCount) -> LeafConfig {
    match (gate_type, count) {
        (GateType::Swing, LeafCount::SingleRight) => LeafConfig::SingleRight,
        (GateType::Swing, LeafCount::SingleLeft) => LeafConfig::SingleLeft,
        (GateType::Swing, LeafCount::Double) => LeafConfig::Double,
        _ => LeafConfig::None,
    }
}

/// Drop accessory kinds a gate family cannot carry: swing gates have no
/// guide rails and roller slats take no windows or pass-door.
fn restrict(gate_type: GateType, mut selection: AccessorySelection, dropped: &mut Vec<String>) -> AccessorySelection {
    let mut unset = |flag: &mut bool, what: &str| {
        if std::mem::take(flag) {
            dropped.push(format!("{what} not available for {gate_type:?}"));
        }
    };
    match gate_type {
        GateType::Swing => unset(&mut selection.rails, "rails"),
        GateType::Roller => {
            unset(&mut selection.windows, "windows");
            unset(&mut selection.pass_door, "pass-door");
        }
        GateType::Sectional | GateType::TiltUp => {}
    }
    selection
}

/// Resolve a gate spec into a build plan. Never fails: unknown or missing
/// style labels resolve to each table's default entry.
pub fn dispatch(spec: &GateSpec, library: &SegmentLibrary, rules: &PlacementRules) -> GatePlan {
    let gate_type = spec.gate_type;
    let (segment, tiling) = segment_for(gate_type, spec.style::<FillPattern>(), spec.style::<ProfileHeight>());

    let mut dropped = Vec::new();
    let selection = restrict(gate_type, spec.accessories(), &mut dropped);
    for note in &dropped {
        warn!(%note, "dropping accessory selection");
    }

    let window_row = match (tiling, library.get(segment)) {
        (TilingMode::Linear(Axis::Z), Some(base)) if gate_type == GateType::Sectional => WindowRow::SegmentRow {
            extent: base.dimensions().z,
            from_top: 1,
        },
        _ => WindowRow::FixedHeight(rules.window_height),
    };

    let plan = GatePlan {
        gate_type,
        segment,
        tiling,
        leaves: leaves_for(gate_type, spec.style::<LeafCount>()),
        accessories: AccessoryRequest {
            selection,
            handle: spec.style::<HandleStyle>(),
            window_row,
        },
        dropped,
    };
    debug!(?plan, "dispatched gate spec");
    plan
}
