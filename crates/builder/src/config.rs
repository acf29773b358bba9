//! Tunable constants of the pipeline.
//!
//! Everything here has a default matching the reference renders and can be
//! overridden from a JSON file; absent keys keep their defaults.

use file_format::Palette;
use gate_kernel::Tolerance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tolerance: Tolerance,
    pub leaves: LeafCalibration,
    pub placement: PlacementRules,
    pub palette: Palette,
}

/// Rotation angles and lateral correction terms of swing-gate leaves.
///
/// The offset divisors are fitted to the reference renders rather than
/// derived from the rotation, and differ between single and double leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafCalibration {
    pub single_angle_deg: f64,
    pub double_left_angle_deg: f64,
    pub double_right_angle_deg: f64,
    /// Gate width is divided by this for the single-leaf offset term.
    pub single_offset_divisor: f64,
    pub double_offset_divisor: f64,
}

impl Default for LeafCalibration {
    fn default() -> Self {
        Self {
            single_angle_deg: 10.0,
            double_left_angle_deg: 5.0,
            double_right_angle_deg: 10.0,
            single_offset_divisor: 12.3,
            double_offset_divisor: 23.5,
        }
    }
}

/// Pass-door inset for gates narrower than `below_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginTier {
    pub below_width: f64,
    pub margin: f64,
}

/// Policy constants of the accessory placer, in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Added to gate width and height when stretching the rail frame.
    pub rail_padding: f64,
    pub window_margin: f64,
    /// Window centre height when not aligned to a segment row.
    pub window_height: f64,
    /// A centre window is added only on gates wider than this.
    pub center_window_min_width: f64,
    pub vent_margin: f64,
    pub vent_height: f64,
    /// Checked in order; the first tier whose `below_width` exceeds the gate width wins.
    pub door_margin_tiers: Vec<MarginTier>,
    pub door_margin_wide: f64,
    /// Pass-doors taller than the gate minus this are shortened to fit.
    pub door_top_clearance: f64,
    /// Distance from the pass-door's latch edge to the handle.
    pub handle_door_edge_offset: f64,
    pub handle_door_height: f64,
    pub handle_gate_height: f64,
    pub handle_escutcheon_offset: f64,
    pub handle_grip_offset: f64,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            rail_padding: 0.02,
            window_margin: 0.3,
            window_height: 1.5,
            center_window_min_width: 3.5,
            vent_margin: 0.2,
            vent_height: 0.25,
            door_margin_tiers: vec![
                MarginTier { below_width: 3.0, margin: 0.25 },
                MarginTier { below_width: 4.0, margin: 0.45 },
            ],
            door_margin_wide: 0.65,
            door_top_clearance: 0.15,
            handle_door_edge_offset: 0.08,
            handle_door_height: 1.05,
            handle_gate_height: 1.0,
            handle_escutcheon_offset: 0.05,
            handle_grip_offset: -0.10,
        }
    }
}

impl PlacementRules {
    pub fn door_margin(&self, gate_width: f64) -> f64 {
        self.door_margin_tiers
            .iter()
            .find(|tier| gate_width < tier.below_width)
            .map_or(self.door_margin_wide, |tier| tier.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_margin_tiers() {
        let rules = PlacementRules::default();
        assert_eq!(rules.door_margin(2.5), 0.25);
        assert_eq!(rules.door_margin(3.0), 0.45);
        assert_eq!(rules.door_margin(3.99), 0.45);
        assert_eq!(rules.door_margin(4.0), 0.65);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"leaves": {"single_offset_divisor": 10.0}, "placement": {"vent_height": 0.3}}"#)
                .unwrap();
        assert_eq!(config.leaves.single_offset_divisor, 10.0);
        assert_eq!(config.leaves.single_angle_deg, 10.0);
        assert_eq!(config.placement.vent_height, 0.3);
        assert_eq!(config.placement.window_margin, 0.3);
        assert_eq!(config.tolerance, Tolerance::default());
    }
}
