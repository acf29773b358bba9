use serde::{Deserialize, Serialize};

/// Bounding box interchange record handed from the geometry stage to the
/// accessory stage, in meters, before any export reorientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateBounds {
    /// Centre of the box.
    pub location: [f64; 3],
    /// Full extents along X, Y, Z.
    pub dimensions: [f64; 3],
}

impl GateBounds {
    pub fn from_min_max(min: [f64; 3], max: [f64; 3]) -> Self {
        let mut location = [0.0; 3];
        let mut dimensions = [0.0; 3];
        for k in 0..3 {
            location[k] = (min[k] + max[k]) * 0.5;
            dimensions[k] = max[k] - min[k];
        }
        Self { location, dimensions }
    }

    pub fn min(&self) -> [f64; 3] {
        std::array::from_fn(|k| self.location[k] - self.dimensions[k] * 0.5)
    }

    pub fn max(&self) -> [f64; 3] {
        std::array::from_fn(|k| self.location[k] + self.dimensions[k] * 0.5)
    }

    pub fn width(&self) -> f64 {
        self.dimensions[0]
    }

    pub fn depth(&self) -> f64 {
        self.dimensions[1]
    }

    pub fn height(&self) -> f64 {
        self.dimensions[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_round_trip() {
        let b = GateBounds::from_min_max([-1.5, 0.0, 0.0], [1.5, 0.04, 2.125]);
        assert_eq!(b.location, [0.0, 0.02, 1.0625]);
        assert_eq!(b.min(), [-1.5, 0.0, 0.0]);
        assert!((b.max()[2] - 2.125).abs() < 1e-12);
        assert!((b.width() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_shape() {
        let b = GateBounds::from_min_max([0.0; 3], [2.0, 0.1, 2.0]);
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["dimensions"][0], 2.0);
        assert!(json.get("location").is_some());
    }
}
