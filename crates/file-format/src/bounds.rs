use std::path::Path;

use gate_types::GateBounds;

use crate::errors::{ExportError, LoadError};

pub const GATE_DATA_FILE: &str = "gate_data.json";

/// Write the bounding box checkpoint read by the accessory stage.
pub fn save_bounds(path: &Path, bounds: &GateBounds) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(bounds).map_err(|e| ExportError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| ExportError::io(path, e))
}

pub fn parse_bounds(json: &str) -> Result<GateBounds, LoadError> {
    let bounds: GateBounds = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    if bounds.location.iter().chain(&bounds.dimensions).any(|v| !v.is_finite()) {
        return Err(LoadError::InvalidBounds("non-finite component".to_string()));
    }
    if bounds.dimensions.iter().any(|&d| d < 0.0) {
        return Err(LoadError::InvalidBounds(format!(
            "negative dimensions {:?}",
            bounds.dimensions
        )));
    }
    Ok(bounds)
}

pub fn load_bounds(path: &Path) -> Result<GateBounds, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_bounds(&json)
}
