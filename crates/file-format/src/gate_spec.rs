use std::path::Path;

use gate_types::{GateSpec, GateType, StyleOption, StyleValue, DEFAULT_HEIGHT_MM, DEFAULT_WIDTH_MM};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{ExportError, LoadError};

pub const KEY_GATE_TYPE: &str = "Typ bramy";
pub const KEY_DIMENSIONS: &str = "Wymiary";
pub const KEY_WIDTH: &str = "Szerokość";
pub const KEY_HEIGHT: &str = "Wysokość";

/// A gate configuration together with the fallbacks applied while reading it.
#[derive(Debug, Clone)]
pub struct ParsedGateSpec {
    pub spec: GateSpec,
    pub warnings: Vec<String>,
}

/// Read a dimension that may be a JSON number or a numeric string.
fn lenient_mm(value: Option<&Value>) -> Option<f64> {
    let mm = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    (mm.is_finite() && mm > 0.0).then_some(mm)
}

fn dimension(dims: Option<&Map<String, Value>>, key: &str, default: f64, warnings: &mut Vec<String>) -> f64 {
    let raw = dims.and_then(|d| d.get(key));
    match lenient_mm(raw) {
        Some(mm) => mm,
        None => {
            let shown = raw.map(Value::to_string).unwrap_or_else(|| "missing".to_string());
            warn!(key, value = %shown, default, "unusable dimension, using default");
            warnings.push(format!("{key}: {shown} is not a usable dimension, using {default} mm"));
            default
        }
    }
}

fn style_value(value: &Value) -> Option<StyleValue> {
    match value {
        Value::String(s) => Some(StyleValue::Single(s.clone())),
        Value::Number(n) => Some(StyleValue::Single(n.to_string())),
        Value::Array(items) => Some(StyleValue::List(
            items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        )),
        _ => None,
    }
}

/// Parse a gate configuration from its JSON wire form.
///
/// Only a document that is not a JSON object is an error. Unusable
/// dimensions fall back to the defaults and an unknown gate type falls back
/// to the sectional gate, each with a warning.
pub fn parse_gate_spec(json: &str) -> Result<ParsedGateSpec, LoadError> {
    let root: Value = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    let Value::Object(root) = root else {
        return Err(LoadError::ParseError("gate spec must be a JSON object".to_string()));
    };

    let mut warnings = Vec::new();

    let gate_type = match root.get(KEY_GATE_TYPE).and_then(Value::as_str) {
        Some(label) => GateType::parse_label(label).unwrap_or_else(|| {
            warn!(label, "unknown gate type, using default");
            warnings.push(format!("unknown gate type '{label}', using {}", GateType::default().label()));
            GateType::default()
        }),
        None => {
            warnings.push(format!("no gate type given, using {}", GateType::default().label()));
            GateType::default()
        }
    };

    let dims = root.get(KEY_DIMENSIONS).and_then(Value::as_object);
    let width_mm = dimension(dims, KEY_WIDTH, DEFAULT_WIDTH_MM, &mut warnings);
    let height_mm = dimension(dims, KEY_HEIGHT, DEFAULT_HEIGHT_MM, &mut warnings);

    let mut spec = GateSpec::new(gate_type, width_mm, height_mm);
    for (key, value) in &root {
        if key == KEY_GATE_TYPE || key == KEY_DIMENSIONS {
            continue;
        }
        match style_value(value) {
            Some(v) => {
                spec.options.insert(key.clone(), v);
            }
            None => debug!(key = %key, "ignoring non-label option"),
        }
    }

    if spec.below_minimum() {
        warnings.push(format!(
            "dimensions {}x{} mm are below the configurator minimum",
            spec.width_mm, spec.height_mm
        ));
    }

    Ok(ParsedGateSpec { spec, warnings })
}

pub fn load_gate_spec(path: &Path) -> Result<ParsedGateSpec, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_gate_spec(&json)
}

/// Convert a gate configuration back to its JSON wire form.
pub fn gate_spec_to_json(spec: &GateSpec) -> Value {
    let mut root = Map::new();
    root.insert(KEY_GATE_TYPE.to_string(), Value::from(spec.gate_type.label()));
    let mut dims = Map::new();
    dims.insert(KEY_WIDTH.to_string(), Value::from(spec.width_mm));
    dims.insert(KEY_HEIGHT.to_string(), Value::from(spec.height_mm));
    root.insert(KEY_DIMENSIONS.to_string(), Value::Object(dims));
    for (key, value) in &spec.options {
        let v = match value {
            StyleValue::Single(s) => Value::from(s.as_str()),
            StyleValue::List(items) => Value::from(items.clone()),
        };
        root.insert(key.clone(), v);
    }
    Value::Object(root)
}

pub fn save_gate_spec(path: &Path, spec: &GateSpec) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(&gate_spec_to_json(spec))
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| ExportError::io(path, e))
}
