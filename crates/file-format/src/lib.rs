pub mod bounds;
pub mod errors;
pub mod gate_spec;
pub mod manifest;
pub mod obj;
pub mod palette;

pub use bounds::{load_bounds, save_bounds, GATE_DATA_FILE};
pub use errors::{ExportError, LoadError};
pub use gate_spec::{gate_spec_to_json, load_gate_spec, parse_gate_spec, save_gate_spec, ParsedGateSpec};
pub use manifest::{load_manifest, save_manifest, RenderManifest, MANIFEST_FILE};
pub use obj::{collect_objects, export_obj, export_transform, ObjObject, ObjStats};
pub use palette::Palette;
