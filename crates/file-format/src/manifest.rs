use std::path::Path;

use chrono::{DateTime, Utc};
use gate_types::GateBounds;
use serde::{Deserialize, Serialize};

use crate::errors::{ExportError, LoadError};

pub const MANIFEST_FILE: &str = "render_manifest.json";
pub const MANIFEST_FORMAT: &str = "gate-render";
/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Completion marker of a pipeline run, written after every other artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub format: String,
    pub version: u32,
    pub gate_type: String,
    /// When the run started.
    pub started: DateTime<Utc>,
    /// When the manifest was written.
    pub completed: DateTime<Utc>,
    /// Stages that ran to completion, in order.
    pub stages: Vec<String>,
    /// Artifact file names relative to the output directory.
    pub artifacts: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default)]
    pub bounds: Option<GateBounds>,
}

impl RenderManifest {
    pub fn new(gate_type: impl Into<String>) -> Self {
        Self::started_at(gate_type, Utc::now())
    }

    /// Manifest for a run that began at `started`.
    pub fn started_at(gate_type: impl Into<String>, started: DateTime<Utc>) -> Self {
        Self {
            format: MANIFEST_FORMAT.to_string(),
            version: MANIFEST_VERSION,
            gate_type: gate_type.into(),
            started,
            completed: started,
            stages: Vec::new(),
            artifacts: Vec::new(),
            warnings: Vec::new(),
            bounds: None,
        }
    }

    pub fn record_stage(&mut self, stage: &str, artifacts: impl IntoIterator<Item = String>) {
        self.stages.push(stage.to_string());
        for artifact in artifacts {
            if !self.artifacts.contains(&artifact) {
                self.artifacts.push(artifact);
            }
        }
    }
}

/// Stamp the completion time and write the manifest.
pub fn save_manifest(path: &Path, manifest: &mut RenderManifest) -> Result<(), ExportError> {
    manifest.completed = Utc::now();
    let json = serde_json::to_string_pretty(manifest).map_err(|e| ExportError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| ExportError::io(path, e))
}

/// Read a manifest, validating the format identifier and version.
pub fn load_manifest(path: &Path) -> Result<RenderManifest, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let manifest: RenderManifest =
        serde_json::from_str(&json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if manifest.format != MANIFEST_FORMAT {
        return Err(LoadError::UnknownFormat(manifest.format));
    }
    if manifest.version > MANIFEST_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: manifest.version,
            supported_version: MANIFEST_VERSION,
        });
    }
    Ok(manifest)
}
