use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TEXTURE: &str = "textures/bialy.png";

/// Colour name to texture file, relative to the resource root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub textures: BTreeMap<String, String>,
    pub default_texture: String,
}

impl Default for Palette {
    fn default() -> Self {
        let textures = [
            ("Biały", "textures/bialy.png"),
            ("Antracyt", "textures/antracyt.png"),
            ("Grafit", "textures/grafit.png"),
            ("Brązowy", "textures/brazowy.png"),
            ("Złoty dąb", "textures/zloty_dab.png"),
            ("Orzech", "textures/orzech.png"),
            ("Winchester", "textures/winchester.png"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            textures,
            default_texture: DEFAULT_TEXTURE.to_string(),
        }
    }
}

impl Palette {
    /// Texture for a colour selection; unknown or missing colours use the default.
    pub fn texture_for(&self, color: Option<&str>) -> &str {
        color
            .and_then(|c| self.textures.get(c.trim()))
            .map(String::as_str)
            .unwrap_or(&self.default_texture)
    }
}
