//! Re-import exported OBJ files through `tobj`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use gate_kernel::geometry::BoundingBox;

use crate::helpers::{working_bounds, HarnessError};

/// One `o <name>` block as seen by an independent OBJ reader.
#[derive(Debug, Clone)]
pub struct ImportedObject {
    pub name: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Bounds with the export rotation undone.
    pub bounds: BoundingBox,
    pub has_normals: bool,
    pub has_uvs: bool,
    pub material: Option<String>,
}

/// Load every object of an OBJ file, resolving its MTL next to it.
pub fn import_obj(path: &Path) -> Result<Vec<ImportedObject>, HarnessError> {
    let fail = |reason: String| HarnessError::ObjImport {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| fail(e.to_string()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let options = tobj::LoadOptions {
        triangulate: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj_buf(&mut BufReader::new(file), &options, |mtl| {
        tobj::load_mtl(dir.join(mtl))
    })
    .map_err(|e| fail(e.to_string()))?;
    let materials = materials.map_err(|e| fail(format!("material library: {e}")))?;

    Ok(models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            ImportedObject {
                name: model.name,
                vertex_count: mesh.positions.len() / 3,
                triangle_count: mesh.indices.len() / 3,
                bounds: working_bounds(&mesh.positions),
                has_normals: !mesh.normal_indices.is_empty(),
                has_uvs: !mesh.texcoord_indices.is_empty(),
                material: mesh.material_id.and_then(|i| materials.get(i)).map(|m| m.name.clone()),
            }
        })
        .collect())
}

/// Find an imported object by name.
pub fn find<'a>(objects: &'a [ImportedObject], name: &str) -> Result<&'a ImportedObject, HarnessError> {
    objects
        .iter()
        .find(|o| o.name == name)
        .ok_or_else(|| HarnessError::ObjectNotFound { name: name.to_string() })
}
