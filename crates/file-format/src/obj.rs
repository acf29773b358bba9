//! Wavefront OBJ/MTL export.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use gate_kernel::geometry::Transform;
use gate_kernel::scene::{Scene, SceneObject};
use gate_tessellation::{tessellate_mesh_with, TriangleMesh};
use tracing::{info, warn};

use crate::errors::ExportError;

pub const GATE_OBJ_FILE: &str = "gate.obj";
pub const GATE_MTL_FILE: &str = "gate.mtl";
pub const SCENE_OBJ_FILE: &str = "scene.obj";
pub const SCENE_MTL_FILE: &str = "scene.mtl";
pub const MATERIAL_NAME: &str = "gate_material";

/// Reorientation applied to everything written out: Z-up working space to
/// the Y-up convention of downstream viewers, `(x, y, z) -> (x, z, -y)`.
pub fn export_transform() -> Transform {
    Transform::rotation_x(-std::f64::consts::FRAC_PI_2)
}

/// One `o <name>` block.
#[derive(Debug, Clone)]
pub struct ObjObject {
    pub name: String,
    pub mesh: TriangleMesh,
}

impl ObjObject {
    /// Tessellate a scene object in world space with the export reorientation.
    pub fn from_scene_object(object: &SceneObject) -> Self {
        Self {
            name: object.name.clone(),
            mesh: tessellate_mesh_with(&object.world_mesh(), &export_transform()),
        }
    }
}

/// Visible objects of the scene matching `filter`, in scene order.
pub fn collect_objects(scene: &Scene, mut filter: impl FnMut(&SceneObject) -> bool) -> Vec<ObjObject> {
    scene
        .visible_objects()
        .filter(|(_, o)| filter(o))
        .map(|(_, o)| ObjObject::from_scene_object(o))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjStats {
    pub objects: usize,
    pub vertices: usize,
    pub triangles: usize,
}

/// Write objects as OBJ text. Indices are 1-based and keep counting across
/// objects, one stream each for `v`, `vt` and `vn`.
pub fn write_obj<W: Write>(out: &mut W, mtllib: &str, material: &str, objects: &[ObjObject]) -> io::Result<ObjStats> {
    writeln!(out, "# gate-render OBJ export")?;
    writeln!(out, "mtllib {mtllib}")?;

    let mut stats = ObjStats::default();
    let (mut v_base, mut vt_base, mut vn_base) = (1u32, 1u32, 1u32);

    for object in objects {
        let mesh = &object.mesh;
        writeln!(out, "o {}", object.name)?;
        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
        }
        for t in mesh.uvs.chunks_exact(2) {
            writeln!(out, "vt {:.6} {:.6}", t[0], t[1])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
        writeln!(out, "usemtl {material}")?;
        writeln!(out, "s off")?;
        for tri in mesh.triangles() {
            write!(out, "f")?;
            for c in tri {
                write!(out, " {}/{}/{}", c.position + v_base, c.uv + vt_base, c.normal + vn_base)?;
            }
            writeln!(out)?;
        }

        v_base += mesh.vertex_count() as u32;
        vt_base += mesh.uv_count() as u32;
        vn_base += mesh.normal_count() as u32;
        stats.objects += 1;
        stats.vertices += mesh.vertex_count();
        stats.triangles += mesh.triangle_count();
    }
    Ok(stats)
}

/// Single-material MTL with fixed lighting coefficients.
pub fn write_mtl<W: Write>(out: &mut W, material: &str, texture: &str) -> io::Result<()> {
    writeln!(out, "# gate-render MTL export")?;
    writeln!(out, "newmtl {material}")?;
    writeln!(out, "Ns 225.000000")?;
    writeln!(out, "Ka 1.000000 1.000000 1.000000")?;
    writeln!(out, "Kd 0.800000 0.800000 0.800000")?;
    writeln!(out, "Ks 0.500000 0.500000 0.500000")?;
    writeln!(out, "Ke 0.000000 0.000000 0.000000")?;
    writeln!(out, "Ni 1.450000")?;
    writeln!(out, "d 1.000000")?;
    writeln!(out, "illum 2")?;
    writeln!(out, "map_Kd {texture}")?;
    Ok(())
}

/// Write `<dir>/<obj_file>` and its companion MTL referencing `texture`.
pub fn export_obj(
    dir: &Path,
    obj_file: &str,
    mtl_file: &str,
    objects: &[ObjObject],
    texture: &str,
) -> Result<ObjStats, ExportError> {
    if objects.is_empty() {
        warn!(file = obj_file, "no visible objects, writing an empty OBJ");
    }
    std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;

    let mtl_path = dir.join(mtl_file);
    let mut mtl = BufWriter::new(File::create(&mtl_path).map_err(|e| ExportError::io(&mtl_path, e))?);
    write_mtl(&mut mtl, MATERIAL_NAME, texture)
        .and_then(|_| mtl.flush())
        .map_err(|e| ExportError::io(&mtl_path, e))?;

    let obj_path = dir.join(obj_file);
    let mut obj = BufWriter::new(File::create(&obj_path).map_err(|e| ExportError::io(&obj_path, e))?);
    let stats = write_obj(&mut obj, mtl_file, MATERIAL_NAME, objects)
        .and_then(|stats| obj.flush().map(|_| stats))
        .map_err(|e| ExportError::io(&obj_path, e))?;

    info!(
        path = %obj_path.display(),
        objects = stats.objects,
        vertices = stats.vertices,
        triangles = stats.triangles,
        "wrote OBJ"
    );
    Ok(stats)
}
