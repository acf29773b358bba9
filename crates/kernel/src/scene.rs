//! Owned scene arena.
//!
//! Every piece of geometry the pipeline builds lives in a [`Scene`] as a
//! named [`SceneObject`]: a mesh in local coordinates plus a world location
//! (the object's origin). Objects are addressed by [`ObjectId`] keys, and
//! every operation that changes geometry goes through the scene so copies
//! never alias each other's data.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::geometry::{BoundingBox, Plane, Point3d, Transform, Vec3};
use crate::mesh::bisect::{bisect_and_cap, CapReport, KeepSide};
use crate::mesh::{merge, Mesh};
use crate::Tolerance;

new_key_type! {
    pub struct ObjectId;
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no object with id {0:?}")]
    NotFound(ObjectId),
    #[error("no object named '{0}'")]
    NameNotFound(String),
    #[error("merge needs at least one source object")]
    EmptyMerge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    /// World position of the object's origin; mesh data is relative to it.
    pub location: Point3d,
    pub hidden: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            location: Point3d::ORIGIN,
            hidden: false,
        }
    }

    pub fn world_bounding_box(&self) -> BoundingBox {
        self.mesh.bounding_box().translated(self.location.to_vec3())
    }

    /// Mesh with the location baked into its vertices.
    pub fn world_mesh(&self) -> Mesh {
        let mut mesh = self.mesh.clone();
        mesh.translate(self.location.to_vec3());
        mesh
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    objects: SlotMap<ObjectId, SceneObject>,
    /// Insertion order, used for deterministic iteration and export.
    order: Vec<ObjectId>,
    pub tolerance: Tolerance,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: ObjectId) -> Result<&SceneObject, SceneError> {
        self.objects.get(id).ok_or(SceneError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, SceneError> {
        self.objects.get_mut(id).ok_or(SceneError::NotFound(id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// First object with this exact name, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.objects[id].name == name)
    }

    pub fn require(&self, name: &str) -> Result<ObjectId, SceneError> {
        self.find_by_name(name)
            .ok_or_else(|| SceneError::NameNotFound(name.to_string()))
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.order.iter().map(move |&id| (id, &self.objects[id]))
    }

    pub fn visible_objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.objects().filter(|(_, o)| !o.hidden)
    }

    pub fn remove(&mut self, id: ObjectId) -> Result<SceneObject, SceneError> {
        let object = self.objects.remove(id).ok_or(SceneError::NotFound(id))?;
        self.order.retain(|&o| o != id);
        Ok(object)
    }

    /// Remove every object matching `pred`; returns how many went.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&SceneObject) -> bool) -> usize {
        let doomed: Vec<ObjectId> = self
            .objects()
            .filter(|(_, o)| pred(o))
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.objects.remove(id);
        }
        self.order.retain(|id| !doomed.contains(id));
        doomed.len()
    }

    /// Deep copy under a new name; the copy shares no data with the source.
    #[instrument(skip(self))]
    pub fn copy_independent(&mut self, id: ObjectId, name: &str) -> Result<ObjectId, SceneError> {
        let mut copy = self.get(id)?.clone();
        copy.name = name.to_string();
        copy.hidden = false;
        Ok(self.add(copy))
    }

    pub fn translate(&mut self, id: ObjectId, offset: Vec3) -> Result<(), SceneError> {
        let object = self.get_mut(id)?;
        object.location = object.location + offset;
        Ok(())
    }

    pub fn set_location(&mut self, id: ObjectId, location: Point3d) -> Result<(), SceneError> {
        self.get_mut(id)?.location = location;
        Ok(())
    }

    /// Scale mesh data about the object's origin.
    pub fn scale(&mut self, id: ObjectId, factors: Vec3) -> Result<(), SceneError> {
        self.get_mut(id)?.mesh.scale_about(factors, Point3d::ORIGIN);
        Ok(())
    }

    /// Rotate mesh data about the vertical axis through the object's origin.
    pub fn rotate_z(&mut self, id: ObjectId, angle: f64) -> Result<(), SceneError> {
        self.get_mut(id)?.mesh.transform(&Transform::rotation_z(angle));
        Ok(())
    }

    /// Move the origin to `world_point` without moving the geometry.
    pub fn set_origin(&mut self, id: ObjectId, world_point: Point3d) -> Result<(), SceneError> {
        let object = self.get_mut(id)?;
        let shift = object.location - world_point;
        object.mesh.translate(shift);
        object.location = world_point;
        Ok(())
    }

    /// Move the origin to the centre of the world bounding box.
    pub fn recenter_origin(&mut self, id: ObjectId) -> Result<Point3d, SceneError> {
        let object = self.get(id)?;
        if object.mesh.positions.is_empty() {
            return Ok(object.location);
        }
        let center = object.world_bounding_box().center();
        self.set_origin(id, center)?;
        Ok(center)
    }

    pub fn world_bounding_box(&self, id: ObjectId) -> Result<BoundingBox, SceneError> {
        Ok(self.get(id)?.world_bounding_box())
    }

    pub fn world_mesh(&self, id: ObjectId) -> Result<Mesh, SceneError> {
        Ok(self.get(id)?.world_mesh())
    }

    pub fn hide(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.get_mut(id)?.hidden = true;
        Ok(())
    }

    /// Cut an object by a world-space plane, keep one side and cap the cut.
    #[instrument(skip(self, plane))]
    pub fn bisect(&mut self, id: ObjectId, plane: &Plane, keep: KeepSide) -> Result<CapReport, SceneError> {
        let tolerance = self.tolerance;
        let object = self.get_mut(id)?;
        let local = Plane {
            origin: Point3d::ORIGIN + (plane.origin - object.location),
            normal: plane.normal,
        };
        let (mesh, report) = bisect_and_cap(&object.mesh, &local, keep, &tolerance);
        object.mesh = mesh;
        Ok(report)
    }

    /// Join several objects into one new object named `name`.
    ///
    /// The sources are consumed. The result's origin sits at the centre of
    /// its bounding box.
    #[instrument(skip(self, ids))]
    pub fn merge(&mut self, ids: &[ObjectId], name: &str) -> Result<ObjectId, SceneError> {
        if ids.is_empty() {
            return Err(SceneError::EmptyMerge);
        }
        let meshes = ids
            .iter()
            .map(|&id| self.world_mesh(id))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = merge(&meshes);
        for &id in ids {
            self.remove(id)?;
        }
        let merged = self.add(SceneObject::new(name, joined));
        let center = self.recenter_origin(merged)?;
        info!(sources = ids.len(), ?center, "merged objects");
        Ok(merged)
    }

    /// Names of all objects, in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.objects().map(|(_, o)| o.name.as_str()).collect()
    }

    pub fn log_contents(&self) {
        for (_, object) in self.objects() {
            debug!(
                name = %object.name,
                hidden = object.hidden,
                faces = object.mesh.face_count(),
                "scene object"
            );
        }
    }
}
