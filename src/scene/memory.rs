//! In-memory scene host
//!
//! Keeps objects and meshes in plain maps. Modifier evaluation copies the base
//! mesh into a fresh arena slot, and every evaluation and release is recorded
//! so callers can check that transient meshes are returned.

use std::collections::{BTreeMap, HashSet};

use glam::{Mat4, Vec3};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{EvaluationMode, MeshData, MeshId, ObjectId, ObjectType, SceneHost};

/// Deformation applied by a modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Offsets every vertex
    Displace(Vec3),
    /// Scales every vertex about the object origin
    Scale(Vec3),
    /// Splits polygons into triangles
    Triangulate,
}

/// One entry in an object's modifier stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub show_viewport: bool,
    pub show_render: bool,
}

impl Modifier {
    /// Modifier enabled for both viewport and render
    pub fn new(kind: ModifierKind) -> Self {
        Self {
            kind,
            show_viewport: true,
            show_render: true,
        }
    }

    /// Modifier that only applies to final renders
    pub fn render_only(kind: ModifierKind) -> Self {
        Self {
            kind,
            show_viewport: false,
            show_render: true,
        }
    }

    fn enabled_for(&self, mode: EvaluationMode) -> bool {
        match mode {
            EvaluationMode::Render => self.show_render,
            EvaluationMode::Preview => self.show_viewport,
        }
    }

    fn apply(&self, mesh: &mut MeshData) {
        match &self.kind {
            ModifierKind::Displace(offset) => {
                for vertex in &mut mesh.vertices {
                    vertex.co += *offset;
                }
            }
            ModifierKind::Scale(factor) => {
                for vertex in &mut mesh.vertices {
                    vertex.co *= *factor;
                }
            }
            ModifierKind::Triangulate => mesh.triangulate(),
        }
    }
}

/// A scene entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub object_type: ObjectType,
    pub mesh: Option<MeshId>,
    pub world_matrix: Mat4,
    pub modifiers: Vec<Modifier>,
}

/// Scene host backed by in-process maps
#[derive(Debug, Default)]
pub struct InMemoryScene {
    objects: BTreeMap<ObjectId, SceneObject>,
    meshes: BTreeMap<MeshId, MeshData>,
    transient: HashSet<MeshId>,
    next_object_id: u32,
    next_mesh_id: u32,
    rendering: bool,
    evaluations: Vec<(ObjectId, EvaluationMode)>,
    released: Vec<MeshId>,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn store_mesh(&mut self, mesh: MeshData) -> MeshId {
        let id = MeshId(self.next_mesh_id);
        self.next_mesh_id += 1;
        self.meshes.insert(id, mesh);
        id
    }

    /// Adds an object of any type and returns its handle
    pub fn add_object(&mut self, name: impl Into<String>, object_type: ObjectType, mesh: Option<MeshData>) -> ObjectId {
        let mesh = mesh.map(|data| self.store_mesh(data));
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(
            id,
            SceneObject {
                name: name.into(),
                object_type,
                mesh,
                world_matrix: Mat4::IDENTITY,
                modifiers: Vec::new(),
            },
        );
        id
    }

    /// Adds a mesh object at the world origin
    pub fn add_mesh_object(&mut self, name: impl Into<String>, mesh: MeshData) -> ObjectId {
        self.add_object(name, ObjectType::Mesh, Some(mesh))
    }

    /// Removes an object; its base mesh stays in memory
    pub fn remove_object(&mut self, object: ObjectId) -> Option<SceneObject> {
        self.objects.remove(&object)
    }

    pub fn set_world_matrix(&mut self, object: ObjectId, matrix: Mat4) {
        if let Some(obj) = self.objects.get_mut(&object) {
            obj.world_matrix = matrix;
        }
    }

    pub fn push_modifier(&mut self, object: ObjectId, modifier: Modifier) {
        if let Some(obj) = self.objects.get_mut(&object) {
            obj.modifiers.push(modifier);
        }
    }

    pub fn set_rendering(&mut self, rendering: bool) {
        self.rendering = rendering;
    }

    /// Every modifier evaluation requested so far, in order
    pub fn evaluations(&self) -> &[(ObjectId, EvaluationMode)] {
        &self.evaluations
    }

    /// Every transient mesh released so far, in order
    pub fn released_meshes(&self) -> &[MeshId] {
        &self.released
    }

    /// Transient meshes that were evaluated but not released yet
    pub fn live_transient_meshes(&self) -> usize {
        self.transient.len()
    }
}

impl SceneHost for InMemoryScene {
    fn object_type(&self, object: ObjectId) -> Option<ObjectType> {
        self.objects.get(&object).map(|obj| obj.object_type.clone())
    }

    fn object_mesh(&self, object: ObjectId) -> Option<MeshId> {
        self.objects.get(&object).and_then(|obj| obj.mesh)
    }

    fn evaluate_mesh(&mut self, object: ObjectId, mode: EvaluationMode) -> Option<MeshId> {
        self.evaluations.push((object, mode));

        let obj = self.objects.get(&object)?;
        let mut mesh = self.meshes.get(&obj.mesh?)?.clone();
        for modifier in obj.modifiers.iter().filter(|m| m.enabled_for(mode)) {
            modifier.apply(&mut mesh);
        }

        let id = self.store_mesh(mesh);
        self.transient.insert(id);
        debug!("Evaluated mesh {:?} for object {:?} ({:?})", id, object, mode);
        Some(id)
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        if !self.transient.remove(&mesh) {
            warn!("Refusing to release mesh {:?}: not a transient mesh", mesh);
            return;
        }
        self.meshes.remove(&mesh);
        self.released.push(mesh);
        debug!("Released transient mesh {:?}", mesh);
    }

    fn mesh(&self, mesh: MeshId) -> Option<&MeshData> {
        self.meshes.get(&mesh)
    }

    fn world_matrix(&self, object: ObjectId) -> Option<Mat4> {
        self.objects.get(&object).map(|obj| obj.world_matrix)
    }

    fn is_rendering(&self) -> bool {
        self.rendering
    }
}
