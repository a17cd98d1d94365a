//! Scene host - the object and mesh model the nodes read from
//!
//! The host owns every object and every mesh. Nodes address them through
//! `ObjectId` and `MeshId` handles and go through `SceneHost` for all access.

pub mod memory;
pub mod mesh;

use glam::Mat4;
use serde::{Deserialize, Serialize};

pub use memory::{InMemoryScene, Modifier, ModifierKind, SceneObject};
pub use mesh::{MeshData, MeshEdge, MeshPolygon, MeshVertex};

/// Opaque handle to a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Handle to mesh data living in host memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Type tag of a scene object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Mesh,
    Curve,
    Empty,
    Camera,
    Light,
    Other(String),
}

impl ObjectType {
    /// Host-side tag string
    pub fn tag(&self) -> &str {
        match self {
            ObjectType::Mesh => "MESH",
            ObjectType::Curve => "CURVE",
            ObjectType::Empty => "EMPTY",
            ObjectType::Camera => "CAMERA",
            ObjectType::Light => "LIGHT",
            ObjectType::Other(tag) => tag,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self, ObjectType::Mesh)
    }
}

/// Quality used when evaluating an object's modifier stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Final render settings
    Render,
    /// Viewport settings
    Preview,
}

impl EvaluationMode {
    /// Picks the mode matching the host's render state
    pub fn for_render_state(is_rendering: bool) -> Self {
        if is_rendering {
            EvaluationMode::Render
        } else {
            EvaluationMode::Preview
        }
    }
}

/// Access to the host's scene data during graph evaluation
pub trait SceneHost {
    /// Type tag of an object, `None` when the object no longer exists
    fn object_type(&self, object: ObjectId) -> Option<ObjectType>;

    /// The object's stored base mesh, shared with the scene
    fn object_mesh(&self, object: ObjectId) -> Option<MeshId>;

    /// Evaluates the object's modifier stack into a new mesh.
    ///
    /// The returned mesh belongs to the caller until it is passed back
    /// through `release_mesh`.
    fn evaluate_mesh(&mut self, object: ObjectId, mode: EvaluationMode) -> Option<MeshId>;

    /// Frees a mesh produced by `evaluate_mesh`
    fn release_mesh(&mut self, mesh: MeshId);

    /// Reads mesh records
    fn mesh(&self, mesh: MeshId) -> Option<&MeshData>;

    /// Object to world transform
    fn world_matrix(&self, object: ObjectId) -> Option<Mat4>;

    /// Whether a final render is in progress
    fn is_rendering(&self) -> bool;
}

/// Mesh data borrowed from the host for the span of one extraction.
///
/// A snapshot either aliases the object's stored mesh or owns a transient
/// mesh from modifier evaluation. Owned meshes go back to the host when the
/// snapshot is released or dropped, whichever happens first.
pub struct MeshSnapshot<'s> {
    scene: &'s mut dyn SceneHost,
    mesh: MeshId,
    owned: bool,
}

impl<'s> MeshSnapshot<'s> {
    /// Wraps the object's own mesh; never released
    pub fn shared(scene: &'s mut dyn SceneHost, mesh: MeshId) -> Self {
        Self { scene, mesh, owned: false }
    }

    /// Wraps a transient mesh; released when the snapshot ends
    pub fn transient(scene: &'s mut dyn SceneHost, mesh: MeshId) -> Self {
        Self { scene, mesh, owned: true }
    }

    pub fn id(&self) -> MeshId {
        self.mesh
    }

    pub fn is_transient(&self) -> bool {
        self.owned
    }

    /// Mesh records, `None` if the host has no data under this handle
    pub fn data(&self) -> Option<&MeshData> {
        self.scene.mesh(self.mesh)
    }

    /// Read access to the rest of the scene while the snapshot is held
    pub fn scene(&self) -> &dyn SceneHost {
        &*self.scene
    }

    /// Ends the snapshot, handing a transient mesh back to the host
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for MeshSnapshot<'_> {
    fn drop(&mut self) {
        if self.owned {
            self.scene.release_mesh(self.mesh);
            self.owned = false;
        }
    }
}
