//! Nodle mesh library
//!
//! Node graph for reading mesh data out of a host scene: object references,
//! per-object vertex/edge/polygon extraction and transform matrix helpers.

// Public modules
pub mod math;
pub mod nodes;
pub mod scene;

// Re-export commonly used types
pub use nodes::{NodeData, NodeGraph, NodeGraphEngine, NodeRegistry, ParameterChange};
pub use scene::{InMemoryScene, MeshData, ObjectId, SceneHost};
