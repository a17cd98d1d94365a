//! Mesh nodes

pub mod object_mesh_data;

pub use object_mesh_data::ObjectMeshDataNode;
