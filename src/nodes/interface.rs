//! Values carried on node sockets and parameter updates from the UI

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::ObjectId;

/// Core data types that flow between nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    /// Scene object reference, `None` when nothing is assigned
    Object(Option<ObjectId>),
    /// Vertex positions
    VectorList(Vec<Vec3>),
    /// Vertex index pairs, one per edge
    EdgeIndicesList(Vec<[u32; 2]>),
    /// Vertex index tuples, one per polygon
    PolygonIndicesList(Vec<Vec<u32>>),
    /// 4x4 transform
    Matrix(Mat4),
    /// Generic value types
    Vector3(Vec3),
    Float(f32),
    Integer(i32),
    String(String),
    Boolean(bool),
    None, // Empty/null value
}

impl NodeData {
    pub fn as_bool(&self) -> Option<bool> {
        if let NodeData::Boolean(b) = self { Some(*b) } else { None }
    }

    pub fn as_vector3(&self) -> Option<Vec3> {
        if let NodeData::Vector3(v) = self { Some(*v) } else { None }
    }

    pub fn as_matrix(&self) -> Option<Mat4> {
        if let NodeData::Matrix(m) = self { Some(*m) } else { None }
    }

    /// Object reference carried by this value; anything else reads as absent
    pub fn as_object(&self) -> Option<ObjectId> {
        if let NodeData::Object(object) = self { *object } else { None }
    }

    /// Short description for logs
    pub fn summary(&self) -> String {
        match self {
            NodeData::Object(Some(id)) => format!("Object({})", id.0),
            NodeData::Object(None) => "Object(none)".to_string(),
            NodeData::VectorList(v) => format!("VectorList[{}]", v.len()),
            NodeData::EdgeIndicesList(e) => format!("EdgeIndicesList[{}]", e.len()),
            NodeData::PolygonIndicesList(p) => format!("PolygonIndicesList[{}]", p.len()),
            NodeData::Matrix(_) => "Matrix".to_string(),
            NodeData::Vector3(v) => format!("Vector3({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
            NodeData::Float(f) => format!("Float({})", f),
            NodeData::Integer(i) => format!("Integer({})", i),
            NodeData::String(s) => format!("String({:?})", s),
            NodeData::Boolean(b) => format!("Boolean({})", b),
            NodeData::None => "None".to_string(),
        }
    }
}

/// Parameter change notification from a node's interface panel
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterChange {
    pub parameter: String,
    pub value: NodeData,
}

impl ParameterChange {
    pub fn new(parameter: impl Into<String>, value: NodeData) -> Self {
        Self {
            parameter: parameter.into(),
            value,
        }
    }
}
