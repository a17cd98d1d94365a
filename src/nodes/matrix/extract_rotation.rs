//! Extract Rotation node - keeps only the rotation of a transform

use egui::Color32;
use glam::Mat4;

use crate::math::extract_rotation;
use crate::nodes::interface::NodeData;
use crate::nodes::{DataType, NodeCategory, NodeFactory, NodeMetadata, PortDefinition, ProcessingCost};

#[derive(Default)]
pub struct ExtractRotationNode;

impl NodeFactory for ExtractRotationNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "Matrix_ExtractRotation",
            "Extract Rotation",
            NodeCategory::matrix(),
            "Rebuilds a pure rotation matrix from the Euler angles of a transform",
        )
        .with_color(Color32::from_rgb(120, 160, 200))
        .with_icon("⟳")
        .with_inputs(vec![
            PortDefinition::required("Matrix", "matrix", DataType::Matrix),
        ])
        .with_outputs(vec![
            PortDefinition::required("Rotation", "rotation", DataType::Matrix),
        ])
        .with_tags(vec!["matrix", "rotation", "decompose"])
        .with_processing_cost(ProcessingCost::Minimal)
    }
}

impl ExtractRotationNode {
    pub fn process_node(inputs: &[NodeData]) -> Vec<NodeData> {
        let matrix = inputs.first().and_then(NodeData::as_matrix).unwrap_or(Mat4::IDENTITY);
        vec![NodeData::Matrix(extract_rotation(&matrix))]
    }
}
