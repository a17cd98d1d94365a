//! Compose Matrix node - location, rotation and scale to a transform

use egui::Color32;
use glam::Vec3;

use crate::math::compose_matrix;
use crate::nodes::interface::NodeData;
use crate::nodes::{DataType, NodeCategory, NodeFactory, NodeMetadata, PortDefinition, ProcessingCost};

/// Compose Matrix node
#[derive(Default)]
pub struct ComposeMatrixNode;

impl NodeFactory for ComposeMatrixNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "Matrix_Compose",
            "Compose Matrix",
            NodeCategory::matrix(),
            "Builds a transform matrix from location, Euler rotation (radians) and scale",
        )
        .with_color(Color32::from_rgb(120, 160, 200))
        .with_icon("⊞")
        .with_inputs(vec![
            PortDefinition::optional("Location", "location", DataType::Vector3),
            PortDefinition::optional("Rotation", "rotation", DataType::Vector3)
                .with_description("XYZ Euler angles in radians"),
            PortDefinition::optional("Scale", "scale", DataType::Vector3),
        ])
        .with_outputs(vec![
            PortDefinition::required("Matrix", "matrix", DataType::Matrix),
        ])
        .with_tags(vec!["matrix", "transform", "compose"])
        .with_processing_cost(ProcessingCost::Minimal)
    }
}

impl ComposeMatrixNode {
    /// Unconnected inputs default to no translation, no rotation and unit scale
    pub fn process_node(inputs: &[NodeData]) -> Vec<NodeData> {
        let input = |index: usize, default: Vec3| {
            inputs.get(index).and_then(NodeData::as_vector3).unwrap_or(default)
        };
        let matrix = compose_matrix(input(0, Vec3::ZERO), input(1, Vec3::ZERO), input(2, Vec3::ONE));
        vec![NodeData::Matrix(matrix)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn test_unconnected_inputs_give_identity() {
        assert_eq!(ComposeMatrixNode::process_node(&[]), vec![NodeData::Matrix(Mat4::IDENTITY)]);
    }

    #[test]
    fn test_location_input() {
        let outputs = ComposeMatrixNode::process_node(&[NodeData::Vector3(Vec3::new(1.0, 2.0, 3.0)), NodeData::None, NodeData::None]);
        assert_eq!(outputs, vec![NodeData::Matrix(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)))]);
    }
}
