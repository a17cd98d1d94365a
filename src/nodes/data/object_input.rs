//! Object input node - emits the scene object chosen in its parameters

use egui::Color32;

use crate::nodes::interface::{NodeData, ParameterChange};
use crate::nodes::{DataType, Node, NodeCategory, NodeFactory, NodeMetadata, PortDefinition, ProcessingCost};
use crate::scene::ObjectId;

pub const OBJECT: &str = "object";

/// Object input node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectInputNode {
    pub object: Option<ObjectId>,
}

impl NodeFactory for ObjectInputNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "Data_Object",
            "Object",
            NodeCategory::data(),
            "Outputs a reference to a scene object",
        )
        .with_color(Color32::from_rgb(55, 45, 65))
        .with_icon("◆")
        .with_outputs(vec![
            PortDefinition::required("Object", "object", DataType::Object)
                .with_description("The selected object, or nothing"),
        ])
        .with_tags(vec!["data", "object", "source"])
        .with_processing_cost(ProcessingCost::Minimal)
    }

    fn default_parameters() -> Vec<(&'static str, NodeData)> {
        vec![(OBJECT, NodeData::Object(None))]
    }
}

impl ObjectInputNode {
    pub fn from_node(node: &Node) -> Self {
        Self {
            object: node.parameter(OBJECT).and_then(NodeData::as_object),
        }
    }

    /// Parameter change selecting `object`
    pub fn select(object: Option<ObjectId>) -> ParameterChange {
        ParameterChange::new(OBJECT, NodeData::Object(object))
    }

    pub fn process_node(node: &Node) -> Vec<NodeData> {
        vec![NodeData::Object(Self::from_node(node).object)]
    }
}
