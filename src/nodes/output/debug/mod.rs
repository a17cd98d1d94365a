//! Debug node - logs whatever reaches it and passes it on

use egui::Color32;
use log::info;

use crate::nodes::interface::NodeData;
use crate::nodes::{DataType, Node, NodeCategory, NodeFactory, NodeMetadata, PortDefinition, ProcessingCost};

/// Debug output node
#[derive(Default)]
pub struct DebugNode;

impl NodeFactory for DebugNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "Output_Debug",
            "Debug",
            NodeCategory::output(),
            "Logs its input and passes it through",
        )
        .with_color(Color32::from_rgb(65, 45, 45))
        .with_icon("🐛")
        .with_inputs(vec![
            PortDefinition::required("Input", "input", DataType::Any)
                .with_description("Value to log"),
        ])
        .with_outputs(vec![
            PortDefinition::optional("Output", "output", DataType::Any)
                .with_description("The input, unchanged"),
        ])
        .with_tags(vec!["output", "debug", "log"])
        .with_processing_cost(ProcessingCost::Minimal)
    }
}

impl DebugNode {
    pub fn process_node(node: &Node, inputs: Vec<NodeData>) -> Vec<NodeData> {
        let value = inputs.into_iter().next().unwrap_or(NodeData::None);
        info!("[{} #{}] {}", node.title, node.id, value.summary());
        vec![value]
    }
}
