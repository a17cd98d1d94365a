//! Object Mesh Data node - vertices, edges and polygons of a scene object
//!
//! Reads one object reference and exposes its mesh as three independently
//! connectable lists. Only connected lists are computed.

pub mod logic;
pub mod parameters;

pub use logic::{plan_extraction, ExtractionPlan, MeshDataOutputs, MeshOutput, ObjectMeshDataLogic};
pub use parameters::ObjectMeshDataNode;

use egui::Color32;

use crate::nodes::interface::NodeData;
use crate::nodes::{DataType, Node, NodeCategory, NodeFactory, NodeMetadata, PortDefinition, ProcessingCost};
use crate::scene::SceneHost;

impl NodeFactory for ObjectMeshDataNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "Mesh_ObjectMeshData",
            "Object Mesh Data",
            NodeCategory::mesh(),
            "Vertex positions, edge indices and polygon indices of a mesh object",
        )
        .with_color(Color32::from_rgb(90, 140, 110))
        .with_icon("▦")
        .with_inputs(vec![
            PortDefinition::required("Object", "object", DataType::Object)
                .with_description("Object to read; anything but a mesh gives empty lists"),
        ])
        .with_outputs(vec![
            PortDefinition::optional("Vertices", MeshOutput::Vertices.identifier(), DataType::VectorList)
                .with_description("Vertex positions in mesh order"),
            PortDefinition::optional("Edge Indices", MeshOutput::Edges.identifier(), DataType::EdgeIndicesList)
                .with_description("Vertex index pair of every edge"),
            PortDefinition::optional("Polygon Indices", MeshOutput::Polygons.identifier(), DataType::PolygonIndicesList)
                .with_description("Vertex indices of every polygon"),
        ])
        .with_tags(vec!["mesh", "object", "vertices", "edges", "polygons", "modifiers"])
        .with_processing_cost(ProcessingCost::Medium)
    }

    fn default_parameters() -> Vec<(&'static str, NodeData)> {
        let defaults = ObjectMeshDataNode::default();
        vec![
            (parameters::USE_WORLD_SPACE, NodeData::Boolean(defaults.use_world_space)),
            (parameters::USE_MODIFIERS, NodeData::Boolean(defaults.use_modifiers)),
        ]
    }
}

impl ObjectMeshDataNode {
    /// Executes a compiled plan for `node` with the collected inputs
    pub fn process_node(node: &Node, plan: &ExtractionPlan, inputs: &[NodeData], scene: &mut dyn SceneHost) -> Vec<NodeData> {
        let object = inputs.first().and_then(NodeData::as_object);
        ObjectMeshDataNode::from_node(node)
            .to_logic()
            .run(plan, object, scene)
            .into_node_data()
    }
}
