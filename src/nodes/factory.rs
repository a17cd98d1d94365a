//! Node factory system with self-registration and rich metadata

use std::collections::{BTreeMap, HashMap};

use egui::Color32;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::nodes::interface::NodeData;
use crate::nodes::{Node, NodeGraph, NodeId};

/// Data types that can flow through ports
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Scene object reference
    Object,
    /// List of 3D vectors
    VectorList,
    /// List of vertex index pairs
    EdgeIndicesList,
    /// List of vertex index tuples
    PolygonIndicesList,
    /// 4x4 transform matrix
    Matrix,
    /// 3D vector (x, y, z)
    Vector3,
    /// Floating point number
    Float,
    /// Boolean value
    Boolean,
    /// Text string
    String,
    /// Any type (for generic ports)
    Any,
}

impl DataType {
    /// Check if this data type can connect to another
    pub fn can_connect_to(&self, other: &DataType) -> bool {
        self == other || *self == DataType::Any || *other == DataType::Any
    }

    /// Get a human-readable name for this data type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Object => "Object",
            DataType::VectorList => "Vector List",
            DataType::EdgeIndicesList => "Edge Indices List",
            DataType::PolygonIndicesList => "Polygon Indices List",
            DataType::Matrix => "Matrix",
            DataType::Vector3 => "Vector3",
            DataType::Float => "Float",
            DataType::Boolean => "Boolean",
            DataType::String => "String",
            DataType::Any => "Any",
        }
    }
}

/// Hierarchical category system for organizing nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeCategory {
    path: Vec<String>,
}

impl NodeCategory {
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn display_string(&self) -> String {
        self.path.join(" > ")
    }

    pub fn data() -> Self { Self::new(&["Data"]) }
    pub fn mesh() -> Self { Self::new(&["Mesh"]) }
    pub fn matrix() -> Self { Self::new(&["Matrix"]) }
    pub fn output() -> Self { Self::new(&["Output"]) }
}

/// Port definition for node creation
#[derive(Debug, Clone)]
pub struct PortDefinition {
    pub name: String,
    pub identifier: String,
    pub data_type: DataType,
    pub optional: bool,
    pub description: Option<String>,
}

impl PortDefinition {
    /// Create a required port
    pub fn required(name: &str, identifier: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            identifier: identifier.to_string(),
            data_type,
            optional: false,
            description: None,
        }
    }

    /// Create an optional port
    pub fn optional(name: &str, identifier: &str, data_type: DataType) -> Self {
        Self {
            optional: true,
            ..Self::required(name, identifier, data_type)
        }
    }

    /// Add description to port
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Processing cost hint for scheduling
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingCost {
    Minimal,      // < 1ms
    Low,          // 1-10ms
    Medium,       // 10-100ms
    High,         // 100ms-1s
}

/// Metadata describing a node type
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    // Core identity
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,

    // Visual appearance
    pub color: Color32,
    pub icon: &'static str,

    // Organization & categorization
    pub category: NodeCategory,
    pub tags: Vec<&'static str>,

    // Connectivity
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,

    pub processing_cost: ProcessingCost,
}

impl NodeMetadata {
    /// Create node metadata with sensible defaults
    pub fn new(
        node_type: &'static str,
        display_name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        Self {
            node_type,
            display_name,
            description,
            color: Color32::from_rgb(100, 100, 100),
            icon: "⚡",
            category,
            tags: vec![],
            inputs: vec![],
            outputs: vec![],
            processing_cost: ProcessingCost::Low,
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<PortDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<PortDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_tags(mut self, tags: Vec<&'static str>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_processing_cost(mut self, cost: ProcessingCost) -> Self {
        self.processing_cost = cost;
        self
    }
}

/// Node factory trait: declares sockets and default configuration
pub trait NodeFactory: Send + Sync {
    /// Get comprehensive node metadata
    fn metadata() -> NodeMetadata where Self: Sized;

    /// Initial parameter values for a freshly created node
    fn default_parameters() -> Vec<(&'static str, NodeData)> where Self: Sized {
        Vec::new()
    }

    /// Create a node instance
    fn create() -> Node where Self: Sized {
        let meta = Self::metadata();
        let mut node = Node::new(0, meta.display_name, meta.node_type);

        for input in &meta.inputs {
            node.add_input(&input.name, &input.identifier, input.data_type.clone());
        }
        for output in &meta.outputs {
            node.add_output(&output.name, &output.identifier, output.data_type.clone());
        }
        for (name, value) in Self::default_parameters() {
            node.parameters.insert(name.to_string(), value);
        }

        node
    }

    /// Add this node to a graph
    fn add_to_graph(graph: &mut NodeGraph) -> NodeId where Self: Sized {
        graph.add_node(Self::create())
    }
}

/// Function pointer type for creating nodes
type NodeCreator = fn() -> Node;
type MetadataProvider = fn() -> NodeMetadata;

/// Registry for managing node factories
pub struct NodeRegistry {
    creators: BTreeMap<String, NodeCreator>,
    metadata_providers: BTreeMap<String, MetadataProvider>,
    categories: HashMap<NodeCategory, Vec<String>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            creators: BTreeMap::new(),
            metadata_providers: BTreeMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Registry with every node type shipped in this crate
    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        registry.register::<crate::nodes::data::ObjectInputNode>();
        registry.register::<crate::nodes::mesh::ObjectMeshDataNode>();
        registry.register::<crate::nodes::matrix::ComposeMatrixNode>();
        registry.register::<crate::nodes::matrix::ExtractRotationNode>();
        registry.register::<crate::nodes::output::DebugNode>();
        registry
    }

    /// Register a node factory
    pub fn register<T: NodeFactory + 'static>(&mut self) {
        let metadata = T::metadata();
        let node_type = metadata.node_type.to_string();

        if self.creators.contains_key(&node_type) {
            warn!("Node type {} registered twice, replacing previous factory", node_type);
        } else {
            self.categories
                .entry(metadata.category.clone())
                .or_default()
                .push(node_type.clone());
        }

        self.creators.insert(node_type.clone(), T::create);
        self.metadata_providers.insert(node_type.clone(), T::metadata);
        debug!("Registered node type {}", node_type);
    }

    /// Create a node by type name
    pub fn create_node(&self, node_type: &str) -> Option<Node> {
        match self.creators.get(node_type) {
            Some(creator) => Some(creator()),
            None => {
                warn!("Unknown node type requested: {}", node_type);
                None
            }
        }
    }

    /// Get metadata for a node type
    pub fn get_metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.metadata_providers.get(node_type).map(|provider| provider())
    }

    /// All registered node types, sorted
    pub fn node_types(&self) -> Vec<&str> {
        self.creators.keys().map(String::as_str).collect()
    }

    /// Node types registered under a category
    pub fn nodes_in_category(&self, category: &NodeCategory) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|types| types.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<&NodeCategory> {
        self.categories.keys().collect()
    }

    /// Node types whose display name or tags contain `query`, case-insensitive
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.metadata_providers
            .iter()
            .filter(|(_, provider)| {
                let meta = provider();
                meta.display_name.to_lowercase().contains(&query)
                    || meta.tags.iter().any(|tag| tag.contains(query.as_str()))
            })
            .map(|(node_type, _)| node_type.as_str())
            .collect()
    }

    /// Menu entry for a node type: icon followed by display name
    pub fn menu_label(&self, node_type: &str) -> Option<String> {
        self.get_metadata(node_type)
            .map(|meta| format!("{} {}", meta.icon, meta.display_name))
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_compatibility() {
        assert!(DataType::VectorList.can_connect_to(&DataType::VectorList));
        assert!(DataType::Object.can_connect_to(&DataType::Any));
        assert!(!DataType::EdgeIndicesList.can_connect_to(&DataType::PolygonIndicesList));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = NodeRegistry::with_builtin_nodes();
        assert_eq!(
            registry.node_types(),
            vec!["Data_Object", "Matrix_Compose", "Matrix_ExtractRotation", "Mesh_ObjectMeshData", "Output_Debug"]
        );
        assert_eq!(registry.nodes_in_category(&NodeCategory::mesh()), vec!["Mesh_ObjectMeshData"]);
        assert_eq!(registry.nodes_in_category(&NodeCategory::matrix()).len(), 2);
        assert!(registry.create_node("Unknown").is_none());
    }

    #[test]
    fn test_created_node_matches_metadata() {
        let registry = NodeRegistry::with_builtin_nodes();
        let node = registry.create_node("Mesh_ObjectMeshData").unwrap();
        let meta = registry.get_metadata("Mesh_ObjectMeshData").unwrap();

        assert_eq!(node.type_id, meta.node_type);
        assert_eq!(node.title, meta.display_name);
        assert_eq!(node.inputs.len(), meta.inputs.len());
        assert_eq!(node.outputs.len(), meta.outputs.len());
        assert_eq!(meta.category.display_string(), "Mesh");
    }

    #[test]
    fn test_search_matches_tags_and_names() {
        let registry = NodeRegistry::with_builtin_nodes();
        assert_eq!(registry.search("vertices"), vec!["Mesh_ObjectMeshData"]);
        assert_eq!(registry.search("ROTATION"), vec!["Matrix_ExtractRotation"]);
        assert_eq!(registry.search("matrix"), vec!["Matrix_Compose", "Matrix_ExtractRotation"]);
        assert!(registry.search("texture").is_empty());
    }

    #[test]
    fn test_menu_label() {
        let registry = NodeRegistry::with_builtin_nodes();
        assert_eq!(registry.menu_label("Output_Debug").as_deref(), Some("🐛 Debug"));
        assert_eq!(registry.menu_label("Missing"), None);
    }
}
