//! Node graph data structures and operations

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeId};
use super::port::PortId;

/// Represents a connection between two ports on different nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub from_port: PortId,
    pub to_node: NodeId,
    pub to_port: PortId,
}

impl Connection {
    /// Creates a new connection
    pub fn new(from_node: NodeId, from_port: PortId, to_node: NodeId, to_port: PortId) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }
}

/// Output ports of one node that feed at least one connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedOutputs {
    ports: BTreeSet<PortId>,
}

impl LinkedOutputs {
    pub fn new(ports: impl IntoIterator<Item = PortId>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
        }
    }

    pub fn is_linked(&self, port: PortId) -> bool {
        self.ports.contains(&port)
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PortId> + '_ {
        self.ports.iter().copied()
    }
}

/// A graph containing nodes and their connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub connections: Vec<Connection>,
    next_node_id: NodeId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            connections: Vec::new(),
            next_node_id: 0,
        }
    }

    /// Adds a node to the graph and returns its ID
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_node_id;
        node.id = id;
        self.nodes.insert(id, node);
        self.next_node_id += 1;
        id
    }

    /// Removes a node and all its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections
            .retain(|conn| conn.from_node != node_id && conn.to_node != node_id);
        self.nodes.remove(&node_id)
    }

    /// Adds a connection between two ports.
    ///
    /// An input accepts a single link, so a link already on the target input
    /// is replaced and returned.
    pub fn add_connection(&mut self, connection: Connection) -> Result<Option<Connection>, &'static str> {
        if connection.from_node == connection.to_node {
            return Err("Cannot connect a node to itself");
        }

        let source = self.nodes.get(&connection.from_node).ok_or("Source node does not exist")?;
        let target = self.nodes.get(&connection.to_node).ok_or("Target node does not exist")?;

        let from_port = source.outputs.get(connection.from_port).ok_or("Source port does not exist")?;
        let to_port = target.inputs.get(connection.to_port).ok_or("Target port does not exist")?;
        if !from_port.data_type.can_connect_to(&to_port.data_type) {
            return Err("Port data types are not compatible");
        }

        let existing = self
            .connections
            .iter()
            .position(|c| c.to_node == connection.to_node && c.to_port == connection.to_port);
        let replaced = existing.map(|index| self.connections.remove(index));
        self.connections.push(connection);
        Ok(replaced)
    }

    /// Helper method to add connection by node IDs and port indices
    pub fn add_connection_by_ids(&mut self, from_node: NodeId, from_port: PortId, to_node: NodeId, to_port: PortId) -> Result<Option<Connection>, &'static str> {
        self.add_connection(Connection::new(from_node, from_port, to_node, to_port))
    }

    /// Removes a connection by index
    pub fn remove_connection(&mut self, index: usize) -> Option<Connection> {
        if index < self.connections.len() {
            Some(self.connections.remove(index))
        } else {
            None
        }
    }

    /// Which outputs of `node_id` are connected to something downstream
    pub fn linked_outputs(&self, node_id: NodeId) -> LinkedOutputs {
        LinkedOutputs::new(
            self.connections
                .iter()
                .filter(|c| c.from_node == node_id)
                .map(|c| c.from_port),
        )
    }

    /// Serializes the graph, parameters included
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize node graph: {}", e))
    }

    /// Restores a graph written by [`NodeGraph::to_json`]
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse node graph: {}", e))
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::factory::DataType;

    fn source_and_sink() -> (NodeGraph, NodeId, NodeId) {
        let mut graph = NodeGraph::new();

        let mut source = Node::new(0, "Source", "Source");
        source.add_output("A", "a", DataType::VectorList)
            .add_output("B", "b", DataType::EdgeIndicesList);
        let source_id = graph.add_node(source);

        let mut sink = Node::new(0, "Sink", "Sink");
        sink.add_input("In", "in", DataType::Any)
            .add_input("Object", "object", DataType::Object);
        let sink_id = graph.add_node(sink);

        (graph, source_id, sink_id)
    }

    #[test]
    fn test_basic_graph_operations() {
        let (mut graph, source, sink) = source_and_sink();
        assert_eq!((source, sink), (0, 1));

        graph.add_connection_by_ids(source, 0, sink, 0).unwrap();
        assert_eq!(graph.connections.len(), 1);

        let removed = graph.remove_node(source);
        assert!(removed.is_some());
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn test_connection_validation() {
        let (mut graph, source, sink) = source_and_sink();
        assert_eq!(graph.add_connection_by_ids(source, 0, source, 0), Err("Cannot connect a node to itself"));
        assert_eq!(graph.add_connection_by_ids(source, 0, 42, 0), Err("Target node does not exist"));
        assert_eq!(graph.add_connection_by_ids(source, 5, sink, 0), Err("Source port does not exist"));
        assert_eq!(graph.add_connection_by_ids(source, 0, sink, 1), Err("Port data types are not compatible"));
    }

    #[test]
    fn test_input_accepts_single_link() {
        let (mut graph, source, sink) = source_and_sink();
        assert_eq!(graph.add_connection_by_ids(source, 0, sink, 0), Ok(None));
        let replaced = graph.add_connection_by_ids(source, 1, sink, 0).unwrap();
        assert_eq!(replaced, Some(Connection::new(source, 0, sink, 0)));
        assert_eq!(graph.connections, vec![Connection::new(source, 1, sink, 0)]);
    }

    #[test]
    fn test_remove_connection() {
        let (mut graph, source, sink) = source_and_sink();
        graph.add_connection_by_ids(source, 0, sink, 0).unwrap();

        assert_eq!(graph.remove_connection(3), None);
        assert_eq!(graph.remove_connection(0), Some(Connection::new(source, 0, sink, 0)));
        assert!(graph.linked_outputs(source).is_empty());
    }

    #[test]
    fn test_linked_outputs() {
        let (mut graph, source, sink) = source_and_sink();
        assert!(graph.linked_outputs(source).is_empty());

        graph.add_connection_by_ids(source, 1, sink, 0).unwrap();
        let linked = graph.linked_outputs(source);
        assert!(!linked.is_linked(0));
        assert!(linked.is_linked(1));
        assert_eq!(linked.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_json_round_trip() {
        let (mut graph, source, sink) = source_and_sink();
        graph.add_connection_by_ids(source, 1, sink, 0).unwrap();
        graph.nodes.get_mut(&source).unwrap()
            .parameters.insert("use_world_space".to_string(), crate::nodes::NodeData::Boolean(false));

        let restored = NodeGraph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(restored.connections, graph.connections);
        assert_eq!(restored.nodes[&source].parameters, graph.nodes[&source].parameters);
        assert_eq!(restored.nodes[&sink].inputs[1].data_type, DataType::Object);

        // Ids keep counting from where the saved graph stopped
        let mut restored = restored;
        assert_eq!(restored.add_node(Node::new(0, "Next", "Next")), 2);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(NodeGraph::from_json("{ not json").is_err());
    }
}
