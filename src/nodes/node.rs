//! Node types and core node functionality

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::factory::DataType;
use super::interface::{NodeData, ParameterChange};
use super::port::{Port, PortId, PortType};

/// Unique identifier for a node
pub type NodeId = usize;

/// Core node structure representing a node in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// User-facing title, free to change
    pub title: String,
    /// Registered node type, used for dispatch
    pub type_id: String,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    /// Persisted node configuration
    pub parameters: HashMap<String, NodeData>,
}

impl Node {
    /// Creates a new node with the specified properties
    pub fn new(id: NodeId, title: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            type_id: type_id.into(),
            inputs: vec![],
            outputs: vec![],
            parameters: HashMap::new(),
        }
    }

    /// Adds an input port to the node
    pub fn add_input(&mut self, name: impl Into<String>, identifier: impl Into<String>, data_type: DataType) -> &mut Self {
        let port_id = self.inputs.len();
        self.inputs.push(Port::new(port_id, name, identifier, PortType::Input, data_type));
        self
    }

    /// Adds an output port to the node
    pub fn add_output(&mut self, name: impl Into<String>, identifier: impl Into<String>, data_type: DataType) -> &mut Self {
        let port_id = self.outputs.len();
        self.outputs.push(Port::new(port_id, name, identifier, PortType::Output, data_type));
        self
    }

    /// Looks up an output port by identifier
    pub fn output_port(&self, identifier: &str) -> Option<PortId> {
        self.outputs.iter().find(|p| p.identifier == identifier).map(|p| p.id)
    }

    /// Looks up an input port by identifier
    pub fn input_port(&self, identifier: &str) -> Option<PortId> {
        self.inputs.iter().find(|p| p.identifier == identifier).map(|p| p.id)
    }

    pub fn parameter(&self, name: &str) -> Option<&NodeData> {
        self.parameters.get(name)
    }

    /// Boolean parameter with a fallback for missing or mistyped values
    pub fn bool_parameter(&self, name: &str, default: bool) -> bool {
        self.parameters.get(name).and_then(NodeData::as_bool).unwrap_or(default)
    }

    /// Stores a parameter value, returning whether it changed
    pub fn apply_parameter_change(&mut self, change: ParameterChange) -> bool {
        if self.parameters.get(&change.parameter) == Some(&change.value) {
            return false;
        }
        self.parameters.insert(change.parameter, change.value);
        true
    }
}
