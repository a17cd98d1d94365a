//! Port types and functionality for node connections

use serde::{Deserialize, Serialize};

use super::factory::DataType;

/// Unique identifier for a port
pub type PortId = usize;

/// Type of port (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortType {
    Input,
    Output,
}

/// Represents a connection point on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    /// Stable name used by node logic, independent of the display name
    pub identifier: String,
    pub port_type: PortType,
    pub data_type: DataType,
}

impl Port {
    /// Creates a new port
    pub fn new(
        id: PortId,
        name: impl Into<String>,
        identifier: impl Into<String>,
        port_type: PortType,
        data_type: DataType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            identifier: identifier.into(),
            port_type,
            data_type,
        }
    }

    /// Checks if this port is an input
    pub fn is_input(&self) -> bool {
        matches!(self.port_type, PortType::Input)
    }

    /// Checks if this port is an output
    pub fn is_output(&self) -> bool {
        matches!(self.port_type, PortType::Output)
    }
}
