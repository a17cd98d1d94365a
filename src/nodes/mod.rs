//! Node system - Core data structures and node implementations

// Core node system modules
pub mod graph;
pub mod node;
pub mod port;
pub mod factory;
pub mod interface;
pub mod execution_engine;
pub mod cache;

// Node implementations
pub mod data;
pub mod mesh;
pub mod matrix;
pub mod output;

// Re-export core types
pub use graph::{Connection, LinkedOutputs, NodeGraph};
pub use node::{Node, NodeId};
pub use port::{Port, PortId, PortType};

// Re-export factory types
pub use factory::{
    NodeFactory, NodeMetadata, NodeCategory,
    DataType, PortDefinition, ProcessingCost, NodeRegistry,
};

// Re-export interface types
pub use interface::{NodeData, ParameterChange};

// Re-export execution engine types
pub use execution_engine::{
    NodeGraphEngine, NodeState, ExecutionStats,
};
