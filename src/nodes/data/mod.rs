//! Data nodes that bring scene references into the graph

pub mod object_input;

pub use object_input::ObjectInputNode;
