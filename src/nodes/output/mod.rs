//! Output nodes for inspecting results

pub mod debug;

pub use debug::DebugNode;
