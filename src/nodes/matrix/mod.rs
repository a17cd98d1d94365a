//! Matrix nodes built on the helpers in `crate::math`

pub mod compose;
pub mod extract_rotation;

pub use compose::ComposeMatrixNode;
pub use extract_rotation::ExtractRotationNode;
