//! Object Mesh Data parameters using Pattern A: build_interface method

use crate::nodes::interface::{NodeData, ParameterChange};
use crate::nodes::{Node, NodeFactory};

use super::logic::ObjectMeshDataLogic;

pub const USE_WORLD_SPACE: &str = "use_world_space";
pub const USE_MODIFIERS: &str = "use_modifiers";

const USE_WORLD_SPACE_HINT: &str =
    "Use real vertex locations (should be turned off when the vertices will be transformed later anyway)";
const USE_MODIFIERS_HINT: &str = "Apply modifiers before importing the data";

/// Object Mesh Data node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMeshDataNode {
    pub use_world_space: bool,
    pub use_modifiers: bool,
}

impl Default for ObjectMeshDataNode {
    fn default() -> Self {
        Self {
            use_world_space: true,
            use_modifiers: false,
        }
    }
}

impl ObjectMeshDataNode {
    /// Reads the configuration stored on a node, falling back to defaults
    pub fn from_node(node: &Node) -> Self {
        let defaults = Self::default();
        Self {
            use_world_space: node.bool_parameter(USE_WORLD_SPACE, defaults.use_world_space),
            use_modifiers: node.bool_parameter(USE_MODIFIERS, defaults.use_modifiers),
        }
    }

    /// Pattern A: build_interface method that renders UI and returns parameter changes
    pub fn build_interface(node: &mut Node, ui: &mut egui::Ui) -> Vec<ParameterChange> {
        let mut changes = Vec::new();
        let current = Self::from_node(node);

        let meta = Self::metadata();
        ui.label(egui::RichText::new(meta.display_name).heading().color(meta.color));
        ui.separator();

        let mut use_modifiers = current.use_modifiers;
        if ui
            .checkbox(&mut use_modifiers, "Use Modifiers")
            .on_hover_text(USE_MODIFIERS_HINT)
            .changed()
        {
            changes.push(ParameterChange::new(USE_MODIFIERS, NodeData::Boolean(use_modifiers)));
        }

        let mut use_world_space = current.use_world_space;
        if ui
            .checkbox(&mut use_world_space, "Use World Space")
            .on_hover_text(USE_WORLD_SPACE_HINT)
            .changed()
        {
            changes.push(ParameterChange::new(USE_WORLD_SPACE, NodeData::Boolean(use_world_space)));
        }

        changes
    }

    /// Convert current parameters to the extraction logic
    pub fn to_logic(&self) -> ObjectMeshDataLogic {
        ObjectMeshDataLogic {
            use_world_space: self.use_world_space,
            use_modifiers: self.use_modifiers,
        }
    }
}
