//! Object Mesh Data extraction - planning and interpretation
//!
//! Planning looks only at which outputs are connected and yields an
//! `ExtractionPlan`. Running a plan touches the scene: it acquires one mesh
//! snapshot, computes the planned lists in a fixed order and releases the
//! snapshot before returning.

use glam::{Mat4, Vec3};
use log::{debug, warn};

use crate::nodes::graph::LinkedOutputs;
use crate::nodes::interface::NodeData;
use crate::nodes::PortId;
use crate::scene::{EvaluationMode, MeshData, MeshSnapshot, ObjectId, SceneHost};

use super::parameters::ObjectMeshDataNode;

/// One of the three lists the node can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeshOutput {
    Vertices,
    Edges,
    Polygons,
}

impl MeshOutput {
    /// Extraction order
    pub const ALL: [MeshOutput; 3] = [MeshOutput::Vertices, MeshOutput::Edges, MeshOutput::Polygons];

    /// Output port carrying this list
    pub fn port(self) -> PortId {
        match self {
            MeshOutput::Vertices => 0,
            MeshOutput::Edges => 1,
            MeshOutput::Polygons => 2,
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            MeshOutput::Vertices => "vertices",
            MeshOutput::Edges => "edgeIndices",
            MeshOutput::Polygons => "polygonIndices",
        }
    }
}

/// The extractions one node run performs, always in `MeshOutput::ALL` order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPlan {
    outputs: Vec<MeshOutput>,
}

impl ExtractionPlan {
    pub fn new(outputs: impl IntoIterator<Item = MeshOutput>) -> Self {
        let mut outputs: Vec<MeshOutput> = outputs.into_iter().collect();
        outputs.sort();
        outputs.dedup();
        Self { outputs }
    }

    /// Plan computing every output
    pub fn all() -> Self {
        Self::new(MeshOutput::ALL)
    }

    /// Nothing to extract; running this plan never touches the scene
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn outputs(&self) -> &[MeshOutput] {
        &self.outputs
    }
}

/// Plans the extractions needed for the connected outputs
pub fn plan_extraction(linked: &LinkedOutputs) -> ExtractionPlan {
    ExtractionPlan::new(
        MeshOutput::ALL
            .into_iter()
            .filter(|output| linked.is_linked(output.port())),
    )
}

/// Values for the three output sockets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDataOutputs {
    pub vertices: Vec<Vec3>,
    pub edge_indices: Vec<[u32; 2]>,
    pub polygon_indices: Vec<Vec<u32>>,
}

impl MeshDataOutputs {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edge_indices.is_empty() && self.polygon_indices.is_empty()
    }

    /// Socket values in output port order
    pub fn into_node_data(self) -> Vec<NodeData> {
        vec![
            NodeData::VectorList(self.vertices),
            NodeData::EdgeIndicesList(self.edge_indices),
            NodeData::PolygonIndicesList(self.polygon_indices),
        ]
    }
}

/// Extraction settings of one Object Mesh Data node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMeshDataLogic {
    pub use_world_space: bool,
    pub use_modifiers: bool,
}

impl Default for ObjectMeshDataLogic {
    fn default() -> Self {
        ObjectMeshDataNode::default().to_logic()
    }
}

impl ObjectMeshDataLogic {
    /// Runs `plan` against `object`.
    ///
    /// Absent, deleted and non-mesh objects produce three empty lists.
    /// Outputs left out of the plan stay empty.
    pub fn run(&self, plan: &ExtractionPlan, object: Option<ObjectId>, scene: &mut dyn SceneHost) -> MeshDataOutputs {
        let mut outputs = MeshDataOutputs::default();
        if plan.is_empty() {
            return outputs;
        }

        let Some(object) = object else {
            debug!("Object mesh data: no object assigned, outputs are empty");
            return outputs;
        };
        match scene.object_type(object) {
            Some(object_type) if object_type.is_mesh() => {}
            Some(object_type) => {
                debug!("Object mesh data: {:?} is a {} object, outputs are empty", object, object_type.tag());
                return outputs;
            }
            None => {
                debug!("Object mesh data: {:?} no longer exists, outputs are empty", object);
                return outputs;
            }
        }

        let Some(snapshot) = self.get_mesh(object, scene) else {
            warn!("Object mesh data: no mesh available for {:?}", object);
            return outputs;
        };

        match snapshot.data() {
            Some(mesh) => {
                for output in plan.outputs() {
                    match output {
                        MeshOutput::Vertices => {
                            let world_matrix = snapshot.scene().world_matrix(object).unwrap_or(Mat4::IDENTITY);
                            outputs.vertices = self.get_vertices(mesh, world_matrix);
                        }
                        MeshOutput::Edges => outputs.edge_indices = self.get_edges(mesh),
                        MeshOutput::Polygons => outputs.polygon_indices = self.get_polygons(mesh),
                    }
                }
            }
            None => warn!("Object mesh data: mesh {:?} has no data", snapshot.id()),
        }

        self.clear_mesh(snapshot);
        outputs
    }

    /// Acquires the mesh to read from.
    ///
    /// Without modifiers this is the object's stored mesh, shared with the
    /// scene. With modifiers it is a fresh evaluation, in render quality while
    /// the host renders and preview quality otherwise.
    pub fn get_mesh<'s>(&self, object: ObjectId, scene: &'s mut dyn SceneHost) -> Option<MeshSnapshot<'s>> {
        if self.use_modifiers {
            let mode = EvaluationMode::for_render_state(scene.is_rendering());
            let mesh = scene.evaluate_mesh(object, mode)?;
            Some(MeshSnapshot::transient(scene, mesh))
        } else {
            let mesh = scene.object_mesh(object)?;
            Some(MeshSnapshot::shared(scene, mesh))
        }
    }

    /// Ends a snapshot from `get_mesh`; only evaluated meshes are freed
    pub fn clear_mesh(&self, snapshot: MeshSnapshot<'_>) {
        snapshot.release();
    }

    /// Vertex positions, in world space when `use_world_space` is set
    pub fn get_vertices(&self, mesh: &MeshData, world_matrix: Mat4) -> Vec<Vec3> {
        if self.use_world_space {
            mesh.vertices.iter().map(|v| world_matrix.transform_point3(v.co)).collect()
        } else {
            mesh.vertices.iter().map(|v| v.co).collect()
        }
    }

    pub fn get_edges(&self, mesh: &MeshData) -> Vec<[u32; 2]> {
        mesh.edges.iter().map(|edge| edge.vertices).collect()
    }

    pub fn get_polygons(&self, mesh: &MeshData) -> Vec<Vec<u32>> {
        mesh.polygons.iter().map(|polygon| polygon.vertices.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{InMemoryScene, Modifier, ModifierKind, ObjectType};

    fn scene_with_cube() -> (InMemoryScene, ObjectId) {
        let mut scene = InMemoryScene::new();
        let cube = scene.add_mesh_object("Cube", MeshData::unit_cube());
        (scene, cube)
    }

    fn all_settings() -> Vec<ObjectMeshDataLogic> {
        let mut settings = Vec::new();
        for use_world_space in [false, true] {
            for use_modifiers in [false, true] {
                settings.push(ObjectMeshDataLogic { use_world_space, use_modifiers });
            }
        }
        settings
    }

    #[test]
    fn test_plan_follows_linked_outputs() {
        assert!(plan_extraction(&LinkedOutputs::default()).is_empty());

        let plan = plan_extraction(&LinkedOutputs::new([2, 0]));
        assert_eq!(plan.outputs(), &[MeshOutput::Vertices, MeshOutput::Polygons]);

        let plan = plan_extraction(&LinkedOutputs::new([1]));
        assert_eq!(plan.outputs(), &[MeshOutput::Edges]);

        // Ports beyond the three outputs are ignored
        assert!(plan_extraction(&LinkedOutputs::new([7])).is_empty());
    }

    #[test]
    fn test_plan_is_ordered_and_deduplicated() {
        let plan = ExtractionPlan::new([MeshOutput::Polygons, MeshOutput::Vertices, MeshOutput::Polygons]);
        assert_eq!(plan.outputs(), &[MeshOutput::Vertices, MeshOutput::Polygons]);
        assert_eq!(ExtractionPlan::all().outputs(), &MeshOutput::ALL);
    }

    #[test]
    fn test_non_mesh_objects_give_empty_outputs() {
        let mut scene = InMemoryScene::new();
        let curve = scene.add_object("Curve", ObjectType::Curve, Some(MeshData::unit_cube()));
        let empty = scene.add_object("Empty", ObjectType::Empty, None);

        for logic in all_settings() {
            for object in [None, Some(curve), Some(empty), Some(ObjectId(404))] {
                let outputs = logic.run(&ExtractionPlan::all(), object, &mut scene);
                assert!(outputs.is_empty(), "{:?} with {:?}", object, logic);
            }
        }
        assert!(scene.evaluations().is_empty());
    }

    #[test]
    fn test_deleted_object_gives_empty_outputs() {
        let (mut scene, cube) = scene_with_cube();
        let logic = ObjectMeshDataLogic { use_world_space: true, use_modifiers: true };
        assert!(!logic.run(&ExtractionPlan::all(), Some(cube), &mut scene).is_empty());

        assert!(scene.remove_object(cube).is_some());
        assert!(logic.run(&ExtractionPlan::all(), Some(cube), &mut scene).is_empty());
        assert_eq!(scene.evaluations().len(), 1);
        assert_eq!(scene.live_transient_meshes(), 0);
    }

    #[test]
    fn test_default_matches_node_defaults() {
        let logic = ObjectMeshDataLogic::default();
        assert!(logic.use_world_space);
        assert!(!logic.use_modifiers);
    }

    #[test]
    fn test_counts_match_mesh() {
        for logic in all_settings() {
            let (mut scene, cube) = scene_with_cube();
            let mut matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
            matrix *= Mat4::from_rotation_z(0.5);
            scene.set_world_matrix(cube, matrix);

            let outputs = logic.run(&ExtractionPlan::all(), Some(cube), &mut scene);
            assert_eq!(outputs.vertices.len(), 8);
            assert_eq!(outputs.edge_indices.len(), 12);
            assert_eq!(outputs.polygon_indices.len(), 6);
        }
    }

    #[test]
    fn test_native_order_preserved() {
        let (mut scene, cube) = scene_with_cube();
        let logic = ObjectMeshDataLogic { use_world_space: false, use_modifiers: false };

        let outputs = logic.run(&ExtractionPlan::all(), Some(cube), &mut scene);
        let cube_mesh = MeshData::unit_cube();
        assert_eq!(outputs.vertices, cube_mesh.vertices.iter().map(|v| v.co).collect::<Vec<_>>());
        assert_eq!(outputs.edge_indices[3], [3, 0]);
        assert_eq!(outputs.polygon_indices[0], vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_world_space_with_identity_matches_local() {
        let (mut scene, cube) = scene_with_cube();
        let world = ObjectMeshDataLogic { use_world_space: true, use_modifiers: false };
        let local = ObjectMeshDataLogic { use_world_space: false, use_modifiers: false };

        let plan = ExtractionPlan::new([MeshOutput::Vertices]);
        assert_eq!(world.run(&plan, Some(cube), &mut scene), local.run(&plan, Some(cube), &mut scene));
    }

    #[test]
    fn test_world_space_applies_object_matrix() {
        let (mut scene, cube) = scene_with_cube();
        scene.set_world_matrix(cube, Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        let plan = ExtractionPlan::new([MeshOutput::Vertices]);
        let world = ObjectMeshDataLogic { use_world_space: true, use_modifiers: false }.run(&plan, Some(cube), &mut scene);
        let local = ObjectMeshDataLogic { use_world_space: false, use_modifiers: false }.run(&plan, Some(cube), &mut scene);

        assert_eq!(local.vertices[0], Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(world.vertices[0], Vec3::new(9.0, -1.0, -1.0));
    }

    #[test]
    fn test_without_modifiers_nothing_is_released() {
        let (mut scene, cube) = scene_with_cube();
        let logic = ObjectMeshDataLogic { use_world_space: true, use_modifiers: false };

        logic.run(&ExtractionPlan::all(), Some(cube), &mut scene);

        assert!(scene.evaluations().is_empty());
        assert!(scene.released_meshes().is_empty());
    }

    #[test]
    fn test_modifiers_use_preview_then_release() {
        let (mut scene, cube) = scene_with_cube();
        scene.push_modifier(cube, Modifier::render_only(ModifierKind::Triangulate));
        let logic = ObjectMeshDataLogic { use_world_space: false, use_modifiers: true };

        let outputs = logic.run(&ExtractionPlan::all(), Some(cube), &mut scene);

        assert_eq!(outputs.polygon_indices.len(), 6);
        assert_eq!(scene.evaluations(), &[(cube, EvaluationMode::Preview)]);
        assert_eq!(scene.released_meshes().len(), 1);
        assert_eq!(scene.live_transient_meshes(), 0);
    }

    #[test]
    fn test_modifiers_use_render_quality_while_rendering() {
        let (mut scene, cube) = scene_with_cube();
        scene.push_modifier(cube, Modifier::render_only(ModifierKind::Triangulate));
        scene.set_rendering(true);
        let logic = ObjectMeshDataLogic { use_world_space: false, use_modifiers: true };

        let outputs = logic.run(&ExtractionPlan::new([MeshOutput::Polygons]), Some(cube), &mut scene);

        assert_eq!(outputs.polygon_indices.len(), 12);
        assert!(outputs.polygon_indices.iter().all(|p| p.len() == 3));
        assert_eq!(scene.evaluations(), &[(cube, EvaluationMode::Render)]);
        assert_eq!(scene.live_transient_meshes(), 0);
    }

    #[test]
    fn test_partial_plan_still_releases_snapshot() {
        let (mut scene, cube) = scene_with_cube();
        let logic = ObjectMeshDataLogic { use_world_space: true, use_modifiers: true };

        let outputs = logic.run(&ExtractionPlan::new([MeshOutput::Edges]), Some(cube), &mut scene);

        assert!(outputs.vertices.is_empty());
        assert_eq!(outputs.edge_indices.len(), 12);
        assert!(outputs.polygon_indices.is_empty());
        assert_eq!(scene.evaluations().len(), 1);
        assert_eq!(scene.released_meshes().len(), 1);
        assert_eq!(scene.live_transient_meshes(), 0);
    }

    #[test]
    fn test_empty_plan_never_touches_scene() {
        let (mut scene, cube) = scene_with_cube();
        let logic = ObjectMeshDataLogic { use_world_space: true, use_modifiers: true };

        let outputs = logic.run(&ExtractionPlan::default(), Some(cube), &mut scene);

        assert!(outputs.is_empty());
        assert!(scene.evaluations().is_empty());
    }

    #[test]
    fn test_out_of_range_indices_pass_through() {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Vec3::ZERO);
        mesh.add_edge(0, 99);
        mesh.add_polygon(&[0, 50, 99]);
        let mut scene = InMemoryScene::new();
        let object = scene.add_mesh_object("Broken", mesh);

        let outputs = ObjectMeshDataLogic::default().run(&ExtractionPlan::all(), Some(object), &mut scene);
        assert_eq!(outputs.edge_indices, vec![[0, 99]]);
        assert_eq!(outputs.polygon_indices, vec![vec![0, 50, 99]]);
    }

    #[test]
    fn test_into_node_data_port_order() {
        let data = MeshDataOutputs::default().into_node_data();
        assert_eq!(data.len(), 3);
        assert!(matches!(data[MeshOutput::Vertices.port()], NodeData::VectorList(_)));
        assert!(matches!(data[MeshOutput::Edges.port()], NodeData::EdgeIndicesList(_)));
        assert!(matches!(data[MeshOutput::Polygons.port()], NodeData::PolygonIndicesList(_)));
    }
}
