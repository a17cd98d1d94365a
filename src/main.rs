//! Nodle mesh demo
//!
//! Builds a small scene and a graph reading a cube's mesh data, then runs it
//! in a few configurations. Set `RUST_LOG=debug` for the full trace.

use glam::Vec3;
use log::{debug, info};

use nodle_mesh::math::compose_matrix;
use nodle_mesh::nodes::data::ObjectInputNode;
use nodle_mesh::nodes::mesh::object_mesh_data::parameters::{USE_MODIFIERS, USE_WORLD_SPACE};
use nodle_mesh::nodes::{
    Connection, NodeData, NodeGraph, NodeGraphEngine, NodeId, NodeRegistry, ParameterChange, PortDefinition,
};
use nodle_mesh::scene::{InMemoryScene, MeshData, Modifier, ModifierKind};

fn add_node(graph: &mut NodeGraph, registry: &NodeRegistry, node_type: &str) -> Result<NodeId, String> {
    let node = registry
        .create_node(node_type)
        .ok_or_else(|| format!("Unknown node type: {}", node_type))?;
    Ok(graph.add_node(node))
}

fn log_registry(registry: &NodeRegistry) {
    let mut categories: Vec<_> = registry.categories();
    categories.sort_by_key(|category| category.display_string());
    for category in categories {
        for node_type in registry.nodes_in_category(category) {
            let (Some(label), Some(meta)) = (registry.menu_label(node_type), registry.get_metadata(node_type)) else {
                continue;
            };
            let ports = |ports: &[PortDefinition]| {
                ports.iter().map(|port| port.data_type.name()).collect::<Vec<_>>().join(", ")
            };
            debug!(
                "{} > {} ({}) -> ({}) [{}]",
                category.display_string(),
                label,
                ports(&meta.inputs),
                ports(&meta.outputs),
                meta.tags.join(", ")
            );
        }
    }
    info!("Mesh nodes: {}", registry.search("mesh").join(", "));
}

fn log_outputs(engine: &mut NodeGraphEngine, mesh_node: NodeId, label: &str) {
    let outputs: Vec<String> = (0..3)
        .map(|port| {
            engine
                .get_cached_output(mesh_node, port)
                .map(NodeData::summary)
                .unwrap_or_else(|| "-".to_string())
        })
        .collect();
    info!("{}: {}", label, outputs.join(", "));
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = InMemoryScene::new();
    let cube = scene.add_mesh_object("Cube", MeshData::unit_cube());
    scene.set_world_matrix(
        cube,
        compose_matrix(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_4), Vec3::splat(0.5)),
    );
    scene.push_modifier(cube, Modifier::new(ModifierKind::Displace(Vec3::new(0.0, 0.0, 1.0))));
    scene.push_modifier(cube, Modifier::render_only(ModifierKind::Triangulate));

    let registry = NodeRegistry::with_builtin_nodes();
    log_registry(&registry);
    let mut graph = NodeGraph::new();
    let mut engine = NodeGraphEngine::new();

    let object_node = add_node(&mut graph, &registry, "Data_Object")?;
    let mesh_node = add_node(&mut graph, &registry, "Mesh_ObjectMeshData")?;
    engine.add_connection(&mut graph, Connection::new(object_node, 0, mesh_node, 0))?;
    for port in 0..3 {
        let sink = add_node(&mut graph, &registry, "Output_Debug")?;
        engine.add_connection(&mut graph, Connection::new(mesh_node, port, sink, 0))?;
    }

    engine.apply_parameter_changes(&mut graph, object_node, vec![ObjectInputNode::select(Some(cube))])?;
    engine.execute_dirty_nodes(&graph, &mut scene)?;
    log_outputs(&mut engine, mesh_node, "world space, no modifiers");

    let changes = vec![
        ParameterChange::new(USE_MODIFIERS, NodeData::Boolean(true)),
        ParameterChange::new(USE_WORLD_SPACE, NodeData::Boolean(false)),
    ];
    engine.apply_parameter_changes(&mut graph, mesh_node, changes)?;
    engine.execute_dirty_nodes(&graph, &mut scene)?;
    log_outputs(&mut engine, mesh_node, "local space, preview modifiers");

    scene.set_rendering(true);
    engine.mark_all_dirty(&graph);
    engine.execute_dirty_nodes(&graph, &mut scene)?;
    log_outputs(&mut engine, mesh_node, "local space, render modifiers");

    let stats = engine.get_stats();
    info!(
        "{} nodes ({} clean, {} errors), {} cached outputs, {} transient meshes left",
        stats.total_nodes,
        stats.clean_nodes,
        stats.error_nodes,
        stats.cached_outputs,
        scene.live_transient_meshes()
    );
    debug!("Graph:\n{}", graph.to_json()?);

    Ok(())
}
