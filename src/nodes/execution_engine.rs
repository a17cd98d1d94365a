//! Node graph execution engine
//!
//! This module provides the dataflow execution system that handles:
//! - Dirty state propagation when parameters or connections change
//! - Execution ordering via topological sort
//! - Compiling per-node extraction plans from output connectivity
//! - Node evaluation against a scene host and output caching

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, info, warn};

use crate::nodes::cache::{CacheKey, CacheKeyPattern, NodeOutputCache};
use crate::nodes::data::ObjectInputNode;
use crate::nodes::interface::{NodeData, ParameterChange};
use crate::nodes::matrix::{ComposeMatrixNode, ExtractRotationNode};
use crate::nodes::mesh::object_mesh_data::{plan_extraction, ExtractionPlan, ObjectMeshDataNode};
use crate::nodes::output::DebugNode;
use crate::nodes::{Connection, LinkedOutputs, Node, NodeGraph, NodeId};
use crate::scene::SceneHost;

/// Represents the execution state of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Clean,      // Node is up-to-date
    Dirty,      // Node needs re-evaluation
    Computing,  // Node is currently being processed
    Error,      // Node failed to execute
}

/// Extraction plan together with the connectivity it was compiled from
#[derive(Debug, Default)]
struct CompiledPlan {
    linked: LinkedOutputs,
    plan: ExtractionPlan,
}

/// Execution engine for node graphs
pub struct NodeGraphEngine {
    /// Current execution state for each node
    node_states: HashMap<NodeId, NodeState>,
    /// Cached node outputs
    pub output_cache: NodeOutputCache,
    /// Set of nodes that need re-evaluation
    dirty_nodes: HashSet<NodeId>,
    /// Execution order cache (invalidated when graph changes)
    execution_order_cache: Option<Vec<NodeId>>,
    /// Extraction plans compiled from output connectivity
    compiled_plans: HashMap<NodeId, CompiledPlan>,
}

impl NodeGraphEngine {
    /// Create a new execution engine
    pub fn new() -> Self {
        Self {
            node_states: HashMap::new(),
            output_cache: NodeOutputCache::new(),
            dirty_nodes: HashSet::new(),
            execution_order_cache: None,
            compiled_plans: HashMap::new(),
        }
    }

    /// Mark a node as dirty (needs re-evaluation)
    pub fn mark_dirty(&mut self, node_id: NodeId, graph: &NodeGraph) {
        if self.node_states.get(&node_id) == Some(&NodeState::Dirty) {
            return; // Already dirty
        }

        self.node_states.insert(node_id, NodeState::Dirty);
        self.dirty_nodes.insert(node_id);

        let invalidated_count = self.output_cache.invalidate(&CacheKeyPattern::Node(node_id));
        if invalidated_count > 0 {
            debug!("Invalidated {} cache entries for node {}", invalidated_count, node_id);
        }

        self.propagate_dirty_downstream(node_id, graph);
    }

    /// Propagate dirty state to all downstream nodes
    fn propagate_dirty_downstream(&mut self, node_id: NodeId, graph: &NodeGraph) {
        for downstream_id in self.find_downstream_nodes(node_id, graph) {
            if self.node_states.get(&downstream_id) != Some(&NodeState::Dirty) {
                self.node_states.insert(downstream_id, NodeState::Dirty);
                self.dirty_nodes.insert(downstream_id);
                self.output_cache.invalidate(&CacheKeyPattern::Node(downstream_id));
                self.propagate_dirty_downstream(downstream_id, graph);
            }
        }
    }

    /// Find all nodes directly downstream from the given node
    fn find_downstream_nodes(&self, node_id: NodeId, graph: &NodeGraph) -> Vec<NodeId> {
        graph
            .connections
            .iter()
            .filter(|connection| connection.from_node == node_id)
            .map(|connection| connection.to_node)
            .collect()
    }

    /// Get the execution order using topological sort
    pub fn get_execution_order(&mut self, graph: &NodeGraph) -> Result<Vec<NodeId>, String> {
        if let Some(ref order) = self.execution_order_cache {
            return Ok(order.clone());
        }

        let mut in_degree: HashMap<NodeId, usize> = graph.nodes.keys().map(|&id| (id, 0)).collect();
        let mut adj_list: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        for connection in &graph.connections {
            if !in_degree.contains_key(&connection.from_node) {
                return Err(format!("Connection from unknown node {}", connection.from_node));
            }
            let degree = in_degree
                .get_mut(&connection.to_node)
                .ok_or_else(|| format!("Connection to unknown node {}", connection.to_node))?;
            *degree += 1;
            adj_list.entry(connection.from_node).or_default().push(connection.to_node);
        }

        // Kahn's algorithm, seeded in id order so the result is stable
        let mut roots: Vec<NodeId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&id, _)| id)
            .collect();
        roots.sort_unstable();
        let mut queue: VecDeque<NodeId> = roots.into();
        let mut result = Vec::with_capacity(graph.nodes.len());

        while let Some(node_id) = queue.pop_front() {
            result.push(node_id);

            if let Some(neighbors) = adj_list.get(&node_id) {
                for neighbor in neighbors {
                    if let Some(degree) = in_degree.get_mut(neighbor) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(*neighbor);
                        }
                    }
                }
            }
        }

        if result.len() != graph.nodes.len() {
            return Err("Cycle detected in node graph".to_string());
        }

        self.execution_order_cache = Some(result.clone());
        Ok(result)
    }

    /// Extraction plan for a mesh node.
    ///
    /// Compiled on first use and again whenever the node's connected outputs
    /// differ from the ones the cached plan was built for.
    pub fn compiled_plan(&mut self, node_id: NodeId, graph: &NodeGraph) -> &ExtractionPlan {
        let linked = graph.linked_outputs(node_id);
        let compiled = self.compiled_plans.entry(node_id).or_default();
        if compiled.linked != linked {
            let plan = plan_extraction(&linked);
            debug!("Compiled extraction plan for node {}: {:?}", node_id, plan.outputs());
            *compiled = CompiledPlan { linked, plan };
        }
        &compiled.plan
    }

    /// Execute all dirty nodes in dependency order
    pub fn execute_dirty_nodes(&mut self, graph: &NodeGraph, scene: &mut dyn SceneHost) -> Result<(), String> {
        for &node_id in graph.nodes.keys() {
            if !self.node_states.contains_key(&node_id) {
                self.mark_dirty(node_id, graph);
            }
        }

        if self.dirty_nodes.is_empty() {
            return Ok(());
        }

        let execution_order = self.get_execution_order(graph)?;
        for &node_id in &execution_order {
            if self.dirty_nodes.contains(&node_id) {
                self.execute_single_node(node_id, graph, scene)?;
            }
        }

        self.dirty_nodes.clear();
        Ok(())
    }

    /// Execute a single node
    fn execute_single_node(&mut self, node_id: NodeId, graph: &NodeGraph, scene: &mut dyn SceneHost) -> Result<(), String> {
        let node = graph.nodes.get(&node_id)
            .ok_or_else(|| format!("Node {} not found", node_id))?;

        self.node_states.insert(node_id, NodeState::Computing);

        let inputs = self.collect_node_inputs(node, graph);
        let outputs = match self.dispatch_node_execution(node, inputs, graph, scene) {
            Ok(outputs) => outputs,
            Err(e) => {
                self.node_states.insert(node_id, NodeState::Error);
                return Err(e);
            }
        };

        for (port_idx, output) in outputs.into_iter().enumerate() {
            self.output_cache.insert(CacheKey::new(node_id, port_idx), output);
        }

        self.node_states.insert(node_id, NodeState::Clean);
        self.dirty_nodes.remove(&node_id);
        Ok(())
    }

    /// Collect inputs for a node from connected upstream nodes
    fn collect_node_inputs(&mut self, node: &Node, graph: &NodeGraph) -> Vec<NodeData> {
        let mut inputs = vec![NodeData::None; node.inputs.len()];

        for connection in graph.connections.iter().filter(|c| c.to_node == node.id) {
            let cache_key = CacheKey::new(connection.from_node, connection.from_port);
            if let Some(cached_data) = self.output_cache.get(&cache_key) {
                if connection.to_port < inputs.len() {
                    inputs[connection.to_port] = cached_data.clone();
                }
            }
        }
        inputs
    }

    /// Dispatch node execution based on node type_id
    fn dispatch_node_execution(
        &mut self,
        node: &Node,
        inputs: Vec<NodeData>,
        graph: &NodeGraph,
        scene: &mut dyn SceneHost,
    ) -> Result<Vec<NodeData>, String> {
        match node.type_id.as_str() {
            "Data_Object" => Ok(ObjectInputNode::process_node(node)),
            "Mesh_ObjectMeshData" => {
                let plan = self.compiled_plan(node.id, graph).clone();
                if plan.is_empty() {
                    debug!("Node {} has no connected outputs, skipping extraction", node.id);
                }
                Ok(ObjectMeshDataNode::process_node(node, &plan, &inputs, scene))
            }
            "Matrix_Compose" => Ok(ComposeMatrixNode::process_node(&inputs)),
            "Matrix_ExtractRotation" => Ok(ExtractRotationNode::process_node(&inputs)),
            "Output_Debug" => Ok(DebugNode::process_node(node, inputs)),
            other => Err(format!("Unsupported node type: {}", other)),
        }
    }

    /// Get the current state of a node
    pub fn get_node_state(&self, node_id: NodeId) -> NodeState {
        self.node_states.get(&node_id).cloned().unwrap_or(NodeState::Clean)
    }

    /// Get cached output for a node's port
    pub fn get_cached_output(&mut self, node_id: NodeId, port_idx: usize) -> Option<&NodeData> {
        self.output_cache.get(&CacheKey::new(node_id, port_idx))
    }

    /// Whether any node is waiting for re-evaluation
    pub fn is_dirty(&self) -> bool {
        !self.dirty_nodes.is_empty()
    }

    /// Mark all nodes as dirty
    pub fn mark_all_dirty(&mut self, graph: &NodeGraph) {
        for &node_id in graph.nodes.keys() {
            self.mark_dirty(node_id, graph);
        }
    }

    /// Adds a connection to the graph and updates engine state, including
    /// for a link the new one replaced
    pub fn add_connection(&mut self, graph: &mut NodeGraph, connection: Connection) -> Result<(), String> {
        if let Some(replaced) = graph.add_connection(connection.clone())? {
            debug!("Connection {:?} replaced by {:?}", replaced, connection);
            self.on_connection_removed(&replaced, graph);
        }
        self.on_connection_added(&connection, graph);
        Ok(())
    }

    /// Removes a connection by index and updates engine state
    pub fn remove_connection(&mut self, graph: &mut NodeGraph, index: usize) -> Option<Connection> {
        let removed = graph.remove_connection(index)?;
        self.on_connection_removed(&removed, graph);
        Some(removed)
    }

    /// Handle a new connection.
    ///
    /// The source node's connected outputs changed, so its plan is recompiled
    /// and it runs again along with everything downstream.
    pub fn on_connection_added(&mut self, connection: &Connection, graph: &NodeGraph) {
        self.execution_order_cache = None;
        self.compiled_plans.remove(&connection.from_node);
        self.node_states.remove(&connection.from_node);
        self.mark_dirty(connection.from_node, graph);
    }

    /// Handle a removed connection
    pub fn on_connection_removed(&mut self, connection: &Connection, graph: &NodeGraph) {
        self.execution_order_cache = None;
        self.compiled_plans.remove(&connection.from_node);
        self.node_states.remove(&connection.from_node);
        self.mark_dirty(connection.from_node, graph);

        // The target lost an input
        self.node_states.remove(&connection.to_node);
        self.mark_dirty(connection.to_node, graph);
    }

    /// Forget everything about a removed node
    pub fn on_node_removed(&mut self, node_id: NodeId) {
        self.node_states.remove(&node_id);
        self.dirty_nodes.remove(&node_id);
        self.compiled_plans.remove(&node_id);
        self.output_cache.invalidate(&CacheKeyPattern::Node(node_id));
        self.execution_order_cache = None;
    }

    /// Handle a node parameter change
    pub fn on_node_parameter_changed(&mut self, node_id: NodeId, graph: &NodeGraph) {
        self.node_states.remove(&node_id);
        self.mark_dirty(node_id, graph);
    }

    /// Applies parameter changes to a node and notifies the graph.
    ///
    /// Returns how many parameters actually changed; the node is only marked
    /// dirty when at least one did.
    pub fn apply_parameter_changes(
        &mut self,
        graph: &mut NodeGraph,
        node_id: NodeId,
        changes: Vec<ParameterChange>,
    ) -> Result<usize, String> {
        let node = graph.nodes.get_mut(&node_id)
            .ok_or_else(|| format!("Node {} not found", node_id))?;

        let title = node.title.clone();
        let changed = changes
            .into_iter()
            .filter(|change| node.apply_parameter_change(change.clone()))
            .count();

        if changed > 0 {
            info!("Applied {} parameter changes for {} node {}", changed, title, node_id);
            self.on_node_parameter_changed(node_id, graph);
        }
        Ok(changed)
    }

    /// Get execution statistics
    pub fn get_stats(&self) -> ExecutionStats {
        let mut stats = ExecutionStats {
            total_nodes: self.node_states.len(),
            cached_outputs: self.output_cache.get_statistics().total_entries,
            ..ExecutionStats::default()
        };

        for state in self.node_states.values() {
            match state {
                NodeState::Clean => stats.clean_nodes += 1,
                NodeState::Dirty => stats.dirty_nodes += 1,
                NodeState::Computing => stats.computing_nodes += 1,
                NodeState::Error => stats.error_nodes += 1,
            }
        }

        if stats.error_nodes > 0 {
            warn!("{} nodes in error state", stats.error_nodes);
        }
        stats
    }
}

/// Statistics about the execution engine state
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    pub total_nodes: usize,
    pub clean_nodes: usize,
    pub dirty_nodes: usize,
    pub computing_nodes: usize,
    pub error_nodes: usize,
    pub cached_outputs: usize,
}

impl Default for NodeGraphEngine {
    fn default() -> Self {
        Self::new()
    }
}
