//! Output cache for node execution
//!
//! Stores the last value produced on every (node, output port) pair so that
//! downstream nodes can read their inputs without re-running upstream work.

use std::collections::HashMap;

use crate::nodes::interface::NodeData;
use crate::nodes::{NodeId, PortId};

/// Key of one cached output
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub struct CacheKey {
    pub node_id: NodeId,
    pub port_index: PortId,
}

impl CacheKey {
    pub fn new(node_id: NodeId, port_index: PortId) -> Self {
        Self { node_id, port_index }
    }
}

/// Pattern for matching cache keys during invalidation
#[derive(Debug, Clone)]
pub enum CacheKeyPattern {
    /// Match all outputs for a specific node
    Node(NodeId),
    /// Match a specific cache key exactly
    Exact(CacheKey),
}

impl CacheKeyPattern {
    pub fn matches(&self, key: &CacheKey) -> bool {
        match self {
            CacheKeyPattern::Node(node_id) => key.node_id == *node_id,
            CacheKeyPattern::Exact(exact_key) => key == exact_key,
        }
    }
}

/// Statistics about cache usage
#[derive(Debug, Default, Clone)]
pub struct CacheStatistics {
    pub total_entries: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_invalidations: usize,
}

impl CacheStatistics {
    pub fn hit_ratio(&self) -> f32 {
        let total_accesses = self.cache_hits + self.cache_misses;
        if total_accesses == 0 {
            0.0
        } else {
            self.cache_hits as f32 / total_accesses as f32
        }
    }
}

/// Cache for all node execution results
#[derive(Debug, Default)]
pub struct NodeOutputCache {
    cache: HashMap<CacheKey, NodeData>,
    stats: CacheStatistics,
}

impl NodeOutputCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: CacheKey, data: NodeData) {
        self.cache.insert(key, data);
        self.stats.total_entries = self.cache.len();
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<&NodeData> {
        let entry = self.cache.get(key);
        if entry.is_some() {
            self.stats.cache_hits += 1;
        } else {
            self.stats.cache_misses += 1;
        }
        entry
    }

    /// Read without touching statistics
    pub fn peek(&self, key: &CacheKey) -> Option<&NodeData> {
        self.cache.get(key)
    }

    /// Drops every entry matching `pattern`, returning how many were removed
    pub fn invalidate(&mut self, pattern: &CacheKeyPattern) -> usize {
        let before = self.cache.len();
        self.cache.retain(|key, _| !pattern.matches(key));
        let removed = before - self.cache.len();
        self.stats.cache_invalidations += removed;
        self.stats.total_entries = self.cache.len();
        removed
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn get_statistics(&self) -> &CacheStatistics {
        &self.stats
    }
}
