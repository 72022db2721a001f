// Lineage graph: node registry, cluster index and edge list

pub mod node;

pub use node::*;

use crate::error::Result;
use crate::manifest::Manifest;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A directed dependency: `child` depends on `parent`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

impl Edge {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// The lineage graph built from one manifest snapshot.
///
/// Read-only once built. Edges may name ids absent from the registry; they
/// are kept as-is.
#[derive(Debug, Default, Serialize)]
pub struct Graph {
    /// Cluster key -> member ids, both in first-seen order
    clusters: IndexMap<String, Vec<String>>,
    /// Node id -> node
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build the graph from a manifest.
    ///
    /// Primary entities are scanned before sources, each in document order.
    /// A later record with an already-seen id replaces the earlier node.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let mut graph = Graph::default();
        let mut skipped = 0usize;

        for (key, entity) in manifest.entities() {
            match classify(entity)? {
                Some(node) => graph.insert(node),
                None => {
                    debug!(key, "skipping entity outside the lineage graph");
                    skipped += 1;
                }
            }
        }

        let stats = graph.stats();
        info!(
            nodes = stats.nodes,
            clusters = stats.clusters,
            edges = stats.edges,
            dangling = stats.dangling_edges,
            skipped,
            "lineage graph built"
        );
        Ok(graph)
    }

    fn insert(&mut self, node: Node) {
        for parent in node.parent_ids() {
            self.edges.push(Edge::new(parent, node.id.clone()));
        }

        let cluster = node.cluster().to_string();
        let id = node.id.clone();

        if let Some(previous) = self.nodes.insert(id.clone(), node) {
            warn!(id = %id, "duplicate node id, keeping the later record");
            if previous.cluster() == cluster {
                return;
            }
            self.remove_from_cluster(previous.cluster(), &id);
        }

        self.clusters.entry(cluster).or_default().push(id);
    }

    fn remove_from_cluster(&mut self, cluster: &str, id: &str) {
        if let Some(members) = self.clusters.get_mut(cluster) {
            members.retain(|m| m != id);
            if members.is_empty() {
                self.clusters.shift_remove(cluster);
            }
        }
    }

    /// Clusters with their member ids, in first-seen order
    pub fn clusters(&self) -> &IndexMap<String, Vec<String>> {
        &self.clusters
    }

    /// Node registry keyed by normalized id
    pub fn nodes(&self) -> &IndexMap<String, Node> {
        &self.nodes
    }

    /// Get a node by normalized id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All edges in discovery order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Cluster key of a node
    pub fn cluster_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|n| n.cluster())
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            clusters: self.clusters.len(),
            edges: self.edges.len(),
            dangling_edges: self
                .edges
                .iter()
                .filter(|e| !self.nodes.contains_key(&e.parent))
                .count(),
        }
    }
}

/// Statistics about the lineage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub clusters: usize,
    pub edges: usize,
    /// Edges whose parent is not a node in the graph
    pub dangling_edges: usize,
}
