//! Undirected simple graph used by the scoring engine.
//!
//! # Overview
//!
//! [`Graph`] wraps a petgraph [`UnGraph`] together with a label → index map.
//! Node labels are any hashable, printable type (`i64` for numeric edge
//! lists, `String` for token labels).
//!
//! ## Node Ordering
//!
//! Node insertion order is the canonical node ordering: adjacency matrix rows,
//! degree rankings and neighbour walks all follow it. Copies produced by
//! [`Graph::without_edges`] keep the same node order, so a perturbed graph is
//! directly comparable with its source.
//!
//! ## Simple Graph Invariants
//!
//! - Adding an edge that already exists (in either direction) is a no-op.
//! - Self-loops are stored as given; downstream metrics decide how to treat
//!   them (they count twice toward degree).
//! - Every edge endpoint is a node: [`Graph::add_edge`] inserts missing
//!   endpoints.
//!
//! ## Content Hash
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the sorted edge set. It changes
//! only when edges change and is used to label results.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

/// Bound shared by every node label type.
pub trait NodeLabel: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> NodeLabel for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected simple graph over node labels `N`.
#[derive(Debug, Clone)]
pub struct Graph<N = i64> {
    graph: UnGraph<N, ()>,
    node_map: HashMap<N, NodeIndex>,
}

/// One edge of a [`Graph`], with endpoints as positions in node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    /// Stable index of the edge within its graph.
    pub id: EdgeIndex,
    /// Position of the first endpoint in node insertion order.
    pub source: usize,
    /// Position of the second endpoint in node insertion order.
    pub target: usize,
}

impl GraphEdge {
    /// Whether both endpoints are the same node.
    #[must_use]
    pub const fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Size and fingerprint of a graph, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub self_loops: usize,
    pub content_hash: String,
}

impl<N: NodeLabel> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeLabel> Graph<N> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            node_map: HashMap::new(),
        }
    }

    /// Build a graph from an edge iterator, inserting endpoints on first sight.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Insert a node if it is not already present and return its index.
    pub fn add_node(&mut self, label: N) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&label) {
            return idx;
        }
        let idx = self.graph.add_node(label.clone());
        self.node_map.insert(label, idx);
        idx
    }

    /// Insert an undirected edge, adding missing endpoints.
    ///
    /// Returns `false` when the edge already existed.
    pub fn add_edge(&mut self, a: N, b: N) -> bool {
        let ia = self.add_node(a);
        let ib = self.add_node(b);

        // Undirected `find_edge` checks both orientations.
        if self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        self.graph.add_edge(ia, ib, ());
        true
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (self-loops included).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a label.
    #[must_use]
    pub fn node_index(&self, label: &N) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    /// Return the label at a position in node order.
    #[must_use]
    pub fn label(&self, position: usize) -> Option<&N> {
        self.graph.node_weight(NodeIndex::new(position))
    }

    /// Node labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Whether an edge between `a` and `b` exists (in either orientation).
    #[must_use]
    pub fn contains_edge(&self, a: &N, b: &N) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    /// Edges in edge-index order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.graph.edge_references().map(|edge| GraphEdge {
            id: edge.id(),
            source: edge.source().index(),
            target: edge.target().index(),
        })
    }

    /// Edges as label pairs, in edge-index order.
    #[must_use]
    pub fn edge_labels(&self) -> Vec<(N, N)> {
        self.edges().map(|edge| self.endpoint_labels(edge)).collect()
    }

    /// Labels of an edge's endpoints.
    #[must_use]
    pub fn endpoint_labels(&self, edge: GraphEdge) -> (N, N) {
        (
            self.graph[NodeIndex::new(edge.source)].clone(),
            self.graph[NodeIndex::new(edge.target)].clone(),
        )
    }

    /// Degree of every node in node order. A self-loop counts twice.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count()];
        for edge in self.edges() {
            degrees[edge.source] += 1;
            degrees[edge.target] += 1;
        }
        degrees
    }

    /// Sorted, deduplicated neighbour positions for every node, self excluded.
    #[must_use]
    pub fn adjacency_lists(&self) -> Vec<Vec<usize>> {
        let mut lists = vec![Vec::new(); self.node_count()];
        for edge in self.edges().filter(|edge| !edge.is_loop()) {
            lists[edge.source].push(edge.target);
            lists[edge.target].push(edge.source);
        }
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }
        lists
    }

    /// Structural copy with the given edges dropped.
    ///
    /// Every node is kept, in the same order, so positions stay valid across
    /// the source and the copy. `self` is left untouched.
    #[must_use]
    pub fn without_edges(&self, removed: &HashSet<EdgeIndex>) -> Self {
        let graph = self.graph.filter_map(
            |_, label| Some(label.clone()),
            |id, _| (!removed.contains(&id)).then_some(()),
        );
        Self {
            graph,
            node_map: self.node_map.clone(),
        }
    }

    /// BLAKE3 hash of the sorted edge set, formatted as `blake3:<hex>`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut pairs: Vec<(String, String)> = self
            .edges()
            .map(|edge| {
                let (a, b) = self.endpoint_labels(edge);
                let (a, b) = (a.to_string(), b.to_string());
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        pairs.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for (a, b) in &pairs {
            hasher.update(a.as_bytes());
            hasher.update(b"\t");
            hasher.update(b.as_bytes());
            hasher.update(b"\n");
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }

    /// Size and fingerprint summary.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
            self_loops: self.edges().filter(GraphEdge::is_loop).count(),
            content_hash: self.content_hash(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
