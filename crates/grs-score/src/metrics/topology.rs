//! Neighbourhood view of a graph shared by the curvature providers.
//!
//! [`Topology`] flattens a [`Graph`] into sorted adjacency lists over node
//! positions plus the list of non-loop edges. Curvature code works on this
//! view only, so providers stay independent of the node label type.

use grs_core::{Graph, NodeLabel};

/// Sorted neighbour lists and non-loop edges of a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    neighbors: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl Topology {
    /// Build the view from a graph. Self-loops are dropped.
    #[must_use]
    pub fn from_graph<N: NodeLabel>(graph: &Graph<N>) -> Self {
        let edges = graph
            .edges()
            .filter(|edge| !edge.is_loop())
            .map(|edge| (edge.source, edge.target))
            .collect();
        Self {
            neighbors: graph.adjacency_lists(),
            edges,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of non-loop edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Sorted neighbours of `node`, self excluded.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors[node].len()
    }

    #[must_use]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&b).is_ok()
    }

    /// Whether `a` and `b` share at least one neighbour.
    #[must_use]
    pub fn has_common_neighbor(&self, a: usize, b: usize) -> bool {
        let (mut left, mut right) = (self.neighbors[a].iter(), self.neighbors[b].iter());
        let (mut x, mut y) = (left.next(), right.next());
        while let (Some(&u), Some(&v)) = (x, y) {
            match u.cmp(&v) {
                std::cmp::Ordering::Less => x = left.next(),
                std::cmp::Ordering::Greater => y = right.next(),
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// Local clustering coefficient of `node`: closed neighbour pairs over
    /// all neighbour pairs. Nodes with fewer than two neighbours score `0`.
    #[must_use]
    pub fn local_clustering(&self, node: usize) -> f64 {
        let neighbors = &self.neighbors[node];
        let k = neighbors.len();
        if k < 2 {
            return 0.0;
        }

        let mut closed = 0usize;
        for (i, &u) in neighbors.iter().enumerate() {
            for &w in &neighbors[i + 1..] {
                if self.are_adjacent(u, w) {
                    closed += 1;
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let ratio = (2 * closed) as f64 / (k * (k - 1)) as f64;
        ratio
    }

    /// Mean local clustering coefficient over all nodes; `0` when empty.
    #[must_use]
    pub fn average_clustering(&self) -> f64 {
        if self.neighbors.is_empty() {
            return 0.0;
        }
        let total: f64 = (0..self.node_count())
            .map(|node| self.local_clustering(node))
            .sum();

        #[allow(clippy::cast_precision_loss)]
        let n = self.node_count() as f64;
        total / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grs_core::generate;

    #[test]
    fn triangle_clustering_is_one() {
        let topology = Topology::from_graph(&generate::complete(3));
        assert!((topology.average_clustering() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn star_clustering_is_zero() {
        let topology = Topology::from_graph(&generate::star(5));
        assert_eq!(topology.average_clustering(), 0.0);
    }

    #[test]
    fn paw_graph_clustering() {
        // Triangle 0-1-2 with pendant 3 on node 0.
        // c(0) = 1/3, c(1) = c(2) = 1, c(3) = 0 → mean 7/12.
        let graph = Graph::from_edges([(0, 1), (1, 2), (2, 0), (0, 3)]);
        let topology = Topology::from_graph(&graph);
        assert!((topology.local_clustering(0) - 1.0 / 3.0).abs() < 1e-12);
        assert!((topology.average_clustering() - 7.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn self_loops_do_not_close_triangles() {
        let graph = Graph::from_edges([(0, 0), (0, 1), (0, 2)]);
        let topology = Topology::from_graph(&graph);
        assert_eq!(topology.edge_count(), 2);
        assert_eq!(topology.local_clustering(0), 0.0);
    }

    #[test]
    fn common_neighbor_detection() {
        let topology = Topology::from_graph(&generate::path(4));
        assert!(topology.has_common_neighbor(0, 2));
        assert!(!topology.has_common_neighbor(0, 3));
        assert!(topology.are_adjacent(1, 2));
        assert!(!topology.are_adjacent(0, 2));
    }
}
