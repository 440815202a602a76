//! Ollivier–Ricci curvature of graph edges.
//!
//! # Overview
//!
//! For an edge `(x, y)` each endpoint gets a lazy neighbour distribution:
//! `m_x` keeps [`IDLENESS`] on `x` and spreads the rest uniformly over the
//! neighbours of `x`. The curvature of the edge is
//!
//! ```text
//! κ(x, y) = 1 − W₁(m_x, m_y) / d(x, y)
//! ```
//!
//! with `d(x, y) = 1` for an edge. `W₁` is estimated with the entropic
//! solver in [`super::sinkhorn`].
//!
//! ## Ground Distance
//!
//! Both supports lie within one hop of the adjacent pair `x, y`, so the hop
//! distance between support points is at most 3 (`u → x → y → v`). It is 0
//! for the same node, 1 for neighbours, 2 when the nodes share a neighbour
//! and 3 otherwise; no BFS is needed.
//!
//! Positive curvature marks edges inside dense, clustered regions; negative
//! curvature marks bridges between otherwise separate regions.

use nalgebra::DMatrix;
use tracing::debug;

use super::sinkhorn::sinkhorn;
use super::{CurvatureProvider, CurvatureSource, IDLENESS, SinkhornConfig};
use crate::error::{NumericStage, ScoreError};
use crate::metrics::Topology;

/// Exact Ollivier–Ricci curvature provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OllivierRicci {
    alpha: f64,
    sinkhorn: SinkhornConfig,
}

impl Default for OllivierRicci {
    fn default() -> Self {
        Self::new(SinkhornConfig::default())
    }
}

impl OllivierRicci {
    #[must_use]
    pub const fn new(sinkhorn: SinkhornConfig) -> Self {
        Self {
            alpha: IDLENESS,
            sinkhorn,
        }
    }

    /// Curvature of the edge between node positions `x` and `y`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::NumericFailure`] with
    /// [`NumericStage::Transport`] when the solver exhausts its iteration
    /// budget before meeting the marginal tolerance.
    pub fn edge_curvature(
        &self,
        topology: &Topology,
        x: usize,
        y: usize,
    ) -> Result<f64, ScoreError> {
        let (support_x, mass_x) = self.neighbor_measure(topology, x);
        let (support_y, mass_y) = self.neighbor_measure(topology, y);

        let cost = DMatrix::from_fn(support_x.len(), support_y.len(), |i, j| {
            ground_distance(topology, support_x[i], support_y[j])
        });

        let plan = sinkhorn(&mass_x, &mass_y, &cost, &self.sinkhorn);
        if !plan.converged {
            debug!(x, y, iterations = plan.iterations, "transport did not converge");
            return Err(ScoreError::NumericFailure {
                stage: NumericStage::Transport,
                dimension: support_x.len().max(support_y.len()),
            });
        }
        Ok(1.0 - plan.cost)
    }

    /// Curvature of every non-loop edge, in topology edge order.
    ///
    /// # Errors
    ///
    /// Fails on the first edge whose transport does not converge.
    pub fn edge_curvatures(&self, topology: &Topology) -> Result<Vec<f64>, ScoreError> {
        topology
            .edges()
            .iter()
            .map(|&(x, y)| self.edge_curvature(topology, x, y))
            .collect()
    }

    fn neighbor_measure(&self, topology: &Topology, node: usize) -> (Vec<usize>, Vec<f64>) {
        let neighbors = topology.neighbors(node);
        if neighbors.is_empty() {
            return (vec![node], vec![1.0]);
        }

        #[allow(clippy::cast_precision_loss)]
        let share = (1.0 - self.alpha) / neighbors.len() as f64;

        let mut support = Vec::with_capacity(neighbors.len() + 1);
        let mut mass = Vec::with_capacity(neighbors.len() + 1);
        support.push(node);
        mass.push(self.alpha);
        for &neighbor in neighbors {
            support.push(neighbor);
            mass.push(share);
        }
        (support, mass)
    }
}

impl CurvatureProvider for OllivierRicci {
    fn source(&self) -> CurvatureSource {
        CurvatureSource::OllivierRicci
    }

    fn average_curvature(&self, topology: &Topology) -> Result<f64, ScoreError> {
        let curvatures = self.edge_curvatures(topology)?;
        if curvatures.is_empty() {
            return Ok(0.0);
        }

        #[allow(clippy::cast_precision_loss)]
        let n = curvatures.len() as f64;
        Ok(curvatures.iter().sum::<f64>() / n)
    }
}

fn ground_distance(topology: &Topology, u: usize, v: usize) -> f64 {
    if u == v {
        0.0
    } else if topology.are_adjacent(u, v) {
        1.0
    } else if topology.has_common_neighbor(u, v) {
        2.0
    } else {
        3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grs_core::{Graph, generate};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "actual ({actual}) != expected ({expected})"
        );
    }

    fn curvature_of(graph: &Graph, a: i64, b: i64) -> f64 {
        let topology = Topology::from_graph(graph);
        let x = graph.node_index(&a).expect("node a").index();
        let y = graph.node_index(&b).expect("node b").index();
        OllivierRicci::default()
            .edge_curvature(&topology, x, y)
            .expect("transport converges")
    }

    fn two_triangles_with_bridge() -> Graph {
        Graph::from_edges([(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)])
    }

    #[test]
    fn triangle_edges_have_curvature_three_quarters() {
        let graph = generate::complete(3);
        assert_close(curvature_of(&graph, 0, 1), 0.75);

        let topology = Topology::from_graph(&graph);
        let average = OllivierRicci::default()
            .average_curvature(&topology)
            .expect("transport converges");
        assert_close(average, 0.75);
    }

    #[test]
    fn complete_graph_k4_edges_are_positive() {
        // Move 1/3 of the mass across the edge: κ = 2/3.
        assert_close(curvature_of(&generate::complete(4), 0, 1), 2.0 / 3.0);
    }

    #[test]
    fn bridge_between_triangles_is_negative() {
        let graph = two_triangles_with_bridge();
        assert_close(curvature_of(&graph, 2, 3), -1.0 / 3.0);
        assert_close(curvature_of(&graph, 0, 1), 0.75);
    }

    #[test]
    fn path_middle_edge_is_flat() {
        assert_close(curvature_of(&generate::path(4), 1, 2), 0.0);
    }

    #[test]
    fn edgeless_graph_averages_to_zero() {
        let graph: Graph = Graph::from_edges([(1, 1)]);
        let topology = Topology::from_graph(&graph);
        assert_eq!(OllivierRicci::default().average_curvature(&topology), Ok(0.0));
    }

    #[test]
    fn unconverged_transport_is_an_error() {
        let starved = OllivierRicci::new(SinkhornConfig {
            max_iterations: 1,
            tolerance: 1e-15,
            ..SinkhornConfig::default()
        });
        let topology = Topology::from_graph(&generate::complete(4));

        let err = starved.edge_curvature(&topology, 0, 1).expect_err("budget of one sweep");
        assert_eq!(
            err,
            ScoreError::NumericFailure {
                stage: NumericStage::Transport,
                dimension: 4,
            }
        );
        assert!(matches!(
            starved.average_curvature(&topology),
            Err(ScoreError::NumericFailure {
                stage: NumericStage::Transport,
                ..
            })
        ));
    }

    #[test]
    fn default_solver_converges_on_sampled_graph() {
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let graph = generate::barabasi_albert(40, 2, &mut rng).expect("ba graph");
        let topology = Topology::from_graph(&graph);
        let curvatures = OllivierRicci::default()
            .edge_curvatures(&topology)
            .expect("transport converges");
        assert_eq!(curvatures.len(), graph.edge_count());
        assert!(curvatures.iter().all(|k| (-2.0..=1.0).contains(k)));
    }

    #[test]
    fn curvature_is_symmetric_in_endpoints() {
        let graph = two_triangles_with_bridge();
        assert_close(curvature_of(&graph, 2, 3), curvature_of(&graph, 3, 2));
    }
}
