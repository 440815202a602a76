//! Edge-removal attacks.
//!
//! # Overview
//!
//! [`apply_attack`] removes `max(1, ⌊fraction·|E|⌋)` edges from a copy of the
//! graph. The input graph is never touched and the copy keeps every node in
//! its original order.
//!
//! - **Random**: shuffle the edge list with the injected RNG and drop the
//!   first `k` edges.
//! - **Hub-targeted**: rank nodes by descending degree (ties by insertion
//!   order) and strip the incident edges of each hub in turn, walking its
//!   neighbours in insertion order, until `k` distinct edges are collected.
//!
//! [`sweep`] repeats attacks over a range of fractions and re-scores each
//! variant.

pub mod sweep;

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use grs_core::{EdgeIndex, Graph, GraphEdge, NodeLabel};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ScoreError;

pub use sweep::{DegradationCurve, SweepConfig, SweepPoint, sweep};

/// Fraction of edges removed when the caller does not choose one.
pub const DEFAULT_ATTACK_FRACTION: f64 = 0.2;

/// Which edges an attack removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttackStrategy {
    /// Uniformly random edges.
    #[default]
    Random,
    /// Edges of the highest-degree nodes first.
    HubTargeted,
}

impl fmt::Display for AttackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::HubTargeted => "hub-targeted",
        })
    }
}

impl FromStr for AttackStrategy {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "hub" | "hub-targeted" | "hub_targeted" | "targeted" => Ok(Self::HubTargeted),
            _ => Err(ScoreError::invalid(
                "strategy",
                s,
                "expected one of: random, hub-targeted",
            )),
        }
    }
}

/// The attacked copy of a graph and what was removed.
#[derive(Debug, Clone)]
pub struct AttackResult<N = i64> {
    pub graph: Graph<N>,
    pub strategy: AttackStrategy,
    /// Number of edges the attack aimed to remove.
    pub requested: usize,
    /// Number of edges actually removed.
    pub removed: usize,
    /// Endpoint labels of the removed edges, in removal order.
    pub removed_edges: Vec<(N, N)>,
}

/// `max(1, ⌊fraction·edge_count⌋)`, or `0` for an edgeless graph.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidParameter`] unless `fraction` is finite and
/// in `(0, 1]`.
pub fn remove_count(fraction: f64, edge_count: usize) -> Result<usize, ScoreError> {
    validate_fraction(fraction)?;
    if edge_count == 0 {
        return Ok(0);
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let scaled = (fraction * edge_count as f64).floor() as usize;
    Ok(scaled.clamp(1, edge_count))
}

pub(crate) fn validate_fraction(fraction: f64) -> Result<(), ScoreError> {
    if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(ScoreError::invalid(
            "fraction",
            fraction,
            "must be finite and in (0, 1]",
        ))
    }
}

/// Remove a fraction of the edges of `graph` using `strategy`.
///
/// `rng` is only drawn from by [`AttackStrategy::Random`].
///
/// # Errors
///
/// Returns [`ScoreError::InvalidParameter`] for a fraction outside `(0, 1]`.
#[instrument(
    level = "debug",
    skip(graph, rng),
    fields(nodes = graph.node_count(), edges = graph.edge_count())
)]
pub fn apply_attack<N, R>(
    graph: &Graph<N>,
    fraction: f64,
    strategy: AttackStrategy,
    rng: &mut R,
) -> Result<AttackResult<N>, ScoreError>
where
    N: NodeLabel,
    R: Rng + ?Sized,
{
    let requested = remove_count(fraction, graph.edge_count())?;
    if requested == 0 {
        return Ok(AttackResult {
            graph: graph.clone(),
            strategy,
            requested: 0,
            removed: 0,
            removed_edges: Vec::new(),
        });
    }

    let targets = match strategy {
        AttackStrategy::Random => random_targets(graph, requested, rng),
        AttackStrategy::HubTargeted => hub_targets(graph, requested),
    };

    let removed: HashSet<EdgeIndex> = targets.iter().map(|(id, _)| *id).collect();
    let removed_edges = targets.into_iter().map(|(_, labels)| labels).collect();

    Ok(AttackResult {
        graph: graph.without_edges(&removed),
        strategy,
        requested,
        removed: removed.len(),
        removed_edges,
    })
}

fn random_targets<N, R>(graph: &Graph<N>, count: usize, rng: &mut R) -> Vec<(EdgeIndex, (N, N))>
where
    N: NodeLabel,
    R: Rng + ?Sized,
{
    let mut edges: Vec<_> = graph.edges().collect();
    edges.shuffle(rng);
    edges
        .into_iter()
        .take(count)
        .map(|edge| (edge.id, graph.endpoint_labels(edge)))
        .collect()
}

fn hub_targets<N: NodeLabel>(graph: &Graph<N>, count: usize) -> Vec<(EdgeIndex, (N, N))> {
    let degrees = graph.degrees();

    // Incident edges of every node, ordered by the neighbour's position.
    let mut incident: Vec<Vec<(usize, GraphEdge)>> = vec![Vec::new(); degrees.len()];
    for edge in graph.edges() {
        incident[edge.source].push((edge.target, edge));
        if !edge.is_loop() {
            incident[edge.target].push((edge.source, edge));
        }
    }
    for list in &mut incident {
        list.sort_by_key(|(neighbor, _)| *neighbor);
    }

    let mut ranked: Vec<usize> = (0..degrees.len()).collect();
    ranked.sort_by_key(|&node| Reverse(degrees[node]));

    let mut seen = HashSet::with_capacity(count);
    let mut targets = Vec::with_capacity(count);
    'hubs: for node in ranked {
        for (_, edge) in &incident[node] {
            if targets.len() == count {
                break 'hubs;
            }
            if seen.insert(edge.id) {
                targets.push((edge.id, graph.endpoint_labels(*edge)));
            }
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use grs_core::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn remove_count_floors_with_minimum_one() {
        assert_eq!(remove_count(0.2, 10), Ok(2));
        assert_eq!(remove_count(0.2, 1), Ok(1));
        assert_eq!(remove_count(0.25, 7), Ok(1));
        assert_eq!(remove_count(1.0, 7), Ok(7));
        assert_eq!(remove_count(0.5, 0), Ok(0));
    }

    #[test]
    fn fraction_must_be_in_unit_interval() {
        for fraction in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(remove_count(fraction, 10).is_err(), "{fraction} accepted");
        }
    }

    #[test]
    fn strategy_parses_short_names() {
        assert_eq!("hub".parse::<AttackStrategy>(), Ok(AttackStrategy::HubTargeted));
        assert_eq!("Random".parse::<AttackStrategy>(), Ok(AttackStrategy::Random));
        assert!("degree".parse::<AttackStrategy>().is_err());
    }

    #[test]
    fn hub_attack_on_star_removes_hub_edges_in_neighbor_order() {
        let graph = generate::star(4);
        let mut rng = StdRng::seed_from_u64(42);
        let result = apply_attack(&graph, 0.5, AttackStrategy::HubTargeted, &mut rng)
            .expect("attack");
        assert_eq!(result.removed, 2);
        assert_eq!(result.removed_edges, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn hub_attack_skips_edges_already_taken() {
        // Triangle: node 0 gives (0,1), (0,2); node 1 then only adds (1,2).
        let graph = generate::complete(3);
        let mut rng = StdRng::seed_from_u64(42);
        let result = apply_attack(&graph, 1.0, AttackStrategy::HubTargeted, &mut rng)
            .expect("attack");
        assert_eq!(result.removed, 3);
        assert_eq!(result.graph.edge_count(), 0);
        assert_eq!(result.removed_edges.len(), 3);
    }

    #[test]
    fn hub_attack_counts_self_loop_once() {
        let graph = Graph::from_edges([(1, 1), (1, 2)]);
        let mut rng = StdRng::seed_from_u64(0);
        let result = apply_attack(&graph, 1.0, AttackStrategy::HubTargeted, &mut rng)
            .expect("attack");
        assert_eq!(result.removed, 2);
        assert_eq!(result.graph.node_count(), 2);
    }

    #[test]
    fn random_attack_keeps_every_node() {
        let graph = generate::cycle(10);
        let mut rng = StdRng::seed_from_u64(7);
        let result = apply_attack(&graph, 0.3, AttackStrategy::Random, &mut rng)
            .expect("attack");
        assert_eq!(result.requested, 3);
        assert_eq!(result.removed, 3);
        assert_eq!(result.graph.node_count(), 10);
        assert_eq!(result.graph.edge_count(), 7);
        for (a, b) in &result.removed_edges {
            assert!(graph.contains_edge(a, b));
            assert!(!result.graph.contains_edge(a, b));
        }
    }
}
