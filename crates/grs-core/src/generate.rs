//! Sample graph generators.
//!
//! Deterministic shapes (complete, cycle, path, star, double star) plus two
//! random models that draw from a caller-supplied [`rand::Rng`], so a fixed
//! seed always yields the same graph. Nodes are labelled `0..n` in insertion
//! order.

use std::collections::BTreeSet;

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::error::GraphError;
use crate::graph::Graph;

/// Complete graph `K_n`.
#[must_use]
pub fn complete(n: usize) -> Graph {
    let mut graph = with_nodes(n);
    for a in 0..n {
        for b in (a + 1)..n {
            graph.add_edge(label(a), label(b));
        }
    }
    graph
}

/// Cycle `C_n`. For `n < 3` this degenerates to a path.
#[must_use]
pub fn cycle(n: usize) -> Graph {
    let mut graph = path(n);
    if n >= 3 {
        graph.add_edge(label(n - 1), label(0));
    }
    graph
}

/// Path `P_n` with `n` nodes and `n - 1` edges.
#[must_use]
pub fn path(n: usize) -> Graph {
    let mut graph = with_nodes(n);
    for a in 1..n {
        graph.add_edge(label(a - 1), label(a));
    }
    graph
}

/// Star with hub `0` and `leaves` leaves.
#[must_use]
pub fn star(leaves: usize) -> Graph {
    let mut graph = with_nodes(leaves + 1);
    for leaf in 1..=leaves {
        graph.add_edge(label(0), label(leaf));
    }
    graph
}

/// Two joined stars: hub `0` with `left` leaves, hub `1` with `right` leaves,
/// and a bridge edge between the hubs.
#[must_use]
pub fn double_star(left: usize, right: usize) -> Graph {
    let mut graph = with_nodes(2);
    graph.add_edge(label(0), label(1));
    let mut next = 2;
    for _ in 0..left {
        graph.add_edge(label(0), label(next));
        next += 1;
    }
    for _ in 0..right {
        graph.add_edge(label(1), label(next));
        next += 1;
    }
    graph
}

/// Erdős–Rényi `G(n, p)`: each of the `n(n-1)/2` pairs is an edge with
/// probability `p`.
///
/// # Errors
///
/// Returns [`GraphError::InvalidGenerator`] if `p` is outside `[0, 1]`.
pub fn erdos_renyi<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Result<Graph, GraphError> {
    let coin = Bernoulli::new(p).map_err(|err| {
        GraphError::InvalidGenerator(format!("edge probability {p} is not in [0, 1]: {err}"))
    })?;

    let mut graph = with_nodes(n);
    for a in 0..n {
        for b in (a + 1)..n {
            if coin.sample(rng) {
                graph.add_edge(label(a), label(b));
            }
        }
    }
    Ok(graph)
}

/// Barabási–Albert preferential attachment with `n` nodes, each new node
/// attaching to `m` distinct existing nodes.
///
/// Growth starts from a star on `m + 1` nodes. Targets are drawn from the
/// multiset of edge endpoints, so selection probability is proportional to
/// degree.
///
/// # Errors
///
/// Returns [`GraphError::InvalidGenerator`] unless `1 <= m < n`.
pub fn barabasi_albert<R: Rng + ?Sized>(
    n: usize,
    m: usize,
    rng: &mut R,
) -> Result<Graph, GraphError> {
    if m == 0 || m >= n {
        return Err(GraphError::InvalidGenerator(format!(
            "preferential attachment needs 1 <= m < n (got m={m}, n={n})"
        )));
    }

    let mut graph = star(m);
    let mut endpoints: Vec<usize> = Vec::with_capacity(2 * m * n);
    for leaf in 1..=m {
        endpoints.extend([0, leaf]);
    }

    for source in (m + 1)..n {
        let mut targets = BTreeSet::new();
        while targets.len() < m {
            targets.insert(endpoints[rng.gen_range(0..endpoints.len())]);
        }
        for target in targets {
            graph.add_edge(label(source), label(target));
            endpoints.extend([source, target]);
        }
    }
    Ok(graph)
}

fn with_nodes(n: usize) -> Graph {
    let mut graph = Graph::new();
    for idx in 0..n {
        graph.add_node(label(idx));
    }
    graph
}

#[allow(clippy::cast_possible_wrap)]
const fn label(idx: usize) -> i64 {
    idx as i64
}
