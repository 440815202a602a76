//! `grs sample` — generate a sample graph as an edge list.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use grs_core::ingest::write_edge_list;
use grs_core::{Graph, GraphSummary, generate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use super::{resolve_seed, write_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Graph families `grs sample` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleKind {
    Complete,
    Cycle,
    Path,
    /// One hub joined to `nodes - 1` leaves.
    Star,
    /// Two joined hubs sharing `nodes - 2` leaves.
    DoubleStar,
    /// G(n, p) random graph.
    ErdosRenyi,
    /// Preferential attachment.
    BarabasiAlbert,
}

impl SampleKind {
    const fn is_random(self) -> bool {
        matches!(self, Self::ErdosRenyi | Self::BarabasiAlbert)
    }
}

/// Arguments for `grs sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Graph family.
    #[arg(value_enum)]
    pub kind: SampleKind,

    /// Number of nodes.
    #[arg(short, long, default_value_t = 10)]
    pub nodes: usize,

    /// Edge probability for erdos-renyi.
    #[arg(long, default_value_t = 0.1)]
    pub p: f64,

    /// Edges per new node for barabasi-albert.
    #[arg(long, default_value_t = 2)]
    pub m: usize,

    /// RNG seed for the random families.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the edge list to this file instead of stdout.
    #[arg(short, long = "output", value_name = "FILE")]
    pub out_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SampleOutput {
    kind: SampleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    graph: GraphSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edges: Option<Vec<(i64, i64)>>,
}

/// Execute `grs sample`.
pub fn run_sample(args: &SampleArgs, output: OutputMode) -> Result<()> {
    let seed = args
        .kind
        .is_random()
        .then(|| resolve_seed(args.seed, None));
    let graph = build(args, seed.unwrap_or_default())?;
    info!(
        kind = ?args.kind,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "generated sample graph"
    );

    if let Some(path) = &args.out_file {
        write_graph(&graph, path)?;
    } else if !output.is_json() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_edge_list(&graph, &mut out)?;
        return Ok(());
    }

    let payload = SampleOutput {
        kind: args.kind,
        seed,
        graph: graph.summary(),
        written_to: args.out_file.as_ref().map(|p| p.display().to_string()),
        edges: args.out_file.is_none().then(|| graph.edge_labels()),
    };
    render_mode(
        output,
        &payload,
        |report, w| {
            writeln!(
                w,
                "nodes={} edges={} hash={}",
                report.graph.nodes, report.graph.edges, report.graph.content_hash
            )
        },
        render_sample_pretty,
    )
}

fn build(args: &SampleArgs, seed: u64) -> Result<Graph> {
    let n = args.nodes;
    let mut rng = StdRng::seed_from_u64(seed);
    let graph = match args.kind {
        SampleKind::Complete => generate::complete(n),
        SampleKind::Cycle => generate::cycle(n),
        SampleKind::Path => generate::path(n),
        SampleKind::Star => generate::star(n.saturating_sub(1)),
        SampleKind::DoubleStar => {
            let leaves = n.saturating_sub(2);
            generate::double_star(leaves.div_ceil(2), leaves / 2)
        }
        SampleKind::ErdosRenyi => generate::erdos_renyi(n, args.p, &mut rng)?,
        SampleKind::BarabasiAlbert => generate::barabasi_albert(n, args.m, &mut rng)?,
    };
    Ok(graph)
}

fn render_sample_pretty(report: &SampleOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Sample graph")?;
    pretty_kv(w, "kind", format!("{:?}", report.kind))?;
    if let Some(seed) = report.seed {
        pretty_kv(w, "seed", seed.to_string())?;
    }
    pretty_kv(w, "nodes", report.graph.nodes.to_string())?;
    pretty_kv(w, "edges", report.graph.edges.to_string())?;
    pretty_kv(w, "content hash", &report.graph.content_hash)?;
    if let Some(path) = &report.written_to {
        pretty_kv(w, "written to", path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SampleArgs,
    }

    fn args(argv: &[&str]) -> SampleArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        Wrapper::parse_from(full).args
    }

    #[test]
    fn star_uses_nodes_minus_one_leaves() {
        let graph = build(&args(&["star", "--nodes", "6"]), 0).expect("star");
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn double_star_splits_leaves_between_hubs() {
        let graph = build(&args(&["double-star", "-n", "7"]), 0).expect("double star");
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.degrees()[..2], [4, 3]);
    }

    #[test]
    fn random_families_are_seeded() {
        let parsed = args(&["barabasi-albert", "-n", "30", "--m", "3"]);
        let a = build(&parsed, 5).expect("ba");
        let b = build(&parsed, 5).expect("ba");
        assert_eq!(a.edge_labels(), b.edge_labels());
        assert!(SampleKind::ErdosRenyi.is_random());
        assert!(!SampleKind::Cycle.is_random());
    }

    #[test]
    fn invalid_generator_parameters_fail() {
        let parsed = args(&["erdos-renyi", "--p", "1.5"]);
        let err = build(&parsed, 1).expect_err("p out of range");
        assert_eq!(
            crate::output::error_code(&err),
            grs_core::ErrorCode::InvalidGenerator
        );
    }
}
