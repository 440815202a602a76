//! `grs attack` — score a graph before and after an edge-removal attack.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use grs_core::GraphSummary;
use grs_score::{AttackStrategy, ScoreResult, apply_attack};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use super::{
    GraphInput, Label, ScoreOptions, resolve_seed, score_text, warn_on_fallback, write_graph,
    write_score_pretty,
};
use crate::config::GrsConfig;
use crate::output::{OutputMode, fmt_f64, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `grs attack`.
#[derive(Args, Debug)]
pub struct AttackArgs {
    #[command(flatten)]
    pub input: GraphInput,

    /// Fraction of edges to remove, in (0, 1].
    #[arg(long)]
    pub fraction: Option<f64>,

    /// Which edges to remove: random or hub-targeted.
    #[arg(long)]
    pub strategy: Option<AttackStrategy>,

    /// RNG seed for random attacks.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the attacked edge list to this file.
    #[arg(short, long = "output", value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    #[command(flatten)]
    pub options: ScoreOptions,
}

#[derive(Debug, Serialize)]
struct AttackOutput<N> {
    file: String,
    strategy: AttackStrategy,
    fraction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    requested: usize,
    removed: usize,
    removed_edges: Vec<(N, N)>,
    graph_before: GraphSummary,
    graph_after: GraphSummary,
    before: ScoreResult,
    after: ScoreResult,
    delta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<String>,
}

/// Execute `grs attack`.
pub fn run_attack(args: &AttackArgs, config: &GrsConfig, output: OutputMode) -> Result<()> {
    if args.input.tokens {
        attack_file::<String>(args, config, output)
    } else {
        attack_file::<i64>(args, config, output)
    }
}

fn attack_file<N: Label>(args: &AttackArgs, config: &GrsConfig, output: OutputMode) -> Result<()> {
    let graph = args.input.load::<N>()?;
    let engine = args.options.engine(config)?;
    let weights = args.options.applied_weights(config, engine.preset());
    let mode = args.options.mode(config);

    let fraction = args.fraction.unwrap_or(config.attack.fraction);
    let strategy = args.strategy.unwrap_or(config.attack.strategy);
    let seed = resolve_seed(args.seed, config.attack.seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let before = engine.compute_score(&graph, &weights, mode)?;
    let attack = apply_attack(&graph, fraction, strategy, &mut rng)?;
    let after = engine.compute_score(&attack.graph, &weights, mode)?;
    warn_on_fallback(&after);
    info!(%strategy, fraction, removed = attack.removed, "attack applied");

    if let Some(path) = &args.out_file {
        write_graph(&attack.graph, path)?;
        info!(path = %path.display(), "wrote attacked edge list");
    }

    let payload = AttackOutput {
        file: args.input.display(),
        strategy,
        fraction,
        seed: (strategy == AttackStrategy::Random).then_some(seed),
        requested: attack.requested,
        removed: attack.removed,
        removed_edges: attack.removed_edges,
        graph_before: graph.summary(),
        graph_after: attack.graph.summary(),
        delta: after.score - before.score,
        before,
        after,
        written_to: args.out_file.as_ref().map(|p| p.display().to_string()),
    };

    render_mode(output, &payload, render_attack_text, render_attack_pretty)
}

fn render_attack_text<N>(report: &AttackOutput<N>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "strategy={} fraction={} removed={}/{} delta={}",
        report.strategy,
        report.fraction,
        report.removed,
        report.graph_before.edges,
        fmt_f64(report.delta)
    )?;
    writeln!(w, "before {}", score_text(&report.before))?;
    writeln!(w, "after  {}", score_text(&report.after))
}

fn render_attack_pretty<N>(report: &AttackOutput<N>, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Attack: {}", report.file))?;
    pretty_kv(w, "strategy", report.strategy.to_string())?;
    pretty_kv(w, "fraction", report.fraction.to_string())?;
    if let Some(seed) = report.seed {
        pretty_kv(w, "seed", seed.to_string())?;
    }
    pretty_kv(
        w,
        "edges removed",
        format!(
            "{} of {} ({} requested)",
            report.removed, report.graph_before.edges, report.requested
        ),
    )?;
    if let Some(path) = &report.written_to {
        pretty_kv(w, "written to", path)?;
    }
    writeln!(w)?;
    pretty_section(w, "Before")?;
    write_score_pretty(w, &report.before)?;
    writeln!(w)?;
    pretty_section(w, "After")?;
    write_score_pretty(w, &report.after)?;
    pretty_rule(w)?;
    pretty_kv(w, "delta", fmt_f64(report.delta))
}
