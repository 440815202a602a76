//! `grs sweep` — degradation curve under increasing attack fractions.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use grs_score::{AttackStrategy, DegradationCurve, SweepConfig, sweep};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::{GraphInput, Label, ScoreOptions, resolve_seed, warn_on_fallback};
use crate::config::GrsConfig;
use crate::output::{OutputMode, fmt_f64, pretty_kv, pretty_section, render_mode};

/// Arguments for `grs sweep`.
#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub input: GraphInput,

    /// Number of evenly spaced attack fractions.
    #[arg(long)]
    pub steps: Option<usize>,

    /// Attacks per fraction (random strategy only).
    #[arg(long)]
    pub trials: Option<usize>,

    /// Largest fraction of edges to remove, in (0, 1].
    #[arg(long)]
    pub max_fraction: Option<f64>,

    /// Which edges to remove: random or hub-targeted.
    #[arg(long)]
    pub strategy: Option<AttackStrategy>,

    /// RNG seed for random attacks.
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub options: ScoreOptions,
}

impl SweepArgs {
    fn sweep_config(&self, config: &GrsConfig) -> SweepConfig {
        let base = config.sweep;
        SweepConfig {
            steps: self.steps.unwrap_or(base.steps),
            trials: self.trials.unwrap_or(base.trials),
            strategy: self.strategy.unwrap_or(base.strategy),
            max_fraction: self.max_fraction.unwrap_or(base.max_fraction),
        }
    }
}

#[derive(Debug, Serialize)]
struct SweepOutput {
    file: String,
    seed: u64,
    #[serde(flatten)]
    curve: DegradationCurve,
}

/// Execute `grs sweep`.
pub fn run_sweep(args: &SweepArgs, config: &GrsConfig, output: OutputMode) -> Result<()> {
    if args.input.tokens {
        sweep_file::<String>(args, config, output)
    } else {
        sweep_file::<i64>(args, config, output)
    }
}

fn sweep_file<N: Label>(args: &SweepArgs, config: &GrsConfig, output: OutputMode) -> Result<()> {
    let graph = args.input.load::<N>()?;
    let engine = args.options.engine(config)?;
    let weights = args.options.applied_weights(config, engine.preset());
    let mode = args.options.mode(config);
    let sweep_config = args.sweep_config(config);
    let seed = resolve_seed(args.seed, config.attack.seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let curve = sweep(&engine, &graph, &weights, mode, &sweep_config, &mut rng)?;
    warn_on_fallback(&curve.baseline);

    let payload = SweepOutput {
        file: args.input.display(),
        seed,
        curve,
    };
    render_mode(output, &payload, render_sweep_text, render_sweep_pretty)
}

fn render_sweep_text(report: &SweepOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "fraction=0 score={}", fmt_f64(report.curve.baseline.score))?;
    for point in &report.curve.points {
        writeln!(
            w,
            "fraction={} score={} min={} max={} removed={}",
            fmt_f64(point.fraction),
            fmt_f64(point.mean_score),
            fmt_f64(point.min_score),
            fmt_f64(point.max_score),
            point.mean_removed
        )?;
    }
    Ok(())
}

fn render_sweep_pretty(report: &SweepOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Degradation sweep: {}", report.file))?;
    pretty_kv(w, "strategy", report.curve.strategy.to_string())?;
    pretty_kv(w, "seed", report.seed.to_string())?;
    pretty_kv(w, "baseline", fmt_f64(report.curve.baseline.score))?;
    writeln!(w)?;
    writeln!(
        w,
        "{:>9} {:>12} {:>12} {:>12} {:>9}",
        "fraction", "mean", "min", "max", "removed"
    )?;
    for point in &report.curve.points {
        writeln!(
            w,
            "{:>9.3} {:>12.6} {:>12.6} {:>12.6} {:>9.1}",
            point.fraction, point.mean_score, point.min_score, point.max_score, point.mean_removed
        )?;
    }
    Ok(())
}
