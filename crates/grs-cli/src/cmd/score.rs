//! `grs score` — robustness score of an edge list.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use grs_core::GraphSummary;
use grs_score::{CurvatureMode, ScoreResult, Weights};
use serde::Serialize;

use super::{GraphInput, Label, ScoreOptions, score_text, warn_on_fallback, write_score_pretty};
use crate::config::GrsConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `grs score`.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: GraphInput,

    #[command(flatten)]
    pub options: ScoreOptions,
}

#[derive(Debug, Serialize)]
struct ScoreOutput {
    file: String,
    graph: GraphSummary,
    mode: CurvatureMode,
    weights: Weights,
    #[serde(flatten)]
    result: ScoreResult,
}

/// Execute `grs score`.
pub fn run_score(args: &ScoreArgs, config: &GrsConfig, output: OutputMode) -> Result<()> {
    if args.input.tokens {
        score_file::<String>(args, config, output)
    } else {
        score_file::<i64>(args, config, output)
    }
}

fn score_file<N: Label>(args: &ScoreArgs, config: &GrsConfig, output: OutputMode) -> Result<()> {
    let graph = args.input.load::<N>()?;
    let engine = args.options.engine(config)?;
    let weights = args.options.applied_weights(config, engine.preset());
    let mode = args.options.mode(config);

    let result = engine.compute_score(&graph, &weights, mode)?;
    warn_on_fallback(&result);

    let payload = ScoreOutput {
        file: args.input.display(),
        graph: graph.summary(),
        mode,
        weights,
        result,
    };

    render_mode(
        output,
        &payload,
        |report, w| writeln!(w, "{}", score_text(&report.result)),
        render_score_pretty,
    )
}

fn render_score_pretty(report: &ScoreOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Robustness score: {}", report.file))?;
    pretty_kv(
        w,
        "graph",
        format!(
            "{} nodes, {} edges ({})",
            report.graph.nodes, report.graph.edges, report.graph.content_hash
        ),
    )?;
    pretty_kv(
        w,
        "weights",
        format!(
            "w1={} w2={} w3={}",
            report.weights.w1, report.weights.w2, report.weights.w3
        ),
    )?;
    pretty_kv(w, "curvature mode", report.mode.to_string())?;
    write_score_pretty(w, &report.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use grs_score::{CurvatureSource, ScoringPreset};

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ScoreArgs,
    }

    #[test]
    fn score_args_parse_weights_and_modes() {
        let parsed = Wrapper::parse_from([
            "test",
            "edges.csv",
            "--w2",
            "-0.5",
            "--preset",
            "legacy",
            "--curvature",
            "proxy",
            "--tokens",
        ]);
        assert_eq!(parsed.args.options.w2, Some(-0.5));
        assert_eq!(parsed.args.options.preset, Some(ScoringPreset::LegacyScaled));
        assert_eq!(parsed.args.options.curvature, Some(CurvatureMode::Proxy));
        assert!(parsed.args.input.tokens);
        assert_eq!(parsed.args.input.delimiter(), Some(','));
    }

    #[test]
    fn whitespace_flag_disables_delimiter() {
        let parsed = Wrapper::parse_from(["test", "edges.txt", "--whitespace"]);
        assert_eq!(parsed.args.input.delimiter(), None);
    }

    #[test]
    fn pretty_render_includes_summary() {
        let report = ScoreOutput {
            file: "edges.csv".to_string(),
            graph: GraphSummary {
                nodes: 3,
                edges: 3,
                self_loops: 0,
                content_hash: "blake3:abc".to_string(),
            },
            mode: CurvatureMode::Auto,
            weights: Weights::default(),
            result: ScoreResult {
                spectral_gap: 3.0,
                singular_value_variance: 2.0 / 9.0,
                curvature: 0.75,
                score: 3.527_777,
                curvature_source: CurvatureSource::OllivierRicci,
                fallback: None,
                preset: ScoringPreset::Weighted,
                curvature_scale: 1.0,
            },
        };
        let mut out = Vec::new();
        render_score_pretty(&report, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("Robustness score: edges.csv"));
        assert!(rendered.contains("3 nodes, 3 edges"));
        assert!(rendered.contains("ollivier-ricci"));
        assert!(!rendered.contains("fallback"));
    }
}
