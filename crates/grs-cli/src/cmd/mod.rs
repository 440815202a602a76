pub mod attack;
pub mod caps;
pub mod sample;
pub mod score;
pub mod sweep;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use grs_core::ingest::{DEFAULT_DELIMITER, read_edge_list, write_edge_list};
use grs_core::{Graph, GraphError, NodeLabel};
use grs_score::{CurvatureMode, ScoreEngine, ScoreResult, ScoringPreset, Weights};
use serde::Serialize;

use crate::config::GrsConfig;
use crate::output::{fmt_f64, pretty_kv};

// ---------------------------------------------------------------------------
// Node labels
// ---------------------------------------------------------------------------

/// Label types the CLI can read: integers by default, strings with `--tokens`.
pub trait Label: NodeLabel + Serialize {
    fn read(path: &Path, delimiter: Option<char>) -> Result<Graph<Self>, GraphError>;
}

impl Label for i64 {
    fn read(path: &Path, delimiter: Option<char>) -> Result<Graph<Self>, GraphError> {
        read_edge_list(path, delimiter)
    }
}

impl Label for String {
    fn read(path: &Path, delimiter: Option<char>) -> Result<Graph<Self>, GraphError> {
        read_edge_list(path, delimiter)
    }
}

// ---------------------------------------------------------------------------
// Shared arguments
// ---------------------------------------------------------------------------

/// Edge-list input shared by every command that reads a graph.
#[derive(Args, Debug)]
pub struct GraphInput {
    /// Edge-list file, two columns per line.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Treat node labels as strings instead of integers.
    #[arg(long)]
    pub tokens: bool,

    /// Column delimiter.
    #[arg(long, default_value_t = DEFAULT_DELIMITER, conflicts_with = "whitespace")]
    pub delimiter: char,

    /// Split columns on runs of whitespace.
    #[arg(long)]
    pub whitespace: bool,
}

impl GraphInput {
    pub const fn delimiter(&self) -> Option<char> {
        if self.whitespace {
            None
        } else {
            Some(self.delimiter)
        }
    }

    pub fn load<N: Label>(&self) -> Result<Graph<N>> {
        let graph = N::read(&self.file, self.delimiter())
            .with_context(|| format!("failed to load {}", self.file.display()))?;
        tracing::info!(
            file = %self.file.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph"
        );
        Ok(graph)
    }

    pub fn display(&self) -> String {
        self.file.display().to_string()
    }
}

/// Scoring flags; each overrides the matching `[score]` config value.
#[derive(Args, Debug, Default)]
pub struct ScoreOptions {
    /// Weight of the spectral gap.
    #[arg(long, allow_negative_numbers = true)]
    pub w1: Option<f64>,

    /// Weight of the singular-value variance (subtracted).
    #[arg(long, allow_negative_numbers = true)]
    pub w2: Option<f64>,

    /// Weight of the curvature term.
    #[arg(long, allow_negative_numbers = true)]
    pub w3: Option<f64>,

    /// Scoring preset: weighted or legacy-scaled.
    #[arg(long)]
    pub preset: Option<ScoringPreset>,

    /// Curvature provider: auto, exact or proxy.
    #[arg(long)]
    pub curvature: Option<CurvatureMode>,
}

impl ScoreOptions {
    pub fn weights(&self, config: &GrsConfig) -> Weights {
        let base = config.score.weights;
        Weights::new(
            self.w1.unwrap_or(base.w1),
            self.w2.unwrap_or(base.w2),
            self.w3.unwrap_or(base.w3),
        )
    }

    /// Weights `preset` actually scores with. Warns when the preset
    /// replaces weights that came from flags or config.
    pub fn applied_weights(&self, config: &GrsConfig, preset: ScoringPreset) -> Weights {
        let requested = self.weights(config);
        let applied = preset.effective_weights(&requested);
        if applied != requested {
            tracing::warn!(
                %preset,
                w1 = requested.w1,
                w2 = requested.w2,
                w3 = requested.w3,
                "preset ignores requested weights"
            );
        }
        applied
    }

    pub fn mode(&self, config: &GrsConfig) -> CurvatureMode {
        self.curvature.unwrap_or(config.score.curvature)
    }

    pub fn engine(&self, config: &GrsConfig) -> Result<ScoreEngine> {
        config.engine(self.preset)
    }
}

/// Seed from the flag, then the config, then fresh entropy.
pub fn resolve_seed(flag: Option<u64>, config: Option<u64>) -> u64 {
    flag.or(config).unwrap_or_else(rand::random)
}

/// Write `graph` as an edge list to `path`.
pub fn write_graph<N: NodeLabel>(graph: &Graph<N>, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_edge_list(graph, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// Score rendering
// ---------------------------------------------------------------------------

pub fn score_text(result: &ScoreResult) -> String {
    let mut line = format!(
        "score={} gap={} variance={} curvature={} source={} preset={}",
        fmt_f64(result.score),
        fmt_f64(result.spectral_gap),
        fmt_f64(result.singular_value_variance),
        fmt_f64(result.curvature),
        result.curvature_source,
        result.preset,
    );
    if let Some(reason) = result.fallback {
        line.push_str(&format!(" fallback=\"{reason}\""));
    }
    line
}

pub fn write_score_pretty(w: &mut dyn Write, result: &ScoreResult) -> io::Result<()> {
    pretty_kv(w, "score", fmt_f64(result.score))?;
    pretty_kv(w, "spectral gap", fmt_f64(result.spectral_gap))?;
    pretty_kv(w, "singular variance", fmt_f64(result.singular_value_variance))?;
    let curvature = if (result.curvature_scale - 1.0).abs() > f64::EPSILON {
        format!("{} (x{})", fmt_f64(result.curvature), result.curvature_scale)
    } else {
        fmt_f64(result.curvature)
    };
    pretty_kv(w, "curvature", curvature)?;
    pretty_kv(w, "curvature source", result.curvature_source.to_string())?;
    if let Some(reason) = result.fallback {
        pretty_kv(w, "fallback", reason.to_string())?;
    }
    pretty_kv(w, "preset", result.preset.to_string())
}

/// Log a curvature fallback so it is visible even in text output.
pub fn warn_on_fallback(result: &ScoreResult) {
    if let Some(reason) = result.fallback {
        tracing::warn!(%reason, "exact curvature not used; scored with clustering proxy");
    }
}
