//! Edge-list ingestion and export.
//!
//! # Format
//!
//! One edge per line, two columns separated by a delimiter (`,` by default,
//! or any run of whitespace when no delimiter is given). Extra columns are
//! treated as edge data and ignored.
//!
//! ```text
//! source,target
//! 1,2
//! 1,3
//! # comments and blank lines are skipped
//! 2,3
//! ```
//!
//! ## Header Detection
//!
//! The first non-blank, non-comment line is treated as a header and skipped
//! when any of its columns is one of `source`, `target`, `from`, `to` or
//! `node` (case-insensitive). Only that first line is checked.
//!
//! Labels are parsed with [`FromStr`], so the same reader produces
//! `Graph<i64>` for numeric lists and `Graph<String>` for token lists.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, NodeLabel};

/// Column names that mark the first line as a header row.
const HEADER_TOKENS: [&str; 5] = ["source", "target", "from", "to", "node"];

/// Default column delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Parse an edge list from text.
///
/// `delimiter = None` splits on whitespace.
///
/// # Errors
///
/// Returns [`GraphError::Parse`] (with a 1-based line number) when a line has
/// fewer than two columns, an empty column, or a label that does not parse
/// as `N`.
#[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse_edge_list<N>(text: &str, delimiter: Option<char>) -> Result<Graph<N>, GraphError>
where
    N: NodeLabel + FromStr,
    N::Err: fmt::Display,
{
    let mut graph = Graph::new();
    let mut header_checked = false;
    let mut duplicates = 0usize;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns = split_columns(line, delimiter);

        if !header_checked {
            header_checked = true;
            if is_header(&columns) {
                debug!(line = line_no + 1, "skipping header row");
                continue;
            }
        }

        let (a, b) = match columns.as_slice() {
            [a, b, ..] => (*a, *b),
            _ => {
                return Err(GraphError::Parse {
                    line: line_no + 1,
                    reason: format!("expected two columns, found {}", columns.len()),
                });
            }
        };

        let a = parse_label::<N>(a, line_no + 1)?;
        let b = parse_label::<N>(b, line_no + 1)?;
        if !graph.add_edge(a, b) {
            duplicates += 1;
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        duplicates,
        "parsed edge list"
    );
    Ok(graph)
}

/// Read and parse an edge-list file.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the file cannot be read, or any error from
/// [`parse_edge_list`].
pub fn read_edge_list<N>(path: &Path, delimiter: Option<char>) -> Result<Graph<N>, GraphError>
where
    N: NodeLabel + FromStr,
    N::Err: fmt::Display,
{
    let text = fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_edge_list(&text, delimiter)
}

/// Write `graph` as a `source,target` edge list.
///
/// Isolated nodes are not representable in this format and are dropped.
///
/// # Errors
///
/// Propagates I/O errors from `w`.
pub fn write_edge_list<N: NodeLabel>(graph: &Graph<N>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "source,target")?;
    for (a, b) in graph.edge_labels() {
        writeln!(w, "{a},{b}")?;
    }
    Ok(())
}

fn split_columns(line: &str, delimiter: Option<char>) -> Vec<&str> {
    let columns: Vec<&str> = match delimiter {
        Some(d) => line.split(d).collect(),
        None => line.split_whitespace().collect(),
    };
    columns
        .into_iter()
        .map(|column| column.trim().trim_matches('"').trim())
        .collect()
}

fn is_header(columns: &[&str]) -> bool {
    columns.iter().any(|column| {
        HEADER_TOKENS
            .iter()
            .any(|token| column.eq_ignore_ascii_case(token))
    })
}

fn parse_label<N>(column: &str, line: usize) -> Result<N, GraphError>
where
    N: FromStr,
    N::Err: fmt::Display,
{
    if column.is_empty() {
        return Err(GraphError::Parse {
            line,
            reason: "empty node label".to_string(),
        });
    }
    column.parse::<N>().map_err(|err| GraphError::Parse {
        line,
        reason: format!("invalid node label `{column}`: {err}"),
    })
}
