#![forbid(unsafe_code)]
//! grs-core library.
//!
//! Graph model, edge-list ingestion and sample generators shared by the
//! scoring engine and the `grs` binary.
//!
//! # Conventions
//!
//! - **Errors**: Library errors are `thiserror` enums ([`GraphError`]); use
//!   `anyhow::Result` at binary boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod error;
pub mod generate;
pub mod graph;
pub mod ingest;

pub use error::{ErrorCode, GraphError};
pub use graph::{Graph, GraphEdge, GraphSummary, NodeLabel};
pub use petgraph::graph::EdgeIndex;
