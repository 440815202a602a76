//! Structural signals feeding the robustness score.
//!
//! - **Spectral** (`spectral`): adjacency matrix, spectral gap and
//!   singular-value variance (nalgebra solvers, cubic in node count).
//! - **Topology** (`topology`): sorted neighbour lists, the view used by the
//!   curvature providers, and the clustering coefficient.

pub mod spectral;
pub mod topology;

pub use topology::Topology;
