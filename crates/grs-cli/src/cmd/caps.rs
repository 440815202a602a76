//! `grs caps` — report which curvature providers this build offers.

use std::io::Write;

use anyhow::Result;
use grs_score::CapabilityStatus;
use serde::Serialize;

use crate::config::GrsConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Debug, Serialize)]
struct CapsOutput {
    capabilities: Vec<CapabilityStatus>,
    exact_edge_limit: Option<usize>,
}

/// Execute `grs caps`.
pub fn run_caps(config: &GrsConfig, output: OutputMode) -> Result<()> {
    let engine = config.engine(None)?;
    let caps = engine.capabilities();
    let payload = CapsOutput {
        capabilities: caps.describe(),
        exact_edge_limit: caps.exact_edge_limit(),
    };
    render_mode(output, &payload, render_caps_text, render_caps_pretty)
}

fn render_caps_text(report: &CapsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for cap in &report.capabilities {
        writeln!(w, "{}={}", cap.name, cap.available)?;
    }
    match report.exact_edge_limit {
        Some(limit) => writeln!(w, "exact_edge_limit={limit}"),
        None => writeln!(w, "exact_edge_limit=none"),
    }
}

fn render_caps_pretty(report: &CapsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Curvature capabilities")?;
    for cap in &report.capabilities {
        let status = if cap.available {
            "available".to_string()
        } else {
            format!("unavailable ({})", cap.fallback)
        };
        pretty_kv(w, cap.name, status)?;
    }
    let limit = report
        .exact_edge_limit
        .map_or_else(|| "none".to_string(), |limit| limit.to_string());
    pretty_kv(w, "exact edge limit", limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grs_score::CurvatureCapabilities;

    #[test]
    fn proxy_only_build_reports_fallback() {
        let report = CapsOutput {
            capabilities: CurvatureCapabilities::proxy_only().describe(),
            exact_edge_limit: Some(500),
        };
        let mut out = Vec::new();
        render_caps_pretty(&report, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("unavailable (curvature uses the clustering-coefficient proxy"));
        assert!(text.contains("500"));

        let mut out = Vec::new();
        render_caps_text(&report, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("ollivier_ricci=false"));
        assert!(text.contains("clustering_proxy=true"));
    }
}
