//! One analysis invocation: logs in, plot artifacts out.

use crate::log::Extractor;
use crate::model::{self, FailurePolicy, RunSet};
use crate::plot::{self, PlotRequest};
use crate::render::{self, PlotSink, ReportData};

use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Analysis {
    pub run_set: RunSet,
    pub plots: Vec<PlotRequest>,
}

/// Aggregate the matched logs and build the plot catalog. Nothing is written.
pub fn analyze(
    root: &Path,
    pattern: &str,
    extractor: &Extractor,
    policy: FailurePolicy,
) -> anyhow::Result<Analysis> {
    let run_set = model::load_run_set(root, pattern, extractor, policy)
        .with_context(|| format!("collect runs from {}", root.display()))?;
    let process_counts = run_set.records().iter().map(|r| r.process_count);
    match (process_counts.clone().min(), process_counts.max()) {
        (Some(lo), Some(hi)) => {
            tracing::info!(runs = run_set.len(), lo, hi, "process counts covered")
        }
        _ => tracing::warn!("no run summaries found; plots will be empty"),
    }
    let plots = plot::build_catalog(&run_set.analyze());
    Ok(Analysis { run_set, plots })
}

/// Submit every plot to `sink`, then optionally write the HTML summary.
pub fn publish<S: PlotSink + ?Sized>(
    analysis: &Analysis,
    sink: &mut S,
    html: Option<&Path>,
) -> anyhow::Result<Vec<PathBuf>> {
    let artifacts = render::submit_all(&analysis.plots, sink)?;

    if let Some(html_path) = html {
        let report_dir = html_path.parent().unwrap_or_else(|| Path::new(""));
        let data = ReportData::new(&analysis.run_set, &analysis.plots, &artifacts, report_dir);
        let page = render::render_html_report(&data)?;
        std::fs::write(html_path, page)
            .with_context(|| format!("write report {}", html_path.display()))?;
        tracing::info!(path = %html_path.display(), "wrote report");
    }

    Ok(artifacts)
}
