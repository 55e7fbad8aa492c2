//! Sinks that turn plot requests into artifacts.

pub mod html;
pub mod svg;

pub use html::{ReportData, render_html_report};
pub use svg::SvgSink;

use crate::error::ScalingError;
use crate::plot::PlotRequest;

use anyhow::Context;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Renders one plot request to a named artifact and returns where it went.
pub trait PlotSink {
    fn render(&mut self, request: &PlotRequest) -> anyhow::Result<PathBuf>;
}

/// Submit every request exactly once, in order.
///
/// Artifact names are checked up front so a collision fails before anything is written.
pub fn submit_all<S: PlotSink + ?Sized>(
    requests: &[PlotRequest],
    sink: &mut S,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut names = BTreeSet::new();
    for request in requests {
        if !names.insert(request.name.as_str()) {
            return Err(ScalingError::ArtifactCollision(request.name.clone()).into());
        }
    }

    let mut out = Vec::with_capacity(requests.len());
    for request in requests {
        let path = sink
            .render(request)
            .with_context(|| format!("render plot {}", request.name))?;
        tracing::info!(plot = %request.name, path = %path.display(), "wrote plot");
        out.push(path);
    }
    Ok(out)
}
