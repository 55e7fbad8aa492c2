use crate::model::{AnalyzedRun, RunSet};
use crate::plot::PlotRequest;

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub files: usize,
    pub records: usize,
    pub skipped_files: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedView {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData<'a> {
    pub totals: TotalsView,
    pub runs: Vec<AnalyzedRun<'a>>,
    pub skipped: Vec<SkippedView>,
    pub plots: &'a [PlotRequest],
    /// Artifact paths relative to the report, parallel to `plots`.
    pub artifacts: Vec<String>,
}

impl<'a> ReportData<'a> {
    pub fn new(
        set: &'a RunSet,
        plots: &'a [PlotRequest],
        artifacts: &[PathBuf],
        report_dir: &Path,
    ) -> Self {
        Self {
            totals: TotalsView {
                files: set.files(),
                records: set.len(),
                skipped_files: set.skipped().len(),
            },
            runs: set.analyze(),
            skipped: set
                .skipped()
                .iter()
                .map(|s| SkippedView {
                    path: s.path.display().to_string(),
                    reason: s.reason.clone(),
                })
                .collect(),
            plots,
            artifacts: artifacts
                .iter()
                .map(|p| {
                    p.strip_prefix(report_dir)
                        .unwrap_or(p)
                        .to_string_lossy()
                        .replace('\\', "/")
                })
                .collect(),
        }
    }
}

/// Render a self-contained HTML summary (data embedded as JSON) that shows the plot artifacts
/// next to the table of runs.
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_report(data: &ReportData<'_>) -> anyhow::Result<String> {
    // Embedded as a JS object literal; `</` is escaped so the data cannot close the script tag.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Scaling Report</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  main { padding: 12px 16px; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .plots { display: flex; flex-wrap: wrap; gap: 12px; }
  .plots figure { margin: 0; border: 1px solid #eee; padding: 8px; }
  .plots img { width: 480px; }
  .muted { color: #777; font-size: 12px; }
  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>
<main>
  <div class="plots" id="plots"></div>
  <div id="skipped"></div>
  <table>
    <thead>
      <tr>
        <th class="num">processes</th>
        <th class="num">data/process</th>
        <th class="num">open file</th>
        <th class="num">load positions</th>
        <th class="num">sort positions</th>
        <th class="num">load</th>
        <th class="num">render</th>
        <th class="num">communication</th>
        <th class="num">load/item</th>
        <th class="num">render/item</th>
      </tr>
    </thead>
    <tbody id="runs"></tbody>
  </table>
</main>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function fmtRatio(x) {
  return x === null ? "undefined" : (Math.round(x * 1000) / 1000).toFixed(3);
}

function renderSummary() {
  const t = DATA.totals;
  document.getElementById("summary").innerHTML = `
    <span class="pill">files: <b>${t.files}</b></span>
    <span class="pill">runs: <b>${t.records}</b></span>
    <span class="pill">skipped files: <b>${t.skipped_files}</b></span>
  `;
}

function renderPlots() {
  const el = document.getElementById("plots");
  el.innerHTML = DATA.plots.map((p, i) => `
    <figure>
      <img src="${escapeHtml(DATA.artifacts[i])}" alt="${escapeHtml(p.title)}">
      <figcaption class="muted">${escapeHtml(p.name)}: ${escapeHtml(p.title)}</figcaption>
    </figure>
  `).join("");
}

function renderSkipped() {
  if (DATA.skipped.length === 0) return;
  document.getElementById("skipped").innerHTML =
    "<h3>Skipped files</h3><ul>" +
    DATA.skipped.map(s => `<li><code>${escapeHtml(s.path)}</code> <span class="muted">${escapeHtml(s.reason)}</span></li>`).join("") +
    "</ul>";
}

function renderRuns() {
  const body = document.getElementById("runs");
  body.innerHTML = DATA.runs.map(({ record: r, derived: d }) => `
    <tr>
      <td class="num">${r.process_count}</td>
      <td class="num">${r.data_per_process}</td>
      <td class="num">${r.open_file_ms}</td>
      <td class="num">${r.load_positions_ms}</td>
      <td class="num">${r.sort_positions_ms}</td>
      <td class="num">${r.load_ms}</td>
      <td class="num">${r.render_ms}</td>
      <td class="num">${r.communication_ms}</td>
      <td class="num">${fmtRatio(d.load_per_item)}</td>
      <td class="num">${fmtRatio(d.render_per_item)}</td>
    </tr>
  `).join("");
}

renderSummary();
renderPlots();
renderSkipped();
renderRuns();
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
