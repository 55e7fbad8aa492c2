//! Plot catalog: render-agnostic descriptions of the scaling charts.

use crate::model::AnalyzedRun;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    LogLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// One unconnected dot per run.
    Point,
}

/// One labeled series. `y[i]` is `None` where the value is undefined; sinks omit such points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<Option<f64>>,
}

impl Series {
    /// Points with a defined y value.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .filter_map(|(x, y)| y.map(|y| (*x, y)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRequest {
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub scale: AxisScale,
    pub marker: Marker,
    pub series: Vec<Series>,
}

#[cfg(test)]
impl PlotRequest {
    pub fn series(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }
}

const X_LABEL: &str = "Processes";
const TIME_LABEL: &str = "Time (ms)";
const TIME_PER_ITEM_LABEL: &str = "Time per item (ms)";

type Column = fn(&AnalyzedRun<'_>) -> Option<f64>;

const LOAD_POSITIONS: (&str, Column) = ("Load positions", |r| Some(r.record.load_positions_ms as f64));
const SORT_POSITIONS: (&str, Column) = ("Sort positions", |r| Some(r.record.sort_positions_ms as f64));
const LOAD: (&str, Column) = ("Load", |r| Some(r.record.load_ms as f64));
const RENDER: (&str, Column) = ("Render", |r| Some(r.record.render_ms as f64));
const COMMUNICATION: (&str, Column) = ("Communication", |r| Some(r.record.communication_ms as f64));
const LOAD_PER_ITEM: (&str, Column) = ("Load", |r| r.derived.load_per_item);
const RENDER_PER_ITEM: (&str, Column) = ("Render", |r| r.derived.render_per_item);

const ALL_PHASES: [(&str, Column); 5] = [LOAD_POSITIONS, SORT_POSITIONS, LOAD, RENDER, COMMUNICATION];

/// Build the fixed chart catalog. Same runs in, same requests out.
pub fn build_catalog(runs: &[AnalyzedRun<'_>]) -> Vec<PlotRequest> {
    vec![
        request(runs, "all", "All phases", TIME_LABEL, AxisScale::Linear, &ALL_PHASES),
        request(
            runs,
            "all_loglog",
            "All phases (log-log)",
            TIME_LABEL,
            AxisScale::LogLog,
            &ALL_PHASES,
        ),
        request(
            runs,
            "load_render",
            "Loading and rendering time",
            TIME_LABEL,
            AxisScale::LogLog,
            &[LOAD, RENDER],
        ),
        request(
            runs,
            "load_render_per_data",
            "Loading and rendering time / amount of data",
            TIME_PER_ITEM_LABEL,
            AxisScale::Linear,
            &[LOAD_PER_ITEM, RENDER_PER_ITEM],
        ),
        request(
            runs,
            "comm",
            "Communication time",
            TIME_LABEL,
            AxisScale::Linear,
            &[COMMUNICATION],
        ),
    ]
}

fn request(
    runs: &[AnalyzedRun<'_>],
    name: &str,
    title: &str,
    y_label: &str,
    scale: AxisScale,
    columns: &[(&str, Column)],
) -> PlotRequest {
    let x: Vec<f64> = runs.iter().map(|r| r.record.process_count as f64).collect();
    PlotRequest {
        name: name.to_string(),
        title: title.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: y_label.to_string(),
        scale,
        marker: Marker::Point,
        series: columns
            .iter()
            .map(|(label, column)| Series {
                label: label.to_string(),
                x: x.clone(),
                y: runs.iter().map(column).collect(),
            })
            .collect(),
    }
}
