use crate::plot::{AxisScale, PlotRequest};
use crate::render::PlotSink;

use anyhow::Context;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Writes each request to `<out_dir>/<name>.svg`.
#[derive(Debug, Clone)]
pub struct SvgSink {
    out_dir: PathBuf,
    size: (u32, u32),
}

impl SvgSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            size: (800, 600),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{}.svg", name))
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

type Points = Vec<(f64, f64)>;

/// Points each series can actually show under the request's scale.
fn visible_points(request: &PlotRequest) -> Vec<(&str, Points)> {
    request
        .series
        .iter()
        .map(|s| {
            let points = s
                .points()
                .filter(|(x, y)| {
                    x.is_finite()
                        && y.is_finite()
                        && (request.scale == AxisScale::Linear || (*x > 0.0 && *y > 0.0))
                })
                .collect();
            (s.label.as_str(), points)
        })
        .collect()
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn linear_range(extent: Option<(f64, f64)>, from_zero: bool) -> std::ops::Range<f64> {
    let Some((lo, hi)) = extent else {
        return 0.0..1.0;
    };
    let lo = if from_zero { lo.min(0.0) } else { lo };
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    let start = if from_zero && lo >= 0.0 { lo } else { lo - pad };
    start..hi + pad
}

fn log_range(extent: Option<(f64, f64)>) -> std::ops::Range<f64> {
    match extent {
        Some((lo, hi)) => lo / 2.0..hi * 2.0,
        None => 1.0..10.0,
    }
}

// Chart body shared by both coordinate systems; the coordinate types differ, the drawing does not.
macro_rules! draw_chart {
    ($root:expr, $request:expr, $series:expr, $x:expr, $y:expr) => {{
        let mut chart = ChartBuilder::on($root)
            .caption(&$request.title, ("sans-serif", 24))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d($x, $y)?;

        chart
            .configure_mesh()
            .x_desc(&$request.x_label)
            .y_desc(&$request.y_label)
            .draw()?;

        for (i, (label, points)) in $series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                )?
                .label(*label)
                .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
        }

        if !$series.is_empty() {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()?;
        }
    }};
}

impl PlotSink for SvgSink {
    fn render(&mut self, request: &PlotRequest) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("create output directory {}", self.out_dir.display()))?;

        let path = self.path_for(&request.name);
        let series = visible_points(request);
        let x_extent = extent(series.iter().flat_map(|(_, p)| p.iter().map(|(x, _)| *x)));
        let y_extent = extent(series.iter().flat_map(|(_, p)| p.iter().map(|(_, y)| *y)));

        let skipped: usize = request.series.iter().map(|s| s.x.len()).sum::<usize>()
            - series.iter().map(|(_, p)| p.len()).sum::<usize>();
        if skipped > 0 {
            tracing::debug!(plot = %request.name, skipped, "omitting points that cannot be shown");
        }

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE)?;

            match request.scale {
                AxisScale::Linear => draw_chart!(
                    &root,
                    request,
                    series,
                    linear_range(x_extent, false),
                    linear_range(y_extent, true)
                ),
                AxisScale::LogLog => draw_chart!(
                    &root,
                    request,
                    series,
                    log_range(x_extent).log_scale(),
                    log_range(y_extent).log_scale()
                ),
            }

            root.present()
                .with_context(|| format!("write {}", path.display()))?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{Marker, Series};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn request(scale: AxisScale, y: Vec<Option<f64>>) -> PlotRequest {
        PlotRequest {
            name: "sample".to_string(),
            title: "Sample".to_string(),
            x_label: "Processes".to_string(),
            y_label: "Time (ms)".to_string(),
            scale,
            marker: Marker::Point,
            series: vec![Series {
                label: "Load".to_string(),
                x: (1..=y.len()).map(|i| i as f64).collect(),
                y,
            }],
        }
    }

    #[test]
    fn log_scale_drops_non_positive_points() {
        let req = request(AxisScale::LogLog, vec![Some(0.0), Some(2.0), None]);
        let visible = visible_points(&req);
        assert_eq!(visible, vec![("Load", vec![(2.0, 2.0)])]);

        let linear = request(AxisScale::Linear, vec![Some(0.0), Some(2.0), None]);
        assert_eq!(
            visible_points(&linear),
            vec![("Load", vec![(1.0, 0.0), (2.0, 2.0)])]
        );
    }

    #[test]
    fn ranges_cover_the_data() {
        let r = linear_range(Some((4.0, 8.0)), false);
        assert!(r.start < 4.0 && r.end > 8.0);

        let r = linear_range(Some((5.0, 5.0)), true);
        assert_eq!(r.start, 0.0);
        assert!(r.end > 5.0);

        assert_eq!(linear_range(None, true), 0.0..1.0);
        assert_eq!(log_range(Some((4.0, 8.0))), 2.0..16.0);
        assert_eq!(log_range(None), 1.0..10.0);
    }

    #[test]
    fn writes_svg_named_after_request() {
        let dir = tempdir().unwrap();
        let mut sink = SvgSink::new(dir.path().join("plots"));
        for scale in [AxisScale::Linear, AxisScale::LogLog] {
            let path = sink
                .render(&request(scale, vec![Some(5.0), Some(8.0)]))
                .unwrap();
            assert_eq!(path, dir.path().join("plots").join("sample.svg"));
            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.contains("<svg"));
            assert!(text.contains("<circle"));
        }
    }

    #[test]
    fn empty_series_still_renders() {
        let dir = tempdir().unwrap();
        let mut sink = SvgSink::new(dir.path());
        for scale in [AxisScale::Linear, AxisScale::LogLog] {
            let path = sink.render(&request(scale, vec![])).unwrap();
            assert!(path.exists());
        }
    }
}
