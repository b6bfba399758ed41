//! Trend chart geometry.
//!
//! Scores are plotted left to right in backend order. The vertical domain
//! always covers `[0, 1]` and stretches to fit scores or an average outside it.

use serde::Serialize;

use crate::models::TrendPoint;

pub const CHART_WIDTH: f64 = 600.0;
pub const CHART_HEIGHT: f64 = 200.0;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// SVG paths for the area chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub line_path: String,
    pub area_path: String,
    /// Vertical position of the health average reference line
    pub reference_y: Option<f64>,
    pub first_day: String,
    pub last_day: String,
}

/// The trend section of the result panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub status: Option<String>,
    pub points: Vec<TrendPoint>,
    pub health_average: Option<f64>,
    /// `None` when there is nothing to plot
    pub geometry: Option<ChartGeometry>,
}

impl TrendChart {
    pub fn new(
        status: Option<String>,
        points: Vec<TrendPoint>,
        health_average: Option<f64>,
    ) -> Self {
        let geometry = layout(&points, health_average);
        Self {
            status,
            points,
            health_average,
            geometry,
        }
    }

    /// One block character per point, scaled between the min and max score
    pub fn sparkline(&self) -> String {
        let (lo, hi) = match min_max(self.points.iter().map(|p| p.score)) {
            Some(bounds) => bounds,
            None => return String::new(),
        };
        let span = hi - lo;
        let top = (SPARK_LEVELS.len() - 1) as f64;

        self.points
            .iter()
            .map(|p| {
                let level =
                    if span > 0.0 { ((p.score - lo) / span * top).round() } else { top / 2.0 };
                SPARK_LEVELS[level.clamp(0.0, top) as usize]
            })
            .collect()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn layout(points: &[TrendPoint], health_average: Option<f64>) -> Option<ChartGeometry> {
    let (first, last) = match points {
        [] => return None,
        [only] => (only, only),
        [first, .., last] => (first, last),
    };

    let scores = points.iter().map(|p| p.score).chain(health_average);
    let (lo, hi) = min_max(scores.chain([0.0, 1.0]))?;
    let span = hi - lo;

    let x = |idx: usize| {
        if points.len() == 1 {
            CHART_WIDTH / 2.0
        } else {
            idx as f64 / (points.len() - 1) as f64 * CHART_WIDTH
        }
    };
    let y = |value: f64| CHART_HEIGHT - (value - lo) / span * CHART_HEIGHT;

    let coords: Vec<(f64, f64)> =
        points.iter().enumerate().map(|(idx, p)| (x(idx), y(p.score))).collect();

    let line_path = coords
        .iter()
        .enumerate()
        .map(|(idx, (px, py))| format!("{}{:.1},{:.1}", if idx == 0 { "M" } else { "L" }, px, py))
        .collect::<Vec<_>>()
        .join(" ");

    let (start_x, _) = coords[0];
    let (end_x, _) = coords[coords.len() - 1];
    let area_path = format!(
        "{} L{:.1},{:.1} L{:.1},{:.1} Z",
        line_path, end_x, CHART_HEIGHT, start_x, CHART_HEIGHT
    );

    Some(ChartGeometry {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        line_path,
        area_path,
        reference_y: health_average.map(|avg| (y(avg) * 10.0).round() / 10.0),
        first_day: first.day.clone(),
        last_day: last.day.clone(),
    })
}
