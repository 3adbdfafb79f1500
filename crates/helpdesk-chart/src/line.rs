use serde::{Deserialize, Serialize};

use helpdesk_core::config::ChartConfig;

pub const DEFAULT_WIDTH: f64 = 280.0;
pub const DEFAULT_HEIGHT: f64 = 150.0;

/// An x coordinate: numeric, or an ordinal label placed at its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Label(String),
}

impl std::fmt::Display for XValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: XValue,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x: XValue::Number(x), y }
    }

    pub fn labelled(label: impl Into<String>, y: f64) -> Self {
        Self { x: XValue::Label(label.into()), y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOptions {
    pub width: f64,
    pub height: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

impl From<&ChartConfig> for LineOptions {
    fn from(cfg: &ChartConfig) -> Self {
        Self { width: cfg.line_width, height: cfg.line_height }
    }
}

impl LineOptions {
    fn sanitized(self) -> Self {
        let clamp = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
        Self { width: clamp(self.width, DEFAULT_WIDTH), height: clamp(self.height, DEFAULT_HEIGHT) }
    }
}

/// A point in pixel space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineGeometry {
    pub points: Vec<PixelPoint>,
    pub line_path: String,
    pub area_path: String,
    /// Present when the series uses ordinal x labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_labels: Option<Vec<String>>,
    /// y of the last input point, 0 for an empty series.
    pub latest_value: f64,
}

/// Normalize `data` into a `width` x `height` box and build the SVG-style
/// line and area paths. Y is inverted so larger values sit higher.
pub fn compute_line_geometry(data: &[Point], options: &LineOptions) -> LineGeometry {
    let LineOptions { width, height } = options.sanitized();

    let coords: Vec<(f64, f64)> = data
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let x = match p.x {
                XValue::Number(n) if n.is_finite() => n,
                _ => idx as f64,
            };
            (x, finite_or_zero(p.y))
        })
        .collect();

    let span_x = Span::of(coords.iter().map(|c| c.0));
    let span_y = Span::of(coords.iter().map(|c| c.1));

    let points: Vec<PixelPoint> = coords
        .iter()
        .map(|&(x, y)| PixelPoint {
            x: span_x.fraction(x) * width,
            y: height - span_y.fraction(y) * height,
        })
        .collect();

    let line_path = line_path(&points);
    let area_path = match (points.first(), points.last()) {
        (Some(first), Some(last)) => format!(
            "{line_path} L {},{} L {},{} Z",
            coord(last.x),
            coord(height),
            coord(first.x),
            coord(height)
        ),
        _ => String::new(),
    };

    let axis_labels = match data.first() {
        Some(Point { x: XValue::Label(_), .. }) => Some(data.iter().map(|p| p.x.to_string()).collect()),
        _ => None,
    };
    let latest_value = data.last().map_or(0.0, |p| finite_or_zero(p.y));

    tracing::debug!(points = points.len(), width, height, "line geometry");
    LineGeometry { points, line_path, area_path, axis_labels, latest_value }
}

/// Headline text for a line chart: the latest value, with `%` appended when
/// the title mentions "percentage".
pub fn headline(latest_value: f64, title: &str) -> String {
    let suffix = if title.to_lowercase().contains("percentage") { "%" } else { "" };
    format!("{}{suffix}", coord(latest_value))
}

fn line_path(points: &[PixelPoint]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let cmd = if idx == 0 { 'M' } else { 'L' };
            format!("{cmd} {},{}", coord(p.x), coord(p.y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extent of one axis, kept at half scale so `max - min` stays finite for
/// any pair of finite bounds.
struct Span {
    half_min: f64,
    half_range: f64,
}

impl Span {
    /// A zero or empty range counts as 1.
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !min.is_finite() {
            return Self { half_min: 0.0, half_range: 0.5 };
        }
        let half_range = max / 2.0 - min / 2.0;
        Self { half_min: min / 2.0, half_range: if half_range > 0.0 { half_range } else { 0.5 } }
    }

    /// Position of `v` within the span, 0 at the minimum and 1 at the maximum.
    fn fraction(&self, v: f64) -> f64 {
        (v / 2.0 - self.half_min) / self.half_range
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Path coordinate text without a negative zero.
fn coord(v: f64) -> String {
    format!("{}", v + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_yields_empty_paths() {
        let g = compute_line_geometry(&[], &LineOptions::default());
        assert!(g.points.is_empty());
        assert_eq!(g.line_path, "");
        assert_eq!(g.area_path, "");
        assert_eq!(g.latest_value, 0.0);
    }

    #[test]
    fn single_point_degenerates_to_baseline() {
        let g = compute_line_geometry(&[Point::new(3.0, 40.0)], &LineOptions { width: 100.0, height: 50.0 });
        assert_eq!(g.points, vec![PixelPoint { x: 0.0, y: 50.0 }]);
        assert_eq!(g.line_path, "M 0,50");
        assert_eq!(g.area_path, "M 0,50 L 0,50 L 0,50 Z");
    }

    #[test]
    fn ordinal_x_uses_index_and_reports_labels() {
        let data = vec![Point::labelled("Mon", 1.0), Point::labelled("Tue", 3.0), Point::labelled("Wed", 2.0)];
        let g = compute_line_geometry(&data, &LineOptions { width: 200.0, height: 100.0 });
        let xs: Vec<f64> = g.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0]);
        assert_eq!(g.axis_labels, Some(vec!["Mon".to_string(), "Tue".to_string(), "Wed".to_string()]));
        assert_eq!(g.line_path, "M 0,100 L 100,0 L 200,50");
    }

    #[test]
    fn extreme_finite_bounds_stay_finite() {
        let data = vec![Point::new(-1e308, 0.0), Point::new(1e308, 1.0)];
        let g = compute_line_geometry(&data, &LineOptions::default());
        assert_eq!(g.points, vec![PixelPoint { x: 0.0, y: 150.0 }, PixelPoint { x: 280.0, y: 0.0 }]);
        assert_eq!(g.line_path, "M 0,150 L 280,0");

        let data = vec![Point::new(0.0, f64::MAX), Point::new(1.0, -f64::MAX), Point::new(2.0, 0.0)];
        let g = compute_line_geometry(&data, &LineOptions { width: 100.0, height: 100.0 });
        assert!(g.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert_eq!(g.points[0].y, 0.0);
        assert_eq!(g.points[1].y, 100.0);
        assert_eq!(g.points[2].y, 50.0);
    }

    #[test]
    fn headline_appends_percent_for_percentage_titles() {
        assert_eq!(headline(85.0, "Engagement Percentage"), "85%");
        assert_eq!(headline(85.5, "User Activity"), "85.5");
    }

    #[test]
    fn x_labels_accept_numbers_or_strings() {
        let data: Vec<Point> = serde_json::from_str(r#"[{"x":0,"y":1},{"x":"Tue","y":2}]"#).expect("json");
        assert_eq!(data[0].x, XValue::Number(0.0));
        assert_eq!(data[1].x, XValue::Label("Tue".into()));
    }
}
