use crate::line::{compute_line_geometry, headline, LineGeometry, LineOptions, Point};

/// A titled line chart that keeps its last geometry until the series or the
/// container size changes. Resize notifications come from the caller.
#[derive(Debug, Clone)]
pub struct LineChart {
    title: String,
    data: Vec<Point>,
    options: LineOptions,
    cached: Option<LineGeometry>,
    computations: usize,
}

impl LineChart {
    pub fn new(title: impl Into<String>, data: Vec<Point>, options: LineOptions) -> Self {
        Self { title: title.into(), data, options, cached: None, computations: 0 }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The title only feeds the headline; geometry stays cached.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn data(&self) -> &[Point] {
        &self.data
    }

    pub fn options(&self) -> LineOptions {
        self.options
    }

    pub fn set_data(&mut self, data: Vec<Point>) {
        if data != self.data {
            self.data = data;
            self.cached = None;
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let options = LineOptions { width, height };
        if options != self.options {
            tracing::debug!(width, height, "line chart resized");
            self.options = options;
            self.cached = None;
        }
    }

    pub fn geometry(&mut self) -> &LineGeometry {
        self.cached.get_or_insert_with(|| {
            self.computations += 1;
            compute_line_geometry(&self.data, &self.options)
        })
    }

    pub fn headline(&mut self) -> String {
        let latest = self.geometry().latest_value;
        headline(latest, &self.title)
    }

    /// Number of times geometry was actually recomputed.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
