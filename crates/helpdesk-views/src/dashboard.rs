use helpdesk_chart::{compute_bar_geometry, Bar, BarDatum, BarOptions, LineChart, LineGeometry, LineOptions, Point};
use helpdesk_core::config::ChartConfig;
use helpdesk_core::seed::{self, ReportSeed};
use helpdesk_core::Result;

pub const ENGAGEMENT_TITLE: &str = "User Activity";
const ENGAGEMENT_HEIGHT: f64 = 220.0;

/// Home page charts: weekly conversation bars and the engagement line.
#[derive(Debug)]
pub struct Dashboard {
    weekly: Vec<f64>,
    bar_options: BarOptions,
    engagement: LineChart,
}

impl Dashboard {
    pub fn new(data: &ReportSeed, charts: &ChartConfig) -> Self {
        let points = data.user_engagement.iter().map(|p| Point::new(p.x, p.y)).collect();
        let line_options = LineOptions { width: charts.line_width, height: ENGAGEMENT_HEIGHT };
        Self {
            weekly: data.weekly_conversations.clone(),
            bar_options: BarOptions::from(charts).with_labels(data.weekdays.iter().cloned()),
            engagement: LineChart::new(ENGAGEMENT_TITLE, points, line_options),
        }
    }

    pub fn from_seed(charts: &ChartConfig) -> Result<Self> {
        Ok(Self::new(&seed::reports()?, charts))
    }

    pub fn weekly_bars(&self) -> Vec<Bar> {
        let data: Vec<BarDatum> = self.weekly.iter().copied().map(BarDatum::from).collect();
        compute_bar_geometry(&data, &self.bar_options)
    }

    pub fn weekly_total(&self) -> f64 {
        self.weekly.iter().sum()
    }

    pub fn engagement(&mut self) -> &LineGeometry {
        self.engagement.geometry()
    }

    pub fn engagement_headline(&mut self) -> String {
        self.engagement.headline()
    }

    /// Container resize notification for the engagement chart.
    pub fn resize_engagement(&mut self, width: f64) {
        let height = self.engagement.options().height;
        self.engagement.resize(width, height);
    }
}
