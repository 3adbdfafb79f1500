use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use tokio::task::JoinHandle;

use helpdesk_chart::{compute_bar_geometry, compute_line_geometry, Bar, BarDatum, BarOptions, LineChart, LineGeometry, LineOptions, Point};
use helpdesk_core::config::{ChartConfig, DelayConfig};
use helpdesk_core::seed::{self, ReportSeed};
use helpdesk_core::types::{SatisfactionItem, TeamMember};
use helpdesk_core::{Error, Result};

use crate::deferred::{Deferred, Overlap};

/// Scale headroom of the response-time distribution chart.
const DISTRIBUTION_HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Conversations,
    Responses,
}

impl Metric {
    pub fn title(self) -> &'static str {
        match self {
            Self::Conversations => "Conversation Volume",
            Self::Responses => "Response Volume",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            other => Err(Error::NotFound(format!("report period '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTotals {
    pub conversations: u32,
    pub responses: u32,
    /// Responses per conversation, rounded percent.
    pub response_rate: u32,
}

/// Share of first responses by speed, rounded percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseBuckets {
    /// Under a minute.
    pub fast: u32,
    /// One to fifteen minutes.
    pub medium: u32,
    /// Over fifteen minutes.
    pub slow: u32,
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

/// Reports page state.
#[derive(Debug)]
pub struct ReportsView {
    data: ReportSeed,
    metric: Metric,
    selected_member: Option<String>,
    trend: LineChart,
    charts: ChartConfig,
    refreshes: Deferred<u32>,
    period: Deferred<Period>,
    requested_period: Period,
    refresh_delay: Duration,
    period_delay: Duration,
}

impl ReportsView {
    pub fn new(data: ReportSeed, delays: &DelayConfig, charts: &ChartConfig) -> Self {
        let metric = Metric::default();
        let overlap = Overlap::from_supersede(delays.supersede);
        let trend = LineChart::new(metric.title(), trend_points(&data, metric), LineOptions::from(charts));
        Self {
            data,
            metric,
            selected_member: None,
            trend,
            charts: charts.clone(),
            refreshes: Deferred::new("reports.refresh", 0, overlap),
            period: Deferred::new("reports.period", Period::default(), overlap),
            requested_period: Period::default(),
            refresh_delay: Duration::from_millis(delays.report_refresh_ms),
            period_delay: Duration::from_millis(delays.period_reload_ms),
        }
    }

    pub fn from_seed(delays: &DelayConfig, charts: &ChartConfig) -> Result<Self> {
        Ok(Self::new(seed::reports()?, delays, charts))
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Switch the trend chart between conversation and response volume.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.trend.set_title(metric.title());
        self.trend.set_data(trend_points(&self.data, metric));
    }

    pub fn trend(&mut self) -> &LineGeometry {
        self.trend.geometry()
    }

    pub fn trend_headline(&mut self) -> String {
        self.trend.headline()
    }

    pub fn trend_title(&self) -> &str {
        self.trend.title()
    }

    pub fn resize_trend(&mut self, width: f64, height: f64) {
        self.trend.resize(width, height);
    }

    /// Daily conversation counts as named bars.
    pub fn conversation_bars(&self) -> Vec<Bar> {
        let data: Vec<BarDatum> = self
            .data
            .conversation_data
            .iter()
            .map(|d| BarDatum::Named { name: d.name.clone(), value: f64::from(d.conversations) })
            .collect();
        compute_bar_geometry(&data, &BarOptions::from(&self.charts))
    }

    /// Response-time distribution, scaled to 1.2x the largest bucket.
    pub fn response_time_bars(&self) -> Vec<Bar> {
        let peak = self.data.response_times.iter().map(|r| r.count).max().unwrap_or(0);
        let data: Vec<BarDatum> = self
            .data
            .response_times
            .iter()
            .map(|r| BarDatum::Named { name: r.name.clone(), value: f64::from(r.count) })
            .collect();
        let options = BarOptions::from(&self.charts).with_max(f64::from(peak) * DISTRIBUTION_HEADROOM);
        compute_bar_geometry(&data, &options)
    }

    /// Response-time buckets as a line over their labels.
    pub fn response_time_line(&self) -> LineGeometry {
        let points: Vec<Point> = self
            .data
            .response_times
            .iter()
            .map(|r| Point::labelled(r.name.clone(), f64::from(r.count)))
            .collect();
        compute_line_geometry(&points, &LineOptions::from(&self.charts))
    }

    pub fn totals(&self) -> ConversationTotals {
        let conversations = self.data.conversation_data.iter().map(|d| d.conversations).sum();
        let responses = self.data.conversation_data.iter().map(|d| d.responses).sum();
        ConversationTotals { conversations, responses, response_rate: percent(responses, conversations) }
    }

    pub fn response_buckets(&self) -> ResponseBuckets {
        let count = |name: &str| {
            self.data.response_times.iter().find(|r| r.name == name).map_or(0, |r| r.count)
        };
        let total = self.data.response_times.iter().map(|r| r.count).sum();
        ResponseBuckets {
            fast: percent(count("< 1 min"), total),
            medium: percent(count("1-5 min") + count("5-15 min"), total),
            slow: percent(count("15-30 min") + count("> 30 min"), total),
        }
    }

    pub fn satisfaction(&self) -> &[SatisfactionItem] {
        &self.data.satisfaction
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.data.team
    }

    /// Select a team member by name, or clear the selection with `None`.
    pub fn select_team_member(&mut self, name: Option<&str>) -> Result<()> {
        match name {
            None => self.selected_member = None,
            Some(name) => {
                if !self.data.team.iter().any(|m| m.name == name) {
                    return Err(Error::NotFound(format!("team member '{name}'")));
                }
                self.selected_member = Some(name.to_string());
            }
        }
        Ok(())
    }

    pub fn selected_team_member(&self) -> Option<&TeamMember> {
        let name = self.selected_member.as_deref()?;
        self.data.team.iter().find(|m| m.name == name)
    }

    /// The period the user picked; `loaded_period` catches up after the
    /// reload delay.
    pub fn requested_period(&self) -> Period {
        self.requested_period
    }

    pub fn loaded_period(&self) -> Period {
        self.period.get()
    }

    pub fn set_period(&mut self, period: Period) -> JoinHandle<bool> {
        self.requested_period = period;
        tracing::info!(period = period.as_str(), "reloading reports");
        self.period.schedule(self.period_delay, period)
    }

    pub fn refresh(&mut self) -> JoinHandle<bool> {
        self.refreshes.schedule_update(self.refresh_delay, |n| *n += 1)
    }

    pub fn refresh_count(&self) -> u32 {
        self.refreshes.get()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes.is_pending()
    }

    pub fn is_loading_period(&self) -> bool {
        self.period.is_pending()
    }
}

fn trend_points(data: &ReportSeed, metric: Metric) -> Vec<Point> {
    data.conversation_data
        .iter()
        .map(|d| {
            let y = match metric {
                Metric::Conversations => d.conversations,
                Metric::Responses => d.responses,
            };
            Point::labelled(d.name.clone(), f64::from(y))
        })
        .collect()
}
