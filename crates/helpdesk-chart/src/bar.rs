use serde::{Deserialize, Serialize};

use helpdesk_core::config::ChartConfig;

pub const DEFAULT_HEIGHT: f64 = 220.0;
pub const MIN_BAR_HEIGHT: f64 = 12.0;
pub const HEADROOM: f64 = 1.1;

/// One bar's input: a bare number or a named item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BarDatum {
    Value(f64),
    Named { name: String, value: f64 },
}

impl BarDatum {
    /// The bar value; non-finite numbers count as 0.
    pub fn value(&self) -> f64 {
        let v = match self {
            Self::Value(v) | Self::Named { value: v, .. } => *v,
        };
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Named { name, .. } => Some(name),
        }
    }
}

impl From<f64> for BarDatum {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarOptions {
    /// Explicit scale maximum. Ignored unless finite and positive.
    pub max_value: Option<f64>,
    pub height: f64,
    pub min_bar_height: f64,
    pub headroom: f64,
    /// Positional labels used for bare values.
    pub labels: Vec<String>,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            max_value: None,
            height: DEFAULT_HEIGHT,
            min_bar_height: MIN_BAR_HEIGHT,
            headroom: HEADROOM,
            labels: Vec::new(),
        }
    }
}

impl From<&ChartConfig> for BarOptions {
    fn from(cfg: &ChartConfig) -> Self {
        Self {
            height: cfg.bar_height,
            min_bar_height: cfg.min_bar_height,
            headroom: cfg.headroom,
            ..Self::default()
        }
    }
}

impl BarOptions {
    pub fn with_max(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    fn pixel_height(&self) -> f64 {
        if self.height.is_finite() && self.height >= 0.0 {
            self.height
        } else {
            DEFAULT_HEIGHT
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub value: f64,
    pub height: f64,
    pub label: String,
}

/// The value mapped to the full chart height.
///
/// The explicit maximum when it is finite and positive, otherwise
/// `max(max(values), 1) * headroom`.
pub fn effective_max(values: &[f64], options: &BarOptions) -> f64 {
    if let Some(m) = options.max_value.filter(|m| m.is_finite() && *m > 0.0) {
        return m;
    }
    let peak = values.iter().copied().filter(|v| v.is_finite()).fold(1.0_f64, f64::max);
    let headroom = if options.headroom.is_finite() && options.headroom > 0.0 { options.headroom } else { HEADROOM };
    peak * headroom
}

pub fn compute_bar_geometry(data: &[BarDatum], options: &BarOptions) -> Vec<Bar> {
    let values: Vec<f64> = data.iter().map(BarDatum::value).collect();
    let max = effective_max(&values, options);
    let height = options.pixel_height();

    let bars: Vec<Bar> = data
        .iter()
        .zip(&values)
        .enumerate()
        .map(|(idx, (datum, &value))| Bar {
            value,
            height: (value / max * height).max(options.min_bar_height),
            label: label_for(datum, idx, &options.labels),
        })
        .collect();
    tracing::debug!(bars = bars.len(), effective_max = max, "bar geometry");
    bars
}

fn label_for(datum: &BarDatum, idx: usize, labels: &[String]) -> String {
    if let Some(name) = datum.name() {
        return name.to_string();
    }
    match labels.get(idx) {
        Some(label) if !label.is_empty() => label.clone(),
        _ => format!("Day {}", idx + 1),
    }
}
