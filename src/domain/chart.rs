// Chart data domain models
use super::error::DatasetError;
use serde::{Deserialize, Serialize};

/// One chart's worth of index-paired labels and values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

impl ChartDataset {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self, DatasetError> {
        if labels.len() != values.len() {
            return Err(DatasetError::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            labels,
            values,
            colors: None,
            series_color: None,
            border_color: None,
        })
    }

    pub fn with_colors(mut self, colors: Vec<String>) -> Result<Self, DatasetError> {
        if colors.len() != self.values.len() {
            return Err(DatasetError::ColorMismatch {
                colors: colors.len(),
                values: self.values.len(),
            });
        }
        self.colors = Some(colors);
        Ok(self)
    }

    pub fn with_series_color(mut self, color: impl Into<String>) -> Self {
        self.series_color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// Wire shape produced by the aggregation endpoint: values travel as `data`
// and `backgroundColor` is a palette for pie charts but a single colour for
// series charts.
#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default, alias = "values")]
    data: Vec<f64>,
    #[serde(default, rename = "backgroundColor")]
    background_color: Option<ColorSpec>,
    #[serde(default, rename = "borderColor")]
    border_color: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Palette(Vec<String>),
    Single(String),
}

impl TryFrom<RawDataset> for ChartDataset {
    type Error = DatasetError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        let mut dataset = ChartDataset::new(raw.labels, raw.data)?;
        dataset = match raw.background_color {
            Some(ColorSpec::Palette(colors)) => dataset.with_colors(colors)?,
            Some(ColorSpec::Single(color)) => dataset.with_series_color(color),
            None => dataset,
        };
        dataset.border_color = raw.border_color;
        Ok(dataset)
    }
}

/// Named sections of the aggregated dashboard payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    StatesChart,
    DailyActivity,
    BarSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AggregatedResponse {
    #[serde(default)]
    pub states_chart: Option<ChartDataset>,
    #[serde(default)]
    pub daily_activity: Option<ChartDataset>,
    #[serde(default, alias = "bar_series")]
    pub technicians_chart: Option<ChartDataset>,
}

impl AggregatedResponse {
    pub fn slot(&self, slot: Slot) -> Option<&ChartDataset> {
        match slot {
            Slot::StatesChart => self.states_chart.as_ref(),
            Slot::DailyActivity => self.daily_activity.as_ref(),
            Slot::BarSeries => self.technicians_chart.as_ref(),
        }
    }

    pub fn take(self, slot: Slot) -> Option<ChartDataset> {
        match slot {
            Slot::StatesChart => self.states_chart,
            Slot::DailyActivity => self.daily_activity,
            Slot::BarSeries => self.technicians_chart,
        }
    }
}
