// View models handed to the host's templating and charting library
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum WidgetView {
    Loading,
    Chart { config: ChartConfig },
    Placeholder(Placeholder),
    Counters {
        counters: Vec<Counter>,
        recent: RecentView,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub slot: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "html", rename_all = "snake_case")]
pub enum RecentView {
    Pending,
    Html(String),
    Alert(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    NoData,
    Error,
}

/// Centered icon + message + hint that replaces a chart container. Served
/// with its icon, hint and ready-to-insert markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "PlaceholderBody")]
pub struct Placeholder {
    pub tone: Tone,
    pub message: String,
}

impl Placeholder {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::NoData,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            message: message.into(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.tone {
            Tone::NoData => "fa fa-chart-pie fa-3x mb-3 opacity-25",
            Tone::Error => "fa fa-exclamation-triangle fa-3x mb-3",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self.tone {
            Tone::NoData => "Los datos aparecerán cuando estén disponibles",
            Tone::Error => "Intenta actualizar la página",
        }
    }

    fn text_class(&self) -> &'static str {
        match self.tone {
            Tone::NoData => "text-muted",
            Tone::Error => "text-warning",
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="d-flex justify-content-center align-items-center h-100">"#,
                r#"<div class="text-center {}">"#,
                r#"<i class="{}"></i>"#,
                r#"<p class="mb-0">{}</p>"#,
                r#"<small>{}</small>"#,
                "</div></div>"
            ),
            self.text_class(),
            self.icon(),
            escape_html(&self.message),
            self.hint()
        )
    }
}

#[derive(Serialize)]
struct PlaceholderBody {
    tone: Tone,
    message: String,
    icon: &'static str,
    hint: &'static str,
    html: String,
}

impl From<Placeholder> for PlaceholderBody {
    fn from(placeholder: Placeholder) -> Self {
        Self {
            tone: placeholder.tone,
            icon: placeholder.icon(),
            hint: placeholder.hint(),
            html: placeholder.to_html(),
            message: placeholder.message,
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Chart library configuration: {type, data, options}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Doughnut,
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    Palette(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_point_style: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Index,
}

/// Tooltip settings. For pie charts `labels` holds one precomputed
/// "label: value (pct%)" line per slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<InteractionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersect: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<Ticks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub step_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub mode: InteractionMode,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate_rotate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}
