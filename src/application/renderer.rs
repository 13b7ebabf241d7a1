// Chart renderer - widget state to view model, view model to surface
use crate::application::surface::Surface;
use crate::domain::chart::ChartDataset;
use crate::domain::customer::CustomerStats;
use crate::domain::view::{
    Animation, Axis, ChartConfig, ChartData, ChartOptions, ChartType, ColorValue, Counter,
    DatasetConfig, Grid, Interaction, InteractionMode, Legend, LegendPosition, Placeholder,
    Plugins, RecentView, Scales, Ticks, Tooltip, WidgetView,
};
use crate::domain::widget::{RecentRepairsState, RenderPayload, WidgetKind, WidgetViewState};

pub const TOTAL_REPAIRS_SLOT: &str = "total_repairs";
pub const COMPLETED_REPAIRS_SLOT: &str = "completed_repairs";
pub const PENDING_REPAIRS_SLOT: &str = "pending_repairs";
pub const RECENT_REPAIRS_SLOT: &str = "recent_repairs_container";

const RECENT_REPAIRS_ALERT: &str = concat!(
    r#"<div class="alert alert-warning" role="alert">"#,
    "<strong>Error:</strong> No se pudieron cargar las reparaciones recientes.",
    "</div>"
);

const DAILY_SERIES_LABEL: &str = "Órdenes Recibidas";
const DAILY_LINE_COLOR: &str = "#28a745";
const DAILY_FILL_COLOR: &str = "rgba(40, 167, 69, 0.1)";
const BAR_COLOR: &str = "#007bff";

/// Pure mapping from lifecycle state to what the host should display.
pub fn render_view(state: &WidgetViewState, kind: WidgetKind) -> WidgetView {
    let messages = kind.messages();
    match state {
        WidgetViewState::Loading => WidgetView::Loading,
        WidgetViewState::Empty => WidgetView::Placeholder(Placeholder::no_data(messages.no_data)),
        WidgetViewState::Error(_) => WidgetView::Placeholder(Placeholder::error(messages.error)),
        WidgetViewState::Rendered(RenderPayload::Chart(dataset)) => match chart_config(kind, dataset) {
            Some(config) => WidgetView::Chart { config },
            None => WidgetView::Placeholder(Placeholder::error(messages.error)),
        },
        WidgetViewState::Rendered(RenderPayload::Counters { stats, recent }) => WidgetView::Counters {
            counters: counters(stats),
            recent: match recent {
                RecentRepairsState::Pending => RecentView::Pending,
                RecentRepairsState::Loaded(html) => RecentView::Html(html.clone()),
                RecentRepairsState::Failed => RecentView::Alert(RECENT_REPAIRS_ALERT.to_string()),
            },
        },
    }
}

/// Apply a view to a surface. Any chart already bound to the surface is
/// destroyed before a new one is mounted or a placeholder replaces it.
pub fn draw(surface: &dyn Surface, view: &WidgetView) {
    match view {
        WidgetView::Loading => {}
        WidgetView::Chart { config } => {
            surface.destroy_chart();
            surface.mount_chart(config.clone());
        }
        WidgetView::Placeholder(placeholder) => {
            surface.destroy_chart();
            surface.show_placeholder(placeholder.clone());
        }
        WidgetView::Counters { counters, recent } => {
            for counter in counters {
                surface.set_text(counter.slot, &counter.text);
            }
            match recent {
                RecentView::Html(html) if !html.is_empty() => surface.set_html(RECENT_REPAIRS_SLOT, html),
                RecentView::Alert(html) => surface.set_html(RECENT_REPAIRS_SLOT, html),
                _ => {}
            }
        }
    }
}

pub fn chart_config(kind: WidgetKind, dataset: &ChartDataset) -> Option<ChartConfig> {
    match kind {
        WidgetKind::StatesChart => Some(doughnut(dataset)),
        WidgetKind::DailyActivity => Some(line(dataset)),
        WidgetKind::TechniciansBar => Some(bar(dataset)),
        WidgetKind::CustomerStats => None,
    }
}

fn counters(stats: &CustomerStats) -> Vec<Counter> {
    vec![
        Counter {
            slot: TOTAL_REPAIRS_SLOT,
            text: stats.total_repairs.to_string(),
        },
        Counter {
            slot: COMPLETED_REPAIRS_SLOT,
            text: stats.completed_repairs.to_string(),
        },
        Counter {
            slot: PENDING_REPAIRS_SLOT,
            text: stats.pending_repairs.to_string(),
        },
    ]
}

/// Share of each value in the total, rounded to one decimal. `None` when
/// the total is not positive.
fn slice_percentages(values: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return None;
    }
    Some(
        values
            .iter()
            .map(|value| (value / total * 1000.0).round() / 10.0)
            .collect(),
    )
}

fn doughnut(dataset: &ChartDataset) -> ChartConfig {
    let percentages: Vec<String> = match slice_percentages(&dataset.values) {
        Some(shares) => shares.iter().map(|share| format!("{share:.1}")).collect(),
        None => vec!["0".to_string(); dataset.values.len()],
    };
    let tooltip_labels = dataset
        .labels
        .iter()
        .zip(&dataset.values)
        .zip(&percentages)
        .map(|((label, value), share)| format!("{label}: {value} ({share}%)"))
        .collect();
    let background_color = dataset
        .colors
        .clone()
        .map(ColorValue::Palette)
        .or_else(|| dataset.series_color.clone().map(ColorValue::Single));

    ChartConfig {
        chart_type: ChartType::Doughnut,
        data: ChartData {
            labels: dataset.labels.clone(),
            datasets: vec![DatasetConfig {
                data: dataset.values.clone(),
                background_color,
                border_color: Some("#ffffff".to_string()),
                border_width: Some(2),
                ..Default::default()
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Legend {
                    display: true,
                    position: Some(LegendPosition::Bottom),
                    use_point_style: Some(true),
                },
                tooltip: Some(Tooltip {
                    mode: None,
                    intersect: None,
                    labels: tooltip_labels,
                }),
            },
            scales: None,
            interaction: None,
            animation: Some(Animation {
                duration: 1000,
                animate_rotate: Some(true),
                easing: None,
            }),
        },
    }
}

fn line(dataset: &ChartDataset) -> ChartConfig {
    ChartConfig {
        chart_type: ChartType::Line,
        data: ChartData {
            labels: dataset.labels.clone(),
            datasets: vec![DatasetConfig {
                label: Some(DAILY_SERIES_LABEL.to_string()),
                data: dataset.values.clone(),
                background_color: Some(ColorValue::Single(DAILY_FILL_COLOR.to_string())),
                border_color: Some(
                    dataset
                        .border_color
                        .clone()
                        .unwrap_or_else(|| DAILY_LINE_COLOR.to_string()),
                ),
                border_width: Some(3),
                fill: Some(true),
                tension: Some(0.4),
                point_background_color: Some(DAILY_LINE_COLOR.to_string()),
                point_radius: Some(5),
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Legend {
                    display: false,
                    position: None,
                    use_point_style: None,
                },
                tooltip: Some(Tooltip {
                    mode: Some(InteractionMode::Index),
                    intersect: Some(false),
                    labels: Vec::new(),
                }),
            },
            scales: Some(Scales {
                x: Axis {
                    grid: Some(Grid {
                        display: Some(false),
                        color: None,
                    }),
                    ..Default::default()
                },
                y: Axis {
                    begin_at_zero: Some(true),
                    grid: Some(Grid {
                        display: None,
                        color: Some("rgba(0, 0, 0, 0.1)".to_string()),
                    }),
                    ticks: Some(Ticks { step_size: 1.0 }),
                },
            }),
            interaction: Some(Interaction {
                mode: InteractionMode::Index,
                intersect: false,
            }),
            animation: Some(Animation {
                duration: 1500,
                animate_rotate: None,
                easing: Some("easeInOutQuart".to_string()),
            }),
        },
    }
}

fn bar(dataset: &ChartDataset) -> ChartConfig {
    let color = dataset
        .series_color
        .clone()
        .unwrap_or_else(|| BAR_COLOR.to_string());

    ChartConfig {
        chart_type: ChartType::Bar,
        data: ChartData {
            labels: dataset.labels.clone(),
            datasets: vec![DatasetConfig {
                data: dataset.values.clone(),
                background_color: Some(ColorValue::Single(color)),
                ..Default::default()
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Legend {
                    display: false,
                    position: None,
                    use_point_style: None,
                },
                tooltip: None,
            },
            scales: Some(Scales {
                x: Axis::default(),
                y: Axis {
                    begin_at_zero: Some(true),
                    ..Default::default()
                },
            }),
            interaction: None,
            animation: None,
        },
    }
}
