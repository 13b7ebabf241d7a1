// Widget kinds and lifecycle state
use super::chart::{ChartDataset, Slot};
use super::customer::CustomerStats;
use super::error::WidgetError;
use serde::{Deserialize, Serialize};

pub type WidgetId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    StatesChart,
    DailyActivity,
    TechniciansBar,
    CustomerStats,
}

/// Placeholder texts for one widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetMessages {
    pub no_data: &'static str,
    pub error: &'static str,
}

impl WidgetKind {
    /// Name the host registers the component under.
    pub fn registry_key(self) -> &'static str {
        match self {
            WidgetKind::StatesChart => "repair_states_chart",
            WidgetKind::DailyActivity => "daily_activity_chart",
            WidgetKind::TechniciansBar => "mobile_repair_orders_repair_bar",
            WidgetKind::CustomerStats => "customer_repair_stats",
        }
    }

    /// Element the widget draws into; it must exist on the page to attach.
    pub fn anchor(self) -> &'static str {
        match self {
            WidgetKind::StatesChart => "states_chart_canvas",
            WidgetKind::DailyActivity => "daily_chart_canvas",
            WidgetKind::TechniciansBar => "repair_bar_canvas",
            WidgetKind::CustomerStats => "recent_repairs_container",
        }
    }

    pub fn slot(self) -> Option<Slot> {
        match self {
            WidgetKind::StatesChart => Some(Slot::StatesChart),
            WidgetKind::DailyActivity => Some(Slot::DailyActivity),
            WidgetKind::TechniciansBar => Some(Slot::BarSeries),
            WidgetKind::CustomerStats => None,
        }
    }

    pub fn messages(self) -> WidgetMessages {
        match self {
            WidgetKind::StatesChart => WidgetMessages {
                no_data: "No hay datos de estados para mostrar",
                error: "Error al cargar gráfico de estados",
            },
            WidgetKind::DailyActivity => WidgetMessages {
                no_data: "No hay datos de actividad para mostrar",
                error: "Error al cargar gráfico de actividad",
            },
            WidgetKind::TechniciansBar => WidgetMessages {
                no_data: "No hay órdenes activas por técnico",
                error: "Error al cargar gráfico de técnicos",
            },
            WidgetKind::CustomerStats => WidgetMessages {
                no_data: "No hay reparaciones registradas",
                error: "Error al cargar estadísticas del cliente",
            },
        }
    }
}

/// Where the recent-repairs fragment of a counter widget stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "html", rename_all = "snake_case")]
pub enum RecentRepairsState {
    Pending,
    Loaded(String),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPayload {
    Chart(ChartDataset),
    Counters {
        stats: CustomerStats,
        recent: RecentRepairsState,
    },
}

/// Exactly one of these is active per widget at any time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum WidgetViewState {
    Loading,
    Rendered(RenderPayload),
    Empty,
    Error(WidgetError),
}

impl WidgetViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetViewState::Loading)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WidgetViewState::Loading => "loading",
            WidgetViewState::Rendered(_) => "rendered",
            WidgetViewState::Empty => "empty",
            WidgetViewState::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_KINDS: [WidgetKind; 4] = [
        WidgetKind::StatesChart,
        WidgetKind::DailyActivity,
        WidgetKind::TechniciansBar,
        WidgetKind::CustomerStats,
    ];

    #[test]
    fn test_anchors_and_keys_are_unique() {
        let anchors: HashSet<_> = ALL_KINDS.iter().map(|k| k.anchor()).collect();
        let keys: HashSet<_> = ALL_KINDS.iter().map(|k| k.registry_key()).collect();
        assert_eq!(anchors.len(), ALL_KINDS.len());
        assert_eq!(keys.len(), ALL_KINDS.len());
    }

    #[test]
    fn test_only_chart_kinds_bind_a_slot() {
        assert_eq!(WidgetKind::CustomerStats.slot(), None);
        assert_eq!(WidgetKind::TechniciansBar.slot(), Some(Slot::BarSeries));
    }
}
