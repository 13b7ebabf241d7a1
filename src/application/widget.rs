// Widget - lifecycle state machine for one mounted widget
use crate::application::data_source::DataSource;
use crate::application::library_loader::ChartLibraryLoader;
use crate::application::renderer::{draw, render_view};
use crate::application::surface::HostPage;
use crate::domain::chart::Slot;
use crate::domain::error::{RenderTargetMissing, WidgetError};
use crate::domain::widget::{RecentRepairsState, RenderPayload, WidgetId, WidgetKind, WidgetViewState};
use crate::infrastructure::config::{EndpointSettings, expand_template};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Collaborators shared by every widget of a page session.
#[derive(Clone)]
pub struct WidgetContext {
    pub source: Arc<dyn DataSource>,
    pub library: Arc<ChartLibraryLoader>,
    pub endpoints: EndpointSettings,
}

struct Lifecycle {
    state: WidgetViewState,
    cycle: u64,
    destroyed: bool,
}

pub struct Widget {
    id: WidgetId,
    kind: WidgetKind,
    record_id: Option<u64>,
    context: WidgetContext,
    page: Arc<dyn HostPage>,
    lifecycle: Mutex<Lifecycle>,
}

impl Widget {
    pub fn new(
        id: WidgetId,
        kind: WidgetKind,
        record_id: Option<u64>,
        context: WidgetContext,
        page: Arc<dyn HostPage>,
    ) -> Self {
        Self {
            id,
            kind,
            record_id,
            context,
            page,
            lifecycle: Mutex::new(Lifecycle {
                state: WidgetViewState::Loading,
                cycle: 0,
                destroyed: false,
            }),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn record_id(&self) -> Option<u64> {
        self.record_id
    }

    pub async fn state(&self) -> WidgetViewState {
        self.lifecycle.lock().await.state.clone()
    }

    pub async fn is_destroyed(&self) -> bool {
        self.lifecycle.lock().await.destroyed
    }

    /// Mark the widget unmounted. Operations still in flight complete but
    /// their results are dropped.
    pub async fn destroy(&self) {
        self.lifecycle.lock().await.destroyed = true;
        tracing::debug!("Widget {} ({}) destroyed", self.id, self.kind.registry_key());
    }

    /// Re-enter `Loading` and run one fetch cycle to completion.
    pub async fn refresh(&self) {
        let Some(cycle) = self.begin_cycle().await else {
            return;
        };

        match (self.kind.slot(), self.record_id) {
            (Some(slot), _) => {
                let outcome = self.load_chart(slot).await;
                self.settle(cycle, outcome).await;
            }
            (None, Some(customer_id)) => self.load_counters(cycle, customer_id).await,
            (None, None) => {
                tracing::debug!("Widget {} has no record to load stats for", self.id);
                self.settle(cycle, Ok(WidgetViewState::Empty)).await;
            }
        }
    }

    async fn begin_cycle(&self) -> Option<u64> {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.destroyed {
            return None;
        }
        lifecycle.cycle += 1;
        lifecycle.state = WidgetViewState::Loading;
        Some(lifecycle.cycle)
    }

    async fn load_chart(&self, slot: Slot) -> Result<WidgetViewState, WidgetError> {
        let (library, response) = tokio::join!(
            self.context.library.ensure_loaded(),
            self.context
                .source
                .fetch_aggregated(&self.context.endpoints.chart_data, json!({})),
        );
        library?;

        Ok(match response?.take(slot) {
            Some(dataset) if !dataset.is_empty() => {
                WidgetViewState::Rendered(RenderPayload::Chart(dataset))
            }
            _ => WidgetViewState::Empty,
        })
    }

    async fn load_counters(&self, cycle: u64, customer_id: u64) {
        let vars = HashMap::from([("customer_id".to_string(), customer_id.to_string())]);
        let endpoints = &self.context.endpoints;

        let stats_endpoint = expand_template(&endpoints.customer_stats, &vars);
        let stats = match self.context.source.fetch_customer_stats(&stats_endpoint).await {
            Ok(stats) => stats,
            Err(e) => {
                self.settle(cycle, Err(e.into())).await;
                return;
            }
        };

        let counters = WidgetViewState::Rendered(RenderPayload::Counters {
            stats,
            recent: RecentRepairsState::Pending,
        });
        if !self.settle(cycle, Ok(counters)).await {
            return;
        }

        let recent_endpoint = expand_template(&endpoints.recent_repairs, &vars);
        let recent = match self.context.source.fetch_recent_repairs(&recent_endpoint).await {
            Ok(recent) => RecentRepairsState::Loaded(recent.html),
            Err(e) => {
                tracing::warn!("Error loading recent repairs for customer {}: {}", customer_id, e);
                RecentRepairsState::Failed
            }
        };

        let counters = WidgetViewState::Rendered(RenderPayload::Counters { stats, recent });
        self.settle(cycle, Ok(counters)).await;
    }

    /// Commit the outcome of `cycle` and paint it. Returns false when the
    /// widget was destroyed or a newer cycle started in the meantime.
    async fn settle(&self, cycle: u64, outcome: Result<WidgetViewState, WidgetError>) -> bool {
        let state = outcome.unwrap_or_else(|e| {
            tracing::warn!(
                "Widget {} ({}) failed: {}",
                self.id,
                self.kind.registry_key(),
                e
            );
            WidgetViewState::Error(e)
        });

        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.destroyed || lifecycle.cycle != cycle {
            tracing::debug!(
                "Discarding result of cycle {} for widget {} (destroyed={}, current cycle={})",
                cycle,
                self.id,
                lifecycle.destroyed,
                lifecycle.cycle
            );
            return false;
        }

        lifecycle.state = state;
        if let Err(e) = self.paint(&lifecycle.state) {
            tracing::debug!("Widget {} skipped render: {}", self.id, e);
        }
        true
    }

    fn paint(&self, state: &WidgetViewState) -> Result<(), RenderTargetMissing> {
        let anchor = self.kind.anchor();
        let surface = self.page.surface(anchor).ok_or_else(|| RenderTargetMissing {
            anchor: anchor.to_string(),
        })?;
        draw(surface.as_ref(), &render_view(state, self.kind));
        Ok(())
    }
}
