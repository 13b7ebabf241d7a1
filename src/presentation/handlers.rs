// HTTP request handlers
use crate::application::renderer::render_view;
use crate::application::widget::Widget;
use crate::domain::page::PageDescriptor;
use crate::domain::view::WidgetView;
use crate::domain::widget::{WidgetId, WidgetKind};
use crate::infrastructure::memory_surface::MemoryPage;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct WidgetHandle {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub component: &'static str,
    pub anchor: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WidgetSnapshot {
    #[serde(flatten)]
    pub handle: WidgetHandle,
    pub state: &'static str,
    pub view: WidgetView,
}

fn handle(widget: &Widget) -> WidgetHandle {
    WidgetHandle {
        id: widget.id(),
        kind: widget.kind(),
        component: widget.kind().registry_key(),
        anchor: widget.kind().anchor(),
    }
}

async fn snapshot(widget: &Widget) -> WidgetSnapshot {
    let state = widget.state().await;
    WidgetSnapshot {
        handle: handle(widget),
        state: state.label(),
        view: render_view(&state, widget.kind()),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Mount a page: attach the widgets that apply and schedule their first load
pub async fn mount_page(
    State(state): State<Arc<AppState>>,
    Json(page): Json<PageDescriptor>,
) -> Json<Vec<WidgetHandle>> {
    let host = Arc::new(MemoryPage::from_descriptor(&page));
    let (attached, _ready) = state.bootstrapper.page_ready(&page, host).await;
    Json(attached.iter().map(|widget| handle(widget)).collect())
}

pub async fn list_widgets(State(state): State<Arc<AppState>>) -> Json<Vec<WidgetSnapshot>> {
    let mut snapshots = Vec::new();
    for widget in state.bootstrapper.widgets().await {
        snapshots.push(snapshot(&widget).await);
    }
    Json(snapshots)
}

pub async fn get_widget(
    Path(id): Path<WidgetId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WidgetSnapshot>, StatusCode> {
    match state.bootstrapper.widget(id).await {
        Some(widget) => Ok(Json(snapshot(&widget).await)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Unmount a widget
pub async fn delete_widget(
    Path(id): Path<WidgetId>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    if state.bootstrapper.detach(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Page-wide refresh of every attached widget
pub async fn refresh_all(State(state): State<Arc<AppState>>) -> StatusCode {
    state.bootstrapper.refresh_all();
    StatusCode::ACCEPTED
}
