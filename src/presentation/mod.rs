// Presentation layer - HTTP surface for the host page
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    delete_widget, get_widget, health_check, list_widgets, mount_page, refresh_all,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/pages", post(mount_page))
        .route("/widgets", get(list_widgets))
        .route("/widgets/:id", get(get_widget).delete(delete_widget))
        .route("/refresh", post(refresh_all))
        .with_state(state)
}
