// Main entry point - Dependency injection and host server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use repair_widgets::application::bootstrapper::{DashboardBootstrapper, Timing, WidgetRegistry};
use repair_widgets::application::library_loader::ChartLibraryLoader;
use repair_widgets::application::widget::WidgetContext;
use repair_widgets::infrastructure::config::load_widgets_settings;
use repair_widgets::infrastructure::http_asset_loader::HttpAssetLoader;
use repair_widgets::infrastructure::jsonrpc_client::JsonRpcClient;
use repair_widgets::presentation::app_state::AppState;
use repair_widgets::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_widgets_settings()?;
    let server = &settings.server;

    // Create adapters (infrastructure layer)
    let source = Arc::new(JsonRpcClient::new(&server.base_url, server.request_timeout())?);
    let mut asset_client = reqwest::Client::builder();
    if let Some(timeout) = server.request_timeout() {
        asset_client = asset_client.timeout(timeout);
    }
    let assets = Arc::new(HttpAssetLoader::new(
        &server.base_url,
        asset_client.build().context("Failed to build asset client")?,
    ));

    // Create the page session (application layer)
    let context = WidgetContext {
        source,
        library: Arc::new(ChartLibraryLoader::new(assets, server.chart_library_url.clone())),
        endpoints: settings.endpoints.clone(),
    };
    let timing = Timing {
        initial_delay: settings.timing.initial_delay(),
        refresh_debounce: settings.timing.refresh_debounce(),
    };
    let state = Arc::new(AppState {
        bootstrapper: DashboardBootstrapper::new(WidgetRegistry::default(), context, timing),
    });

    // Build router (presentation layer)
    let app = router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = settings
        .host
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", settings.host.bind))?;
    tracing::info!("Starting repair widget host on {} (backend {})", addr, server.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
