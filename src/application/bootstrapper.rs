// Dashboard bootstrapper - attaches widgets to pages and refreshes them
use crate::application::surface::HostPage;
use crate::application::widget::{Widget, WidgetContext};
use crate::domain::page::PageDescriptor;
use crate::domain::widget::{WidgetId, WidgetKind};
use futures::future::join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Decides whether a widget kind applies to a page.
pub type Detector = fn(&PageDescriptor) -> bool;

pub struct WidgetRegistry {
    entries: Vec<(WidgetKind, Detector)>,
}

impl WidgetRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(mut self, kind: WidgetKind, detector: Detector) -> Self {
        self.entries.push((kind, detector));
        self
    }

    fn matching<'a>(&'a self, page: &'a PageDescriptor) -> impl Iterator<Item = WidgetKind> + 'a {
        self.entries
            .iter()
            .filter(move |(_, detect)| detect(page))
            .map(|(kind, _)| *kind)
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::empty()
            .register(WidgetKind::StatesChart, PageDescriptor::is_repair_dashboard)
            .register(WidgetKind::DailyActivity, PageDescriptor::is_repair_dashboard)
            .register(WidgetKind::TechniciansBar, PageDescriptor::is_repair_dashboard)
            .register(WidgetKind::CustomerStats, PageDescriptor::is_partner_form)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub initial_delay: Duration,
    pub refresh_debounce: Duration,
}

/// A widget together with the page URL it was attached for.
#[derive(Clone)]
struct Mounted {
    url: String,
    widget: Arc<Widget>,
}

pub struct DashboardBootstrapper {
    registry: WidgetRegistry,
    context: WidgetContext,
    timing: Timing,
    widgets: Arc<RwLock<Vec<Mounted>>>,
    next_id: AtomicU64,
    refresh_pending: Arc<AtomicBool>,
}

impl DashboardBootstrapper {
    pub fn new(registry: WidgetRegistry, context: WidgetContext, timing: Timing) -> Self {
        Self {
            registry,
            context,
            timing,
            widgets: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(1),
            refresh_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Instantiate every registered widget that applies to `page` and whose
    /// anchor is present. Detection is best effort: a miss only means the
    /// widget does not attach. Widgets previously attached for the same URL
    /// are destroyed and replaced.
    pub async fn attach(&self, page: &PageDescriptor, host: Arc<dyn HostPage>) -> Vec<Arc<Widget>> {
        let attached: Vec<Arc<Widget>> = self
            .registry
            .matching(page)
            .filter(|kind| {
                let present = page.has_anchor(kind.anchor());
                if !present {
                    tracing::debug!(
                        "Skipping {} on {}: anchor {} not present",
                        kind.registry_key(),
                        page.url,
                        kind.anchor()
                    );
                }
                present
            })
            .map(|kind| {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                Arc::new(Widget::new(
                    id,
                    kind,
                    page.record_id(),
                    self.context.clone(),
                    host.clone(),
                ))
            })
            .collect();

        let replaced: Vec<Arc<Widget>> = {
            let mut widgets = self.widgets.write().await;
            let (stale, kept): (Vec<Mounted>, Vec<Mounted>) =
                widgets.drain(..).partition(|mounted| mounted.url == page.url);
            *widgets = kept;
            widgets.extend(attached.iter().map(|widget| Mounted {
                url: page.url.clone(),
                widget: widget.clone(),
            }));
            stale.into_iter().map(|mounted| mounted.widget).collect()
        };
        for widget in &replaced {
            widget.destroy().await;
        }

        tracing::info!(
            "Attached {} widget(s) to {} (replaced {})",
            attached.len(),
            page.url,
            replaced.len()
        );
        attached
    }

    /// Attach widgets for a page that just finished loading and schedule their
    /// first refresh after the initial delay.
    pub async fn page_ready(
        &self,
        page: &PageDescriptor,
        host: Arc<dyn HostPage>,
    ) -> (Vec<Arc<Widget>>, JoinHandle<()>) {
        let attached = self.attach(page, host).await;
        let delay = self.timing.initial_delay;
        let library = self.context.library.clone();
        let first = attached.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            library.retry_failed();
            join_all(first.iter().map(|widget| widget.refresh())).await;
        });
        (attached, handle)
    }

    /// Refresh every attached widget after the debounce delay. Calls made
    /// while a refresh is already scheduled join that refresh. Each pass
    /// retries a chart library load that failed earlier.
    pub fn refresh_all(&self) -> Option<JoinHandle<()>> {
        if self.refresh_pending.swap(true, Ordering::AcqRel) {
            tracing::debug!("Refresh already scheduled");
            return None;
        }

        let widgets = self.widgets.clone();
        let library = self.context.library.clone();
        let pending = self.refresh_pending.clone();
        let delay = self.timing.refresh_debounce;
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.store(false, Ordering::Release);

            let snapshot = widgets.read().await.clone();
            tracing::info!("Refreshing {} widget(s)", snapshot.len());
            library.retry_failed();
            join_all(snapshot.iter().map(|mounted| mounted.widget.refresh())).await;
        }))
    }

    pub async fn widgets(&self) -> Vec<Arc<Widget>> {
        self.widgets
            .read()
            .await
            .iter()
            .map(|mounted| mounted.widget.clone())
            .collect()
    }

    pub async fn widget(&self, id: WidgetId) -> Option<Arc<Widget>> {
        self.widgets
            .read()
            .await
            .iter()
            .find(|mounted| mounted.widget.id() == id)
            .map(|mounted| mounted.widget.clone())
    }

    /// Unmount a widget. Returns false if no such widget is attached.
    pub async fn detach(&self, id: WidgetId) -> bool {
        let removed = {
            let mut widgets = self.widgets.write().await;
            widgets
                .iter()
                .position(|mounted| mounted.widget.id() == id)
                .map(|index| widgets.remove(index))
        };

        match removed {
            Some(mounted) => {
                mounted.widget.destroy().await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::library_loader::ChartLibraryLoader;
    use crate::application::testing::{CountingAssets, ScriptedSource};
    use crate::domain::widget::WidgetViewState;
    use crate::infrastructure::config::EndpointSettings;
    use crate::infrastructure::memory_surface::MemoryPage;
    use serde_json::json;

    fn bootstrapper(source: ScriptedSource) -> (DashboardBootstrapper, Arc<ScriptedSource>) {
        bootstrapper_with_assets(source, Arc::new(CountingAssets::succeeding()))
    }

    fn bootstrapper_with_assets(
        source: ScriptedSource,
        assets: Arc<CountingAssets>,
    ) -> (DashboardBootstrapper, Arc<ScriptedSource>) {
        let source = Arc::new(source);
        let context = WidgetContext {
            source: source.clone(),
            library: Arc::new(ChartLibraryLoader::new(assets, "/chart.js")),
            endpoints: EndpointSettings::default(),
        };
        let timing = Timing {
            initial_delay: Duration::from_millis(1000),
            refresh_debounce: Duration::from_millis(500),
        };
        (
            DashboardBootstrapper::new(WidgetRegistry::default(), context, timing),
            source,
        )
    }

    fn dashboard_page() -> PageDescriptor {
        PageDescriptor::new("/odoo/action-repair.dashboard")
            .with_anchor("states_chart_canvas")
            .with_anchor("daily_chart_canvas")
    }

    fn chart_source() -> ScriptedSource {
        ScriptedSource::new().respond(
            "/repair/dashboard/chart_data",
            Ok(json!({
                "states_chart": {"labels": ["Draft"], "data": [1]},
                "daily_activity": {"labels": ["01/10"], "data": [1]}
            })),
        )
    }

    #[tokio::test]
    async fn test_attaches_only_widgets_with_anchors() {
        let (bootstrapper, _) = bootstrapper(chart_source());
        let page = dashboard_page();
        let host = Arc::new(MemoryPage::from_descriptor(&page));

        let attached = bootstrapper.attach(&page, host).await;

        let kinds: Vec<WidgetKind> = attached.iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec![WidgetKind::StatesChart, WidgetKind::DailyActivity]);
    }

    #[tokio::test]
    async fn test_unrelated_page_attaches_nothing() {
        let (bootstrapper, _) = bootstrapper(chart_source());
        let page = PageDescriptor::new("/odoo/discuss").with_anchor("states_chart_canvas");

        let attached = bootstrapper
            .attach(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;

        assert!(attached.is_empty());
    }

    #[tokio::test]
    async fn test_partner_form_attaches_stats_with_record_id() {
        let (bootstrapper, _) = bootstrapper(ScriptedSource::new());
        let page = PageDescriptor::new("/web#id=42&model=res.partner&view_type=form")
            .with_anchor("recent_repairs_container");

        let attached = bootstrapper
            .attach(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;

        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].kind(), WidgetKind::CustomerStats);
        assert_eq!(attached[0].record_id(), Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_ready_refreshes_after_initial_delay() {
        let (bootstrapper, source) = bootstrapper(chart_source());
        let page = dashboard_page();

        let (attached, ready) = bootstrapper
            .page_ready(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;
        assert!(attached[0].state().await.is_loading());

        ready.await.unwrap();

        assert_eq!(source.calls("/repair/dashboard/chart_data"), 2);
        for widget in attached {
            assert!(matches!(widget.state().await, WidgetViewState::Rendered(_)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_all_coalesces_calls_within_debounce() {
        let (bootstrapper, source) = bootstrapper(chart_source());
        let page = dashboard_page();
        bootstrapper
            .attach(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;

        let first = bootstrapper.refresh_all();
        let second = bootstrapper.refresh_all();
        assert!(first.is_some());
        assert!(second.is_none());
        first.unwrap().await.unwrap();

        assert_eq!(source.calls("/repair/dashboard/chart_data"), 2);

        bootstrapper.refresh_all().unwrap().await.unwrap();
        assert_eq!(source.calls("/repair/dashboard/chart_data"), 4);
    }

    #[tokio::test]
    async fn test_detach_destroys_widget() {
        let (bootstrapper, _) = bootstrapper(chart_source());
        let page = dashboard_page();
        let attached = bootstrapper
            .attach(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;
        let id = attached[0].id();

        assert!(bootstrapper.detach(id).await);
        assert!(!bootstrapper.detach(id).await);
        assert!(attached[0].is_destroyed().await);
        assert_eq!(bootstrapper.widgets().await.len(), 1);
        assert!(bootstrapper.widget(id).await.is_none());
    }

    #[tokio::test]
    async fn test_remounting_a_page_replaces_its_widgets() {
        let (bootstrapper, _) = bootstrapper(chart_source());
        let page = dashboard_page();
        let partner = PageDescriptor::new("/web#id=9&model=res.partner&view_type=form")
            .with_anchor("recent_repairs_container");

        let first = bootstrapper
            .attach(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;
        bootstrapper
            .attach(&partner, Arc::new(MemoryPage::from_descriptor(&partner)))
            .await;
        let second = bootstrapper
            .attach(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;

        assert_eq!(bootstrapper.widgets().await.len(), 3);
        for widget in &first {
            assert!(widget.is_destroyed().await);
            assert!(bootstrapper.widget(widget.id()).await.is_none());
        }
        for widget in &second {
            assert!(!widget.is_destroyed().await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_library_load_is_shared_by_a_pass_and_retried_by_the_next() {
        let assets = Arc::new(CountingAssets::failing());
        let (bootstrapper, _) = bootstrapper_with_assets(chart_source(), assets.clone());
        let page = dashboard_page().with_anchor("repair_bar_canvas");
        let (attached, ready) = bootstrapper
            .page_ready(&page, Arc::new(MemoryPage::from_descriptor(&page)))
            .await;
        ready.await.unwrap();

        assert_eq!(attached.len(), 3);
        assert_eq!(assets.loads(), 1);

        // A single widget refresh outside a pass reuses the failure.
        attached[0].refresh().await;
        assert_eq!(assets.loads(), 1);

        bootstrapper.refresh_all().unwrap().await.unwrap();
        assert_eq!(assets.loads(), 2);
        for widget in attached {
            assert!(matches!(widget.state().await, WidgetViewState::Error(_)));
        }
    }

    #[tokio::test]
    async fn test_sibling_failure_does_not_affect_other_widgets() {
        let source = ScriptedSource::new()
            .respond(
                "/repair/dashboard/chart_data",
                Ok(json!({"states_chart": {"labels": ["Draft"], "data": [1]}})),
            )
            .respond(
                "/repair/customer/9/stats",
                Err(crate::domain::error::FetchError::Network("reset".to_string())),
            );
        let (bootstrapper, _) = bootstrapper(source);

        let dashboard = dashboard_page();
        let partner = PageDescriptor::new("/web#id=9&model=res.partner&view_type=form")
            .with_anchor("recent_repairs_container");
        let mut attached = bootstrapper
            .attach(&dashboard, Arc::new(MemoryPage::from_descriptor(&dashboard)))
            .await;
        attached.extend(
            bootstrapper
                .attach(&partner, Arc::new(MemoryPage::from_descriptor(&partner)))
                .await,
        );

        join_all(attached.iter().map(|w| w.refresh())).await;

        assert!(matches!(attached[0].state().await, WidgetViewState::Rendered(_)));
        assert_eq!(attached[1].state().await, WidgetViewState::Empty);
        assert!(matches!(attached[2].state().await, WidgetViewState::Error(_)));
    }
}
