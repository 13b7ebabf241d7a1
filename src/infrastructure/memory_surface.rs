// In-memory surfaces for the headless host
use crate::application::surface::{HostPage, Surface};
use crate::domain::page::PageDescriptor;
use crate::domain::view::{ChartConfig, Placeholder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceContent {
    pub active_charts: Vec<ChartConfig>,
    pub charts_created: usize,
    pub charts_destroyed: usize,
    pub placeholder: Option<Placeholder>,
    pub texts: HashMap<String, String>,
    pub html: HashMap<String, String>,
    /// Total number of operations applied to the surface.
    pub mutations: usize,
}

impl SurfaceContent {
    pub fn text(&self, slot: &str) -> Option<&str> {
        self.texts.get(slot).map(String::as_str)
    }

    pub fn html(&self, slot: &str) -> Option<&str> {
        self.html.get(slot).map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    content: Mutex<SurfaceContent>,
}

impl MemorySurface {
    pub fn snapshot(&self) -> SurfaceContent {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceContent> {
        self.content.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Surface for MemorySurface {
    fn destroy_chart(&self) {
        let mut content = self.lock();
        content.mutations += 1;
        content.charts_destroyed += content.active_charts.len();
        content.active_charts.clear();
    }

    fn mount_chart(&self, config: ChartConfig) {
        let mut content = self.lock();
        content.mutations += 1;
        content.charts_created += 1;
        content.placeholder = None;
        content.active_charts.push(config);
    }

    fn show_placeholder(&self, placeholder: Placeholder) {
        let mut content = self.lock();
        content.mutations += 1;
        content.placeholder = Some(placeholder);
    }

    fn set_text(&self, slot: &str, text: &str) {
        let mut content = self.lock();
        content.mutations += 1;
        content.texts.insert(slot.to_string(), text.to_string());
    }

    fn set_html(&self, slot: &str, html: &str) {
        let mut content = self.lock();
        content.mutations += 1;
        content.html.insert(slot.to_string(), html.to_string());
    }
}

/// A page whose anchors each hold a `MemorySurface`.
#[derive(Debug, Default)]
pub struct MemoryPage {
    surfaces: RwLock<HashMap<String, Arc<MemorySurface>>>,
}

impl MemoryPage {
    pub fn from_descriptor(page: &PageDescriptor) -> Self {
        let surfaces = page
            .anchors
            .iter()
            .map(|anchor| (anchor.clone(), Arc::new(MemorySurface::default())))
            .collect();
        Self {
            surfaces: RwLock::new(surfaces),
        }
    }

    pub fn get(&self, anchor: &str) -> Option<Arc<MemorySurface>> {
        self.surfaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(anchor)
            .cloned()
    }

    pub fn unmount(&self, anchor: &str) -> Option<Arc<MemorySurface>> {
        self.surfaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(anchor)
    }
}

impl HostPage for MemoryPage {
    fn surface(&self, anchor: &str) -> Option<Arc<dyn Surface>> {
        self.get(anchor).map(|surface| surface as Arc<dyn Surface>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_exposes_descriptor_anchors() {
        let descriptor = PageDescriptor::new("/web").with_anchor("states_chart_canvas");
        let page = MemoryPage::from_descriptor(&descriptor);

        assert!(page.surface("states_chart_canvas").is_some());
        assert!(page.surface("daily_chart_canvas").is_none());

        page.unmount("states_chart_canvas");
        assert!(page.surface("states_chart_canvas").is_none());
    }

    #[test]
    fn test_destroy_counts_active_charts() {
        let surface = MemorySurface::default();
        surface.show_placeholder(Placeholder::no_data("x"));
        surface.destroy_chart();

        let content = surface.snapshot();
        assert_eq!(content.charts_destroyed, 0);
        assert_eq!(content.mutations, 2);
        assert!(content.placeholder.is_some());
    }
}
