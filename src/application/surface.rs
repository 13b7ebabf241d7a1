// Rendering surfaces owned by the host page
use crate::domain::view::{ChartConfig, Placeholder};
use std::sync::Arc;

/// Container a single widget draws into. Each surface belongs to exactly one
/// widget.
pub trait Surface: Send + Sync {
    /// Tear down the chart currently bound to this surface, if any.
    fn destroy_chart(&self);

    fn mount_chart(&self, config: ChartConfig);

    /// Replace the container content with a placeholder.
    fn show_placeholder(&self, placeholder: Placeholder);

    fn set_text(&self, slot: &str, text: &str);

    fn set_html(&self, slot: &str, html: &str);
}

/// Lookup of surfaces by anchor id. A missing anchor means the view is gone.
pub trait HostPage: Send + Sync {
    fn surface(&self, anchor: &str) -> Option<Arc<dyn Surface>>;
}
