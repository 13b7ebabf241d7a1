// Page descriptor - what the host tells us about the current view
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub url: String,
    /// Ids of the container elements present on the page.
    #[serde(default)]
    pub anchors: BTreeSet<String>,
}

impl PageDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anchors: BTreeSet::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchors.insert(anchor.into());
        self
    }

    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.anchors.contains(anchor)
    }

    pub fn is_repair_dashboard(&self) -> bool {
        self.url.contains("repair.dashboard") || self.has_anchor("o_repair_dashboard")
    }

    pub fn is_partner_form(&self) -> bool {
        self.url.contains("res.partner") && self.url.contains("view_type=form")
    }

    /// Record id carried by the `id` parameter of the query or fragment.
    pub fn record_id(&self) -> Option<u64> {
        self.url
            .split(['?', '#', '&'])
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "id")
            .and_then(|(_, value)| value.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_detection() {
        let page = PageDescriptor::new("/odoo/action-repair.dashboard");
        assert!(page.is_repair_dashboard());

        let page = PageDescriptor::new("/odoo/discuss").with_anchor("o_repair_dashboard");
        assert!(page.is_repair_dashboard());

        assert!(!PageDescriptor::new("/odoo/discuss").is_repair_dashboard());
    }

    #[test]
    fn test_partner_form_record_id() {
        let page = PageDescriptor::new("/web#id=42&model=res.partner&view_type=form");
        assert!(page.is_partner_form());
        assert_eq!(page.record_id(), Some(42));

        let page = PageDescriptor::new("/web#menu_id=3&id=7&model=res.partner&view_type=form");
        assert_eq!(page.record_id(), Some(7));
    }

    #[test]
    fn test_record_id_absent_or_invalid() {
        assert_eq!(PageDescriptor::new("/web#model=res.partner&view_type=form").record_id(), None);
        assert_eq!(PageDescriptor::new("/web#id=new&model=res.partner").record_id(), None);
    }
}
