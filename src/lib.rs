// Repair dashboard widgets - lifecycle, data refresh and chart view models
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
