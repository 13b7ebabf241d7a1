// Domain layer - Chart data, widget state and view models
pub mod chart;
pub mod customer;
pub mod error;
pub mod page;
pub mod view;
pub mod widget;
