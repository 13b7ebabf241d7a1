// Application layer - Widget lifecycle, rendering and page bootstrap
pub mod bootstrapper;
pub mod data_source;
pub mod library_loader;
pub mod renderer;
pub mod surface;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;
