// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_asset_loader;
pub mod jsonrpc_client;
pub mod memory_surface;
