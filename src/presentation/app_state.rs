// Application state for HTTP handlers
use crate::application::bootstrapper::DashboardBootstrapper;

pub struct AppState {
    pub bootstrapper: DashboardBootstrapper,
}
