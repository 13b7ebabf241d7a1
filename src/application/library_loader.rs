// Chart library loader - one shared load per page session
use crate::domain::error::LibraryLoadError;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Host capability that fetches and evaluates a script asset.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load_script(&self, url: &str) -> Result<(), LibraryLoadError>;
}

type LoadFuture = Shared<BoxFuture<'static, Result<(), LibraryLoadError>>>;

enum Gate {
    Idle,
    Pending(LoadFuture),
    Loaded,
    Failed(LibraryLoadError),
}

/// Every caller awaits the same in-flight load. The outcome is remembered:
/// success for the lifetime of the loader, a failure until `retry_failed`
/// reopens the gate at the start of the next refresh pass.
pub struct ChartLibraryLoader {
    assets: Arc<dyn AssetLoader>,
    url: String,
    gate: Mutex<Gate>,
}

impl ChartLibraryLoader {
    pub fn new(assets: Arc<dyn AssetLoader>, url: impl Into<String>) -> Self {
        Self {
            assets,
            url: url.into(),
            gate: Mutex::new(Gate::Idle),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<(), LibraryLoadError> {
        let pending = {
            let mut gate = self.lock_gate();
            match &*gate {
                Gate::Loaded => return Ok(()),
                Gate::Failed(e) => return Err(e.clone()),
                Gate::Pending(load) => load.clone(),
                Gate::Idle => {
                    tracing::debug!("Loading chart library from {}", self.url);
                    let assets = self.assets.clone();
                    let url = self.url.clone();
                    let load = async move { assets.load_script(&url).await }
                        .boxed()
                        .shared();
                    *gate = Gate::Pending(load.clone());
                    load
                }
            }
        };

        let result = pending.clone().await;

        let mut gate = self.lock_gate();
        if let Gate::Pending(current) = &*gate {
            if current.ptr_eq(&pending) {
                *gate = match &result {
                    Ok(()) => Gate::Loaded,
                    Err(e) => {
                        tracing::warn!("Chart library load failed: {}", e);
                        Gate::Failed(e.clone())
                    }
                };
            }
        }
        result
    }

    /// Forget a failed load so the next `ensure_loaded` tries again. Has no
    /// effect while a load is in flight or after a successful one.
    pub fn retry_failed(&self) {
        let mut gate = self.lock_gate();
        if matches!(*gate, Gate::Failed(_)) {
            tracing::debug!("Retrying chart library load from {}", self.url);
            *gate = Gate::Idle;
        }
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        matches!(*self.lock_gate(), Gate::Loaded)
    }

    fn lock_gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
