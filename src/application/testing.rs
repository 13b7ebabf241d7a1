// Test doubles for data sources and asset loaders
use crate::application::data_source::DataSource;
use crate::application::library_loader::AssetLoader;
use crate::domain::error::{FetchError, LibraryLoadError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Lets a test hold a call open until it decides to release it.
#[derive(Default)]
pub struct CallGate {
    pub started: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct ScriptedSource {
    responses: HashMap<String, Result<Value, FetchError>>,
    gates: HashMap<String, Arc<CallGate>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, endpoint: &str, response: Result<Value, FetchError>) -> Self {
        self.responses.insert(endpoint.to_string(), response);
        self
    }

    pub fn gate(&mut self, endpoint: &str) -> Arc<CallGate> {
        self.gates
            .entry(endpoint.to_string())
            .or_default()
            .clone()
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn call(&self, endpoint: &str, _params: Value) -> Result<Value, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default() += 1;

        if let Some(gate) = self.gates.get(endpoint) {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        self.responses
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Network(format!("no route to {endpoint}"))))
    }
}

pub struct CountingAssets {
    fail: bool,
    loads: AtomicUsize,
}

impl CountingAssets {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetLoader for CountingAssets {
    async fn load_script(&self, url: &str) -> Result<(), LibraryLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail {
            Err(LibraryLoadError::Status {
                url: url.to_string(),
                status: 404,
            })
        } else {
            Ok(())
        }
    }
}
