// JSON-RPC client for the aggregation endpoints
use crate::application::data_source::DataSource;
use crate::domain::error::FetchError;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct JsonRpcClient {
    base_url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: &'a Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<RpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorData {
    #[serde(default)]
    message: Option<String>,
}

impl RpcError {
    fn describe(&self) -> String {
        let message = self
            .data
            .as_ref()
            .and_then(|d| d.message.as_deref())
            .or(self.message.as_deref())
            .unwrap_or("unknown server error");
        match self.code {
            Some(code) => format!("server error {}: {}", code, message),
            None => format!("server error: {}", message),
        }
    }
}

impl JsonRpcClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl DataSource for JsonRpcClient {
    async fn call(&self, endpoint: &str, params: Value) -> Result<Value, FetchError> {
        let url = self.endpoint_url(endpoint);
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params: &params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        tracing::debug!("Calling {} (id {})", url, request.id);
        let response = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&request)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Protocol(format!(
                "{} responded with status {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("{}: {}", url, e)))?;

        let envelope: RpcResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("{}: {}", url, e)))?;

        if let Some(error) = envelope.error {
            return Err(FetchError::Protocol(error.describe()));
        }

        envelope
            .result
            .ok_or_else(|| FetchError::Protocol(format!("{}: response envelope has no result", url)))
    }
}
