// Data source trait for the aggregation endpoints
use crate::domain::chart::AggregatedResponse;
use crate::domain::customer::{CustomerStats, RecentRepairs};
use crate::domain::error::FetchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Issue exactly one call to `endpoint` and return the envelope's `result`.
    /// Never retries.
    async fn call(&self, endpoint: &str, params: Value) -> Result<Value, FetchError>;

    async fn fetch_aggregated(
        &self,
        endpoint: &str,
        params: Value,
    ) -> Result<AggregatedResponse, FetchError> {
        decode_result(self.call(endpoint, params).await?)
    }

    async fn fetch_customer_stats(&self, endpoint: &str) -> Result<CustomerStats, FetchError> {
        decode_result(self.call(endpoint, Value::Object(Default::default())).await?)
    }

    async fn fetch_recent_repairs(&self, endpoint: &str) -> Result<RecentRepairs, FetchError> {
        decode_result(self.call(endpoint, Value::Object(Default::default())).await?)
    }
}

fn decode_result<T: DeserializeOwned>(result: Value) -> Result<T, FetchError> {
    serde_json::from_value(result).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedSource;
    use crate::domain::chart::Slot;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_aggregated_decodes_result() {
        let source = ScriptedSource::new().respond(
            "/chart_data",
            Ok(json!({"states_chart": {"labels": ["Draft"], "data": [3]}})),
        );

        let response = source.fetch_aggregated("/chart_data", json!({})).await.unwrap();

        assert_eq!(response.slot(Slot::StatesChart).unwrap().values, vec![3.0]);
        assert_eq!(source.calls("/chart_data"), 1);
    }

    #[tokio::test]
    async fn test_unexpected_result_shape_is_decode_error() {
        let source = ScriptedSource::new().respond("/stats", Ok(json!("not an object")));

        let err = source.fetch_customer_stats("/stats").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }
}
