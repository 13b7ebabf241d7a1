// HTTP asset loader for the chart library script
use crate::application::library_loader::AssetLoader;
use crate::domain::error::LibraryLoadError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpAssetLoader {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAssetLoader {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn asset_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn load_script(&self, url: &str) -> Result<(), LibraryLoadError> {
        let full_url = self.asset_url(url);
        let unavailable = |reason: String| LibraryLoadError::Unavailable {
            url: full_url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&full_url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LibraryLoadError::Status {
                url: full_url.clone(),
                status: response.status().as_u16(),
            });
        }

        let script = response.bytes().await.map_err(|e| unavailable(e.to_string()))?;
        tracing::info!("Loaded chart library {} ({} bytes)", full_url, script.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_loads_relative_asset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web/static/lib/Chart/Chart.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("window.Chart = {};"))
            .expect(1)
            .mount(&server)
            .await;

        let loader = HttpAssetLoader::new(&server.uri(), reqwest::Client::new());

        assert!(loader.load_script("/web/static/lib/Chart/Chart.js").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_asset_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let loader = HttpAssetLoader::new(&server.uri(), reqwest::Client::new());
        let err = loader.load_script("/missing.js").await.unwrap_err();

        assert!(matches!(err, LibraryLoadError::Status { status: 404, .. }));
    }
}
