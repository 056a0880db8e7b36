use super::DataSource;
use crate::error::LookupError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Data served from a static host.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LookupError::Fetch {
                path: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LookupError> {
        let url = self.locate(path);
        let fetch_error = |source| LookupError::Fetch {
            path: path.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(fetch_error)?;
        if !response.status().is_success() {
            return Err(LookupError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(fetch_error)
    }

    async fn exists(&self, path: &str) -> bool {
        match self.client.head(self.locate(path)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Probe for {} failed: {}", path, e);
                false
            }
        }
    }

    fn locate(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
