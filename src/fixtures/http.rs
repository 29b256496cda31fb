use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use super::{FixtureError, FixtureSource};

/// Loads fixtures from a web server hosting the portal's static files.
pub struct HttpFixtureSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFixtureSource {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let timeout = Duration::from_millis(timeout_ms.max(1));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build fixture HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl FixtureSource for HttpFixtureSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, path: &str) -> Result<Value, FixtureError> {
        let transport = |source| FixtureError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self
            .http
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FixtureError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(FixtureError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|source| FixtureError::Parse {
            path: path.to_string(),
            source,
        })
    }
}
