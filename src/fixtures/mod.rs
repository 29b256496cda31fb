pub mod dir;
pub mod http;
#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use dir::DirFixtureSource;
pub use http::HttpFixtureSource;

use crate::config::PortalConfig;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture request for {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fixture {path} returned status {status}")]
    Status { path: String, status: u16 },
    #[error("fixture {path} could not be read: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("fixture {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("fixture {0} not found")]
    NotFound(String),
}

/// Somewhere fixture documents can be loaded from by their site-relative path.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Value, FixtureError>;
}

pub type SharedFixtureSource = Arc<dyn FixtureSource>;

/// HTTP(S) bases go through reqwest; anything else is a local directory root.
pub fn build_fixture_source(config: &PortalConfig) -> anyhow::Result<SharedFixtureSource> {
    let base = config.fixture_base.trim();
    if base.starts_with("http://") || base.starts_with("https://") {
        let source = HttpFixtureSource::new(base, config.http_timeout_ms)?;
        Ok(Arc::new(source))
    } else {
        Ok(Arc::new(DirFixtureSource::new(base)))
    }
}
