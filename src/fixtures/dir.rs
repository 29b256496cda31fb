use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use super::{FixtureError, FixtureSource};

/// Reads fixtures from a directory laid out like the site's public root.
pub struct DirFixtureSource {
    root: PathBuf,
}

impl DirFixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl FixtureSource for DirFixtureSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, path: &str) -> Result<Value, FixtureError> {
        let file = self.resolve(path);
        let bytes = match tokio::fs::read(&file).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(FixtureError::NotFound(path.to_string()));
            }
            Err(source) => {
                return Err(FixtureError::Io {
                    path: path.to_string(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| FixtureError::Parse {
            path: path.to_string(),
            source,
        })
    }
}
