use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{ArchiveError, ArchiveResult};

/// Where the exported JSON documents are read from.
///
/// Paths are relative and `/`-separated, e.g. `general/2021-01-05.json`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn fetch(&self, path: &str) -> ArchiveResult<Value>;

    fn describe(&self) -> String;
}

/// Archive unpacked on the local filesystem
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArchiveSource for FsSource {
    async fn fetch(&self, path: &str) -> ArchiveResult<Value> {
        if path.split('/').any(|part| part == "..") {
            return Err(ArchiveError::InvalidParameter(format!(
                "Path escapes archive root: {}",
                path
            )));
        }

        let full_path = self.root.join(path);
        debug!("Reading {}", full_path.display());

        let bytes = match tokio::fs::read(&full_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArchiveError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Archive published as static files behind a web server
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> ArchiveResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ArchiveSource for HttpSource {
    async fn fetch(&self, path: &str) -> ArchiveResult<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ArchiveError::NotFound(path.to_string()));
        }

        let response = response.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pick a source for the configured archive root
pub fn open_source(config: &Config) -> ArchiveResult<Box<dyn ArchiveSource>> {
    let root = config.archive.root.as_str();
    if root.starts_with("http://") || root.starts_with("https://") {
        let timeout = Duration::from_secs(config.connection.timeout_seconds);
        Ok(Box::new(HttpSource::new(root, timeout)?))
    } else {
        Ok(Box::new(FsSource::new(root)))
    }
}
