//! Resource retrieval for the loader.

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::model::{LoaderResult, ResourceRef};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// The host's fetch mechanism.
///
/// A non-success outcome (HTTP status or missing file) must surface as
/// [`LoaderError::Fetch`] so the body is never handed to the parser.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, resource: &ResourceRef) -> impl Future<Output = LoaderResult<Vec<u8>>> + Send;
}

/// Fetcher using reqwest for URLs and tokio file I/O for paths.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl HttpFetcher {
    pub fn new(config: &LoaderConfig) -> LoaderResult<Self> {
        config.validate()?;
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| LoaderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpFetcher {
            client,
            base_dir: config.base_dir.clone(),
        })
    }

    async fn fetch_url(&self, url: &str) -> LoaderResult<Vec<u8>> {
        trace!(url = url, "HTTP GET request starting");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(
                url = url,
                error = %e,
                is_connect = e.is_connect(),
                is_timeout = e.is_timeout(),
                "HTTP request failed"
            );
            LoaderError::Network(e.to_string())
        })?;

        if !response.status().is_success() {
            warn!(url = url, status = response.status().as_u16(), "HTTP error status");
            return Err(LoaderError::Fetch);
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(url = url, error = %e, "Failed to read response body");
            LoaderError::Network(e.to_string())
        })?;
        debug!(url = url, bytes = bytes.len(), "HTTP response body read");
        Ok(bytes.to_vec())
    }

    async fn read_file(&self, path: &Path) -> LoaderResult<Vec<u8>> {
        trace!(path = %path.display(), "Reading local resource");

        match tokio::fs::read(path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Local resource read");
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Local resource not found");
                Err(LoaderError::Fetch)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read local resource");
                Err(LoaderError::Network(e.to_string()))
            }
        }
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, resource: &ResourceRef) -> LoaderResult<Vec<u8>> {
        match resource {
            ResourceRef::Http(url) => self.fetch_url(url).await,
            ResourceRef::Local(_) => {
                let path = resource
                    .resolve_path(self.base_dir.as_deref())
                    .ok_or_else(|| LoaderError::InvalidResource(resource.to_string()))?;
                self.read_file(&path).await
            }
        }
    }
}
