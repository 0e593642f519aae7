use crate::error::LoaderError;
use crate::model::LoaderResult;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("geojson-loader/", env!("CARGO_PKG_VERSION"));

/// Settings for the resource fetcher.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory relative resource paths resolve against. `None` means the
    /// process working directory.
    pub base_dir: Option<PathBuf>,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Route requests through proxies named by the environment.
    pub system_proxy: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            base_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            system_proxy: true,
        }
    }
}

impl LoaderConfig {
    pub fn from_json_str(content: &str) -> LoaderResult<Self> {
        let config: LoaderConfig = serde_json::from_str(content)
            .map_err(|e| LoaderError::Config(format!("Invalid loader config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LoaderResult<()> {
        if self.timeout_secs == 0 {
            return Err(LoaderError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(LoaderError::Config(
                "user_agent cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_system_proxy(mut self, system_proxy: bool) -> Self {
        self.system_proxy = system_proxy;
        self
    }
}
