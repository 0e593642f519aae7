use thiserror::Error;

/// Message surfaced when a resource answers with a non-success status.
pub const FETCH_FAILED_MESSAGE: &str = "Could not load the GeoJSON file.";

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("{}", FETCH_FAILED_MESSAGE)]
    Fetch,
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Render(String),
    #[error("invalid view: {0}")]
    View(String),
    #[error("invalid resource reference: {0}")]
    InvalidResource(String),
    #[error("no async runtime available: {0}")]
    Runtime(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Parse(err.to_string())
    }
}
