use thiserror::Error;

/// Why a page could not be fetched from the feed API.
///
/// Every variant is displayable as-is in the status bar.  Missing optional
/// fields on an item are never errors and never reach this type.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feed API returned HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("fetch task failed: {0}")]
    Worker(String),
}

impl FetchError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}
