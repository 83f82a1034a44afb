use thiserror::Error;

/// Errors from the Sonar data layer.
#[derive(Error, Debug)]
pub enum SonarError {
    /// The underlying fetch failed before a usable response existed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] fetch_cache::FetchError),
    /// Sonar rejected the configured token.
    #[error("sonar rejected the access token (401)")]
    Unauthorized,
    /// Sonar answered with a non-success status.
    #[error("sonar request failed with status {0}")]
    Status(u16),
    /// The response body did not match the expected shape.
    #[error("sonar response decode failed: {0}")]
    Decode(String),
    /// The configured project key does not match Sonar's key grammar.
    #[error("invalid sonar project key {0:?}")]
    InvalidProjectKey(String),
}
