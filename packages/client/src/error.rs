//! Client error definitions.

use thiserror::Error;

use crate::domain::ResolveError;

/// Fatal errors of the client binary
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to read submissions file: {0}")]
    SubmissionsFile(#[from] std::io::Error),

    #[error("Invalid submissions file: {0}")]
    InvalidSubmissions(#[from] serde_json::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Console error: {0}")]
    Console(String),
}
