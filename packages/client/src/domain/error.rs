//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// TrackId validation error
    #[error("TrackId cannot be empty")]
    TrackIdEmpty,

    /// TrackId too long error
    #[error("TrackId cannot exceed {max} characters (got {actual})")]
    TrackIdTooLong { max: usize, actual: usize },

    /// SubmissionId validation error
    #[error("SubmissionId cannot be empty")]
    SubmissionIdEmpty,
}

/// Errors raised while resolving provider config, streams and profiles.
///
/// `Clone` because a single resolution is shared by every waiting caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No credential available from any source
    #[error("No provider credential is configured")]
    ConfigurationMissing,

    /// Remote config answered without the required field
    #[error("Remote config response is malformed: {0}")]
    ConfigMalformed(String),

    /// Remote config answered with an explicit `error` field
    #[error("Remote config service reported an error: {0}")]
    ConfigRejected(String),

    /// No identifier supplied, or the provider has no stream for it
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// The provider has no user with this id
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Transport-level failure
    #[error("Network fetch failed: {0}")]
    NetworkFetchFailed(String),
}

/// Errors from durable key-value storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by the host container SDK
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Host container SDK error: {0}")]
pub struct HostSdkError(pub String);
