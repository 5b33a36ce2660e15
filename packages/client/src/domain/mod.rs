//! Domain layer for the playback client.
//!
//! This module contains the playback queue, throttle state and provider
//! models, plus the traits (ports) implemented by the infrastructure layer.

pub mod entity;
pub mod error;
pub mod playback;
pub mod repository;
pub mod value_object;

pub use entity::{
    ExternalConfig, PlaybackQueue, ProxyMapping, RemoteConfig, SESSION_WINDOW_MILLIS, Submission,
    ThrottleState, UserProfile, is_expired,
};
pub use error::{HostSdkError, ResolveError, StorageError, ValueObjectError};
pub use playback::{PlaybackEvent, PlaybackSignal};
pub use repository::{ConfigService, HostContainerSdk, KeyValueStore, MediaProvider};
pub use value_object::{SubmissionId, Timestamp, TrackId};
