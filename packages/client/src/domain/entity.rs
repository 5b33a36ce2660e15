//! Core domain models for the playback client.

use boostroom_shared::time::HOUR_MILLIS;
use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use super::value_object::{SubmissionId, Timestamp, TrackId};

/// Length of a guest session before the boost count starts over
pub const SESSION_WINDOW_MILLIS: i64 = 24 * HOUR_MILLIS;

/// A contest entry as consumed by playback and boosting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub title: String,
    /// Provider track; entries without one cannot be played
    #[serde(default)]
    pub track_id: Option<TrackId>,
    #[serde(default)]
    pub boost_count: u32,
}

impl Submission {
    pub fn new(id: SubmissionId, title: String, track_id: Option<TrackId>) -> Self {
        Self {
            id,
            title,
            track_id,
            boost_count: 0,
        }
    }
}

/// Autoplay queue over a submission list.
///
/// `order` is always a permutation of `[0, order.len())` and `position` is a
/// valid index into it unless the queue is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackQueue {
    order: Vec<usize>,
    position: usize,
    shuffled: bool,
    active: bool,
}

impl PlaybackQueue {
    /// Build an active, shuffled queue over `len` items.
    ///
    /// Fisher–Yates: walk from the last index down to 1 and swap each slot with
    /// a uniformly drawn partner in `[0, i]`, so every ordering is equally likely.
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = rng.gen_range(0..=i);
            order.swap(i, j);
        }
        Self {
            order,
            position: 0,
            shuffled: true,
            active: true,
        }
    }

    /// Move to the next slot, wrapping around at the end.
    ///
    /// Returns the submission index now playing, or `None` when the queue is
    /// inactive or empty (in which case nothing changes).
    pub fn advance(&mut self) -> Option<usize> {
        if !self.active || self.order.is_empty() {
            return None;
        }
        self.position = (self.position + 1) % self.order.len();
        self.order.get(self.position).copied()
    }

    /// Deactivate; the generated order is kept.
    pub fn stop(&mut self) {
        self.active = false;
        self.shuffled = false;
    }

    /// Submission index at the current position
    pub fn current_index(&self) -> Option<usize> {
        if !self.active {
            return None;
        }
        self.order.get(self.position).copied()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Persisted guest boost counter.
///
/// Stored as `{"guestActionCount": n, "sessionStartedAt": ms}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleState {
    pub guest_action_count: u32,
    pub session_started_at: Timestamp,
}

impl ThrottleState {
    /// Zeroed state starting a new session at `now`
    pub fn fresh(now: i64) -> Self {
        Self {
            guest_action_count: 0,
            session_started_at: Timestamp::new(now),
        }
    }

    /// Count one guest action; the first one of a session starts its window
    pub fn record_action(&mut self, now: i64) {
        if self.guest_action_count == 0 {
            self.session_started_at = Timestamp::new(now);
        }
        self.guest_action_count = self.guest_action_count.saturating_add(1);
    }
}

/// True once the session started more than `SESSION_WINDOW_MILLIS` before `now`.
///
/// The window slides from the first guest action, not from a calendar day
/// boundary. A start in the future, or one too far back to subtract, cannot
/// belong to a live session and counts as expired.
pub fn is_expired(state: &ThrottleState, now: i64) -> bool {
    match now.checked_sub(state.session_started_at.value()) {
        Some(age) => !(0..=SESSION_WINDOW_MILLIS).contains(&age),
        None => true,
    }
}

/// Resolved media-provider credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalConfig {
    pub api_key: String,
    pub app_name: String,
}

/// Raw answer of the remote configuration service, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    pub api_key: Option<String>,
    pub app_name: Option<String>,
    pub error: Option<String>,
}

/// Host-container forwarding rule: requests under `/.proxy{prefix}` go to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyMapping {
    pub prefix: String,
    /// Bare hostname, without scheme
    pub target: String,
}

impl ProxyMapping {
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
        }
    }

    /// Build a mapping from a service URL, keeping only its host.
    ///
    /// Returns `None` when the URL cannot be parsed or has no host.
    pub fn from_service_url(prefix: &str, service_url: &str) -> Option<Self> {
        let parsed = Url::parse(service_url).ok()?;
        let host = parsed.host_str()?;
        Some(Self::new(prefix, host))
    }
}

/// Media-provider user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub handle: String,
    pub name: String,
}
