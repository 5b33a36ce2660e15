//! Playback-completion signal emitted by the player surface.

use tokio::sync::broadcast;

const SIGNAL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The current media item finished playing
    Ended,
}

/// Broadcast port between the player surface and its listeners.
///
/// Each subscriber receives every `Ended` notification sent while it is
/// subscribed. Dropping the receiver unsubscribes.
#[derive(Debug, Clone)]
pub struct PlaybackSignal {
    sender: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.sender.subscribe()
    }

    /// Notify that the current item ended. Returns the number of listeners reached.
    pub fn notify_ended(&self) -> usize {
        self.sender.send(PlaybackEvent::Ended).unwrap_or(0)
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PlaybackSignal {
    fn default() -> Self {
        Self::new()
    }
}
