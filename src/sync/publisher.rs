use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to run git: {0}")]
    Io(#[from] std::io::Error),

    #[error("git {command} failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String
    },

    #[error("Sync channel closed")]
    ChannelClosed
}

/// What caused persisted state to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirtyReason {
    MatchSubmitted,
    PlacementSubmitted,
    BadgeAwarded,
    Decayed,
    Rebuilt,
    Reset
}

/// Sent after every mutation of persisted state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangedMessage {
    pub id: Uuid,
    pub changed_at: DateTime<Utc>,
    pub reason: DirtyReason
}

impl StateChangedMessage {
    pub fn new(reason: DirtyReason) -> Self {
        Self {
            id: Uuid::new_v4(),
            changed_at: Utc::now(),
            reason
        }
    }
}

/// Receives "state dirty" signals from the core. Implementations must not
/// block and must not fail the caller; the core never waits on a sync.
pub trait SyncNotifier: Send + Sync {
    fn mark_dirty(&self, reason: DirtyReason);
}

/// Forwards dirty signals to a background worker over an unbounded channel
#[derive(Debug, Clone)]
pub struct SyncPublisher {
    sender: UnboundedSender<StateChangedMessage>
}

impl SyncPublisher {
    /// Creates a publisher and the receiving end for a worker
    pub fn channel() -> (Self, UnboundedReceiver<StateChangedMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn publish(&self, reason: DirtyReason) -> Result<(), SyncError> {
        let message = StateChangedMessage::new(reason);
        debug!(id = %message.id, reason = ?reason, "Publishing state change");

        self.sender.send(message).map_err(|_| SyncError::ChannelClosed)
    }

    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

impl SyncNotifier for SyncPublisher {
    fn mark_dirty(&self, reason: DirtyReason) {
        if let Err(e) = self.publish(reason) {
            warn!("Dropped state change {:?}: {}", reason, e);
        }
    }
}
