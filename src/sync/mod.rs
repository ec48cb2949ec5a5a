pub mod config;
pub mod git;
pub mod publisher;

#[cfg(test)]
mod tests;

pub use config::SyncConfig;
pub use git::GitSyncWorker;
pub use publisher::{DirtyReason, StateChangedMessage, SyncError, SyncNotifier, SyncPublisher};
