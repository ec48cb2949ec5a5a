use tokio::{process::Command, sync::mpsc::UnboundedReceiver, task::JoinHandle};
use tracing::{info, warn};

use super::{
    config::SyncConfig,
    publisher::{StateChangedMessage, SyncError}
};

/// Mirrors the data directory to a git remote whenever state changes.
/// Bursts of changes that queue up while a push is running are folded
/// into a single commit.
pub struct GitSyncWorker {
    config: SyncConfig
}

impl GitSyncWorker {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn spawn(self, receiver: UnboundedReceiver<StateChangedMessage>) -> JoinHandle<usize> {
        tokio::spawn(self.run(receiver))
    }

    /// Runs until every publisher is dropped. Returns the number of sync
    /// attempts made. Failures are logged, never propagated.
    pub async fn run(self, mut receiver: UnboundedReceiver<StateChangedMessage>) -> usize {
        let mut attempts = 0;

        while let Some(message) = receiver.recv().await {
            let mut folded = 0;
            while receiver.try_recv().is_ok() {
                folded += 1;
            }

            attempts += 1;
            match self.sync(&message).await {
                Ok(()) => info!(id = %message.id, folded, "Git sync successful"),
                Err(e) => warn!(id = %message.id, "Git sync failed: {}", e)
            }
        }

        attempts
    }

    pub fn commit_message(&self, message: &StateChangedMessage) -> String {
        format!(
            "{}\n\n{:?} at {}",
            self.config.commit_message,
            message.reason,
            message.changed_at.to_rfc3339()
        )
    }

    async fn sync(&self, message: &StateChangedMessage) -> Result<(), SyncError> {
        self.git(&["add", "."]).await?;

        let commit_message = self.commit_message(message);
        match self.git(&["commit", "-m", &commit_message]).await {
            Ok(_) => {}
            Err(SyncError::CommandFailed { stderr, .. }) if stderr.contains("nothing to commit") => {
                info!("Nothing to commit, skipping push");
                return Ok(());
            }
            Err(e) => return Err(e)
        }

        self.git(&["push", &self.config.remote, &self.config.branch]).await?;
        Ok(())
    }

    async fn git(&self, args: &[&str]) -> Result<String, SyncError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.config.repo_dir)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        // git reports "nothing to commit" on stdout
        Err(SyncError::CommandFailed {
            command: args.first().copied().unwrap_or_default().to_string(),
            status: output.status,
            stderr: format!("{}{}", String::from_utf8_lossy(&output.stderr), stdout)
        })
    }
}
