use crate::sync::{DirtyReason, GitSyncWorker, StateChangedMessage, SyncConfig, SyncNotifier, SyncPublisher};

#[cfg(test)]
mod publisher_tests {
    use super::*;

    #[test]
    fn test_publish_delivers_message() {
        let (publisher, mut receiver) = SyncPublisher::channel();

        publisher.publish(DirtyReason::MatchSubmitted).unwrap();

        let message = receiver.try_recv().unwrap();
        assert_eq!(message.reason, DirtyReason::MatchSubmitted);
    }

    #[test]
    fn test_publish_after_worker_gone() {
        let (publisher, receiver) = SyncPublisher::channel();
        drop(receiver);

        assert!(!publisher.is_connected());
        assert!(publisher.publish(DirtyReason::Reset).is_err());
        // The notifier path swallows the error
        publisher.mark_dirty(DirtyReason::Reset);
    }

    #[test]
    fn test_message_serialization() {
        let message = StateChangedMessage::new(DirtyReason::Rebuilt);
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["reason"], "Rebuilt");
        assert!(value.get("changedAt").is_some());
        assert_eq!(value["id"], message.id.to_string());
    }
}

#[cfg(test)]
mod worker_tests {
    use super::*;

    #[test]
    fn test_commit_message() {
        let worker = GitSyncWorker::new(SyncConfig::default());
        let message = StateChangedMessage::new(DirtyReason::PlacementSubmitted);

        let text = worker.commit_message(&message);

        assert!(text.starts_with("Auto-update from match submission"));
        assert!(text.contains("PlacementSubmitted"));
    }

    #[tokio::test]
    async fn test_worker_survives_failed_sync() {
        let dir = std::env::temp_dir().join(format!("stock_rating_sync_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let config = SyncConfig {
            enabled: true,
            repo_dir: dir.clone(),
            ..SyncConfig::default()
        };
        let (publisher, receiver) = SyncPublisher::channel();
        let handle = GitSyncWorker::new(config).spawn(receiver);

        // Not a git repository, so every attempt fails
        publisher.mark_dirty(DirtyReason::MatchSubmitted);
        drop(publisher);

        let attempts = handle.await.unwrap();
        assert_eq!(attempts, 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
