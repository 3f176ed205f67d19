use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{MessageReceipt, MessageStore, NewMessage, StoreError, StoreResult, StoredMessage};

/// Process-local message store.
///
/// Messages live for the lifetime of the serving process; a restart empties
/// the store. This mirrors the volatility of the admission state and keeps
/// the persistence collaborator swappable behind [`MessageStore`].
pub struct InMemoryStore {
    messages: RwLock<Vec<StoredMessage>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn insert(&self, message: NewMessage) -> StoreResult<MessageReceipt> {
        let stored = StoredMessage {
            id: Uuid::new_v4(),
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            created_at: Utc::now(),
        };

        let receipt = MessageReceipt {
            id: stored.id,
            created_at: stored.created_at,
        };

        let mut messages = self.messages.write().expect("messages lock poisoned");
        messages.push(stored);

        tracing::debug!(id = %receipt.id, total = messages.len(), "message stored");
        Ok(receipt)
    }

    async fn list(&self) -> StoreResult<Vec<StoredMessage>> {
        let messages = self.messages.read().expect("messages lock poisoned");

        // Insertion order is oldest-first; listings read newest-first.
        Ok(messages.iter().rev().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut messages = self.messages.write().expect("messages lock poisoned");

        match messages.iter().position(|m| m.id == id) {
            Some(index) => {
                messages.remove(index);
                tracing::debug!(%id, "message deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(subject: &str) -> NewMessage {
        NewMessage {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: subject.to_string(),
            message: "I would like to talk about your projects.".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = InMemoryStore::new();

        let receipt = store.insert(sample("first")).await.unwrap();
        let messages = store.list().await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, receipt.id);
        assert_eq!(messages[0].created_at, receipt.created_at);
        assert_eq!(messages[0].subject, "first");
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryStore::new();

        store.insert(sample("older")).await.unwrap();
        store.insert(sample("newer")).await.unwrap();

        let messages = store.list().await.unwrap();
        assert_eq!(messages[0].subject, "newer");
        assert_eq!(messages[1].subject, "older");
    }

    #[tokio::test]
    async fn delete_removes_message() {
        let store = InMemoryStore::new();

        let receipt = store.insert(sample("doomed")).await.unwrap();
        store.delete(receipt.id).await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_reports_not_found() {
        let store = InMemoryStore::new();

        let missing = Uuid::new_v4();
        match store.delete(missing).await {
            Err(StoreError::NotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn ping_succeeds() {
        let store = InMemoryStore::new();
        assert!(store.ping().await.is_ok());
    }
}
