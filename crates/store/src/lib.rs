//! Message persistence boundary for the postbox service.
//!
//! The contact handler only ever talks to the [`MessageStore`] trait; what
//! sits behind it is a collaborator the service treats as a black box with a
//! simple insert/select/delete contract. Failures are reported to the caller
//! and never retried here.
//!
//! The crate ships one implementation, [`InMemoryStore`], which keeps
//! messages for the lifetime of the process.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemoryStore;

/// A validated contact submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A stored message as returned by list queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Identifier and timestamp generated for an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct MessageReceipt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message not found: {0}")]
    NotFound(Uuid),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Contract to the message store collaborator.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a validated submission, returning its generated identifier
    /// and timestamp.
    async fn insert(&self, message: NewMessage) -> StoreResult<MessageReceipt>;

    /// All stored messages, newest first.
    async fn list(&self) -> StoreResult<Vec<StoredMessage>>;

    /// Delete the message with the given id.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}
