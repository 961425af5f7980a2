//! Document store trait (port)

use async_trait::async_trait;

use crate::error::DomainError;

/// Document body: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Hosted document database addressed by collection and id.
///
/// A single call is atomic; nothing spans calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reserves an id without writing a document.
    async fn create_id(&self, collection: &str) -> Result<String, DomainError>;
    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, DomainError>;
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError>;
    /// Creates or replaces the whole document.
    async fn set(&self, collection: &str, id: &str, fields: Document) -> Result<(), DomainError>;
    /// Merges `partial` into an existing document; `MenuItemNotFound` when absent.
    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<(), DomainError>;
    /// Removing a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DomainError>;
}
