//! Trait abstraction for the record service to enable mocking in tests

use anyhow::Result;
use async_trait::async_trait;

/// Trait for record service operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordServiceTrait: Send + Sync {
    /// Whether a record with this email address already exists
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Persist a validated form snapshot
    async fn submit(&self, payload: &serde_json::Value) -> Result<()>;
}
