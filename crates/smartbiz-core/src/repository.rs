//! Feedback storage seam
//!
//! [`FeedbackRepository`] is an ordered, user-keyed append/query collection.
//! [`InMemoryFeedbackRepository`] keeps everything in process memory and
//! loses it on restart.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::Principal;
use crate::feedback::{Feedback, FeedbackId};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A record with this id is already stored
    #[error("Feedback '{id}' already exists")]
    Duplicate { id: String },
}

/// Persistence for feedback records
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store `feedback` owned by `principal`, returning the stored record.
    async fn append(&self, principal: &Principal, feedback: Feedback) -> RepositoryResult<Feedback>;

    /// All records owned by `principal`, oldest first.
    async fn list_for(&self, principal: &Principal) -> RepositoryResult<Vec<Feedback>>;

    /// Look up a record by id regardless of owner.
    async fn get(&self, id: &FeedbackId) -> RepositoryResult<Option<Feedback>>;
}

/// Process-local repository
///
/// Clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackRepository {
    records: Arc<RwLock<Vec<Feedback>>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all users
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn append(
        &self,
        principal: &Principal,
        mut feedback: Feedback,
    ) -> RepositoryResult<Feedback> {
        feedback.user = principal.id.clone();

        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == feedback.id) {
            return Err(RepositoryError::Duplicate {
                id: feedback.id.to_string(),
            });
        }
        records.push(feedback.clone());

        tracing::debug!(
            feedback_id = %feedback.id,
            user_id = %principal.id,
            total = records.len(),
            "Stored feedback"
        );
        Ok(feedback)
    }

    async fn list_for(&self, principal: &Principal) -> RepositoryResult<Vec<Feedback>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|feedback| feedback.is_owned_by(&principal.id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &FeedbackId) -> RepositoryResult<Option<Feedback>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|feedback| &feedback.id == id).cloned())
    }
}
