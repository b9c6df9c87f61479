//! Port for ingredient proposals.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Ingredient, PendingIngredient, PendingIngredientId, TagName, UserId};

use super::PersistenceError;

/// Port for the pending ingredient queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PendingIngredientRepository: Send + Sync {
    /// Number of proposals awaiting review.
    async fn count(&self) -> Result<i64, PersistenceError>;

    /// One page of proposals ordered by id.
    async fn list(&self, page: PageRequest) -> Result<Vec<PendingIngredient>, PersistenceError>;

    /// Fetch one proposal.
    async fn find(
        &self,
        id: PendingIngredientId,
    ) -> Result<Option<PendingIngredient>, PersistenceError>;

    /// Whether a proposal already uses `name`.
    async fn name_taken(&self, name: &TagName) -> Result<bool, PersistenceError>;

    /// Record a proposal.
    async fn create(
        &self,
        name: &TagName,
        proposed_by: UserId,
    ) -> Result<PendingIngredient, PersistenceError>;

    /// Discard a proposal.
    async fn delete(&self, id: PendingIngredientId) -> Result<bool, PersistenceError>;

    /// Atomically create the ingredient named `name`, add it to the proposer's
    /// dislikes, and delete the proposal. `None` when the proposal is gone.
    async fn approve(
        &self,
        id: PendingIngredientId,
        name: &TagName,
    ) -> Result<Option<Ingredient>, PersistenceError>;
}
