//! Review queue for user-proposed ingredients.

use std::sync::Arc;

use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{IngredientRepository, PendingIngredientRepository, PersistenceError};
use crate::domain::{
    ApprovalName, Error, Ingredient, PendingIngredient, PendingIngredientId, TagName, User,
};

/// Pending ingredient use-cases behind the `/pending` endpoints.
#[derive(Clone)]
pub struct PendingIngredientService {
    pending: Arc<dyn PendingIngredientRepository>,
    ingredients: Arc<dyn IngredientRepository>,
}

impl PendingIngredientService {
    /// Create the service from its repositories.
    pub fn new(
        pending: Arc<dyn PendingIngredientRepository>,
        ingredients: Arc<dyn IngredientRepository>,
    ) -> Self {
        Self {
            pending,
            ingredients,
        }
    }

    /// Number of proposals awaiting review.
    pub async fn count(&self) -> Result<i64, Error> {
        Ok(self.pending.count().await?)
    }

    /// One page of proposals.
    pub async fn list(&self, page: PageRequest) -> Result<Vec<PendingIngredient>, Error> {
        Ok(self.pending.list(page).await?)
    }

    /// Record `proposer`'s suggestion for a new ingredient.
    pub async fn propose(&self, proposer: &User, name: TagName) -> Result<(), Error> {
        if self.ingredients.name_taken(&name, None).await? {
            return Err(ingredient_exists());
        }
        if self.pending.name_taken(&name).await? {
            return Err(awaiting_approval());
        }
        let proposal = self
            .pending
            .create(&name, proposer.id)
            .await
            .map_err(|err| match err {
                PersistenceError::UniqueViolation { .. } => awaiting_approval(),
                other => other.into(),
            })?;
        info!(pending_id = %proposal.id, user_id = %proposer.id, "ingredient proposed");
        Ok(())
    }

    /// Discard a proposal.
    pub async fn reject(&self, id: PendingIngredientId) -> Result<(), Error> {
        if !self.pending.delete(id).await? {
            return Err(not_found());
        }
        info!(pending_id = %id, "ingredient proposal rejected");
        Ok(())
    }

    /// Turn a proposal into an ingredient disliked by its proposer.
    pub async fn approve(
        &self,
        id: PendingIngredientId,
        naming: ApprovalName,
    ) -> Result<Ingredient, Error> {
        let proposal = self.pending.find(id).await?.ok_or_else(not_found)?;
        let name = naming.resolve(&proposal);
        if self.ingredients.name_taken(&name, None).await? {
            return Err(ingredient_exists());
        }
        let ingredient = self
            .pending
            .approve(id, &name)
            .await
            .map_err(|err| match err {
                PersistenceError::UniqueViolation { .. } => ingredient_exists(),
                other => other.into(),
            })?
            .ok_or_else(not_found)?;
        info!(
            pending_id = %id,
            ingredient_id = %ingredient.id,
            user_id = %proposal.proposed_by,
            "ingredient proposal approved"
        );
        Ok(ingredient)
    }
}

fn not_found() -> Error {
    Error::not_found("pending ingredient not found")
}

fn ingredient_exists() -> Error {
    Error::conflict("ingredient exists")
}

fn awaiting_approval() -> Error {
    Error::conflict("ingredient awaiting approval")
}
