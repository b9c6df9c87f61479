//! Port for ingredient reference data.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, Listing, TagName};

use super::PersistenceError;

/// Port for the ingredient table and its user and dish links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Every ingredient ordered by id.
    async fn list_all(&self) -> Result<Vec<Ingredient>, PersistenceError>;

    /// One page of ingredients ordered by id, searched on name.
    async fn list(&self, listing: &Listing) -> Result<Vec<Ingredient>, PersistenceError>;

    /// Fetch one ingredient.
    async fn find(&self, id: IngredientId) -> Result<Option<Ingredient>, PersistenceError>;

    /// Whether another ingredient than `except` already uses `name`.
    async fn name_taken(
        &self,
        name: &TagName,
        except: Option<IngredientId>,
    ) -> Result<bool, PersistenceError>;

    /// Insert an ingredient.
    async fn create(&self, name: &TagName) -> Result<Ingredient, PersistenceError>;

    /// Rename an ingredient; `false` when it does not exist.
    async fn rename(&self, id: IngredientId, name: &TagName) -> Result<bool, PersistenceError>;

    /// Unlink the ingredient from every user and dish, then delete it.
    async fn delete(&self, id: IngredientId) -> Result<bool, PersistenceError>;
}
