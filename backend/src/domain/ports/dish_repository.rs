//! Port for dish persistence and the recommendation query.

use async_trait::async_trait;

use crate::domain::{Dish, DishDraft, DishId, Listing, RecommendationCriteria};

use super::PersistenceError;

/// Port for dishes and their allergy and ingredient tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// One page of dishes ordered by id, searched on dish name, description,
    /// and restaurant name.
    async fn list(&self, listing: &Listing) -> Result<Vec<Dish>, PersistenceError>;

    /// Like [`DishRepository::list`], restricted to dishes `criteria` admits.
    async fn recommend(
        &self,
        criteria: &RecommendationCriteria,
        listing: &Listing,
    ) -> Result<Vec<Dish>, PersistenceError>;

    /// Fetch one dish.
    async fn find(&self, id: DishId) -> Result<Option<Dish>, PersistenceError>;

    /// Whether another dish than `except` already uses `name`.
    async fn name_taken(&self, name: &str, except: Option<DishId>)
    -> Result<bool, PersistenceError>;

    /// Insert a dish with its tags atomically.
    async fn create(&self, draft: &DishDraft) -> Result<Dish, PersistenceError>;

    /// Replace every field and tag of a dish atomically; `false` when it does
    /// not exist.
    async fn update(&self, id: DishId, draft: &DishDraft) -> Result<bool, PersistenceError>;
}
