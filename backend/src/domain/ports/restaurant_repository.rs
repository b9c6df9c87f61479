//! Port for restaurant persistence.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Listing, Restaurant, RestaurantDraft, RestaurantId};

use super::PersistenceError;

/// Port for the restaurant table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// One page of restaurants ordered by id, searched on name and email.
    async fn list(&self, listing: &Listing) -> Result<Vec<Restaurant>, PersistenceError>;

    /// Whether a restaurant uses `email`.
    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, PersistenceError>;

    /// Whether the restaurant exists.
    async fn exists(&self, id: RestaurantId) -> Result<bool, PersistenceError>;

    /// Insert a restaurant.
    async fn create(&self, draft: &RestaurantDraft) -> Result<Restaurant, PersistenceError>;
}
