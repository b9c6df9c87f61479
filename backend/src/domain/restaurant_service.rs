//! Restaurant management.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{PersistenceError, RestaurantRepository};
use crate::domain::{Error, Listing, Restaurant, RestaurantDraft};

/// Restaurant use-cases behind the `/restaurants` endpoints.
#[derive(Clone)]
pub struct RestaurantService {
    restaurants: Arc<dyn RestaurantRepository>,
}

impl RestaurantService {
    /// Create the service from the restaurant repository.
    pub fn new(restaurants: Arc<dyn RestaurantRepository>) -> Self {
        Self { restaurants }
    }

    /// One page of restaurants.
    pub async fn list(&self, listing: &Listing) -> Result<Vec<Restaurant>, Error> {
        Ok(self.restaurants.list(listing).await?)
    }

    /// Add a restaurant whose email is not yet registered.
    pub async fn create(&self, draft: RestaurantDraft) -> Result<Restaurant, Error> {
        if self.restaurants.email_taken(&draft.email).await? {
            return Err(Error::conflict("restaurant exists"));
        }
        let restaurant = self
            .restaurants
            .create(&draft)
            .await
            .map_err(|err| match err {
                PersistenceError::UniqueViolation { .. } => Error::conflict("restaurant exists"),
                other => other.into(),
            })?;
        info!(restaurant_id = %restaurant.id, "restaurant created");
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockRestaurantRepository;
    use crate::domain::ErrorCode;

    fn draft() -> RestaurantDraft {
        RestaurantDraft::parse(Some("Mama Mia"), Some("hi@mamamia.co.il"), Some("0501234567"))
            .expect("valid restaurant")
    }

    #[tokio::test]
    async fn registered_emails_conflict() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_email_taken().return_once(|_| Ok(true));
        repo.expect_create().never();

        let err = RestaurantService::new(Arc::new(repo))
            .create(draft())
            .await
            .expect_err("duplicate email");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn pool_failures_are_unavailable() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_list()
            .return_once(|_| Err(PersistenceError::connection("timed out")));

        let listing = Listing::first(crate::domain::ADMIN_PAGE_SIZE);
        let err = RestaurantService::new(Arc::new(repo))
            .list(&listing)
            .await
            .expect_err("pool down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
