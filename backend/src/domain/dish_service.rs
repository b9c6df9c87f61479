//! Dish catalogue management and personalised recommendations.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{DishRepository, PersistenceError, RestaurantRepository};
use crate::domain::{
    Dish, DishDraft, DishId, Error, Listing, RecommendationCriteria, User,
};

/// Dish use-cases behind the `/dishes` endpoints.
#[derive(Clone)]
pub struct DishService {
    dishes: Arc<dyn DishRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl DishService {
    /// Create the service from its repositories.
    pub fn new(
        dishes: Arc<dyn DishRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
    ) -> Self {
        Self {
            dishes,
            restaurants,
        }
    }

    /// One page of the whole catalogue.
    pub async fn list(&self, listing: &Listing) -> Result<Vec<Dish>, Error> {
        Ok(self.dishes.list(listing).await?)
    }

    /// One page of the dishes `user` can eat.
    pub async fn recommend(&self, user: &User, listing: &Listing) -> Result<Vec<Dish>, Error> {
        let criteria = RecommendationCriteria::for_user(user);
        debug!(user_id = %user.id, criteria = ?criteria, "filtering dishes");
        Ok(self.dishes.recommend(&criteria, listing).await?)
    }

    /// Fetch one dish.
    pub async fn get(&self, id: DishId) -> Result<Dish, Error> {
        self.dishes.find(id).await?.ok_or_else(dish_not_found)
    }

    /// Add a dish to an existing restaurant.
    pub async fn create(&self, draft: DishDraft) -> Result<Dish, Error> {
        self.check_draft(&draft, None).await?;
        let dish = self.dishes.create(&draft).await.map_err(write_error)?;
        info!(dish_id = %dish.id, restaurant_id = %dish.restaurant.id, "dish created");
        Ok(dish)
    }

    /// Replace every field and tag of a dish.
    pub async fn update(&self, id: DishId, draft: DishDraft) -> Result<(), Error> {
        self.check_draft(&draft, Some(id)).await?;
        if !self.dishes.update(id, &draft).await.map_err(write_error)? {
            return Err(dish_not_found());
        }
        info!(dish_id = %id, "dish updated");
        Ok(())
    }

    async fn check_draft(&self, draft: &DishDraft, except: Option<DishId>) -> Result<(), Error> {
        if !self.restaurants.exists(draft.restaurant_id).await? {
            return Err(Error::not_found("restaurant not found"));
        }
        if self.dishes.name_taken(&draft.name, except).await? {
            return Err(Error::conflict("dish exists"));
        }
        Ok(())
    }
}

fn dish_not_found() -> Error {
    Error::not_found("dish not found")
}

fn write_error(err: PersistenceError) -> Error {
    match err {
        PersistenceError::UniqueViolation { .. } => Error::conflict("dish exists"),
        PersistenceError::ForeignKeyViolation { .. } => {
            Error::invalid_request("unknown allergy or ingredient")
        }
        other => other.into(),
    }
}
