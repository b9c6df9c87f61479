//! Ingredient catalogue management.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{IngredientRepository, PersistenceError};
use crate::domain::{Ingredient, IngredientId, Error, Listing, TagName};

/// Ingredient use-cases behind the `/ingredients` endpoints.
#[derive(Clone)]
pub struct IngredientService {
    ingredients: Arc<dyn IngredientRepository>,
}

impl IngredientService {
    /// Create the service from the ingredient repository.
    pub fn new(ingredients: Arc<dyn IngredientRepository>) -> Self {
        Self { ingredients }
    }

    /// Every ingredient.
    pub async fn list_all(&self) -> Result<Vec<Ingredient>, Error> {
        Ok(self.ingredients.list_all().await?)
    }

    /// One page of ingredients.
    pub async fn list(&self, listing: &Listing) -> Result<Vec<Ingredient>, Error> {
        Ok(self.ingredients.list(listing).await?)
    }

    /// Fetch one ingredient.
    pub async fn get(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.ingredients.find(id).await?.ok_or_else(not_found)
    }

    /// Add an ingredient with a unique name.
    pub async fn create(&self, name: TagName) -> Result<Ingredient, Error> {
        if self.ingredients.name_taken(&name, None).await? {
            return Err(exists());
        }
        let ingredient = self.ingredients.create(&name).await.map_err(duplicate)?;
        info!(ingredient_id = %ingredient.id, "ingredient created");
        Ok(ingredient)
    }

    /// Rename an ingredient, keeping names unique.
    pub async fn rename(&self, id: IngredientId, name: TagName) -> Result<(), Error> {
        if self.ingredients.name_taken(&name, Some(id)).await? {
            return Err(exists());
        }
        if !self.ingredients.rename(id, &name).await.map_err(duplicate)? {
            return Err(not_found());
        }
        Ok(())
    }

    /// Remove an ingredient from every user and dish, then delete it.
    pub async fn delete(&self, id: IngredientId) -> Result<(), Error> {
        if !self.ingredients.delete(id).await? {
            return Err(not_found());
        }
        info!(ingredient_id = %id, "ingredient deleted");
        Ok(())
    }
}

fn not_found() -> Error {
    Error::not_found("ingredient not found")
}

fn exists() -> Error {
    Error::conflict("ingredient exists")
}

fn duplicate(err: PersistenceError) -> Error {
    match err {
        PersistenceError::UniqueViolation { .. } => exists(),
        other => other.into(),
    }
}
