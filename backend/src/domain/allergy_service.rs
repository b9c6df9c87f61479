//! Allergy catalogue management.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{AllergyRepository, PersistenceError};
use crate::domain::{Allergy, AllergyId, Error, Listing, TagName};

/// Allergy use-cases behind the `/allergies` endpoints.
#[derive(Clone)]
pub struct AllergyService {
    allergies: Arc<dyn AllergyRepository>,
}

impl AllergyService {
    /// Create the service from the allergy repository.
    pub fn new(allergies: Arc<dyn AllergyRepository>) -> Self {
        Self { allergies }
    }

    /// Every allergy.
    pub async fn list_all(&self) -> Result<Vec<Allergy>, Error> {
        Ok(self.allergies.list_all().await?)
    }

    /// One page of allergies.
    pub async fn list(&self, listing: &Listing) -> Result<Vec<Allergy>, Error> {
        Ok(self.allergies.list(listing).await?)
    }

    /// Fetch one allergy.
    pub async fn get(&self, id: AllergyId) -> Result<Allergy, Error> {
        self.allergies.find(id).await?.ok_or_else(not_found)
    }

    /// Add an allergy with a unique name.
    pub async fn create(&self, name: TagName) -> Result<Allergy, Error> {
        if self.allergies.name_taken(&name, None).await? {
            return Err(exists());
        }
        let allergy = self.allergies.create(&name).await.map_err(duplicate)?;
        info!(allergy_id = %allergy.id, "allergy created");
        Ok(allergy)
    }

    /// Rename an allergy, keeping names unique.
    pub async fn rename(&self, id: AllergyId, name: TagName) -> Result<(), Error> {
        if self.allergies.name_taken(&name, Some(id)).await? {
            return Err(exists());
        }
        if !self.allergies.rename(id, &name).await.map_err(duplicate)? {
            return Err(not_found());
        }
        Ok(())
    }

    /// Remove an allergy from every user and dish, then delete it.
    pub async fn delete(&self, id: AllergyId) -> Result<(), Error> {
        if !self.allergies.delete(id).await? {
            return Err(not_found());
        }
        info!(allergy_id = %id, "allergy deleted");
        Ok(())
    }
}

fn not_found() -> Error {
    Error::not_found("allergy not found")
}

fn exists() -> Error {
    Error::conflict("allergy exists")
}

fn duplicate(err: PersistenceError) -> Error {
    match err {
        PersistenceError::UniqueViolation { .. } => exists(),
        other => other.into(),
    }
}
