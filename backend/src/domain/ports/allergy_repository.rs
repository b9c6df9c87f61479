//! Port for allergy reference data.

use async_trait::async_trait;

use crate::domain::{Allergy, AllergyId, Listing, TagName};

use super::PersistenceError;

/// Port for the allergy table and its user and dish links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllergyRepository: Send + Sync {
    /// Every allergy ordered by id.
    async fn list_all(&self) -> Result<Vec<Allergy>, PersistenceError>;

    /// One page of allergies ordered by id, searched on name.
    async fn list(&self, listing: &Listing) -> Result<Vec<Allergy>, PersistenceError>;

    /// Fetch one allergy.
    async fn find(&self, id: AllergyId) -> Result<Option<Allergy>, PersistenceError>;

    /// Whether another allergy than `except` already uses `name`.
    async fn name_taken(
        &self,
        name: &TagName,
        except: Option<AllergyId>,
    ) -> Result<bool, PersistenceError>;

    /// Insert an allergy.
    async fn create(&self, name: &TagName) -> Result<Allergy, PersistenceError>;

    /// Rename an allergy; `false` when it does not exist.
    async fn rename(&self, id: AllergyId, name: &TagName) -> Result<bool, PersistenceError>;

    /// Unlink the allergy from every user and dish, then delete it.
    async fn delete(&self, id: AllergyId) -> Result<bool, PersistenceError>;
}
