//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{
    AllergyId, EmailAddress, FullName, IngredientId, Listing, PasswordDigest, Role, User, UserId,
};

use super::PersistenceError;

/// Account row to insert at registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login address.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Hash of the initial password.
    pub password: PasswordDigest,
    /// Allergies to link in the same transaction.
    pub allergy_ids: Vec<AllergyId>,
}

/// A user together with the stored password hash, for login only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// The account.
    pub user: User,
    /// Stored password hash.
    pub password: PasswordDigest,
}

/// Port for reading and mutating user accounts and their dietary links.
///
/// Methods that target a user by id return `None`/`false` when no such user
/// exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user with allergies and disliked ingredients.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError>;

    /// Fetch a user and password hash by login address.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, PersistenceError>;

    /// Whether an account uses `email`.
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, PersistenceError>;

    /// Insert an account and link its allergies atomically.
    async fn create(&self, user: &NewUser) -> Result<User, PersistenceError>;

    /// One page of users ordered by id, searched on name and email.
    async fn list(&self, listing: &Listing) -> Result<Vec<User>, PersistenceError>;

    /// Delete an account with its links and pending proposals.
    async fn delete(&self, id: UserId) -> Result<bool, PersistenceError>;

    /// Replace the user's allergy links.
    async fn replace_allergies(
        &self,
        id: UserId,
        allergy_ids: &[AllergyId],
    ) -> Result<Option<User>, PersistenceError>;

    /// Replace the user's disliked ingredient links.
    async fn replace_ingredients(
        &self,
        id: UserId,
        ingredient_ids: &[IngredientId],
    ) -> Result<Option<User>, PersistenceError>;

    /// Change the user's role.
    async fn set_role(&self, id: UserId, role: Role) -> Result<bool, PersistenceError>;

    /// Replace the password hash of the account using `email`.
    async fn set_password(
        &self,
        email: &EmailAddress,
        password: &PasswordDigest,
    ) -> Result<bool, PersistenceError>;
}
