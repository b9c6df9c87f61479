//! Administration of user accounts and self-service dietary profiles.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{AllergyId, Error, Ingredient, IngredientId, Listing, Role, User, UserId};

/// User account use-cases behind the `/users` endpoints.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create the service from the user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// One page of accounts.
    pub async fn list(&self, listing: &Listing) -> Result<Vec<User>, Error> {
        Ok(self.users.list(listing).await?)
    }

    /// Delete an account with its links.
    pub async fn delete(&self, id: UserId) -> Result<(), Error> {
        if !self.users.delete(id).await? {
            return Err(user_not_found());
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Replace the disliked ingredients of `target` on behalf of `actor`.
    pub async fn replace_ingredients(
        &self,
        actor: &User,
        target: UserId,
        ingredient_ids: &[IngredientId],
    ) -> Result<User, Error> {
        ensure_can_manage(actor, target)?;
        self.users
            .replace_ingredients(target, ingredient_ids)
            .await
            .map_err(|err| unknown_reference(err, "unknown ingredient"))?
            .ok_or_else(user_not_found)
    }

    /// Replace the allergies of `target` on behalf of `actor`.
    pub async fn replace_allergies(
        &self,
        actor: &User,
        target: UserId,
        allergy_ids: &[AllergyId],
    ) -> Result<User, Error> {
        ensure_can_manage(actor, target)?;
        self.users
            .replace_allergies(target, allergy_ids)
            .await
            .map_err(|err| unknown_reference(err, "unknown allergy"))?
            .ok_or_else(user_not_found)
    }

    /// Change the role of `target`.
    pub async fn set_role(&self, target: UserId, role: Role) -> Result<(), Error> {
        if !self.users.set_role(target, role).await? {
            return Err(user_not_found());
        }
        info!(user_id = %target, role = %role, "user role changed");
        Ok(())
    }

    /// Disliked ingredients of `target`, readable by the user and admins.
    pub async fn disliked_ingredients(
        &self,
        actor: &User,
        target: UserId,
    ) -> Result<Vec<Ingredient>, Error> {
        ensure_can_manage(actor, target)?;
        if actor.id == target {
            return Ok(actor.ingredients.clone());
        }
        self.users
            .find_by_id(target)
            .await?
            .map(|user| user.ingredients)
            .ok_or_else(user_not_found)
    }
}

fn ensure_can_manage(actor: &User, target: UserId) -> Result<(), Error> {
    if actor.can_manage(target) {
        Ok(())
    } else {
        Err(Error::forbidden("you may only change your own profile"))
    }
}

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

fn unknown_reference(err: PersistenceError, message: &str) -> Error {
    match err {
        PersistenceError::ForeignKeyViolation { .. } => Error::invalid_request(message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{EmailAddress, ErrorCode, FullName};
    use rstest::{fixture, rstest};

    #[fixture]
    fn member() -> User {
        User {
            id: UserId::new(2),
            email: EmailAddress::from_trusted("dana@b.com"),
            full_name: FullName::from_trusted("Dana Levi"),
            role: Role::User,
            allergies: Vec::new(),
            ingredients: vec![Ingredient {
                id: IngredientId::new(4),
                name: "שום".to_owned(),
            }],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn members_cannot_edit_other_profiles(member: User) {
        let mut users = MockUserRepository::new();
        users.expect_replace_allergies().never();
        let service = UserService::new(Arc::new(users));

        let err = service
            .replace_allergies(&member, UserId::new(3), &[AllergyId::new(1)])
            .await
            .expect_err("foreign profile");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_ingredients_are_rejected(member: User) {
        let mut users = MockUserRepository::new();
        users.expect_replace_ingredients().return_once(|_, _| {
            Err(PersistenceError::foreign_key_violation(
                "user_ingredients_ingredient_id_fkey",
            ))
        });
        let service = UserService::new(Arc::new(users));

        let err = service
            .replace_ingredients(&member, member.id, &[IngredientId::new(99)])
            .await
            .expect_err("unknown ingredient");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.to_string(), "unknown ingredient");
    }

    #[rstest]
    #[tokio::test]
    async fn own_dislikes_are_served_from_the_session(member: User) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let service = UserService::new(Arc::new(users));

        let found = service
            .disliked_ingredients(&member, member.id)
            .await
            .expect("own profile");
        assert_eq!(found, member.ingredients);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_delete().return_once(|_| Ok(false));
        let service = UserService::new(Arc::new(users));

        let err = service.delete(UserId::new(8)).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
