//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{NewUser, PersistenceError, UserCredentials, UserRepository};
use crate::domain::{
    Allergy, AllergyId, EmailAddress, FullName, Ingredient, IngredientId, Listing,
    PasswordDigest, Role, User, UserId,
};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{NewUserRow, UserAllergyRow, UserCredentialsRow, UserIngredientRow, UserRow};
use super::pool::DbPool;
use super::schema::{
    allergies, ingredients, pending_ingredients, user_allergies, user_ingredients, users,
};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_role(row: &UserRow) -> Role {
    row.role.parse().unwrap_or_else(|err| {
        warn!(user_id = row.id, error = %err, "unrecognised role, treating as USER");
        Role::User
    })
}

/// Attach allergy and ingredient links to user rows, preserving row order.
async fn hydrate_users(
    conn: &mut AsyncPgConnection,
    rows: Vec<UserRow>,
) -> Result<Vec<User>, diesel::result::Error> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

    let allergy_links: Vec<(i32, i32, String)> = user_allergies::table
        .inner_join(allergies::table)
        .filter(user_allergies::user_id.eq_any(&ids))
        .select((user_allergies::user_id, allergies::id, allergies::name))
        .order(allergies::id.asc())
        .load(conn)
        .await?;
    let ingredient_links: Vec<(i32, i32, String)> = user_ingredients::table
        .inner_join(ingredients::table)
        .filter(user_ingredients::user_id.eq_any(&ids))
        .select((user_ingredients::user_id, ingredients::id, ingredients::name))
        .order(ingredients::id.asc())
        .load(conn)
        .await?;

    let mut allergies_by_user: HashMap<i32, Vec<Allergy>> = HashMap::new();
    for (user_id, id, name) in allergy_links {
        allergies_by_user.entry(user_id).or_default().push(Allergy {
            id: AllergyId::new(id),
            name,
        });
    }
    let mut ingredients_by_user: HashMap<i32, Vec<Ingredient>> = HashMap::new();
    for (user_id, id, name) in ingredient_links {
        ingredients_by_user
            .entry(user_id)
            .or_default()
            .push(Ingredient {
                id: IngredientId::new(id),
                name,
            });
    }

    Ok(rows
        .into_iter()
        .map(|row| User {
            id: UserId::new(row.id),
            role: parse_role(&row),
            allergies: allergies_by_user.remove(&row.id).unwrap_or_default(),
            ingredients: ingredients_by_user.remove(&row.id).unwrap_or_default(),
            email: EmailAddress::from_trusted(row.email),
            full_name: FullName::from_trusted(row.full_name),
        })
        .collect())
}

async fn load_user(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    let row: Option<UserRow> = users::table
        .find(id)
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()?;
    match row {
        Some(row) => Ok(hydrate_users(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

async fn user_exists(conn: &mut AsyncPgConnection, id: i32) -> Result<bool, diesel::result::Error> {
    diesel::select(diesel::dsl::exists(users::table.find(id)))
        .get_result(conn)
        .await
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        load_user(&mut conn, id.get()).await.map_err(map_diesel_error)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let Some(row) = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserCredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let password = PasswordDigest::new(row.password_hash);
        let user = hydrate_users(&mut conn, vec![row.user])
            .await
            .map_err(map_diesel_error)?
            .pop();
        Ok(user.map(|user| UserCredentials { user, password }))
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::email.eq(email.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn create(&self, user: &NewUser) -> Result<User, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        conn.transaction(|conn| {
            async move {
                let row: UserRow = diesel::insert_into(users::table)
                    .values(&NewUserRow {
                        email: user.email.as_str(),
                        full_name: user.full_name.as_str(),
                        password_hash: user.password.as_str(),
                    })
                    .returning(UserRow::as_returning())
                    .get_result(conn)
                    .await?;
                let links: Vec<UserAllergyRow> = user
                    .allergy_ids
                    .iter()
                    .map(|allergy| UserAllergyRow {
                        user_id: row.id,
                        allergy_id: allergy.get(),
                    })
                    .collect();
                if !links.is_empty() {
                    diesel::insert_into(user_allergies::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok(hydrate_users(conn, vec![row]).await?.pop())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?
        .ok_or_else(|| PersistenceError::query("inserted user vanished"))
    }

    async fn list(&self, listing: &Listing) -> Result<Vec<User>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let mut query = users::table.select(UserRow::as_select()).into_boxed();
        if let Some(term) = &listing.search {
            let pattern = term.like_pattern();
            query = query.filter(
                users::full_name
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern)),
            );
        }
        let rows: Vec<UserRow> = query
            .order(users::id.asc())
            .limit(listing.page.limit())
            .offset(listing.page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate_users(&mut conn, rows)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: UserId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let id = id.get();
        conn.transaction(|conn| {
            async move {
                diesel::delete(user_allergies::table.filter(user_allergies::user_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(user_ingredients::table.filter(user_ingredients::user_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    pending_ingredients::table.filter(pending_ingredients::user_id.eq(id)),
                )
                .execute(conn)
                .await?;
                let deleted = diesel::delete(users::table.find(id)).execute(conn).await?;
                Ok(deleted > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn replace_allergies(
        &self,
        id: UserId,
        allergy_ids: &[AllergyId],
    ) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let id = id.get();
        conn.transaction(|conn| {
            async move {
                if !user_exists(conn, id).await? {
                    return Ok(None);
                }
                diesel::delete(user_allergies::table.filter(user_allergies::user_id.eq(id)))
                    .execute(conn)
                    .await?;
                let links: Vec<UserAllergyRow> = allergy_ids
                    .iter()
                    .map(|allergy| UserAllergyRow {
                        user_id: id,
                        allergy_id: allergy.get(),
                    })
                    .collect();
                if !links.is_empty() {
                    diesel::insert_into(user_allergies::table)
                        .values(&links)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }
                load_user(conn, id).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn replace_ingredients(
        &self,
        id: UserId,
        ingredient_ids: &[IngredientId],
    ) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let id = id.get();
        conn.transaction(|conn| {
            async move {
                if !user_exists(conn, id).await? {
                    return Ok(None);
                }
                diesel::delete(user_ingredients::table.filter(user_ingredients::user_id.eq(id)))
                    .execute(conn)
                    .await?;
                let links: Vec<UserIngredientRow> = ingredient_ids
                    .iter()
                    .map(|ingredient| UserIngredientRow {
                        user_id: id,
                        ingredient_id: ingredient.get(),
                    })
                    .collect();
                if !links.is_empty() {
                    diesel::insert_into(user_ingredients::table)
                        .values(&links)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }
                load_user(conn, id).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_password(
        &self,
        email: &EmailAddress,
        password: &PasswordDigest,
    ) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let updated = diesel::update(users::table.filter(users::email.eq(email.as_str())))
            .set(users::password_hash.eq(password.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
