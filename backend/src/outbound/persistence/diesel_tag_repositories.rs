//! PostgreSQL-backed allergy and ingredient repositories.
//!
//! Both tables have the same `(id, name)` shape and are linked to users and
//! dishes through two join tables each, so one macro generates both adapters.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{AllergyRepository, IngredientRepository, PersistenceError};
use crate::domain::{Allergy, AllergyId, Ingredient, IngredientId, Listing, TagName};

use super::diesel_error_mapping::map_diesel_error;
use super::models::TagRow;
use super::pool::DbPool;
use super::schema::{
    allergies, dish_allergies, dish_ingredients, ingredients, user_allergies, user_ingredients,
};

/// Generate a Diesel adapter for a tag table.
///
/// - `table`: the tag table with `id` and `name` columns.
/// - `user_links` / `dish_links`: join tables keyed by `$link_column`.
macro_rules! diesel_tag_repository {
    (
        $(#[$meta:meta])*
        $repo:ident implements $port:ident for $entity:ident($id:ident) {
            table: $table:ident,
            user_links: $user_links:ident,
            dish_links: $dish_links:ident,
            link_column: $link_column:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        impl From<TagRow> for $entity {
            fn from(row: TagRow) -> Self {
                Self {
                    id: $id::new(row.id),
                    name: row.name,
                }
            }
        }

        #[async_trait]
        impl $port for $repo {
            async fn list_all(&self) -> Result<Vec<$entity>, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let rows: Vec<TagRow> = $table::table
                    .select(($table::id, $table::name))
                    .order($table::id.asc())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(rows.into_iter().map($entity::from).collect())
            }

            async fn list(&self, listing: &Listing) -> Result<Vec<$entity>, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let mut query = $table::table
                    .select(($table::id, $table::name))
                    .into_boxed();
                if let Some(term) = &listing.search {
                    query = query.filter($table::name.ilike(term.like_pattern()));
                }
                let rows: Vec<TagRow> = query
                    .order($table::id.asc())
                    .limit(listing.page.limit())
                    .offset(listing.page.offset())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(rows.into_iter().map($entity::from).collect())
            }

            async fn find(&self, id: $id) -> Result<Option<$entity>, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let row: Option<TagRow> = $table::table
                    .find(id.get())
                    .select(($table::id, $table::name))
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                Ok(row.map($entity::from))
            }

            async fn name_taken(
                &self,
                name: &TagName,
                except: Option<$id>,
            ) -> Result<bool, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let mut query = $table::table
                    .filter($table::name.eq(name.as_str()))
                    .select($table::id)
                    .into_boxed();
                if let Some(except) = except {
                    query = query.filter($table::id.ne(except.get()));
                }
                let found: Option<i32> = query
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                Ok(found.is_some())
            }

            async fn create(&self, name: &TagName) -> Result<$entity, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let row: TagRow = diesel::insert_into($table::table)
                    .values($table::name.eq(name.as_str()))
                    .returning(($table::id, $table::name))
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(row.into())
            }

            async fn rename(&self, id: $id, name: &TagName) -> Result<bool, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let updated = diesel::update($table::table.find(id.get()))
                    .set($table::name.eq(name.as_str()))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(updated > 0)
            }

            async fn delete(&self, id: $id) -> Result<bool, PersistenceError> {
                let mut conn = self.pool.checkout().await?;
                let id = id.get();
                conn.transaction(|conn| {
                    async move {
                        diesel::delete(
                            $user_links::table.filter($user_links::$link_column.eq(id)),
                        )
                        .execute(conn)
                        .await?;
                        diesel::delete(
                            $dish_links::table.filter($dish_links::$link_column.eq(id)),
                        )
                        .execute(conn)
                        .await?;
                        let deleted = diesel::delete($table::table.find(id)).execute(conn).await?;
                        Ok(deleted > 0)
                    }
                    .scope_boxed()
                })
                .await
                .map_err(map_diesel_error)
            }
        }
    };
}

diesel_tag_repository! {
    /// Diesel-backed implementation of the [`AllergyRepository`] port.
    DieselAllergyRepository implements AllergyRepository for Allergy(AllergyId) {
        table: allergies,
        user_links: user_allergies,
        dish_links: dish_allergies,
        link_column: allergy_id,
    }
}

diesel_tag_repository! {
    /// Diesel-backed implementation of the [`IngredientRepository`] port.
    DieselIngredientRepository implements IngredientRepository for Ingredient(IngredientId) {
        table: ingredients,
        user_links: user_ingredients,
        dish_links: dish_ingredients,
        link_column: ingredient_id,
    }
}
