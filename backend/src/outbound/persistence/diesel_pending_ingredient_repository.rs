//! PostgreSQL-backed `PendingIngredientRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{PendingIngredientRepository, PersistenceError};
use crate::domain::{
    Ingredient, IngredientId, PendingIngredient, PendingIngredientId, TagName, UserId,
};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{NewPendingIngredientRow, PendingIngredientRow, TagRow, UserIngredientRow};
use super::pool::DbPool;
use super::schema::{ingredients, pending_ingredients, user_ingredients};

/// Diesel-backed implementation of the [`PendingIngredientRepository`] port.
#[derive(Clone)]
pub struct DieselPendingIngredientRepository {
    pool: DbPool,
}

impl DieselPendingIngredientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_pending(row: PendingIngredientRow) -> PendingIngredient {
    PendingIngredient {
        id: PendingIngredientId::new(row.id),
        name: row.name,
        proposed_by: UserId::new(row.user_id),
    }
}

#[async_trait]
impl PendingIngredientRepository for DieselPendingIngredientRepository {
    async fn count(&self) -> Result<i64, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        pending_ingredients::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<PendingIngredient>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let rows: Vec<PendingIngredientRow> = pending_ingredients::table
            .select(PendingIngredientRow::as_select())
            .order(pending_ingredients::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_pending).collect())
    }

    async fn find(
        &self,
        id: PendingIngredientId,
    ) -> Result<Option<PendingIngredient>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let row: Option<PendingIngredientRow> = pending_ingredients::table
            .find(id.get())
            .select(PendingIngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_pending))
    }

    async fn name_taken(&self, name: &TagName) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        diesel::select(diesel::dsl::exists(
            pending_ingredients::table.filter(pending_ingredients::name.eq(name.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn create(
        &self,
        name: &TagName,
        proposed_by: UserId,
    ) -> Result<PendingIngredient, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let row: PendingIngredientRow = diesel::insert_into(pending_ingredients::table)
            .values(&NewPendingIngredientRow {
                name: name.as_str(),
                user_id: proposed_by.get(),
            })
            .returning(PendingIngredientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_pending(row))
    }

    async fn delete(&self, id: PendingIngredientId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let deleted = diesel::delete(pending_ingredients::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn approve(
        &self,
        id: PendingIngredientId,
        name: &TagName,
    ) -> Result<Option<Ingredient>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let id = id.get();
        conn.transaction(|conn| {
            async move {
                let proposal: Option<PendingIngredientRow> =
                    diesel::delete(pending_ingredients::table.find(id))
                        .returning(PendingIngredientRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                let Some(proposal) = proposal else {
                    return Ok(None);
                };

                let created: TagRow = diesel::insert_into(ingredients::table)
                    .values(ingredients::name.eq(name.as_str()))
                    .returning((ingredients::id, ingredients::name))
                    .get_result(conn)
                    .await?;
                diesel::insert_into(user_ingredients::table)
                    .values(&UserIngredientRow {
                        user_id: proposal.user_id,
                        ingredient_id: created.id,
                    })
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                Ok(Some(Ingredient {
                    id: IngredientId::new(created.id),
                    name: created.name,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
