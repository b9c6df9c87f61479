//! PostgreSQL-backed `RestaurantRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, RestaurantRepository};
use crate::domain::{EmailAddress, Listing, Restaurant, RestaurantDraft, RestaurantId};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{NewRestaurantRow, RestaurantRow};
use super::pool::DbPool;
use super::schema::restaurants;

/// Diesel-backed implementation of the [`RestaurantRepository`] port.
#[derive(Clone)]
pub struct DieselRestaurantRepository {
    pool: DbPool,
}

impl DieselRestaurantRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: RestaurantId::new(row.id),
            name: row.name,
            email: EmailAddress::from_trusted(row.email),
            phone: row.phone,
        }
    }
}

#[async_trait]
impl RestaurantRepository for DieselRestaurantRepository {
    async fn list(&self, listing: &Listing) -> Result<Vec<Restaurant>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let mut query = restaurants::table
            .select(RestaurantRow::as_select())
            .into_boxed();
        if let Some(term) = &listing.search {
            let pattern = term.like_pattern();
            query = query.filter(
                restaurants::name
                    .ilike(pattern.clone())
                    .or(restaurants::email.ilike(pattern)),
            );
        }
        let rows: Vec<RestaurantRow> = query
            .order(restaurants::id.asc())
            .limit(listing.page.limit())
            .offset(listing.page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        diesel::select(diesel::dsl::exists(
            restaurants::table.filter(restaurants::email.eq(email.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn exists(&self, id: RestaurantId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        diesel::select(diesel::dsl::exists(restaurants::table.find(id.get())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn create(&self, draft: &RestaurantDraft) -> Result<Restaurant, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let row: RestaurantRow = diesel::insert_into(restaurants::table)
            .values(&NewRestaurantRow {
                name: &draft.name,
                email: draft.email.as_str(),
                phone: &draft.phone,
            })
            .returning(RestaurantRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}
