//! PostgreSQL-backed `DishRepository` implementation.
//!
//! Dishes are always read joined with their restaurant name. Allergy and
//! ingredient tags are attached in two follow-up queries keyed by the page's
//! dish ids, so one page costs three round trips regardless of its size.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{DishRepository, PersistenceError};
use crate::domain::{
    Allergy, AllergyId, AllergyRequirement, Dish, DishDraft, DishId, Ingredient, IngredientId,
    Listing, RecommendationCriteria, RestaurantId, RestaurantRef,
};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{DishAllergyRow, DishFieldsRow, DishIngredientRow, DishRow};
use super::pool::DbPool;
use super::schema::{
    allergies, dish_allergies, dish_ingredients, dishes, ingredients, restaurants, user_allergies,
};

/// Diesel-backed implementation of the [`DishRepository`] port.
#[derive(Clone)]
pub struct DieselDishRepository {
    pool: DbPool,
}

impl DieselDishRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Load one page of dishes, optionally narrowed by recommendation criteria.
async fn load_page(
    conn: &mut AsyncPgConnection,
    listing: &Listing,
    criteria: Option<&RecommendationCriteria>,
) -> Result<Vec<Dish>, diesel::result::Error> {
    let mut query = dishes::table
        .inner_join(restaurants::table)
        .select((DishRow::as_select(), restaurants::name))
        .into_boxed::<Pg>();

    if let Some(term) = &listing.search {
        let pattern = term.like_pattern();
        query = query.filter(
            dishes::name
                .ilike(pattern.clone())
                .or(dishes::description.ilike(pattern.clone()))
                .or(restaurants::name.ilike(pattern)),
        );
    }

    if let Some(criteria) = criteria {
        match &criteria.allergies {
            AllergyRequirement::TaggedWithAll(required) => {
                for allergy in required {
                    query = query.filter(
                        dishes::id.eq_any(
                            dish_allergies::table
                                .filter(dish_allergies::allergy_id.eq(allergy.get()))
                                .select(dish_allergies::dish_id),
                        ),
                    );
                }
            }
            AllergyRequirement::SharesUserAllergy(user) => {
                query = query.filter(
                    dishes::id.eq_any(
                        dish_allergies::table
                            .filter(
                                dish_allergies::allergy_id.eq_any(
                                    user_allergies::table
                                        .filter(user_allergies::user_id.eq(user.get()))
                                        .select(user_allergies::allergy_id),
                                ),
                            )
                            .select(dish_allergies::dish_id),
                    ),
                );
            }
        }
        if !criteria.disliked.is_empty() {
            let disliked: Vec<i32> = criteria.disliked.iter().map(|id| id.get()).collect();
            query = query.filter(diesel::dsl::not(
                dishes::id.eq_any(
                    dish_ingredients::table
                        .filter(dish_ingredients::ingredient_id.eq_any(disliked))
                        .select(dish_ingredients::dish_id),
                ),
            ));
        }
    }

    let rows: Vec<(DishRow, String)> = query
        .order(dishes::id.asc())
        .limit(listing.page.limit())
        .offset(listing.page.offset())
        .load(conn)
        .await?;
    hydrate_dishes(conn, rows).await
}

async fn load_dish(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<Option<Dish>, diesel::result::Error> {
    let row: Option<(DishRow, String)> = dishes::table
        .inner_join(restaurants::table)
        .filter(dishes::id.eq(id))
        .select((DishRow::as_select(), restaurants::name))
        .first(conn)
        .await
        .optional()?;
    match row {
        Some(row) => Ok(hydrate_dishes(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Attach allergy and ingredient tags to dish rows, preserving row order.
async fn hydrate_dishes(
    conn: &mut AsyncPgConnection,
    rows: Vec<(DishRow, String)>,
) -> Result<Vec<Dish>, diesel::result::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|(row, _)| row.id).collect();

    let allergy_links: Vec<(i32, i32, String)> = dish_allergies::table
        .inner_join(allergies::table)
        .filter(dish_allergies::dish_id.eq_any(&ids))
        .select((dish_allergies::dish_id, allergies::id, allergies::name))
        .order(allergies::id.asc())
        .load(conn)
        .await?;
    let ingredient_links: Vec<(i32, i32, String)> = dish_ingredients::table
        .inner_join(ingredients::table)
        .filter(dish_ingredients::dish_id.eq_any(&ids))
        .select((dish_ingredients::dish_id, ingredients::id, ingredients::name))
        .order(ingredients::id.asc())
        .load(conn)
        .await?;

    let mut allergies_by_dish: HashMap<i32, Vec<Allergy>> = HashMap::new();
    for (dish_id, id, name) in allergy_links {
        allergies_by_dish.entry(dish_id).or_default().push(Allergy {
            id: AllergyId::new(id),
            name,
        });
    }
    let mut ingredients_by_dish: HashMap<i32, Vec<Ingredient>> = HashMap::new();
    for (dish_id, id, name) in ingredient_links {
        ingredients_by_dish
            .entry(dish_id)
            .or_default()
            .push(Ingredient {
                id: IngredientId::new(id),
                name,
            });
    }

    Ok(rows
        .into_iter()
        .map(|(row, restaurant_name)| Dish {
            id: DishId::new(row.id),
            allergies: allergies_by_dish.remove(&row.id).unwrap_or_default(),
            ingredients: ingredients_by_dish.remove(&row.id).unwrap_or_default(),
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            restaurant: RestaurantRef {
                id: RestaurantId::new(row.restaurant_id),
                name: restaurant_name,
            },
        })
        .collect())
}

fn fields_row(draft: &DishDraft) -> DishFieldsRow<'_> {
    DishFieldsRow {
        name: &draft.name,
        description: &draft.description,
        price: draft.price,
        image: &draft.image,
        restaurant_id: draft.restaurant_id.get(),
    }
}

/// Replace every tag link of a dish with those in `draft`.
async fn replace_tags(
    conn: &mut AsyncPgConnection,
    dish_id: i32,
    draft: &DishDraft,
) -> Result<(), diesel::result::Error> {
    diesel::delete(dish_allergies::table.filter(dish_allergies::dish_id.eq(dish_id)))
        .execute(conn)
        .await?;
    diesel::delete(dish_ingredients::table.filter(dish_ingredients::dish_id.eq(dish_id)))
        .execute(conn)
        .await?;

    let allergy_links: Vec<DishAllergyRow> = draft
        .allergy_ids
        .iter()
        .map(|allergy| DishAllergyRow {
            dish_id,
            allergy_id: allergy.get(),
        })
        .collect();
    if !allergy_links.is_empty() {
        diesel::insert_into(dish_allergies::table)
            .values(&allergy_links)
            .execute(conn)
            .await?;
    }
    let ingredient_links: Vec<DishIngredientRow> = draft
        .ingredient_ids
        .iter()
        .map(|ingredient| DishIngredientRow {
            dish_id,
            ingredient_id: ingredient.get(),
        })
        .collect();
    if !ingredient_links.is_empty() {
        diesel::insert_into(dish_ingredients::table)
            .values(&ingredient_links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl DishRepository for DieselDishRepository {
    async fn list(&self, listing: &Listing) -> Result<Vec<Dish>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        load_page(&mut conn, listing, None)
            .await
            .map_err(map_diesel_error)
    }

    async fn recommend(
        &self,
        criteria: &RecommendationCriteria,
        listing: &Listing,
    ) -> Result<Vec<Dish>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        load_page(&mut conn, listing, Some(criteria))
            .await
            .map_err(map_diesel_error)
    }

    async fn find(&self, id: DishId) -> Result<Option<Dish>, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        load_dish(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)
    }

    async fn name_taken(
        &self,
        name: &str,
        except: Option<DishId>,
    ) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let mut query = dishes::table
            .filter(dishes::name.eq(name))
            .select(dishes::id)
            .into_boxed();
        if let Some(except) = except {
            query = query.filter(dishes::id.ne(except.get()));
        }
        let found: Option<i32> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn create(&self, draft: &DishDraft) -> Result<Dish, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        conn.transaction(|conn| {
            async move {
                let id: i32 = diesel::insert_into(dishes::table)
                    .values(&fields_row(draft))
                    .returning(dishes::id)
                    .get_result(conn)
                    .await?;
                replace_tags(conn, id, draft).await?;
                load_dish(conn, id).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?
        .ok_or_else(|| PersistenceError::query("inserted dish vanished"))
    }

    async fn update(&self, id: DishId, draft: &DishDraft) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.checkout().await?;
        let id = id.get();
        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(dishes::table.find(id))
                    .set(&fields_row(draft))
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                replace_tags(conn, id, draft).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
