//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use super::schema::{
    dish_allergies, dish_ingredients, dishes, pending_ingredients, restaurants, user_allergies,
    user_ingredients, users,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Login lookup including the password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCredentialsRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
}

/// `(id, name)` row shared by the allergy and ingredient tables.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct TagRow {
    pub id: i32,
    pub name: String,
}

/// Row struct for reading from the restaurants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RestaurantRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Insertable struct for creating new restaurant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurants)]
pub(crate) struct NewRestaurantRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

/// Row struct for reading from the dishes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DishRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub restaurant_id: i32,
}

/// Insertable and changeset struct for dish fields.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = dishes)]
pub(crate) struct DishFieldsRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub image: &'a str,
    pub restaurant_id: i32,
}

/// Row struct for reading from the pending_ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pending_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PendingIngredientRow {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
}

/// Insertable struct for creating ingredient proposals.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pending_ingredients)]
pub(crate) struct NewPendingIngredientRow<'a> {
    pub name: &'a str,
    pub user_id: i32,
}

/// Link row between users and allergies.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_allergies)]
pub(crate) struct UserAllergyRow {
    pub user_id: i32,
    pub allergy_id: i32,
}

/// Link row between users and disliked ingredients.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_ingredients)]
pub(crate) struct UserIngredientRow {
    pub user_id: i32,
    pub ingredient_id: i32,
}

/// Link row between dishes and allergies.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = dish_allergies)]
pub(crate) struct DishAllergyRow {
    pub dish_id: i32,
    pub allergy_id: i32,
}

/// Link row between dishes and ingredients.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = dish_ingredients)]
pub(crate) struct DishIngredientRow {
    pub dish_id: i32,
    pub ingredient_id: i32,
}
