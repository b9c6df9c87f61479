//! Response bodies shared by several handler modules.
//!
//! Domain values never serialise themselves onto the wire; these DTOs fix the
//! camelCase JSON shape and keep credential digests out of responses.

use pagination::{PageQuery, PageSize};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Allergy, Dish, Ingredient, Listing, PendingIngredient, Restaurant, User};

/// `?page=&search=` accepted by listing endpoints.
///
/// Malformed, zero, or negative pages fall back to the first page.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// 1-based page number.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
}

impl ListingQuery {
    /// Resolve the listing for an endpoint's fixed page size.
    pub fn listing(&self, size: PageSize) -> Listing {
        Listing::from_query(
            &PageQuery {
                page: self.page.clone(),
                search: self.search.clone(),
            },
            size,
        )
    }
}

/// `{id, name}` of an allergy, ingredient, or pending ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "גלוטן")]
    pub name: String,
}

impl From<Allergy> for TagDto {
    fn from(value: Allergy) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

impl From<Ingredient> for TagDto {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

impl From<PendingIngredient> for TagDto {
    fn from(value: PendingIngredient) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "USER")]
    pub role: String,
    pub allergies: Vec<TagDto>,
    pub ingredients: Vec<TagDto>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            email: value.email.as_str().to_owned(),
            full_name: value.full_name.as_str().to_owned(),
            role: value.role.as_str().to_owned(),
            allergies: value.allergies.into_iter().map(TagDto::from).collect(),
            ingredients: value.ingredients.into_iter().map(TagDto::from).collect(),
        }
    }
}

/// Restaurant as embedded in a dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRefDto {
    pub id: i32,
    #[schema(example = "Mama Mia")]
    pub name: String,
}

/// A dish with its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishDto {
    pub id: i32,
    #[schema(example = "Margherita")]
    pub name: String,
    pub description: String,
    #[schema(example = 42.5)]
    pub price: f64,
    #[schema(example = "https://cdn.example.com/weekly/9f2c.webp")]
    pub image: String,
    pub allergies: Vec<TagDto>,
    pub ingredients: Vec<TagDto>,
    pub restaurant: RestaurantRefDto,
}

impl From<Dish> for DishDto {
    fn from(value: Dish) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            description: value.description,
            price: value.price,
            image: value.image,
            allergies: value.allergies.into_iter().map(TagDto::from).collect(),
            ingredients: value.ingredients.into_iter().map(TagDto::from).collect(),
            restaurant: RestaurantRefDto {
                id: value.restaurant.id.get(),
                name: value.restaurant.name,
            },
        }
    }
}

/// A restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[schema(example = "0501234567")]
    pub phone: String,
}

impl From<Restaurant> for RestaurantDto {
    fn from(value: Restaurant) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            email: value.email.as_str().to_owned(),
            phone: value.phone,
        }
    }
}

/// `{name}` body used to create or rename allergies and ingredients.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct NameRequest {
    #[schema(example = "שומשום")]
    pub name: Option<String>,
}

/// Confirmation returned by mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "allergy created")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
