//! Dishes served by restaurants and tagged with allergies and ingredients.

use std::collections::BTreeSet;

use url::Url;

use super::tags::{Allergy, Ingredient};
use super::validation::{FieldViolation, TextRule, Violations};
use super::{AllergyId, DishId, Error, IngredientId, RestaurantId};

/// The owning restaurant as embedded in dish listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRef {
    /// Restaurant key.
    pub id: RestaurantId,
    /// Restaurant display name.
    pub name: String,
}

/// A dish with its tags and owning restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    /// Primary key.
    pub id: DishId,
    /// Unique dish name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Menu price.
    pub price: f64,
    /// Public image URL.
    pub image: String,
    /// Owning restaurant.
    pub restaurant: RestaurantRef,
    /// Allergies the dish triggers.
    pub allergies: Vec<Allergy>,
    /// Ingredients the dish contains.
    pub ingredients: Vec<Ingredient>,
}

impl Dish {
    /// Identifiers of the allergy tags.
    pub fn allergy_ids(&self) -> BTreeSet<AllergyId> {
        self.allergies.iter().map(|allergy| allergy.id).collect()
    }

    /// Identifiers of the ingredient tags.
    pub fn ingredient_ids(&self) -> BTreeSet<IngredientId> {
        self.ingredients.iter().map(|ingredient| ingredient.id).collect()
    }
}

/// Raw dish fields as received from a request body.
#[derive(Debug, Clone, Default)]
pub struct DishFields<'a> {
    /// Dish name.
    pub name: Option<&'a str>,
    /// Menu description.
    pub description: Option<&'a str>,
    /// Menu price.
    pub price: Option<f64>,
    /// Public image URL.
    pub image: Option<&'a str>,
    /// Owning restaurant key.
    pub restaurant_id: Option<i32>,
    /// Allergy tag keys.
    pub allergy_ids: Vec<i32>,
    /// Ingredient tag keys.
    pub ingredient_ids: Vec<i32>,
}

/// Validated dish input for creation and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct DishDraft {
    /// Unique dish name, 2 to 50 characters.
    pub name: String,
    /// Description, 2 to 500 characters.
    pub description: String,
    /// Finite, non-negative price.
    pub price: f64,
    /// Absolute `http`/`https` image URL.
    pub image: String,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Allergy tags, sorted and deduplicated.
    pub allergy_ids: Vec<AllergyId>,
    /// Ingredient tags, sorted and deduplicated.
    pub ingredient_ids: Vec<IngredientId>,
}

impl DishDraft {
    const NAME: TextRule = TextRule {
        field: "name",
        min: 2,
        max: 50,
    };
    const DESCRIPTION: TextRule = TextRule {
        field: "description",
        min: 2,
        max: 500,
    };
    const IMAGE: TextRule = TextRule {
        field: "image",
        min: 1,
        max: 2048,
    };

    /// Validate raw dish fields.
    pub fn parse(fields: DishFields<'_>) -> Result<Self, Error> {
        let mut violations = Violations::default();
        let name = violations.check(Self::NAME.apply(fields.name, None));
        let description = violations.check(Self::DESCRIPTION.apply(fields.description, None));
        let price = match fields.price {
            None => {
                violations.push(FieldViolation::Missing { field: "price" });
                None
            }
            Some(value) if !value.is_finite() || value < 0.0 => {
                violations.push(FieldViolation::Format {
                    field: "price",
                    rule: "must be a non-negative number",
                });
                None
            }
            Some(value) => Some(value),
        };
        let image = violations
            .check(Self::IMAGE.apply(fields.image, None))
            .and_then(|image| match Url::parse(&image) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(image),
                _ => {
                    violations.push(FieldViolation::Format {
                        field: "image",
                        rule: "must be an absolute http(s) URL",
                    });
                    None
                }
            });
        let restaurant_id = fields.restaurant_id.map(RestaurantId::new);
        if restaurant_id.is_none() {
            violations.push(FieldViolation::Missing {
                field: "restaurantId",
            });
        }

        let draft = match (name, description, price, image, restaurant_id) {
            (Some(name), Some(description), Some(price), Some(image), Some(restaurant_id)) => {
                Some(Self {
                    name,
                    description,
                    price,
                    image,
                    restaurant_id,
                    allergy_ids: sorted_ids(fields.allergy_ids, AllergyId::new),
                    ingredient_ids: sorted_ids(fields.ingredient_ids, IngredientId::new),
                })
            }
            _ => None,
        };
        violations.finish(draft)
    }
}

fn sorted_ids<T: Ord>(raw: Vec<i32>, wrap: fn(i32) -> T) -> Vec<T> {
    raw.into_iter()
        .map(wrap)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> DishFields<'static> {
        DishFields {
            name: Some("Shakshuka"),
            description: Some("Eggs poached in spiced tomato sauce"),
            price: Some(42.5),
            image: Some("https://cdn.example.com/weekly/shakshuka.webp"),
            restaurant_id: Some(2),
            allergy_ids: vec![4, 1, 4],
            ingredient_ids: vec![],
        }
    }

    #[rstest]
    fn accepts_complete_dishes(fields: DishFields<'static>) {
        let draft = DishDraft::parse(fields).expect("valid dish");
        assert_eq!(draft.allergy_ids, vec![AllergyId::new(1), AllergyId::new(4)]);
        assert_eq!(draft.restaurant_id, RestaurantId::new(2));
    }

    #[rstest]
    #[case(Some(-1.0))]
    #[case(Some(f64::NAN))]
    #[case(None)]
    fn rejects_bad_prices(fields: DishFields<'static>, #[case] price: Option<f64>) {
        let err = DishDraft::parse(DishFields { price, ..fields }).expect_err("bad price");
        assert!(err.messages().all(|message| message.starts_with("price")));
    }

    #[rstest]
    #[case("ftp://cdn.example.com/a.webp")]
    #[case("shakshuka.webp")]
    fn rejects_non_http_images(fields: DishFields<'static>, #[case] image: &'static str) {
        let err = DishDraft::parse(DishFields {
            image: Some(image),
            ..fields
        })
        .expect_err("bad image");
        assert_eq!(
            err.messages().collect::<Vec<_>>(),
            ["image must be an absolute http(s) URL"]
        );
    }

    #[rstest]
    fn reports_missing_fields_together() {
        let err = DishDraft::parse(DishFields::default()).expect_err("empty dish");
        assert_eq!(err.messages().count(), 5);
    }
}
