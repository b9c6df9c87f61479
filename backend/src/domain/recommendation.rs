//! Personalised dish filtering.
//!
//! A user's declared allergies and disliked ingredients decide which dishes
//! the recommendation listing returns:
//!
//! - With at least one declared allergy, a dish must be tagged with every
//!   declared allergy and must contain none of the disliked ingredients.
//! - Without declared allergies, a dish must share an allergy tag with the
//!   allergies stored for the user (through the user-to-allergy relation) and
//!   must contain none of the disliked ingredients.
//!
//! Persistence adapters express the same rule in SQL; [`RecommendationCriteria::admits`]
//! is the reference used to verify them.

use std::collections::BTreeSet;

use super::dish::Dish;
use super::user::User;
use super::{AllergyId, IngredientId, UserId};

/// Allergy constraint a recommended dish must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllergyRequirement {
    /// The dish carries every listed allergy tag.
    TaggedWithAll(BTreeSet<AllergyId>),
    /// The dish carries at least one allergy stored for the user.
    SharesUserAllergy(UserId),
}

/// Filter applied to the dish catalogue for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCriteria {
    /// Allergy constraint.
    pub allergies: AllergyRequirement,
    /// Ingredients the dish must not contain.
    pub disliked: BTreeSet<IngredientId>,
}

impl RecommendationCriteria {
    /// Derive the criteria from a user's profile.
    pub fn for_user(user: &User) -> Self {
        let declared = user.allergy_ids();
        let allergies = if declared.is_empty() {
            AllergyRequirement::SharesUserAllergy(user.id)
        } else {
            AllergyRequirement::TaggedWithAll(declared)
        };
        Self {
            allergies,
            disliked: user.ingredient_ids(),
        }
    }

    /// Whether `dish` passes the filter.
    ///
    /// `stored_allergies` are the allergies linked to the user named by
    /// [`AllergyRequirement::SharesUserAllergy`]; the other branch ignores
    /// them.
    pub fn admits(&self, dish: &Dish, stored_allergies: &BTreeSet<AllergyId>) -> bool {
        let tags = dish.allergy_ids();
        let allergy_ok = match &self.allergies {
            AllergyRequirement::TaggedWithAll(required) => required.is_subset(&tags),
            AllergyRequirement::SharesUserAllergy(_) => !tags.is_disjoint(stored_allergies),
        };
        allergy_ok && dish.ingredient_ids().is_disjoint(&self.disliked)
    }
}
