//! Allergy and ingredient reference data.
//!
//! Both are short Hebrew labels with unique names that users and dishes are
//! tagged with.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{FieldResult, TextRule, hebrew_name_pattern};
use super::{AllergyId, IngredientId};

/// An allergy users can declare and dishes can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergy {
    /// Primary key.
    pub id: AllergyId,
    /// Unique label.
    pub name: String,
}

/// An ingredient users can dislike and dishes can contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Primary key.
    pub id: IngredientId,
    /// Unique label.
    pub name: String,
}

/// Which reference table a [`TagName`] is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Allergy names.
    Allergy,
    /// Ingredient and pending-ingredient names.
    Ingredient,
}

/// Validated allergy or ingredient label: 2 to 25 Hebrew letters and spaces.
///
/// # Examples
/// ```
/// use safeplate::domain::{TagKind, TagName};
///
/// let name = TagName::parse(TagKind::Allergy, Some(" גלוטן ")).unwrap();
/// assert_eq!(name.as_str(), "גלוטן");
/// assert!(TagName::parse(TagKind::Ingredient, Some("flour")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Validate a raw `name` field.
    pub fn parse(kind: TagKind, raw: Option<&str>) -> FieldResult<Self> {
        let rule = TextRule {
            field: match kind {
                TagKind::Allergy => "allergy name",
                TagKind::Ingredient => "ingredient name",
            },
            min: 2,
            max: 25,
        };
        rule.apply(
            raw,
            Some((
                hebrew_name_pattern(),
                "may only contain Hebrew letters and spaces",
            )),
        )
        .map(Self)
    }

    /// Wrap a label read back from storage.
    pub fn from_trusted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
