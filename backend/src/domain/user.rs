//! User accounts and their dietary profile.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tags::{Allergy, Ingredient};
use super::validation::{
    FieldResult, FieldViolation, TextRule, email_pattern, person_name_pattern,
};
use super::{AllergyId, IngredientId, UserId};

/// Trimmed email address with a plausible `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    const RULE: TextRule = TextRule {
        field: "email",
        min: 3,
        max: 254,
    };

    /// Validate a raw `email` field.
    pub fn parse(raw: Option<&str>) -> FieldResult<Self> {
        Self::RULE
            .apply(raw, Some((email_pattern(), "must be a valid email address")))
            .map(Self)
    }

    /// Wrap an address read back from storage.
    pub fn from_trusted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name of 2 to 50 English or Hebrew letters and spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    const RULE: TextRule = TextRule {
        field: "fullName",
        min: 2,
        max: 50,
    };

    /// Validate a raw `fullName` field.
    pub fn parse(raw: Option<&str>) -> FieldResult<Self> {
        Self::RULE
            .apply(
                raw,
                Some((
                    person_name_pattern(),
                    "may only contain English or Hebrew letters and spaces",
                )),
            )
            .map(Self)
    }

    /// Wrap a name read back from storage.
    pub fn from_trusted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authorisation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular account.
    #[default]
    User,
    /// Administrator with access to catalogue management.
    Admin,
}

impl Role {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse a raw `role` field.
    pub fn parse(raw: Option<&str>) -> FieldResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Err(vec![FieldViolation::Missing { field: "role" }]),
            Some(value) => value.parse().map_err(|_| {
                vec![FieldViolation::Format {
                    field: "role",
                    rule: "must be USER or ADMIN",
                }]
            }),
        }
    }
}

/// Raised when a stored or supplied role is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user together with their allergies and disliked ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Unique login address.
    pub email: EmailAddress,
    /// Name shown in the UI and embedded in tokens.
    pub full_name: FullName,
    /// Authorisation role.
    pub role: Role,
    /// Allergies the user declared.
    pub allergies: Vec<Allergy>,
    /// Ingredients the user does not want to eat.
    pub ingredients: Vec<Ingredient>,
}

impl User {
    /// Whether the user may use administrator endpoints.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the user may read or change `target`'s profile.
    pub fn can_manage(&self, target: UserId) -> bool {
        self.id == target || self.is_admin()
    }

    /// Identifiers of the declared allergies.
    pub fn allergy_ids(&self) -> BTreeSet<AllergyId> {
        self.allergies.iter().map(|allergy| allergy.id).collect()
    }

    /// Identifiers of the disliked ingredients.
    pub fn ingredient_ids(&self) -> BTreeSet<IngredientId> {
        self.ingredients.iter().map(|ingredient| ingredient.id).collect()
    }
}

#[cfg(test)]
mod tests;
