//! Ingredient proposals awaiting administrator approval.

use super::tags::{TagKind, TagName};
use super::validation::Violations;
use super::{Error, PendingIngredientId, UserId};

/// An ingredient a user proposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIngredient {
    /// Primary key.
    pub id: PendingIngredientId,
    /// Proposed label, unique among proposals.
    pub name: String,
    /// User whose dislikes gain the ingredient once approved.
    pub proposed_by: UserId,
}

/// How an approval names the resulting ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApprovalName {
    /// Keep the proposed label.
    #[default]
    AsProposed,
    /// Replace the label with an administrator's correction.
    Renamed(TagName),
}

impl ApprovalName {
    /// Parse the optional `name` override of an approval request.
    ///
    /// An absent or blank override keeps the proposed label.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(Self::AsProposed),
            Some(value) => {
                let mut violations = Violations::default();
                let name = violations.check(TagName::parse(TagKind::Ingredient, Some(value)));
                violations.finish(name).map(Self::Renamed)
            }
        }
    }

    /// Final ingredient label for `pending`.
    pub fn resolve(&self, pending: &PendingIngredient) -> TagName {
        match self {
            Self::AsProposed => TagName::from_trusted(pending.name.clone()),
            Self::Renamed(name) => name.clone(),
        }
    }
}
