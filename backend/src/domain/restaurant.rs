//! Restaurants that own dishes.

use super::validation::{TextRule, Violations, person_name_pattern, phone_pattern};
use super::{EmailAddress, Error, RestaurantId};

/// A stored restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    /// Primary key.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Unique contact address.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone: String,
}

/// Validated `POST /restaurants` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantDraft {
    /// Display name: 2 to 50 English or Hebrew letters and spaces.
    pub name: String,
    /// Contact address; must not belong to another restaurant.
    pub email: EmailAddress,
    /// Local phone number: a digit followed by nine or ten characters.
    pub phone: String,
}

impl RestaurantDraft {
    const NAME: TextRule = TextRule {
        field: "name",
        min: 2,
        max: 50,
    };
    const PHONE: TextRule = TextRule {
        field: "phone",
        min: 8,
        max: 50,
    };

    /// Validate raw restaurant fields.
    pub fn parse(
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, Error> {
        let mut violations = Violations::default();
        let name = violations.check(Self::NAME.apply(
            name,
            Some((
                person_name_pattern(),
                "may only contain English or Hebrew letters and spaces",
            )),
        ));
        let email = violations.check(EmailAddress::parse(email));
        let phone = violations.check(
            Self::PHONE.apply(phone, Some((phone_pattern(), "must be a valid phone number"))),
        );
        let draft = match (name, email, phone) {
            (Some(name), Some(email), Some(phone)) => Some(Self { name, email, phone }),
            _ => None,
        };
        violations.finish(draft)
    }
}
