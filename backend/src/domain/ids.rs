//! Integer identifiers for persisted entities.
//!
//! Each entity gets its own newtype so an allergy id cannot be passed where
//! an ingredient id is expected. Values mirror PostgreSQL `serial` keys.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($( $(#[$meta:meta])* $name:ident ),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(i32);

            impl $name {
                /// Wrap a raw database key.
                #[must_use]
                pub const fn new(raw: i32) -> Self {
                    Self(raw)
                }

                /// Raw database key.
                #[must_use]
                pub const fn get(self) -> i32 {
                    self.0
                }
            }

            impl From<i32> for $name {
                fn from(raw: i32) -> Self {
                    Self(raw)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

define_id! {
    /// Identifier of a registered user.
    UserId,
    /// Identifier of an allergy record.
    AllergyId,
    /// Identifier of an ingredient record.
    IngredientId,
    /// Identifier of a restaurant.
    RestaurantId,
    /// Identifier of a dish.
    DishId,
    /// Identifier of an ingredient proposal awaiting approval.
    PendingIngredientId,
}
