//! Domain primitives, validated inputs, and the use-case services.
//!
//! Purpose: hold every rule of the menu recommendation backend independent
//! of HTTP and storage. Inbound adapters parse requests into the validated
//! input types here and call the services; services reach infrastructure
//! only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - Value types: ids, [`User`], [`Allergy`], [`Ingredient`], [`Restaurant`],
//!   [`Dish`], [`PendingIngredient`].
//! - Validated inputs: [`Registration`], [`TagName`], [`RestaurantDraft`],
//!   [`DishDraft`], and friends.
//! - [`RecommendationCriteria`]: the personalised dish filter.
//! - Services: one per resource family.

pub mod ports;

mod account_service;
mod allergy_service;
mod auth;
mod blocking;
mod dish;
mod dish_service;
pub mod error;
mod ids;
mod image_upload_service;
mod ingredient_service;
mod pending;
mod pending_ingredient_service;
mod recommendation;
mod restaurant;
mod restaurant_service;
mod search;
mod tags;
pub mod trace_id;
mod user;
mod user_service;
mod validation;

pub use self::account_service::{AccountService, AuthSession};
pub use self::allergy_service::AllergyService;
pub use self::auth::{
    LoginCredentials, Password, PasswordDigest, PasswordReset, Registration, VerificationCode,
};
pub use self::dish::{Dish, DishDraft, DishFields, RestaurantRef};
pub use self::dish_service::DishService;
pub use self::error::{Error, ErrorCode, ErrorMessage};
pub use self::ids::{AllergyId, DishId, IngredientId, PendingIngredientId, RestaurantId, UserId};
pub use self::image_upload_service::{IMAGE_KEY_PREFIX, ImageUploadService};
pub use self::ingredient_service::IngredientService;
pub use self::pending::{ApprovalName, PendingIngredient};
pub use self::pending_ingredient_service::PendingIngredientService;
pub use self::recommendation::{AllergyRequirement, RecommendationCriteria};
pub use self::restaurant::{Restaurant, RestaurantDraft};
pub use self::restaurant_service::RestaurantService;
pub use self::search::{ADMIN_PAGE_SIZE, DISH_PAGE_SIZE, Listing, SearchTerm};
pub use self::tags::{Allergy, Ingredient, TagKind, TagName};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, FullName, Role, UnknownRole, User};
pub use self::user_service::UserService;
pub use self::validation::{FieldResult, FieldViolation, Violations};
