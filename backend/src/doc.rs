//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every handler, the request and response bodies, the
//! error envelope, and the bearer-token security scheme. Swagger UI serves
//! it in debug builds and `cargo run --bin openapi-dump` prints it.

use crate::inbound::http::accounts::{
    AuthResponse, CodeResponse, CredentialsRequest, EmailRequest, RegisterRequest,
};
use crate::inbound::http::dishes::DishRequest;
use crate::inbound::http::dto::{
    DishDto, MessageResponse, NameRequest, RestaurantDto, RestaurantRefDto, TagDto, UserDto,
};
use crate::inbound::http::pending::QueueLength;
use crate::inbound::http::restaurants::RestaurantRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorMessageSchema, ErrorSchema};
use crate::inbound::http::uploads::{ImageUploadForm, UploadResponse};
use crate::inbound::http::users::{AllergyIdsRequest, IngredientIdsRequest, RoleRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the security scheme protected operations reference.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Register the bearer-token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some(
                "Token returned by POST /auth/register or POST /auth/login.",
            ))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SafePlate backend API",
        description = "Accounts, allergy and ingredient reference data, restaurants, and personalised dish recommendations."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::health::banner,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::send_signup_code,
        crate::inbound::http::accounts::send_reset_code,
        crate::inbound::http::accounts::reset_password,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::replace_ingredients,
        crate::inbound::http::users::replace_allergies,
        crate::inbound::http::users::set_role,
        crate::inbound::http::users::disliked_ingredients,
        crate::inbound::http::allergies::list_allergies,
        crate::inbound::http::allergies::create_allergy,
        crate::inbound::http::allergies::page_allergies,
        crate::inbound::http::allergies::get_allergy,
        crate::inbound::http::allergies::rename_allergy,
        crate::inbound::http::allergies::delete_allergy,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::create_ingredient,
        crate::inbound::http::ingredients::page_ingredients,
        crate::inbound::http::ingredients::get_ingredient,
        crate::inbound::http::ingredients::rename_ingredient,
        crate::inbound::http::ingredients::delete_ingredient,
        crate::inbound::http::pending::queue_length,
        crate::inbound::http::pending::list_pending,
        crate::inbound::http::pending::propose,
        crate::inbound::http::pending::reject,
        crate::inbound::http::pending::approve,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::create_restaurant,
        crate::inbound::http::dishes::recommend_dishes,
        crate::inbound::http::dishes::page_dishes,
        crate::inbound::http::dishes::create_dish,
        crate::inbound::http::dishes::get_dish,
        crate::inbound::http::dishes::update_dish,
        crate::inbound::http::uploads::upload_image,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorMessageSchema,
        TagDto,
        UserDto,
        DishDto,
        RestaurantDto,
        RestaurantRefDto,
        MessageResponse,
        NameRequest,
        RegisterRequest,
        CredentialsRequest,
        EmailRequest,
        AuthResponse,
        CodeResponse,
        IngredientIdsRequest,
        AllergyIdsRequest,
        RoleRequest,
        QueueLength,
        RestaurantRequest,
        DishRequest,
        ImageUploadForm,
        UploadResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and verification codes"),
        (name = "users", description = "User administration and preferences"),
        (name = "allergies", description = "Allergy reference data"),
        (name = "ingredients", description = "Ingredient reference data"),
        (name = "pending", description = "Ingredient proposals awaiting approval"),
        (name = "restaurants", description = "Restaurant administration"),
        (name = "dishes", description = "Dish catalogue and recommendations"),
        (name = "uploads", description = "Dish image publishing"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
