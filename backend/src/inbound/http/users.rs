//! User administration and preference handlers under `/users`.
//!
//! ```text
//! GET    /users?page=&search=   admin
//! DELETE /users/{id}            admin
//! PUT    /users/{id}/like       self or admin  {"ingredientIds":[..]}
//! PUT    /users/{id}/allergy    self or admin  {"allergyIds":[..]}
//! PUT    /users/{id}/role       admin          {"role":"ADMIN"}
//! GET    /users/{id}/ingr       self or admin
//! ```

use actix_web::{delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ADMIN_PAGE_SIZE, AllergyId, IngredientId, Role, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::dto::{ListingQuery, MessageResponse, TagDto, UserDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation;

/// Replacement set of disliked ingredients.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientIdsRequest {
    #[serde(default)]
    pub ingredient_ids: Vec<i32>,
}

/// Replacement set of allergies.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllergyIdsRequest {
    #[serde(default)]
    pub allergy_ids: Vec<i32>,
}

/// New role for a user.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RoleRequest {
    #[schema(example = "ADMIN")]
    pub role: Option<String>,
}

/// List users, twelve per page, searching name and email.
#[utoipa::path(
    get,
    path = "/users",
    params(ListingQuery),
    responses(
        (status = 200, description = "Users", body = [UserDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<UserDto>>> {
    let users = state.users.list(&query.listing(ADMIN_PAGE_SIZE)).await?;
    Ok(web::Json(users.into_iter().map(UserDto::from).collect()))
}

/// Delete a user with their links and proposals.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.users.delete(UserId::new(id.into_inner())).await?;
    Ok(web::Json(MessageResponse::new("user deleted")))
}

/// Replace the ingredients a user does not want to eat.
#[utoipa::path(
    put,
    path = "/users/{id}/like",
    params(("id" = i32, Path, description = "User id")),
    request_body = IngredientIdsRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Unknown ingredient", body = ErrorSchema),
        (status = 403, description = "Another user's profile", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceDislikedIngredients"
)]
#[put("/{id}/like")]
pub async fn replace_ingredients(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i32>,
    payload: web::Json<IngredientIdsRequest>,
) -> ApiResult<web::Json<UserDto>> {
    let ids: Vec<IngredientId> = payload
        .ingredient_ids
        .iter()
        .copied()
        .map(IngredientId::new)
        .collect();
    let user = state
        .users
        .replace_ingredients(&caller, UserId::new(id.into_inner()), &ids)
        .await?;
    Ok(web::Json(user.into()))
}

/// Replace the allergies a user declared.
#[utoipa::path(
    put,
    path = "/users/{id}/allergy",
    params(("id" = i32, Path, description = "User id")),
    request_body = AllergyIdsRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Unknown allergy", body = ErrorSchema),
        (status = 403, description = "Another user's profile", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceAllergies"
)]
#[put("/{id}/allergy")]
pub async fn replace_allergies(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i32>,
    payload: web::Json<AllergyIdsRequest>,
) -> ApiResult<web::Json<UserDto>> {
    let ids: Vec<AllergyId> = payload
        .allergy_ids
        .iter()
        .copied()
        .map(AllergyId::new)
        .collect();
    let user = state
        .users
        .replace_allergies(&caller, UserId::new(id.into_inner()), &ids)
        .await?;
    Ok(web::Json(user.into()))
}

/// Promote or demote a user.
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    params(("id" = i32, Path, description = "User id")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role changed", body = MessageResponse),
        (status = 400, description = "Unknown role", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setUserRole"
)]
#[put("/{id}/role")]
pub async fn set_role(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let role = validation::field(Role::parse(payload.role.as_deref()))?;
    state
        .users
        .set_role(UserId::new(id.into_inner()), role)
        .await?;
    Ok(web::Json(MessageResponse::new("role updated")))
}

/// The ingredients a user does not want to eat.
#[utoipa::path(
    get,
    path = "/users/{id}/ingr",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Disliked ingredients", body = [TagDto]),
        (status = 403, description = "Another user's profile", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "dislikedIngredients"
)]
#[get("/{id}/ingr")]
pub async fn disliked_ingredients(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<Vec<TagDto>>> {
    let ingredients = state
        .users
        .disliked_ingredients(&caller, UserId::new(id.into_inner()))
        .await?;
    Ok(web::Json(ingredients.into_iter().map(TagDto::from).collect()))
}

/// Mount the user handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(list_users)
            .service(delete_user)
            .service(replace_ingredients)
            .service(replace_allergies)
            .service(set_role)
            .service(disliked_ingredients),
    );
}

#[cfg(test)]
mod tests;
