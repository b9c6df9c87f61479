//! Ingredient reference data under `/ingredients`.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{ADMIN_PAGE_SIZE, IngredientId, TagKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::dto::{ListingQuery, MessageResponse, NameRequest, TagDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation;

/// Every ingredient, for the dislike picker.
#[utoipa::path(
    get,
    path = "/ingredients",
    responses(
        (status = 200, description = "Ingredients", body = [TagDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TagDto>>> {
    let ingredients = state.ingredients.list_all().await?;
    Ok(web::Json(ingredients.into_iter().map(TagDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/ingredients",
    request_body = NameRequest,
    responses(
        (status = 201, description = "Created", body = MessageResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Duplicate name", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient"
)]
#[post("")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<NameRequest>,
) -> ApiResult<HttpResponse> {
    let name = validation::tag_name(TagKind::Ingredient, payload.name.as_deref())?;
    state.ingredients.create(name).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("ingredient created")))
}

#[utoipa::path(
    get,
    path = "/ingredients/page",
    params(ListingQuery),
    responses(
        (status = 200, description = "Ingredients", body = [TagDto]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "pageIngredients"
)]
#[get("/page")]
pub async fn page_ingredients(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<TagDto>>> {
    let ingredients = state
        .ingredients
        .list(&query.listing(ADMIN_PAGE_SIZE))
        .await?;
    Ok(web::Json(ingredients.into_iter().map(TagDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/ingredients/{id}",
    params(("id" = i32, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = TagDto),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient"
)]
#[get("/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<TagDto>> {
    let ingredient = state
        .ingredients
        .get(IngredientId::new(id.into_inner()))
        .await?;
    Ok(web::Json(ingredient.into()))
}

#[utoipa::path(
    put,
    path = "/ingredients/{id}",
    params(("id" = i32, Path, description = "Ingredient id")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Renamed", body = MessageResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Duplicate name", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "renameIngredient"
)]
#[put("/{id}")]
pub async fn rename_ingredient(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
    payload: web::Json<NameRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let name = validation::tag_name(TagKind::Ingredient, payload.name.as_deref())?;
    state
        .ingredients
        .rename(IngredientId::new(id.into_inner()), name)
        .await?;
    Ok(web::Json(MessageResponse::new("ingredient updated")))
}

/// Delete an ingredient after unlinking it from users and dishes.
#[utoipa::path(
    delete,
    path = "/ingredients/{id}",
    params(("id" = i32, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "deleteIngredient"
)]
#[delete("/{id}")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .ingredients
        .delete(IngredientId::new(id.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("ingredient deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ingredients")
            .service(list_ingredients)
            .service(create_ingredient)
            .service(page_ingredients)
            .service(get_ingredient)
            .service(rename_ingredient)
            .service(delete_ingredient),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{bearer, test_app};
    use crate::test_support::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some(Role::User), StatusCode::OK)]
    #[case(Some(Role::Admin), StatusCode::OK)]
    #[actix_web::test]
    async fn listing_requires_a_signed_in_user(
        #[case] role: Option<Role>,
        #[case] status: StatusCode,
    ) {
        let harness = TestHarness::new();
        harness.db.insert_ingredient("בצל");
        let mut request = actix_test::TestRequest::get().uri("/ingredients");
        if let Some(role) = role {
            let (_, token) = harness.seed_user("someone@example.com", role);
            request = request.insert_header(bearer(&token));
        }
        let app = actix_test::init_service(test_app(harness.data())).await;

        let response = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), status);
    }

    #[actix_web::test]
    async fn create_then_fetch_by_id() {
        let harness = TestHarness::new();
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let create = actix_test::TestRequest::post()
            .uri("/ingredients")
            .insert_header(bearer(&admin))
            .set_json(json!({"name": "פטרוזיליה"}))
            .to_request();
        let response = actix_test::call_service(&app, create).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body, json!({"message": "ingredient created"}));

        let all: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/ingredients")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        let id = all[0]["id"].as_i64().expect("numeric id");

        let fetched: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/ingredients/{id}"))
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        assert_eq!(fetched["name"], "פטרוזיליה");
    }

    #[actix_web::test]
    async fn renaming_onto_an_existing_name_conflicts() {
        let harness = TestHarness::new();
        harness.db.insert_ingredient("שום");
        let onion = harness.db.insert_ingredient("בצל");
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::put()
            .uri(&format!("/ingredients/{}", onion.id))
            .insert_header(bearer(&admin))
            .set_json(json!({"name": "שום"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "ingredient exists");
    }
}
