//! Allergy reference data under `/allergies`.
//!
//! The full list is public so the registration form can offer it; every
//! mutation and the paged admin view require the `ADMIN` role.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{ADMIN_PAGE_SIZE, AllergyId, TagKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::dto::{ListingQuery, MessageResponse, NameRequest, TagDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation;

/// Every allergy, ordered by id.
#[utoipa::path(
    get,
    path = "/allergies",
    responses((status = 200, description = "Allergies", body = [TagDto])),
    tags = ["allergies"],
    operation_id = "listAllergies",
    security([])
)]
#[get("")]
pub async fn list_allergies(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagDto>>> {
    let allergies = state.allergies.list_all().await?;
    Ok(web::Json(allergies.into_iter().map(TagDto::from).collect()))
}

/// Add an allergy.
#[utoipa::path(
    post,
    path = "/allergies",
    request_body = NameRequest,
    responses(
        (status = 201, description = "Created", body = MessageResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Duplicate name", body = ErrorSchema)
    ),
    tags = ["allergies"],
    operation_id = "createAllergy"
)]
#[post("")]
pub async fn create_allergy(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<NameRequest>,
) -> ApiResult<HttpResponse> {
    let name = validation::tag_name(TagKind::Allergy, payload.name.as_deref())?;
    state.allergies.create(name).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("allergy created")))
}

/// Twelve allergies per page, optionally filtered by name.
#[utoipa::path(
    get,
    path = "/allergies/page",
    params(ListingQuery),
    responses(
        (status = 200, description = "Allergies", body = [TagDto]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["allergies"],
    operation_id = "pageAllergies"
)]
#[get("/page")]
pub async fn page_allergies(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<TagDto>>> {
    let allergies = state.allergies.list(&query.listing(ADMIN_PAGE_SIZE)).await?;
    Ok(web::Json(allergies.into_iter().map(TagDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/allergies/{id}",
    params(("id" = i32, Path, description = "Allergy id")),
    responses(
        (status = 200, description = "Allergy", body = TagDto),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["allergies"],
    operation_id = "getAllergy"
)]
#[get("/{id}")]
pub async fn get_allergy(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<TagDto>> {
    let allergy = state.allergies.get(AllergyId::new(id.into_inner())).await?;
    Ok(web::Json(allergy.into()))
}

#[utoipa::path(
    put,
    path = "/allergies/{id}",
    params(("id" = i32, Path, description = "Allergy id")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Renamed", body = MessageResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Duplicate name", body = ErrorSchema)
    ),
    tags = ["allergies"],
    operation_id = "renameAllergy"
)]
#[put("/{id}")]
pub async fn rename_allergy(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
    payload: web::Json<NameRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let name = validation::tag_name(TagKind::Allergy, payload.name.as_deref())?;
    state
        .allergies
        .rename(AllergyId::new(id.into_inner()), name)
        .await?;
    Ok(web::Json(MessageResponse::new("allergy updated")))
}

/// Delete an allergy after unlinking it from users and dishes.
#[utoipa::path(
    delete,
    path = "/allergies/{id}",
    params(("id" = i32, Path, description = "Allergy id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["allergies"],
    operation_id = "deleteAllergy"
)]
#[delete("/{id}")]
pub async fn delete_allergy(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .allergies
        .delete(AllergyId::new(id.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("allergy deleted")))
}

/// Mount the allergy handlers. `/page` precedes `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/allergies")
            .service(list_allergies)
            .service(create_allergy)
            .service(page_allergies)
            .service(get_allergy)
            .service(rename_allergy)
            .service(delete_allergy),
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

    #[actix_web::test]
    async fn the_full_list_is_public() {
        let harness = TestHarness::new();
        harness.db.insert_allergy("גלוטן");
        harness.db.insert_allergy("בוטנים");
        let app = actix_test::init_service(test_app(harness.data())).await;

        let body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri("/allergies").to_request(),
        )
        .await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[rstest]
    #[case(json!({"name": "שומשום"}), StatusCode::CREATED)]
    #[case(json!({"name": "sesame"}), StatusCode::BAD_REQUEST)]
    #[case(json!({"name": "גלוטן"}), StatusCode::CONFLICT)]
    #[case(json!({}), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn admins_create_allergies(#[case] body: Value, #[case] status: StatusCode) {
        let harness = TestHarness::new();
        harness.db.insert_allergy("גלוטן");
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::post()
            .uri("/allergies")
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), status);
    }

    #[actix_web::test]
    async fn members_cannot_create_allergies() {
        let harness = TestHarness::new();
        let (_, token) = harness.seed_user("jane@example.com", Role::User);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::post()
            .uri("/allergies")
            .insert_header(bearer(&token))
            .set_json(json!({"name": "שומשום"}))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, request).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn page_route_is_not_mistaken_for_an_id() {
        let harness = TestHarness::new();
        harness.db.insert_allergy("חלב");
        harness.db.insert_allergy("ביצים");
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/allergies/page?search=%D7%97%D7%9C%D7%91")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["name"], "חלב");
    }

    #[actix_web::test]
    async fn deleting_unlinks_the_allergy_from_users() {
        let harness = TestHarness::new();
        let gluten = harness.db.insert_allergy("גלוטן");
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let (jane, jane_token) = harness.seed_user("jane@example.com", Role::User);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let declare = actix_test::TestRequest::put()
            .uri(&format!("/users/{}/allergy", jane.id))
            .insert_header(bearer(&jane_token))
            .set_json(json!({"allergyIds": [gluten.id.get()]}))
            .to_request();
        assert_eq!(actix_test::call_service(&app, declare).await.status(), StatusCode::OK);

        let delete = actix_test::TestRequest::delete()
            .uri(&format!("/allergies/{}", gluten.id))
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(actix_test::call_service(&app, delete).await.status(), StatusCode::OK);

        let users: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/users?search=jane")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        assert_eq!(users[0]["allergies"], json!([]));
    }

    #[rstest]
    #[case(999, json!({"name": "חרדל"}), StatusCode::NOT_FOUND)]
    #[case(0, json!({"name": "x"}), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn renames_are_validated_before_lookup(
        #[case] id: i32,
        #[case] body: Value,
        #[case] status: StatusCode,
    ) {
        let harness = TestHarness::new();
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::put()
            .uri(&format!("/allergies/{id}"))
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), status);
    }
}
