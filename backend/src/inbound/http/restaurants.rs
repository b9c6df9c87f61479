//! Restaurant administration under `/restaurants`.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ADMIN_PAGE_SIZE, RestaurantDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::dto::{ListingQuery, MessageResponse, RestaurantDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// `POST /restaurants` body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RestaurantRequest {
    #[schema(example = "Mama Mia")]
    pub name: Option<String>,
    #[schema(example = "owner@mamamia.co.il")]
    pub email: Option<String>,
    #[schema(example = "0501234567")]
    pub phone: Option<String>,
}

impl TryFrom<RestaurantRequest> for RestaurantDraft {
    type Error = crate::domain::Error;

    fn try_from(value: RestaurantRequest) -> Result<Self, Self::Error> {
        RestaurantDraft::parse(
            value.name.as_deref(),
            value.email.as_deref(),
            value.phone.as_deref(),
        )
    }
}

/// Twelve restaurants per page, searching name and email.
#[utoipa::path(
    get,
    path = "/restaurants",
    params(ListingQuery),
    responses(
        (status = 200, description = "Restaurants", body = [RestaurantDto]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "listRestaurants"
)]
#[get("")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<RestaurantDto>>> {
    let restaurants = state
        .restaurants
        .list(&query.listing(ADMIN_PAGE_SIZE))
        .await?;
    Ok(web::Json(
        restaurants.into_iter().map(RestaurantDto::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/restaurants",
    request_body = RestaurantRequest,
    responses(
        (status = 201, description = "Created", body = MessageResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<RestaurantRequest>,
) -> ApiResult<HttpResponse> {
    let draft = RestaurantDraft::try_from(payload.into_inner())?;
    state.restaurants.create(draft).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("restaurant created")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/restaurants")
            .service(list_restaurants)
            .service(create_restaurant),
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
    #[case(
        json!({"name": "Mama Mia", "email": "new@mamamia.co.il", "phone": "0501234567"}),
        StatusCode::CREATED
    )]
    #[case(
        json!({"name": "Copy Cat", "email": "taken@example.com", "phone": "0501234567"}),
        StatusCode::CONFLICT
    )]
    #[case(json!({"name": "M", "email": "nope", "phone": "12"}), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn admins_create_restaurants(#[case] body: Value, #[case] status: StatusCode) {
        let harness = TestHarness::new();
        harness.db.insert_restaurant("Original", "taken@example.com");
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::post()
            .uri("/restaurants")
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), status);
    }

    #[actix_web::test]
    async fn invalid_drafts_report_every_field() {
        let harness = TestHarness::new();
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::post()
            .uri("/restaurants")
            .insert_header(bearer(&admin))
            .set_json(json!({}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["message"].as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn listing_searches_email() {
        let harness = TestHarness::new();
        harness.db.insert_restaurant("Falafel King", "king@falafel.co.il");
        harness.db.insert_restaurant("Sushi Bar", "hello@sushi.co.il");
        let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/restaurants?search=sushi")
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["name"], "Sushi Bar");
    }
}
