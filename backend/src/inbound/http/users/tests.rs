//! Tests for the user handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::Role;
use crate::inbound::http::test_utils::{bearer, test_app};
use crate::test_support::TestHarness;

#[actix_web::test]
async fn admins_page_and_search_users() {
    let harness = TestHarness::new();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    for n in 0..13 {
        harness.seed_user(&format!("diner{n}@example.com"), Role::User);
    }
    let app = actix_test::init_service(test_app(harness.data())).await;

    let first: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?page=0")
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(first.as_array().map(Vec::len), Some(12));

    let second: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?page=2")
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(second.as_array().map(Vec::len), Some(2));

    let found: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?search=DINER12")
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(found[0]["email"], "diner12@example.com");
}

#[rstest]
#[case(true, StatusCode::OK)]
#[case(false, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn only_the_user_or_an_admin_may_replace_dislikes(
    #[case] acting_on_self: bool,
    #[case] status: StatusCode,
) {
    let harness = TestHarness::new();
    let coriander = harness.db.insert_ingredient("כוסברה");
    let (jane, jane_token) = harness.seed_user("jane@example.com", Role::User);
    let (bob, _) = harness.seed_user("bob@example.com", Role::User);
    let target = if acting_on_self { jane.id } else { bob.id };
    let app = actix_test::init_service(test_app(harness.data())).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/users/{target}/like"))
        .insert_header(bearer(&jane_token))
        .set_json(json!({"ingredientIds": [coriander.id.get()]}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), status);
    if acting_on_self {
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["ingredients"], json!([{"id": coriander.id.get(), "name": "כוסברה"}]));
    }
}

#[actix_web::test]
async fn unknown_allergies_are_rejected() {
    let harness = TestHarness::new();
    let (jane, token) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/users/{}/allergy", jane.id))
        .insert_header(bearer(&token))
        .set_json(json!({"allergyIds": [999]}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn role_changes_take_effect_on_the_next_request() {
    let harness = TestHarness::new();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let (jane, jane_token) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    let promote = actix_test::TestRequest::put()
        .uri(&format!("/users/{}/role", jane.id))
        .insert_header(bearer(&admin))
        .set_json(json!({"role": "ADMIN"}))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, promote).await.status(),
        StatusCode::OK
    );

    let listing = actix_test::TestRequest::get()
        .uri("/users")
        .insert_header(bearer(&jane_token))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, listing).await.status(),
        StatusCode::OK
    );
}

#[rstest]
#[case(json!({"role": "CHEF"}), StatusCode::BAD_REQUEST)]
#[case(json!({}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn unknown_roles_are_validation_errors(#[case] body: Value, #[case] status: StatusCode) {
    let harness = TestHarness::new();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let (jane, _) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/users/{}/role", jane.id))
        .insert_header(bearer(&admin))
        .set_json(body)
        .to_request();
    assert_eq!(actix_test::call_service(&app, request).await.status(), status);
}

#[actix_web::test]
async fn deleting_a_user_twice_reports_not_found() {
    let harness = TestHarness::new();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let (jane, _) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let request = actix_test::TestRequest::delete()
            .uri(&format!("/users/{}", jane.id))
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), expected);
    }
}

#[actix_web::test]
async fn admins_read_other_users_dislikes() {
    let harness = TestHarness::new();
    let garlic = harness.db.insert_ingredient("שום");
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let (jane, jane_token) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    let like = actix_test::TestRequest::put()
        .uri(&format!("/users/{}/like", jane.id))
        .insert_header(bearer(&jane_token))
        .set_json(json!({"ingredientIds": [garlic.id.get()]}))
        .to_request();
    assert_eq!(actix_test::call_service(&app, like).await.status(), StatusCode::OK);

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{}/ingr", jane.id))
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(body, json!([{"id": garlic.id.get(), "name": "שום"}]));
}
