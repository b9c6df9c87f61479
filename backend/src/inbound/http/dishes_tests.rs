//! Tests for the dish handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::Role;
use crate::inbound::http::test_utils::{bearer, test_app};
use crate::test_support::TestHarness;

fn dish_body(name: &str, restaurant: i32, allergies: &[i32], ingredients: &[i32]) -> Value {
    json!({
        "name": name,
        "description": "Made to order",
        "price": 48.0,
        "image": "https://cdn.test/weekly/dish.webp",
        "restaurantId": restaurant,
        "allergyIds": allergies,
        "ingredientIds": ingredients,
    })
}

#[actix_web::test]
async fn recommendations_follow_allergies_and_dislikes() {
    let harness = TestHarness::new();
    let gluten = harness.db.insert_allergy("גלוטן").id.get();
    let onion = harness.db.insert_ingredient("בצל").id.get();
    let basil = harness.db.insert_ingredient("בזיליקום").id.get();
    let restaurant = harness
        .db
        .insert_restaurant("Mama Mia", "mama@example.com")
        .id
        .get();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let (jane, jane_token) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    for body in [
        dish_body("Tagged", restaurant, &[gluten], &[basil]),
        dish_body("Untagged", restaurant, &[], &[basil]),
        dish_body("Oniony", restaurant, &[gluten], &[onion]),
    ] {
        let request = actix_test::TestRequest::post()
            .uri("/dishes")
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), StatusCode::CREATED);
    }
    for (path, body) in [
        ("allergy", json!({"allergyIds": [gluten]})),
        ("like", json!({"ingredientIds": [onion]})),
    ] {
        let request = actix_test::TestRequest::put()
            .uri(&format!("/users/{}/{path}", jane.id))
            .insert_header(bearer(&jane_token))
            .set_json(body)
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), StatusCode::OK);
    }

    let dishes: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/dishes/user")
            .insert_header(bearer(&jane_token))
            .to_request(),
    )
    .await;
    let names: Vec<&str> = dishes
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|dish| dish["name"].as_str())
        .collect();
    assert_eq!(names, ["Tagged"]);
    assert_eq!(dishes[0]["restaurant"]["name"], "Mama Mia");
}

#[actix_web::test]
async fn users_without_allergies_are_recommended_nothing() {
    let harness = TestHarness::new();
    let gluten = harness.db.insert_allergy("גלוטן").id.get();
    let restaurant = harness.db.insert_restaurant("Pita", "pita@example.com").id.get();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let (_, token) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    let create = actix_test::TestRequest::post()
        .uri("/dishes")
        .insert_header(bearer(&admin))
        .set_json(dish_body("Sabich", restaurant, &[gluten], &[]))
        .to_request();
    assert_eq!(actix_test::call_service(&app, create).await.status(), StatusCode::CREATED);

    let dishes: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/dishes/user")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(dishes, json!([]));
}

#[actix_web::test]
async fn admin_pages_hold_eight_dishes() {
    let harness = TestHarness::new();
    let restaurant = harness.db.insert_restaurant("Pita", "pita@example.com").id.get();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let app = actix_test::init_service(test_app(harness.data())).await;
    for n in 0..9 {
        let request = actix_test::TestRequest::post()
            .uri("/dishes")
            .insert_header(bearer(&admin))
            .set_json(dish_body(&format!("Dish {n}"), restaurant, &[], &[]))
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), StatusCode::CREATED);
    }

    for (page, expected) in [("0", 8), ("1", 8), ("2", 1)] {
        let body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/dishes/page?page={page}"))
                .insert_header(bearer(&admin))
                .to_request(),
        )
        .await;
        assert_eq!(body.as_array().map(Vec::len), Some(expected), "page {page}");
    }
}

#[rstest]
#[case(dish_body("Ghost", 999, &[], &[]), StatusCode::NOT_FOUND)]
#[case(dish_body("Existing", 0, &[], &[]), StatusCode::CONFLICT)]
#[case(dish_body("Tagged", 0, &[999], &[]), StatusCode::BAD_REQUEST)]
#[case(json!({"name": "X"}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn creation_failures(#[case] mut body: Value, #[case] status: StatusCode) {
    let harness = TestHarness::new();
    let restaurant = harness.db.insert_restaurant("Pita", "pita@example.com").id.get();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let app = actix_test::init_service(test_app(harness.data())).await;
    let seed = actix_test::TestRequest::post()
        .uri("/dishes")
        .insert_header(bearer(&admin))
        .set_json(dish_body("Existing", restaurant, &[], &[]))
        .to_request();
    assert_eq!(actix_test::call_service(&app, seed).await.status(), StatusCode::CREATED);
    if body["restaurantId"] == 0 {
        body["restaurantId"] = json!(restaurant);
    }

    let request = actix_test::TestRequest::post()
        .uri("/dishes")
        .insert_header(bearer(&admin))
        .set_json(body)
        .to_request();
    assert_eq!(actix_test::call_service(&app, request).await.status(), status);
    assert_eq!(harness.db.dish_count(), 1);
}

#[actix_web::test]
async fn updates_replace_fields_and_tags() {
    let harness = TestHarness::new();
    let gluten = harness.db.insert_allergy("גלוטן").id.get();
    let restaurant = harness.db.insert_restaurant("Pita", "pita@example.com").id.get();
    let (_, admin) = harness.seed_user("admin@example.com", Role::Admin);
    let app = actix_test::init_service(test_app(harness.data())).await;
    let create = actix_test::TestRequest::post()
        .uri("/dishes")
        .insert_header(bearer(&admin))
        .set_json(dish_body("Sabich", restaurant, &[gluten], &[]))
        .to_request();
    assert_eq!(actix_test::call_service(&app, create).await.status(), StatusCode::CREATED);
    let listed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/dishes/page")
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    let id = listed[0]["id"].as_i64().expect("numeric id");

    let update = actix_test::TestRequest::put()
        .uri(&format!("/dishes/{id}"))
        .insert_header(bearer(&admin))
        .set_json(dish_body("Sabich Deluxe", restaurant, &[], &[]))
        .to_request();
    assert_eq!(actix_test::call_service(&app, update).await.status(), StatusCode::OK);

    let dish: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/dishes/{id}"))
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(dish["name"], "Sabich Deluxe");
    assert_eq!(dish["allergies"], json!([]));
}

#[actix_web::test]
async fn members_cannot_browse_the_catalogue() {
    let harness = TestHarness::new();
    let (_, token) = harness.seed_user("jane@example.com", Role::User);
    let app = actix_test::init_service(test_app(harness.data())).await;

    let request = actix_test::TestRequest::get()
        .uri("/dishes/page")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status(),
        StatusCode::FORBIDDEN
    );
}
