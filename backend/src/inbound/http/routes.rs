//! Mounting of every REST handler.
//!
//! ```text
//! /              banner
//! /auth          registration, login, verification codes
//! /users         administration and preferences
//! /allergies     reference data
//! /ingredients   reference data
//! /pending       ingredient proposals
//! /restaurants   restaurant administration
//! /dishes        catalogue and recommendations
//! /upload        image publishing
//! ```

use actix_web::web;

use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::{
    accounts, allergies, dishes, health, ingredients, pending, restaurants, uploads, users,
};

/// Register the handlers and the extractor error envelopes.
///
/// Health checks are mounted by the server, which owns their state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health::banner);
    accounts::configure(cfg);
    users::configure(cfg);
    allergies::configure(cfg);
    ingredients::configure(cfg);
    pending::configure(cfg);
    restaurants::configure(cfg);
    dishes::configure(cfg);
    uploads::configure(cfg);
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::test_app;
    use crate::test_support::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case("/", StatusCode::OK)]
    #[case("/allergies", StatusCode::OK)]
    #[case("/ingredients", StatusCode::UNAUTHORIZED)]
    #[case("/users", StatusCode::UNAUTHORIZED)]
    #[case("/dishes/user", StatusCode::UNAUTHORIZED)]
    #[case("/menus", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn every_prefix_is_mounted(#[case] uri: &str, #[case] status: StatusCode) {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(harness.data())).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(response.status(), status, "{uri}");
    }

    #[actix_web::test]
    async fn malformed_ids_use_the_error_envelope() {
        let harness = TestHarness::new();
        let (_, admin) = harness.seed_user("admin@example.com", crate::domain::Role::Admin);
        let app = actix_test::init_service(test_app(harness.data())).await;

        let request = actix_test::TestRequest::get()
            .uri("/dishes/soup")
            .insert_header(crate::inbound::http::test_utils::bearer(&admin))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "invalid id");
    }
}
