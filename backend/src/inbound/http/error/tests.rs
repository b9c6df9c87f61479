//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let value = serde_json::from_slice(&bytes).expect("error JSON");
    (status, header, value)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::validation(vec!["a".into()]), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("user exists"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("pool"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace_id() {
    let error = Error::internal("connection reset by peer")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = body_of(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({"code": "internal_error", "message": REDACTED, "traceId": TRACE_ID})
    );
}

#[actix_web::test]
async fn validation_errors_carry_every_message() {
    let error = Error::validation(vec![
        "name is required".to_owned(),
        "price is required".to_owned(),
    ]);

    let (status, header, body) = body_of(&error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none());
    assert_eq!(
        body,
        json!({
            "code": "invalid_request",
            "message": ["name is required", "price is required"],
        })
    );
}

#[actix_web::test]
async fn conflicts_keep_their_message_and_details() {
    let error = Error::conflict("dish exists").with_details(json!({"field": "name"}));

    let (_, _, body) = body_of(&error).await;
    assert_eq!(body["message"], "dish exists");
    assert_eq!(body["details"], json!({"field": "name"}));
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.to_string(), REDACTED);
    assert_eq!(err.details(), None);
}

#[derive(serde::Deserialize)]
struct Echo {
    #[expect(dead_code, reason = "only deserialisation is exercised")]
    name: String,
}

#[actix_web::test]
async fn extractor_failures_and_unknown_routes_use_the_error_envelope() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .route(
                "/echo",
                web::post().to(|_: web::Json<Echo>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/items/{id}",
                web::get().to(|_: web::Path<i32>| async { HttpResponse::Ok().finish() }),
            )
            .default_service(web::to(not_found)),
    )
    .await;

    let cases = [
        (
            actix_test::TestRequest::post()
                .uri("/echo")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
            StatusCode::BAD_REQUEST,
            "invalid_request",
        ),
        (
            actix_test::TestRequest::get().uri("/items/abc").to_request(),
            StatusCode::BAD_REQUEST,
            "invalid_request",
        ),
        (
            actix_test::TestRequest::get().uri("/nowhere").to_request(),
            StatusCode::NOT_FOUND,
            "not_found",
        ),
    ];

    for (request, status, code) in cases {
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), status);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], code);
    }
}
