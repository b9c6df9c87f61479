//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("twice"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn single_messages_serialise_as_strings() {
    let value = serde_json::to_value(Error::conflict("user exists")).expect("serialises");
    assert_eq!(value, json!({"code": "conflict", "message": "user exists"}));
}

#[rstest]
fn validation_messages_serialise_as_arrays() {
    let error = Error::validation(vec!["a".to_owned(), "b".to_owned()]);
    let value = serde_json::to_value(&error).expect("serialises");
    assert_eq!(value["message"], json!(["a", "b"]));
    assert_eq!(value["code"], json!("invalid_request"));
    assert_eq!(error.to_string(), "a; b");
}

#[rstest]
fn payload_round_trips_through_json() {
    let error = Error::not_found("dish not found")
        .with_trace_id("abc")
        .with_details(json!({"id": 4}));
    let text = serde_json::to_string(&error).expect("serialises");
    let parsed: Error = serde_json::from_str(&text).expect("deserialises");
    assert_eq!(parsed, error);
    assert_eq!(parsed.trace_id(), Some("abc"));
}

#[tokio::test]
async fn constructors_capture_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::forbidden("nope").trace_id().is_none());
}
