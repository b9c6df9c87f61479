//! Cross-origin policy for the browser front end.
//!
//! Credentials are allowed, so a browser may send the bearer token from any
//! permitted origin. Preflight answers are cached for an hour.

use actix_cors::Cors;
use actix_web::http::{Method, header};

use crate::domain::TRACE_ID_HEADER;

const PREFLIGHT_MAX_AGE_SECS: usize = 60 * 60;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Echo back whichever origin asks.
    #[default]
    Any,
    /// Only these serialised origins, such as `https://app.example.com`.
    List(Vec<String>),
}

/// Build the CORS middleware for `origins`.
pub fn cors_policy(origins: &AllowedOrigins) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([TRACE_ID_HEADER])
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE_SECS);
    match origins {
        AllowedOrigins::Any => cors.allow_any_origin(),
        AllowedOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    };
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;

    const FRONT_END: &str = "https://app.safeplate.test";

    fn preflight(origin: &str) -> actix_http::Request {
        actix_test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/dishes")
            .insert_header((ORIGIN, origin))
            .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((ACCESS_CONTROL_REQUEST_HEADERS, "authorization, content-type"))
            .to_request()
    }

    fn header_value<B>(
        response: &actix_web::dev::ServiceResponse<B>,
        name: header::HeaderName,
    ) -> Option<&str> {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[case::listed(AllowedOrigins::List(vec![FRONT_END.to_owned()]))]
    #[case::any(AllowedOrigins::Any)]
    #[actix_web::test]
    async fn preflights_from_permitted_origins_allow_credentials(
        #[case] origins: AllowedOrigins,
    ) {
        let app = actix_test::init_service(
            App::new()
                .wrap(cors_policy(&origins))
                .route("/dishes", web::post().to(HttpResponse::Created)),
        )
        .await;

        let response = actix_test::call_service(&app, preflight(FRONT_END)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_value(&response, ACCESS_CONTROL_ALLOW_ORIGIN), Some(FRONT_END));
        assert_eq!(header_value(&response, ACCESS_CONTROL_ALLOW_CREDENTIALS), Some("true"));
    }

    #[actix_web::test]
    async fn preflights_from_other_origins_are_refused() {
        let origins = AllowedOrigins::List(vec![FRONT_END.to_owned()]);
        let app = actix_test::init_service(
            App::new()
                .wrap(cors_policy(&origins))
                .route("/dishes", web::post().to(HttpResponse::Created)),
        )
        .await;

        let response = actix_test::call_service(&app, preflight("https://evil.test")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(header_value(&response, ACCESS_CONTROL_ALLOW_ORIGIN), None);
    }
}
