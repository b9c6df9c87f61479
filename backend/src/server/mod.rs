//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use safeplate::Trace;
#[cfg(debug_assertions)]
use safeplate::doc::ApiDoc;
use safeplate::inbound::http::cors::{AllowedOrigins, cors_policy};
use safeplate::inbound::http::error::not_found;
use safeplate::inbound::http::health::{HealthState, live, ready};
use safeplate::inbound::http::routes;
use safeplate::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors: AllowedOrigins,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .wrap(cors_policy(&cors))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.configure(routes::configure)
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when building adapters, binding the socket,
/// or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let bind_addr = config.bind_addr();
    let cors = config.cors.clone();
    drop(config);

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone(), cors.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    };
    use actix_web::http::{Method, StatusCode};
    use actix_web::test as actix_test;
    use safeplate::test_support::TestHarness;

    const FRONT_END: &str = "https://app.safeplate.test";

    #[actix_web::test]
    async fn the_api_answers_browser_preflights() {
        let harness = TestHarness::new();
        let origins = AllowedOrigins::List(vec![FRONT_END.to_owned()]);
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            harness.data(),
            origins,
        ))
        .await;

        let request = actix_test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/upload/image")
            .insert_header((ORIGIN, FRONT_END))
            .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
            Some(FRONT_END.as_bytes())
        );
        assert_eq!(
            headers
                .get(ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .map(|v| v.as_bytes()),
            Some(b"true".as_slice())
        );
    }
}
