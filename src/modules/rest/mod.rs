// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::backend::MessageBackend;
use crate::modules::common::log::Tracing;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::MailGateResult;
use crate::modules::rest::routes::{
    delete_route, list_route, move_route, toggle_flagged, toggle_seen, USER_HEADER,
};
use crate::modules::settings::cli::SETTINGS;
use crate::modules::utils::shutdown::shutdown_signal;
use crate::raise_error;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{post, Endpoint, EndpointExt, Route, Server};
use std::sync::Arc;
use std::time::Duration;

pub mod routes;

pub(crate) fn api_route(backend: Arc<dyn MessageBackend>) -> impl Endpoint {
    Route::new()
        .at("/toggle/flagged", post(toggle_flagged))
        .at("/toggle/seen", post(toggle_seen))
        .at("/move", post(move_route))
        .at("/delete", post(delete_route))
        .at("/list", post(list_route))
        .data(backend)
}

pub async fn start_http_server(backend: Arc<dyn MessageBackend>) -> MailGateResult<()> {
    let listener = TcpListener::bind((
        SETTINGS
            .mailgate_bind_ip
            .clone()
            .unwrap_or("0.0.0.0".into()),
        SETTINGS.mailgate_http_port,
    ));

    let mut cors_origins = SETTINGS.mailgate_cors_origins.clone();
    if cors_origins.is_empty() {
        cors_origins = ["*".to_string()].into_iter().collect();
    }

    let cors = Cors::new()
        .allow_origins(cors_origins)
        .allow_credentials(true)
        .allow_methods(vec!["POST", "OPTIONS"])
        .allow_headers(vec!["Content-Type", USER_HEADER])
        .max_age(SETTINGS.mailgate_cors_max_age);

    let route = api_route(backend)
        .with(cors)
        .with_if(
            SETTINGS.mailgate_http_compression_enabled,
            Compression::new(),
        )
        .with(Tracing)
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("Mailgate API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    println!(
        "Mailgate API Service is now running on port {}.",
        SETTINGS.mailgate_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::backend::MockMessageBackend;
    use poem::http::{Method, StatusCode, Uri};
    use poem::{IntoResponse, Request};
    use serde_json::{json, Value};

    const USER: &str = "5c1b1f8f2d6d6a2e3c8a9b00";
    const MAILBOX: &str = "5c1b1f8f2d6d6a2e3c8a9b01";

    #[tokio::test]
    async fn test_toggle_route_accepts_form_bodies() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_update_messages()
            .withf(|user, mailbox, selector, patch| {
                user == USER
                    && mailbox.as_str() == MAILBOX
                    && selector == "1,2"
                    && patch == &json!({"flagged": true})
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!({"success": true})));

        let route = api_route(Arc::new(backend));
        let request = Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/toggle/flagged"))
            .header(USER_HEADER, USER)
            .content_type("application/x-www-form-urlencoded")
            .body(format!(
                "mailbox={}&message=1%2C2&flagged=Y&_csrf=token",
                MAILBOX
            ));

        let response = match route.call(request).await {
            Ok(response) => response.into_response(),
            Err(error) => panic!("request failed: {}", error),
        };
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&response.into_body().into_bytes().await.unwrap()).unwrap();
        assert_eq!(body, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_missing_user_header_is_unauthorized() {
        let backend = MockMessageBackend::new();
        let route = api_route(Arc::new(backend));
        let request = Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/delete"))
            .content_type("application/json")
            .body(json!({"mailbox": MAILBOX, "message": "1"}).to_string());

        let error = match route.call(request).await {
            Ok(_) => panic!("expected an unauthorized error"),
            Err(error) => error,
        };
        assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_route_answers_json() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_messages()
            .withf(|_, _, params| params.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(json!({"success": true, "results": []})));

        let route = api_route(Arc::new(backend));
        let request = Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/list"))
            .header(USER_HEADER, USER)
            .content_type("application/json")
            .body(json!({"mailbox": MAILBOX}).to_string());

        let response = match route.call(request).await {
            Ok(response) => response.into_response(),
            Err(error) => panic!("request failed: {}", error),
        };
        assert_eq!(response.status(), StatusCode::OK);
    }
}
