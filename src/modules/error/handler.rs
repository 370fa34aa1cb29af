// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::error::code::ErrorCode;
use poem::{IntoResponse, Response};
use serde_json::json;

/// Renders transport-level failures (unknown routes, unreadable bodies,
/// wrong methods) as a JSON envelope. Logical failures never reach this
/// handler: the action routes always answer HTTP 200 with their own body.
pub async fn error_handler(error: poem::Error) -> impl IntoResponse {
    let error_mapping = [
        (
            error.is::<poem::error::NotFoundError>(),
            ErrorCode::ResourceNotFound,
        ),
        (
            error.is::<poem::error::ParsePathError>()
                || error.is::<poem::error::ParseTypedHeaderError>()
                || error.is::<poem::error::ParseQueryError>()
                || error.is::<poem::error::ParseJsonError>()
                || error.is::<poem::error::ReadBodyError>(),
            ErrorCode::InvalidParameter,
        ),
        (
            error.is::<poem::error::MethodNotAllowedError>(),
            ErrorCode::MethodNotAllowed,
        ),
    ];

    let code = error_mapping
        .iter()
        .find(|(condition, _)| *condition)
        .map(|(_, code)| *code)
        .unwrap_or(ErrorCode::UnhandledPoemError);

    let body = json!({
        "error": error.to_string(),
        "code": code as u32,
    });
    let mut response = Response::builder()
        .status(code.status())
        .content_type("application/json")
        .body(body.to_string());
    response.set_status(error.status());
    response
}
