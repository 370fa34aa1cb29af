// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::backend::MessageBackend;
use crate::modules::error::MailGateError;
use crate::modules::message::delete::delete_or_trash;
use crate::modules::message::flag::{toggle_flag, ToggleFlag};
use crate::modules::message::list::list_messages;
use crate::modules::message::mv::move_messages;
use crate::modules::payload::{
    sanitize, DeleteRequest, ListRequest, MoveRequest, ObjectId, ToggleRequest,
};
use http::StatusCode;
use poem::web::{Data, Json};
use poem::{handler, Body, Request};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;
use url::form_urlencoded;

/// Carries the already-authenticated caller's user id. Authentication itself
/// happens upstream of this gateway.
pub const USER_HEADER: &str = "X-User-Id";

fn caller_id(req: &Request) -> poem::Result<String> {
    let value = req.header(USER_HEADER).ok_or_else(|| {
        poem::Error::from_string(
            format!("missing {} header", USER_HEADER),
            StatusCode::UNAUTHORIZED,
        )
    })?;
    ObjectId::parse(value)
        .map(|id| id.as_str().to_string())
        .map_err(|reason| {
            poem::Error::from_string(
                format!("{} {}", USER_HEADER, reason),
                StatusCode::UNAUTHORIZED,
            )
        })
}

/// Reads the request body as a key-value payload. JSON bodies must be
/// objects; anything else is treated as a urlencoded form. Framework fields
/// are stripped before the payload reaches validation.
async fn read_payload(req: &Request, body: Body) -> poem::Result<Map<String, Value>> {
    let bytes = body.into_bytes().await?;
    let content_type = req.content_type().unwrap_or_default();

    let mut payload = if content_type.starts_with("application/json") {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(poem::Error::from_string(
                    "request body must be a JSON object",
                    StatusCode::BAD_REQUEST,
                ))
            }
            Err(e) => {
                return Err(poem::Error::from_string(
                    format!("invalid JSON body: {}", e),
                    StatusCode::BAD_REQUEST,
                ))
            }
        }
    } else {
        let mut map = Map::new();
        for (key, value) in form_urlencoded::parse(&bytes) {
            map.insert(key.into_owned(), Value::String(value.into_owned()));
        }
        map
    };

    sanitize(&mut payload);
    Ok(payload)
}

/// Logical failures never escalate the HTTP status; they render as an error
/// envelope in a 200 body. Backend failures keep the backend's error code
/// when it sent one.
fn failure(error: &MailGateError) -> Value {
    warn!("message action failed: {}", error);
    match error.backend_code() {
        Some(code) => json!({ "error": error.to_string(), "code": code }),
        None => json!({ "error": error.to_string() }),
    }
}

pub(crate) async fn toggle_action(
    backend: &dyn MessageBackend,
    user: &str,
    payload: &Map<String, Value>,
    flag: ToggleFlag,
) -> Value {
    let request = match ToggleRequest::parse(payload, flag.field()) {
        Ok(request) => request,
        Err(message) => return json!({ "error": message }),
    };
    match toggle_flag(backend, user, &request, flag).await {
        Ok(response) => response,
        Err(error) => failure(&error),
    }
}

pub(crate) async fn move_action(
    backend: &dyn MessageBackend,
    user: &str,
    payload: &Map<String, Value>,
) -> Value {
    let request = match MoveRequest::parse(payload) {
        Ok(request) => request,
        Err(message) => return json!({ "error": message }),
    };
    match move_messages(backend, user, &request).await {
        Ok(response) => response,
        Err(error) => failure(&error),
    }
}

pub(crate) async fn delete_action(
    backend: &dyn MessageBackend,
    user: &str,
    payload: &Map<String, Value>,
) -> Value {
    let request = match DeleteRequest::parse(payload) {
        Ok(request) => request,
        Err(message) => return json!({ "error": message }),
    };
    match delete_or_trash(backend, user, &request).await {
        Ok(response) => response,
        Err(error) => failure(&error),
    }
}

pub(crate) async fn list_action(
    backend: &dyn MessageBackend,
    user: &str,
    payload: &Map<String, Value>,
) -> Value {
    let request = match ListRequest::parse(payload) {
        Ok(request) => request,
        Err(message) => return json!({ "error": message }),
    };
    match list_messages(backend, user, &request).await {
        Ok(response) => response,
        Err(error) => failure(&error),
    }
}

#[handler]
pub async fn toggle_flagged(
    req: &Request,
    body: Body,
    Data(backend): Data<&Arc<dyn MessageBackend>>,
) -> poem::Result<Json<Value>> {
    let user = caller_id(req)?;
    let payload = read_payload(req, body).await?;
    Ok(Json(
        toggle_action(backend.as_ref(), &user, &payload, ToggleFlag::Flagged).await,
    ))
}

#[handler]
pub async fn toggle_seen(
    req: &Request,
    body: Body,
    Data(backend): Data<&Arc<dyn MessageBackend>>,
) -> poem::Result<Json<Value>> {
    let user = caller_id(req)?;
    let payload = read_payload(req, body).await?;
    Ok(Json(
        toggle_action(backend.as_ref(), &user, &payload, ToggleFlag::Seen).await,
    ))
}

#[handler]
pub async fn move_route(
    req: &Request,
    body: Body,
    Data(backend): Data<&Arc<dyn MessageBackend>>,
) -> poem::Result<Json<Value>> {
    let user = caller_id(req)?;
    let payload = read_payload(req, body).await?;
    Ok(Json(move_action(backend.as_ref(), &user, &payload).await))
}

#[handler]
pub async fn delete_route(
    req: &Request,
    body: Body,
    Data(backend): Data<&Arc<dyn MessageBackend>>,
) -> poem::Result<Json<Value>> {
    let user = caller_id(req)?;
    let payload = read_payload(req, body).await?;
    Ok(Json(delete_action(backend.as_ref(), &user, &payload).await))
}

#[handler]
pub async fn list_route(
    req: &Request,
    body: Body,
    Data(backend): Data<&Arc<dyn MessageBackend>>,
) -> poem::Result<Json<Value>> {
    let user = caller_id(req)?;
    let payload = read_payload(req, body).await?;
    Ok(Json(list_action(backend.as_ref(), &user, &payload).await))
}
