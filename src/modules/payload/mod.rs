// Copyright © 2025 mailgate
// Licensed under the MIT License

//! Request-payload validation.
//!
//! Every action route receives a raw key-value payload (JSON or form body).
//! The parsers here coerce it into a typed request, collecting every field
//! error before reporting failure as a single combined message. Unknown
//! fields are ignored; the framework anti-forgery field is stripped before
//! validation and never reaches the backend.

use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

/// Anti-forgery token field injected by browser form frameworks. Stripped
/// from the payload before validation.
pub const CSRF_FIELD: &str = "_csrf";

static OBJECT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{24}$").unwrap());
static SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(,\d+)*$").unwrap());

const TRUTHY_TOKENS: [&str; 5] = ["Y", "true", "yes", "on", "1"];
const FALSY_TOKENS: [&str; 6] = ["N", "false", "no", "off", "0", ""];

/// Removes framework fields that must never reach validation or the backend.
pub fn sanitize(payload: &mut Map<String, Value>) {
    payload.remove(CSRF_FIELD);
}

/// A 24-character lowercase hexadecimal identifier, the fixed-width id shape
/// used for users and mailboxes.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn parse(value: &str) -> Result<Self, String> {
        if OBJECT_ID_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err("must be a 24-character lowercase hex identifier".to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated comma-separated list of message ids, kept in its original
/// string form because the backend accepts it as an opaque selector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageSelector(String);

impl MessageSelector {
    pub fn parse(value: &str) -> Result<Self, String> {
        if SELECTOR_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err("must be a comma-separated list of message ids".to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The selector as individual ids, in input order. Zero and non-numeric
    /// tokens are silently dropped; duplicates are kept.
    pub fn ids(&self) -> Vec<u64> {
        parse_ids(&self.0)
    }
}

pub(crate) fn parse_ids(selector: &str) -> Vec<u64> {
    selector
        .split(',')
        .filter_map(|token| token.parse::<u64>().ok())
        .filter(|id| *id != 0)
        .collect()
}

/// Pagination cursor direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorDirection {
    Next,
    Previous,
}

impl CursorDirection {
    fn parse(value: &str) -> Result<Self, String> {
        match value {
            "next" => Ok(CursorDirection::Next),
            "previous" => Ok(CursorDirection::Previous),
            _ => Err("must be one of [next, previous]".to_string()),
        }
    }
}

/// Collects field errors so that a payload with several problems reports all
/// of them at once, joined into one human-readable message.
#[derive(Debug, Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn push(&mut self, field: &str, reason: &str) {
        self.0.push(format!("\"{}\" {}", field, reason));
    }

    fn finish(self) -> Result<(), String> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0.join(". "))
        }
    }
}

fn field_str<'a>(payload: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    payload.get(field)
}

fn require_object_id(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<ObjectId> {
    match field_str(payload, field) {
        None => {
            errors.push(field, "is required");
            None
        }
        Some(Value::String(value)) => match ObjectId::parse(value) {
            Ok(id) => Some(id),
            Err(reason) => {
                errors.push(field, &reason);
                None
            }
        },
        Some(_) => {
            errors.push(field, "must be a string");
            None
        }
    }
}

fn require_selector(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<MessageSelector> {
    match field_str(payload, field) {
        None => {
            errors.push(field, "is required");
            None
        }
        Some(Value::String(value)) => match MessageSelector::parse(value) {
            Ok(selector) => Some(selector),
            Err(reason) => {
                errors.push(field, &reason);
                None
            }
        },
        Some(_) => {
            errors.push(field, "must be a string");
            None
        }
    }
}

/// Coerces a boolean field from the enumerated truthy/falsy token sets.
/// JSON booleans and the numbers 1/0 coerce as well; anything else is a
/// field error. Absent fields stay absent.
fn optional_bool(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<bool> {
    match field_str(payload, field) {
        None => None,
        Some(Value::Bool(value)) => Some(*value),
        Some(Value::Number(value)) => match value.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => {
                errors.push(field, "must be a boolean");
                None
            }
        },
        Some(Value::String(value)) => {
            if TRUTHY_TOKENS.contains(&value.as_str()) {
                Some(true)
            } else if FALSY_TOKENS.contains(&value.as_str()) {
                Some(false)
            } else {
                errors.push(field, "must be a boolean");
                None
            }
        }
        Some(_) => {
            errors.push(field, "must be a boolean");
            None
        }
    }
}

/// `/toggle/flagged` and `/toggle/seen` payload: mailbox, message selector,
/// and an optional boolean value for the toggled flag.
#[derive(Clone, Debug)]
pub struct ToggleRequest {
    pub mailbox: ObjectId,
    pub message: MessageSelector,
    pub value: Option<bool>,
}

impl ToggleRequest {
    pub fn parse(payload: &Map<String, Value>, flag_field: &str) -> Result<Self, String> {
        let mut errors = FieldErrors::default();
        let mailbox = require_object_id(payload, "mailbox", &mut errors);
        let message = require_selector(payload, "message", &mut errors);
        let value = optional_bool(payload, flag_field, &mut errors);
        errors.finish()?;
        Ok(Self {
            mailbox: mailbox.ok_or_else(|| "\"mailbox\" is required".to_string())?,
            message: message.ok_or_else(|| "\"message\" is required".to_string())?,
            value,
        })
    }
}

/// `/move` payload: mailbox, message selector, and the target mailbox id.
#[derive(Clone, Debug)]
pub struct MoveRequest {
    pub mailbox: ObjectId,
    pub message: MessageSelector,
    pub target: ObjectId,
}

impl MoveRequest {
    pub fn parse(payload: &Map<String, Value>) -> Result<Self, String> {
        let mut errors = FieldErrors::default();
        let mailbox = require_object_id(payload, "mailbox", &mut errors);
        let message = require_selector(payload, "message", &mut errors);
        let target = require_object_id(payload, "target", &mut errors);
        errors.finish()?;
        Ok(Self {
            mailbox: mailbox.ok_or_else(|| "\"mailbox\" is required".to_string())?,
            message: message.ok_or_else(|| "\"message\" is required".to_string())?,
            target: target.ok_or_else(|| "\"target\" is required".to_string())?,
        })
    }
}

/// `/delete` payload: mailbox and message selector.
#[derive(Clone, Debug)]
pub struct DeleteRequest {
    pub mailbox: ObjectId,
    pub message: MessageSelector,
}

impl DeleteRequest {
    pub fn parse(payload: &Map<String, Value>) -> Result<Self, String> {
        let mut errors = FieldErrors::default();
        let mailbox = require_object_id(payload, "mailbox", &mut errors);
        let message = require_selector(payload, "message", &mut errors);
        errors.finish()?;
        Ok(Self {
            mailbox: mailbox.ok_or_else(|| "\"mailbox\" is required".to_string())?,
            message: message.ok_or_else(|| "\"message\" is required".to_string())?,
        })
    }
}

/// `/list` payload: mailbox plus an optional pagination cursor and page
/// number. Empty strings count as absent.
#[derive(Clone, Debug)]
pub struct ListRequest {
    pub mailbox: ObjectId,
    pub cursor_type: Option<CursorDirection>,
    pub cursor_value: Option<String>,
    pub page: u64,
}

impl ListRequest {
    pub fn parse(payload: &Map<String, Value>) -> Result<Self, String> {
        let mut errors = FieldErrors::default();
        let mailbox = require_object_id(payload, "mailbox", &mut errors);
        let cursor_type = optional_cursor_type(payload, &mut errors);
        let cursor_value = optional_cursor_value(payload, &mut errors);
        let page = optional_page(payload, &mut errors);
        errors.finish()?;
        Ok(Self {
            mailbox: mailbox.ok_or_else(|| "\"mailbox\" is required".to_string())?,
            cursor_type,
            cursor_value,
            page,
        })
    }

    /// The cursor to forward to the backend. A direction without a value (or
    /// the other way around) is not forwarded.
    pub fn cursor(&self) -> Option<(CursorDirection, &str)> {
        match (self.cursor_type, self.cursor_value.as_deref()) {
            (Some(direction), Some(value)) => Some((direction, value)),
            _ => None,
        }
    }
}

fn optional_cursor_type(
    payload: &Map<String, Value>,
    errors: &mut FieldErrors,
) -> Option<CursorDirection> {
    match field_str(payload, "cursorType") {
        None => None,
        Some(Value::String(value)) if value.is_empty() => None,
        Some(Value::String(value)) => match CursorDirection::parse(value) {
            Ok(direction) => Some(direction),
            Err(reason) => {
                errors.push("cursorType", &reason);
                None
            }
        },
        Some(_) => {
            errors.push("cursorType", "must be a string");
            None
        }
    }
}

fn optional_cursor_value(
    payload: &Map<String, Value>,
    errors: &mut FieldErrors,
) -> Option<String> {
    match field_str(payload, "cursorValue") {
        None => None,
        Some(Value::String(value)) if value.is_empty() => None,
        Some(Value::String(value)) => {
            if STANDARD.decode(value).is_ok() {
                Some(value.clone())
            } else {
                errors.push("cursorValue", "must be valid base64");
                None
            }
        }
        Some(_) => {
            errors.push("cursorValue", "must be a string");
            None
        }
    }
}

fn optional_page(payload: &Map<String, Value>, errors: &mut FieldErrors) -> u64 {
    match field_str(payload, "page") {
        None => 1,
        Some(Value::String(value)) if value.is_empty() => 1,
        Some(Value::String(value)) => match value.parse::<u64>() {
            Ok(page) => page,
            Err(_) => {
                errors.push("page", "must be a number");
                1
            }
        },
        Some(Value::Number(value)) => match value.as_u64() {
            Some(page) => page,
            None => {
                errors.push("page", "must be a number");
                1
            }
        },
        Some(_) => {
            errors.push("page", "must be a number");
            1
        }
    }
}
