// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::backend::MessageBackend;
use crate::modules::error::MailGateResult;
use crate::modules::payload::ToggleRequest;
use serde_json::{Map, Value};

/// The message flag a toggle route operates on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToggleFlag {
    Flagged,
    Seen,
}

impl ToggleFlag {
    pub fn field(&self) -> &'static str {
        match self {
            ToggleFlag::Flagged => "flagged",
            ToggleFlag::Seen => "seen",
        }
    }
}

/// Applies a single-flag patch to every message in the selector. The patch
/// carries exactly one field; when the request omitted the flag value the
/// patch is empty and the backend decides what a bare update means.
pub async fn toggle_flag(
    backend: &dyn MessageBackend,
    user: &str,
    request: &ToggleRequest,
    flag: ToggleFlag,
) -> MailGateResult<Value> {
    let mut patch = Map::new();
    if let Some(value) = request.value {
        patch.insert(flag.field().to_string(), Value::Bool(value));
    }

    backend
        .update_messages(
            user,
            &request.mailbox,
            request.message.as_str(),
            &Value::Object(patch),
        )
        .await
}
