// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::backend::MessageBackend;
use crate::modules::error::MailGateResult;
use crate::modules::payload::MoveRequest;
use serde_json::{json, Value};

/// Moves every message in the selector to the target mailbox with a single
/// backend update.
pub async fn move_messages(
    backend: &dyn MessageBackend,
    user: &str,
    request: &MoveRequest,
) -> MailGateResult<Value> {
    backend
        .update_messages(
            user,
            &request.mailbox,
            request.message.as_str(),
            &json!({ "moveTo": request.target.as_str() }),
        )
        .await
}
