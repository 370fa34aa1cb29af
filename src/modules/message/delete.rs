// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::backend::MessageBackend;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailGateError, MailGateResult};
use crate::modules::mailbox::{find_mailbox, find_trash};
use crate::modules::payload::DeleteRequest;
use crate::raise_error;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{json, Value};

/// Outcome of one permanent deletion. Serialized as `[id, success]`, with a
/// third detail element only when the deletion failed.
pub struct DeletionOutcome {
    id: u64,
    success: bool,
    failure: Option<FailureDetail>,
}

#[derive(Serialize)]
struct FailureDetail {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl DeletionOutcome {
    fn completed(id: u64, success: bool) -> Self {
        Self {
            id,
            success,
            failure: None,
        }
    }

    fn failed(id: u64, error: &MailGateError) -> Self {
        Self {
            id,
            success: false,
            failure: Some(FailureDetail {
                error: error.to_string(),
                code: error.backend_code(),
            }),
        }
    }
}

impl Serialize for DeletionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.failure.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.id)?;
        seq.serialize_element(&self.success)?;
        if let Some(failure) = &self.failure {
            seq.serialize_element(failure)?;
        }
        seq.end()
    }
}

/// Deletes messages, routing between two behaviors: messages in a regular
/// mailbox move to the trash mailbox when one exists; messages already in
/// trash (or on accounts with no trash mailbox) are deleted permanently,
/// one id at a time.
pub async fn delete_or_trash(
    backend: &dyn MessageBackend,
    user: &str,
    request: &DeleteRequest,
) -> MailGateResult<Value> {
    let mailboxes = backend.list_mailboxes(user, true).await?;
    let mailbox = find_mailbox(&mailboxes, &request.mailbox)
        .ok_or_else(|| raise_error!("Invalid mailbox".to_string(), ErrorCode::ResourceNotFound))?;

    match find_trash(&mailboxes) {
        Some(trash) if !mailbox.is_trash() => {
            let mut response = backend
                .update_messages(
                    user,
                    &request.mailbox,
                    request.message.as_str(),
                    &json!({ "moveTo": trash.id.as_str() }),
                )
                .await?;
            if let Value::Object(map) = &mut response {
                map.insert("action".to_string(), Value::String("move".to_string()));
            }
            Ok(response)
        }
        _ => {
            let mut deleted = Vec::new();
            for id in request.message.ids() {
                let outcome = match backend.delete_message(user, &request.mailbox, id).await {
                    Ok(body) => DeletionOutcome::completed(
                        id,
                        body.get("success").and_then(Value::as_bool).unwrap_or(false),
                    ),
                    Err(error) => DeletionOutcome::failed(id, &error),
                };
                deleted.push(outcome);
                // Deletions stay strictly sequential, with a scheduling point
                // between ids.
                tokio::task::yield_now().await;
            }
            Ok(json!({ "success": true, "action": "delete", "id": deleted }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::backend::MockMessageBackend;
    use crate::modules::mailbox::MailboxSummary;
    use serde_json::Map;
    use std::sync::{Arc, Mutex};

    const USER: &str = "5c1b1f8f2d6d6a2e3c8a9b00";
    const INBOX: &str = "5c1b1f8f2d6d6a2e3c8a9b01";
    const TRASH: &str = "5c1b1f8f2d6d6a2e3c8a9b03";

    fn request(mailbox: &str, selector: &str) -> DeleteRequest {
        let map: Map<String, Value> = match json!({"mailbox": mailbox, "message": selector}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        DeleteRequest::parse(&map).unwrap()
    }

    fn inbox_and_trash() -> Vec<MailboxSummary> {
        serde_json::from_value(json!([
            {"id": INBOX, "name": "INBOX", "path": "INBOX"},
            {"id": TRASH, "name": "Trash", "path": "Trash", "specialUse": "\\Trash"},
        ]))
        .unwrap()
    }

    fn inbox_only() -> Vec<MailboxSummary> {
        serde_json::from_value(json!([
            {"id": INBOX, "name": "INBOX", "path": "INBOX"},
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_regular_mailbox_moves_to_trash() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .withf(|user, special_use| user == USER && *special_use)
            .times(1)
            .returning(|_, _| Ok(inbox_and_trash()));
        backend
            .expect_update_messages()
            .withf(|_, mailbox, selector, patch| {
                mailbox.as_str() == INBOX
                    && selector == "1,2,3"
                    && patch == &json!({"moveTo": TRASH})
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!({"success": true, "id": [[1, 9]]})));
        backend.expect_delete_message().times(0);

        let response = delete_or_trash(&backend, USER, &request(INBOX, "1,2,3"))
            .await
            .unwrap();
        assert_eq!(response["action"], json!("move"));
        assert_eq!(response["success"], json!(true));
    }

    #[tokio::test]
    async fn test_trash_mailbox_deletes_permanently() {
        // Deleting from trash is permanent even though a trash mailbox exists.
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .returning(|_, _| Ok(inbox_and_trash()));
        backend.expect_update_messages().times(0);
        backend
            .expect_delete_message()
            .withf(|_, mailbox, _| mailbox.as_str() == TRASH)
            .times(2)
            .returning(|_, _, _| Ok(json!({"success": true})));

        let response = delete_or_trash(&backend, USER, &request(TRASH, "4,5"))
            .await
            .unwrap();
        assert_eq!(response["action"], json!("delete"));
        assert_eq!(response["id"], json!([[4, true], [5, true]]));
    }

    #[tokio::test]
    async fn test_no_trash_mailbox_deletes_permanently() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .returning(|_, _| Ok(inbox_only()));
        backend.expect_update_messages().times(0);
        backend
            .expect_delete_message()
            .times(1)
            .returning(|_, _, _| Ok(json!({"success": true})));

        let response = delete_or_trash(&backend, USER, &request(INBOX, "7"))
            .await
            .unwrap();
        assert_eq!(response["id"], json!([[7, true]]));
    }

    #[tokio::test]
    async fn test_deletions_run_in_selector_order_and_skip_zero() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .returning(|_, _| Ok(inbox_only()));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        backend
            .expect_delete_message()
            .times(3)
            .returning(move |_, _, id| {
                recorder.lock().unwrap().push(id);
                Ok(json!({"success": true}))
            });

        let response = delete_or_trash(&backend, USER, &request(INBOX, "5,0,7,9"))
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![5, 7, 9]);
        assert_eq!(response["id"], json!([[5, true], [7, true], [9, true]]));
    }

    #[tokio::test]
    async fn test_per_id_failures_are_captured_and_loop_continues() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .returning(|_, _| Ok(inbox_only()));
        backend
            .expect_delete_message()
            .times(3)
            .returning(|_, _, id| {
                if id == 7 {
                    Err(MailGateError::Backend {
                        message: "Message not found".to_string(),
                        code: Some("MessageNotFound".to_string()),
                        location: snafu::Location::default(),
                    })
                } else {
                    Ok(json!({"success": true}))
                }
            });

        let response = delete_or_trash(&backend, USER, &request(INBOX, "5,7,9"))
            .await
            .unwrap();
        assert_eq!(response["success"], json!(true));
        assert_eq!(
            response["id"],
            json!([
                [5, true],
                [7, false, {"error": "Message not found", "code": "MessageNotFound"}],
                [9, true],
            ])
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_body_is_reported_without_detail() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .returning(|_, _| Ok(inbox_only()));
        backend
            .expect_delete_message()
            .times(1)
            .returning(|_, _, _| Ok(json!({"success": false})));

        let response = delete_or_trash(&backend, USER, &request(INBOX, "5"))
            .await
            .unwrap();
        assert_eq!(response["id"], json!([[5, false]]));
    }

    #[tokio::test]
    async fn test_unknown_mailbox_is_rejected_before_any_deletion() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_mailboxes()
            .returning(|_, _| Ok(inbox_only()));
        backend.expect_update_messages().times(0);
        backend.expect_delete_message().times(0);

        let error = delete_or_trash(&backend, USER, &request(TRASH, "1"))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Invalid mailbox");
    }
}
