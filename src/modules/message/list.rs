// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::address::addresses_html;
use crate::modules::backend::{ListParams, MessageBackend};
use crate::modules::error::MailGateResult;
use crate::modules::payload::{CursorDirection, ListRequest};
use serde_json::Value;

/// Lists a mailbox's messages and decorates each result with `fromHtml`, a
/// display-safe rendering of its `from` header.
pub async fn list_messages(
    backend: &dyn MessageBackend,
    user: &str,
    request: &ListRequest,
) -> MailGateResult<Value> {
    let mut params = ListParams::default();
    if let Some((direction, value)) = request.cursor() {
        match direction {
            CursorDirection::Next => params.next = Some(value.to_string()),
            CursorDirection::Previous => params.previous = Some(value.to_string()),
        }
    }

    let mut response = backend
        .list_messages(user, &request.mailbox, &params)
        .await?;

    if let Some(results) = response.get_mut("results").and_then(Value::as_array_mut) {
        for message in results {
            let html = message
                .get("from")
                .map(|from| addresses_html(from, true))
                .unwrap_or_default();
            if let Value::Object(map) = message {
                map.insert("fromHtml".to_string(), Value::String(html));
            }
        }
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::backend::MockMessageBackend;
    use serde_json::{json, Map};

    const USER: &str = "5c1b1f8f2d6d6a2e3c8a9b00";
    const MAILBOX: &str = "5c1b1f8f2d6d6a2e3c8a9b01";

    fn request(extra: Value) -> ListRequest {
        let mut map: Map<String, Value> = match json!({"mailbox": MAILBOX}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        if let Value::Object(extra) = extra {
            map.extend(extra);
        }
        ListRequest::parse(&map).unwrap()
    }

    #[tokio::test]
    async fn test_cursor_is_forwarded() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_messages()
            .withf(|user, mailbox, params| {
                user == USER
                    && mailbox.as_str() == MAILBOX
                    && params.next.as_deref() == Some("aGVsbG8=")
                    && params.previous.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(json!({"success": true, "results": []})));

        list_messages(
            &backend,
            USER,
            &request(json!({"cursorType": "next", "cursorValue": "aGVsbG8="})),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_direction_without_value_sends_no_cursor() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_messages()
            .withf(|_, _, params| params.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(json!({"success": true, "results": []})));

        list_messages(&backend, USER, &request(json!({"cursorType": "previous"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_from_html_is_injected_and_escaped() {
        let mut backend = MockMessageBackend::new();
        backend.expect_list_messages().returning(|_, _, _| {
            Ok(json!({
                "success": true,
                "total": 2,
                "results": [
                    {
                        "id": 12,
                        "subject": "Hello",
                        "from": {"name": "<b>Eve</b>", "address": "eve@example.com"},
                    },
                    {"id": 13, "subject": "No sender"},
                ],
            }))
        });

        let response = list_messages(&backend, USER, &request(json!({})))
            .await
            .unwrap();

        let first = &response["results"][0];
        let html = first["fromHtml"].as_str().unwrap();
        assert!(!html.contains("<b>"), "{}", html);
        assert!(html.contains("eve@example.com"), "{}", html);
        // Untouched fields pass through.
        assert_eq!(first["subject"], json!("Hello"));
        assert_eq!(response["total"], json!(2));

        assert_eq!(response["results"][1]["fromHtml"], json!(""));
    }

    #[tokio::test]
    async fn test_response_without_results_passes_through() {
        let mut backend = MockMessageBackend::new();
        backend
            .expect_list_messages()
            .returning(|_, _, _| Ok(json!({"success": false})));

        let response = list_messages(&backend, USER, &request(json!({})))
            .await
            .unwrap();
        assert_eq!(response, json!({"success": false}));
    }
}
