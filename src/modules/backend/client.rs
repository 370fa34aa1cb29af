// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::mailgate_version;
use crate::modules::backend::{ListParams, MessageBackend};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailGateError, MailGateResult};
use crate::modules::mailbox::MailboxSummary;
use crate::modules::payload::ObjectId;
use crate::modules::settings::cli::SETTINGS;
use crate::raise_error;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// A WildDuck-style REST client implementing the backend contract.
pub struct WildDuckClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl WildDuckClient {
    pub fn new() -> MailGateResult<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(format!("mailgate/{}", mailgate_version!()))
            .timeout(Duration::from_secs(SETTINGS.mailgate_backend_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;

        Ok(Self {
            client,
            base_url: SETTINGS.mailgate_backend_url.clone(),
            access_token: SETTINGS.mailgate_backend_access_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and interprets the backend's response conventions:
    /// a body carrying an `error` field is a logical failure whatever the
    /// HTTP status says.
    async fn execute(&self, mut request: reqwest::RequestBuilder) -> MailGateResult<Value> {
        if let Some(token) = &self.access_token {
            request = request.header(ACCESS_TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                raise_error!(
                    format!("Backend request timed out: {:#?}", e),
                    ErrorCode::ConnectionTimeout
                )
            } else {
                raise_error!(format!("{:#?}", e), ErrorCode::NetworkError)
            }
        })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            raise_error!(
                format!(
                    "Backend returned an unreadable response ({}): {:#?}",
                    status, e
                ),
                ErrorCode::HttpResponseError
            )
        })?;

        if let Some(message) = body.get("error").and_then(Value::as_str) {
            let code = body
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(MailGateError::Backend {
                message: message.to_string(),
                code,
                location: snafu::Location::default(),
            });
        }

        if !status.is_success() {
            return Err(raise_error!(
                format!("Backend request failed with status {}", status),
                ErrorCode::HttpResponseError
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl MessageBackend for WildDuckClient {
    async fn update_messages(
        &self,
        user: &str,
        mailbox: &ObjectId,
        selector: &str,
        patch: &Value,
    ) -> MailGateResult<Value> {
        let mut body = match patch {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        body.insert("message".to_string(), Value::String(selector.to_string()));

        let url = self.endpoint(&format!("/users/{}/mailboxes/{}/messages", user, mailbox));
        self.execute(self.client.put(url).json(&Value::Object(body)))
            .await
    }

    async fn delete_message(
        &self,
        user: &str,
        mailbox: &ObjectId,
        id: u64,
    ) -> MailGateResult<Value> {
        let url = self.endpoint(&format!(
            "/users/{}/mailboxes/{}/messages/{}",
            user, mailbox, id
        ));
        self.execute(self.client.delete(url)).await
    }

    async fn list_messages(
        &self,
        user: &str,
        mailbox: &ObjectId,
        params: &ListParams,
    ) -> MailGateResult<Value> {
        let url = self.endpoint(&format!("/users/{}/mailboxes/{}/messages", user, mailbox));
        self.execute(self.client.get(url).query(params)).await
    }

    async fn list_mailboxes(
        &self,
        user: &str,
        special_use: bool,
    ) -> MailGateResult<Vec<MailboxSummary>> {
        let url = self.endpoint(&format!("/users/{}/mailboxes", user));
        let body = self
            .execute(self.client.get(url).query(&[("specialUse", special_use)]))
            .await?;

        let results = body.get("results").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(results).map_err(|e| {
            raise_error!(
                format!("Backend mailbox listing had an unexpected shape: {:#?}", e),
                ErrorCode::HttpResponseError
            )
        })
    }
}
