// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::error::MailGateResult;
use crate::modules::mailbox::MailboxSummary;
use crate::modules::payload::ObjectId;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

pub mod client;

/// Query parameters for the backend message listing. At most one of
/// `next`/`previous` is ever set.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl ListParams {
    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.previous.is_none()
    }
}

/// The messaging backend this gateway delegates to. All persistence,
/// mailbox indexing and special-folder computation happen behind this
/// trait; the gateway only validates, routes, and shapes responses.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageBackend: Send + Sync {
    /// Applies `patch` (e.g. `{"flagged": true}` or `{"moveTo": id}`) to all
    /// messages matched by the comma-joined `selector` in `mailbox`.
    async fn update_messages(
        &self,
        user: &str,
        mailbox: &ObjectId,
        selector: &str,
        patch: &Value,
    ) -> MailGateResult<Value>;

    /// Deletes a single message by id.
    async fn delete_message(
        &self,
        user: &str,
        mailbox: &ObjectId,
        id: u64,
    ) -> MailGateResult<Value>;

    /// Lists messages in a mailbox, optionally continuing from a cursor.
    async fn list_messages(
        &self,
        user: &str,
        mailbox: &ObjectId,
        params: &ListParams,
    ) -> MailGateResult<Value>;

    /// Lists the caller's mailboxes, with special-use metadata when
    /// `special_use` is set.
    async fn list_mailboxes(
        &self,
        user: &str,
        special_use: bool,
    ) -> MailGateResult<Vec<MailboxSummary>>;
}
