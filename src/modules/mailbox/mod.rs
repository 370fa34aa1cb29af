// Copyright © 2025 mailgate
// Licensed under the MIT License

use crate::modules::payload::ObjectId;
use serde::{Deserialize, Serialize};

/// A mailbox as reported by the backend's mailbox listing. Only the fields
/// the gateway needs are modelled; anything else the backend sends is
/// ignored.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MailboxSummary {
    pub id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "specialUse", default)]
    pub special_use: Option<SpecialUse>,
}

/// IMAP special-use tag marking a mailbox's reserved role.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum SpecialUse {
    #[serde(rename = "\\Trash")]
    Trash,
    #[serde(rename = "\\Sent")]
    Sent,
    #[serde(rename = "\\Junk")]
    Junk,
    #[serde(rename = "\\Drafts")]
    Drafts,
    #[serde(rename = "\\Archive")]
    Archive,
    /// Any tag this gateway does not recognize.
    #[serde(other)]
    Other,
}

impl MailboxSummary {
    pub fn is_trash(&self) -> bool {
        matches!(self.special_use, Some(SpecialUse::Trash))
    }
}

pub fn find_mailbox<'a>(
    mailboxes: &'a [MailboxSummary],
    id: &ObjectId,
) -> Option<&'a MailboxSummary> {
    mailboxes.iter().find(|mailbox| &mailbox.id == id)
}

pub fn find_trash(mailboxes: &[MailboxSummary]) -> Option<&MailboxSummary> {
    mailboxes.iter().find(|mailbox| mailbox.is_trash())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_special_use_wire_format() {
        let mailbox: MailboxSummary = serde_json::from_value(json!({
            "id": "5c1b1f8f2d6d6a2e3c8a9b01",
            "name": "Trash",
            "path": "Trash",
            "specialUse": "\\Trash",
            "subscribed": true,
        }))
        .unwrap();
        assert!(mailbox.is_trash());

        let mailbox: MailboxSummary = serde_json::from_value(json!({
            "id": "5c1b1f8f2d6d6a2e3c8a9b02",
            "name": "INBOX",
            "specialUse": null,
        }))
        .unwrap();
        assert!(!mailbox.is_trash());

        // Tags the gateway does not model still deserialize.
        let mailbox: MailboxSummary = serde_json::from_value(json!({
            "id": "5c1b1f8f2d6d6a2e3c8a9b03",
            "specialUse": "\\All",
        }))
        .unwrap();
        assert_eq!(mailbox.special_use, Some(SpecialUse::Other));
    }
}
