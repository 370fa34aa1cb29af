// Copyright © 2025 mailgate
// Licensed under the MIT License

//! Pure formatting of backend address headers into safe display HTML.

use html_escape::encode_text;
use serde_json::Value;

/// Renders an address header value (a single address object, an address
/// group, or an array of either) into an HTML-escaped display string.
///
/// Address objects are `{"name": ..., "address": ...}`; groups are
/// `{"name": ..., "group": [...]}`. Anything unrecognized renders empty.
pub fn addresses_html(value: &Value, include_names: bool) -> String {
    match value {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| addresses_html(entry, include_names))
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => single_address_html(value, include_names),
        _ => String::new(),
    }
}

fn single_address_html(value: &Value, include_names: bool) -> String {
    if let Some(group) = value.get("group").and_then(Value::as_array) {
        let name = value.get("name").and_then(Value::as_str).unwrap_or("");
        let members = addresses_html(&Value::Array(group.clone()), include_names);
        return format!("{}: {}", encode_text(name), members);
    }

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let address = value
        .get("address")
        .and_then(Value::as_str)
        .filter(|address| !address.is_empty());

    match (name, address) {
        (Some(name), Some(address)) if include_names => format!(
            "<span class=\"address\">{} &lt;{}&gt;</span>",
            encode_text(name),
            encode_text(address)
        ),
        (_, Some(address)) => format!(
            "<span class=\"address\">{}</span>",
            encode_text(address)
        ),
        (Some(name), None) => format!("<span class=\"address\">{}</span>", encode_text(name)),
        (None, None) => String::new(),
    }
}
