//! Atlassian Document Format (ADF) flattening.
//!
//! API v3 returns descriptions and comment bodies as a JSON tree of block
//! and inline nodes instead of a string. [`flatten`] walks that tree in
//! document order and produces plain text suitable for indexing.
//!
//! | Node | Output |
//! |------|--------|
//! | `text` | its `text` |
//! | `hardBreak` | `\n` |
//! | `mention`, `emoji`, `date`, `status`, `inlineCard` | the attribute that carries display text |
//! | block nodes (`paragraph`, `heading`, `listItem`, `codeBlock`, ...) | children, then a line break |
//! | anything else | its children, inline |

use serde_json::Value;

/// Block-level node types that end with a line break.
const BLOCK_NODES: &[&str] = &[
    "paragraph",
    "heading",
    "codeBlock",
    "blockquote",
    "bulletList",
    "orderedList",
    "listItem",
    "taskList",
    "taskItem",
    "decisionList",
    "decisionItem",
    "panel",
    "rule",
    "table",
    "tableRow",
    "tableHeader",
    "tableCell",
    "mediaSingle",
    "mediaGroup",
    "expand",
    "nestedExpand",
    "blockCard",
];

/// Flatten an ADF tree into plain text.
///
/// Returns an empty string for `null` or a tree with no text.
pub fn flatten(doc: &Value) -> String {
    let mut out = String::new();
    walk(doc, &mut out);
    out.trim_end_matches('\n').to_string()
}

fn walk(node: &Value, out: &mut String) {
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or("");

    match node_type {
        "text" => {
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
            return;
        }
        "hardBreak" => {
            out.push('\n');
            return;
        }
        "mention" | "emoji" | "date" | "status" | "inlineCard" => {
            if let Some(text) = inline_attr_text(node) {
                out.push_str(&text);
            }
            return;
        }
        _ => {}
    }

    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            walk(child, out);
        }
    }

    if BLOCK_NODES.contains(&node_type) && !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn inline_attr_text(node: &Value) -> Option<String> {
    let attrs = node.get("attrs")?;
    for key in ["text", "shortName", "url"] {
        if let Some(s) = attrs.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    // `date` carries a millisecond epoch string
    attrs
        .get("timestamp")
        .and_then(|v| match v {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        })
        .and_then(|ms| chrono::DateTime::from_timestamp_millis(ms))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}
