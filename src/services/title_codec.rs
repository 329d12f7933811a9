//! Title codec: packs visit metadata into a leaf title and reads it back.
//!
//! Stored form: `"{title} 💾{json}"` where the JSON block is
//! `{"v":1,"t":<last visit ms>,"vc":<visit count>}`. Titles without the
//! sentinel, or with a block that does not parse and validate, decode to the
//! whole raw string with no metadata.

use serde_json::Value;

use crate::types::history::{domain_of, DecodedTitle, HistoryRecord, VisitMetadata};
use crate::types::node::TreeNode;

/// Marks the start of the metadata block.
pub const METADATA_SENTINEL: char = '\u{1F4BE}';

/// Metadata schema version written by [`encode`].
pub const METADATA_VERSION: u32 = 1;

/// Encodes a display title with its visit metadata.
pub fn encode(title: &str, last_visit_time: i64, visit_count: u32) -> String {
    let meta = VisitMetadata {
        v: METADATA_VERSION,
        t: last_visit_time,
        vc: visit_count,
    };
    // Three scalar fields; serialization cannot fail.
    let json = serde_json::to_string(&meta).unwrap_or_default();
    format!("{} {}{}", title, METADATA_SENTINEL, json)
}

/// Decodes a stored title. Never fails; malformed input degrades to a legacy title.
pub fn decode(raw: &str) -> DecodedTitle {
    let legacy = || DecodedTitle {
        clean_title: raw.to_string(),
        metadata: None,
    };

    let Some(idx) = raw.rfind(METADATA_SENTINEL) else {
        return legacy();
    };
    let block = &raw[idx + METADATA_SENTINEL.len_utf8()..];

    match serde_json::from_str::<Value>(block).ok().and_then(|v| validate(&v)) {
        Some(metadata) => DecodedTitle {
            clean_title: raw[..idx].trim().to_string(),
            metadata: Some(metadata),
        },
        None => legacy(),
    }
}

/// Checks the parsed block: `v` must be a number, `t` (if present) a positive
/// number, `vc` (if present) a non-negative number.
fn validate(value: &Value) -> Option<VisitMetadata> {
    let v = value.get("v")?.as_f64()?;

    let t = match value.get("t") {
        None => 0,
        Some(t) => {
            let raw = t.as_f64().filter(|n| *n > 0.0)?;
            t.as_i64().unwrap_or(raw as i64)
        }
    };

    let vc = match value.get("vc") {
        None => 1,
        Some(vc) => {
            let raw = vc.as_f64().filter(|n| *n >= 0.0)?;
            vc.as_u64()
                .map(|n| n.min(u32::MAX as u64) as u32)
                .unwrap_or(raw as u32)
        }
    };

    Some(VisitMetadata { v: v as u32, t, vc })
}

/// Rebuilds a [`HistoryRecord`] from a stored leaf.
pub fn record_from_node(node: &TreeNode) -> HistoryRecord {
    let decoded = decode(&node.title);
    let url = node.url.clone().unwrap_or_default();
    let (last_visit_time, visit_count) = decoded
        .metadata
        .map(|m| (m.t, m.vc))
        .unwrap_or((0, 1));

    HistoryRecord {
        id: node.id.clone(),
        domain: domain_of(&url),
        url,
        title: decoded.clean_title,
        visit_count,
        last_visit_time,
    }
}
