//! Splits display text into matched and unmatched runs for a parsed query.

use serde::{Deserialize, Serialize};

use crate::types::query::ParsedQuery;

/// One run of display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Byte length of `term` matched case-insensitively at the start of `text`.
///
/// `term` must already be lower-cased. Matching is per char, so a char whose
/// lowercase form spans several chars only matches as a whole.
fn match_len(text: &str, term: &str) -> Option<usize> {
    let mut wanted = term.chars().peekable();
    for (offset, ch) in text.char_indices() {
        if wanted.peek().is_none() {
            return Some(offset);
        }
        for lower in ch.to_lowercase() {
            if wanted.next() != Some(lower) {
                return None;
            }
        }
    }
    match wanted.peek() {
        None => Some(text.len()),
        Some(_) => None,
    }
}

/// Marks every non-overlapping occurrence of the query's text terms in `text`.
///
/// Terms are tried longest first at each position (the order of
/// `ParsedQuery::text_terms`). Site terms are not highlighted.
pub fn highlight(text: &str, parsed: &ParsedQuery) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut push = |piece: &str, matched: bool| {
        if piece.is_empty() {
            return;
        }
        match segments.last_mut() {
            Some(last) if last.matched == matched => last.text.push_str(piece),
            _ => segments.push(Segment {
                text: piece.to_string(),
                matched,
            }),
        }
    };

    let mut plain_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let hit = parsed
            .text_terms
            .iter()
            .filter(|t| !t.is_empty())
            .find_map(|t| match_len(rest, t));

        match hit {
            Some(len) if len > 0 => {
                push(&text[plain_start..pos], false);
                push(&rest[..len], true);
                pos += len;
                plain_start = pos;
            }
            _ => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    push(&text[plain_start..], false);
    segments
}
