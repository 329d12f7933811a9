//! Property-based tests for the title codec.
//!
//! Encoding then decoding must give back the trimmed title and the exact
//! visit metadata, and decoding must never panic on arbitrary input.

use eternal_history::services::title_codec::{decode, encode};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn codec_roundtrip_preserves_title_and_metadata(
        title in "\\PC{0,40}",
        last_visit_time in 1i64..=4_102_444_800_000,
        visit_count in 0u32..=100_000,
    ) {
        let decoded = decode(&encode(&title, last_visit_time, visit_count));
        let meta = decoded.metadata.expect("encoded titles always carry metadata");

        prop_assert_eq!(decoded.clean_title, title.trim());
        prop_assert_eq!(meta.v, 1);
        prop_assert_eq!(meta.t, last_visit_time);
        prop_assert_eq!(meta.vc, visit_count);
    }

    #[test]
    fn decode_without_sentinel_returns_input(raw in "[^\u{1F4BE}]{0,60}") {
        let decoded = decode(&raw);
        prop_assert_eq!(decoded.clean_title, raw);
        prop_assert!(decoded.metadata.is_none());
    }

    #[test]
    fn decode_never_panics(raw in "\\PC{0,80}") {
        let _ = decode(&raw);
    }
}
