//! Property-based invariant tests for the byte and text codecs.
//!
//! 1. Byte ↔ cell is a bijection.
//! 2. Table-only text (without the greedy-ambiguous characters) round-trips.
//! 3. Arbitrary text encodes and decodes without panicking, and the encoding
//!    is never shorter than the input.
//! 4. Encoded output is always detected as encoded.
//! 5. Every decoded cell pattern stays within dots 1–8.

use octodot_core::{
    Cell, decode, decode_cell, decode_text, encode, encode_byte, encode_text, is_encoded,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

// Table characters whose encodings never merge with a neighbour under
// greedy decoding. Excludes '`' (prefix of '@', '$', ...), space, newline
// and tab.
const UNAMBIGUOUS: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    ".,:;!?'\"-()[]{}<>+*/\\=%&|^~@#$_",
);

fn table_text() -> impl Strategy<Value = String> {
    let chars: Vec<char> = UNAMBIGUOUS.chars().collect();
    prop::collection::vec(prop::sample::select(chars), 0..64)
        .prop_map(|v| v.into_iter().collect())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Bijection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn byte_cell_bijection(b in any::<u8>()) {
        prop_assert_eq!(decode_cell(encode_byte(b)), b);
        let glyph = encode_byte(b).glyph();
        prop_assert_eq!(Cell::from_glyph(glyph).map(decode_cell), Some(b));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Table round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn table_text_roundtrips(text in table_text()) {
        prop_assert_eq!(decode(&encode(&text)), text.clone());
        prop_assert_eq!(decode_text(&encode_text(&text)), text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Lossy input never panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_text_is_total(text in any::<String>()) {
        let seq = encode(&text);
        prop_assert!(seq.len() >= text.chars().count());
        let decoded = decode(&seq);
        prop_assert!(decoded.chars().count() <= seq.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Encoded output is detected
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn encoded_output_is_encoded(text in any::<String>()) {
        let glyphs = encode_text(&text);
        prop_assert_eq!(is_encoded(&glyphs), !text.is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Dot patterns stay in range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dot_pattern_in_range(b in any::<u8>()) {
        let pattern = encode_byte(b).dot_pattern();
        prop_assert_eq!(pattern.len() as u32, b.count_ones());
        prop_assert!(pattern.iter().all(|d| (1..=8).contains(d)));
    }
}
