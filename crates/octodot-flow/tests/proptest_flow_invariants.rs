//! Property-based invariant tests for flow signatures and similarity.
//!
//! 1. Signature lengths follow the source length.
//! 2. Flow similarity is reflexive for sequences of two or more cells.
//! 3. Flow and pattern similarity are symmetric.
//! 4. Both scores stay within `[0, 1]`.
//! 5. Empty inputs score zero.
//! 6. Stored records compare like the signatures they came from.

use octodot_core::Cell;
use octodot_flow::{
    FlowRecord, FlowSignature, cell_similarity, encode_flow, flow_similarity, pattern_similarity,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn cells(min: usize, max: usize) -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(any::<u8>().prop_map(Cell::from_bits), min..max)
}

fn glyphs(cells: &[Cell]) -> String {
    cells.iter().map(|c| c.glyph()).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Lengths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn signature_lengths(seq in cells(0, 60)) {
        let sig = FlowSignature::from_cells(&seq);
        let transitions = seq.len().saturating_sub(1);
        prop_assert_eq!(sig.transitions.len(), transitions);
        prop_assert_eq!(sig.flow_sequence.chars().count(), transitions);
        prop_assert_eq!(sig.rhythm_pattern.chars().count(), transitions);
        let contour = if seq.len() < 2 { 0 } else { seq.len() };
        prop_assert_eq!(sig.energy_contour.len(), contour);
        prop_assert!(sig.energy_contour.iter().all(|e| (0.0..=1.0).contains(e)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Reflexivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flow_similarity_reflexive(seq in cells(2, 60)) {
        let sig = FlowSignature::from_cells(&seq);
        let score = flow_similarity(&sig, &sig);
        prop_assert!((score - 1.0).abs() < 1e-9, "self score {}", score);
    }

    #[test]
    fn pattern_similarity_reflexive(seq in cells(1, 60)) {
        prop_assert_eq!(cell_similarity(&seq, &seq), 1.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flow_similarity_symmetric(a in cells(0, 40), b in cells(0, 40)) {
        let (sa, sb) = (FlowSignature::from_cells(&a), FlowSignature::from_cells(&b));
        prop_assert_eq!(flow_similarity(&sa, &sb), flow_similarity(&sb, &sa));
    }

    #[test]
    fn pattern_similarity_symmetric(a in cells(0, 40), b in cells(0, 40)) {
        let (ga, gb) = (glyphs(&a), glyphs(&b));
        prop_assert_eq!(pattern_similarity(&ga, &gb), pattern_similarity(&gb, &ga));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scores_are_bounded(a in cells(1, 40), b in cells(1, 40)) {
        let flow = flow_similarity(&FlowSignature::from_cells(&a), &FlowSignature::from_cells(&b));
        prop_assert!((0.0..=1.0).contains(&flow), "flow {}", flow);
        let pattern = cell_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&pattern), "pattern {}", pattern);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Empty inputs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn empty_inputs_score_zero(seq in cells(0, 40)) {
        let g = glyphs(&seq);
        prop_assert_eq!(pattern_similarity("", &g), 0.0);
        prop_assert_eq!(flow_similarity(&encode_flow(""), &encode_flow(&g)), 0.0);
        let single = FlowSignature::from_cells(&seq[..seq.len().min(1)]);
        prop_assert_eq!(flow_similarity(&single, &encode_flow(&g)), 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Stored records
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn record_roundtrip_scores_like_source(a in cells(2, 20), b in cells(2, 20)) {
        // Up to 20 cells the stored contour loses only {:.3} precision, which
        // is exact for multiples of 1/8.
        let (sa, sb) = (FlowSignature::from_cells(&a), FlowSignature::from_cells(&b));
        let restored = FlowRecord::from_signature(&sb).to_signature().unwrap();
        let direct = flow_similarity(&sa, &sb);
        let stored = flow_similarity(&sa, &restored);
        prop_assert!((direct - stored).abs() < 1e-12, "{} vs {}", direct, stored);
    }
}
