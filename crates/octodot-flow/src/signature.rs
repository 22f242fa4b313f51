#![forbid(unsafe_code)]

//! Flow signatures: a cell sequence described by how it changes.

use octodot_core::{Cell, EncodedSeq};

use crate::transition::{DotTransition, FlowDirection};

/// Transitions of a cell sequence and the symbols derived from them.
///
/// For a sequence of `n >= 2` cells there are `n - 1` transitions, one flow
/// and one rhythm symbol per transition, and `n` contour entries. Shorter
/// sequences give an empty signature with a `Stable` dominant flow.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSignature {
    /// The encoded cells.
    pub source: EncodedSeq,
    /// One transition per adjacent pair. Empty for signatures restored from
    /// a record.
    pub transitions: Vec<DotTransition>,
    /// One [`FlowDirection::symbol`] per transition.
    pub flow_sequence: String,
    /// One [`RhythmMark`](crate::transition::RhythmMark) symbol per transition.
    pub rhythm_pattern: String,
    /// Raised dots per cell over 8.
    pub energy_contour: Vec<f64>,
    /// Most frequent flow direction, ties to the first encountered.
    pub dominant_flow: FlowDirection,
}

impl FlowSignature {
    /// Signature with no transitions.
    pub fn empty(source: EncodedSeq) -> Self {
        Self {
            source,
            transitions: Vec::new(),
            flow_sequence: String::new(),
            rhythm_pattern: String::new(),
            energy_contour: Vec::new(),
            dominant_flow: FlowDirection::Stable,
        }
    }

    /// Encode a cell sequence.
    pub fn from_cells(cells: &[Cell]) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("encode_flow", cells = cells.len()).entered();

        let source = EncodedSeq::from(cells.to_vec());
        if cells.len() < 2 {
            return Self::empty(source);
        }

        let transitions: Vec<DotTransition> = cells
            .windows(2)
            .map(|pair| DotTransition::between(pair[0], pair[1]))
            .collect();
        let flow_sequence = transitions.iter().map(|t| t.flow.symbol()).collect();
        let rhythm_pattern = transitions.iter().map(|t| t.rhythm().symbol()).collect();
        let energy_contour = cells
            .iter()
            .map(|c| f64::from(c.dot_count()) / 8.0)
            .collect();
        let dominant_flow = dominant(transitions.iter().map(|t| t.flow));

        #[cfg(feature = "tracing")]
        tracing::trace!(dominant = %dominant_flow, "flow signature");

        Self {
            source,
            transitions,
            flow_sequence,
            rhythm_pattern,
            energy_contour,
            dominant_flow,
        }
    }

    /// `true` when there is at least one flow symbol to compare.
    pub fn has_flow(&self) -> bool {
        !self.flow_sequence.is_empty()
    }

    /// Flow directions in order, read back from the flow symbols.
    pub fn directions(&self) -> impl Iterator<Item = FlowDirection> + '_ {
        self.flow_sequence.chars().filter_map(FlowDirection::from_symbol)
    }
}

/// Most frequent direction; ties go to the one seen first.
fn dominant(flows: impl Iterator<Item = FlowDirection>) -> FlowDirection {
    // (direction, count) in first-seen order.
    let mut counts: Vec<(FlowDirection, usize)> = Vec::with_capacity(FlowDirection::ALL.len());
    for flow in flows {
        match counts.iter_mut().find(|(d, _)| *d == flow) {
            Some((_, n)) => *n += 1,
            None => counts.push((flow, 1)),
        }
    }
    let mut best: Option<(FlowDirection, usize)> = None;
    for (dir, n) in counts {
        if best.is_none_or(|(_, m)| n > m) {
            best = Some((dir, n));
        }
    }
    best.map_or(FlowDirection::Stable, |(dir, _)| dir)
}

/// Encode a glyph string. Chars outside the cell block count as empty cells.
pub fn encode_flow(glyphs: &str) -> FlowSignature {
    FlowSignature::from_cells(EncodedSeq::from_glyphs(glyphs).cells())
}
