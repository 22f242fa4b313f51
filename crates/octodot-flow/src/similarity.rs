#![forbid(unsafe_code)]

//! Similarity between cell sequences.
//!
//! Two independent measures:
//!
//! - **Pattern similarity** compares the dots themselves: one minus the
//!   fraction of differing dots after padding the shorter sequence with
//!   empty cells.
//! - **Flow similarity** compares how the dots move: LCS ratio of the flow
//!   symbols, LCS ratio of the rhythm symbols, correlation of the energy
//!   contours, and a bonus when the dominant flows agree.
//!
//! Both scores are in `[0, 1]` and symmetric.

use octodot_core::Cell;

use crate::signature::FlowSignature;

/// Longest contour compared by [`contour_similarity`].
pub const MAX_CONTOUR_POINTS: usize = 20;

/// Weights of the flow-similarity terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowWeights {
    /// Weight of the flow-sequence LCS ratio.
    pub sequence: f64,
    /// Weight of the rhythm-pattern LCS ratio.
    pub rhythm: f64,
    /// Weight of the energy-contour correlation.
    pub contour: f64,
    /// Added when the dominant flows match.
    pub dominant_bonus: f64,
}

impl Default for FlowWeights {
    fn default() -> Self {
        Self {
            sequence: 0.4,
            rhythm: 0.25,
            contour: 0.25,
            dominant_bonus: 0.1,
        }
    }
}

impl FlowWeights {
    /// Weighted flow similarity, capped at 1.0.
    ///
    /// Zero when either signature has no flow symbols.
    pub fn score(&self, a: &FlowSignature, b: &FlowSignature) -> f64 {
        if !a.has_flow() || !b.has_flow() {
            return 0.0;
        }
        let sequence = lcs_ratio(&a.flow_sequence, &b.flow_sequence);
        let rhythm = lcs_ratio(&a.rhythm_pattern, &b.rhythm_pattern);
        let contour = contour_similarity(&a.energy_contour, &b.energy_contour);
        let bonus = if a.dominant_flow == b.dominant_flow {
            self.dominant_bonus
        } else {
            0.0
        };
        let total =
            sequence * self.sequence + rhythm * self.rhythm + contour * self.contour + bonus;

        #[cfg(feature = "tracing")]
        tracing::trace!(sequence, rhythm, contour, bonus, total, "flow similarity");

        total.min(1.0)
    }
}

/// Flow similarity with the default weights.
pub fn flow_similarity(a: &FlowSignature, b: &FlowSignature) -> f64 {
    FlowWeights::default().score(a, b)
}

/// `2·LCS / (m + n)` over chars. Zero if either side is empty.
pub fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Single-row DP: prev[j] is LCS(a[..i-1], b[..j]).
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    let lcs = prev[b.len()];
    (2 * lcs) as f64 / (a.len() + b.len()) as f64
}

/// Nearest-index resample to `len` points.
fn resample(values: &[f64], len: usize) -> Vec<f64> {
    if values.len() == len {
        return values.to_vec();
    }
    (0..len)
        .map(|i| {
            let idx = (i as f64 / len as f64 * values.len() as f64) as usize;
            values[idx.min(values.len() - 1)]
        })
        .collect()
}

/// Pearson correlation of two contours rescaled to `[0, 1]`.
///
/// Both are first resampled to `min(len_a, len_b, 20)` points. Identical
/// resampled contours score 1.0. If either is flat the correlation is
/// undefined and the score is 0.0 unless both are the same.
pub fn contour_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let len = a.len().min(b.len()).min(MAX_CONTOUR_POINTS);
    let a = resample(a, len);
    let b = resample(b, len);
    if a == b {
        return 1.0;
    }

    let n = len as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(&b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    let r = (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0);
    (r + 1.0) / 2.0
}

/// One minus the fraction of differing dots, padding with empty cells.
///
/// Zero if either side is empty.
pub fn cell_similarity(a: &[Cell], b: &[Cell]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let len = a.len().max(b.len());
    let at = |cells: &[Cell], i: usize| cells.get(i).copied().unwrap_or(Cell::EMPTY);
    let distance: u32 = (0..len).map(|i| at(a, i).hamming(at(b, i))).sum();
    1.0 - f64::from(distance) / (len * 8) as f64
}

/// [`cell_similarity`] over glyph strings. Chars outside the cell block
/// count as empty cells.
pub fn pattern_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<Cell> = a.chars().map(Cell::from_glyph_lossy).collect();
    let b: Vec<Cell> = b.chars().map(Cell::from_glyph_lossy).collect();
    cell_similarity(&a, &b)
}
