#![forbid(unsafe_code)]

//! Octo-Bresenham: sub-cell line drawing on the 2×4 dot grid.
//!
//! Each output cell consumes two samples, one per column. Samples are row
//! positions in `[0, 3]` with row 0 at the top. A single dot is raised per
//! column, and when the two columns are far apart the rows between them are
//! filled so the line reads as connected. With `connect` set, a large jump
//! from the previous cell's right column also fills the new left column.
//!
//! ```text
//! samples: [0.0, 3.0]
//!
//!   ● ·      left column: rows 0..=2 (from 0.0 toward the midpoint 1.5)
//!   ● ·      right column: rows 2..=3 (from the midpoint to 3.0)
//!   ● ●
//!   · ●      => ⢧ (0xA7)
//! ```
//!
//! Rounding is half-to-even, so `0.5` lands on row 0 and `1.5` on row 2.

use octodot_core::{Cell, DotPosition};

/// Tuning for [`OctoBresenham`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BresenhamConfig {
    /// Bridge across cell boundaries.
    pub connect: bool,
    /// Column gap above which both columns fill to the shared midpoint.
    pub large_gap: f64,
    /// Column gap above which each column extends partway toward the other.
    pub moderate_gap: f64,
    /// Fraction of the gap covered by a partial extension.
    pub extension: f64,
}

impl Default for BresenhamConfig {
    fn default() -> Self {
        Self {
            connect: true,
            large_gap: 1.0,
            moderate_gap: 0.5,
            extension: 0.3,
        }
    }
}

impl BresenhamConfig {
    /// Enable or disable inter-cell bridging.
    #[must_use]
    pub fn connect(mut self, connect: bool) -> Self {
        self.connect = connect;
        self
    }

    /// Set the full-bridge threshold.
    #[must_use]
    pub fn large_gap(mut self, gap: f64) -> Self {
        self.large_gap = gap;
        self
    }

    /// Set the partial-extension threshold.
    #[must_use]
    pub fn moderate_gap(mut self, gap: f64) -> Self {
        self.moderate_gap = gap;
        self
    }

    /// Set the partial-extension fraction.
    #[must_use]
    pub fn extension(mut self, fraction: f64) -> Self {
        self.extension = fraction;
        self
    }
}

/// Round a sample to a dot row, clamped to `0..=3`.
#[inline]
fn row_of(value: f64) -> u8 {
    // NaN saturates to row 0.
    value.round_ties_even().clamp(0.0, 3.0) as u8
}

/// Every dot of `col` between the rounded `from` and `to`, inclusive.
fn column_range(col: u8, from: f64, to: f64) -> Cell {
    let a = from.round_ties_even();
    let b = to.round_ties_even();
    let low = a.min(b).max(0.0);
    let high = a.max(b).min(3.0);
    if low > high {
        return Cell::EMPTY;
    }
    (low as u8..=high as u8).fold(Cell::EMPTY, |cell, row| {
        cell.with(DotPosition::new(col, row))
    })
}

#[inline]
fn single_dot(col: u8, value: f64) -> Cell {
    Cell::EMPTY.with(DotPosition::new(col, row_of(value)))
}

/// Waveform renderer over the 2×4 dot grid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OctoBresenham {
    config: BresenhamConfig,
}

impl OctoBresenham {
    /// Create a renderer with the given config.
    pub fn new(config: BresenhamConfig) -> Self {
        Self { config }
    }

    /// The active config.
    pub fn config(&self) -> &BresenhamConfig {
        &self.config
    }

    /// Render sample pairs to cells.
    ///
    /// One cell per pair. A trailing odd sample is dropped, so fewer than two
    /// samples give no cells.
    pub fn render_cells(&self, samples: &[f64]) -> Vec<Cell> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "render_waveform",
            samples = samples.len(),
            connect = self.config.connect
        )
        .entered();

        let cfg = &self.config;
        let mut cells = Vec::with_capacity(samples.len() / 2);
        let mut prev_right: Option<f64> = None;

        for pair in samples.chunks_exact(2) {
            let (left, right) = (pair[0], pair[1]);
            let mut cell = Cell::EMPTY;

            if cfg.connect
                && let Some(prev) = prev_right
                && (prev - left).abs() > cfg.large_gap
            {
                cell |= column_range(0, left, (prev + left) / 2.0);
            }

            cell |= single_dot(0, left);
            cell |= single_dot(1, right);

            let gap = (left - right).abs();
            if gap > cfg.large_gap {
                let mid = (left + right) / 2.0;
                cell |= column_range(0, left, mid);
                cell |= column_range(1, mid, right);
            } else if gap > cfg.moderate_gap {
                let reach = (right - left) * cfg.extension;
                cell |= column_range(0, left, left + reach);
                cell |= column_range(1, right - reach, right);
            }

            cells.push(cell);
            prev_right = Some(right);
        }
        cells
    }

    /// Render sample pairs to a glyph string.
    pub fn render(&self, samples: &[f64]) -> String {
        self.render_cells(samples)
            .into_iter()
            .map(Cell::glyph)
            .collect()
    }

    /// Render raw samples as a graph `height` rows tall.
    ///
    /// Samples are normalised to `[0, height*4 - 1]` and sliced into bands of
    /// four sub-rows, highest band first. Within a band larger values sit
    /// higher. Samples above a band pin to its top row, samples below pin to
    /// its bottom row. A band that no sample falls inside renders as
    /// `len/2` spaces. Rows are joined with `\n`.
    pub fn render_multi_row(&self, samples: &[f64], height: usize) -> String {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::debug_span!("render_multi_row", samples = samples.len(), height).entered();

        if samples.is_empty() || height == 0 {
            return String::new();
        }

        let (min, max) = bounds(samples);
        let range = if max != min { max - min } else { 1.0 };
        let top = (height * 4 - 1) as f64;
        let normalized: Vec<f64> = samples.iter().map(|v| (v - min) / range * top).collect();

        let mut rows = Vec::with_capacity(height);
        let mut band = Vec::with_capacity(normalized.len());
        for row_idx in 0..height {
            let row_min = ((height - 1 - row_idx) * 4) as f64;
            let row_max = row_min + 3.0;

            band.clear();
            let mut has_data = false;
            for &v in &normalized {
                let y = if v > row_max {
                    0.0
                } else if v < row_min {
                    3.0
                } else {
                    has_data = true;
                    3.0 - (v - row_min)
                };
                band.push(y);
            }

            if has_data {
                rows.push(self.render(&band));
            } else {
                rows.push(" ".repeat(band.len() / 2));
            }
        }
        rows.join("\n")
    }
}

/// Minimum and maximum of a non-empty slice.
pub(crate) fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .copied()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Render samples in `[0, 3]` with the default thresholds.
pub fn render_waveform(samples: &[f64], connect: bool) -> String {
    OctoBresenham::new(BresenhamConfig::default().connect(connect)).render(samples)
}

/// Render raw samples as a `height`-row graph with the default thresholds.
pub fn render_multi_row(samples: &[f64], height: usize) -> String {
    OctoBresenham::default().render_multi_row(samples, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(samples: &[f64], connect: bool) -> Vec<u8> {
        OctoBresenham::new(BresenhamConfig::default().connect(connect))
            .render_cells(samples)
            .into_iter()
            .map(Cell::bits)
            .collect()
    }

    #[test]
    fn short_input_is_empty() {
        assert_eq!(render_waveform(&[], true), "");
        assert_eq!(render_waveform(&[1.0], true), "");
    }

    #[test]
    fn odd_trailing_sample_is_dropped() {
        assert_eq!(render_waveform(&[0.0, 0.0, 3.0], true).chars().count(), 1);
    }

    #[test]
    fn flat_line_raises_one_dot_per_column() {
        // Row 0 in both columns: dots 1 and 4.
        assert_eq!(bits(&[0.0, 0.0], true), vec![0x09]);
        // Row 3 in both columns: dots 7 and 8.
        assert_eq!(bits(&[3.0, 3.0], true), vec![0xC0]);
    }

    #[test]
    fn full_jump_bridges_both_columns() {
        // Left rows 0..=2, right rows 2..=3.
        assert_eq!(bits(&[0.0, 3.0], true), vec![0xA7]);
        assert_eq!(render_waveform(&[0.0, 3.0], true), "\u{28A7}");
    }

    #[test]
    fn moderate_gap_extends_partially() {
        // Gap 0.8: left 1.0→1.24 stays row 1, right 1.56→1.8 stays row 2.
        assert_eq!(bits(&[1.0, 1.8], true), vec![0x02 | 0x20]);
        // Gap 1.0 is not a large gap: left 0→0.3 row 0, right 0.7→1 row 1.
        assert_eq!(bits(&[0.0, 1.0], true), vec![0x01 | 0x10]);
    }

    #[test]
    fn small_gap_is_single_dots() {
        assert_eq!(bits(&[1.0, 1.4], true), vec![0x02 | 0x10]);
    }

    #[test]
    fn banker_rounding_on_halves() {
        // 0.5 rounds to row 0, 2.5 to row 2.
        assert_eq!(bits(&[0.5, 0.5], false), vec![0x01 | 0x08]);
        assert_eq!(bits(&[2.5, 2.5], false), vec![0x04 | 0x20]);
        // Bridge endpoints round the same way: left 0.5..1.5 covers rows 0..=2.
        assert_eq!(bits(&[0.5, 2.5], false), vec![0x01 | 0x02 | 0x04 | 0x20]);
    }

    #[test]
    fn inter_cell_bridge_only_when_connected() {
        let samples = [0.0, 0.0, 3.0, 3.0];
        // Previous right 0.0, new left 3.0: left column fills 3.0→1.5, rows 2..=3.
        assert_eq!(bits(&samples, true), vec![0x09, 0x04 | 0x40 | 0x80]);
        assert_eq!(bits(&samples, false), vec![0x09, 0xC0]);
    }

    #[test]
    fn out_of_range_samples_clamp() {
        assert_eq!(bits(&[-5.0, 9.0], false), bits(&[0.0, 3.0], false));
        assert_eq!(bits(&[f64::NAN, 1.0], false)[0] & 0x01, 0x01);
    }

    #[test]
    fn custom_thresholds() {
        let config = BresenhamConfig::default().large_gap(5.0).moderate_gap(5.0);
        let strict = OctoBresenham::new(config);
        let cells = strict.render_cells(&[0.0, 3.0]);
        assert_eq!(cells[0].bits(), 0x01 | 0x80);
    }

    #[test]
    fn multi_row_shape() {
        let out = render_multi_row(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 2);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 4));
    }

    #[test]
    fn multi_row_high_values_sit_at_top() {
        // Single band: 0 maps to row 3 (bottom), max to row 0 (top).
        let out = render_multi_row(&[0.0, 0.0, 1.0, 1.0], 1);
        let cells: Vec<Cell> = out.chars().map(Cell::from_glyph_lossy).collect();
        assert_eq!(cells[0].bits(), 0xC0);
        assert_eq!(cells[1].bits() & 0x09, 0x09);
    }

    #[test]
    fn multi_row_empty_band_is_blank() {
        // Only two distinct levels: bands between them hold no samples.
        let out = render_multi_row(&[0.0, 0.0, 10.0, 10.0], 3);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], " ".repeat(2));
    }

    #[test]
    fn multi_row_degenerate_input() {
        assert_eq!(render_multi_row(&[], 4), "");
        assert_eq!(render_multi_row(&[1.0, 2.0], 0), "");
        // Flat input normalises to zero and lands in the bottom band.
        let out = render_multi_row(&[5.0, 5.0], 2);
        assert_eq!(out.split('\n').next(), Some(" "));
    }
}
