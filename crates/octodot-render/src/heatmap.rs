#![forbid(unsafe_code)]

//! Dot-density heatmap.
//!
//! Intensity in `[0, 1]` picks one of nine patterns with 0 through 8 raised
//! dots. Each pattern contains the previous one, filling from the bottom row
//! up, so density never drops as intensity rises.

use octodot_core::Cell;

use crate::bresenham::bounds;

/// Dot patterns by intensity level, 0 through 8 raised dots.
pub const INTENSITY_PATTERNS: [u8; 9] = [0x00, 0x40, 0xC0, 0xC4, 0xE4, 0xE6, 0xF6, 0xF7, 0xFF];

/// Highest intensity level.
pub const MAX_LEVEL: usize = INTENSITY_PATTERNS.len() - 1;

/// Cell for intensity level `level`, clamped to `0..=8`.
#[inline]
pub const fn level_cell(level: usize) -> Cell {
    let level = if level > MAX_LEVEL { MAX_LEVEL } else { level };
    Cell::from_bits(INTENSITY_PATTERNS[level])
}

/// Cell for an intensity in `[0, 1]`, with `level = round(value * 8)`.
///
/// Out-of-range values clamp to the empty or full pattern.
pub fn heatmap_level(value: f64) -> Cell {
    let level = (value * MAX_LEVEL as f64)
        .round_ties_even()
        .clamp(0.0, MAX_LEVEL as f64);
    level_cell(level as usize)
}

/// Render a grid of intensities, one glyph per value and one line per row.
///
/// With `normalize`, values are first rescaled by the global min and max of
/// the whole grid (a flat grid maps to zero).
pub fn render_heatmap<R: AsRef<[f64]>>(grid: &[R], normalize: bool) -> String {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("render_heatmap", rows = grid.len(), normalize).entered();

    if grid.is_empty() {
        return String::new();
    }

    let mut scale: Option<(f64, f64)> = None;
    if normalize {
        let flat: Vec<f64> = grid
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        if !flat.is_empty() {
            let (min, max) = bounds(&flat);
            let range = if max != min { max - min } else { 1.0 };
            scale = Some((min, range));
        }
    }

    let lines: Vec<String> = grid
        .iter()
        .map(|row| {
            row.as_ref()
                .iter()
                .map(|&v| match scale {
                    Some((min, range)) => (v - min) / range,
                    None => v,
                })
                .map(|v| heatmap_level(v).glyph())
                .collect()
        })
        .collect();
    lines.join("\n")
}

/// A left-to-right ramp through every intensity level.
pub fn render_gradient(width: usize) -> String {
    match width {
        0 => String::new(),
        1 => level_cell(0).glyph().to_string(),
        _ => (0..width)
            .map(|i| {
                let level = (i as f64 / (width - 1) as f64 * MAX_LEVEL as f64) as usize;
                level_cell(level).glyph()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_nested_by_count() {
        for (level, pair) in INTENSITY_PATTERNS.windows(2).enumerate() {
            assert_eq!(pair[0].count_ones() as usize, level);
            assert_eq!(pair[0] & pair[1], pair[0], "level {level} not nested");
        }
        assert_eq!(INTENSITY_PATTERNS[MAX_LEVEL], 0xFF);
    }

    #[test]
    fn level_mapping() {
        assert_eq!(heatmap_level(0.0), Cell::EMPTY);
        assert_eq!(heatmap_level(1.0), Cell::FULL);
        assert_eq!(heatmap_level(0.5).bits(), 0xE4);
        assert_eq!(heatmap_level(-2.0), Cell::EMPTY);
        assert_eq!(heatmap_level(7.0), Cell::FULL);
        // 0.0625 * 8 = 0.5 rounds to even: level 0.
        assert_eq!(heatmap_level(0.0625), Cell::EMPTY);
    }

    #[test]
    fn heatmap_normalises_globally() {
        let grid = [vec![0.0, 5.0], vec![10.0, 10.0]];
        assert_eq!(render_heatmap(&grid, true), "\u{2800}\u{28E4}\n\u{28FF}\u{28FF}");
    }

    #[test]
    fn heatmap_without_normalisation_clamps() {
        let grid = [[0.0, 10.0]];
        assert_eq!(render_heatmap(&grid, false), "\u{2800}\u{28FF}");
    }

    #[test]
    fn flat_grid_maps_to_empty() {
        let grid = [[3.0, 3.0, 3.0]];
        assert_eq!(render_heatmap(&grid, true), "\u{2800}".repeat(3));
    }

    #[test]
    fn empty_inputs() {
        let none: [Vec<f64>; 0] = [];
        assert_eq!(render_heatmap(&none, true), "");
        assert_eq!(render_heatmap(&[Vec::<f64>::new()], true), "");
    }

    #[test]
    fn gradient_spans_all_levels() {
        let ramp = render_gradient(9);
        let levels: Vec<u32> = ramp
            .chars()
            .map(|c| Cell::from_glyph_lossy(c).dot_count())
            .collect();
        assert_eq!(levels, (0..=8).collect::<Vec<u32>>());
        assert_eq!(render_gradient(0), "");
        assert_eq!(render_gradient(1), "\u{2800}");
        assert_eq!(render_gradient(40).chars().count(), 40);
    }
}
