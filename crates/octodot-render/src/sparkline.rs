#![forbid(unsafe_code)]

//! Single-row sparkline over the Octo-Bresenham renderer.
//!
//! # Example
//!
//! ```
//! use octodot_render::sparkline::Sparkline;
//!
//! let line = Sparkline::new(&[1.0, 4.0, 2.0, 8.0, 3.0, 6.0]).width(3).render_to_string();
//! assert_eq!(line.chars().count(), 3);
//! ```

use crate::bresenham::{BresenhamConfig, OctoBresenham, bounds};

/// A compact one-line trend view.
///
/// Data is min–max scaled to the four dot rows, so two samples fill one
/// cell. With a target width the data is first resampled to `width * 2`
/// points by nearest index.
#[derive(Debug, Clone)]
pub struct Sparkline<'a> {
    data: &'a [f64],
    width: Option<usize>,
    config: BresenhamConfig,
}

impl<'a> Sparkline<'a> {
    /// Create a sparkline over `data`.
    pub fn new(data: &'a [f64]) -> Self {
        Self {
            data,
            width: None,
            config: BresenhamConfig::default(),
        }
    }

    /// Target width in cells.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Renderer thresholds.
    #[must_use]
    pub fn config(mut self, config: BresenhamConfig) -> Self {
        self.config = config;
        self
    }

    /// Nearest-index resample to `width * 2` points, if a width is set and
    /// the data does not already have that many.
    fn resampled(&self) -> Vec<f64> {
        match self.width {
            Some(width) if width > 0 && self.data.len() != width * 2 => {
                let target = width * 2;
                let len = self.data.len();
                (0..target)
                    .map(|i| {
                        let idx = (i as f64 / target as f64 * len as f64) as usize;
                        self.data[idx.min(len - 1)]
                    })
                    .collect()
            }
            _ => self.data.to_vec(),
        }
    }

    /// Render as a glyph string.
    pub fn render_to_string(&self) -> String {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "render_sparkline",
            data_len = self.data.len(),
            width = self.width.unwrap_or(0)
        )
        .entered();

        if self.data.is_empty() {
            return String::new();
        }

        let data = self.resampled();
        let (min, max) = bounds(&data);
        let range = if max != min { max - min } else { 1.0 };
        let normalized: Vec<f64> = data.iter().map(|v| (v - min) / range * 3.0).collect();
        OctoBresenham::new(self.config).render(&normalized)
    }
}

/// Render `samples` as a sparkline, optionally resampled to `width` cells.
pub fn render_sparkline(samples: &[f64], width: Option<usize>) -> String {
    let spark = Sparkline::new(samples);
    match width {
        Some(w) => spark.width(w),
        None => spark,
    }
    .render_to_string()
}
