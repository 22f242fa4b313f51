#![forbid(unsafe_code)]

//! Rendering numeric data onto 8-dot cells.
//!
//! - [`bresenham`]: connected waveforms, one cell per sample pair, and
//!   multi-row graphs.
//! - [`heatmap`]: intensity as dot density.
//! - [`sparkline`]: min–max scaled one-line trends.
//! - [`fingerprint`]: audio buffers as waveform, envelope and spectrum views.

pub mod bresenham;
pub mod fingerprint;
pub mod heatmap;
pub mod sparkline;

pub use bresenham::{BresenhamConfig, OctoBresenham, render_multi_row, render_waveform};
pub use fingerprint::{
    AudioMetrics, Fingerprint, FingerprintConfig, Fingerprinter, pcm_to_samples,
};
pub use heatmap::{INTENSITY_PATTERNS, heatmap_level, render_gradient, render_heatmap};
pub use sparkline::{Sparkline, render_sparkline};
