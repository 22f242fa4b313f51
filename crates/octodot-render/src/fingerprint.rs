#![forbid(unsafe_code)]

//! Audio fingerprints drawn in dots.
//!
//! A [`Fingerprint`] bundles several views of one mono sample buffer:
//!
//! - **waveform**: mean-downsampled samples mapped from `[-1, 1]` to the four
//!   dot rows and drawn with the Octo-Bresenham renderer,
//! - **envelope**: windowed RMS scaled by 3, drawn the same way,
//! - **spectrum**: eight heatmap cells, one per frequency band, from a sine
//!   correlation over the middle of the buffer,
//! - **spectrogram**: a `height × width` heatmap of band energy over time,
//! - [`AudioMetrics`]: RMS, peak, zero crossings and dynamic range.
//!
//! The frequency views are plain correlations against a sine at each band
//! centre, not an FFT.

use std::f64::consts::TAU;
use std::fmt;

use octodot_core::{Cell, SampleError};

use crate::bresenham::OctoBresenham;
use crate::heatmap::{level_cell, render_heatmap};

/// Bands in the spectrum signature.
pub const SPECTRUM_BANDS: usize = 8;

/// Largest chunk correlated for the spectrum signature.
const SPECTRUM_CHUNK: usize = 1024;
/// Fewer samples than this give a blank spectrum signature.
const SPECTRUM_MIN_SAMPLES: usize = 16;
/// Fewer samples than this give a blank spectrogram.
const SPECTROGRAM_MIN_SAMPLES: usize = 64;
/// Spectrogram time bins shorter than this score zero.
const SPECTROGRAM_MIN_CHUNK: usize = 8;
/// Windows quieter than this RMS are ignored for dynamic range.
const SILENCE_RMS: f64 = 1e-4;

/// Output size of a [`Fingerprinter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Cells per line.
    pub width: usize,
    /// Spectrogram rows.
    pub height: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 4,
        }
    }
}

impl FingerprintConfig {
    /// Set the line width in cells.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set the spectrogram height in rows.
    #[must_use]
    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
}

/// Summary statistics of a sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioMetrics {
    /// Root mean square amplitude.
    pub rms: f64,
    /// Largest absolute sample.
    pub peak: f64,
    /// Sign changes between neighbours (zero counts as positive).
    pub zero_crossings: usize,
    /// Ratio of loudest to quietest non-silent window, in dB.
    pub dynamic_range_db: f64,
}

impl AudioMetrics {
    /// Compute all metrics for `samples`.
    pub fn compute(samples: &[f64]) -> Self {
        Self {
            rms: rms(samples),
            peak: samples.iter().fold(0.0, |m: f64, s| m.max(s.abs())),
            zero_crossings: zero_crossings(samples),
            dynamic_range_db: dynamic_range_db(samples),
        }
    }
}

/// Dot views of one sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    /// Buffer length over sample rate.
    pub duration_secs: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// One-line waveform.
    pub waveform: String,
    /// One-line amplitude envelope.
    pub envelope: String,
    /// Eight-cell band energy signature.
    pub spectrum: String,
    /// Multi-line band energy over time.
    pub spectrogram: String,
    /// Summary statistics.
    pub metrics: AudioMetrics,
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Duration: {:.2}s | {}Hz",
            self.duration_secs, self.sample_rate
        )?;
        writeln!(
            f,
            "RMS: {:.3} | Peak: {:.3} | DR: {:.1}dB",
            self.metrics.rms, self.metrics.peak, self.metrics.dynamic_range_db
        )?;
        writeln!(f, "Waveform: {}", self.waveform)?;
        writeln!(f, "Envelope: {}", self.envelope)?;
        writeln!(f, "Spectrum: {}", self.spectrum)?;
        write!(f, "{}", self.spectrogram)
    }
}

/// Builds [`Fingerprint`]s at a fixed output size.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fingerprinter {
    config: FingerprintConfig,
    renderer: OctoBresenham,
}

impl Fingerprinter {
    /// Create a fingerprinter with the given output size.
    pub fn new(config: FingerprintConfig) -> Self {
        Self {
            config,
            renderer: OctoBresenham::default(),
        }
    }

    /// The active config.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Fingerprint mono samples in `[-1, 1]` recorded at `sample_rate` Hz.
    pub fn fingerprint(&self, samples: &[f64], sample_rate: u32) -> Fingerprint {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "fingerprint",
            samples = samples.len(),
            sample_rate,
            width = self.config.width
        )
        .entered();

        let points = self.config.width * 2;
        let rate = f64::from(sample_rate.max(1));

        let waveform: Vec<f64> = downsample(samples, points)
            .into_iter()
            .map(|s| (s + 1.0) * 1.5)
            .collect();

        Fingerprint {
            duration_secs: samples.len() as f64 / rate,
            sample_rate,
            waveform: self.renderer.render(&waveform),
            envelope: self.renderer.render(&envelope(samples, points)),
            spectrum: spectrum_signature(samples, sample_rate),
            spectrogram: self.spectrogram(samples, sample_rate),
            metrics: AudioMetrics::compute(samples),
        }
    }

    /// Band energy over time as a heatmap, lowest frequency at the bottom.
    pub fn spectrogram(&self, samples: &[f64], sample_rate: u32) -> String {
        let FingerprintConfig { width, height } = self.config;
        if width == 0 || height == 0 {
            return String::new();
        }
        if samples.len() < SPECTROGRAM_MIN_SAMPLES {
            return Cell::EMPTY.glyph().to_string().repeat(width);
        }

        let rate = f64::from(sample_rate.max(1));
        let chunk_len = samples.len() / width;
        let grid: Vec<Vec<f64>> = (0..height)
            .map(|band| {
                let freq = (height - band) as f64 * rate / (height * 4) as f64;
                (0..width)
                    .map(|bin| {
                        let start = bin * chunk_len;
                        let end = (start + chunk_len).min(samples.len());
                        let chunk = &samples[start..end];
                        if chunk.len() < SPECTROGRAM_MIN_CHUNK {
                            0.0
                        } else {
                            sine_correlation(chunk, freq, rate)
                        }
                    })
                    .collect()
            })
            .collect();
        render_heatmap(&grid, true)
    }
}

/// Mean |Σ s·sin(2πft)| over a chunk.
fn sine_correlation(chunk: &[f64], freq: f64, rate: f64) -> f64 {
    let energy: f64 = chunk
        .iter()
        .enumerate()
        .map(|(i, s)| s * (TAU * freq * i as f64 / rate).sin())
        .sum();
    energy.abs() / chunk.len() as f64
}

/// Mean-window downsample to `target` points. Short input is zero-padded.
pub fn downsample(samples: &[f64], target: usize) -> Vec<f64> {
    if target == 0 {
        return Vec::new();
    }
    if samples.len() <= target {
        let mut out = samples.to_vec();
        out.resize(target, 0.0);
        return out;
    }
    let window = samples.len() / target;
    samples
        .chunks(window)
        .take(target)
        .map(|w| w.iter().sum::<f64>() / w.len() as f64)
        .collect()
}

/// Windowed RMS × 3 at `target` points. Empty input is a flat mid line.
pub fn envelope(samples: &[f64], target: usize) -> Vec<f64> {
    if samples.is_empty() {
        return vec![1.5; target];
    }
    let window = (samples.len() / target.max(1)).max(1);
    (0..target)
        .map(|i| {
            let start = (i * window).min(samples.len());
            let end = (start + window).min(samples.len());
            match &samples[start..end] {
                [] => 0.0,
                w => rms(w) * 3.0,
            }
        })
        .collect()
}

/// Eight-cell band energy signature of the middle of the buffer.
pub fn spectrum_signature(samples: &[f64], sample_rate: u32) -> String {
    let chunk_len = samples.len().min(SPECTRUM_CHUNK);
    if chunk_len < SPECTRUM_MIN_SAMPLES {
        return Cell::EMPTY.glyph().to_string().repeat(SPECTRUM_BANDS);
    }

    let rate = f64::from(sample_rate.max(1));
    let mid = samples.len() / 2;
    let start = mid.saturating_sub(chunk_len / 2);
    let end = (mid + chunk_len / 2).min(samples.len());
    let chunk = &samples[start..end];

    let energies: Vec<f64> = (0..SPECTRUM_BANDS)
        .map(|band| {
            let freq = (band + 1) as f64 * rate / (2 * SPECTRUM_BANDS) as f64;
            sine_correlation(chunk, freq, rate)
        })
        .collect();

    let max = energies.iter().copied().fold(0.0, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    energies
        .iter()
        .map(|e| level_cell((e / max * 8.0) as usize).glyph())
        .collect()
}

/// Root mean square (0 for no samples).
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Sign changes between neighbours, treating zero as positive.
pub fn zero_crossings(samples: &[f64]) -> usize {
    samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count()
}

/// Loudest over quietest non-silent window RMS, in dB.
///
/// Windows are `max(100, len/100)` samples. Fewer than two non-silent
/// windows give 0.
pub fn dynamic_range_db(samples: &[f64]) -> f64 {
    let window = (samples.len() / 100).max(100);
    let levels: Vec<f64> = samples
        .chunks(window)
        .map(rms)
        .filter(|&r| r > SILENCE_RMS)
        .collect();
    if levels.len() < 2 {
        return 0.0;
    }
    let max = levels.iter().copied().fold(f64::MIN, f64::max);
    let min = levels.iter().copied().fold(f64::MAX, f64::min);
    20.0 * (max / min).log10()
}

/// Decode little-endian PCM to mono samples in `[-1, 1]`.
///
/// `sample_width` is bytes per sample: 1 (unsigned, offset 128), 2 or 4
/// (signed). Interleaved channels are averaged per frame and a trailing
/// partial frame is dropped.
pub fn pcm_to_samples(
    bytes: &[u8],
    sample_width: u16,
    channels: u16,
) -> Result<Vec<f64>, SampleError> {
    let decode: fn(&[u8]) -> f64 = match sample_width {
        1 => |b| (f64::from(b[0]) - 128.0) / 128.0,
        2 => |b| f64::from(i16::from_le_bytes([b[0], b[1]])) / 32_768.0,
        4 => |b| f64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]])) / 2_147_483_648.0,
        other => return Err(SampleError::UnsupportedWidth(other)),
    };

    let channels = usize::from(channels.max(1));
    let frame_len = usize::from(sample_width) * channels;
    let samples = bytes
        .chunks_exact(frame_len)
        .map(|frame| {
            let sum: f64 = frame
                .chunks_exact(usize::from(sample_width))
                .map(decode)
                .sum();
            sum / channels as f64
        })
        .collect();
    Ok(samples)
}
