#![forbid(unsafe_code)]

//! OctoDot public facade crate.
//!
//! Re-exports the cell codecs, the renderers and the flow encoder from the
//! internal crates, plus a shared [`Error`] for applications built on them.
//!
//! ```
//! use octodot::prelude::*;
//!
//! let encoded = encode_text("hi");
//! assert_eq!(decode_text(&encoded), "hi");
//!
//! let line = render_waveform(&[0.0, 1.0, 2.0, 3.0], true);
//! assert_eq!(line.chars().count(), 2);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use octodot_core::{
    BRAILLE_BASE, BRAILLE_LAST, Cell, DotPosition, Dots, EncodedSeq, SampleError, check_finite,
    decode_cell, decode_text, dot_density, encode_byte, encode_text, is_encoded, is_glyph,
};

// --- Render re-exports -----------------------------------------------------

pub use octodot_render::{
    BresenhamConfig, Fingerprint, FingerprintConfig, Fingerprinter, OctoBresenham, Sparkline,
    heatmap_level, pcm_to_samples, render_gradient, render_heatmap, render_multi_row,
    render_sparkline, render_waveform,
};

// --- Flow re-exports -------------------------------------------------------

pub use octodot_flow::{
    DotTransition, FlowDirection, FlowIndex, FlowRecord, FlowSignature, FlowWeights, IndexConfig,
    IndexEntry, RecordError, RhythmMark, SearchHit, encode_flow, flow_report, flow_similarity,
    pattern_similarity,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for OctoDot applications.
#[derive(Debug)]
pub enum Error {
    /// I/O failure reading input or writing output.
    Io(std::io::Error),
    /// Malformed numeric input.
    Sample(SampleError),
    /// Unreadable stored flow record.
    Record(RecordError),
    /// Bad invocation, with message.
    Usage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Sample(err) => write!(f, "{err}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::Usage(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sample(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::Usage(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SampleError> for Error {
    fn from(err: SampleError) -> Self {
        Self::Sample(err)
    }
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}

/// Standard result type for OctoDot APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Cell, EncodedSeq, Error, FlowDirection, FlowSignature, OctoBresenham, Result,
        decode_text, encode_flow, encode_text, flow_similarity, pattern_similarity,
        render_heatmap, render_multi_row, render_sparkline, render_waveform,
    };

    pub use crate::{core, flow, render};
}

pub use octodot_core as core;
pub use octodot_flow as flow;
pub use octodot_render as render;
