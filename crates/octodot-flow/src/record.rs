#![forbid(unsafe_code)]

//! Flat, storable form of a flow signature.
//!
//! A [`FlowRecord`] keeps only strings: the waveform glyphs, the flow and
//! rhythm symbols, the dominant direction name and the first 20 contour
//! values as `{:.3}` CSV. It is what a search store persists, and it can be
//! turned back into a comparable [`FlowSignature`].

use std::fmt;
use std::num::ParseFloatError;

use octodot_core::EncodedSeq;

use crate::signature::{FlowSignature, encode_flow};
use crate::similarity::MAX_CONTOUR_POINTS;
use crate::transition::FlowDirection;

/// Failure to read a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Direction name other than `UP`, `DOWN`, `EXPAND`, `CONTRACT`,
    /// `STABLE` or `PULSE`.
    UnknownDirection(String),
    /// A contour entry that is not a number.
    BadContour {
        /// Position in the CSV list.
        index: usize,
        /// The entry as stored.
        value: String,
        /// Parser message.
        reason: ParseFloatError,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDirection(name) => write!(f, "unknown flow direction: {name:?}"),
            Self::BadContour {
                index,
                value,
                reason,
            } => write!(f, "bad contour entry {index} ({value:?}): {reason}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadContour { reason, .. } => Some(reason),
            Self::UnknownDirection(_) => None,
        }
    }
}

/// Stored form of a flow signature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowRecord {
    /// Source glyphs.
    pub waveform: String,
    /// Flow symbols.
    pub flow_sequence: String,
    /// Rhythm symbols.
    pub rhythm_pattern: String,
    /// Dominant direction.
    pub dominant_flow: FlowDirection,
    /// Up to 20 contour values as comma-separated `{:.3}`.
    pub energy_contour: String,
}

impl FlowRecord {
    /// Flatten a signature.
    pub fn from_signature(sig: &FlowSignature) -> Self {
        let energy_contour = sig
            .energy_contour
            .iter()
            .take(MAX_CONTOUR_POINTS)
            .map(|e| format!("{e:.3}"))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            waveform: sig.source.to_string(),
            flow_sequence: sig.flow_sequence.clone(),
            rhythm_pattern: sig.rhythm_pattern.clone(),
            dominant_flow: sig.dominant_flow,
            energy_contour,
        }
    }

    /// Encode `waveform` and flatten the result.
    pub fn from_waveform(waveform: &str) -> Self {
        Self::from_signature(&encode_flow(waveform))
    }

    /// Parse the stored contour. Empty entries are skipped.
    pub fn contour(&self) -> Result<Vec<f64>, RecordError> {
        self.energy_contour
            .split(',')
            .enumerate()
            .filter(|(_, v)| !v.is_empty())
            .map(|(index, v)| {
                v.trim().parse::<f64>().map_err(|reason| RecordError::BadContour {
                    index,
                    value: v.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// Rebuild a signature for comparison.
    ///
    /// The result has no transitions, but its flow and rhythm symbols,
    /// contour and dominant flow are all present, which is everything
    /// [`flow_similarity`](crate::similarity::flow_similarity) reads.
    pub fn to_signature(&self) -> Result<FlowSignature, RecordError> {
        Ok(FlowSignature {
            source: EncodedSeq::from_glyphs(&self.waveform),
            transitions: Vec::new(),
            flow_sequence: self.flow_sequence.clone(),
            rhythm_pattern: self.rhythm_pattern.clone(),
            energy_contour: self.contour()?,
            dominant_flow: self.dominant_flow,
        })
    }
}
