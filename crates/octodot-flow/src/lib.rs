#![forbid(unsafe_code)]

//! Temporal dot-flow: comparing cell sequences by how their dots move.
//!
//! A [`FlowSignature`] records, for every pair of neighbouring cells, which
//! dots appeared and disappeared and which way the pattern moved. Two
//! sequences with entirely different dots can still share a signature, and
//! [`flow_similarity`] scores that shared "feel" where
//! [`pattern_similarity`] only sees the dots.
//!
//! ```
//! use octodot_flow::{encode_flow, flow_similarity, pattern_similarity};
//!
//! let a = "⠁⠃⠇⡇⣇⣿⣷⣶⣤⣀";
//! let b = "⠈⠘⠸⢸⣸⣿⣾⣼⣰⣀";
//! let flow = flow_similarity(&encode_flow(a), &encode_flow(b));
//! assert!(flow > pattern_similarity(a, b));
//! ```

pub mod index;
pub mod record;
pub mod report;
pub mod signature;
pub mod similarity;
pub mod transition;

pub use index::{FlowIndex, IndexConfig, IndexEntry, SearchHit};
pub use record::{FlowRecord, RecordError};
pub use report::flow_report;
pub use signature::{FlowSignature, encode_flow};
pub use similarity::{
    FlowWeights, cell_similarity, contour_similarity, flow_similarity, lcs_ratio,
    pattern_similarity,
};
pub use transition::{DotTransition, FlowDirection, RhythmMark};
