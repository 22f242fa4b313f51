#![forbid(unsafe_code)]

//! Core: the 8-dot cell, its byte and text codecs, and the logging shim.

pub mod cell;
pub mod error;
pub mod logging;
pub mod text;

pub use cell::{
    BRAILLE_BASE, BRAILLE_LAST, Cell, DotPosition, Dots, LEFT_COLUMN, RIGHT_COLUMN, decode_cell,
    encode_byte, is_glyph,
};
pub use error::{SampleError, check_finite};
pub use text::{
    EncodedSeq, decode, decode_cells, decode_text, dot_density, encode, encode_text, is_encoded,
};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
