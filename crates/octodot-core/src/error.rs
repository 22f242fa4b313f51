#![forbid(unsafe_code)]

//! Input validation errors.
//!
//! The codecs and renderers are total and never fail. These errors exist for
//! callers that want to reject malformed numeric input up front.

use std::fmt;

/// Rejected numeric sample input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// A sample was NaN or infinite.
    NonFinite {
        /// Position of the offending sample.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// PCM sample width (in bytes) other than 1, 2 or 4.
    UnsupportedWidth(u16),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { index, value } => {
                write!(f, "sample {index} is not finite ({value})")
            }
            Self::UnsupportedWidth(width) => {
                write!(f, "unsupported PCM sample width: {width} bytes")
            }
        }
    }
}

impl std::error::Error for SampleError {}

/// Reject any NaN or infinite sample.
pub fn check_finite(samples: &[f64]) -> Result<(), SampleError> {
    match samples.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SampleError::NonFinite {
            index,
            value: samples[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_input_passes() {
        assert_eq!(check_finite(&[0.0, 1.5, -3.0]), Ok(()));
        assert_eq!(check_finite(&[]), Ok(()));
    }

    #[test]
    fn first_bad_sample_is_reported() {
        let err = check_finite(&[0.0, f64::INFINITY, f64::NAN]).unwrap_err();
        assert!(matches!(err, SampleError::NonFinite { index: 1, .. }));
        assert_eq!(err.to_string(), "sample 1 is not finite (inf)");
    }

    #[test]
    fn width_error_message() {
        assert_eq!(
            SampleError::UnsupportedWidth(3).to_string(),
            "unsupported PCM sample width: 3 bytes"
        );
    }
}
