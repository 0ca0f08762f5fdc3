//! Error types for depth and camera value types.

use thiserror::Error;

use crate::DepthEncoding;

/// Errors that can occur when constructing or validating depth data.
#[derive(Debug, Error)]
pub enum DepthError {
    /// Camera record has a non-finite or non-positive focal length.
    #[error("invalid intrinsics: fx={fx}, fy={fy}")]
    InvalidIntrinsics {
        /// Focal length in x.
        fx: f64,
        /// Focal length in y.
        fy: f64,
    },

    /// Camera record reports a zero-sized sensor.
    #[error("zero resolution: {width}x{height}")]
    ZeroResolution {
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },

    /// Buffer does not hold the expected number of elements.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch {
        /// Expected element or byte count.
        expected: usize,
        /// Actual element or byte count.
        actual: usize,
    },

    /// Row stride is smaller than one row of samples.
    #[error("row stride too small: {step} bytes, need at least {min}")]
    StrideTooSmall {
        /// Stride carried by the frame.
        step: u32,
        /// Minimum stride for the frame's width and encoding.
        min: usize,
    },

    /// Frame encoding does not match the requested codec.
    #[error("encoding mismatch: expected {expected}, got {actual}")]
    EncodingMismatch {
        /// Encoding the caller asked for.
        expected: DepthEncoding,
        /// Encoding the frame carries.
        actual: DepthEncoding,
    },
}

impl DepthError {
    /// Creates an invalid-intrinsics error.
    #[must_use]
    pub const fn invalid_intrinsics(fx: f64, fy: f64) -> Self {
        Self::InvalidIntrinsics { fx, fy }
    }

    /// Creates a zero-resolution error.
    #[must_use]
    pub const fn zero_resolution(width: u32, height: u32) -> Self {
        Self::ZeroResolution { width, height }
    }

    /// Creates a buffer size mismatch error.
    #[must_use]
    pub const fn buffer_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    /// Creates a stride error.
    #[must_use]
    pub const fn stride_too_small(step: u32, min: usize) -> Self {
        Self::StrideTooSmall { step, min }
    }

    /// Creates an encoding mismatch error.
    #[must_use]
    pub const fn encoding_mismatch(expected: DepthEncoding, actual: DepthEncoding) -> Self {
        Self::EncodingMismatch { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_intrinsics() {
        let err = DepthError::invalid_intrinsics(0.0, 525.0);
        assert!(err.to_string().contains("invalid intrinsics"));
        assert!(err.to_string().contains("525"));
    }

    #[test]
    fn error_zero_resolution() {
        let err = DepthError::zero_resolution(0, 480);
        assert!(err.to_string().contains("0x480"));
    }

    #[test]
    fn error_buffer_mismatch() {
        let err = DepthError::buffer_mismatch(100, 50);
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn error_stride() {
        let err = DepthError::stride_too_small(2, 8);
        assert!(err.to_string().contains("stride"));
    }

    #[test]
    fn error_encoding_mismatch() {
        let err = DepthError::encoding_mismatch(DepthEncoding::Fixed16, DepthEncoding::Float32);
        assert!(err.to_string().contains("16UC1"));
        assert!(err.to_string().contains("32FC1"));
    }
}
