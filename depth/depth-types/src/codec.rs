//! Numeric codecs for on-wire depth samples.
//!
//! Depth cameras publish one of two incompatible sample formats: 16-bit
//! unsigned integers in fixed-point millimeters, where 0 is the "unknown"
//! sentinel, or 32-bit floats in meters, where NaN is the sentinel. The
//! [`DepthCodec`] trait unifies validity testing and metric conversion so
//! the projection math is written once; callers dispatch on the frame's
//! [`DepthEncoding`] tag and the per-pixel loop monomorphizes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// Tag identifying the numeric format of a depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DepthEncoding {
    /// Unsigned 16-bit samples, 1 unit = 1 millimeter, 0 = unknown.
    Fixed16,
    /// 32-bit float samples in meters, NaN = unknown.
    Float32,
}

impl DepthEncoding {
    /// Bytes occupied by one sample.
    #[must_use]
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::Fixed16 => 2,
            Self::Float32 => 4,
        }
    }
}

impl fmt::Display for DepthEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixed16 => "16UC1",
            Self::Float32 => "32FC1",
        })
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Fixed16 {}
    impl Sealed for super::Float32 {}
}

/// Operations a depth numeric format must provide.
///
/// The trait is sealed to the two wire encodings. All downstream math goes
/// through [`to_meters`](Self::to_meters) / [`from_meters`](Self::from_meters)
/// and is numerically representation-agnostic.
pub trait DepthCodec: sealed::Sealed {
    /// In-memory sample type.
    type Sample: bytemuck::Pod + PartialOrd;

    /// Tag for this codec.
    const ENCODING: DepthEncoding;

    /// Checks whether a sample carries a measurement.
    fn valid(sample: Self::Sample) -> bool;

    /// Converts a sample to metric meters.
    fn to_meters(sample: Self::Sample) -> f64;

    /// Converts metric meters to a sample, rounding to the representation.
    fn from_meters(meters: f64) -> Self::Sample;

    /// The "unknown" sentinel.
    ///
    /// Output buffers must be filled with this before any write. For
    /// [`Fixed16`] that is plain zero, but a zero-filled [`Float32`] buffer
    /// would read back as valid zero-depth measurements, so float buffers
    /// need an explicit NaN fill.
    fn invalid() -> Self::Sample;
}

/// Fixed-point millimeter codec (`16UC1`).
#[derive(Debug, Clone, Copy)]
pub struct Fixed16;

/// Meters stored per sample by [`Fixed16`].
pub const FIXED16_METERS_PER_UNIT: f64 = 0.001;

impl DepthCodec for Fixed16 {
    type Sample = u16;

    const ENCODING: DepthEncoding = DepthEncoding::Fixed16;

    #[inline]
    fn valid(sample: u16) -> bool {
        sample != 0
    }

    #[inline]
    fn to_meters(sample: u16) -> f64 {
        f64::from(sample) * FIXED16_METERS_PER_UNIT
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_meters(meters: f64) -> u16 {
        (meters / FIXED16_METERS_PER_UNIT + 0.5) as u16
    }

    #[inline]
    fn invalid() -> u16 {
        0
    }
}

/// Float meter codec (`32FC1`).
#[derive(Debug, Clone, Copy)]
pub struct Float32;

impl DepthCodec for Float32 {
    type Sample = f32;

    const ENCODING: DepthEncoding = DepthEncoding::Float32;

    #[inline]
    fn valid(sample: f32) -> bool {
        !sample.is_nan()
    }

    #[inline]
    fn to_meters(sample: f32) -> f64 {
        f64::from(sample)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_meters(meters: f64) -> f32 {
        meters as f32
    }

    #[inline]
    fn invalid() -> f32 {
        f32::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed16_sentinel_is_zero() {
        assert!(!Fixed16::valid(0));
        assert!(Fixed16::valid(1));
        assert_eq!(Fixed16::invalid(), 0);
    }

    #[test]
    fn fixed16_metric_conversion() {
        assert!((Fixed16::to_meters(1000) - 1.0).abs() < 1e-12);
        assert_eq!(Fixed16::from_meters(1.0), 1000);
        // Rounds to nearest unit.
        assert_eq!(Fixed16::from_meters(0.001_4), 1);
        assert_eq!(Fixed16::from_meters(0.001_6), 2);
    }

    #[test]
    fn float32_sentinel_is_nan() {
        assert!(!Float32::valid(f32::NAN));
        assert!(Float32::valid(0.0));
        assert!(Float32::invalid().is_nan());
    }

    #[test]
    fn float32_conversion_is_identity() {
        assert!((Float32::to_meters(2.5) - 2.5).abs() < 1e-6);
        assert!((Float32::from_meters(2.5) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn encoding_sizes() {
        assert_eq!(DepthEncoding::Fixed16.bytes_per_sample(), 2);
        assert_eq!(DepthEncoding::Float32.bytes_per_sample(), 4);
        assert_eq!(format!("{}", DepthEncoding::Fixed16), "16UC1");
    }
}
