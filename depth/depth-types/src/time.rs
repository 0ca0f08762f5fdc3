//! Capture timestamps for camera messages.
//!
//! Every depth frame, image and camera-info record carries a [`Timestamp`]
//! so that streams from different cameras can be aligned in `depth-register`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nanosecond-precision capture timestamp.
///
/// # Example
///
/// ```
/// use depth_types::Timestamp;
///
/// let ts = Timestamp::from_secs_f64(1.5);
/// assert_eq!(ts.as_nanos(), 1_500_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    nanos: u64,
}

impl Timestamp {
    /// Creates a timestamp from nanoseconds since epoch.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Creates a timestamp from whole seconds and subsecond nanoseconds.
    #[must_use]
    pub const fn from_secs_nanos(secs: u64, nanos: u32) -> Self {
        Self {
            nanos: secs * 1_000_000_000 + nanos as u64,
        }
    }

    /// Creates a timestamp from seconds (floating point).
    ///
    /// Negative values clamp to zero.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self {
            nanos: (secs * 1e9).max(0.0) as u64,
        }
    }

    /// Returns the timestamp as nanoseconds.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.nanos
    }

    /// Returns the timestamp as seconds (floating point).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.nanos as f64 / 1e9
    }

    /// Returns the zero timestamp.
    #[must_use]
    pub const fn zero() -> Self {
        Self { nanos: 0 }
    }

    /// Returns the absolute difference between two timestamps.
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> TimeDelta {
        TimeDelta::from_nanos(self.nanos.abs_diff(other.nanos))
    }
}

/// A non-negative time interval with nanosecond precision.
///
/// Used for synchronization tolerances when matching frame timestamps.
///
/// # Example
///
/// ```
/// use depth_types::TimeDelta;
///
/// let tol = TimeDelta::from_millis(10);
/// assert_eq!(tol.as_nanos(), 10_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeDelta {
    nanos: u64,
}

impl TimeDelta {
    /// Creates an interval from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Creates an interval from microseconds.
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self {
            nanos: micros * 1_000,
        }
    }

    /// Creates an interval from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis * 1_000_000,
        }
    }

    /// Creates an interval from seconds (floating point).
    ///
    /// Negative values clamp to zero.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self {
            nanos: (secs * 1e9).max(0.0) as u64,
        }
    }

    /// Returns the interval as nanoseconds.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.nanos
    }

    /// Returns the interval as seconds (floating point).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.nanos as f64 / 1e9
    }

    /// Returns the zero interval.
    #[must_use]
    pub const fn zero() -> Self {
        Self { nanos: 0 }
    }

    /// Checks if this is the zero interval.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.nanos == 0
    }
}
