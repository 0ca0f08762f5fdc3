//! Structured depth images.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DepthCodec, DepthEncoding, DepthError, FrameId, Timestamp};

/// A row-major depth image with an explicit numeric encoding.
///
/// The raw byte buffer is kept untyped so frames can be handed over from a
/// transport layer without copying; sample access goes through a
/// [`DepthCodec`] chosen from the [`encoding`](Self::encoding) tag. The row
/// stride `step` is in bytes and may exceed `width * bytes_per_sample` when
/// the producer pads rows for alignment.
///
/// Frames are frame-scoped value objects: producers own them exclusively
/// and consumers treat them as read-only.
///
/// # Example
///
/// ```
/// use depth_types::{DepthFrame, Fixed16, FrameId, Timestamp};
///
/// let frame = DepthFrame::from_samples::<Fixed16>(
///     Timestamp::zero(),
///     FrameId::new("depth_optical"),
///     2,
///     2,
///     vec![1000, 0, 2000, 500],
/// )
/// .unwrap();
///
/// assert_eq!(frame.get::<Fixed16>(0, 0), Some(1000));
/// assert_eq!(frame.depth_at::<Fixed16>(1, 0), None); // 0 = unknown
/// assert_eq!(frame.valid_count::<Fixed16>(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepthFrame {
    /// Capture time.
    pub timestamp: Timestamp,
    /// Optical frame the depths are measured in.
    pub frame: FrameId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row stride in bytes.
    pub step: u32,
    /// Numeric format of the samples.
    pub encoding: DepthEncoding,
    /// Raw sample buffer, row-major.
    pub data: Vec<u8>,
}

impl DepthFrame {
    /// Creates a packed frame where every sample is the codec's "unknown"
    /// sentinel.
    ///
    /// For [`Float32`](crate::Float32) this performs the explicit NaN fill;
    /// zeroed memory would read back as valid zero depth.
    #[must_use]
    pub fn new_invalid<C: DepthCodec>(
        timestamp: Timestamp,
        frame: FrameId,
        width: u32,
        height: u32,
    ) -> Self {
        let samples = vec![C::invalid(); width as usize * height as usize];
        Self {
            timestamp,
            frame,
            width,
            height,
            step: width * C::ENCODING.bytes_per_sample() as u32,
            encoding: C::ENCODING,
            data: bytemuck::cast_slice(&samples).to_vec(),
        }
    }

    /// Creates a packed frame from row-major samples.
    ///
    /// # Errors
    ///
    /// [`DepthError::BufferSizeMismatch`] if `samples.len() != width * height`.
    pub fn from_samples<C: DepthCodec>(
        timestamp: Timestamp,
        frame: FrameId,
        width: u32,
        height: u32,
        samples: Vec<C::Sample>,
    ) -> Result<Self, DepthError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(DepthError::buffer_mismatch(expected, samples.len()));
        }
        Ok(Self {
            timestamp,
            frame,
            width,
            height,
            step: width * C::ENCODING.bytes_per_sample() as u32,
            encoding: C::ENCODING,
            data: bytemuck::cast_slice(&samples).to_vec(),
        })
    }

    /// Bytes occupied by one sample of this frame's encoding.
    #[must_use]
    pub const fn bytes_per_sample(&self) -> usize {
        self.encoding.bytes_per_sample()
    }

    /// Checks buffer geometry against a codec.
    ///
    /// # Errors
    ///
    /// [`DepthError::EncodingMismatch`] if the frame's tag is not `C`'s,
    /// [`DepthError::StrideTooSmall`] if rows overlap, and
    /// [`DepthError::BufferSizeMismatch`] if the buffer cannot hold
    /// `height` rows of `step` bytes.
    pub fn validate<C: DepthCodec>(&self) -> Result<(), DepthError> {
        if self.encoding != C::ENCODING {
            return Err(DepthError::encoding_mismatch(C::ENCODING, self.encoding));
        }
        let min_step = self.width as usize * self.bytes_per_sample();
        if (self.step as usize) < min_step {
            return Err(DepthError::stride_too_small(self.step, min_step));
        }
        let required = self.step as usize * self.height as usize;
        if self.data.len() < required {
            return Err(DepthError::buffer_mismatch(required, self.data.len()));
        }
        Ok(())
    }

    /// Reads the sample at `(u, v)`.
    ///
    /// Returns `None` out of bounds. The read honors the row stride and
    /// does not require the buffer to be aligned for the sample type.
    #[must_use]
    pub fn get<C: DepthCodec>(&self, u: u32, v: u32) -> Option<C::Sample> {
        if u >= self.width || v >= self.height {
            return None;
        }
        let size = size_of::<C::Sample>();
        let offset = v as usize * self.step as usize + u as usize * size;
        let bytes = self.data.get(offset..offset + size)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    /// Returns the metric depth at `(u, v)`, or `None` if out of bounds or
    /// the sample is the "unknown" sentinel.
    #[must_use]
    pub fn depth_at<C: DepthCodec>(&self, u: u32, v: u32) -> Option<f64> {
        let sample = self.get::<C>(u, v)?;
        C::valid(sample).then(|| C::to_meters(sample))
    }

    /// Counts samples carrying a measurement.
    #[must_use]
    pub fn valid_count<C: DepthCodec>(&self) -> usize {
        let mut count = 0;
        for v in 0..self.height {
            for u in 0..self.width {
                if self.get::<C>(u, v).is_some_and(C::valid) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Collects all samples into a packed row-major vector.
    #[must_use]
    pub fn to_samples<C: DepthCodec>(&self) -> Vec<C::Sample> {
        let mut samples = Vec::with_capacity(self.width as usize * self.height as usize);
        for v in 0..self.height {
            for u in 0..self.width {
                if let Some(sample) = self.get::<C>(u, v) {
                    samples.push(sample);
                }
            }
        }
        samples
    }
}
