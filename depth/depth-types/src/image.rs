//! Companion image frames carried alongside depth.
//!
//! Point-cloud projection can attach a per-pixel intensity or color to
//! every 3D point. These frames are expected to be co-registered with the
//! depth image (same resolution and pixel alignment); the synchronization
//! layer is responsible for delivering matching pairs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DepthError, FrameId, Timestamp};

/// A single-channel float intensity image, row-major.
///
/// # Example
///
/// ```
/// use depth_types::{FrameId, IntensityFrame, Timestamp};
///
/// let frame = IntensityFrame::from_values(
///     Timestamp::zero(),
///     FrameId::new("ir_optical"),
///     2,
///     1,
///     vec![0.25, 0.75],
/// )
/// .unwrap();
/// assert_eq!(frame.get(1, 0), Some(0.75));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntensityFrame {
    /// Capture time.
    pub timestamp: Timestamp,
    /// Optical frame of the imaging camera.
    pub frame: FrameId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Per-pixel intensity values.
    pub values: Vec<f32>,
}

impl IntensityFrame {
    /// Creates a frame from row-major values.
    ///
    /// # Errors
    ///
    /// [`DepthError::BufferSizeMismatch`] if `values.len() != width * height`.
    pub fn from_values(
        timestamp: Timestamp,
        frame: FrameId,
        width: u32,
        height: u32,
        values: Vec<f32>,
    ) -> Result<Self, DepthError> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(DepthError::buffer_mismatch(expected, values.len()));
        }
        Ok(Self {
            timestamp,
            frame,
            width,
            height,
            values,
        })
    }

    /// Reads the intensity at `(u, v)`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, u: u32, v: u32) -> Option<f32> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.values.get((v * self.width + u) as usize).copied()
    }
}

/// A packed RGB8 color image, row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorFrame {
    /// Capture time.
    pub timestamp: Timestamp,
    /// Optical frame of the imaging camera.
    pub frame: FrameId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved `r, g, b` bytes, 3 per pixel.
    pub data: Vec<u8>,
}

impl ColorFrame {
    /// Creates a frame from interleaved RGB bytes.
    ///
    /// # Errors
    ///
    /// [`DepthError::BufferSizeMismatch`] if `data.len() != width * height * 3`.
    pub fn from_rgb(
        timestamp: Timestamp,
        frame: FrameId,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<Self, DepthError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(DepthError::buffer_mismatch(expected, data.len()));
        }
        Ok(Self {
            timestamp,
            frame,
            width,
            height,
            data,
        })
    }

    /// Reads the `[r, g, b]` triple at `(u, v)`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, u: u32, v: u32) -> Option<[u8; 3]> {
        if u >= self.width || v >= self.height {
            return None;
        }
        let offset = (v * self.width + u) as usize * 3;
        let bytes = self.data.get(offset..offset + 3)?;
        Some([bytes[0], bytes[1], bytes[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_length_checked() {
        let bad = IntensityFrame::from_values(
            Timestamp::zero(),
            FrameId::new("ir"),
            2,
            2,
            vec![1.0; 3],
        );
        assert!(bad.is_err());
    }

    #[test]
    fn intensity_get() {
        let frame = IntensityFrame::from_values(
            Timestamp::zero(),
            FrameId::new("ir"),
            2,
            2,
            vec![0.0, 0.1, 0.2, 0.3],
        )
        .unwrap();
        assert_eq!(frame.get(0, 1), Some(0.2));
        assert!(frame.get(2, 0).is_none());
    }

    #[test]
    fn color_get() {
        let frame = ColorFrame::from_rgb(
            Timestamp::zero(),
            FrameId::new("rgb"),
            2,
            1,
            vec![1, 2, 3, 4, 5, 6],
        )
        .unwrap();
        assert_eq!(frame.get(1, 0), Some([4, 5, 6]));
        assert!(frame.get(0, 1).is_none());
    }

    #[test]
    fn color_length_checked() {
        let bad = ColorFrame::from_rgb(Timestamp::zero(), FrameId::new("rgb"), 2, 1, vec![0; 5]);
        assert!(bad.is_err());
    }
}
