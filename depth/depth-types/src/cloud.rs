//! Point-cloud types produced from depth images.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{FrameId, Timestamp};

/// A single 3D point with optional per-point attributes.
///
/// # Example
///
/// ```
/// use depth_types::CloudPoint;
///
/// let point = CloudPoint::with_color([0.0, 0.0, 1.5], [200, 64, 32]);
/// assert!(point.is_valid());
/// assert_eq!(point.color, Some([200, 64, 32]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CloudPoint {
    /// Position in meters, `[x, y, z]`, in the cloud's frame.
    pub position: [f64; 3],
    /// Intensity attribute, if the source had one.
    pub intensity: Option<f32>,
    /// RGB color attribute, if the source had one.
    pub color: Option<[u8; 3]>,
}

impl CloudPoint {
    /// Creates a bare XYZ point.
    #[must_use]
    pub const fn new(position: [f64; 3]) -> Self {
        Self {
            position,
            intensity: None,
            color: None,
        }
    }

    /// Creates a point carrying an intensity value.
    #[must_use]
    pub const fn with_intensity(position: [f64; 3], intensity: f32) -> Self {
        Self {
            position,
            intensity: Some(intensity),
            color: None,
        }
    }

    /// Creates a point carrying an RGB color.
    #[must_use]
    pub const fn with_color(position: [f64; 3], color: [u8; 3]) -> Self {
        Self {
            position,
            intensity: None,
            color: Some(color),
        }
    }

    /// Checks that the position is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
    }
}

/// An ordered sequence of 3D points derived from one depth frame.
///
/// Points appear in raster order of the source image, one per valid depth
/// pixel; consumers decide whether to treat the sequence as organized.
///
/// # Example
///
/// ```
/// use depth_types::{CloudPoint, FrameId, PointCloud, Timestamp};
///
/// let mut cloud = PointCloud::new(Timestamp::zero(), FrameId::new("depth_optical"));
/// cloud.points.push(CloudPoint::new([0.0, 0.0, 1.0]));
/// assert_eq!(cloud.point_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointCloud {
    /// Capture time of the source depth frame.
    pub timestamp: Timestamp,
    /// Optical frame the points are expressed in.
    pub frame: FrameId,
    /// The points, in source raster order.
    pub points: Vec<CloudPoint>,
}

impl PointCloud {
    /// Creates an empty cloud.
    #[must_use]
    pub const fn new(timestamp: Timestamp, frame: FrameId) -> Self {
        Self {
            timestamp,
            frame,
            points: Vec::new(),
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Checks if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Counts points with a finite position.
    #[must_use]
    pub fn valid_point_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_valid()).count()
    }

    /// Returns all positions as a flat vector.
    #[must_use]
    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.points.iter().map(|p| p.position).collect()
    }
}
