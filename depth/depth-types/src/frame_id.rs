//! Named coordinate frames.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a camera optical frame.
///
/// Depth images, camera-info records and point clouds all name the optical
/// frame they are expressed in. Pose resolution maps points between two
/// named frames.
///
/// # Example
///
/// ```
/// use depth_types::FrameId;
///
/// let depth = FrameId::new("depth_optical");
/// let rgb = FrameId::new("rgb_optical");
/// assert_ne!(depth, rgb);
/// assert_eq!(depth.as_str(), "depth_optical");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameId(String);

impl FrameId {
    /// Creates a frame identifier from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the frame name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
