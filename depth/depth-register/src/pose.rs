//! Lookup of rigid poses between named camera frames.

use std::collections::HashMap;

use depth_types::{FrameId, Timestamp};

use crate::error::{RegisterError, Result};
use crate::transform::RigidTransform;

/// Source of rigid transforms between named frames at a point in time.
///
/// Registration asks for the pose of the depth camera's optical frame in
/// the target camera's optical frame at the depth frame's capture time. A
/// resolver backed by a live transform graph can interpolate; the static
/// resolver here serves rigidly mounted camera pairs.
pub trait PoseResolver {
    /// Returns the transform taking points in `source` coordinates to
    /// `target` coordinates at time `at`.
    ///
    /// # Errors
    ///
    /// [`RegisterError::PoseLookup`] if the pose is unknown at that time.
    fn resolve(&self, target: &FrameId, source: &FrameId, at: Timestamp) -> Result<RigidTransform>;
}

/// Pose resolver for rigidly mounted cameras.
///
/// Holds a table of fixed transforms keyed by `(target, source)`. A lookup
/// that misses falls back to the reverse key and inverts, so each pair only
/// needs to be inserted once.
///
/// # Example
///
/// ```
/// use depth_register::{PoseResolver, RigidTransform, StaticPoseResolver};
/// use depth_types::{FrameId, Timestamp};
/// use glam::DVec3;
///
/// let mut resolver = StaticPoseResolver::new();
/// resolver.insert(
///     FrameId::new("rgb_optical"),
///     FrameId::new("depth_optical"),
///     RigidTransform::from_translation(DVec3::new(0.025, 0.0, 0.0)),
/// );
///
/// let pose = resolver
///     .resolve(
///         &FrameId::new("rgb_optical"),
///         &FrameId::new("depth_optical"),
///         Timestamp::zero(),
///     )
///     .unwrap();
/// assert!((pose.translation.x - 0.025).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPoseResolver {
    poses: HashMap<(FrameId, FrameId), RigidTransform>,
}

impl StaticPoseResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the transform taking `source` coordinates to `target`
    /// coordinates, replacing any previous entry for the pair.
    pub fn insert(&mut self, target: FrameId, source: FrameId, pose: RigidTransform) {
        self.poses.insert((target, source), pose);
    }

    /// Number of registered frame pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns true if no pairs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl PoseResolver for StaticPoseResolver {
    fn resolve(&self, target: &FrameId, source: &FrameId, _at: Timestamp) -> Result<RigidTransform> {
        if target == source {
            return Ok(RigidTransform::identity());
        }
        if let Some(pose) = self.poses.get(&(target.clone(), source.clone())) {
            return Ok(*pose);
        }
        if let Some(pose) = self.poses.get(&(source.clone(), target.clone())) {
            return Ok(pose.inverse());
        }
        Err(RegisterError::pose_lookup(
            target.as_str(),
            source.as_str(),
            "no transform registered for this frame pair",
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn frame(name: &str) -> FrameId {
        FrameId::new(name)
    }

    #[test]
    fn identical_frames_resolve_to_identity() {
        let resolver = StaticPoseResolver::new();
        let pose = resolver
            .resolve(&frame("cam"), &frame("cam"), Timestamp::zero())
            .unwrap();
        assert!(pose.is_identity(1e-12));
    }

    #[test]
    fn forward_lookup_returns_registered_pose() {
        let mut resolver = StaticPoseResolver::new();
        resolver.insert(
            frame("rgb"),
            frame("depth"),
            RigidTransform::from_translation(DVec3::new(0.05, 0.0, 0.0)),
        );

        let pose = resolver
            .resolve(&frame("rgb"), &frame("depth"), Timestamp::zero())
            .unwrap();
        assert!((pose.translation.x - 0.05).abs() < 1e-12);
    }

    #[test]
    fn reverse_lookup_inverts() {
        let mut resolver = StaticPoseResolver::new();
        resolver.insert(
            frame("rgb"),
            frame("depth"),
            RigidTransform::from_translation(DVec3::new(0.05, 0.0, 0.0)),
        );

        let pose = resolver
            .resolve(&frame("depth"), &frame("rgb"), Timestamp::zero())
            .unwrap();
        assert!((pose.translation.x + 0.05).abs() < 1e-12);
    }

    #[test]
    fn unknown_pair_is_an_error() {
        let resolver = StaticPoseResolver::new();
        let result = resolver.resolve(&frame("rgb"), &frame("lidar"), Timestamp::zero());
        assert!(matches!(result, Err(RegisterError::PoseLookup { .. })));
    }
}
