//! Rigid transforms between camera optical frames.

use glam::{DMat4, DQuat, DVec3};

/// A rigid body transform (rotation + translation) in double precision.
///
/// For registration this maps points expressed in the depth camera's
/// optical frame into the target camera's optical frame. Extrinsics may be
/// dynamic, so a transform is resolved fresh for every frame and never
/// cached.
///
/// # Example
///
/// ```
/// use depth_register::RigidTransform;
/// use glam::DVec3;
///
/// let t = RigidTransform::from_translation(DVec3::new(0.05, 0.0, 0.0));
/// let p = t.apply_point(DVec3::new(0.0, 0.0, 1.0));
/// assert!((p.x - 0.05).abs() < 1e-12);
/// assert!((p.z - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation component.
    pub rotation: DQuat,
    /// Translation component in meters.
    pub translation: DVec3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            translation: DVec3::ZERO,
        }
    }

    /// Creates a transform from rotation and translation.
    #[must_use]
    pub const fn new(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates a pure translation.
    #[must_use]
    pub const fn from_translation(translation: DVec3) -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            translation,
        }
    }

    /// Creates a pure rotation.
    #[must_use]
    pub const fn from_rotation(rotation: DQuat) -> Self {
        Self {
            rotation,
            translation: DVec3::ZERO,
        }
    }

    /// Extracts rotation and translation from a 4x4 homogeneous matrix.
    #[must_use]
    pub fn from_matrix(mat: DMat4) -> Self {
        let (_, rotation, translation) = mat.to_scale_rotation_translation();
        Self {
            rotation,
            translation,
        }
    }

    /// Converts the transform to a 4x4 homogeneous matrix.
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.translation)
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn apply_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Returns the inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            rotation: inv_rotation,
            translation: inv_rotation * (-self.translation),
        }
    }

    /// Composes this transform with another; the result applies `other`
    /// first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Checks whether this is approximately the identity transform.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.rotation - DQuat::IDENTITY).length() < epsilon
            && self.translation.length() < epsilon
    }
}
