//! Depth registration and point cloud projection.
//!
//! This crate turns raw depth captures into data aligned with a second
//! camera:
//!
//! # Registration
//!
//! - [`register_depth`] - Reprojects a depth frame into another camera's grid
//! - [`RegisterPolicy`] - Point sampling or hole-filling splats
//! - [`RegisterPipeline`] - Frame-drop driver over a pose source
//!
//! # Point Clouds
//!
//! - [`depth_to_cloud`] - Metric points from a depth frame
//! - [`depth_to_cloud_with_intensity`] / [`depth_to_cloud_with_color`] -
//!   Points with per-pixel attributes
//!
//! # Poses and Synchronization
//!
//! - [`RigidTransform`] - Rotation + translation between optical frames
//! - [`PoseResolver`] / [`StaticPoseResolver`] - Pose lookup at capture time
//! - [`PairSynchronizer`] / [`FrameSynchronizer`] - Timestamp pairing of
//!   independent streams
//!
//! # Example
//!
//! ```
//! use depth_register::{RegisterPolicy, RigidTransform, register_depth};
//! use depth_types::{CameraInfo, DepthFrame, Fixed16, FrameId, PinholeModel, Timestamp};
//!
//! let depth_info = CameraInfo::ideal(400.0, 32, 32, FrameId::new("depth_optical"));
//! let rgb_info = CameraInfo::ideal(400.0, 32, 32, FrameId::new("rgb_optical"));
//! let depth_model = PinholeModel::from_camera_info(&depth_info).unwrap();
//! let rgb_model = PinholeModel::from_camera_info(&rgb_info).unwrap();
//!
//! let depth = DepthFrame::from_samples::<Fixed16>(
//!     Timestamp::zero(),
//!     FrameId::new("depth_optical"),
//!     32,
//!     32,
//!     vec![1500; 32 * 32],
//! )
//! .unwrap();
//!
//! let registered = register_depth(
//!     &depth,
//!     &depth_model,
//!     &rgb_model,
//!     &RigidTransform::identity(),
//!     RegisterPolicy::PointSample,
//! )
//! .unwrap();
//! assert_eq!(registered.width, 32);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cloud;
mod error;
mod pipeline;
mod pose;
mod register;
mod sync;
mod transform;

// Re-export registration types
pub use register::{RegisterPolicy, register_depth};

// Re-export cloud projection
pub use cloud::{depth_to_cloud, depth_to_cloud_with_color, depth_to_cloud_with_intensity};

// Re-export pipeline types
pub use pipeline::{
    RegisterPipeline, RegisteredDepth, process_cloud_xyz, process_cloud_xyzi, process_cloud_xyzrgb,
};

// Re-export pose types
pub use pose::{PoseResolver, StaticPoseResolver};

// Re-export synchronization types
pub use sync::{FrameSynchronizer, PairSynchronizer, Stamped, SyncPolicy};

// Re-export transform types
pub use transform::RigidTransform;

// Re-export error types
pub use error::{RegisterError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        FrameSynchronizer, PairSynchronizer, PoseResolver, RegisterError, RegisterPipeline,
        RegisterPolicy, RegisteredDepth, RigidTransform, Stamped, StaticPoseResolver, SyncPolicy,
        depth_to_cloud, depth_to_cloud_with_color, depth_to_cloud_with_intensity,
        process_cloud_xyz, process_cloud_xyzi, process_cloud_xyzrgb, register_depth,
    };
}
