//! Frame-drop pipeline wiring for per-frame registration.
//!
//! Streams keep flowing when a single capture is unusable: a malformed
//! calibration record, a failed pose lookup or an inconsistent buffer logs
//! an error and drops that frame. Nothing here is fatal; the next capture
//! gets a fresh attempt with freshly rebuilt camera models.

use depth_types::{
    CameraInfo, ColorFrame, DepthFrame, IntensityFrame, PinholeModel, PointCloud,
};
use tracing::{debug, error};

use crate::cloud::{depth_to_cloud, depth_to_cloud_with_color, depth_to_cloud_with_intensity};
use crate::pose::PoseResolver;
use crate::register::{RegisterPolicy, register_depth};

/// A registered depth image together with the calibration describing its new
/// grid.
///
/// The calibration is the target camera's, restamped with the depth capture
/// time so downstream consumers see one coherent capture instant.
#[derive(Debug, Clone)]
pub struct RegisteredDepth {
    /// Depth resampled onto the target camera's grid.
    pub image: DepthFrame,
    /// Calibration for the target grid at the depth capture time.
    pub info: CameraInfo,
}

/// Per-frame registration driver.
///
/// # Example
///
/// ```
/// use depth_register::{
///     RegisterPipeline, RegisterPolicy, RigidTransform, StaticPoseResolver,
/// };
/// use depth_types::{CameraInfo, DepthFrame, Fixed16, FrameId, Timestamp};
///
/// let mut resolver = StaticPoseResolver::new();
/// resolver.insert(
///     FrameId::new("rgb_optical"),
///     FrameId::new("depth_optical"),
///     RigidTransform::identity(),
/// );
/// let pipeline = RegisterPipeline::new(resolver, RegisterPolicy::PointSample);
///
/// let depth_info = CameraInfo::ideal(100.0, 4, 4, FrameId::new("depth_optical"));
/// let target_info = CameraInfo::ideal(100.0, 4, 4, FrameId::new("rgb_optical"));
/// let depth = DepthFrame::from_samples::<Fixed16>(
///     Timestamp::from_nanos(5),
///     FrameId::new("depth_optical"),
///     4,
///     4,
///     vec![1000; 16],
/// )
/// .unwrap();
///
/// let registered = pipeline.process(&depth, &depth_info, &target_info).unwrap();
/// assert_eq!(registered.info.timestamp, depth.timestamp);
/// ```
#[derive(Debug)]
pub struct RegisterPipeline<R: PoseResolver> {
    resolver: R,
    policy: RegisterPolicy,
}

impl<R: PoseResolver> RegisterPipeline<R> {
    /// Creates a pipeline over a pose source and a footprint policy.
    #[must_use]
    pub const fn new(resolver: R, policy: RegisterPolicy) -> Self {
        Self { resolver, policy }
    }

    /// Returns the footprint policy.
    #[must_use]
    pub const fn policy(&self) -> RegisterPolicy {
        self.policy
    }

    /// Returns the pose resolver.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Registers one depth capture into the target camera's grid.
    ///
    /// Returns `None` and logs when the capture is dropped: malformed
    /// calibration on either camera, unknown pose between the two optical
    /// frames at the capture time, or an inconsistent depth buffer.
    ///
    /// The pose is looked up for the frame named in the depth calibration
    /// record, not the one stamped on the image; the record is the
    /// authoritative description of the camera.
    pub fn process(
        &self,
        depth: &DepthFrame,
        depth_info: &CameraInfo,
        target_info: &CameraInfo,
    ) -> Option<RegisteredDepth> {
        let depth_model = build_model(depth_info)?;
        let target_model = build_model(target_info)?;

        let depth_to_target = match self.resolver.resolve(
            &target_info.frame,
            &depth_info.frame,
            depth.timestamp,
        ) {
            Ok(pose) => pose,
            Err(err) => {
                error!(
                    target_frame = %target_info.frame,
                    source_frame = %depth_info.frame,
                    %err,
                    "dropping frame: pose unavailable"
                );
                return None;
            }
        };

        let image = match register_depth(depth, &depth_model, &target_model, &depth_to_target, self.policy) {
            Ok(image) => image,
            Err(err) => {
                error!(%err, "dropping frame: registration failed");
                return None;
            }
        };
        debug!(
            timestamp = depth.timestamp.as_nanos(),
            encoding = %depth.encoding,
            "registered depth frame"
        );

        let mut info = target_info.clone();
        info.timestamp = depth.timestamp;
        Some(RegisteredDepth { image, info })
    }
}

/// Projects a depth capture to a point cloud, dropping it on any error.
#[must_use]
pub fn process_cloud_xyz(depth: &DepthFrame, info: &CameraInfo) -> Option<PointCloud> {
    let model = build_model(info)?;
    match depth_to_cloud(depth, &model) {
        Ok(cloud) => Some(cloud),
        Err(err) => {
            error!(%err, "dropping frame: cloud projection failed");
            None
        }
    }
}

/// Projects a depth capture with per-point intensity, dropping it on any
/// error including a depth/intensity resolution mismatch.
#[must_use]
pub fn process_cloud_xyzi(
    depth: &DepthFrame,
    intensity: &IntensityFrame,
    info: &CameraInfo,
) -> Option<PointCloud> {
    let model = build_model(info)?;
    match depth_to_cloud_with_intensity(depth, intensity, &model) {
        Ok(cloud) => Some(cloud),
        Err(err) => {
            error!(%err, "dropping frame: intensity cloud projection failed");
            None
        }
    }
}

/// Projects a depth capture with per-point color, dropping it on any error
/// including a depth/color resolution mismatch.
#[must_use]
pub fn process_cloud_xyzrgb(
    depth: &DepthFrame,
    color: &ColorFrame,
    info: &CameraInfo,
) -> Option<PointCloud> {
    let model = build_model(info)?;
    match depth_to_cloud_with_color(depth, color, &model) {
        Ok(cloud) => Some(cloud),
        Err(err) => {
            error!(%err, "dropping frame: color cloud projection failed");
            None
        }
    }
}

fn build_model(info: &CameraInfo) -> Option<PinholeModel> {
    match PinholeModel::from_camera_info(info) {
        Ok(model) => Some(model),
        Err(err) => {
            error!(frame = %info.frame, %err, "dropping frame: malformed calibration");
            None
        }
    }
}
