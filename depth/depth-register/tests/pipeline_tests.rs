//! End-to-end tests for the registration pipeline.
//!
//! These drive the public surface the way a capture loop would: pair
//! incoming frames with calibration records, register onto the color
//! camera's grid, then project colored clouds from the result.
//!
//! Run with: cargo test -p depth-register --test pipeline_tests

use depth_register::{
    PairSynchronizer, RegisterPipeline, RegisterPolicy, RigidTransform, StaticPoseResolver,
    SyncPolicy, process_cloud_xyzrgb,
};
use depth_types::{
    CameraInfo, ColorFrame, DepthFrame, Fixed16, FrameId, TimeDelta, Timestamp,
};
use glam::DVec3;

// =============================================================================
// Fixtures
// =============================================================================

const DEPTH_FRAME_ID: &str = "depth_optical";
const RGB_FRAME_ID: &str = "rgb_optical";

fn depth_info(stamp: u64) -> CameraInfo {
    let mut info = CameraInfo::ideal(100.0, 8, 8, FrameId::new(DEPTH_FRAME_ID));
    info.timestamp = Timestamp::from_nanos(stamp);
    info
}

fn rgb_info(stamp: u64) -> CameraInfo {
    let mut info = CameraInfo::ideal(100.0, 8, 8, FrameId::new(RGB_FRAME_ID));
    info.timestamp = Timestamp::from_nanos(stamp);
    info
}

fn flat_depth(stamp: u64, units: u16) -> DepthFrame {
    DepthFrame::from_samples::<Fixed16>(
        Timestamp::from_nanos(stamp),
        FrameId::new(DEPTH_FRAME_ID),
        8,
        8,
        vec![units; 64],
    )
    .unwrap()
}

fn pipeline(pose: RigidTransform) -> RegisterPipeline<StaticPoseResolver> {
    let mut resolver = StaticPoseResolver::new();
    resolver.insert(FrameId::new(RGB_FRAME_ID), FrameId::new(DEPTH_FRAME_ID), pose);
    RegisterPipeline::new(resolver, RegisterPolicy::PointSample)
}

// =============================================================================
// Registration end to end
// =============================================================================

#[test]
fn registered_frame_lands_on_target_grid() {
    let pipeline = pipeline(RigidTransform::identity());
    let registered = pipeline
        .process(&flat_depth(100, 2000), &depth_info(100), &rgb_info(100))
        .unwrap();

    assert_eq!(registered.image.width, 8);
    assert_eq!(registered.image.height, 8);
    assert_eq!(registered.image.frame.as_str(), RGB_FRAME_ID);
    assert_eq!(registered.image.valid_count::<Fixed16>(), 64);
    assert_eq!(registered.info.timestamp, Timestamp::from_nanos(100));
}

#[test]
fn baseline_offset_shifts_but_keeps_depth() {
    // 5 cm stereo baseline along X, as on an RGB-D module.
    let pipeline = pipeline(RigidTransform::from_translation(DVec3::new(0.05, 0.0, 0.0)));
    let registered = pipeline
        .process(&flat_depth(100, 2000), &depth_info(100), &rgb_info(100))
        .unwrap();

    let samples: Vec<u16> = registered
        .image
        .to_samples::<Fixed16>()
        .into_iter()
        .filter(|&s| s != 0)
        .collect();
    assert!(!samples.is_empty());
    // A pure translation orthogonal to the optical axis never changes Z.
    assert!(samples.iter().all(|&s| s == 2000));
}

#[test]
fn missing_pose_drops_instead_of_failing() {
    let pipeline =
        RegisterPipeline::new(StaticPoseResolver::new(), RegisterPolicy::PointSample);
    assert!(pipeline
        .process(&flat_depth(100, 2000), &depth_info(100), &rgb_info(100))
        .is_none());
}

#[test]
fn hole_filling_covers_an_upsampled_grid() {
    let mut resolver = StaticPoseResolver::new();
    resolver.insert(
        FrameId::new(RGB_FRAME_ID),
        FrameId::new(DEPTH_FRAME_ID),
        RigidTransform::identity(),
    );
    let sparse = RegisterPipeline::new(resolver.clone(), RegisterPolicy::PointSample);
    let dense = RegisterPipeline::new(resolver, RegisterPolicy::FillHoles);

    // Target with twice the focal length and resolution of the source.
    let mut target = CameraInfo::ideal(200.0, 16, 16, FrameId::new(RGB_FRAME_ID));
    target.timestamp = Timestamp::from_nanos(100);

    let depth = flat_depth(100, 1500);
    let sparse_count = sparse
        .process(&depth, &depth_info(100), &target)
        .unwrap()
        .image
        .valid_count::<Fixed16>();
    let dense_count = dense
        .process(&depth, &depth_info(100), &target)
        .unwrap()
        .image
        .valid_count::<Fixed16>();
    assert!(dense_count > sparse_count);
}

// =============================================================================
// Synchronization feeding registration
// =============================================================================

#[test]
fn synchronized_pair_drives_the_pipeline() {
    let mut sync = PairSynchronizer::<DepthFrame, CameraInfo>::new(
        SyncPolicy::approximate(TimeDelta::from_millis(5)),
        16,
    );
    let pipeline = pipeline(RigidTransform::identity());

    // Depth arrives slightly ahead of its calibration record.
    assert!(sync.push_a(flat_depth(1_000_000, 2000)).is_none());
    let (depth, info) = sync.push_b(depth_info(1_200_000)).unwrap();

    let registered = pipeline
        .process(&depth, &info, &rgb_info(1_000_000))
        .unwrap();
    assert_eq!(registered.image.timestamp, depth.timestamp);
}

// =============================================================================
// Colored clouds from registered depth
// =============================================================================

#[test]
fn registered_depth_projects_a_colored_cloud() {
    let pipeline = pipeline(RigidTransform::identity());
    let registered = pipeline
        .process(&flat_depth(100, 2000), &depth_info(100), &rgb_info(100))
        .unwrap();

    let color = ColorFrame::from_rgb(
        Timestamp::from_nanos(100),
        FrameId::new(RGB_FRAME_ID),
        8,
        8,
        vec![200; 8 * 8 * 3],
    )
    .unwrap();

    let cloud = process_cloud_xyzrgb(&registered.image, &color, &registered.info).unwrap();
    assert_eq!(cloud.point_count(), 64);
    assert_eq!(cloud.frame.as_str(), RGB_FRAME_ID);
    assert!(cloud.points.iter().all(|p| p.color == Some([200, 200, 200])));
    assert!(cloud
        .points
        .iter()
        .all(|p| (p.position[2] - 2.0).abs() < 1e-9));
}
