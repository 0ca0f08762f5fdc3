//! Camera and depth-image value types for depth registration.
//!
//! This crate provides the foundational types consumed by `depth-register`:
//!
//! - [`CameraInfo`] / [`PinholeModel`] - per-frame calibration and the
//!   binning/ROI-aware pinhole model derived from it
//! - [`DepthFrame`] - structured depth image with an explicit row stride
//! - [`DepthCodec`] / [`Fixed16`] / [`Float32`] - the two on-wire depth
//!   sample formats with their incompatible "unknown" sentinels
//! - [`IntensityFrame`] / [`ColorFrame`] - companion images for attaching
//!   per-point attributes
//! - [`PointCloud`] / [`CloudPoint`] - projection output
//! - [`Timestamp`] / [`TimeDelta`] / [`FrameId`] - timing and frame naming
//!
//! # Layer 0 Crate
//!
//! No transport, no async runtime, no linear-algebra stack: these are plain
//! value types usable from drivers, pipelines, tests and offline tools.
//! All of them are frame-scoped - constructed fresh per camera frame and
//! discarded after the derived output is emitted.
//!
//! # Example
//!
//! ```
//! use depth_types::{CameraInfo, DepthFrame, Fixed16, FrameId, PinholeModel, Timestamp};
//!
//! let info = CameraInfo::ideal(525.0, 640, 480, FrameId::new("depth_optical"));
//! let model = PinholeModel::from_camera_info(&info).unwrap();
//!
//! let frame = DepthFrame::from_samples::<Fixed16>(
//!     Timestamp::zero(),
//!     FrameId::new("depth_optical"),
//!     1,
//!     1,
//!     vec![1000],
//! )
//! .unwrap();
//!
//! let depth = frame.depth_at::<Fixed16>(0, 0).unwrap();
//! let point = model.unproject(0.0, 0.0, depth);
//! assert!((point[2] - 1.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod camera;
mod cloud;
mod codec;
mod depth;
mod error;
mod frame_id;
mod image;
mod time;

pub use camera::{CameraInfo, PinholeModel, RegionOfInterest};
pub use cloud::{CloudPoint, PointCloud};
pub use codec::{DepthCodec, DepthEncoding, FIXED16_METERS_PER_UNIT, Fixed16, Float32};
pub use depth::DepthFrame;
pub use error::DepthError;
pub use frame_id::FrameId;
pub use image::{ColorFrame, IntensityFrame};
pub use time::{TimeDelta, Timestamp};
