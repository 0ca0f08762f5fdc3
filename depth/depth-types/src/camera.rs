//! Camera calibration records and the pinhole camera model.
//!
//! [`CameraInfo`] is the per-frame calibration message as it arrives from a
//! driver: full-sensor intrinsics plus the binning and region-of-interest
//! readout settings of the capture. [`PinholeModel`] is the derived value
//! type the projection math runs on, with binning and ROI already folded
//! into the effective focal lengths and principal point.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DepthError, FrameId, Timestamp};

/// Sensor readout window, in full-resolution pixels.
///
/// An all-zero ROI (the default) means the full sensor area. A zero width
/// or height likewise falls back to the full sensor dimension, matching
/// common camera-driver conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionOfInterest {
    /// Leftmost column of the window.
    pub x_offset: u32,
    /// Topmost row of the window.
    pub y_offset: u32,
    /// Window width; 0 means full width.
    pub width: u32,
    /// Window height; 0 means full height.
    pub height: u32,
}

impl RegionOfInterest {
    /// The full-sensor ROI.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            x_offset: 0,
            y_offset: 0,
            width: 0,
            height: 0,
        }
    }
}

/// Per-frame camera calibration record.
///
/// Intrinsics are expressed for the full sensor resolution; `binning_*`
/// and `roi` describe how the attached image was actually read out.
/// `tx`/`ty` are the projection-matrix baseline terms in meter·pixels
/// (non-zero for the right camera of a stereo pair).
///
/// # Example
///
/// ```
/// use depth_types::{CameraInfo, FrameId, Timestamp};
///
/// let info = CameraInfo::ideal(500.0, 640, 480, FrameId::new("rgb_optical"));
/// assert!((info.cx - 320.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraInfo {
    /// Capture time of the frame this calibration accompanies.
    pub timestamp: Timestamp,
    /// Optical frame the camera images in.
    pub frame: FrameId,
    /// Full sensor width in pixels.
    pub width: u32,
    /// Full sensor height in pixels.
    pub height: u32,
    /// Focal length in pixels (x direction).
    pub fx: f64,
    /// Focal length in pixels (y direction).
    pub fy: f64,
    /// Principal point x-coordinate in pixels.
    pub cx: f64,
    /// Principal point y-coordinate in pixels.
    pub cy: f64,
    /// Baseline term in meter·pixels (x direction).
    pub tx: f64,
    /// Baseline term in meter·pixels (y direction).
    pub ty: f64,
    /// Horizontal binning factor; 0 or 1 means no binning.
    pub binning_x: u32,
    /// Vertical binning factor; 0 or 1 means no binning.
    pub binning_y: u32,
    /// Readout window.
    pub roi: RegionOfInterest,
}

impl CameraInfo {
    /// Creates a calibration for an ideal unbinned pinhole camera with the
    /// principal point at the image center and no baseline offset.
    #[must_use]
    pub fn ideal(focal_length: f64, width: u32, height: u32, frame: FrameId) -> Self {
        Self {
            timestamp: Timestamp::zero(),
            frame,
            width,
            height,
            fx: focal_length,
            fy: focal_length,
            cx: f64::from(width) / 2.0,
            cy: f64::from(height) / 2.0,
            tx: 0.0,
            ty: 0.0,
            binning_x: 1,
            binning_y: 1,
            roi: RegionOfInterest::full(),
        }
    }
}

/// Pinhole camera model with binning and ROI folded in.
///
/// Derived from a [`CameraInfo`] record via [`PinholeModel::from_camera_info`]
/// and immutable afterwards. Rebuilt from the latest record every frame;
/// never cached across frames, so stale-calibration bugs cannot occur when
/// records arrive out of order.
///
/// # Projection math
///
/// Unprojection of a pixel `(u, v)` with metric depth `d`:
///
/// ```text
/// X = ((u - cx) * d - tx) / fx
/// Y = ((v - cy) * d - ty) / fy
/// Z = d
/// ```
///
/// Projection of a camera-frame point `(X, Y, Z)`:
///
/// ```text
/// u = (fx * X + tx) / Z + cx
/// v = (fy * Y + ty) / Z + cy
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PinholeModel {
    frame: FrameId,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    tx: f64,
    ty: f64,
    reduced_width: u32,
    reduced_height: u32,
}

impl PinholeModel {
    /// Builds the model from a calibration record.
    ///
    /// Fails only on malformed records: non-finite or non-positive focal
    /// lengths, or a zero sensor resolution. ROI offsets shift the
    /// principal point, then binning divides all linear terms.
    ///
    /// # Errors
    ///
    /// [`DepthError::InvalidIntrinsics`] or [`DepthError::ZeroResolution`].
    pub fn from_camera_info(info: &CameraInfo) -> Result<Self, DepthError> {
        if !(info.fx.is_finite() && info.fy.is_finite() && info.fx > 0.0 && info.fy > 0.0) {
            return Err(DepthError::invalid_intrinsics(info.fx, info.fy));
        }
        if info.width == 0 || info.height == 0 {
            return Err(DepthError::zero_resolution(info.width, info.height));
        }

        let binning_x = info.binning_x.max(1);
        let binning_y = info.binning_y.max(1);
        let roi_width = if info.roi.width == 0 {
            info.width
        } else {
            info.roi.width
        };
        let roi_height = if info.roi.height == 0 {
            info.height
        } else {
            info.roi.height
        };

        let bx = f64::from(binning_x);
        let by = f64::from(binning_y);
        Ok(Self {
            frame: info.frame.clone(),
            fx: info.fx / bx,
            fy: info.fy / by,
            cx: (info.cx - f64::from(info.roi.x_offset)) / bx,
            cy: (info.cy - f64::from(info.roi.y_offset)) / by,
            tx: info.tx / bx,
            ty: info.ty / by,
            reduced_width: roi_width / binning_x,
            reduced_height: roi_height / binning_y,
        })
    }

    /// Optical frame of the camera.
    #[must_use]
    pub const fn frame(&self) -> &FrameId {
        &self.frame
    }

    /// Effective focal length in pixels (x direction).
    #[must_use]
    pub const fn fx(&self) -> f64 {
        self.fx
    }

    /// Effective focal length in pixels (y direction).
    #[must_use]
    pub const fn fy(&self) -> f64 {
        self.fy
    }

    /// Effective principal point x-coordinate.
    #[must_use]
    pub const fn cx(&self) -> f64 {
        self.cx
    }

    /// Effective principal point y-coordinate.
    #[must_use]
    pub const fn cy(&self) -> f64 {
        self.cy
    }

    /// Effective baseline term (x direction).
    #[must_use]
    pub const fn tx(&self) -> f64 {
        self.tx
    }

    /// Effective baseline term (y direction).
    #[must_use]
    pub const fn ty(&self) -> f64 {
        self.ty
    }

    /// Resolution after binning and ROI, `(width, height)`.
    ///
    /// This is the pixel grid registered output is produced on.
    #[must_use]
    pub const fn reduced_resolution(&self) -> (u32, u32) {
        (self.reduced_width, self.reduced_height)
    }

    /// Unprojects a pixel with metric depth to a camera-frame point.
    #[must_use]
    pub fn unproject(&self, u: f64, v: f64, depth: f64) -> [f64; 3] {
        [
            (u - self.cx).mul_add(depth, -self.tx) / self.fx,
            (v - self.cy).mul_add(depth, -self.ty) / self.fy,
            depth,
        ]
    }

    /// Projects camera-frame coordinates with a caller-supplied inverse
    /// depth, returning unrounded pixel coordinates.
    ///
    /// Exposing `inv_z` lets the hole-filling footprint reuse one corner's
    /// inverse depth for both corners of its splat rectangle.
    #[must_use]
    pub fn project_with_inv_z(&self, x: f64, y: f64, inv_z: f64) -> (f64, f64) {
        (
            self.fx.mul_add(x, self.tx).mul_add(inv_z, self.cx),
            self.fy.mul_add(y, self.ty).mul_add(inv_z, self.cy),
        )
    }

    /// Projects a camera-frame point to unrounded pixel coordinates.
    #[must_use]
    pub fn project(&self, point: [f64; 3]) -> (f64, f64) {
        self.project_with_inv_z(point[0], point[1], 1.0 / point[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> CameraInfo {
        CameraInfo::ideal(100.0, 640, 480, FrameId::new("cam_optical"))
    }

    #[test]
    fn model_from_ideal_info() {
        let model = PinholeModel::from_camera_info(&info()).unwrap();
        assert!((model.fx() - 100.0).abs() < 1e-12);
        assert!((model.cx() - 320.0).abs() < 1e-12);
        assert_eq!(model.reduced_resolution(), (640, 480));
        assert_eq!(model.frame().as_str(), "cam_optical");
    }

    #[test]
    fn model_rejects_bad_focal_length() {
        let mut bad = info();
        bad.fx = 0.0;
        assert!(PinholeModel::from_camera_info(&bad).is_err());

        bad = info();
        bad.fy = f64::NAN;
        assert!(PinholeModel::from_camera_info(&bad).is_err());

        bad = info();
        bad.fx = -5.0;
        assert!(PinholeModel::from_camera_info(&bad).is_err());
    }

    #[test]
    fn model_rejects_zero_resolution() {
        let mut bad = info();
        bad.width = 0;
        assert!(matches!(
            PinholeModel::from_camera_info(&bad),
            Err(DepthError::ZeroResolution { .. })
        ));
    }

    #[test]
    fn binning_halves_linear_terms() {
        let mut binned = info();
        binned.binning_x = 2;
        binned.binning_y = 2;
        let model = PinholeModel::from_camera_info(&binned).unwrap();
        assert!((model.fx() - 50.0).abs() < 1e-12);
        assert!((model.cy() - 120.0).abs() < 1e-12);
        assert_eq!(model.reduced_resolution(), (320, 240));
    }

    #[test]
    fn roi_shifts_principal_point() {
        let mut windowed = info();
        windowed.roi = RegionOfInterest {
            x_offset: 100,
            y_offset: 40,
            width: 320,
            height: 240,
        };
        let model = PinholeModel::from_camera_info(&windowed).unwrap();
        assert!((model.cx() - 220.0).abs() < 1e-12);
        assert!((model.cy() - 200.0).abs() < 1e-12);
        assert_eq!(model.reduced_resolution(), (320, 240));
    }

    #[test]
    fn roi_then_binning() {
        let mut both = info();
        both.binning_x = 2;
        both.binning_y = 2;
        both.roi = RegionOfInterest {
            x_offset: 100,
            y_offset: 40,
            width: 320,
            height: 240,
        };
        let model = PinholeModel::from_camera_info(&both).unwrap();
        assert!((model.cx() - 110.0).abs() < 1e-12);
        assert_eq!(model.reduced_resolution(), (160, 120));
    }

    #[test]
    fn zero_binning_means_unbinned() {
        let mut raw = info();
        raw.binning_x = 0;
        raw.binning_y = 0;
        let model = PinholeModel::from_camera_info(&raw).unwrap();
        assert!((model.fx() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn unproject_project_round_trip() {
        let model = PinholeModel::from_camera_info(&info()).unwrap();
        let point = model.unproject(400.0, 300.0, 2.5);
        let (u, v) = model.project(point);
        assert!((u - 400.0).abs() < 1e-9);
        assert!((v - 300.0).abs() < 1e-9);
        assert!((point[2] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn baseline_term_offsets_projection() {
        let mut stereo = info();
        stereo.tx = -7.0; // fx * baseline for a right camera
        let model = PinholeModel::from_camera_info(&stereo).unwrap();
        let point = model.unproject(320.0, 240.0, 1.0);
        let (u, _) = model.project(point);
        assert!((u - 320.0).abs() < 1e-9);
        // Without the baseline the same 3D point lands elsewhere.
        let plain = PinholeModel::from_camera_info(&info()).unwrap();
        let (u_plain, _) = plain.project(point);
        assert!((u_plain - u).abs() > 1.0);
    }
}
