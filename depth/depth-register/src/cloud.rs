//! Projection of depth frames into 3D point clouds.
//!
//! Each valid depth pixel becomes one point in the camera's optical frame,
//! visited in raster order. Invalid pixels are dropped entirely rather than
//! emitted as NaN placeholders, so the output is a dense variable-length
//! list.

use depth_types::{
    CloudPoint, ColorFrame, DepthCodec, DepthEncoding, DepthFrame, Fixed16, Float32,
    IntensityFrame, PinholeModel, PointCloud,
};

use crate::error::{RegisterError, Result};

/// Projects a depth frame into a point cloud in the camera's optical frame.
///
/// # Errors
///
/// Returns an error if the frame's buffer geometry is inconsistent.
///
/// # Example
///
/// ```
/// use depth_register::depth_to_cloud;
/// use depth_types::{CameraInfo, DepthFrame, Fixed16, FrameId, PinholeModel, Timestamp};
///
/// let info = CameraInfo::ideal(100.0, 4, 4, FrameId::new("cam_optical"));
/// let model = PinholeModel::from_camera_info(&info).unwrap();
/// let depth = DepthFrame::from_samples::<Fixed16>(
///     Timestamp::zero(),
///     FrameId::new("cam_optical"),
///     4,
///     4,
///     vec![500; 16],
/// )
/// .unwrap();
///
/// let cloud = depth_to_cloud(&depth, &model).unwrap();
/// assert_eq!(cloud.point_count(), 16);
/// ```
pub fn depth_to_cloud(depth: &DepthFrame, model: &PinholeModel) -> Result<PointCloud> {
    match depth.encoding {
        DepthEncoding::Fixed16 => collect::<Fixed16, _>(depth, model, |_, _| Some(())),
        DepthEncoding::Float32 => collect::<Float32, _>(depth, model, |_, _| Some(())),
    }
}

/// Projects a depth frame into a point cloud carrying per-point intensity
/// sampled from a pixel-aligned intensity image.
///
/// # Errors
///
/// Returns [`RegisterError::ResolutionMismatch`] when the intensity image's
/// resolution differs from the depth frame's, or a model error when the
/// depth buffer is inconsistent.
pub fn depth_to_cloud_with_intensity(
    depth: &DepthFrame,
    intensity: &IntensityFrame,
    model: &PinholeModel,
) -> Result<PointCloud> {
    if intensity.width != depth.width || intensity.height != depth.height {
        return Err(RegisterError::resolution_mismatch(
            depth.width,
            depth.height,
            intensity.width,
            intensity.height,
        ));
    }
    match depth.encoding {
        DepthEncoding::Fixed16 => collect::<Fixed16, _>(depth, model, |u, v| intensity.get(u, v)),
        DepthEncoding::Float32 => collect::<Float32, _>(depth, model, |u, v| intensity.get(u, v)),
    }
}

/// Projects a depth frame into a point cloud carrying per-point RGB color
/// sampled from a pixel-aligned color image.
///
/// Meaningful colors require the depth frame to be registered into the
/// color camera's grid first; this function only checks that the
/// resolutions agree.
///
/// # Errors
///
/// Returns [`RegisterError::ResolutionMismatch`] when the color image's
/// resolution differs from the depth frame's, or a model error when the
/// depth buffer is inconsistent.
pub fn depth_to_cloud_with_color(
    depth: &DepthFrame,
    color: &ColorFrame,
    model: &PinholeModel,
) -> Result<PointCloud> {
    if color.width != depth.width || color.height != depth.height {
        return Err(RegisterError::resolution_mismatch(
            depth.width,
            depth.height,
            color.width,
            color.height,
        ));
    }
    match depth.encoding {
        DepthEncoding::Fixed16 => collect::<Fixed16, _>(depth, model, |u, v| color.get(u, v)),
        DepthEncoding::Float32 => collect::<Float32, _>(depth, model, |u, v| color.get(u, v)),
    }
}

/// Walks the frame in raster order, unprojects valid pixels and attaches the
/// sampled attribute. Pixels whose attribute sample is `None` are skipped
/// along with invalid depths.
fn collect<C: DepthCodec, A: Into<Attribute>>(
    depth: &DepthFrame,
    model: &PinholeModel,
    mut attribute: impl FnMut(u32, u32) -> Option<A>,
) -> Result<PointCloud> {
    depth.validate::<C>()?;

    let mut cloud = PointCloud::new(depth.timestamp, model.frame().clone());
    for v in 0..depth.height {
        for u in 0..depth.width {
            let Some(raw) = depth.get::<C>(u, v) else {
                continue;
            };
            if !C::valid(raw) {
                continue;
            }
            let Some(sample) = attribute(u, v) else {
                continue;
            };
            let position = model.unproject(f64::from(u), f64::from(v), C::to_meters(raw));
            cloud.points.push(match sample.into() {
                Attribute::None => CloudPoint::new(position),
                Attribute::Intensity(i) => CloudPoint::with_intensity(position, i),
                Attribute::Color(rgb) => CloudPoint::with_color(position, rgb),
            });
        }
    }
    Ok(cloud)
}

enum Attribute {
    None,
    Intensity(f32),
    Color([u8; 3]),
}

impl From<()> for Attribute {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<f32> for Attribute {
    fn from(intensity: f32) -> Self {
        Self::Intensity(intensity)
    }
}

impl From<[u8; 3]> for Attribute {
    fn from(rgb: [u8; 3]) -> Self {
        Self::Color(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depth_types::{CameraInfo, FrameId, Timestamp};

    fn ideal_model(focal: f64, width: u32, height: u32) -> PinholeModel {
        let info = CameraInfo::ideal(focal, width, height, FrameId::new("cam_optical"));
        PinholeModel::from_camera_info(&info).unwrap()
    }

    fn checkerboard(width: u32, height: u32) -> DepthFrame {
        let samples: Vec<u16> = (0..width as usize * height as usize)
            .map(|i| if i % 2 == 0 { 1000 } else { 0 })
            .collect();
        DepthFrame::from_samples::<Fixed16>(
            Timestamp::from_nanos(42),
            FrameId::new("cam_optical"),
            width,
            height,
            samples,
        )
        .unwrap()
    }

    #[test]
    fn one_point_per_valid_pixel() {
        let model = ideal_model(100.0, 4, 4);
        let depth = checkerboard(4, 4);

        let cloud = depth_to_cloud(&depth, &model).unwrap();
        assert_eq!(cloud.point_count(), 8);
        assert_eq!(cloud.timestamp, depth.timestamp);
        assert_eq!(cloud.frame.as_str(), "cam_optical");
    }

    #[test]
    fn unprojection_matches_pinhole_geometry() {
        let model = ideal_model(100.0, 4, 4);
        let depth = DepthFrame::from_samples::<Fixed16>(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            4,
            4,
            vec![2000; 16],
        )
        .unwrap();

        let cloud = depth_to_cloud(&depth, &model).unwrap();
        // Raster order: the first point comes from pixel (0, 0), and the
        // ideal model centers the principal point at (2, 2).
        let [x, y, z] = cloud.points[0].position;
        assert!((x - (0.0 - 2.0) * 2.0 / 100.0).abs() < 1e-12);
        assert!((y - (0.0 - 2.0) * 2.0 / 100.0).abs() < 1e-12);
        assert!((z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn intensity_is_sampled_per_point() {
        let model = ideal_model(100.0, 2, 2);
        let depth = DepthFrame::from_samples::<Fixed16>(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            2,
            2,
            vec![1000, 0, 1000, 1000],
        )
        .unwrap();
        let intensity = IntensityFrame::from_values(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            2,
            2,
            vec![0.1, 0.2, 0.3, 0.4],
        )
        .unwrap();

        let cloud = depth_to_cloud_with_intensity(&depth, &intensity, &model).unwrap();
        let sampled: Vec<f32> = cloud.points.iter().filter_map(|p| p.intensity).collect();
        assert_eq!(sampled, vec![0.1, 0.3, 0.4]);
    }

    #[test]
    fn color_is_sampled_per_point() {
        let model = ideal_model(100.0, 2, 1);
        let depth = DepthFrame::from_samples::<Float32>(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            2,
            1,
            vec![1.0, f32::NAN],
        )
        .unwrap();
        let color = ColorFrame::from_rgb(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            2,
            1,
            vec![10, 20, 30, 40, 50, 60],
        )
        .unwrap();

        let cloud = depth_to_cloud_with_color(&depth, &color, &model).unwrap();
        assert_eq!(cloud.point_count(), 1);
        assert_eq!(cloud.points[0].color, Some([10, 20, 30]));
    }

    #[test]
    fn mismatched_resolution_is_rejected() {
        let model = ideal_model(100.0, 4, 4);
        let depth = checkerboard(4, 4);
        let intensity = IntensityFrame::from_values(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            2,
            2,
            vec![0.0; 4],
        )
        .unwrap();

        let result = depth_to_cloud_with_intensity(&depth, &intensity, &model);
        assert!(matches!(
            result,
            Err(RegisterError::ResolutionMismatch { .. })
        ));
    }

    #[test]
    fn round_trip_preserves_depths() {
        let model = ideal_model(100.0, 4, 4);
        let depth = DepthFrame::from_samples::<Float32>(
            Timestamp::zero(),
            FrameId::new("cam_optical"),
            4,
            4,
            (0..16).map(|i| 0.5 + 0.1 * i as f32).collect(),
        )
        .unwrap();

        let cloud = depth_to_cloud(&depth, &model).unwrap();
        for (point, sample) in cloud.points.iter().zip(depth.to_samples::<Float32>()) {
            assert!((point.position[2] - f64::from(sample)).abs() < 1e-6);
        }
    }
}
