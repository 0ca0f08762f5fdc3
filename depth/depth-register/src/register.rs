//! Depth registration: reprojecting a depth image into a second camera's
//! pixel grid.
//!
//! Every valid source pixel is unprojected with the depth camera's model,
//! carried through the depth-to-target rigid transform, and projected with
//! the target camera's model. Multiple source pixels can legitimately land
//! on the same target cell under perspective foreshortening; the visible
//! surface is the nearest one, so collisions are resolved by a z-buffer
//! (nearest wins) rather than any blending, which would fabricate depths
//! at occlusion boundaries.

// Pixel coordinates move between u32, i64 and f64 throughout.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use depth_types::{DepthCodec, DepthEncoding, DepthFrame, Fixed16, Float32, PinholeModel};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transform::RigidTransform;

/// Pixel-footprint policy for the registered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RegisterPolicy {
    /// Each source pixel writes at most one target cell.
    #[default]
    PointSample,
    /// Each source pixel splats the rectangle spanned by its projected
    /// corners. Denser coverage when the target resolution exceeds the
    /// source's projected density, at the cost of an approximate footprint;
    /// avoids speckled holes after upsampling.
    FillHoles,
}

/// Registers a depth frame into the target camera's pixel grid.
///
/// The output frame is sized to the target model's reduced resolution,
/// carries the target's optical frame and the source capture time, and
/// keeps the input's numeric encoding. Every cell holds either the
/// "unknown" sentinel or the nearest depth among all source pixels that
/// projected onto it.
///
/// Invalid source samples and projections falling outside the target grid
/// are skipped silently; both are frequent and per-pixel.
///
/// # Errors
///
/// Returns an error if the input buffer geometry is inconsistent with its
/// declared width, height and stride.
///
/// # Example
///
/// ```
/// use depth_register::{RegisterPolicy, RigidTransform, register_depth};
/// use depth_types::{CameraInfo, DepthFrame, Fixed16, FrameId, PinholeModel, Timestamp};
///
/// let info = CameraInfo::ideal(100.0, 4, 4, FrameId::new("cam_optical"));
/// let model = PinholeModel::from_camera_info(&info).unwrap();
/// let depth = DepthFrame::from_samples::<Fixed16>(
///     Timestamp::zero(),
///     FrameId::new("cam_optical"),
///     4,
///     4,
///     vec![1000; 16],
/// )
/// .unwrap();
///
/// let registered = register_depth(
///     &depth,
///     &model,
///     &model,
///     &RigidTransform::identity(),
///     RegisterPolicy::PointSample,
/// )
/// .unwrap();
/// assert_eq!(registered.to_samples::<Fixed16>(), depth.to_samples::<Fixed16>());
/// ```
pub fn register_depth(
    depth: &DepthFrame,
    depth_model: &PinholeModel,
    target_model: &PinholeModel,
    depth_to_target: &RigidTransform,
    policy: RegisterPolicy,
) -> Result<DepthFrame> {
    match depth.encoding {
        DepthEncoding::Fixed16 => {
            convert::<Fixed16>(depth, depth_model, target_model, depth_to_target, policy)
        }
        DepthEncoding::Float32 => {
            convert::<Float32>(depth, depth_model, target_model, depth_to_target, policy)
        }
    }
}

fn convert<C: DepthCodec>(
    depth: &DepthFrame,
    depth_model: &PinholeModel,
    target_model: &PinholeModel,
    depth_to_target: &RigidTransform,
    policy: RegisterPolicy,
) -> Result<DepthFrame> {
    depth.validate::<C>()?;

    let (out_width, out_height) = target_model.reduced_resolution();
    let mut registered = vec![C::invalid(); out_width as usize * out_height as usize];

    for v in 0..depth.height {
        for u in 0..depth.width {
            let Some(raw) = depth.get::<C>(u, v) else {
                continue;
            };
            if !C::valid(raw) {
                continue;
            }
            let d = C::to_meters(raw);

            match policy {
                RegisterPolicy::PointSample => point_sample::<C>(
                    u,
                    v,
                    d,
                    depth_model,
                    target_model,
                    depth_to_target,
                    &mut registered,
                    i64::from(out_width),
                    i64::from(out_height),
                ),
                RegisterPolicy::FillHoles => splat::<C>(
                    u,
                    v,
                    d,
                    depth_model,
                    target_model,
                    depth_to_target,
                    &mut registered,
                    i64::from(out_width),
                    i64::from(out_height),
                ),
            }
        }
    }

    Ok(DepthFrame::from_samples::<C>(
        depth.timestamp,
        target_model.frame().clone(),
        out_width,
        out_height,
        registered,
    )?)
}

/// Rounds half-up by adding 0.5 and truncating toward zero, so integer
/// inputs map to themselves exactly.
#[inline]
fn round_pixel(coord: f64) -> i64 {
    (coord + 0.5) as i64
}

/// Nearest measurement wins; equal depths keep the incumbent.
#[inline]
fn zbuffer_write<C: DepthCodec>(cell: &mut C::Sample, new_depth: C::Sample) {
    if !C::valid(*cell) || *cell > new_depth {
        *cell = new_depth;
    }
}

#[allow(clippy::too_many_arguments)]
fn point_sample<C: DepthCodec>(
    u: u32,
    v: u32,
    d: f64,
    depth_model: &PinholeModel,
    target_model: &PinholeModel,
    depth_to_target: &RigidTransform,
    out: &mut [C::Sample],
    out_width: i64,
    out_height: i64,
) {
    let point = depth_model.unproject(f64::from(u), f64::from(v), d);
    let q = depth_to_target.apply_point(DVec3::from_array(point));

    let inv_z = 1.0 / q.z;
    let (uf, vf) = target_model.project_with_inv_z(q.x, q.y, inv_z);
    let u_t = round_pixel(uf);
    let v_t = round_pixel(vf);
    if u_t < 0 || u_t >= out_width || v_t < 0 || v_t >= out_height {
        return;
    }

    zbuffer_write::<C>(
        &mut out[(v_t * out_width + u_t) as usize],
        C::from_meters(q.z),
    );
}

#[allow(clippy::too_many_arguments)]
fn splat<C: DepthCodec>(
    u: u32,
    v: u32,
    d: f64,
    depth_model: &PinholeModel,
    target_model: &PinholeModel,
    depth_to_target: &RigidTransform,
    out: &mut [C::Sample],
    out_width: i64,
    out_height: i64,
) {
    // Diagonal corners of the pixel footprint instead of its center.
    let c1 = depth_model.unproject(f64::from(u) - 0.5, f64::from(v) - 0.5, d);
    let c2 = depth_model.unproject(f64::from(u) + 0.5, f64::from(v) + 0.5, d);
    let q1 = depth_to_target.apply_point(DVec3::from_array(c1));
    let q2 = depth_to_target.apply_point(DVec3::from_array(c2));

    // Both corners share the first corner's inverse depth. The footprint is
    // already approximate; keep the projection consistent with it.
    let inv_z = 1.0 / q1.z;
    let (u1f, v1f) = target_model.project_with_inv_z(q1.x, q1.y, inv_z);
    let (u2f, v2f) = target_model.project_with_inv_z(q2.x, q2.y, inv_z);
    let u_1 = round_pixel(u1f);
    let v_1 = round_pixel(v1f);
    let u_2 = round_pixel(u2f);
    let v_2 = round_pixel(v2f);

    // The whole footprint is rejected when either corner crosses its edge.
    if u_1 < 0 || u_2 >= out_width || v_1 < 0 || v_2 >= out_height {
        return;
    }

    let new_depth = C::from_meters(0.5 * (q1.z + q2.z));
    for nv in v_1..=v_2 {
        for nu in u_1..=u_2 {
            zbuffer_write::<C>(&mut out[(nv * out_width + nu) as usize], new_depth);
        }
    }
}
