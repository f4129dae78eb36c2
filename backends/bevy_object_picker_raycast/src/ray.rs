//! Cameras and screen space to world space rays.

use bevy_ecs::prelude::*;
use bevy_math::{Dir3, Mat4, Ray3d, Vec2};
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;

use crate::frame_graph::ViewportCameraArea;

/// How a [`PickingCamera`] projects the scene. Depth maps to `[0, 1]` between the near and far
/// planes.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum CameraProjection {
    /// A perspective projection.
    Perspective {
        /// Vertical field of view, in radians.
        fov_y: f32,
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
        /// Width over height. The viewport's pixel aspect ratio is used when `None`.
        aspect_ratio: Option<f32>,
    },
    /// An orthographic projection.
    Orthographic {
        /// Height of the view volume in world units. The width follows the viewport aspect ratio.
        height: f32,
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
}

impl Default for CameraProjection {
    fn default() -> Self {
        Self::Perspective {
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect_ratio: None,
        }
    }
}

impl CameraProjection {
    /// The projection matrix for a viewport of the given aspect ratio.
    pub fn matrix(&self, viewport_aspect: f32) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y,
                near,
                far,
                aspect_ratio,
            } => Mat4::perspective_rh(fov_y, aspect_ratio.unwrap_or(viewport_aspect), near, far),
            Self::Orthographic { height, near, far } => {
                let half_height = height * 0.5;
                let half_width = half_height * viewport_aspect;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    near,
                    far,
                )
            }
        }
    }
}

/// A camera that picking rays are cast from. It looks down its local `-Z` axis, positioned and
/// oriented by its [`GlobalTransform`].
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component, Default)]
pub struct PickingCamera {
    /// The camera projection.
    pub projection: CameraProjection,
}

/// Casts a ray through the pixel `position` of `area`.
///
/// Returns `None` if the position lies outside the viewport or the camera cannot be inverted.
pub fn cast(
    position: Vec2,
    area: &ViewportCameraArea,
    projection: &CameraProjection,
    transform: &GlobalTransform,
) -> Option<Ray3d> {
    let rect = area.pixel_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 || !rect.contains(position) {
        return None;
    }
    let ndc = Vec2::new(
        2.0 * (position.x - rect.min.x) / rect.width() - 1.0,
        1.0 - 2.0 * (position.y - rect.min.y) / rect.height(),
    );

    let clip_from_view = projection.matrix(rect.width() / rect.height());
    if clip_from_view.determinant().abs() <= f32::EPSILON * f32::EPSILON {
        return None;
    }
    let world_from_clip = transform.compute_matrix() * clip_from_view.inverse();
    let near = world_from_clip.project_point3(ndc.extend(0.0));
    let far = world_from_clip.project_point3(ndc.extend(1.0));
    if !near.is_finite() || !far.is_finite() {
        return None;
    }

    Some(Ray3d {
        origin: near,
        direction: Dir3::new(far - near).ok()?,
    })
}
