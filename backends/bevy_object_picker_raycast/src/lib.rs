//! The raycasting half of `bevy_object_picker`: resolves cameras through the frame graph, flattens
//! the scene, casts rays from pointer positions, and ranks what they hit.
//!
//! # Usage
//!
//! Spawn a [`FrameGraphRoot`](frame_graph::FrameGraphRoot) with a
//! [`RenderSurface`](frame_graph::RenderSurface) and a
//! [`CameraSelector`](frame_graph::CameraSelector) pointing at an entity with a
//! [`PickingCamera`](ray::PickingCamera). Put pickable entities below a
//! [`SceneRoot`](scene::SceneRoot), and give them [`PickBounds`](scene::PickBounds), plus a
//! [`TriangleList`](scene::TriangleList) for triangle picking.
//!
//! To exclude a subtree from picking, add [`PickingDisabled`](scene::PickingDisabled) to its root.
//! To exclude a camera branch, add [`NoPicking`](frame_graph::NoPicking) to its frame graph node.

#![allow(clippy::too_many_arguments, clippy::type_complexity)]
#![deny(missing_docs)]

use bevy_app::prelude::*;

pub mod frame_graph;
pub mod intersect;
pub mod ray;
pub mod scene;
pub mod select;

/// Commonly used imports for the [`bevy_object_picker_raycast`](crate) crate.
pub mod prelude {
    pub use crate::{
        frame_graph::{
            CameraSelector, FrameGraphRoot, NoPicking, RenderSurface, Viewport,
            ViewportCameraArea,
        },
        ray::{CameraProjection, PickingCamera},
        scene::{PickBounds, PickingDisabled, SceneRoot, TriangleList},
        RaycastBackend,
    };
}

/// Registers the frame graph and scene components.
#[derive(Clone)]
pub struct RaycastBackend;
impl Plugin for RaycastBackend {
    fn build(&self, app: &mut App) {
        app.register_type::<frame_graph::FrameGraphRoot>()
            .register_type::<frame_graph::RenderSurface>()
            .register_type::<frame_graph::Viewport>()
            .register_type::<frame_graph::CameraSelector>()
            .register_type::<frame_graph::NoPicking>()
            .register_type::<ray::PickingCamera>()
            .register_type::<ray::CameraProjection>()
            .register_type::<scene::SceneRoot>()
            .register_type::<scene::PickingDisabled>()
            .register_type::<scene::PickBounds>()
            .register_type::<scene::TriangleList>();
    }
}
