//! Object picking for scene graphs in [`bevy`](https://bevyengine.org): turn pointer presses,
//! moves and releases into press, drag, click and hover notifications on the entities under the
//! pointer.
//!
//! # About
//!
//! Picking is the act of finding what lies under a pointer on screen. This crate does it by
//! casting a ray from the camera through the pointer position, testing it against the bounding
//! volumes (or triangles) of scene entities, and reporting the hits to
//! [`ObjectPicker`](picker::ObjectPicker) components as a stream of
//! [`PickerEvent`](events::PickerEvent)s.
//!
//! # Getting Started
//!
//! ```
//! # use bevy_app::prelude::*;
//! # use bevy_ecs::prelude::*;
//! # use bevy_math::prelude::*;
//! # use bevy_transform::prelude::*;
//! use bevy_object_picker::prelude::*;
//!
//! let mut app = App::new();
//! app.add_plugins(ObjectPickingPlugins);
//!
//! let world = app.world_mut();
//! let camera = world
//!     .spawn((
//!         PickingCamera::default(),
//!         GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 10.0)),
//!     ))
//!     .id();
//! world.spawn((FrameGraphRoot, RenderSurface::new(800, 600), CameraSelector { camera }));
//! world.spawn((
//!     SceneRoot,
//!     ObjectPicker::default(),
//!     PickBounds::sphere(Vec3::ZERO, 1.0),
//!     GlobalTransform::IDENTITY,
//! ));
//!
//! world.send_event(PickInput::press(Vec2::new(400.0, 300.0), PointerButton::Primary));
//! app.update();
//! ```
//!
//! # The Picking Pipeline
//!
//! All systems run in [`PreUpdate`](bevy_app::PreUpdate), ordered by [`PickSet`].
//!
//! ## Input ([`PickSet::Input`])
//!
//! Something outside this crate translates window or device events into
//! [`PickInput`](pointer::PickInput)s. Because
//! the job is driven entirely by these events, they can be used to mock inputs in tests.
//!
//! ## Pick ([`PickSet::Pick`])
//!
//! The [`PickingJob`](job::PickingJob) drains every queued input. It resolves the cameras and
//! viewports of the frame graph and gathers the scene once, then handles the inputs in order:
//! cast a ray through the topmost viewport under the pointer, intersect it with the scene, keep
//! the nearest hit or all of them depending on
//! [`PickingSettings`](settings::PickingSettings), and feed the result to the
//! picker state machine.
//!
//! ## Consumers ([`PickSet::PostPick`])
//!
//! Systems that react to [`PickerEvent`](events::PickerEvent)s in the same frame should run here.

#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![deny(missing_docs)]

use bevy_app::{PluginGroup, PluginGroupBuilder};

// Re-exports
pub use bevy_object_picker_core::{
    self as core, dispatch, events, hit, picker, pointer, settings, PickSet,
};
pub use bevy_object_picker_raycast as raycast;

#[cfg(feature = "debug")]
pub mod debug;
pub mod job;

/// Common imports
pub mod prelude {
    pub use crate::{
        core::prelude::*,
        job::{EarlyExit, JobOutcome, PickingJob},
        raycast::prelude::*,
        ObjectPickingPlugins,
    };

    #[cfg(feature = "debug")]
    pub use crate::debug::DebugPickingPlugin;
}

/// Everything needed for picking: the core types, the raycasting backend, and the picking job.
pub struct ObjectPickingPlugins;
impl PluginGroup for ObjectPickingPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(core::CorePlugin)
            .add(raycast::RaycastBackend)
            .add(job::PickingJobPlugin)
    }
}
