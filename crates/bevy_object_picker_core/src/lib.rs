//! Core types of `bevy_object_picker`: the [`ObjectPicker`](picker::ObjectPicker) component,
//! pointer inputs, pick results, picker notifications, and the state machine that turns pick
//! results into notifications.
//!
//! This crate knows nothing about cameras or geometry. A backend (such as
//! `bevy_object_picker_raycast`) turns a [`PickInput`](pointer::PickInput) into an ordered list of
//! [`PickResult`](hit::PickResult)s, and [`PickerState`](dispatch::PickerState) converts those
//! into [`PickerEvent`](events::PickerEvent)s.

#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![deny(missing_docs)]

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

pub mod debug;
pub mod dispatch;
pub mod events;
pub mod hit;
pub mod picker;
pub mod pointer;
pub mod settings;

/// Common imports
pub mod prelude {
    pub use crate::{
        dispatch::PickerState,
        events::{PickEvent, PickerEvent, PickerNotification},
        hit::{FaceOrientation, PickResult, TriangleHit},
        picker::ObjectPicker,
        pointer::{InputKind, Modifiers, PickInput, PointerButton, PointerButtons},
        settings::{FaceOrientationPickingMode, PickMethod, PickResultMode, PickingSettings},
        CorePlugin, PickSet,
    };
}

/// Groups the stages of the picking pipeline. All sets run in [`PreUpdate`], in order.
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum PickSet {
    /// Produces [`PickInput`](pointer::PickInput) events.
    Input,
    /// Reads inputs, casts rays, and dispatches [`PickerEvent`](events::PickerEvent)s.
    Pick,
    /// Consumers of [`PickerEvent`](events::PickerEvent)s that need them in the same frame.
    PostPick,
}

/// Registers the settings resource, the input and output events, and the system sets.
pub struct CorePlugin;
impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<settings::PickingSettings>()
            .add_event::<pointer::PickInput>()
            .add_event::<events::PickerEvent>()
            .configure_sets(
                PreUpdate,
                (PickSet::Input, PickSet::Pick, PickSet::PostPick).chain(),
            )
            .register_type::<settings::PickingSettings>()
            .register_type::<settings::PickMethod>()
            .register_type::<settings::PickResultMode>()
            .register_type::<settings::FaceOrientationPickingMode>()
            .register_type::<picker::ObjectPicker>()
            .register_type::<pointer::PointerButton>()
            .register_type::<pointer::PointerButtons>()
            .register_type::<pointer::Modifiers>()
            .register_type::<pointer::InputKind>();
    }
}
