//! Notifications sent to object pickers.

use std::fmt::Display;

use bevy_ecs::prelude::*;
use bevy_math::{Vec2, Vec3};
use bevy_reflect::prelude::*;

use crate::{
    hit::{PickResult, TriangleHit},
    pointer::{Modifiers, PickInput, PointerButton, PointerButtons},
};

/// The kind of a [`PickerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PickerNotification {
    /// A button was pressed over the picker.
    Pressed,
    /// The pointer moved while the picker was grabbed or hovered, with dragging enabled.
    Moved,
    /// The button pressed over the picker was released, anywhere.
    Released,
    /// Follows the `Released` of the grabbed picker.
    Clicked,
    /// The pointer started hovering the picker.
    Entered,
    /// The pointer stopped hovering the picker.
    Exited,
}

/// The payload of a [`PickerEvent`]: the input that caused it and, unless null, the hit backing
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PickEvent {
    /// The entity whose geometry was hit. `None` for a null event.
    pub entity: Option<Entity>,
    /// Pointer position of the input.
    pub position: Vec2,
    /// Button that changed state, if any.
    pub button: Option<PointerButton>,
    /// Buttons held.
    pub buttons: PointerButtons,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Hit position in world space. Zero for a null event.
    pub world_intersection: Vec3,
    /// Hit position in the local space of `entity`. Zero for a null event.
    pub local_intersection: Vec3,
    /// Distance from the ray origin. Negative for a null event.
    pub distance: f32,
    /// Triangle data for triangle picking hits.
    pub triangle: Option<TriangleHit>,
}

impl PickEvent {
    /// Builds the payload for `input`, backed by `hit` when present.
    pub fn new(input: &PickInput, hit: Option<&PickResult>) -> Self {
        let mut event = Self {
            entity: None,
            position: input.position,
            button: input.button,
            buttons: input.buttons,
            modifiers: input.modifiers,
            world_intersection: Vec3::ZERO,
            local_intersection: Vec3::ZERO,
            distance: -1.0,
            triangle: None,
        };
        if let Some(hit) = hit {
            event.entity = Some(hit.entity);
            event.world_intersection = hit.world_point;
            event.local_intersection = hit.local_point;
            event.distance = hit.distance;
            event.triangle = hit.triangle;
        }
        event
    }

    /// Returns `true` if no hit backs this event, e.g. a release away from the grabbed picker.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.entity.is_none()
    }
}

/// A notification for the [`ObjectPicker`](crate::picker::ObjectPicker) on `picker`.
///
/// Events are sent in the order they were produced, which follows the order of the inputs that
/// caused them.
#[derive(Event, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PickerEvent {
    /// Entity carrying the notified picker.
    pub picker: Entity,
    /// What happened.
    pub kind: PickerNotification,
    /// Input and hit data.
    pub pick: PickEvent,
}

impl PickerEvent {
    /// Construct a new `PickerEvent`.
    pub fn new(picker: Entity, kind: PickerNotification, pick: PickEvent) -> Self {
        Self { picker, kind, pick }
    }
}

impl Display for PickerNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pressed => "Pressed",
            Self::Moved => "Moved",
            Self::Released => "Released",
            Self::Clicked => "Clicked",
            Self::Entered => "Entered",
            Self::Exited => "Exited",
        };
        f.write_str(name)
    }
}

impl Display for PickerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<8} picker {:?}", self.kind, self.picker)?;
        match self.pick.entity {
            Some(entity) => write!(
                f,
                ", hit {:?} at {:.3?}, distance {:.3}",
                entity, self.pick.world_intersection, self.pick.distance
            ),
            None => write!(f, ", null hit at {:?}", self.pick.position),
        }
    }
}
