//! The component that makes an entity, and its picker-less descendants, pickable.

use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;

/// Makes an entity able to receive [`PickerEvent`](crate::events::PickerEvent)s.
///
/// Hits on descendants that do not carry their own `ObjectPicker` are reported to the nearest
/// ancestor that does. A disabled picker never receives notifications, and its hits are ignored.
///
/// The pressed and hovered flags are owned by the picking job. They are readable here but cannot
/// be set from outside this crate.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component, Default)]
pub struct ObjectPicker {
    /// Should this picker receive notifications at all?
    pub enabled: bool,
    /// Should this picker receive `moved` notifications?
    pub drag_enabled: bool,
    /// Should this picker receive `entered` and `exited` notifications?
    pub hover_enabled: bool,
    pressed: bool,
    hovered: bool,
}

impl Default for ObjectPicker {
    fn default() -> Self {
        Self {
            enabled: true,
            drag_enabled: false,
            hover_enabled: false,
            pressed: false,
            hovered: false,
        }
    }
}

impl ObjectPicker {
    /// A disabled picker.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Enables or disables `moved` notifications.
    pub fn with_drag(mut self, drag_enabled: bool) -> Self {
        self.drag_enabled = drag_enabled;
        self
    }

    /// Enables or disables hover notifications.
    pub fn with_hover(mut self, hover_enabled: bool) -> Self {
        self.hover_enabled = hover_enabled;
        self
    }

    /// Returns `true` between a dispatched `pressed` and its matching `released`.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Returns `true` between a dispatched `entered` and its matching `exited`.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}
