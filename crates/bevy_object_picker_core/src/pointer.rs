//! Pointer inputs consumed by the picking job.

use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use bevy_reflect::prelude::*;

/// The button that changed state in a press or release.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Reflect)]
pub enum PointerButton {
    /// The primary pointer button
    Primary,
    /// The secondary pointer button
    Secondary,
    /// The tertiary pointer button
    Middle,
    /// The "back" button found on some mice
    Back,
}

impl PointerButton {
    /// Iterator over all buttons that a pointer can have.
    pub fn iter() -> impl Iterator<Item = PointerButton> {
        [Self::Primary, Self::Secondary, Self::Middle, Self::Back].into_iter()
    }
}

/// The set of buttons held down when an input was produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct PointerButtons {
    primary: bool,
    secondary: bool,
    middle: bool,
    back: bool,
}

impl PointerButtons {
    /// No buttons held.
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
        middle: false,
        back: false,
    };

    /// Returns a copy with `button` marked as held.
    pub fn with(mut self, button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => self.primary = true,
            PointerButton::Secondary => self.secondary = true,
            PointerButton::Middle => self.middle = true,
            PointerButton::Back => self.back = true,
        }
        self
    }

    /// Returns `true` if `button` is held.
    #[inline]
    pub fn is_pressed(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => self.primary,
            PointerButton::Secondary => self.secondary,
            PointerButton::Middle => self.middle,
            PointerButton::Back => self.back,
        }
    }
}

impl From<PointerButton> for PointerButtons {
    fn from(button: PointerButton) -> Self {
        Self::NONE.with(button)
    }
}

/// Keyboard modifiers active when an input was produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct Modifiers {
    /// Shift key
    pub shift: bool,
    /// Control key
    pub control: bool,
    /// Alt/option key
    pub alt: bool,
    /// Meta/super/command key
    pub meta: bool,
}

/// The kind of a [`PickInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum InputKind {
    /// A button went down.
    Press,
    /// A button went up.
    Release,
    /// The pointer moved. Drives both dragging and hovering.
    Move,
    /// The pointer moved without any button held. Only drives hovering.
    HoverMove,
}

/// A pointer input queued for the picking job. Every queued input is drained on each run and
/// processed in the order it was sent.
///
/// Positions are in physical pixels of the render surface, with the origin in the top left.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PickInput {
    /// The render surface entity the input came from. `None` matches any surface.
    pub surface: Option<Entity>,
    /// What happened.
    pub kind: InputKind,
    /// Pointer position on the surface.
    pub position: Vec2,
    /// The button that changed state, for presses and releases.
    pub button: Option<PointerButton>,
    /// Buttons held after this input.
    pub buttons: PointerButtons,
    /// Active keyboard modifiers.
    pub modifiers: Modifiers,
}

impl PickInput {
    fn new(kind: InputKind, position: Vec2) -> Self {
        Self {
            surface: None,
            kind,
            position,
            button: None,
            buttons: PointerButtons::NONE,
            modifiers: Modifiers::default(),
        }
    }

    /// A press of `button` at `position`.
    pub fn press(position: Vec2, button: PointerButton) -> Self {
        Self {
            button: Some(button),
            buttons: button.into(),
            ..Self::new(InputKind::Press, position)
        }
    }

    /// A release of `button` at `position`.
    pub fn release(position: Vec2, button: PointerButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(InputKind::Release, position)
        }
    }

    /// A move to `position`.
    pub fn moved(position: Vec2) -> Self {
        Self::new(InputKind::Move, position)
    }

    /// A hover-only move to `position`.
    pub fn hover(position: Vec2) -> Self {
        Self::new(InputKind::HoverMove, position)
    }

    /// Restricts the input to areas rendered on `surface`.
    pub fn on_surface(mut self, surface: Entity) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Sets the held buttons.
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Sets the keyboard modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns `true` for [`InputKind::Move`] and [`InputKind::HoverMove`].
    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self.kind, InputKind::Move | InputKind::HoverMove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_holds_its_button() {
        let input = PickInput::press(Vec2::new(4.0, 2.0), PointerButton::Secondary);
        assert_eq!(input.kind, InputKind::Press);
        assert_eq!(input.button, Some(PointerButton::Secondary));
        assert!(input.buttons.is_pressed(PointerButton::Secondary));
        assert!(!input.buttons.is_pressed(PointerButton::Primary));
    }

    #[test]
    fn release_holds_nothing() {
        let input = PickInput::release(Vec2::ZERO, PointerButton::Primary);
        assert_eq!(input.button, Some(PointerButton::Primary));
        assert_eq!(input.buttons, PointerButtons::NONE);
        assert!(!input.is_move());
    }

    #[test]
    fn builders_fill_optional_fields() {
        let surface = Entity::from_raw(7);
        let modifiers = Modifiers {
            shift: true,
            ..Default::default()
        };
        let input = PickInput::hover(Vec2::ONE)
            .on_surface(surface)
            .with_modifiers(modifiers)
            .with_buttons(PointerButtons::NONE.with(PointerButton::Back));
        assert!(input.is_move());
        assert_eq!(input.surface, Some(surface));
        assert!(input.modifiers.shift);
        assert!(input.buttons.is_pressed(PointerButton::Back));
    }
}
