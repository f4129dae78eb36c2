//! Turns pick results into [`PickerEvent`]s.
//!
//! [`PickerState`] tracks the grab (the picker that received the press currently in progress),
//! every pressed picker, and every hovered picker. It consumes one [`PickInput`] at a time along
//! with the pick results of that input's ray, updates the [`ObjectPicker`] flags, and appends the
//! resulting notifications in the order they happen.
//!
//! # Grab semantics
//!
//! With [`PickResultMode::NearestPick`] a press grabs the nearest picker exclusively: moves and
//! the release are reported to it alone, using the ray's hit against that picker's own geometry
//! rather than whatever is under the pointer. With [`PickResultMode::AllPicks`] the grab is not
//! exclusive: moves keep reaching whatever is under the pointer, and the grabbed picker also gets
//! `Moved` while the pointer is elsewhere.
//!
//! A release while a grab is active always produces `Released` followed by `Clicked` for the
//! grabbed picker, with a null payload when the pointer is no longer over it.

use bevy_ecs::prelude::*;

use crate::{
    events::{PickEvent, PickerEvent, PickerNotification},
    hit::PickResult,
    picker::ObjectPicker,
    pointer::{InputKind, PickInput},
    settings::PickResultMode,
};

/// Press, grab and hover state carried from one input to the next.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PickerState {
    current_picker: Option<Entity>,
    pressed: Vec<Entity>,
    hovered: Vec<Entity>,
}

impl PickerState {
    /// The picker grabbed by the press in progress, if any.
    #[inline]
    pub fn current_picker(&self) -> Option<Entity> {
        self.current_picker
    }

    /// Every pressed picker, in the order they were pressed.
    #[inline]
    pub fn pressed(&self) -> &[Entity] {
        &self.pressed
    }

    /// Every hovered picker, in the order they were entered.
    #[inline]
    pub fn hovered(&self) -> &[Entity] {
        &self.hovered
    }

    /// Returns `true` if moves are reported only to the grabbed picker.
    #[inline]
    pub fn is_exclusive_grab(&self, mode: PickResultMode) -> bool {
        mode == PickResultMode::NearestPick && self.current_picker.is_some()
    }

    /// Drops pickers that were despawned or disabled, and hovered pickers that no longer want
    /// hover notifications. No notification is sent for them.
    pub fn forget_stale(&mut self, pickers: &mut Query<&mut ObjectPicker>) {
        self.pressed
            .retain(|&entity| match pickers.get_mut(entity) {
                Ok(picker) if picker.enabled => true,
                Ok(mut picker) => {
                    picker.set_pressed(false);
                    false
                }
                Err(_) => false,
            });
        self.hovered
            .retain(|&entity| match pickers.get_mut(entity) {
                Ok(picker) if picker.enabled && picker.hover_enabled => true,
                Ok(mut picker) => {
                    picker.set_hovered(false);
                    false
                }
                Err(_) => false,
            });
        if let Some(current) = self.current_picker {
            if !self.pressed.contains(&current) {
                self.current_picker = self.pressed.first().copied();
            }
        }
    }

    /// Processes one input.
    ///
    /// `picks` are the selected results for the input's ray, empty if the input missed every
    /// viewport. `grab_hit` is the nearest hit of that ray against the grabbed picker's own
    /// geometry, if there is a grab and the ray hits it.
    pub fn dispatch(
        &mut self,
        input: &PickInput,
        picks: &[PickResult],
        grab_hit: Option<&PickResult>,
        mode: PickResultMode,
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) {
        match input.kind {
            InputKind::Press => self.press(input, picks, pickers, out),
            InputKind::Release => self.release(input, picks, grab_hit, pickers, out),
            InputKind::Move if self.is_exclusive_grab(mode) => {
                self.drag(input, grab_hit, pickers, out);
            }
            InputKind::Move => {
                let hover_to_clear = self.hovered.clone();
                self.move_over(input, picks, grab_hit, mode, pickers, out);
                self.clear_hover(&hover_to_clear, input, picks, pickers, out);
            }
            InputKind::HoverMove => {
                let hover_to_clear = self.hovered.clone();
                for pick in picks {
                    let Ok(mut picker) = pickers.get_mut(pick.picker) else {
                        continue;
                    };
                    if picker.enabled {
                        self.enter(&mut picker, input, pick, out);
                    }
                }
                self.clear_hover(&hover_to_clear, input, picks, pickers, out);
            }
        }
    }

    fn press(
        &mut self,
        input: &PickInput,
        picks: &[PickResult],
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) {
        for pick in picks {
            let Ok(mut picker) = pickers.get_mut(pick.picker) else {
                continue;
            };
            if !picker.enabled {
                continue;
            }
            picker.set_pressed(true);
            if !self.pressed.contains(&pick.picker) {
                self.pressed.push(pick.picker);
            }
            if self.current_picker.is_none() {
                self.current_picker = Some(pick.picker);
            }
            notify(out, pick.picker, PickerNotification::Pressed, input, Some(pick));
        }
    }

    fn release(
        &mut self,
        input: &PickInput,
        picks: &[PickResult],
        grab_hit: Option<&PickResult>,
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) {
        let Some(current) = self.current_picker.take() else {
            return;
        };
        if let Ok(mut picker) = pickers.get_mut(current) {
            picker.set_pressed(false);
            if picker.enabled {
                notify(out, current, PickerNotification::Released, input, grab_hit);
                notify(out, current, PickerNotification::Clicked, input, grab_hit);
            }
        }
        for entity in std::mem::take(&mut self.pressed) {
            if entity == current {
                continue;
            }
            let Ok(mut picker) = pickers.get_mut(entity) else {
                continue;
            };
            if !picker.is_pressed() {
                continue;
            }
            picker.set_pressed(false);
            if picker.enabled {
                let hit = picks.iter().find(|pick| pick.picker == entity);
                notify(out, entity, PickerNotification::Released, input, hit);
            }
        }
    }

    fn drag(
        &mut self,
        input: &PickInput,
        grab_hit: Option<&PickResult>,
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) {
        let Some(current) = self.current_picker else {
            return;
        };
        let Ok(picker) = pickers.get(current) else {
            return;
        };
        if picker.enabled && picker.drag_enabled {
            notify(out, current, PickerNotification::Moved, input, grab_hit);
        }
    }

    fn move_over(
        &mut self,
        input: &PickInput,
        picks: &[PickResult],
        grab_hit: Option<&PickResult>,
        mode: PickResultMode,
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) {
        for pick in picks {
            let Ok(mut picker) = pickers.get_mut(pick.picker) else {
                continue;
            };
            if !picker.enabled {
                continue;
            }
            if (picker.is_pressed() || picker.hover_enabled) && picker.drag_enabled {
                notify(out, pick.picker, PickerNotification::Moved, input, Some(pick));
            }
            self.enter(&mut picker, input, pick, out);
        }

        if mode != PickResultMode::AllPicks {
            return;
        }
        let Some(current) = self.current_picker else {
            return;
        };
        if picks.iter().any(|pick| pick.picker == current) {
            return;
        }
        if let Ok(picker) = pickers.get(current) {
            if picker.enabled && picker.drag_enabled {
                notify(out, current, PickerNotification::Moved, input, grab_hit);
            }
        }
    }

    fn enter(
        &mut self,
        picker: &mut ObjectPicker,
        input: &PickInput,
        pick: &PickResult,
        out: &mut Vec<PickerEvent>,
    ) {
        if picker.hover_enabled && !self.hovered.contains(&pick.picker) {
            picker.set_hovered(true);
            self.hovered.push(pick.picker);
            notify(out, pick.picker, PickerNotification::Entered, input, Some(pick));
        }
    }

    fn clear_hover(
        &mut self,
        hover_to_clear: &[Entity],
        input: &PickInput,
        picks: &[PickResult],
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) {
        for &entity in hover_to_clear {
            if picks.iter().any(|pick| pick.picker == entity) {
                continue;
            }
            self.hovered.retain(|&hovered| hovered != entity);
            if let Ok(mut picker) = pickers.get_mut(entity) {
                picker.set_hovered(false);
                if picker.enabled {
                    notify(out, entity, PickerNotification::Exited, input, None);
                }
            }
        }
    }
}

fn notify(
    out: &mut Vec<PickerEvent>,
    picker: Entity,
    kind: PickerNotification,
    input: &PickInput,
    hit: Option<&PickResult>,
) {
    out.push(PickerEvent::new(picker, kind, PickEvent::new(input, hit)));
}
