//! Debug tools for picking inputs and notifications

use bevy_ecs::prelude::*;
use bevy_utils::tracing::info;

use crate::{
    events::{PickerEvent, PickerNotification},
    pointer::{PickInput, PointerButton},
};

/// Tracks frame number for diagnostics.
#[derive(Debug, Default, Clone, Copy, Resource)]
pub struct Frame(pub usize);

/// Increments frame number for diagnostics.
pub fn increment_frame(mut frame: ResMut<Frame>) {
    frame.0 += 1;
}

/// Controls whether move traffic is logged by [`print_inputs`] and [`print_events`].
#[derive(Debug, Default, Clone, Copy, Resource)]
pub struct Noisy(pub bool);

/// Listens for [`PickInput`]s and prints them.
pub fn print_inputs(frame: Res<Frame>, noisy: Res<Noisy>, mut inputs: EventReader<PickInput>) {
    for input in inputs.read() {
        if input.is_move() && !noisy.0 {
            continue;
        }
        let held: Vec<_> = PointerButton::iter()
            .filter(|&button| input.buttons.is_pressed(button))
            .collect();
        info!(
            "{:?}: {:?} at {:?}, button {:?}, held {:?}",
            frame.0, input.kind, input.position, input.button, held
        );
    }
}

/// Listens for [`PickerEvent`]s and prints them.
pub fn print_events(frame: Res<Frame>, noisy: Res<Noisy>, mut events: EventReader<PickerEvent>) {
    for event in events.read() {
        if event.kind == PickerNotification::Moved && !noisy.0 {
            continue;
        }
        info!("{:?}: {event}", frame.0);
    }
}
