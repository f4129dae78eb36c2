//! Text debugging tools

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use bevy_object_picker_core::{debug, PickSet};

/// Logs picking inputs and notifications for debugging
#[derive(Debug, Default, Clone)]
pub struct DebugPickingPlugin {
    /// Suppresses noisy inputs and notifications like moves when set to `false`
    pub noisy: bool,
}
impl Plugin for DebugPickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<debug::Frame>()
            .insert_resource(debug::Noisy(self.noisy))
            .add_systems(First, debug::increment_frame)
            .add_systems(
                PreUpdate,
                (
                    debug::print_inputs.before(PickSet::Pick),
                    debug::print_events.in_set(PickSet::PostPick),
                ),
            );
    }
}
