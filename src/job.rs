//! The once-per-frame picking job.
//!
//! [`PickingJob::run`] drains the queued [`PickInput`]s, resolves the viewports once, gathers the
//! scene once, then casts, selects and dispatches every input in the order it arrived. The
//! resulting [`PickerEvent`]s are sent in the same order.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_math::Ray3d;
use bevy_transform::prelude::*;
use bevy_utils::tracing::{debug, trace};

use bevy_object_picker_core::{
    dispatch::PickerState,
    events::PickerEvent,
    picker::ObjectPicker,
    pointer::PickInput,
    settings::PickingSettings,
    PickSet,
};
use bevy_object_picker_raycast::{
    frame_graph::{topmost_area, ViewportCameraArea, ViewportCameraAreaGatherer},
    intersect::intersect_all,
    ray::{cast, PickingCamera},
    scene::EntityGatherer,
    select::{nearest_for_picker, select},
};

/// Why a job run did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EarlyExit {
    /// No input was queued.
    NoInput,
    /// No enabled [`ObjectPicker`] exists.
    NoEnabledPicker,
    /// Only moves were queued, and no picker could react to them: nothing is pressed with
    /// dragging enabled, and no picker wants hover notifications.
    MoveIgnored,
    /// The frame graph has no camera rendering to a surface yet.
    NoViewport,
}

/// What the last job run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobOutcome {
    /// The inputs were drained without being processed.
    Skipped(EarlyExit),
    /// Every input was processed.
    Processed {
        /// Number of processed inputs.
        inputs: usize,
        /// Number of sent [`PickerEvent`]s.
        notifications: usize,
    },
}

/// Owns the [`PickerState`] carried across frames.
#[derive(Resource, Debug, Default)]
pub struct PickingJob {
    state: PickerState,
    last_outcome: Option<JobOutcome>,
}

impl PickingJob {
    /// The grabbed picker, if a press is in progress.
    pub fn current_picker(&self) -> Option<Entity> {
        self.state.current_picker()
    }

    /// Hovered pickers, in the order they were entered.
    pub fn hovered(&self) -> &[Entity] {
        self.state.hovered()
    }

    /// The outcome of the last run, `None` before the first run.
    pub fn last_outcome(&self) -> Option<JobOutcome> {
        self.last_outcome
    }

    /// Runs the picking job on every queued [`PickInput`].
    pub fn run(
        mut job: ResMut<Self>,
        settings: Res<PickingSettings>,
        mut inputs: EventReader<PickInput>,
        frame_graph: ViewportCameraAreaGatherer,
        scene: EntityGatherer,
        cameras: Query<(&PickingCamera, &GlobalTransform)>,
        mut pickers: Query<&mut ObjectPicker>,
        mut output: EventWriter<PickerEvent>,
    ) {
        let inputs: Vec<PickInput> = inputs.read().copied().collect();
        let mut notifications = Vec::new();
        let outcome = job.process(
            &inputs,
            *settings,
            &frame_graph,
            &scene,
            &cameras,
            &mut pickers,
            &mut notifications,
        );

        match outcome {
            JobOutcome::Skipped(EarlyExit::NoInput) => {}
            JobOutcome::Skipped(reason) => {
                trace!("skipped {} picking inputs: {reason:?}", inputs.len());
            }
            JobOutcome::Processed { .. } => {
                for notification in &notifications {
                    debug!("{notification}");
                }
            }
        }
        output.send_batch(notifications);
        job.last_outcome = Some(outcome);
    }

    fn process(
        &mut self,
        inputs: &[PickInput],
        settings: PickingSettings,
        frame_graph: &ViewportCameraAreaGatherer,
        scene: &EntityGatherer,
        cameras: &Query<(&PickingCamera, &GlobalTransform)>,
        pickers: &mut Query<&mut ObjectPicker>,
        out: &mut Vec<PickerEvent>,
    ) -> JobOutcome {
        if inputs.is_empty() {
            return JobOutcome::Skipped(EarlyExit::NoInput);
        }
        self.state.forget_stale(pickers);

        if !pickers.iter().any(|picker| picker.enabled) {
            return JobOutcome::Skipped(EarlyExit::NoEnabledPicker);
        }
        if inputs.iter().all(PickInput::is_move) && !self.observes_moves(pickers) {
            return JobOutcome::Skipped(EarlyExit::MoveIgnored);
        }
        let areas = frame_graph.gather();
        if areas.is_empty() {
            return JobOutcome::Skipped(EarlyExit::NoViewport);
        }
        let entities = scene.gather(pickers);

        for input in inputs {
            let hits = match cast_input(input, &areas, cameras) {
                Some(ray) => intersect_all(&ray, &entities, &settings),
                None => Vec::new(),
            };
            let picks = select(&hits, settings.result_mode);
            let grab_hit = self
                .state
                .current_picker()
                .and_then(|picker| nearest_for_picker(&hits, picker));
            self.state.dispatch(
                input,
                &picks,
                grab_hit.as_ref(),
                settings.result_mode,
                pickers,
                out,
            );
        }

        JobOutcome::Processed {
            inputs: inputs.len(),
            notifications: out.len(),
        }
    }

    fn observes_moves(&self, pickers: &Query<&mut ObjectPicker>) -> bool {
        let dragging = self.state.pressed().iter().any(|&entity| {
            pickers
                .get(entity)
                .is_ok_and(|picker| picker.enabled && picker.drag_enabled)
        });
        dragging
            || pickers
                .iter()
                .any(|picker| picker.enabled && picker.hover_enabled)
    }
}

fn cast_input(
    input: &PickInput,
    areas: &[ViewportCameraArea],
    cameras: &Query<(&PickingCamera, &GlobalTransform)>,
) -> Option<Ray3d> {
    let area = topmost_area(areas, input.position, input.surface)?;
    let (camera, transform) = cameras.get(area.camera).ok()?;
    cast(input.position, area, &camera.projection, transform)
}

/// Adds the [`PickingJob`] to [`PickSet::Pick`].
pub struct PickingJobPlugin;
impl Plugin for PickingJobPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickingJob>().add_systems(
            PreUpdate,
            PickingJob::run
                .in_set(PickSet::Pick)
                .run_if(PickingSettings::is_enabled),
        );
    }
}
