use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_hierarchy::{BuildWorldChildren, WorldChildBuilder};
use bevy_math::{Quat, Vec2, Vec3};
use bevy_transform::prelude::*;

use bevy_object_picker::prelude::*;
use PickerNotification::*;

const P1: Vec2 = Vec2::new(207.0, 303.0);
const P2: Vec2 = Vec2::new(390.0, 300.0);
const EMPTY: [Vec2; 3] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(20.0, 40.0),
    Vec2::new(400.0, 440.0),
];
const OUTSIDE: Vec2 = Vec2::new(10000.0, 10000.0);

#[derive(Resource, Default)]
struct EventLog(Vec<PickerEvent>);

fn record(mut events: EventReader<PickerEvent>, mut log: ResMut<EventLog>) {
    log.0.extend(events.read().copied());
}

fn picking_app(settings: PickingSettings) -> App {
    let mut app = App::new();
    app.add_plugins(ObjectPickingPlugins)
        .insert_resource(settings)
        .init_resource::<EventLog>()
        .add_systems(PreUpdate, record.in_set(PickSet::PostPick));
    app
}

fn camera_transform(eye: Vec3, target: Vec3, up: Vec3) -> GlobalTransform {
    Transform::from_translation(eye)
        .looking_at(target, up)
        .into()
}

fn spawn_camera(world: &mut World, position: Vec3, target: Vec3) -> Entity {
    world
        .spawn((
            PickingCamera::default(),
            camera_transform(position, target, Vec3::Y),
        ))
        .id()
}

/// A 600x600 surface with one full size viewport.
fn spawn_frame_graph(world: &mut World, camera: Entity) -> Entity {
    world
        .spawn((FrameGraphRoot, RenderSurface::new(600, 600)))
        .with_children(|parent| {
            parent.spawn(Viewport::default()).with_children(|parent| {
                parent.spawn(CameraSelector { camera });
            });
        })
        .id()
}

fn spawn_cube(
    parent: &mut WorldChildBuilder,
    center: Vec3,
    bounds: PickBounds,
    picker: Option<ObjectPicker>,
) -> Entity {
    let mut cube = parent.spawn((
        GlobalTransform::from_translation(center),
        bounds,
        TriangleList::cuboid(Vec3::ONE),
    ));
    if let Some(picker) = picker {
        cube.insert(picker);
    }
    cube.id()
}

struct TwoPickers {
    app: App,
    surface: Entity,
    p1: Entity,
    p2: Entity,
}

/// A camera at `z = 20` looking at two unit cubes: P1 on the left with box bounds, P2 on the
/// right with sphere bounds.
fn two_pickers(settings: PickingSettings, p1: ObjectPicker, p2: ObjectPicker) -> TwoPickers {
    let mut app = picking_app(settings);
    let world = app.world_mut();
    let camera = spawn_camera(world, Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
    let surface = spawn_frame_graph(world, camera);

    let (mut e1, mut e2) = (Entity::PLACEHOLDER, Entity::PLACEHOLDER);
    world.spawn(SceneRoot).with_children(|parent| {
        let left = Vec3::new(-2.5, 0.0, 0.0);
        let right = Vec3::new(2.5, 0.0, 0.0);
        e1 = spawn_cube(parent, left, PickBounds::aabb(left, Vec3::ONE), Some(p1));
        e2 = spawn_cube(parent, right, PickBounds::sphere(right, 3f32.sqrt()), Some(p2));
    });

    TwoPickers {
        app,
        surface,
        p1: e1,
        p2: e2,
    }
}

fn send(app: &mut App, input: PickInput) -> Vec<PickerEvent> {
    app.world_mut().send_event(input);
    app.update();
    std::mem::take(&mut app.world_mut().resource_mut::<EventLog>().0)
}

fn kinds(events: &[PickerEvent]) -> Vec<(PickerNotification, Entity)> {
    events.iter().map(|event| (event.kind, event.picker)).collect()
}

fn press(app: &mut App, position: Vec2) -> Vec<(PickerNotification, Entity)> {
    kinds(&send(app, PickInput::press(position, PointerButton::Primary)))
}

fn release(app: &mut App, position: Vec2) -> Vec<(PickerNotification, Entity)> {
    kinds(&send(app, PickInput::release(position, PointerButton::Primary)))
}

fn job(app: &App) -> &PickingJob {
    app.world().resource::<PickingJob>()
}

fn picker(app: &App, entity: Entity) -> &ObjectPicker {
    app.world().get::<ObjectPicker>(entity).unwrap()
}

fn all_settings() -> Vec<PickingSettings> {
    let mut all = Vec::new();
    for pick_method in [PickMethod::BoundingVolumePicking, PickMethod::TrianglePicking] {
        for result_mode in [PickResultMode::NearestPick, PickResultMode::AllPicks] {
            for face_orientation in [
                FaceOrientationPickingMode::FrontFace,
                FaceOrientationPickingMode::BackFace,
                FaceOrientationPickingMode::FrontAndBackFace,
            ] {
                all.push(PickingSettings {
                    is_enabled: true,
                    pick_method,
                    result_mode,
                    face_orientation,
                });
            }
        }
    }
    all
}

#[test]
fn press_release_in_every_mode() {
    for settings in all_settings() {
        let TwoPickers {
            mut app, p1, p2, ..
        } = two_pickers(settings, ObjectPicker::default(), ObjectPicker::default());
        // Triangle picking with both faces and all picks hits the front and the back of the cube.
        let triangle_picking = settings.pick_method == PickMethod::TrianglePicking;
        let presses = if triangle_picking
            && settings.result_mode == PickResultMode::AllPicks
            && settings.face_orientation == FaceOrientationPickingMode::FrontAndBackFace
        {
            2
        } else {
            1
        };

        let events = send(&mut app, PickInput::press(P1, PointerButton::Primary));
        assert_eq!(kinds(&events), vec![(Pressed, p1); presses], "{settings:?}");
        assert!(events.iter().all(|event| event.pick.entity == Some(p1)));
        assert_eq!(
            events[0].pick.triangle.is_some(),
            triangle_picking,
            "{settings:?}"
        );
        assert!(picker(&app, p1).is_pressed());
        assert_eq!(job(&app).current_picker(), Some(p1));

        let events = send(&mut app, PickInput::release(P1, PointerButton::Primary));
        assert_eq!(kinds(&events), vec![(Released, p1), (Clicked, p1)], "{settings:?}");
        assert!(!events[0].pick.is_null());
        assert!(!picker(&app, p1).is_pressed());
        assert_eq!(job(&app).current_picker(), None);

        assert_eq!(press(&mut app, P2), vec![(Pressed, p2); presses], "{settings:?}");
        assert_eq!(release(&mut app, P2), vec![(Released, p2), (Clicked, p2)]);

        for position in EMPTY {
            assert!(press(&mut app, position).is_empty(), "{settings:?} {position}");
            assert!(release(&mut app, position).is_empty());
            assert_eq!(job(&app).current_picker(), None);
        }
    }
}

#[test]
fn release_outside_viewport() {
    let TwoPickers { mut app, p1, .. } =
        two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());

    assert_eq!(press(&mut app, P1), vec![(Pressed, p1)]);
    let events = send(&mut app, PickInput::release(OUTSIDE, PointerButton::Primary));
    assert_eq!(kinds(&events), vec![(Released, p1), (Clicked, p1)]);
    assert!(events.iter().all(|event| event.pick.is_null()));
    assert_eq!(events[0].pick.button, Some(PointerButton::Primary));
    assert!(!picker(&app, p1).is_pressed());
    assert_eq!(job(&app).current_picker(), None);

    // Releasing again has nothing to release.
    assert!(release(&mut app, OUTSIDE).is_empty());
    assert!(release(&mut app, P1).is_empty());
}

#[test]
fn moves_need_drag() {
    let TwoPickers { mut app, p1, .. } =
        two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());
    press(&mut app, P1);
    assert!(send(&mut app, PickInput::moved(P1 + Vec2::Y)).is_empty());
    assert_eq!(
        job(&app).last_outcome(),
        Some(JobOutcome::Skipped(EarlyExit::MoveIgnored))
    );
    assert_eq!(release(&mut app, P1), vec![(Released, p1), (Clicked, p1)]);

    let TwoPickers { mut app, p1, .. } = two_pickers(
        PickingSettings::default(),
        ObjectPicker::default().with_drag(true),
        ObjectPicker::default(),
    );
    press(&mut app, P1);
    let events = send(&mut app, PickInput::moved(P1 + Vec2::Y));
    assert_eq!(kinds(&events), vec![(Moved, p1)]);
    assert!(!events[0].pick.is_null());
}

#[test]
fn grab_follows_picker_off_its_geometry() {
    let TwoPickers { mut app, p2, .. } = two_pickers(
        PickingSettings::default(),
        ObjectPicker::default(),
        ObjectPicker::default().with_drag(true).with_hover(true),
    );

    assert_eq!(press(&mut app, P2), vec![(Pressed, p2)]);
    let events = send(&mut app, PickInput::moved(EMPTY[2]));
    assert_eq!(kinds(&events), vec![(Moved, p2)]);
    assert!(events[0].pick.is_null());
    // Exclusive grab: passing over the other picker does not reach it.
    assert_eq!(kinds(&send(&mut app, PickInput::moved(P1))), vec![(Moved, p2)]);

    let events = send(&mut app, PickInput::release(EMPTY[2], PointerButton::Primary));
    assert_eq!(kinds(&events), vec![(Released, p2), (Clicked, p2)]);
    assert!(events.iter().all(|event| event.pick.is_null()));
    assert!(job(&app).hovered().is_empty());

    // Without a grab, moves over a hover and drag enabled picker reach it again.
    let events = send(&mut app, PickInput::moved(P2));
    assert_eq!(kinds(&events), vec![(Moved, p2), (Entered, p2)]);
    assert!(picker(&app, p2).is_hovered());
    assert_eq!(kinds(&send(&mut app, PickInput::moved(EMPTY[0]))), vec![(Exited, p2)]);
}

#[test]
fn hover_without_duplicates() {
    let TwoPickers { mut app, p1, p2, .. } = two_pickers(
        PickingSettings::default(),
        ObjectPicker::default().with_hover(true),
        ObjectPicker::default(),
    );

    assert_eq!(kinds(&send(&mut app, PickInput::hover(P1))), vec![(Entered, p1)]);
    assert!(send(&mut app, PickInput::hover(P1 + Vec2::X)).is_empty());
    assert_eq!(kinds(&send(&mut app, PickInput::hover(EMPTY[0]))), vec![(Exited, p1)]);
    assert_eq!(kinds(&send(&mut app, PickInput::hover(P1))), vec![(Entered, p1)]);

    // Pressing elsewhere leaves the hover alone.
    assert_eq!(press(&mut app, P2), vec![(Pressed, p2)]);
    assert_eq!(release(&mut app, P2), vec![(Released, p2), (Clicked, p2)]);
    assert!(picker(&app, p1).is_hovered());
    assert!(press(&mut app, EMPTY[1]).is_empty());
    assert!(picker(&app, p1).is_hovered());

    assert_eq!(kinds(&send(&mut app, PickInput::hover(EMPTY[0]))), vec![(Exited, p1)]);
    assert!(send(&mut app, PickInput::hover(EMPTY[0])).is_empty());
}

#[test]
fn moving_across_pickers_enters_then_exits() {
    let TwoPickers { mut app, p1, p2, .. } = two_pickers(
        PickingSettings::default(),
        ObjectPicker::default().with_hover(true),
        ObjectPicker::default().with_hover(true),
    );

    assert_eq!(kinds(&send(&mut app, PickInput::hover(P1))), vec![(Entered, p1)]);
    assert_eq!(
        kinds(&send(&mut app, PickInput::hover(P2))),
        vec![(Entered, p2), (Exited, p1)]
    );
    assert_eq!(job(&app).hovered(), &[p2]);
}

#[test]
fn inputs_in_one_frame_keep_their_order() {
    let TwoPickers { mut app, p1, p2, .. } =
        two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());

    let world = app.world_mut();
    world.send_event(PickInput::press(P1, PointerButton::Primary));
    world.send_event(PickInput::release(P1, PointerButton::Primary));
    world.send_event(PickInput::press(P2, PointerButton::Primary));
    app.update();

    let events = std::mem::take(&mut app.world_mut().resource_mut::<EventLog>().0);
    assert_eq!(
        kinds(&events),
        vec![(Pressed, p1), (Released, p1), (Clicked, p1), (Pressed, p2)]
    );
    assert_eq!(
        job(&app).last_outcome(),
        Some(JobOutcome::Processed {
            inputs: 3,
            notifications: 4
        })
    );
    assert_eq!(job(&app).current_picker(), Some(p2));
}

#[test]
fn all_picks_grab_is_not_exclusive() {
    let settings = PickingSettings {
        result_mode: PickResultMode::AllPicks,
        ..Default::default()
    };
    let TwoPickers { mut app, p1, p2, .. } = two_pickers(
        settings,
        ObjectPicker::default().with_drag(true),
        ObjectPicker::default().with_drag(true).with_hover(true),
    );

    assert_eq!(press(&mut app, P1), vec![(Pressed, p1)]);
    assert_eq!(
        kinds(&send(&mut app, PickInput::moved(P2))),
        vec![(Moved, p2), (Entered, p2), (Moved, p1)]
    );
    assert_eq!(release(&mut app, P2), vec![(Released, p1), (Clicked, p1)]);
}

#[test]
fn disabled_pickers_are_skipped() {
    let TwoPickers { mut app, p1, .. } =
        two_pickers(PickingSettings::default(), ObjectPicker::disabled(), ObjectPicker::disabled());

    assert!(press(&mut app, P1).is_empty());
    assert_eq!(
        job(&app).last_outcome(),
        Some(JobOutcome::Skipped(EarlyExit::NoEnabledPicker))
    );
    assert_eq!(job(&app).current_picker(), None);
    assert!(!picker(&app, p1).is_pressed());
}

#[test]
fn one_disabled_picker_stays_silent() {
    let TwoPickers { mut app, p2, .. } = two_pickers(
        PickingSettings::default(),
        ObjectPicker::disabled(),
        ObjectPicker::default(),
    );

    assert!(press(&mut app, P1).is_empty());
    assert!(release(&mut app, P1).is_empty());
    assert_eq!(press(&mut app, P2), vec![(Pressed, p2)]);
}

#[test]
fn picking_can_be_turned_off() {
    let settings = PickingSettings {
        is_enabled: false,
        ..Default::default()
    };
    let TwoPickers { mut app, .. } =
        two_pickers(settings, ObjectPicker::default(), ObjectPicker::default());

    assert!(press(&mut app, P1).is_empty());
    assert_eq!(job(&app).last_outcome(), None);
}

#[test]
fn no_input_no_work() {
    let TwoPickers { mut app, .. } =
        two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());
    app.update();
    assert_eq!(
        job(&app).last_outcome(),
        Some(JobOutcome::Skipped(EarlyExit::NoInput))
    );
}

#[test]
fn no_camera_no_picking() {
    let mut app = picking_app(PickingSettings::default());
    let world = app.world_mut();
    world
        .spawn((FrameGraphRoot, RenderSurface::new(600, 600)))
        .with_children(|parent| {
            parent.spawn(Viewport::default());
        });
    world.spawn(SceneRoot).with_children(|parent| {
        let left = Vec3::new(-2.5, 0.0, 0.0);
        spawn_cube(parent, left, PickBounds::aabb(left, Vec3::ONE), Some(ObjectPicker::default()));
    });

    assert!(press(&mut app, P1).is_empty());
    assert_eq!(
        job(&app).last_outcome(),
        Some(JobOutcome::Skipped(EarlyExit::NoViewport))
    );
}

#[test]
fn inputs_target_their_surface() {
    let TwoPickers {
        mut app,
        surface,
        p1,
        ..
    } = two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());
    let elsewhere = app.world_mut().spawn_empty().id();

    let events = send(
        &mut app,
        PickInput::press(P1, PointerButton::Primary).on_surface(elsewhere),
    );
    assert!(events.is_empty());

    let events = send(
        &mut app,
        PickInput::press(P1, PointerButton::Primary).on_surface(surface),
    );
    assert_eq!(kinds(&events), vec![(Pressed, p1)]);
}

#[test]
fn child_hits_reach_the_parent_picker() {
    let mut app = picking_app(PickingSettings::default());
    let world = app.world_mut();
    let camera = spawn_camera(world, Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
    spawn_frame_graph(world, camera);

    let mut child = Entity::PLACEHOLDER;
    let parent = world
        .spawn((SceneRoot, ObjectPicker::default(), GlobalTransform::IDENTITY))
        .with_children(|parent| {
            let left = Vec3::new(-2.5, 0.0, 0.0);
            child = spawn_cube(parent, left, PickBounds::aabb(left, Vec3::ONE), None);
        })
        .id();

    let events = send(&mut app, PickInput::press(P1, PointerButton::Primary));
    assert_eq!(kinds(&events), vec![(Pressed, parent)]);
    assert_eq!(events[0].pick.entity, Some(child));
}

#[test]
fn pickerless_parent_does_not_occlude() {
    let mut app = picking_app(PickingSettings::default());
    let world = app.world_mut();
    let camera = spawn_camera(world, Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
    spawn_frame_graph(world, camera);

    let mut p1 = Entity::PLACEHOLDER;
    world
        .spawn((
            SceneRoot,
            GlobalTransform::from_xyz(0.0, 0.0, 5.0),
            // In front of both cubes, and wider than them.
            PickBounds::aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::new(10.0, 10.0, 1.0)),
        ))
        .with_children(|parent| {
            let left = Vec3::new(-2.5, 0.0, 0.0);
            let bounds = PickBounds::aabb(left, Vec3::ONE);
            p1 = spawn_cube(parent, left, bounds, Some(ObjectPicker::default()));
        });

    assert_eq!(press(&mut app, P1), vec![(Pressed, p1)]);
}

#[test]
fn disabled_subtrees_are_not_picked() {
    let TwoPickers {
        mut app, p1, p2, ..
    } = two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());
    app.world_mut().entity_mut(p1).insert(PickingDisabled);

    assert!(press(&mut app, P1).is_empty());
    assert_eq!(press(&mut app, P2), vec![(Pressed, p2)]);
}

#[test]
fn despawned_grab_is_forgotten() {
    let TwoPickers {
        mut app, p1, p2, ..
    } = two_pickers(PickingSettings::default(), ObjectPicker::default(), ObjectPicker::default());
    assert_eq!(press(&mut app, P1), vec![(Pressed, p1)]);
    app.world_mut().despawn(p1);

    assert!(release(&mut app, P1).is_empty());
    assert_eq!(job(&app).current_picker(), None);
    assert_eq!(press(&mut app, P2), vec![(Pressed, p2)]);
}

#[test]
fn two_viewports_pick_through_their_own_camera() {
    let mut app = picking_app(PickingSettings::default());
    let world = app.world_mut();
    let looking_at_box = spawn_camera(world, Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
    let looking_away = spawn_camera(world, Vec3::new(0.0, 0.0, 20.0), Vec3::new(0.0, 0.0, 40.0));
    world
        .spawn((FrameGraphRoot, RenderSurface::new(600, 600)))
        .with_children(|parent| {
            parent.spawn((
                Viewport::new(0.0, 0.0, 0.5, 1.0),
                CameraSelector {
                    camera: looking_at_box,
                },
            ));
            parent.spawn((
                Viewport::new(0.5, 0.0, 0.5, 1.0),
                CameraSelector {
                    camera: looking_away,
                },
            ));
        });
    let wide_box = world
        .spawn((
            SceneRoot,
            ObjectPicker::default(),
            GlobalTransform::IDENTITY,
            PickBounds::aabb(Vec3::ZERO, Vec3::new(3.0, 1.0, 1.0)),
        ))
        .id();

    assert_eq!(press(&mut app, Vec2::new(200.0, 300.0)), vec![(Pressed, wide_box)]);
    assert_eq!(
        release(&mut app, Vec2::new(200.0, 300.0)),
        vec![(Released, wide_box), (Clicked, wide_box)]
    );
    assert!(press(&mut app, Vec2::new(450.0, 300.0)).is_empty());
    assert_eq!(job(&app).current_picker(), None);
}

struct Orbit {
    app: App,
    camera: Entity,
    cube: Entity,
}

/// A unit cube at the origin, seen through one camera that the test moves around.
fn orbit_scene(face_orientation: FaceOrientationPickingMode) -> Orbit {
    let mut app = picking_app(PickingSettings {
        pick_method: PickMethod::TrianglePicking,
        face_orientation,
        ..Default::default()
    });
    let world = app.world_mut();
    let camera = spawn_camera(world, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    spawn_frame_graph(world, camera);
    let mut cube = Entity::PLACEHOLDER;
    world.spawn(SceneRoot).with_children(|parent| {
        cube = spawn_cube(
            parent,
            Vec3::ZERO,
            PickBounds::aabb(Vec3::ZERO, Vec3::ONE),
            Some(ObjectPicker::default()),
        );
    });
    Orbit { app, camera, cube }
}

impl Orbit {
    fn assert_picked_from(&mut self, eye: Vec3, up: Vec3) {
        let position = Vec2::new(303.0, 303.0);
        let cube = self.cube;
        self.app
            .world_mut()
            .entity_mut(self.camera)
            .insert(camera_transform(eye, Vec3::ZERO, up));

        let events = send(&mut self.app, PickInput::press(position, PointerButton::Primary));
        assert_eq!(kinds(&events), vec![(Pressed, cube)], "eye {eye}, up {up}");
        assert_eq!(events[0].pick.entity, Some(cube));
        assert_eq!(
            release(&mut self.app, position),
            vec![(Released, cube), (Clicked, cube)]
        );
    }
}

#[test]
fn same_target_from_every_angle() {
    let mut orbit = orbit_scene(FaceOrientationPickingMode::FrontFace);
    for i in 0..10 {
        for j in 0..10 {
            let yaw = (i as f32 * 36.0).to_radians();
            let pitch = (-60.0 + j as f32 * 120.0 / 9.0).to_radians();
            let eye = 10.0
                * Vec3::new(
                    pitch.cos() * yaw.sin(),
                    pitch.sin(),
                    pitch.cos() * yaw.cos(),
                );
            orbit.assert_picked_from(eye, Vec3::Y);
        }
    }
}

#[test]
fn same_target_with_a_rolled_camera() {
    for face_orientation in [
        FaceOrientationPickingMode::FrontFace,
        FaceOrientationPickingMode::FrontAndBackFace,
    ] {
        let mut orbit = orbit_scene(face_orientation);
        for j in 0..10 {
            // Rolling around Z turns the up vector together with the eye.
            let roll = Quat::from_rotation_z((j as f32 * 36.0).to_radians());
            for i in 0..10 {
                let angle = (i as f32 * 36.0).to_radians();
                let eye = 10.0 * Vec3::new(angle.sin(), 0.0, angle.cos());
                orbit.assert_picked_from(roll * eye, roll * Vec3::Y);
            }
        }
    }
}

#[cfg(feature = "debug")]
#[test]
fn debug_logging_leaves_picking_alone() {
    use bevy_object_picker::core::debug::Frame;

    let TwoPickers { mut app, p1, .. } = two_pickers(
        PickingSettings::default(),
        ObjectPicker::default().with_drag(true),
        ObjectPicker::default(),
    );
    app.add_plugins(DebugPickingPlugin { noisy: true });

    assert_eq!(press(&mut app, P1), vec![(Pressed, p1)]);
    let moved = send(
        &mut app,
        PickInput::moved(P1 + Vec2::Y).with_buttons(PointerButton::Primary.into()),
    );
    assert_eq!(kinds(&moved), vec![(Moved, p1)]);
    assert_eq!(release(&mut app, P1), vec![(Released, p1), (Clicked, p1)]);
    assert_eq!(app.world().resource::<Frame>().0, 3);
}
