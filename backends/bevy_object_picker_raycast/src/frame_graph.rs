//! Resolves which camera renders to which part of which surface.
//!
//! The frame graph is an entity hierarchy below a [`FrameGraphRoot`]. Nodes along a path from the
//! root to a leaf configure the leaf: a [`RenderSurface`] sets the target size, [`Viewport`]s
//! restrict the drawn area (nested viewports compose), and a [`CameraSelector`] picks the camera.
//! The node nearest to the leaf wins. Every leaf with a camera and a non-empty surface becomes one
//! [`ViewportCameraArea`].

use bevy_ecs::{prelude::*, system::SystemParam};
use bevy_hierarchy::Children;
use bevy_math::{Rect, UVec2, Vec2};
use bevy_reflect::prelude::*;

/// Marks the root of a frame graph.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component, Default)]
pub struct FrameGraphRoot;

/// A render target, such as a window or a texture.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component, Default)]
pub struct RenderSurface {
    /// Size in physical pixels.
    pub size: UVec2,
}

impl RenderSurface {
    /// A surface of `width` by `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
        }
    }
}

/// Restricts rendering to a sub-rectangle of the parent area.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component, Default)]
pub struct Viewport {
    /// Normalized rectangle, origin in the top left, relative to the enclosing viewport.
    pub rect: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

impl Viewport {
    /// A viewport at `(x, y)` with size `(width, height)`, all normalized.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, x + width, y + height),
        }
    }
}

/// Selects the camera rendering the branch.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct CameraSelector {
    /// Entity carrying the [`PickingCamera`](crate::ray::PickingCamera).
    pub camera: Entity,
}

/// Excludes a frame graph branch from picking.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component, Default)]
pub struct NoPicking;

/// A camera and the screen area it renders to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCameraArea {
    /// Entity carrying the camera.
    pub camera: Entity,
    /// Normalized viewport on the surface, origin in the top left.
    pub viewport: Rect,
    /// Size of the surface in pixels.
    pub area: Vec2,
    /// The [`RenderSurface`] entity.
    pub surface: Entity,
}

impl ViewportCameraArea {
    /// The viewport in surface pixels.
    pub fn pixel_rect(&self) -> Rect {
        Rect {
            min: self.viewport.min * self.area,
            max: self.viewport.max * self.area,
        }
    }

    /// Returns `true` if the pixel `position` lies inside the viewport.
    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        self.pixel_rect().contains(position)
    }
}

/// Returns the last declared area containing `position`, restricted to `surface` if set.
pub fn topmost_area(
    areas: &[ViewportCameraArea],
    position: Vec2,
    surface: Option<Entity>,
) -> Option<&ViewportCameraArea> {
    areas
        .iter()
        .rev()
        .filter(|area| surface.map_or(true, |surface| surface == area.surface))
        .find(|area| area.contains(position))
}

#[derive(Clone, Copy)]
struct PathState {
    viewport: Rect,
    camera: Option<Entity>,
    surface: Option<(Entity, UVec2)>,
}

/// Walks the frame graph and collects the [`ViewportCameraArea`]s.
#[derive(SystemParam)]
pub struct ViewportCameraAreaGatherer<'w, 's> {
    roots: Query<'w, 's, Entity, With<FrameGraphRoot>>,
    nodes: Query<
        'w,
        's,
        (
            Option<&'static Children>,
            Option<&'static RenderSurface>,
            Option<&'static Viewport>,
            Option<&'static CameraSelector>,
            Has<NoPicking>,
        ),
    >,
}

impl<'w, 's> ViewportCameraAreaGatherer<'w, 's> {
    /// Collects the areas of every frame graph, in declaration order without duplicates. Empty if
    /// no leaf has both a camera and a non-empty surface.
    pub fn gather(&self) -> Vec<ViewportCameraArea> {
        let mut areas = Vec::new();
        for root in &self.roots {
            self.gather_from(root, &mut areas);
        }
        areas
    }

    /// Collects the areas below `root` into `areas`.
    pub fn gather_from(&self, root: Entity, areas: &mut Vec<ViewportCameraArea>) {
        let state = PathState {
            viewport: Viewport::default().rect,
            camera: None,
            surface: None,
        };
        self.visit(root, state, areas);
    }

    fn visit(&self, entity: Entity, mut state: PathState, areas: &mut Vec<ViewportCameraArea>) {
        let Ok((children, surface, viewport, selector, no_picking)) = self.nodes.get(entity) else {
            return;
        };
        if no_picking {
            return;
        }
        if let Some(surface) = surface {
            state.surface = Some((entity, surface.size));
        }
        if let Some(viewport) = viewport {
            state.viewport = compose(state.viewport, viewport.rect);
        }
        if let Some(selector) = selector {
            state.camera = Some(selector.camera);
        }

        match children {
            Some(children) if !children.is_empty() => {
                for &child in children.iter() {
                    self.visit(child, state, areas);
                }
            }
            _ => {
                let (Some(camera), Some((surface, size))) = (state.camera, state.surface) else {
                    return;
                };
                if size.x == 0 || size.y == 0 {
                    return;
                }
                let area = ViewportCameraArea {
                    camera,
                    viewport: state.viewport,
                    area: size.as_vec2(),
                    surface,
                };
                if !areas.contains(&area) {
                    areas.push(area);
                }
            }
        }
    }
}

/// Places the normalized `child` rectangle inside `parent`.
fn compose(parent: Rect, child: Rect) -> Rect {
    let size = parent.size();
    Rect {
        min: parent.min + child.min * size,
        max: parent.min + child.max * size,
    }
}
