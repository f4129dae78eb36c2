//! Scene geometry read by the picking job, and the gatherer that flattens the scene hierarchy.

use bevy_ecs::{prelude::*, system::SystemParam};
use bevy_hierarchy::Children;
use bevy_math::Vec3;
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;

use bevy_object_picker_core::picker::ObjectPicker;

/// Marks the root of a pickable scene.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component, Default)]
pub struct SceneRoot;

/// Hides an entity and all of its descendants from picking. Their geometry is never tested and
/// pickers below it are never notified.
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component, Default)]
pub struct PickingDisabled;

/// World space bounding volume of an entity. Entities without one are never hit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub enum PickBounds {
    /// A bounding sphere.
    Sphere {
        /// Center in world space.
        center: Vec3,
        /// Radius in world units.
        radius: f32,
    },
    /// An axis aligned bounding box.
    Aabb {
        /// Minimum corner in world space.
        min: Vec3,
        /// Maximum corner in world space.
        max: Vec3,
    },
}

impl PickBounds {
    /// A sphere at `center`.
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    /// A box centered at `center`, extending `half_size` along each axis.
    pub fn aabb(center: Vec3, half_size: Vec3) -> Self {
        Self::Aabb {
            min: center - half_size,
            max: center + half_size,
        }
    }
}

/// Local space triangles of an entity, placed in the world by its [`GlobalTransform`]. Only
/// tested with [`PickMethod::TrianglePicking`](bevy_object_picker_core::settings::PickMethod).
#[derive(Component, Debug, Default, Clone, PartialEq, Reflect)]
#[reflect(Component, Default)]
pub struct TriangleList {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex indices, three per triangle. Front faces are counter-clockwise.
    pub indices: Vec<[u32; 3]>,
}

impl TriangleList {
    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if there are no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The vertex positions of triangle `index`, or `None` if it refers to a missing vertex.
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.indices.get(index)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }

    /// A box centered on the origin with outward facing triangles.
    pub fn cuboid(half_size: Vec3) -> Self {
        // Corner `i` takes the positive half size on x for bit 0, y for bit 1, z for bit 2.
        let positions = (0..8)
            .map(|i| {
                let sign = |bit: u32| if i & (1 << bit) == 0 { -1.0 } else { 1.0 };
                Vec3::new(sign(0), sign(1), sign(2)) * half_size
            })
            .collect();
        let indices = vec![
            [4, 5, 7],
            [4, 7, 6],
            [0, 2, 3],
            [0, 3, 1],
            [1, 3, 7],
            [1, 7, 5],
            [0, 4, 6],
            [0, 6, 2],
            [2, 6, 7],
            [2, 7, 3],
            [0, 1, 5],
            [0, 5, 4],
        ];
        Self { positions, indices }
    }
}

/// An entity found below a [`SceneRoot`], with everything needed to pick it.
#[derive(Debug, Clone, Copy)]
pub struct GatheredEntity<'a> {
    /// The entity.
    pub entity: Entity,
    /// The entity itself if it carries an [`ObjectPicker`], otherwise its nearest ancestor that
    /// does.
    pub owner: Option<Entity>,
    /// Whether the owning picker is enabled.
    pub owner_enabled: bool,
    /// World transform, identity if missing.
    pub transform: GlobalTransform,
    /// World space bounds.
    pub bounds: Option<PickBounds>,
    /// Local space triangles.
    pub triangles: Option<&'a TriangleList>,
}

#[derive(Clone, Copy)]
struct Owner {
    entity: Entity,
    enabled: bool,
}

/// Flattens the scene hierarchy below every [`SceneRoot`].
#[derive(SystemParam)]
pub struct EntityGatherer<'w, 's> {
    roots: Query<'w, 's, Entity, With<SceneRoot>>,
    nodes: Query<
        'w,
        's,
        (
            Option<&'static Children>,
            Option<&'static GlobalTransform>,
            Option<&'static PickBounds>,
            Option<&'static TriangleList>,
            Has<PickingDisabled>,
        ),
    >,
}

impl<'w, 's> EntityGatherer<'w, 's> {
    /// Returns every entity below the scene roots, roots included, depth first in child order.
    /// Entities without a picker are included so their hits can be attributed to an ancestor.
    pub fn gather<'a>(&'a self, pickers: &Query<&mut ObjectPicker>) -> Vec<GatheredEntity<'a>> {
        let mut entities = Vec::new();
        for root in &self.roots {
            self.visit(root, None, pickers, &mut entities);
        }
        entities
    }

    fn visit<'a>(
        &'a self,
        entity: Entity,
        owner: Option<Owner>,
        pickers: &Query<&mut ObjectPicker>,
        entities: &mut Vec<GatheredEntity<'a>>,
    ) {
        let Ok((children, transform, bounds, triangles, disabled)) = self.nodes.get(entity) else {
            return;
        };
        if disabled {
            return;
        }
        let owner = match pickers.get(entity) {
            Ok(picker) => Some(Owner {
                entity,
                enabled: picker.enabled,
            }),
            Err(_) => owner,
        };
        entities.push(GatheredEntity {
            entity,
            owner: owner.map(|owner| owner.entity),
            owner_enabled: owner.is_some_and(|owner| owner.enabled),
            transform: transform.copied().unwrap_or(GlobalTransform::IDENTITY),
            bounds: bounds.copied(),
            triangles,
        });
        if let Some(children) = children {
            for &child in children.iter() {
                self.visit(child, owner, pickers, entities);
            }
        }
    }
}
