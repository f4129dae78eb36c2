//! Pick results produced by a backend and consumed by the
//! [`PickerState`](crate::dispatch::PickerState).

use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use bevy_reflect::prelude::*;

/// Which side of a surface a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum FaceOrientation {
    /// The surface faces the ray origin. Bounding volume hits are always front hits.
    Front,
    /// The ray hit the surface from behind.
    Back,
}

/// Details of a ray/triangle hit.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TriangleHit {
    /// Position of the triangle in the entity's triangle list.
    pub index: usize,
    /// Vertex indices of the triangle.
    pub vertices: [u32; 3],
    /// Barycentric coordinates of the hit, weighting the three vertices in order.
    pub uvw: Vec3,
}

/// One ray hit attributed to an object picker.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PickResult {
    /// The entity whose geometry was hit.
    pub entity: Entity,
    /// The entity owning the [`ObjectPicker`](crate::picker::ObjectPicker) the hit is reported
    /// to. Either `entity` itself or its nearest ancestor with a picker.
    pub picker: Entity,
    /// Distance from the ray origin, in world units.
    pub distance: f32,
    /// Hit position in world space.
    pub world_point: Vec3,
    /// Hit position in the local space of `entity`.
    pub local_point: Vec3,
    /// Set for triangle picking hits.
    pub triangle: Option<TriangleHit>,
    /// Which side of the surface was hit.
    pub face: FaceOrientation,
}
