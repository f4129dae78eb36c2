//! Ray intersection against bounding volumes and triangles.

use bevy_ecs::entity::Entity;
use bevy_math::{
    bounding::{Aabb3d, BoundingSphere, RayCast3d},
    Affine3A, Ray3d, Vec3,
};

use bevy_object_picker_core::{
    hit::{FaceOrientation, TriangleHit},
    settings::{PickMethod, PickingSettings},
};

use crate::scene::{GatheredEntity, PickBounds};

/// One hit of a ray against one entity, before it is attributed to a picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHit {
    /// Distance along the ray.
    pub distance: f32,
    /// Hit position in world space.
    pub world_point: Vec3,
    /// Hit position in the entity's local space.
    pub local_point: Vec3,
    /// Set for triangle hits.
    pub triangle: Option<TriangleHit>,
    /// Side of the surface that was hit.
    pub face: FaceOrientation,
}

/// The hits of a ray against one gathered entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHits {
    /// The entity that was hit.
    pub entity: Entity,
    /// The owning picker, see [`GatheredEntity::owner`].
    pub picker: Option<Entity>,
    /// Whether the owning picker is enabled.
    pub picker_enabled: bool,
    /// Hits in triangle order.
    pub hits: Vec<RawHit>,
}

/// A triangle in world space, counter-clockwise when seen from its front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// The three corners.
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Moves local space `vertices` into the world.
    pub fn placed(vertices: [Vec3; 3], world_from_local: &Affine3A) -> Self {
        Self {
            vertices: vertices.map(|vertex| world_from_local.transform_point3(vertex)),
        }
    }
}

/// Where a ray crosses a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleIntersection {
    /// Distance along the ray.
    pub distance: f32,
    /// Barycentric weights of the three vertices, in order.
    pub uvw: Vec3,
    /// [`FaceOrientation::Front`] if the triangle is counter-clockwise seen from the ray origin.
    pub face: FaceOrientation,
}

/// Implementation of the Möller-Trumbore ray-triangle intersection test. Both faces are hit; the
/// caller filters on [`TriangleIntersection::face`].
pub fn ray_triangle(ray: &Ray3d, triangle: &Triangle) -> Option<TriangleIntersection> {
    // Source: https://www.scratchapixel.com/lessons/3d-basic-rendering/ray-tracing-rendering-a-triangle/moller-trumbore-ray-triangle-intersection
    let epsilon: f32 = 0.000001;
    let direction = *ray.direction;
    let [v0, v1, v2] = triangle.vertices;
    let vector_v0_to_v1: Vec3 = v1 - v0;
    let vector_v0_to_v2: Vec3 = v2 - v0;
    let p_vec: Vec3 = direction.cross(vector_v0_to_v2);
    let determinant: f32 = vector_v0_to_v1.dot(p_vec);

    // ray and triangle are parallel if det is close to 0
    if determinant.abs() < epsilon {
        return None;
    }
    let face = if determinant > 0.0 {
        FaceOrientation::Front
    } else {
        FaceOrientation::Back
    };

    let determinant_inverse = 1.0 / determinant;

    let t_vec: Vec3 = ray.origin - v0;
    let u = t_vec.dot(p_vec) * determinant_inverse;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q_vec = t_vec.cross(vector_v0_to_v1);
    let v = direction.dot(q_vec) * determinant_inverse;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    // The distance between ray origin and intersection is t.
    let t: f32 = vector_v0_to_v2.dot(q_vec) * determinant_inverse;
    if t < 0.0 {
        return None;
    }

    Some(TriangleIntersection {
        distance: t,
        uvw: Vec3::new(1.0 - u - v, u, v),
        face,
    })
}

impl PickBounds {
    /// Entry distance of `ray` into the volume, zero if the ray starts inside it.
    pub fn intersect(&self, ray: &Ray3d) -> Option<f32> {
        let cast = RayCast3d::from_ray(*ray, f32::MAX);
        match *self {
            PickBounds::Sphere { center, radius } => {
                cast.sphere_intersection_at(&BoundingSphere::new(center, radius))
            }
            PickBounds::Aabb { min, max } => {
                cast.aabb_intersection_at(&Aabb3d::new((min + max) / 2.0, (max - min) / 2.0))
            }
        }
    }
}

/// Tests `ray` against one entity.
///
/// Entities without bounds are never hit. With triangle picking, the bounds only reject rays
/// early: every accepted triangle crossing produces its own hit, and entities without triangles
/// are never hit.
pub fn intersect(ray: &Ray3d, entity: &GatheredEntity, settings: &PickingSettings) -> Vec<RawHit> {
    let Some(bounds) = entity.bounds else {
        return Vec::new();
    };
    let Some(distance) = bounds.intersect(ray) else {
        return Vec::new();
    };
    let local_from_world = entity.transform.affine().inverse();

    match settings.pick_method {
        PickMethod::BoundingVolumePicking => {
            let world_point = ray.get_point(distance);
            vec![RawHit {
                distance,
                world_point,
                local_point: local_from_world.transform_point3(world_point),
                triangle: None,
                face: FaceOrientation::Front,
            }]
        }
        PickMethod::TrianglePicking => {
            let Some(triangles) = entity.triangles else {
                return Vec::new();
            };
            let world_from_local = entity.transform.affine();
            let mut hits = Vec::new();
            for index in 0..triangles.len() {
                let Some(vertices) = triangles.triangle(index) else {
                    continue;
                };
                let triangle = Triangle::placed(vertices, &world_from_local);
                let Some(hit) = ray_triangle(ray, &triangle) else {
                    continue;
                };
                if !settings.face_orientation.accepts(hit.face) {
                    continue;
                }
                let world_point = ray.get_point(hit.distance);
                hits.push(RawHit {
                    distance: hit.distance,
                    world_point,
                    local_point: local_from_world.transform_point3(world_point),
                    triangle: Some(TriangleHit {
                        index,
                        vertices: triangles.indices[index],
                        uvw: hit.uvw,
                    }),
                    face: hit.face,
                });
            }
            hits
        }
    }
}

/// Tests `ray` against every gathered entity, keeping only entities that were hit.
pub fn intersect_all(
    ray: &Ray3d,
    entities: &[GatheredEntity],
    settings: &PickingSettings,
) -> Vec<EntityHits> {
    entities
        .iter()
        .filter_map(|entity| {
            let hits = intersect(ray, entity, settings);
            (!hits.is_empty()).then(|| EntityHits {
                entity: entity.entity,
                picker: entity.owner,
                picker_enabled: entity.owner_enabled,
                hits,
            })
        })
        .collect()
}
