//! Runtime configuration of the picking job.

use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;

use crate::hit::FaceOrientation;

/// How rays are tested against scene entities.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PickMethod {
    /// Test against the entity's bounding sphere or box only.
    #[default]
    BoundingVolumePicking,
    /// Use the bounding volume as a coarse reject, then test every triangle of the entity.
    TrianglePicking,
}

/// Which hits of a ray are reported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PickResultMode {
    /// Only the single nearest hit across the whole scene.
    #[default]
    NearestPick,
    /// Every hit, sorted from nearest to farthest.
    AllPicks,
}

/// Which triangle faces can be hit in [`PickMethod::TrianglePicking`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum FaceOrientationPickingMode {
    /// Triangles wound counter-clockwise as seen from the ray origin.
    #[default]
    FrontFace,
    /// Triangles wound clockwise as seen from the ray origin.
    BackFace,
    /// Both sides. A ray crossing a closed mesh hits it twice.
    FrontAndBackFace,
}

impl FaceOrientationPickingMode {
    /// Returns `true` if a hit on a face with this `orientation` should be kept.
    #[inline]
    pub fn accepts(&self, orientation: FaceOrientation) -> bool {
        match self {
            Self::FrontFace => orientation == FaceOrientation::Front,
            Self::BackFace => orientation == FaceOrientation::Back,
            Self::FrontAndBackFace => true,
        }
    }
}

/// A resource used to configure the picking job. It is read once at the start of every job run,
/// so changes take effect on the next frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Resource, Default)]
pub struct PickingSettings {
    /// When `false`, the picking job does not run and queued inputs stay unread.
    pub is_enabled: bool,
    /// See [`PickMethod`].
    pub pick_method: PickMethod,
    /// See [`PickResultMode`].
    pub result_mode: PickResultMode,
    /// See [`FaceOrientationPickingMode`].
    pub face_orientation: FaceOrientationPickingMode,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            pick_method: PickMethod::default(),
            result_mode: PickResultMode::default(),
            face_orientation: FaceOrientationPickingMode::default(),
        }
    }
}

impl PickingSettings {
    /// Run condition: returns `true` if picking is enabled.
    pub fn is_enabled(state: Res<Self>) -> bool {
        state.is_enabled
    }
}
