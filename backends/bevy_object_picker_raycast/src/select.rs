//! Ranks ray hits and attributes them to pickers.

use bevy_ecs::entity::Entity;

use bevy_object_picker_core::{hit::PickResult, settings::PickResultMode};

use crate::intersect::EntityHits;

fn results(hits: &[EntityHits]) -> impl Iterator<Item = PickResult> + '_ {
    hits.iter()
        .filter(|entity_hits| entity_hits.picker_enabled)
        .filter_map(|entity_hits| {
            let picker = entity_hits.picker?;
            Some(entity_hits.hits.iter().map(move |hit| PickResult {
                entity: entity_hits.entity,
                picker,
                distance: hit.distance,
                world_point: hit.world_point,
                local_point: hit.local_point,
                triangle: hit.triangle,
                face: hit.face,
            }))
        })
        .flatten()
}

fn nearest(results: impl Iterator<Item = PickResult>) -> Option<PickResult> {
    // The earlier result is kept on a tie.
    results.fold(None, |nearest, result| match nearest {
        Some(nearest) if nearest.distance <= result.distance => Some(nearest),
        _ => Some(result),
    })
}

/// Turns per-entity hits into pick results.
///
/// Hits on entities without an enabled owning picker are dropped. [`PickResultMode::NearestPick`]
/// keeps the single nearest hit, ties going to the entity gathered first.
/// [`PickResultMode::AllPicks`] keeps every hit sorted by distance, ties keeping gather order.
pub fn select(hits: &[EntityHits], mode: PickResultMode) -> Vec<PickResult> {
    match mode {
        PickResultMode::NearestPick => nearest(results(hits)).into_iter().collect(),
        PickResultMode::AllPicks => {
            let mut all: Vec<_> = results(hits).collect();
            all.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            all
        }
    }
}

/// The nearest hit on geometry owned by `picker`, used to follow a grabbed picker.
pub fn nearest_for_picker(hits: &[EntityHits], picker: Entity) -> Option<PickResult> {
    nearest(results(hits).filter(|result| result.picker == picker))
}
