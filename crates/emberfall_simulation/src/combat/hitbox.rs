//! Overlap query для melee ударов
//!
//! Архитектура:
//! - Удар = круг (center + radius) перед атакующим, живёт один шаг
//! - Кандидаты = entity с включённым Hurtbox
//! - Overlap если круги пересекаются (как OverlapCircle в 2D физике)
//! - Атакующий никогда не бьёт сам себя

use bevy::prelude::*;
use crate::components::Hurtbox;

/// Точка удара: позиция + reach по направлению взгляда
pub fn strike_point(position: Vec2, facing: f32, reach: f32) -> Vec2 {
    let sign = if facing < 0.0 { -1.0 } else { 1.0 };
    position + Vec2::new(sign * reach, 0.0)
}

/// Найти все hurtbox, пересекающие круг удара
///
/// Результат отсортирован по Entity index (детерминизм при одинаковом спавне).
pub fn overlapping_hurtboxes<'a>(
    center: Vec2,
    radius: f32,
    attacker: Entity,
    candidates: impl IntoIterator<Item = (Entity, Vec2, &'a Hurtbox)>,
) -> Vec<Entity> {
    let mut hits: Vec<Entity> = candidates
        .into_iter()
        .filter(|(entity, _, hurtbox)| *entity != attacker && hurtbox.enabled)
        .filter(|(_, position, hurtbox)| center.distance(*position) <= radius + hurtbox.radius)
        .map(|(entity, _, _)| entity)
        .collect();

    hits.sort_by_key(|entity| entity.index());
    hits
}

/// Transform → 2D позиция (z игнорируется)
pub fn planar(transform: &Transform) -> Vec2 {
    transform.translation.truncate()
}
