//! Item spawning при входе в состояние
//!
//! Предметы спавнятся либо точно в anchor точке, либо веером вокруг неё:
//! угол зависит от индекса предмета и случайного множителя, радиус фиксирован.
//! Получается рыхлая кучка, а не стопка в одной точке.

use std::f32::consts::PI;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::context::AiContext;
use crate::error::AiConfigError;
use crate::item_system::ItemId;

/// Радиус веера по умолчанию (метры)
pub const DEFAULT_SPAWN_DISTANCE: f32 = 0.5;

/// Откуда спавнить предметы
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ItemSpawnMode {
    /// Позиция AI
    #[default]
    AiPosition,
    /// Явная точка в мире
    SpawnPoint(Vec3),
    /// Позиция другого entity
    #[serde(skip)]
    Transform(Entity),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpawnSettings {
    pub spawn_on_enter: bool,
    pub mode: ItemSpawnMode,
    /// true: все предметы точно в anchor
    pub exact_position: bool,
    pub total_amount: u32,
    pub spawn_distance: f32,
    pub spawnable_items: Vec<ItemId>,
}

impl Default for ItemSpawnSettings {
    fn default() -> Self {
        Self {
            spawn_on_enter: false,
            mode: ItemSpawnMode::default(),
            exact_position: false,
            total_amount: 1,
            spawn_distance: DEFAULT_SPAWN_DISTANCE,
            spawnable_items: Vec::new(),
        }
    }
}

/// Смещение index-го предмета из total в веере радиуса distance
///
/// radian = lerp(0, 2π, index / total), разброс ограничен π / (total + 1).
pub fn fan_offset(index: u32, total: u32, distance: f32, rng: &mut impl Rng) -> Vec3 {
    let t = if total == 0 {
        0.0
    } else {
        index as f32 / total as f32
    };
    let radian = t * PI * 2.0;
    let max_randomness = PI / (total as f32 + 1.0);
    let angle = radian * rng.gen::<f32>() * max_randomness;

    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Позиции для spawn'а относительно anchor
pub fn spawn_positions(settings: &ItemSpawnSettings, anchor: Vec3, rng: &mut impl Rng) -> Vec<Vec3> {
    (0..settings.total_amount)
        .map(|i| {
            if settings.exact_position {
                anchor
            } else {
                anchor + fan_offset(i, settings.total_amount, settings.spawn_distance, rng)
            }
        })
        .collect()
}

/// SpawnItems: случайный предмет из пула для каждой позиции
///
/// Пустой пул: warning, ничего не спавнится.
pub fn spawn_items(settings: &ItemSpawnSettings, state_name: &str, ctx: &mut AiContext<'_>) -> usize {
    if settings.spawnable_items.is_empty() {
        crate::log_warning(
            &AiConfigError::EmptyItemPool {
                state: state_name.to_string(),
            }
            .to_string(),
        );
        return 0;
    }

    let anchor = match settings.mode {
        ItemSpawnMode::AiPosition => ctx.host.position(),
        ItemSpawnMode::SpawnPoint(point) => point,
        ItemSpawnMode::Transform(entity) => match ctx.host.position_of(entity) {
            Some(position) => position,
            None => {
                crate::log_warning(
                    &AiConfigError::MissingSpawnAnchor {
                        state: state_name.to_string(),
                    }
                    .to_string(),
                );
                ctx.host.position()
            }
        },
    };

    let positions = spawn_positions(settings, anchor, ctx.rng);
    for position in &positions {
        let index = ctx.rng.gen_range(0..settings.spawnable_items.len());
        ctx.host.spawn_item(&settings.spawnable_items[index], *position);
    }

    crate::log(&format!(
        "AI: state '{}' spawned {} items at {:?}",
        state_name,
        positions.len(),
        anchor
    ));

    positions.len()
}
