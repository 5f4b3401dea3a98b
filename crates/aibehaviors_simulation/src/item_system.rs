//! Item System: предметы, которые AI спавнит при входе в состояние
//!
//! **ItemId**: ссылка на prefab предмета в пуле состояния (authoring данные).
//! **SpawnedItem**: runtime entity предмета в мире. Получает ObjectTag
//! `ITEM_TAG`, так что другие AI могут искать предметы через finder.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тег, который получают заспавненные предметы
pub const ITEM_TAG: &str = "Item";

/// Item identifier (unique string ID)
///
/// # Examples
/// - "health_kit"
/// - "ammo_box"
/// - "coin"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Предмет, заспавненный в мире
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnedItem {
    pub item: ItemId,
    /// Кто заспавнил (AI entity)
    pub spawned_by: Entity,
}
