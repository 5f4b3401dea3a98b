//! World компоненты: теги объектов для scene query

use bevy::prelude::*;

/// Тег объекта (аналог GameObject tag)
///
/// TaggedObjectFinder ищет объекты по значению тега через SceneQuery.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct ObjectTag(pub String);

impl ObjectTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }
}

impl From<&str> for ObjectTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}
