//! TaggedObjectFinder: поиск объектов по тегам с кэшированием
//!
//! Scene query по тегу дорогой, поэтому результат кэшируется и
//! пересчитывается только в объявленной cache point:
//! - OnLoad: один раз при загрузке FSM
//! - StateChanged: при каждой смене состояния
//! - EveryFrame: каждый reasoning tick (не чаще одного раза за тик)

use serde::{Deserialize, Serialize};

use crate::ai::context::SimClock;
use crate::ai::host::{FoundObject, SceneQuery};

/// Момент, в который кэш finder'а может обновиться
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CachePoint {
    OnLoad,
    StateChanged,
    #[default]
    EveryFrame,
}

pub const DEFAULT_TAG: &str = "Player";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedObjectFinder {
    /// false: состояние использует finder хоста
    pub use_custom_tags: bool,
    tags: Vec<String>,
    pub cache_point: CachePoint,
    #[serde(skip)]
    cached: Vec<FoundObject>,
    #[serde(skip)]
    last_refresh_frame: Option<u64>,
    #[serde(skip)]
    dirty: bool,
}

impl Default for TaggedObjectFinder {
    fn default() -> Self {
        Self::new(vec![DEFAULT_TAG.to_string()], CachePoint::default())
    }
}

impl TaggedObjectFinder {
    pub fn new(tags: Vec<String>, cache_point: CachePoint) -> Self {
        Self {
            use_custom_tags: false,
            tags,
            cache_point,
            cached: Vec::new(),
            last_refresh_frame: None,
            dirty: true,
        }
    }

    /// Finder, принадлежащий состоянию (не делит кэш с хостом)
    pub fn custom(tags: Vec<String>, cache_point: CachePoint) -> Self {
        Self {
            use_custom_tags: true,
            ..Self::new(tags, cache_point)
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Сменить теги. Кэш обновится в следующей cache point.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
        self.dirty = true;
    }

    /// CacheTransforms: обновить кэш, если point совпадает с cache point finder'а
    ///
    /// Возвращает true, если scene query действительно выполнялся.
    pub fn cache_transforms<S: SceneQuery + ?Sized>(
        &mut self,
        point: CachePoint,
        scene: &mut S,
        clock: &SimClock,
    ) -> bool {
        if point != self.cache_point {
            return false;
        }

        // EveryFrame: один query за тик, если теги не менялись
        if point == CachePoint::EveryFrame
            && !self.dirty
            && self.last_refresh_frame == Some(clock.frame)
        {
            return false;
        }

        self.refresh(scene, clock);
        true
    }

    /// Принудительный пересчёт (игнорирует cache point)
    pub fn refresh<S: SceneQuery + ?Sized>(&mut self, scene: &mut S, clock: &SimClock) {
        self.cached.clear();
        for tag in &self.tags {
            for found in scene.find_with_tag(tag) {
                // Объект с несколькими тегами попадает в кэш один раз
                if !self.cached.iter().any(|c| c.entity == found.entity) {
                    self.cached.push(found);
                }
            }
        }
        self.last_refresh_frame = Some(clock.frame);
        self.dirty = false;
    }

    /// GetTransforms: закэшированные объекты в порядке scene query
    pub fn objects(&self) -> &[FoundObject] {
        &self.cached
    }

    pub fn is_empty(&self) -> bool {
        self.cached.is_empty()
    }
}
