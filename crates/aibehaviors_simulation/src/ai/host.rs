//! Host interfaces: узкий интерфейс между AI core и движком
//!
//! AI core не знает ни про ECS, ни про физику, ни про аниматор.
//! Всё, что состояние может сделать с миром, проходит через эти traits:
//! - SceneQuery: find-by-tag
//! - NavigationService: async расчёт пути (fire-and-forget)
//! - AiHost: движение, анимация, аудио, атака, spawn/destroy
//!
//! Reference реализация поверх Bevy World: `ai::systems::fsm::WorldHost`.

use bevy::prelude::*;

use crate::ai::navigation::{NavPath, PathRequestId};
use crate::ai::state::AnimationState;
use crate::components::Health;
use crate::item_system::ItemId;

/// Объект, найденный по тегу (entity + позиция на момент запроса)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoundObject {
    pub entity: Entity,
    pub position: Vec3,
}

/// Scene query service (find-by-tag)
pub trait SceneQuery {
    /// Все объекты с тегом, в стабильном порядке
    fn find_with_tag(&mut self, tag: &str) -> Vec<FoundObject>;
}

/// Navigation pathing service
///
/// Запрос пути не блокирует: результат появляется на одном из следующих тиков.
/// Результат для запроса, который никто не забрал, просто теряется.
pub trait NavigationService {
    /// Есть ли у AI navigation agent (без него get-as-close режим недоступен)
    fn has_navigation_agent(&self) -> bool;

    /// Запросить пересчёт пути до target. None: агента нет.
    fn request_path(&mut self, target: Vec3) -> Option<PathRequestId>;

    /// Забрать готовый путь (None: ещё не посчитан или уже забран)
    fn take_path(&mut self, request: PathRequestId) -> Option<NavPath>;
}

/// Аудио запрос (pitch jitter уже применён)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRequest {
    pub clip: String,
    pub volume: f32,
    pub pitch: f32,
    pub looped: bool,
}

/// Прогресс текущей анимации на слое аниматора
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationProgress {
    pub name: String,
    /// Normalized time (1.0 = один полный проигрыш клипа, растёт дальше при loop)
    pub normalized_time: f32,
}

/// Данные атаки (передаются хосту, урон применяет хост)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackData {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Host primitives, доступные состояниям
pub trait AiHost: SceneQuery + NavigationService {
    /// Entity этого AI
    fn entity(&self) -> Entity;

    /// Текущая позиция AI
    fn position(&self) -> Vec3;

    /// Позиция другого объекта. None: объект уничтожен (weak handle).
    fn position_of(&self, target: Entity) -> Option<Vec3>;

    /// Двигать/поворачивать AI к точке с ограниченными скоростями
    fn move_agent(&mut self, target: Vec3, speed: f32, rotation_speed: f32);

    fn play_animation(&mut self, animation: &AnimationState);

    fn play_audio(&mut self, audio: AudioRequest);

    /// Текущая анимация на слое (None: аниматора нет)
    fn current_animation(&self, layer: usize) -> Option<AnimationProgress>;

    fn health(&self) -> Option<Health>;

    fn attack(&mut self, attack: AttackData);

    fn destroy(&mut self, target: Entity);

    fn spawn_item(&mut self, item: &ItemId, position: Vec3);

    /// Broadcast сообщения (аналог SendMessage, receiver не обязателен)
    fn send_message(&mut self, message: &str);

    /// Попросить другой AI перейти в HelpState. true: helper откликнулся.
    fn request_help(&mut self, helper: Entity, help_point: Vec3) -> bool;
}
