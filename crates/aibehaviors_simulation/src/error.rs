//! Ошибки конфигурации AI
//!
//! Все ошибки здесь являются configuration errors. Они логируются, а операция
//! деградирует (skip / no-op). Тик симуляции никогда не прерывается.

use thiserror::Error;

use crate::ai::StateId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiConfigError {
    /// Пустой слот в списке триггеров состояния
    #[error("null trigger at index {index} in state '{state}'")]
    NullTrigger { state: String, index: usize },

    /// spawn_items_on_enter включён, но пул предметов пуст
    #[error("no items in the item list of state '{state}'")]
    EmptyItemPool { state: String },

    /// Переход не сконфигурирован (transition target == None)
    #[error("state '{state}' has no '{transition}' transition configured")]
    MissingTransition {
        state: String,
        transition: &'static str,
    },

    /// get_as_close_as_possible без navigation agent
    #[error("state '{state}' requires a navigation agent for get-as-close-as-possible mode")]
    MissingNavigationAgent { state: String },

    /// Animation-point атака без animator на хосте
    #[error("an animator is required when using the animation-point attack of state '{state}'")]
    MissingAnimator { state: String },

    #[error("state '{state}' has no animation states to play")]
    EmptyAnimationList { state: String },

    #[error("unknown state id {0:?}")]
    UnknownState(StateId),

    /// ItemSpawnMode::Transform указывает на несуществующий entity
    #[error("item spawn anchor of state '{state}' no longer exists")]
    MissingSpawnAnchor { state: String },
}
