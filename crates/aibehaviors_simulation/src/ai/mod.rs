//! AI decision-making module
//!
//! AIBehaviors FSM: набор состояний (Seek, Attack, GetHelp, Help, Idle)
//! с общим lifecycle (init → reason/action → end), triggers и
//! кэшируемым поиском объектов по тегам.
//!
//! Core (state, trigger, finder, states) не зависит от ECS: всё общение с
//! миром идёт через `host::AiHost`. Bevy хост (`systems::WorldHost`) и
//! plugin живут здесь же.

use bevy::prelude::*;

pub mod behaviors;
pub mod config;
pub mod context;
pub mod events;
pub mod finder;
pub mod host;
pub mod navigation;
pub mod spawn;
pub mod state;
pub mod states;
pub mod systems;
pub mod trigger;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
mod finder_tests;

// Re-export основных типов
pub use behaviors::AIBehaviors;
pub use config::AiBehaviorsConfig;
pub use context::{AiContext, SimClock};
pub use events::{
    update_ai_events, AiMessage, AnimationRequested, AttackPerformed, AudioRequested, ItemSpawned,
};
pub use finder::{CachePoint, TaggedObjectFinder};
pub use host::{AiHost, FoundObject, NavigationService, SceneQuery};
pub use navigation::{NavMesh, NavPath, PathRequestId, PathStatus};
pub use spawn::{ItemSpawnMode, ItemSpawnSettings};
pub use state::{AiState, AnimationState, AudioSettings, StateBehavior, StateId, StateSettings};
pub use states::{
    AttackState, AttackTiming, Cooldown, GetHelpState, HelpState, IdleState, SeekState, StateKind,
};
pub use trigger::{Trigger, TriggerKind, TriggerPredicate};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. advance_sim_clock: SimClock += 1 / tick_hz
/// 2. run_ai_behaviors: тик FSM каждого AI (exclusive)
/// 3. resolve_path_requests: пути, запрошенные на этом тике
/// 4. apply_movement_commands: MovementCommand → Transform
/// 5. advance_animators: normalized time клипов
pub struct AiBehaviorsPlugin;

impl Plugin for AiBehaviorsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AiBehaviorsConfig>()
            .init_resource::<SimClock>()
            .init_resource::<NavMesh>()
            .add_event::<AudioRequested>()
            .add_event::<AnimationRequested>()
            .add_event::<AiMessage>()
            .add_event::<AttackPerformed>()
            .add_event::<ItemSpawned>()
            .add_systems(
                FixedUpdate,
                (
                    systems::advance_sim_clock,
                    systems::run_ai_behaviors,
                    systems::resolve_path_requests,
                    systems::apply_movement_commands,
                    systems::advance_animators,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
