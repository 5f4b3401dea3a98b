//! AIBehaviors Simulation Core
//!
//! Finite-state-machine AI для NPC поверх Bevy 0.16 ECS (headless).
//!
//! Слои:
//! - ai core: состояния, triggers, finder (engine-agnostic, через AiHost)
//! - Bevy host: WorldHost, компоненты, системы, AiBehaviorsPlugin
//! - Движок (рендер, физика, navmesh) подключается через те же компоненты/events

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod error;
pub mod item_system;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{AIBehaviors, AiBehaviorsConfig, AiBehaviorsPlugin, AiState, SimClock, StateId};
pub use components::*;
pub use error::AiConfigError;
pub use item_system::{ItemId, SpawnedItem, ITEM_TAG};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};

/// Главный plugin симуляции
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: AiBehaviorsConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep (tick_hz) для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            // Детерминистичный RNG
            .insert_resource(DeterministicRng::new(self.config.rng_seed))
            .insert_resource(self.config.clone())
            .add_plugins(AiBehaviorsPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Единственный источник случайности AI: анимации, item spawn, timer jitter.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один fixed тик вручную (без ожидания real time)
///
/// Headless тесты и runner крутят FixedUpdate напрямую: результат не
/// зависит от скорости машины. После тика в Events лежат события этого
/// и предыдущего тика.
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    ai::update_ai_events(world);
    world.run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
