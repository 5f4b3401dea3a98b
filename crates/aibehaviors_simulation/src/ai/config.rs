//! AiBehaviorsConfig: настройки симуляции AI

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::states::seek::{SeekState, DEFAULT_PATH_CHECK_INTERVAL};

/// Параметры AI симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiBehaviorsConfig {
    /// Частота FixedUpdate (тиков в секунду)
    pub tick_hz: f64,
    /// Seed DeterministicRng
    pub rng_seed: u64,
    /// Интервал пересчёта невалидного пути (секунды real time)
    pub path_check_interval: f32,
}

impl Default for AiBehaviorsConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0, // 60Hz (легче считать интервалы)
            rng_seed: 42,
            path_check_interval: DEFAULT_PATH_CHECK_INTERVAL,
        }
    }
}

impl AiBehaviorsConfig {
    /// Длительность одного тика (секунды)
    pub fn tick_delta(&self) -> f32 {
        if self.tick_hz <= 0.0 {
            0.0
        } else {
            (1.0 / self.tick_hz) as f32
        }
    }

    /// SeekState с интервалом пересчёта пути из конфига
    pub fn seek_state(&self) -> SeekState {
        SeekState::default().with_path_check_interval(self.path_check_interval)
    }
}
