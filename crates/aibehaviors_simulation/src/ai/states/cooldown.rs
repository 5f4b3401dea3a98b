//! Cooldown: состояние недоступно для перехода, пока не прошёл cooldown

use serde::{Deserialize, Serialize};

use crate::ai::context::SimClock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cooldown {
    /// Секунды simulation time после выхода из состояния
    pub cooldown_time: f32,
    #[serde(skip)]
    last_used_time: Option<f32>,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl Cooldown {
    pub fn new(cooldown_time: f32) -> Self {
        Self {
            cooldown_time,
            last_used_time: None,
        }
    }

    pub fn is_ready(&self, clock: &SimClock) -> bool {
        self.last_used_time
            .map_or(true, |used| clock.time >= used + self.cooldown_time)
    }

    /// Оставшееся время cooldown (0.0 если готов)
    pub fn remaining(&self, clock: &SimClock) -> f32 {
        self.last_used_time
            .map_or(0.0, |used| (used + self.cooldown_time - clock.time).max(0.0))
    }

    pub fn start(&mut self, clock: &SimClock) {
        self.last_used_time = Some(clock.time);
    }
}
