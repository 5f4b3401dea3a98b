//! Контекст lifecycle вызовов: clock, RNG, host, запрошенный переход
//!
//! Время и RNG не берутся из глобальных синглтонов движка: они явно
//! передаются в каждый lifecycle вызов (детерминизм в тестах).

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::host::AiHost;
use crate::ai::StateId;

/// Simulation clock
///
/// - time: simulation time (секунды, FixedUpdate)
/// - real_time: реальное время с момента старта (rate limiting path recalculation)
/// - frame: номер тика (cache point EveryFrame идемпотентен в пределах тика)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    pub time: f32,
    pub real_time: f32,
    pub delta: f32,
    pub frame: u64,
}

impl SimClock {
    /// Продвинуть clock на один тик (real time идёт вместе с simulation time)
    pub fn advance(&mut self, delta: f32) {
        self.advance_with_real(delta, delta);
    }

    pub fn advance_with_real(&mut self, delta: f32, real_delta: f32) {
        self.delta = delta;
        self.time += delta;
        self.real_time += real_delta;
        self.frame += 1;
    }
}

/// Контекст одного lifecycle вызова
///
/// Состояние не может переключить FSM напрямую (FSM заимствована на время
/// вызова), поэтому переход запрашивается и применяется хостом после хука.
pub struct AiContext<'a> {
    pub host: &'a mut dyn AiHost,
    pub clock: SimClock,
    pub rng: &'a mut ChaCha8Rng,
    transition: Option<StateId>,
}

impl<'a> AiContext<'a> {
    pub fn new(host: &'a mut dyn AiHost, clock: SimClock, rng: &'a mut ChaCha8Rng) -> Self {
        Self {
            host,
            clock,
            rng,
            transition: None,
        }
    }

    /// ChangeActiveState: последний запрос за вызов побеждает
    pub fn change_active_state(&mut self, target: StateId) {
        self.transition = Some(target);
    }

    pub fn requested_transition(&self) -> Option<StateId> {
        self.transition
    }

    pub fn take_transition(&mut self) -> Option<StateId> {
        self.transition.take()
    }
}
