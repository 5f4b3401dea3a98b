//! Simulation clock и headless аниматор

use bevy::prelude::*;

use crate::ai::config::AiBehaviorsConfig;
use crate::ai::context::SimClock;
use crate::components::Animator;

/// Система: продвинуть SimClock на один fixed тик
///
/// Headless симуляция не различает simulation и real time: оба идут
/// шагом 1 / tick_hz (повторяемо между прогонами с одним seed).
pub fn advance_sim_clock(config: Res<AiBehaviorsConfig>, mut clock: ResMut<SimClock>) {
    clock.advance(config.tick_delta());
}

/// Система: продвинуть клипы Animator
pub fn advance_animators(clock: Res<SimClock>, mut animators: Query<&mut Animator>) {
    for mut animator in animators.iter_mut() {
        animator.advance(clock.delta);
    }
}
