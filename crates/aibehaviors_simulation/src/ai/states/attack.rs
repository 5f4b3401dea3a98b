//! AttackState: атака ближайшей цели
//!
//! Два режима тайминга:
//! - Interval: атака раз в reload_time секунд
//! - AnimationPoint ("mecanim"): атака в момент, когда normalized time
//!   атакующей анимации пересекает attack_point

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::context::AiContext;
use crate::ai::host::AttackData;
use crate::ai::state::{StateBehavior, StateView};
use crate::ai::states::nearest_object;
use crate::ai::StateId;
use crate::error::AiConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackTiming {
    Interval { reload_time: f32 },
    /// attack_point: normalized time (0..1) внутри клипа атаки
    AnimationPoint { attack_point: f32, layer: usize },
}

impl Default for AttackTiming {
    fn default() -> Self {
        Self::Interval { reload_time: 1.0 }
    }
}

#[derive(Debug, Clone)]
pub struct AttackState {
    pub damage: u32,
    pub attack_range: f32,
    pub timing: AttackTiming,
    pub no_target_state: Option<StateId>,
    pub target_out_of_range_state: Option<StateId>,

    target: Option<Entity>,
    reload_timer: f32,
    prev_normalized_time: f32,
    animator_warned: bool,
}

impl Default for AttackState {
    fn default() -> Self {
        Self {
            damage: 10,
            attack_range: 2.0,
            timing: AttackTiming::default(),
            no_target_state: None,
            target_out_of_range_state: None,
            target: None,
            reload_timer: 0.0,
            prev_normalized_time: 0.0,
            animator_warned: false,
        }
    }
}

impl AttackState {
    /// Атака по animation point (аналог MecanimAttackState)
    pub fn animation_point(attack_point: f32, layer: usize) -> Self {
        Self {
            timing: AttackTiming::AnimationPoint { attack_point, layer },
            ..Self::default()
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_range(mut self, attack_range: f32) -> Self {
        self.attack_range = attack_range;
        self
    }

    pub fn with_timing(mut self, timing: AttackTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn on_no_target(mut self, state: StateId) -> Self {
        self.no_target_state = Some(state);
        self
    }

    pub fn on_out_of_range(mut self, state: StateId) -> Self {
        self.target_out_of_range_state = Some(state);
        self
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    fn perform_attack(&self, target: Entity, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        let attacker = ctx.host.entity();
        ctx.host.attack(AttackData {
            attacker,
            target,
            damage: self.damage,
        });
        state.play_audio(ctx);

        crate::log(&format!(
            "AI: {:?} '{}' attacks {:?} ({} damage)",
            attacker, state.name, target, self.damage
        ));
    }

    /// HandleAnimationAttackMode: атака на восходящем пересечении attack_point
    fn handle_animation_attack(
        &mut self,
        target: Entity,
        attack_point: f32,
        layer: usize,
        state: &StateView<'_>,
        ctx: &mut AiContext<'_>,
    ) {
        let Some(progress) = ctx.host.current_animation(layer) else {
            if !self.animator_warned {
                self.animator_warned = true;
                crate::log_warning(
                    &AiConfigError::MissingAnimator {
                        state: state.name.to_string(),
                    }
                    .to_string(),
                );
            }
            return;
        };

        let Some(attack_animation) = state.settings.animation_states.first() else {
            return;
        };

        if progress.name != attack_animation.name {
            return;
        }

        let current = progress.normalized_time % 1.0;
        if current > attack_point && self.prev_normalized_time < attack_point {
            self.perform_attack(target, state, ctx);
        }
        self.prev_normalized_time = current;
    }
}

impl StateBehavior for AttackState {
    fn init(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {
        self.target = None;
        self.reload_timer = 0.0;
        self.prev_normalized_time = 0.0;
    }

    fn reason(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool {
        let Some((target, position)) = nearest_object(state.finder, ctx) else {
            self.target = None;
            return !state.transition_to(self.no_target_state, "no attack target", ctx);
        };
        self.target = Some(target);

        let sqr_distance = (position - ctx.host.position()).length_squared();
        if sqr_distance > self.attack_range * self.attack_range {
            return !state.transition_to(self.target_out_of_range_state, "attack target out of range", ctx);
        }

        true
    }

    fn action(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        let Some(target) = self.target else {
            return;
        };
        if ctx.host.position_of(target).is_none() {
            self.target = None;
            return;
        }

        match self.timing {
            AttackTiming::Interval { reload_time } => {
                self.reload_timer -= state.delta_time;
                if self.reload_timer <= 0.0 {
                    self.perform_attack(target, state, ctx);
                    self.reload_timer = reload_time;
                }
            }
            AttackTiming::AnimationPoint { attack_point, layer } => {
                self.handle_animation_attack(target, attack_point, layer, state, ctx);
            }
        }
    }

    fn state_ended(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {
        self.target = None;
    }

    fn next_movement(&mut self, _state: &StateView<'_>, ctx: &mut AiContext<'_>) -> Vec3 {
        self.target
            .and_then(|target| ctx.host.position_of(target))
            .unwrap_or_else(|| ctx.host.position())
    }

    fn default_display_name(&self) -> &'static str {
        match self.timing {
            AttackTiming::Interval { .. } => "Attack",
            AttackTiming::AnimationPoint { .. } => "Mecanim Attack",
        }
    }

    fn rotates_toward_target(&self) -> bool {
        true
    }

    fn validate(&self, state_name: &str) -> Vec<AiConfigError> {
        if self.no_target_state.is_none() {
            vec![AiConfigError::MissingTransition {
                state: state_name.to_string(),
                transition: "no attack target",
            }]
        } else {
            Vec::new()
        }
    }
}
