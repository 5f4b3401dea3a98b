//! Конкретные состояния AI
//!
//! Закрытый набор вариантов (StateKind), каждый реализует StateBehavior.

use bevy::prelude::*;

use crate::ai::context::{AiContext, SimClock};
use crate::ai::finder::TaggedObjectFinder;
use crate::ai::state::{StateBehavior, StateView};
use crate::error::AiConfigError;

pub mod attack;
pub mod cooldown;
pub mod get_help;
pub mod help;
pub mod idle;
pub mod seek;

#[cfg(test)]
mod help_tests;

pub use attack::{AttackState, AttackTiming};
pub use cooldown::Cooldown;
pub use get_help::{GetHelpState, GET_HELP_MESSAGE};
pub use help::HelpState;
pub use idle::IdleState;
pub use seek::{SeekState, NO_MOVEMENT_EPSILON};

#[derive(Debug)]
pub enum StateKind {
    Idle(IdleState),
    Seek(SeekState),
    Attack(AttackState),
    GetHelp(GetHelpState),
    Help(HelpState),
}

impl StateKind {
    fn as_behavior(&self) -> &dyn StateBehavior {
        match self {
            Self::Idle(state) => state,
            Self::Seek(state) => state,
            Self::Attack(state) => state,
            Self::GetHelp(state) => state,
            Self::Help(state) => state,
        }
    }

    fn as_behavior_mut(&mut self) -> &mut dyn StateBehavior {
        match self {
            Self::Idle(state) => state,
            Self::Seek(state) => state,
            Self::Attack(state) => state,
            Self::GetHelp(state) => state,
            Self::Help(state) => state,
        }
    }
}

impl StateBehavior for StateKind {
    fn init(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        self.as_behavior_mut().init(state, ctx)
    }

    fn reason(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool {
        self.as_behavior_mut().reason(state, ctx)
    }

    fn action(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        self.as_behavior_mut().action(state, ctx)
    }

    fn state_ended(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        self.as_behavior_mut().state_ended(state, ctx)
    }

    fn next_movement(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> Vec3 {
        self.as_behavior_mut().next_movement(state, ctx)
    }

    fn default_display_name(&self) -> &'static str {
        self.as_behavior().default_display_name()
    }

    fn plays_animation(&self) -> bool {
        self.as_behavior().plays_animation()
    }

    fn rotates_toward_target(&self) -> bool {
        self.as_behavior().rotates_toward_target()
    }

    fn can_switch_to_state(&self, clock: &SimClock) -> bool {
        self.as_behavior().can_switch_to_state(clock)
    }

    fn validate(&self, state_name: &str) -> Vec<AiConfigError> {
        self.as_behavior().validate(state_name)
    }
}

/// Доступ к конкретному варианту (GetState<T>)
pub trait StateVariant: StateBehavior + Sized {
    fn from_kind(kind: &StateKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut StateKind) -> Option<&mut Self>;
}

macro_rules! state_variant {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for StateKind {
            fn from(state: $ty) -> Self {
                StateKind::$variant(state)
            }
        }

        impl StateVariant for $ty {
            fn from_kind(kind: &StateKind) -> Option<&Self> {
                match kind {
                    StateKind::$variant(state) => Some(state),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut StateKind) -> Option<&mut Self> {
                match kind {
                    StateKind::$variant(state) => Some(state),
                    _ => None,
                }
            }
        }
    };
}

state_variant!(IdleState, Idle);
state_variant!(SeekState, Seek);
state_variant!(AttackState, Attack);
state_variant!(GetHelpState, GetHelp);
state_variant!(HelpState, Help);

/// Ближайший (по квадрату расстояния) живой объект finder'а
///
/// Равные расстояния: побеждает первый в порядке finder'а.
/// Сам AI в кандидаты не попадает.
pub fn nearest_object(finder: &TaggedObjectFinder, ctx: &AiContext<'_>) -> Option<(Entity, Vec3)> {
    let own_entity = ctx.host.entity();
    let position = ctx.host.position();

    let mut nearest = f32::INFINITY;
    let mut selected = None;

    for found in finder.objects() {
        if found.entity == own_entity {
            continue;
        }
        let Some(candidate) = ctx.host.position_of(found.entity) else {
            continue;
        };

        let sqr_distance = (candidate - position).length_squared();
        if sqr_distance < nearest {
            nearest = sqr_distance;
            selected = Some((found.entity, candidate));
        }
    }

    selected
}
