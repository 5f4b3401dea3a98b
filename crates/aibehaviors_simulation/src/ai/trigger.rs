//! Triggers: предикаты, которые могут форсировать переход состояния
//!
//! Каждый reasoning tick состояние проверяет свои triggers по порядку.
//! Первый сработавший trigger запрашивает свой transition_state и
//! отменяет собственный Reason состояния на этом тике.

use std::fmt;

use rand::Rng;

use crate::ai::context::AiContext;
use crate::ai::finder::TaggedObjectFinder;
use crate::ai::StateId;

/// Custom predicate (пользовательские triggers)
pub trait TriggerPredicate: Send + Sync {
    fn init(&mut self, _finder: &TaggedObjectFinder, _ctx: &mut AiContext<'_>) {}

    fn evaluate(&mut self, finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) -> bool;

    fn name(&self) -> &str {
        "Custom"
    }
}

/// Вид trigger'а
pub enum TriggerKind {
    /// Ближайший найденный объект ближе distance
    WithinDistance { distance: f32 },
    /// Ни одного найденного объекта ближе distance
    BeyondDistance { distance: f32 },
    /// Срабатывает через duration ± plus_or_minus секунд после входа в состояние
    Timer {
        duration: f32,
        plus_or_minus: f32,
        deadline: f32,
    },
    /// Health ratio (current / max) ниже threshold
    LowHealth { threshold: f32 },
    /// Health ratio не ниже threshold
    HighHealth { threshold: f32 },
    Custom(Box<dyn TriggerPredicate>),
}

impl fmt::Debug for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithinDistance { distance } => {
                f.debug_struct("WithinDistance").field("distance", distance).finish()
            }
            Self::BeyondDistance { distance } => {
                f.debug_struct("BeyondDistance").field("distance", distance).finish()
            }
            Self::Timer {
                duration,
                plus_or_minus,
                deadline,
            } => f
                .debug_struct("Timer")
                .field("duration", duration)
                .field("plus_or_minus", plus_or_minus)
                .field("deadline", deadline)
                .finish(),
            Self::LowHealth { threshold } => {
                f.debug_struct("LowHealth").field("threshold", threshold).finish()
            }
            Self::HighHealth { threshold } => {
                f.debug_struct("HighHealth").field("threshold", threshold).finish()
            }
            Self::Custom(predicate) => f.debug_tuple("Custom").field(&predicate.name()).finish(),
        }
    }
}

#[derive(Debug)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub transition_state: Option<StateId>,
    /// Все sub-triggers должны тоже сработать (AND)
    pub sub_triggers: Vec<Trigger>,
    pub invert: bool,
}

impl Trigger {
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            transition_state: None,
            sub_triggers: Vec::new(),
            invert: false,
        }
    }

    pub fn within_distance(distance: f32) -> Self {
        Self::new(TriggerKind::WithinDistance { distance })
    }

    pub fn beyond_distance(distance: f32) -> Self {
        Self::new(TriggerKind::BeyondDistance { distance })
    }

    pub fn timer(duration: f32, plus_or_minus: f32) -> Self {
        Self::new(TriggerKind::Timer {
            duration,
            plus_or_minus,
            deadline: f32::INFINITY,
        })
    }

    pub fn low_health(threshold: f32) -> Self {
        Self::new(TriggerKind::LowHealth { threshold })
    }

    pub fn high_health(threshold: f32) -> Self {
        Self::new(TriggerKind::HighHealth { threshold })
    }

    pub fn custom(predicate: impl TriggerPredicate + 'static) -> Self {
        Self::new(TriggerKind::Custom(Box::new(predicate)))
    }

    pub fn transition_to(mut self, state: StateId) -> Self {
        self.transition_state = Some(state);
        self
    }

    pub fn with_sub_trigger(mut self, trigger: Trigger) -> Self {
        self.sub_triggers.push(trigger);
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    /// HandleInit: один раз на каждую активацию состояния
    pub fn handle_init(&mut self, finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) {
        match &mut self.kind {
            TriggerKind::Timer {
                duration,
                plus_or_minus,
                deadline,
            } => {
                let jitter = if *plus_or_minus > 0.0 {
                    ctx.rng.gen_range(-*plus_or_minus..=*plus_or_minus)
                } else {
                    0.0
                };
                *deadline = ctx.clock.time + *duration + jitter;
            }
            TriggerKind::Custom(predicate) => predicate.init(finder, ctx),
            _ => {}
        }

        for sub in &mut self.sub_triggers {
            sub.handle_init(finder, ctx);
        }
    }

    /// HandleEvaluate: true, если trigger сработал (переход уже запрошен, если задан)
    pub fn handle_evaluate(&mut self, finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) -> bool {
        if !self.evaluate(finder, ctx) {
            return false;
        }

        if let Some(target) = self.transition_state {
            ctx.change_active_state(target);
        }

        true
    }

    fn evaluate(&mut self, finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) -> bool {
        let passed = self.evaluate_kind(finder, ctx) != self.invert;
        passed
            && self
                .sub_triggers
                .iter_mut()
                .all(|sub| sub.evaluate(finder, ctx))
    }

    fn evaluate_kind(&mut self, finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) -> bool {
        match &mut self.kind {
            TriggerKind::WithinDistance { distance } => {
                nearest_sqr_distance(finder, ctx).is_some_and(|d| d < *distance * *distance)
            }
            TriggerKind::BeyondDistance { distance } => {
                nearest_sqr_distance(finder, ctx).map_or(true, |d| d >= *distance * *distance)
            }
            TriggerKind::Timer { deadline, .. } => ctx.clock.time >= *deadline,
            TriggerKind::LowHealth { threshold } => {
                health_ratio(ctx).is_some_and(|ratio| ratio < *threshold)
            }
            TriggerKind::HighHealth { threshold } => {
                health_ratio(ctx).is_some_and(|ratio| ratio >= *threshold)
            }
            TriggerKind::Custom(predicate) => predicate.evaluate(finder, ctx),
        }
    }
}

/// Квадрат расстояния до ближайшего живого объекта finder'а
fn nearest_sqr_distance(finder: &TaggedObjectFinder, ctx: &AiContext<'_>) -> Option<f32> {
    let position = ctx.host.position();
    finder
        .objects()
        .iter()
        .filter_map(|found| ctx.host.position_of(found.entity))
        .map(|target| (target - position).length_squared())
        .min_by(|a, b| a.total_cmp(b))
}

/// Без Health (или с max == 0) health triggers не срабатывают
fn health_ratio(ctx: &AiContext<'_>) -> Option<f32> {
    ctx.host
        .health()
        .filter(|health| health.max > 0)
        .map(|health| health.ratio())
}
