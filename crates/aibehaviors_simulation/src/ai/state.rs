//! BaseState: lifecycle контракт состояния
//!
//! Inactive → init_state → {handle_reason / handle_action}* → end_state → Inactive
//!
//! Общая часть (timers, finder, triggers, animation, audio, item spawn) живёт
//! в `AiState`. Поведение конкретного состояния реализуется через hooks
//! trait `StateBehavior` (закрытый набор вариантов в `StateKind`).

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::context::{AiContext, SimClock};
use crate::ai::finder::{CachePoint, TaggedObjectFinder};
use crate::ai::host::AudioRequest;
use crate::ai::spawn::{spawn_items, ItemSpawnSettings};
use crate::ai::states::StateKind;
use crate::ai::trigger::Trigger;
use crate::error::AiConfigError;

/// Индекс состояния в коллекции AIBehaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub usize);

/// Animation state descriptor (имя клипа + скорость проигрывания)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub name: String,
    pub speed: f32,
}

impl AnimationState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed: 1.0,
        }
    }
}

/// Аудио настройки состояния
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub clip: Option<String>,
    pub volume: f32,
    pub pitch: f32,
    /// Случайный разброс pitch (+/-)
    pub pitch_randomness: f32,
    pub looped: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            clip: None,
            volume: 1.0,
            pitch: 1.0,
            pitch_randomness: 0.0,
            looped: false,
        }
    }
}

impl AudioSettings {
    /// Собрать запрос с применённым pitch jitter. None: клип не задан.
    pub fn to_request(&self, rng: &mut impl Rng) -> Option<AudioRequest> {
        let clip = self.clip.clone()?;
        let jitter = if self.pitch_randomness > 0.0 {
            rng.gen_range(-self.pitch_randomness..=self.pitch_randomness)
        } else {
            0.0
        };

        Some(AudioRequest {
            clip,
            volume: self.volume,
            pitch: self.pitch + jitter,
            looped: self.looped,
        })
    }
}

/// Authoring данные, общие для всех состояний
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSettings {
    pub is_enabled: bool,
    /// Пустое имя: используется default display name варианта
    pub name: String,
    pub movement_speed: f32,
    /// Градусы в секунду
    pub rotation_speed: f32,
    pub animation_states: Vec<AnimationState>,
    pub audio: AudioSettings,
    pub item_spawn: ItemSpawnSettings,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            name: String::new(),
            movement_speed: 1.0,
            rotation_speed: 360.0,
            animation_states: Vec::new(),
            audio: AudioSettings::default(),
            item_spawn: ItemSpawnSettings::default(),
        }
    }
}

/// Read-only вид на общую часть состояния для hooks
pub struct StateView<'a> {
    pub name: &'a str,
    pub settings: &'a StateSettings,
    pub delta_time: f32,
    pub finder: &'a TaggedObjectFinder,
}

impl StateView<'_> {
    /// PlayAudio с настройками этого состояния
    pub fn play_audio(&self, ctx: &mut AiContext<'_>) {
        if let Some(request) = self.settings.audio.to_request(ctx.rng) {
            ctx.host.play_audio(request);
        }
    }

    /// ChangeActiveState на сконфигурированный переход.
    /// Не сконфигурирован: debug log, перехода нет (warning даёт validate() при загрузке).
    /// Возвращает true, если переход запрошен.
    pub fn transition_to(
        &self,
        target: Option<StateId>,
        transition: &'static str,
        ctx: &mut AiContext<'_>,
    ) -> bool {
        match target {
            Some(id) => {
                ctx.change_active_state(id);
                true
            }
            None => {
                crate::log(
                    &AiConfigError::MissingTransition {
                        state: self.name.to_string(),
                        transition,
                    }
                    .to_string(),
                );
                false
            }
        }
    }
}

/// Hooks конкретного состояния (template method)
pub trait StateBehavior {
    fn init(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>);

    /// true: состояние остаётся активным
    fn reason(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool;

    fn action(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>);

    fn state_ended(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>);

    /// GetNextMovement: куда двигаться на этом тике
    fn next_movement(&mut self, _state: &StateView<'_>, ctx: &mut AiContext<'_>) -> Vec3 {
        ctx.host.position()
    }

    fn default_display_name(&self) -> &'static str;

    /// Проигрывать ли случайную анимацию при входе
    fn plays_animation(&self) -> bool {
        true
    }

    /// true: после action AI поворачивается на месте к next_movement
    fn rotates_toward_target(&self) -> bool {
        false
    }

    fn can_switch_to_state(&self, _clock: &SimClock) -> bool {
        true
    }

    /// Проверка authoring данных (вызывается хостом при загрузке)
    fn validate(&self, _state_name: &str) -> Vec<AiConfigError> {
        Vec::new()
    }
}

/// Состояние FSM: общая часть + вариант поведения
#[derive(Debug)]
pub struct AiState {
    pub settings: StateSettings,
    /// None: пустой слот из authoring данных (configuration error)
    pub triggers: Vec<Option<Trigger>>,
    pub object_finder: TaggedObjectFinder,
    pub kind: StateKind,
    owns_object_finder: bool,
    last_action_time: f32,
    delta_time: f32,
    active: bool,
}

/// Finder, которым пользуется состояние: свой или хоста
fn resolve_finder<'f>(
    owns: bool,
    own: &'f TaggedObjectFinder,
    shared: &'f TaggedObjectFinder,
) -> &'f TaggedObjectFinder {
    if owns {
        own
    } else {
        shared
    }
}

impl AiState {
    pub fn new(kind: impl Into<StateKind>) -> Self {
        Self {
            settings: StateSettings::default(),
            triggers: Vec::new(),
            object_finder: TaggedObjectFinder::default(),
            kind: kind.into(),
            owns_object_finder: false,
            last_action_time: 0.0,
            delta_time: 0.0,
            active: false,
        }
    }

    pub fn with_settings(mut self, settings: StateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = name.into();
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(Some(trigger));
        self
    }

    pub fn with_object_finder(mut self, finder: TaggedObjectFinder) -> Self {
        self.object_finder = finder;
        self
    }

    pub fn display_name(&self) -> &str {
        if self.settings.name.is_empty() {
            self.kind.default_display_name()
        } else {
            &self.settings.name
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn owns_object_finder(&self) -> bool {
        self.owns_object_finder
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn can_switch_to_state(&self, clock: &SimClock) -> bool {
        self.settings.is_enabled && self.kind.can_switch_to_state(clock)
    }

    pub fn rotates_toward_target(&self) -> bool {
        self.kind.rotates_toward_target()
    }

    /// Ошибки authoring данных этого состояния
    pub fn validate(&self) -> Vec<AiConfigError> {
        let name = self.display_name().to_string();
        let mut errors: Vec<AiConfigError> = self
            .triggers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_none())
            .map(|(index, _)| AiConfigError::NullTrigger {
                state: name.clone(),
                index,
            })
            .collect();

        let spawn = &self.settings.item_spawn;
        if spawn.spawn_on_enter && spawn.spawnable_items.is_empty() {
            errors.push(AiConfigError::EmptyItemPool { state: name.clone() });
        }

        errors.extend(self.kind.validate(&name));
        errors
    }

    /// Load-time кэширование собственного finder'а
    pub(crate) fn cache_on_load<S: crate::ai::host::SceneQuery + ?Sized>(
        &mut self,
        scene: &mut S,
        clock: &SimClock,
    ) {
        if self.object_finder.use_custom_tags {
            self.object_finder.cache_transforms(CachePoint::OnLoad, scene, clock);
        }
    }

    // === Init === //

    pub fn init_state(&mut self, shared_finder: &mut TaggedObjectFinder, ctx: &mut AiContext<'_>) {
        self.last_action_time = ctx.clock.time;
        self.delta_time = 0.0;
        self.active = true;

        self.init_object_finder(ctx);

        let name = self.display_name().to_string();
        let finder = resolve_finder(self.owns_object_finder, &self.object_finder, shared_finder);

        for (index, slot) in self.triggers.iter_mut().enumerate() {
            match slot {
                Some(trigger) => trigger.handle_init(finder, ctx),
                None => crate::log_error(
                    &AiConfigError::NullTrigger {
                        state: name.clone(),
                        index,
                    }
                    .to_string(),
                ),
            }
        }

        let view = StateView {
            name: &name,
            settings: &self.settings,
            delta_time: self.delta_time,
            finder,
        };
        self.kind.init(&view, ctx);

        if self.kind.plays_animation() {
            play_random_animation(&view, ctx);
        }

        if self.settings.item_spawn.spawn_on_enter {
            spawn_items(&self.settings.item_spawn, &name, ctx);
        }
    }

    fn init_object_finder(&mut self, ctx: &mut AiContext<'_>) {
        if self.object_finder.use_custom_tags {
            self.owns_object_finder = true;
            self.object_finder
                .cache_transforms(CachePoint::StateChanged, &mut *ctx.host, &ctx.clock);
        } else {
            self.owns_object_finder = false;
        }
    }

    // === Reason === //

    /// HandleReason. Возвращает true, если состояние осталось тем же.
    pub fn handle_reason(
        &mut self,
        shared_finder: &mut TaggedObjectFinder,
        ctx: &mut AiContext<'_>,
    ) -> bool {
        debug_assert!(self.active, "handle_reason on state that was not initialized");

        if self.owns_object_finder {
            self.object_finder
                .cache_transforms(CachePoint::EveryFrame, &mut *ctx.host, &ctx.clock);
        } else {
            shared_finder.cache_transforms(CachePoint::EveryFrame, &mut *ctx.host, &ctx.clock);
        }

        let name = self.display_name().to_string();
        let finder = resolve_finder(self.owns_object_finder, &self.object_finder, shared_finder);

        // Trigger имеет приоритет над собственным Reason состояния
        for trigger in self.triggers.iter_mut().flatten() {
            if trigger.handle_evaluate(finder, ctx) {
                return false;
            }
        }

        let view = StateView {
            name: &name,
            settings: &self.settings,
            delta_time: self.delta_time,
            finder,
        };
        self.kind.reason(&view, ctx)
    }

    // === Action === //

    pub fn handle_action(&mut self, shared_finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) {
        debug_assert!(self.active, "handle_action on state that was not initialized");

        self.delta_time = ctx.clock.time - self.last_action_time;
        self.last_action_time = ctx.clock.time;

        let name = self.display_name().to_string();
        let view = StateView {
            name: &name,
            settings: &self.settings,
            delta_time: self.delta_time,
            finder: resolve_finder(self.owns_object_finder, &self.object_finder, shared_finder),
        };
        self.kind.action(&view, ctx);

        // Поворот на месте (speed 0) к точке next_movement
        if self.kind.rotates_toward_target() && ctx.requested_transition().is_none() {
            let target = self.kind.next_movement(&view, ctx);
            ctx.host.move_agent(target, 0.0, self.settings.rotation_speed);
        }
    }

    /// GetNextMovement (по умолчанию: текущая позиция AI)
    pub fn next_movement(&mut self, shared_finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) -> Vec3 {
        let name = self.display_name().to_string();
        let view = StateView {
            name: &name,
            settings: &self.settings,
            delta_time: self.delta_time,
            finder: resolve_finder(self.owns_object_finder, &self.object_finder, shared_finder),
        };
        self.kind.next_movement(&view, ctx)
    }

    // === EndState === //

    pub fn end_state(&mut self, shared_finder: &TaggedObjectFinder, ctx: &mut AiContext<'_>) {
        debug_assert!(self.active, "end_state on state that was not initialized");

        let name = self.display_name().to_string();
        let view = StateView {
            name: &name,
            settings: &self.settings,
            delta_time: self.delta_time,
            finder: resolve_finder(self.owns_object_finder, &self.object_finder, shared_finder),
        };
        self.kind.state_ended(&view, ctx);
        self.active = false;
    }
}

/// Случайная (равномерно) анимация из списка состояния
pub fn play_random_animation(state: &StateView<'_>, ctx: &mut AiContext<'_>) {
    let animations = &state.settings.animation_states;
    if animations.is_empty() {
        crate::log_warning(
            &AiConfigError::EmptyAnimationList {
                state: state.name.to_string(),
            }
            .to_string(),
        );
        return;
    }

    let index = ctx.rng.gen_range(0..animations.len());
    ctx.host.play_animation(&animations[index]);
}
