//! AIBehaviors: FSM хост одного AI
//!
//! Владеет коллекцией состояний, default finder'ом и handle активного
//! состояния. Порядок одного тика:
//! 1. load (первый тик): OnLoad кэширование + проверка конфигурации
//! 2. pending переход (запросы извне, например get-help от союзника)
//! 3. handle_reason активного состояния → применить запрошенный переход
//! 4. handle_action активного (возможно уже нового) состояния → применить переход

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::context::{AiContext, SimClock};
use crate::ai::finder::{CachePoint, TaggedObjectFinder};
use crate::ai::host::AiHost;
use crate::ai::state::AiState;
use crate::ai::states::{HelpState, StateVariant};
use crate::ai::StateId;
use crate::error::AiConfigError;

/// Максимум переходов подряд из init hooks за один apply (защита от циклов)
const MAX_TRANSITION_CHAIN: usize = 8;

#[derive(Component, Debug, Default)]
pub struct AIBehaviors {
    states: Vec<AiState>,
    /// None: стартуем с первого добавленного состояния
    pub initial_state: Option<StateId>,
    /// Finder хоста (используется состояниями без custom tags)
    pub object_finder: TaggedObjectFinder,
    active: Option<StateId>,
    pending: Option<StateId>,
    loaded: bool,
}

impl AIBehaviors {
    pub fn new(object_finder: TaggedObjectFinder) -> Self {
        Self {
            object_finder,
            ..Self::default()
        }
    }

    pub fn add_state(&mut self, state: AiState) -> StateId {
        self.states.push(state);
        StateId(self.states.len() - 1)
    }

    pub fn with_state(mut self, state: AiState) -> Self {
        self.add_state(state);
        self
    }

    pub fn with_initial_state(mut self, initial: StateId) -> Self {
        self.initial_state = Some(initial);
        self
    }

    pub fn states(&self) -> &[AiState] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&AiState> {
        self.states.get(id.0)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut AiState> {
        self.states.get_mut(id.0)
    }

    pub fn active_state(&self) -> Option<StateId> {
        self.active
    }

    pub fn active(&self) -> Option<&AiState> {
        self.active.and_then(|id| self.state(id))
    }

    pub fn pending_state(&self) -> Option<StateId> {
        self.pending
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// GetState<T>: первое состояние нужного варианта
    pub fn get_state<T: StateVariant>(&self) -> Option<(StateId, &T)> {
        self.states
            .iter()
            .enumerate()
            .find_map(|(index, state)| T::from_kind(&state.kind).map(|s| (StateId(index), s)))
    }

    pub fn get_state_mut<T: StateVariant>(&mut self) -> Option<(StateId, &mut T)> {
        self.states
            .iter_mut()
            .enumerate()
            .find_map(|(index, state)| T::from_kind_mut(&mut state.kind).map(|s| (StateId(index), s)))
    }

    /// ChangeActiveState извне: переход применится в начале следующего тика
    pub fn change_active_state(&mut self, target: StateId) -> Result<(), AiConfigError> {
        if target.0 >= self.states.len() {
            return Err(AiConfigError::UnknownState(target));
        }
        self.pending = Some(target);
        Ok(())
    }

    /// Запрос помощи от союзника: HelpState получает точку и становится pending.
    /// false: HelpState нет или он не может помочь.
    pub fn request_help(&mut self, help_point: Vec3) -> bool {
        let Some(index) = self.states.iter().position(|state| {
            HelpState::from_kind(&state.kind).is_some_and(|help| help.can_help(&state.settings))
        }) else {
            return false;
        };

        if let Some(help) = HelpState::from_kind_mut(&mut self.states[index].kind) {
            help.help_point = help_point;
        }
        self.pending = Some(StateId(index));
        true
    }

    /// Все ошибки конфигурации (хост и состояния)
    pub fn validate(&self) -> Vec<AiConfigError> {
        let mut errors = Vec::new();
        if let Some(initial) = self.initial_state {
            if initial.0 >= self.states.len() {
                errors.push(AiConfigError::UnknownState(initial));
            }
        }
        for state in &self.states {
            errors.extend(state.validate());
        }
        errors
    }

    /// Один simulation tick этого AI
    pub fn tick(&mut self, host: &mut dyn AiHost, clock: SimClock, rng: &mut ChaCha8Rng) {
        let mut ctx = AiContext::new(host, clock, rng);

        if !self.loaded {
            self.load(&mut ctx);
        }

        if self.active.is_none() {
            let initial = self
                .initial_state
                .or_else(|| (!self.states.is_empty()).then_some(StateId(0)));
            let Some(initial) = initial else {
                return;
            };
            self.apply_transition(initial, &mut ctx);
        }

        if let Some(pending) = self.pending.take() {
            self.apply_transition(pending, &mut ctx);
        }

        let Some(active) = self.active else {
            return;
        };

        let unchanged = self.states[active.0].handle_reason(&mut self.object_finder, &mut ctx);
        if let Some(target) = ctx.take_transition() {
            self.apply_transition(target, &mut ctx);
        } else if !unchanged {
            crate::log(&format!(
                "AI: {:?} '{}' requested a change without a transition target",
                ctx.host.entity(),
                self.states[active.0].display_name()
            ));
        }

        let Some(active) = self.active else {
            return;
        };

        self.states[active.0].handle_action(&self.object_finder, &mut ctx);
        if let Some(target) = ctx.take_transition() {
            self.apply_transition(target, &mut ctx);
        }
    }

    fn load(&mut self, ctx: &mut AiContext<'_>) {
        self.object_finder
            .cache_transforms(CachePoint::OnLoad, &mut *ctx.host, &ctx.clock);
        for state in &mut self.states {
            state.cache_on_load(&mut *ctx.host, &ctx.clock);
        }

        for error in self.validate() {
            crate::log_warning(&error.to_string());
        }

        self.loaded = true;
    }

    /// Применить переход и все переходы, запрошенные из init hooks
    fn apply_transition(&mut self, target: StateId, ctx: &mut AiContext<'_>) -> bool {
        let mut next = Some(target);
        let mut changed = false;

        for _ in 0..MAX_TRANSITION_CHAIN {
            let Some(target) = next else {
                break;
            };
            if !self.switch_state(target, ctx) {
                break;
            }
            changed = true;
            next = ctx.take_transition();
        }

        changed
    }

    fn switch_state(&mut self, target: StateId, ctx: &mut AiContext<'_>) -> bool {
        let Some(state) = self.states.get(target.0) else {
            crate::log_error(&AiConfigError::UnknownState(target).to_string());
            return false;
        };

        if self.active == Some(target) {
            return false;
        }

        if !state.can_switch_to_state(&ctx.clock) {
            crate::log(&format!(
                "AI: {:?} cannot switch to '{}' (disabled or cooling down)",
                ctx.host.entity(),
                state.display_name()
            ));
            return false;
        }

        if let Some(old) = self.active {
            self.states[old.0].end_state(&self.object_finder, ctx);
            // Переходы из StateEnded не поддерживаются
            ctx.take_transition();
        }

        self.object_finder
            .cache_transforms(CachePoint::StateChanged, &mut *ctx.host, &ctx.clock);

        crate::log(&format!(
            "AI: {:?} {} → {}",
            ctx.host.entity(),
            self.active()
                .map(|s| s.display_name().to_string())
                .unwrap_or_else(|| "None".to_string()),
            self.states[target.0].display_name()
        ));

        self.active = Some(target);
        self.states[target.0].init_state(&mut self.object_finder, ctx);
        true
    }
}
