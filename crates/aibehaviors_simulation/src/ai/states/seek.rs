//! SeekState: поиск ближайшей цели и движение к ней
//!
//! no-target → target-selection → approaching → {arrived | stuck | target-lost}
//!
//! Два режима движения:
//! - direct: прямо к текущей позиции цели
//! - get as close as possible (нужен navigation agent): к последнему углу
//!   закэшированного пути, путь пересчитывается асинхронно
//!
//! Stuck detection: если AI почти не сдвинулся (< 1mm) и смещение не больше
//! ранее записанного, он застрял → no_movement_state.

use bevy::prelude::*;

use crate::ai::context::AiContext;
use crate::ai::navigation::{NavPath, PathRequestId};
use crate::ai::state::{StateBehavior, StateView};
use crate::ai::states::nearest_object;
use crate::ai::StateId;
use crate::error::AiConfigError;

/// Смещение за тик меньше этого (метры) считается "не двигался"
pub const NO_MOVEMENT_EPSILON: f32 = 0.001;

/// Минимальный интервал (real time, секунды) между пересчётами невалидного пути
pub const DEFAULT_PATH_CHECK_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct SeekState {
    /// true: seek_target закреплён и не сбрасывается при выходе из состояния
    pub specify_seek_target: bool,
    pub seek_target: Option<Entity>,
    pub seek_target_reached_state: Option<StateId>,
    pub no_seek_target_found_state: Option<StateId>,
    pub no_movement_state: Option<StateId>,
    pub distance_to_target_threshold: f32,
    pub destroy_target_when_reached: bool,
    pub get_as_close_as_possible: bool,
    pub path_check_interval: f32,

    target_position: Vec3,
    sqr_distance_to_target_threshold: f32,
    /// get_as_close_as_possible && есть navigation agent
    use_navigation: bool,
    nav_path: NavPath,
    pending_path: Option<PathRequestId>,
    next_path_check: f32,
    previous_position: Option<Vec3>,
    previous_no_movement_distance: f32,
    target_reached: bool,
}

impl Default for SeekState {
    fn default() -> Self {
        Self {
            specify_seek_target: false,
            seek_target: None,
            seek_target_reached_state: None,
            no_seek_target_found_state: None,
            no_movement_state: None,
            distance_to_target_threshold: 0.25,
            destroy_target_when_reached: false,
            get_as_close_as_possible: false,
            path_check_interval: DEFAULT_PATH_CHECK_INTERVAL,
            target_position: Vec3::ZERO,
            sqr_distance_to_target_threshold: 0.25 * 0.25,
            use_navigation: false,
            nav_path: NavPath::invalid(),
            pending_path: None,
            next_path_check: 0.0,
            previous_position: None,
            previous_no_movement_distance: -1.0,
            target_reached: false,
        }
    }
}

impl SeekState {
    /// Seek с закреплённой целью
    pub fn with_target(target: Entity) -> Self {
        Self {
            specify_seek_target: true,
            seek_target: Some(target),
            ..Self::default()
        }
    }

    pub fn on_target_reached(mut self, state: StateId) -> Self {
        self.seek_target_reached_state = Some(state);
        self
    }

    pub fn on_no_target(mut self, state: StateId) -> Self {
        self.no_seek_target_found_state = Some(state);
        self
    }

    pub fn on_no_movement(mut self, state: StateId) -> Self {
        self.no_movement_state = Some(state);
        self
    }

    /// Все три исхода ведут в одно состояние
    pub fn with_transitions(self, state: StateId) -> Self {
        self.on_target_reached(state)
            .on_no_target(state)
            .on_no_movement(state)
    }

    pub fn with_threshold(mut self, distance: f32) -> Self {
        self.distance_to_target_threshold = distance;
        self
    }

    pub fn destroying_target(mut self) -> Self {
        self.destroy_target_when_reached = true;
        self
    }

    /// Идти по navmesh пути (нужен navigation agent)
    pub fn as_close_as_possible(mut self) -> Self {
        self.get_as_close_as_possible = true;
        self
    }

    pub fn with_path_check_interval(mut self, interval: f32) -> Self {
        self.path_check_interval = interval;
        self
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn nav_path(&self) -> &NavPath {
        &self.nav_path
    }

    pub fn uses_navigation(&self) -> bool {
        self.use_navigation
    }

    /// Threshold хранится в квадрате (сравнения без sqrt)
    pub fn square_distance_threshold(&self) -> f32 {
        self.distance_to_target_threshold * self.distance_to_target_threshold
    }

    fn select_nearest_target(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool {
        match nearest_object(state.finder, ctx) {
            Some((target, position)) => {
                self.seek_target = Some(target);
                self.target_position = position;
                self.target_reached = false;
                crate::log(&format!(
                    "AI: {:?} '{}' selected seek target {:?}",
                    ctx.host.entity(),
                    state.name,
                    target
                ));
                true
            }
            None => !state.transition_to(self.no_seek_target_found_state, "no seek target found", ctx),
        }
    }

    /// false: переход уже запрошен (или arrival уже обработан ранее)
    fn handle_target_reached(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool {
        if self.target_reached {
            return false;
        }
        self.target_reached = true;

        if self.destroy_target_when_reached {
            if let Some(target) = self.seek_target.take() {
                ctx.host.destroy(target);
            }
        }

        crate::log(&format!(
            "AI: {:?} '{}' reached seek target",
            ctx.host.entity(),
            state.name
        ));
        state.transition_to(self.seek_target_reached_state, "seek target reached", ctx)
    }

    /// HasMovement: false, если AI застрял
    fn has_movement(&mut self, current_position: Vec3) -> bool {
        // Первый тик после init только запоминает позицию
        let Some(previous) = self.previous_position else {
            return true;
        };

        let movement_distance = (previous - current_position).length_squared();
        if movement_distance < NO_MOVEMENT_EPSILON * NO_MOVEMENT_EPSILON {
            if movement_distance <= self.previous_no_movement_distance {
                return false;
            }
            self.previous_no_movement_distance = movement_distance;
        }

        true
    }

    /// Забрать готовый путь, если async расчёт завершился
    fn collect_path(&mut self, ctx: &mut AiContext<'_>) {
        let Some(request) = self.pending_path else {
            return;
        };
        if let Some(path) = ctx.host.take_path(request) {
            self.nav_path = path;
            self.pending_path = None;
        }
    }

    /// Пересчёт пути не чаще path_check_interval (real time)
    fn recalculate_path(&mut self, target: Vec3, ctx: &mut AiContext<'_>) {
        if ctx.clock.real_time > self.next_path_check {
            self.pending_path = ctx.host.request_path(target);
            self.next_path_check = ctx.clock.real_time + self.path_check_interval;
        }
    }
}

impl StateBehavior for SeekState {
    fn init(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        self.sqr_distance_to_target_threshold = self.square_distance_threshold();
        state.play_audio(ctx);

        self.use_navigation = self.get_as_close_as_possible && ctx.host.has_navigation_agent();
        if self.get_as_close_as_possible && !self.use_navigation {
            crate::log_warning(
                &AiConfigError::MissingNavigationAgent {
                    state: state.name.to_string(),
                }
                .to_string(),
            );
        }

        self.previous_no_movement_distance = -1.0;
        self.previous_position = None;
        self.nav_path = NavPath::invalid();
        self.pending_path = None;
        self.target_reached = false;

        if let Some(target) = self.seek_target {
            match ctx.host.position_of(target) {
                Some(position) => self.target_position = position,
                None => self.seek_target = None,
            }
        }
    }

    fn reason(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool {
        // Цель уничтожена извне: weak handle протух, ищем заново
        if let Some(target) = self.seek_target {
            if ctx.host.position_of(target).is_none() {
                crate::log(&format!(
                    "AI: {:?} '{}' lost seek target {:?}",
                    ctx.host.entity(),
                    state.name,
                    target
                ));
                self.seek_target = None;
            }
        }

        if self.seek_target.is_none() {
            return self.select_nearest_target(state, ctx);
        }

        let sqr_distance = (ctx.host.position() - self.target_position).length_squared();
        if sqr_distance < self.sqr_distance_to_target_threshold {
            return !self.handle_target_reached(state, ctx);
        }

        // Ушли от цели: следующее прибытие снова запросит переход
        self.target_reached = false;
        true
    }

    fn action(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        let position = ctx.host.position();

        if self.seek_target.is_some() {
            self.target_position = self.next_movement(state, ctx);

            if self.has_movement(position) {
                ctx.host.move_agent(
                    self.target_position,
                    state.settings.movement_speed,
                    state.settings.rotation_speed,
                );
            } else {
                crate::log(&format!(
                    "AI: {:?} '{}' is not moving",
                    ctx.host.entity(),
                    state.name
                ));
                state.transition_to(self.no_movement_state, "no movement", ctx);
            }
        }

        self.previous_position = Some(position);
    }

    fn state_ended(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {
        if !self.specify_seek_target {
            self.seek_target = None;
        }

        // Незабранный результат пути просто теряется
        self.pending_path = None;
        self.nav_path = NavPath::invalid();
    }

    fn next_movement(&mut self, _state: &StateView<'_>, ctx: &mut AiContext<'_>) -> Vec3 {
        let Some(target) = self.seek_target else {
            return ctx.host.position();
        };

        let live_target = ctx.host.position_of(target).unwrap_or(self.target_position);
        if !self.use_navigation {
            return live_target;
        }

        self.collect_path(ctx);

        match self.nav_path.last_corner() {
            Some(corner) if self.nav_path.is_valid() => {
                // Ведём к углу текущего пути, свежий путь понадобится на следующем тике
                if self.pending_path.is_none() {
                    self.pending_path = ctx.host.request_path(live_target);
                }
                corner
            }
            _ => {
                self.recalculate_path(live_target, ctx);
                live_target
            }
        }
    }

    fn default_display_name(&self) -> &'static str {
        "Seek"
    }

    fn validate(&self, state_name: &str) -> Vec<AiConfigError> {
        let mut errors = Vec::new();
        if self.seek_target_reached_state.is_none() {
            errors.push(AiConfigError::MissingTransition {
                state: state_name.to_string(),
                transition: "seek target reached",
            });
        }
        if self.no_seek_target_found_state.is_none() && !self.specify_seek_target {
            errors.push(AiConfigError::MissingTransition {
                state: state_name.to_string(),
                transition: "no seek target found",
            });
        }
        errors
    }
}
