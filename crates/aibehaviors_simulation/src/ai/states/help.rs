//! HelpState: идти к точке, где союзник попросил помощи

use bevy::prelude::*;

use crate::ai::context::AiContext;
use crate::ai::state::{StateBehavior, StateSettings, StateView};
use crate::ai::StateId;

#[derive(Debug, Clone)]
pub struct HelpState {
    /// Выставляется хостом из GetHelpState союзника
    pub help_point: Vec3,
    pub help_point_reached_distance: f32,
    pub help_point_reached_state: Option<StateId>,
}

impl Default for HelpState {
    fn default() -> Self {
        Self {
            help_point: Vec3::ZERO,
            help_point_reached_distance: 1.0,
            help_point_reached_state: None,
        }
    }
}

impl HelpState {
    /// CanHelp: выключенное состояние не откликается на запросы
    pub fn can_help(&self, settings: &StateSettings) -> bool {
        settings.is_enabled
    }
}

impl StateBehavior for HelpState {
    fn init(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        state.play_audio(ctx);
    }

    fn reason(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) -> bool {
        let sqr_distance = (ctx.host.position() - self.help_point).length_squared();
        let reached = self.help_point_reached_distance * self.help_point_reached_distance;

        if sqr_distance < reached {
            return !state.transition_to(self.help_point_reached_state, "help point reached", ctx);
        }

        true
    }

    fn action(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        ctx.host.move_agent(
            self.help_point,
            state.settings.movement_speed,
            state.settings.rotation_speed,
        );
    }

    fn state_ended(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {}

    fn next_movement(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) -> Vec3 {
        self.help_point
    }

    fn default_display_name(&self) -> &'static str {
        "Help"
    }
}
