//! GetHelpState: позвать на помощь ближайших союзников
//!
//! При входе: все объекты с help_tag в радиусе help_radius получают
//! запрос перейти в свой HelpState (точка помощи = позиция этого AI
//! на высоте helper'а). Повторно войти можно только после cooldown.

use bevy::prelude::*;

use crate::ai::context::{AiContext, SimClock};
use crate::ai::state::{StateBehavior, StateView};
use crate::ai::states::cooldown::Cooldown;

/// Сообщение, которое AI рассылает при входе в GetHelpState
pub const GET_HELP_MESSAGE: &str = "OnGetHelp";

#[derive(Debug, Clone)]
pub struct GetHelpState {
    pub help_radius: f32,
    pub help_tag: String,
    pub cooldown: Cooldown,
}

impl Default for GetHelpState {
    fn default() -> Self {
        Self {
            help_radius: 30.0,
            help_tag: "Untagged".to_string(),
            cooldown: Cooldown::default(),
        }
    }
}

impl GetHelpState {
    pub fn new(help_tag: impl Into<String>, help_radius: f32) -> Self {
        Self {
            help_tag: help_tag.into(),
            help_radius,
            ..Self::default()
        }
    }
}

impl StateBehavior for GetHelpState {
    fn init(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        let own_entity = ctx.host.entity();
        let position = ctx.host.position();
        let helpers = ctx.host.find_with_tag(&self.help_tag);

        let mut answered = 0;
        for helper in helpers {
            if helper.entity == own_entity {
                continue;
            }
            if helper.position.distance(position) >= self.help_radius {
                continue;
            }

            let help_point = Vec3::new(position.x, helper.position.y, position.z);
            if ctx.host.request_help(helper.entity, help_point) {
                answered += 1;
            }
        }

        state.play_audio(ctx);
        ctx.host.send_message(GET_HELP_MESSAGE);

        crate::log(&format!(
            "AI: {:?} '{}' asked for help, {} helpers answered",
            own_entity, state.name, answered
        ));
    }

    fn reason(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) -> bool {
        true
    }

    fn action(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {}

    fn state_ended(&mut self, _state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        self.cooldown.start(&ctx.clock);
    }

    fn default_display_name(&self) -> &'static str {
        "Get Help"
    }

    fn can_switch_to_state(&self, clock: &SimClock) -> bool {
        self.cooldown.is_ready(clock)
    }
}
