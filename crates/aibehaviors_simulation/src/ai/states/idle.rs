//! IdleState: стоит на месте и ждёт triggers

use crate::ai::context::AiContext;
use crate::ai::state::{StateBehavior, StateView};

#[derive(Debug, Clone, Default)]
pub struct IdleState;

impl StateBehavior for IdleState {
    fn init(&mut self, state: &StateView<'_>, ctx: &mut AiContext<'_>) {
        state.play_audio(ctx);
    }

    fn reason(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) -> bool {
        true
    }

    fn action(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {}

    fn state_ended(&mut self, _state: &StateView<'_>, _ctx: &mut AiContext<'_>) {}

    fn default_display_name(&self) -> &'static str {
        "Idle"
    }
}
