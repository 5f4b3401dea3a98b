use bevy::prelude::*;

use crate::ai::behaviors::AIBehaviors;
use crate::ai::context::AiContext;
use crate::ai::finder::TaggedObjectFinder;
use crate::ai::state::{AiState, AudioSettings, StateSettings};
use crate::ai::states::{Cooldown, GetHelpState, HelpState, IdleState, GET_HELP_MESSAGE};
use crate::ai::test_utils::{clock_at, test_rng, MockHost};
use crate::ai::StateId;

#[test]
fn test_get_help_asks_allies_within_radius() {
    let mut host = MockHost::new(Vec3::new(1.0, 0.0, 1.0));
    let own = host.entity;
    host.add_object_with_entity(own, "Ally", host.position);
    let near = host.add_object("Ally", Vec3::new(5.0, 2.0, 1.0));
    host.add_object("Ally", Vec3::new(40.0, 0.0, 1.0));
    host.add_object("Enemy", Vec3::new(2.0, 0.0, 1.0));

    let mut state = AiState::new(GetHelpState::new("Ally", 30.0)).with_settings(StateSettings {
        audio: AudioSettings {
            clip: Some("shout".to_string()),
            ..AudioSettings::default()
        },
        ..StateSettings::default()
    });
    let mut finder = TaggedObjectFinder::default();
    let mut rng = test_rng();
    let mut ctx = AiContext::new(&mut host, clock_at(1.0, 1), &mut rng);
    state.init_state(&mut finder, &mut ctx);

    // Точка помощи: позиция AI на высоте helper'а
    assert_eq!(host.help_requests, vec![(near, Vec3::new(1.0, 2.0, 1.0))]);
    assert_eq!(host.messages, vec![GET_HELP_MESSAGE.to_string()]);
    assert_eq!(host.audio.len(), 1);
    assert_eq!(host.audio[0].clip, "shout");
}

#[test]
fn test_get_help_cooldown_blocks_reentry() {
    let idle = StateId(0);
    let get_help = StateId(1);

    let mut behaviors = AIBehaviors::default()
        .with_state(AiState::new(IdleState))
        .with_state(AiState::new(GetHelpState {
            cooldown: Cooldown::new(5.0),
            ..GetHelpState::default()
        }));
    let mut host = MockHost::new(Vec3::ZERO);
    let mut rng = test_rng();

    behaviors.tick(&mut host, clock_at(0.1, 1), &mut rng);
    assert_eq!(behaviors.active_state(), Some(idle));

    behaviors.change_active_state(get_help).unwrap();
    behaviors.tick(&mut host, clock_at(0.2, 2), &mut rng);
    assert_eq!(behaviors.active_state(), Some(get_help));

    // Выход из GetHelp на t = 1.0 запускает cooldown
    behaviors.change_active_state(idle).unwrap();
    behaviors.tick(&mut host, clock_at(1.0, 3), &mut rng);
    assert_eq!(behaviors.active_state(), Some(idle));

    behaviors.change_active_state(get_help).unwrap();
    behaviors.tick(&mut host, clock_at(2.0, 4), &mut rng);
    assert_eq!(behaviors.active_state(), Some(idle), "cooldown ещё идёт");

    behaviors.change_active_state(get_help).unwrap();
    behaviors.tick(&mut host, clock_at(6.5, 5), &mut rng);
    assert_eq!(behaviors.active_state(), Some(get_help));
}

#[test]
fn test_cooldown_remaining() {
    let mut cooldown = Cooldown::new(3.0);
    assert!(cooldown.is_ready(&clock_at(0.0, 0)));
    assert_eq!(cooldown.remaining(&clock_at(0.0, 0)), 0.0);

    cooldown.start(&clock_at(2.0, 1));
    assert!(!cooldown.is_ready(&clock_at(4.0, 2)));
    assert_eq!(cooldown.remaining(&clock_at(4.0, 2)), 1.0);
    assert!(cooldown.is_ready(&clock_at(5.0, 3)));
}

#[test]
fn test_request_help_moves_helper_to_help_point() {
    let idle = StateId(0);
    let help = StateId(1);

    let mut behaviors = AIBehaviors::default()
        .with_state(AiState::new(IdleState))
        .with_state(AiState::new(HelpState {
            help_point_reached_state: Some(idle),
            ..HelpState::default()
        }));
    let mut host = MockHost::new(Vec3::ZERO);
    let mut rng = test_rng();

    behaviors.tick(&mut host, clock_at(0.1, 1), &mut rng);
    assert_eq!(behaviors.active_state(), Some(idle));

    let help_point = Vec3::new(6.0, 0.0, 0.0);
    assert!(behaviors.request_help(help_point));
    assert_eq!(behaviors.pending_state(), Some(help));

    behaviors.tick(&mut host, clock_at(0.2, 2), &mut rng);
    assert_eq!(behaviors.active_state(), Some(help));
    assert_eq!(host.last_move_target(), Some(help_point));

    // Дошли до точки помощи
    host.position = Vec3::new(5.5, 0.0, 0.0);
    behaviors.tick(&mut host, clock_at(0.3, 3), &mut rng);
    assert_eq!(behaviors.active_state(), Some(idle));
}

#[test]
fn test_request_help_refused_without_enabled_help_state() {
    let mut without_help = AIBehaviors::default().with_state(AiState::new(IdleState));
    assert!(!without_help.request_help(Vec3::ONE));
    assert_eq!(without_help.pending_state(), None);

    let mut disabled = AIBehaviors::default()
        .with_state(AiState::new(IdleState))
        .with_state(AiState::new(HelpState::default()).with_settings(StateSettings {
            is_enabled: false,
            ..StateSettings::default()
        }));
    assert!(!disabled.request_help(Vec3::ONE));
}

#[test]
fn test_help_state_next_movement_is_help_point() {
    let mut state = AiState::new(HelpState {
        help_point: Vec3::new(2.0, 0.0, 3.0),
        ..HelpState::default()
    });
    let mut finder = TaggedObjectFinder::default();
    let mut host = MockHost::new(Vec3::ZERO);
    let mut rng = test_rng();
    let mut ctx = AiContext::new(&mut host, clock_at(0.0, 0), &mut rng);

    state.init_state(&mut finder, &mut ctx);
    assert_eq!(state.next_movement(&finder, &mut ctx), Vec3::new(2.0, 0.0, 3.0));
    assert_eq!(state.display_name(), "Help");
}
