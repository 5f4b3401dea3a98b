//! Combat integration test
//!
//! Headless App + SimulationPlugin:
//! - AttackState наносит урон по interval и шлёт AttackPerformed
//! - GetHelpState поднимает союзников в радиусе, они идут в HelpState

use bevy::prelude::*;
use aibehaviors_simulation::ai::{
    AiMessage, AttackPerformed, AttackState, AttackTiming, GetHelpState, HelpState, IdleState,
    StateSettings, Trigger,
};
use aibehaviors_simulation::*;

/// Helper: headless App с AI plugins
fn create_combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default());
    app
}

fn active_state_name(world: &World, entity: Entity) -> Option<String> {
    world
        .get::<AIBehaviors>(entity)?
        .active()
        .map(|state| state.display_name().to_string())
}

/// Helper: spawn AI с заданным FSM
fn spawn_ai(world: &mut World, position: Vec3, tag: &str, behaviors: AIBehaviors) -> Entity {
    world
        .spawn((
            AiAgent,
            Transform::from_translation(position),
            MovementCommand::default(),
            ObjectTag::new(tag),
            behaviors,
        ))
        .id()
}

/// Attack (interval) → Idle, когда игрока нет
fn attacker_behaviors(reload_time: f32) -> AIBehaviors {
    AIBehaviors::default()
        .with_state(AiState::new(
            AttackState::default()
                .with_damage(25)
                .with_range(2.0)
                .with_timing(AttackTiming::Interval { reload_time })
                .on_no_target(StateId(1))
                .on_out_of_range(StateId(1)),
        ))
        .with_state(AiState::new(IdleState))
}

#[test]
fn test_attacker_kills_player() {
    let mut app = create_combat_app(42);

    let player = app
        .world_mut()
        .spawn((
            ObjectTag::new("Player"),
            Transform::from_xyz(1.0, 0.0, 0.0),
            Health::new(100),
        ))
        .id();
    let attacker = spawn_ai(app.world_mut(), Vec3::ZERO, "Enemy", attacker_behaviors(0.5));
    let mut cursor = app.world().resource::<Events<AttackPerformed>>().get_cursor();
    let mut performed = Vec::new();

    // Первая атака сразу при входе (reload_timer = 0)
    run_fixed_tick(&mut app);
    assert_eq!(app.world().get::<Health>(player).map(|h| h.current), Some(75));

    for _ in 0..150 {
        let events = app.world().resource::<Events<AttackPerformed>>();
        performed.extend(cursor.read(events).cloned());
        run_fixed_tick(&mut app);
    }
    let events = app.world().resource::<Events<AttackPerformed>>();
    performed.extend(cursor.read(events).cloned());

    let world = app.world();
    let health = world.get::<Health>(player).copied().unwrap_or_default();
    assert!(!health.is_alive(), "Игрок должен умереть: {:?}", health);
    assert_eq!(active_state_name(world, attacker).as_deref(), Some("Attack"));

    // Attack не двигает AI, только разворачивает к цели
    let transform = world.get::<Transform>(attacker).copied().unwrap_or_default();
    assert_eq!(transform.translation, Vec3::ZERO);
    assert!(transform.forward().dot(Vec3::X) > 0.99);

    assert!(performed.len() >= 4);
    assert!(performed.iter().all(|event| event.attack.attacker == attacker));
    assert_eq!(performed[0].remaining_health, Some(75));
    assert_eq!(performed[3].remaining_health, Some(0));
}

#[test]
fn test_event_queues_stay_bounded() {
    let mut app = create_combat_app(42);
    app.world_mut().spawn((
        ObjectTag::new("Player"),
        Transform::from_xyz(1.0, 0.0, 0.0),
        Health::new(100),
    ));
    // reload_time 0: атака каждый тик
    spawn_ai(app.world_mut(), Vec3::ZERO, "Enemy", attacker_behaviors(0.0));

    for _ in 0..100 {
        run_fixed_tick(&mut app);
    }

    // Хранятся только события последних двух тиков
    let attacks = app.world().resource::<Events<AttackPerformed>>();
    assert_eq!(attacks.len(), 2);
    assert_eq!(attacks.iter_current_update_events().count(), 1);
}

#[test]
fn test_attacker_gives_up_when_player_leaves_range() {
    let mut app = create_combat_app(42);

    let player = app
        .world_mut()
        .spawn((
            ObjectTag::new("Player"),
            Transform::from_xyz(1.5, 0.0, 0.0),
            Health::new(100),
        ))
        .id();
    let attacker = spawn_ai(app.world_mut(), Vec3::ZERO, "Enemy", attacker_behaviors(10.0));

    run_fixed_tick(&mut app);
    assert_eq!(active_state_name(app.world(), attacker).as_deref(), Some("Attack"));

    // Телепортируем игрока далеко: следующий reason → OUT_OF_RANGE
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = Vec3::new(20.0, 0.0, 0.0);
    }
    run_fixed_tick(&mut app);

    assert_eq!(active_state_name(app.world(), attacker).as_deref(), Some("Idle"));
    assert_eq!(app.world().get::<Health>(player).map(|h| h.current), Some(75));
}

/// Idle ↔ Help (help point reached → Idle)
fn helper_behaviors() -> AIBehaviors {
    AIBehaviors::default()
        .with_state(AiState::new(IdleState))
        .with_state(
            AiState::new(HelpState {
                help_point_reached_distance: 0.5,
                help_point_reached_state: Some(StateId(0)),
                ..HelpState::default()
            })
            .with_settings(StateSettings {
                movement_speed: 4.0,
                ..StateSettings::default()
            }),
        )
}

#[test]
fn test_get_help_calls_allies_in_radius() {
    let mut app = create_combat_app(42);

    // GetHelp при входе, потом Idle через timer
    let caller_behaviors = AIBehaviors::default()
        .with_state(
            AiState::new(GetHelpState::new("Guard", 10.0))
                .with_trigger(Trigger::timer(0.1, 0.0).transition_to(StateId(1))),
        )
        .with_state(AiState::new(IdleState));
    let caller = spawn_ai(app.world_mut(), Vec3::new(0.0, 0.0, 0.0), "Guard", caller_behaviors);

    let near = spawn_ai(app.world_mut(), Vec3::new(6.0, 1.0, 0.0), "Guard", helper_behaviors());
    let far = spawn_ai(app.world_mut(), Vec3::new(30.0, 0.0, 0.0), "Guard", helper_behaviors());

    run_fixed_tick(&mut app);

    let world = app.world();
    assert_eq!(active_state_name(world, caller).as_deref(), Some("Get Help"));
    assert_eq!(active_state_name(world, near).as_deref(), Some("Help"));
    assert_eq!(active_state_name(world, far).as_deref(), Some("Idle"));

    // Точка помощи: позиция caller'а на высоте helper'а
    let help_point = world
        .get::<AIBehaviors>(near)
        .and_then(|behaviors| behaviors.get_state::<HelpState>())
        .map(|(_, help)| help.help_point);
    assert_eq!(help_point, Some(Vec3::new(0.0, 1.0, 0.0)));

    let messages = world.resource::<Events<AiMessage>>();
    let sent: Vec<_> = messages.iter_current_update_events().collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].sender, caller);

    // 6м при 4 м/с: helper на месте примерно через 1.4с
    for _ in 0..120 {
        run_fixed_tick(&mut app);
    }

    let world = app.world();
    assert_eq!(active_state_name(world, near).as_deref(), Some("Idle"));
    assert_eq!(active_state_name(world, caller).as_deref(), Some("Idle"));
    let near_position = world.get::<Transform>(near).map(|t| t.translation).unwrap_or_default();
    assert!(near_position.distance(Vec3::new(0.0, 1.0, 0.0)) < 0.5);
    let far_position = world.get::<Transform>(far).map(|t| t.translation);
    assert_eq!(far_position, Some(Vec3::new(30.0, 0.0, 0.0)));
}
