//! Headless симуляция AIBehaviors
//!
//! Seeker собирает pickups: Seek (ближайший pickup, уничтожить при
//! достижении) → Idle → timer trigger → Seek, пока pickups не кончатся.

use bevy::prelude::*;

use aibehaviors_simulation::ai::{
    AnimationState, CachePoint, IdleState, StateSettings, TaggedObjectFinder, Trigger,
};
use aibehaviors_simulation::*;

const PICKUP_TAG: &str = "Pickup";
const PICKUP_COUNT: usize = 8;
const TICK_COUNT: usize = 1200;

fn main() {
    let config = AiBehaviorsConfig::default();
    println!(
        "Starting AIBehaviors headless simulation (seed: {})",
        config.rng_seed
    );

    let mut app = create_headless_app(config.rng_seed);
    app.add_plugins(SimulationPlugin {
        config: config.clone(),
    });
    set_log_level(LogLevel::Info);

    spawn_pickups(app.world_mut());
    let seeker = spawn_seeker(app.world_mut(), &config);

    for tick in 0..TICK_COUNT {
        run_fixed_tick(&mut app);

        if tick % 100 == 0 {
            let world = app.world_mut();
            let remaining = world
                .query::<&ObjectTag>()
                .iter(world)
                .filter(|tag| tag.is(PICKUP_TAG))
                .count();
            let state = world
                .get::<AIBehaviors>(seeker)
                .and_then(|behaviors| behaviors.active())
                .map(|state| state.display_name().to_string())
                .unwrap_or_else(|| "None".to_string());
            let position = world
                .get::<Transform>(seeker)
                .map(|transform| transform.translation)
                .unwrap_or_default();

            println!(
                "Tick {}: state '{}', position {:.2?}, {} pickups left",
                tick, state, position, remaining
            );
        }
    }

    println!("Simulation complete!");
}

/// Pickups по кругу радиусом 6м
fn spawn_pickups(world: &mut World) {
    for i in 0..PICKUP_COUNT {
        let angle = i as f32 / PICKUP_COUNT as f32 * std::f32::consts::TAU;
        world.spawn((
            ObjectTag::new(PICKUP_TAG),
            Transform::from_xyz(angle.cos() * 6.0, 0.0, angle.sin() * 6.0),
        ));
    }
}

fn spawn_seeker(world: &mut World, config: &AiBehaviorsConfig) -> Entity {
    let seek_id = StateId(0);
    let idle_id = StateId(1);

    let mut seek = config.seek_state();
    seek.destroy_target_when_reached = true;
    seek.distance_to_target_threshold = 0.5;
    seek.seek_target_reached_state = Some(idle_id);
    seek.no_seek_target_found_state = Some(idle_id);
    seek.no_movement_state = Some(idle_id);

    let mut behaviors = AIBehaviors::new(TaggedObjectFinder::new(
        vec![PICKUP_TAG.to_string()],
        CachePoint::EveryFrame,
    ));
    behaviors.add_state(AiState::new(seek).with_settings(StateSettings {
        movement_speed: 3.0,
        animation_states: vec![AnimationState::new("run")],
        ..StateSettings::default()
    }));
    behaviors.add_state(
        AiState::new(IdleState)
            .with_settings(StateSettings {
                animation_states: vec![AnimationState::new("idle")],
                ..StateSettings::default()
            })
            .with_trigger(Trigger::timer(0.5, 0.1).transition_to(seek_id)),
    );
    behaviors.initial_state = Some(seek_id);

    world
        .spawn((
            AiAgent,
            Transform::default(),
            MovementCommand::default(),
            Animator::default(),
            ObjectTag::new("Seeker"),
            behaviors,
        ))
        .id()
}
