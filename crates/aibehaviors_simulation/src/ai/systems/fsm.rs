//! FSM system: тик AIBehaviors всех AI + WorldHost (AiHost поверх Bevy World)

use bevy::prelude::*;

use crate::ai::behaviors::AIBehaviors;
use crate::ai::context::SimClock;
use crate::ai::events::{AiMessage, AnimationRequested, AttackPerformed, AudioRequested, ItemSpawned};
use crate::ai::host::{
    AiHost, AnimationProgress, AttackData, AudioRequest, FoundObject, NavigationService, SceneQuery,
};
use crate::ai::navigation::{NavPath, PathRequestId};
use crate::ai::state::AnimationState;
use crate::components::{Animator, Health, MovementCommand, NavMeshAgent, ObjectTag};
use crate::item_system::{ItemId, SpawnedItem, ITEM_TAG};
use crate::DeterministicRng;

/// AiHost для одного AI entity поверх `&mut World`
///
/// Side effects (аудио, анимация, сообщения, атаки, spawn) применяются к
/// компонентам сразу и дублируются Bevy Events для presentation слоя.
pub struct WorldHost<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World, entity: Entity) -> Self {
        Self { world, entity }
    }
}

impl SceneQuery for WorldHost<'_> {
    fn find_with_tag(&mut self, tag: &str) -> Vec<FoundObject> {
        let mut query = self.world.query::<(Entity, &ObjectTag, &Transform)>();
        let mut found: Vec<FoundObject> = query
            .iter(self.world)
            .filter(|(_, object_tag, _)| object_tag.is(tag))
            .map(|(entity, _, transform)| FoundObject {
                entity,
                position: transform.translation,
            })
            .collect();

        // Стабильный порядок (детерминизм): по Entity index
        found.sort_by_key(|object| object.entity.index());
        found
    }
}

impl NavigationService for WorldHost<'_> {
    fn has_navigation_agent(&self) -> bool {
        self.world.get::<NavMeshAgent>(self.entity).is_some()
    }

    fn request_path(&mut self, target: Vec3) -> Option<PathRequestId> {
        let mut agent = self.world.get_mut::<NavMeshAgent>(self.entity)?;
        Some(agent.request(target))
    }

    fn take_path(&mut self, request: PathRequestId) -> Option<NavPath> {
        let mut agent = self.world.get_mut::<NavMeshAgent>(self.entity)?;
        agent.take_path(request)
    }
}

impl AiHost for WorldHost<'_> {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn position(&self) -> Vec3 {
        self.position_of(self.entity).unwrap_or(Vec3::ZERO)
    }

    fn position_of(&self, target: Entity) -> Option<Vec3> {
        self.world
            .get::<Transform>(target)
            .map(|transform| transform.translation)
    }

    fn move_agent(&mut self, target: Vec3, speed: f32, rotation_speed: f32) {
        if let Some(mut command) = self.world.get_mut::<MovementCommand>(self.entity) {
            *command = MovementCommand::MoveTo {
                target,
                speed,
                rotation_speed,
            };
        }
    }

    fn play_animation(&mut self, animation: &AnimationState) {
        if let Some(mut animator) = self.world.get_mut::<Animator>(self.entity) {
            animator.play(animation);
        }
        self.world.send_event(AnimationRequested {
            entity: self.entity,
            animation: animation.clone(),
        });
    }

    fn play_audio(&mut self, audio: AudioRequest) {
        self.world.send_event(AudioRequested {
            entity: self.entity,
            request: audio,
        });
    }

    fn current_animation(&self, layer: usize) -> Option<AnimationProgress> {
        // Headless аниматор однослойный
        if layer != 0 {
            return None;
        }
        self.world.get::<Animator>(self.entity)?.progress()
    }

    fn health(&self) -> Option<Health> {
        self.world.get::<Health>(self.entity).copied()
    }

    fn attack(&mut self, attack: AttackData) {
        let remaining_health = self.world.get_mut::<Health>(attack.target).map(|mut health| {
            health.take_damage(attack.damage);
            health.current
        });

        if remaining_health == Some(0) {
            crate::log_info(&format!(
                "AI: {:?} killed {:?}",
                attack.attacker, attack.target
            ));
        }

        self.world.send_event(AttackPerformed {
            attack,
            remaining_health,
        });
    }

    fn destroy(&mut self, target: Entity) {
        if self.world.despawn(target) {
            crate::log(&format!("AI: {:?} destroyed {:?}", self.entity, target));
        }
    }

    fn spawn_item(&mut self, item: &ItemId, position: Vec3) {
        let item_entity = self
            .world
            .spawn((
                SpawnedItem {
                    item: item.clone(),
                    spawned_by: self.entity,
                },
                ObjectTag::new(ITEM_TAG),
                Transform::from_translation(position),
            ))
            .id();

        self.world.send_event(ItemSpawned {
            item_entity,
            item: item.clone(),
            position,
        });
    }

    fn send_message(&mut self, message: &str) {
        self.world.send_event(AiMessage {
            sender: self.entity,
            message: message.to_string(),
        });
    }

    fn request_help(&mut self, helper: Entity, help_point: Vec3) -> bool {
        if helper == self.entity {
            return false;
        }
        let Some(mut behaviors) = self.world.get_mut::<AIBehaviors>(helper) else {
            return false;
        };
        behaviors.request_help(help_point)
    }
}

/// Система: один тик FSM каждого AI (exclusive, FixedUpdate)
///
/// AI обрабатываются последовательно в порядке Entity index. AIBehaviors
/// на время тика вынимается из entity, чтобы WorldHost мог свободно
/// читать и писать остальной World.
pub fn run_ai_behaviors(world: &mut World) {
    if !world.contains_resource::<DeterministicRng>() {
        crate::log_error("AI: DeterministicRng resource is missing, AI tick skipped");
        return;
    }

    let clock = world.get_resource::<SimClock>().copied().unwrap_or_default();

    let mut query = world.query_filtered::<Entity, With<AIBehaviors>>();
    let mut entities: Vec<Entity> = query.iter(world).collect();
    entities.sort_by_key(|entity| entity.index());

    world.resource_scope(|world, mut rng: Mut<DeterministicRng>| {
        for entity in entities {
            // AI мог быть уничтожен другим AI на этом же тике
            let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
                continue;
            };
            let Some(mut behaviors) = entity_mut.take::<AIBehaviors>() else {
                continue;
            };

            {
                let mut host = WorldHost::new(world, entity);
                behaviors.tick(&mut host, clock, &mut rng.rng);
            }

            if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
                entity_mut.insert(behaviors);
            }
        }
    });
}
