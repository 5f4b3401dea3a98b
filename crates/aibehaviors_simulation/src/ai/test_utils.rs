//! MockHost: AiHost для unit тестов (записывает все вызовы)

use std::collections::HashMap;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::context::SimClock;
use crate::ai::host::{
    AiHost, AnimationProgress, AttackData, AudioRequest, FoundObject, NavigationService, SceneQuery,
};
use crate::ai::navigation::{NavMesh, NavPath, PathRequestId};
use crate::ai::state::AnimationState;
use crate::components::Health;
use crate::item_system::ItemId;

pub const MOCK_AI_INDEX: u32 = 1000;

pub struct MockObject {
    pub entity: Entity,
    pub tag: String,
    pub position: Vec3,
}

pub struct MockHost {
    pub entity: Entity,
    pub position: Vec3,
    pub objects: Vec<MockObject>,
    pub has_agent: bool,
    pub health: Option<Health>,
    pub animation_progress: Option<AnimationProgress>,
    /// Ответ на request_help
    pub help_answer: bool,

    pub query_count: usize,
    pub moves: Vec<(Vec3, f32, f32)>,
    pub animations: Vec<String>,
    pub audio: Vec<AudioRequest>,
    pub attacks: Vec<AttackData>,
    pub destroyed: Vec<Entity>,
    pub spawned: Vec<(ItemId, Vec3)>,
    pub messages: Vec<String>,
    pub help_requests: Vec<(Entity, Vec3)>,
    pub path_requests: Vec<(PathRequestId, Vec3)>,
    completed_paths: HashMap<PathRequestId, NavPath>,
    resolved_requests: usize,
    next_entity: u32,
    next_request: u64,
}

impl MockHost {
    pub fn new(position: Vec3) -> Self {
        Self {
            entity: Entity::from_raw(MOCK_AI_INDEX),
            position,
            objects: Vec::new(),
            has_agent: false,
            health: None,
            animation_progress: None,
            help_answer: true,
            query_count: 0,
            moves: Vec::new(),
            animations: Vec::new(),
            audio: Vec::new(),
            attacks: Vec::new(),
            destroyed: Vec::new(),
            spawned: Vec::new(),
            messages: Vec::new(),
            help_requests: Vec::new(),
            path_requests: Vec::new(),
            completed_paths: HashMap::new(),
            resolved_requests: 0,
            next_entity: 1,
            next_request: 0,
        }
    }

    /// Добавить объект с тегом, вернуть его entity
    pub fn add_object(&mut self, tag: &str, position: Vec3) -> Entity {
        let entity = Entity::from_raw(self.next_entity);
        self.next_entity += 1;
        self.add_object_with_entity(entity, tag, position);
        entity
    }

    pub fn add_object_with_entity(&mut self, entity: Entity, tag: &str, position: Vec3) {
        self.objects.push(MockObject {
            entity,
            tag: tag.to_string(),
            position,
        });
    }

    /// Уничтожить объект извне (не через AI)
    pub fn remove_object(&mut self, entity: Entity) {
        self.objects.retain(|object| object.entity != entity);
    }

    pub fn set_object_position(&mut self, entity: Entity, position: Vec3) {
        if let Some(object) = self.objects.iter_mut().find(|o| o.entity == entity) {
            object.position = position;
        }
    }

    /// Посчитать все запрошенные пути по navmesh от текущей позиции AI
    pub fn resolve_paths(&mut self, navmesh: &NavMesh) {
        for (id, target) in &self.path_requests[self.resolved_requests..] {
            let path = navmesh.calculate_path(self.position, *target);
            self.completed_paths.insert(*id, path);
        }
        self.resolved_requests = self.path_requests.len();
    }

    pub fn last_move_target(&self) -> Option<Vec3> {
        self.moves.last().map(|(target, _, _)| *target)
    }
}

impl SceneQuery for MockHost {
    fn find_with_tag(&mut self, tag: &str) -> Vec<FoundObject> {
        self.query_count += 1;
        self.objects
            .iter()
            .filter(|object| object.tag == tag)
            .map(|object| FoundObject {
                entity: object.entity,
                position: object.position,
            })
            .collect()
    }
}

impl NavigationService for MockHost {
    fn has_navigation_agent(&self) -> bool {
        self.has_agent
    }

    fn request_path(&mut self, target: Vec3) -> Option<PathRequestId> {
        if !self.has_agent {
            return None;
        }
        self.next_request += 1;
        let id = PathRequestId(self.next_request);
        self.path_requests.push((id, target));
        Some(id)
    }

    fn take_path(&mut self, request: PathRequestId) -> Option<NavPath> {
        self.completed_paths.remove(&request)
    }
}

impl AiHost for MockHost {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn position_of(&self, target: Entity) -> Option<Vec3> {
        if target == self.entity {
            return Some(self.position);
        }
        self.objects
            .iter()
            .find(|object| object.entity == target)
            .map(|object| object.position)
    }

    fn move_agent(&mut self, target: Vec3, speed: f32, rotation_speed: f32) {
        self.moves.push((target, speed, rotation_speed));
    }

    fn play_animation(&mut self, animation: &AnimationState) {
        self.animations.push(animation.name.clone());
    }

    fn play_audio(&mut self, audio: AudioRequest) {
        self.audio.push(audio);
    }

    fn current_animation(&self, layer: usize) -> Option<AnimationProgress> {
        if layer != 0 {
            return None;
        }
        self.animation_progress.clone()
    }

    fn health(&self) -> Option<Health> {
        self.health
    }

    fn attack(&mut self, attack: AttackData) {
        self.attacks.push(attack);
    }

    fn destroy(&mut self, target: Entity) {
        self.remove_object(target);
        self.destroyed.push(target);
    }

    fn spawn_item(&mut self, item: &ItemId, position: Vec3) {
        self.spawned.push((item.clone(), position));
    }

    fn send_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn request_help(&mut self, helper: Entity, help_point: Vec3) -> bool {
        self.help_requests.push((helper, help_point));
        self.help_answer
    }
}

pub fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// Clock на момент time (real time идёт вместе с simulation time)
pub fn clock_at(time: f32, frame: u64) -> SimClock {
    SimClock {
        time,
        real_time: time,
        delta: 0.1,
        frame,
    }
}
