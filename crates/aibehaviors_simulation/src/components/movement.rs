//! Movement компоненты: команды перемещения, navigation agent

use bevy::prelude::*;

use crate::ai::navigation::{NavPath, PathRequestId};

/// Команда движения для актора
///
/// Архитектура:
/// - AI состояние пишет MovementCommand через AiHost::move_agent (high-level intent)
/// - apply_movement_commands двигает Transform и сбрасывает команду в Idle
/// - Состояние, которое хочет продолжать движение, выставляет команду каждый тик
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveTo {
        target: Vec3,
        /// Метры в секунду
        speed: f32,
        /// Градусы в секунду
        rotation_speed: f32,
    },
}

/// Navigation agent: очередь запросов пути (один слот)
///
/// Новый запрос вытесняет предыдущий, незабранный результат
/// перезаписывается следующим. Пути считает resolve_path_requests.
#[derive(Component, Debug, Clone, Default)]
pub struct NavMeshAgent {
    next_request_id: u64,
    queued: Option<(PathRequestId, Vec3)>,
    completed: Option<(PathRequestId, NavPath)>,
}

impl NavMeshAgent {
    /// Поставить запрос в очередь
    pub fn request(&mut self, target: Vec3) -> PathRequestId {
        self.next_request_id += 1;
        let id = PathRequestId(self.next_request_id);
        self.queued = Some((id, target));
        id
    }

    /// Запрос, ожидающий расчёта
    pub fn take_queued(&mut self) -> Option<(PathRequestId, Vec3)> {
        self.queued.take()
    }

    pub fn complete(&mut self, id: PathRequestId, path: NavPath) {
        self.completed = Some((id, path));
    }

    /// Забрать результат конкретного запроса (чужой id: None, результат остаётся)
    pub fn take_path(&mut self, id: PathRequestId) -> Option<NavPath> {
        match &self.completed {
            Some((completed_id, _)) if *completed_id == id => {
                self.completed.take().map(|(_, path)| path)
            }
            _ => None,
        }
    }

    pub fn has_pending_request(&self) -> bool {
        self.queued.is_some()
    }
}
