//! Navigation: путь, статус пути, простой planner для headless хоста
//!
//! Реальный navmesh считает движок. Для headless симуляции
//! `NavMesh` resource строит прямой путь, ограниченный walkable областью
//! на плоскости XZ. Если цель вне области, путь Partial: последний угол
//! пути = ближайшая достижимая точка ("get as close as possible").

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Статус рассчитанного пути
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathStatus {
    /// Путь доходит до цели
    Complete,
    /// Путь доходит до ближайшей достижимой точки
    Partial,
    /// Путь не найден (или ещё не считался)
    #[default]
    Invalid,
}

/// Рассчитанный путь (углы от старта до конца)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavPath {
    pub status: PathStatus,
    pub corners: Vec<Vec3>,
}

impl NavPath {
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.status != PathStatus::Invalid
    }

    pub fn last_corner(&self) -> Option<Vec3> {
        self.corners.last().copied()
    }
}

/// ID запроса пути (уникален в пределах одного агента)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathRequestId(pub u64);

/// Walkable область для headless planner
///
/// bounds = None: весь мир проходим, путь всегда Complete.
#[derive(Resource, Debug, Clone, Default)]
pub struct NavMesh {
    pub bounds: Option<WalkableArea>,
}

/// Прямоугольник на плоскости XZ (y не ограничивается)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl WalkableArea {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }

    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

impl NavMesh {
    pub fn with_bounds(min: Vec2, max: Vec2) -> Self {
        Self {
            bounds: Some(WalkableArea::new(min, max)),
        }
    }

    /// Посчитать путь from → to
    pub fn calculate_path(&self, from: Vec3, to: Vec3) -> NavPath {
        let Some(area) = self.bounds else {
            return NavPath {
                status: PathStatus::Complete,
                corners: vec![from, to],
            };
        };

        // Старт вне navmesh: путь не строится
        if !area.contains(from) {
            return NavPath::invalid();
        }

        let end = area.clamp(to);
        let status = if end == to {
            PathStatus::Complete
        } else {
            PathStatus::Partial
        };

        NavPath {
            status,
            corners: vec![from, end],
        }
    }
}
