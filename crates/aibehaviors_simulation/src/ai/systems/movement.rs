//! AI movement systems: исполнение MovementCommand и расчёт путей

use bevy::prelude::*;

use crate::ai::context::SimClock;
use crate::ai::navigation::NavMesh;
use crate::components::{MovementCommand, NavMeshAgent};

/// Система: MovementCommand → Transform
///
/// Двигает актора к target не быстрее speed (м/с) и поворачивает лицом
/// к направлению движения не быстрее rotation_speed (град/с).
/// После исполнения команда сбрасывается в Idle.
pub fn apply_movement_commands(
    clock: Res<SimClock>,
    mut query: Query<(&mut Transform, &mut MovementCommand)>,
) {
    let delta = clock.delta;

    for (mut transform, mut command) in query.iter_mut() {
        let MovementCommand::MoveTo {
            target,
            speed,
            rotation_speed,
        } = *command
        else {
            continue;
        };

        let to_target = target - transform.translation;
        let distance = to_target.length();
        let step = speed * delta;

        if distance <= step {
            transform.translation = target;
        } else if distance > f32::EPSILON {
            transform.translation += to_target / distance * step;
        }

        // Поворот только по горизонтали (yaw)
        let flat = Vec3::new(to_target.x, 0.0, to_target.z);
        if flat.length_squared() > f32::EPSILON {
            let desired = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
            transform.rotation = rotate_towards(
                transform.rotation,
                desired,
                rotation_speed.to_radians() * delta,
            );
        }

        *command = MovementCommand::Idle;
    }
}

/// Поворот from → to не больше чем на max_angle радиан
fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_angle || angle <= f32::EPSILON {
        return to;
    }
    from.slerp(to, max_angle / angle)
}

/// Система: расчёт запрошенных путей (async для состояний)
///
/// Результат виден состоянию на следующем тике.
pub fn resolve_path_requests(
    navmesh: Option<Res<NavMesh>>,
    mut agents: Query<(&Transform, &mut NavMeshAgent)>,
) {
    let unbounded = NavMesh::default();
    let navmesh = navmesh.as_deref().unwrap_or(&unbounded);

    for (transform, mut agent) in agents.iter_mut() {
        let Some((request, target)) = agent.take_queued() else {
            continue;
        };
        let path = navmesh.calculate_path(transform.translation, target);
        agent.complete(request, path);
    }
}
