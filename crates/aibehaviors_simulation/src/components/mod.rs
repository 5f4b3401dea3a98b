//! ECS Components для entity симуляции
//!
//! Организация по доменам:
//! - actor: базовые характеристики (AiAgent, Health)
//! - movement: перемещение и навигация (MovementCommand, NavMeshAgent)
//! - world: теги объектов для scene query (ObjectTag)
//! - animation: headless аниматор (Animator)

pub mod actor;
pub mod animation;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use movement::*;
pub use world::*;
