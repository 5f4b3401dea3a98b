//! AI systems (Bevy host для AIBehaviors)

pub mod clock;
pub mod fsm;
pub mod movement;

// Re-export all systems
pub use clock::*;
pub use fsm::*;
pub use movement::*;
