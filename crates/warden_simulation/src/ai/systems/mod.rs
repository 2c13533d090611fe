//! AI systems (strategic layer logic)

pub mod fsm;
pub mod reactions;

// Re-export all systems
pub use fsm::*;
pub use reactions::*;
