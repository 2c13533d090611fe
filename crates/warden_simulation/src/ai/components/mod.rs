//! AI components

pub mod config;
pub mod fsm;
pub mod npc;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod fsm_tests;

// Re-export all components
pub use config::*;
pub use fsm::*;
pub use npc::*;
