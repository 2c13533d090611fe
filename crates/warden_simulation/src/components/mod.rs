//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: hit points NPC (Vitality, HitOutcome)
//! - player: цель NPC (Player)
//!
//! NPC компоненты (Npc, NpcMode, NpcConfig) живут в crate::ai.

pub mod actor;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
