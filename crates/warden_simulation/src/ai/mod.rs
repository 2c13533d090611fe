//! AI decision-making module
//!
//! NPC brain: Patrolling ⇄ StandingAround, Patrolling → Hunting (timeout) → Patrolling,
//! любой → Dead. Чистая логика в `brain` (без ECS), системы только кормят её
//! позами, целью и попаданиями.

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod events;
pub mod footsteps;
pub mod locomotion;
pub mod perception;
pub mod systems;
pub mod timers;

// Re-export основных типов
pub use brain::{ModeChange, NpcBrain};
pub use components::*;
pub use events::*;
pub use footsteps::{ActivityId, FootstepCadence, FootstepScheduler};
pub use locomotion::{pick_patrol_point, PatrolSampling};
pub use perception::{sees_target, Pose, VisionCone};
pub use systems::*;
pub use timers::Countdown;

/// Все AI системы (для ordering снаружи: backend движения идёт `.before(NpcAiSet)`)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NpcAiSet;

/// NPC AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. resolve_npc_targets — связь новых NPC с Player
/// 2. apply_npc_hits — попадания (смерть до решения тика)
/// 3. npc_decision_tick — FSM решение + таймеры + шаги
pub struct NpcAIPlugin;

impl Plugin for NpcAIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HitDelivered>()
            .add_event::<NpcWounded>()
            .add_event::<NpcDied>()
            .add_event::<NpcModeChanged>()
            .init_resource::<crate::DeterministicRng>()
            .add_systems(
                FixedUpdate,
                (resolve_npc_targets, apply_npc_hits, npc_decision_tick)
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(NpcAiSet),
            );
    }
}
