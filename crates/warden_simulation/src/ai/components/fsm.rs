//! NPC mode (state machine state).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Режим NPC — ровно один в любой момент
///
/// Переходы (см. `NpcBrain`):
/// - Patrolling → Hunting: цель увидена (StandingAround цель не ищет)
/// - Hunting → Patrolling: истёк hunt timeout (даже если цель всё ещё видна)
/// - Patrolling → StandingAround: бросок stand-around шанса
/// - StandingAround → Patrolling: истёк idle таймер
/// - любой → Dead: hit при нулевых hit points (Dead терминален)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum NpcMode {
    /// Стоит на месте (idle таймер), решения не принимаются
    StandingAround,
    /// Ходит между случайными точками
    Patrolling,
    /// Преследует цель (повышенная скорость)
    Hunting,
    /// Мёртв — AI отключен навсегда
    Dead,
}

impl Default for NpcMode {
    fn default() -> Self {
        Self::Patrolling
    }
}

impl NpcMode {
    /// Idle-family: Patrolling или StandingAround
    pub fn is_idle_family(self) -> bool {
        matches!(self, Self::Patrolling | Self::StandingAround)
    }

    /// Режимы, в которых шаги не звучат
    pub fn is_quiet(self) -> bool {
        matches!(self, Self::StandingAround | Self::Dead)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StandingAround => "StandingAround",
            Self::Patrolling => "Patrolling",
            Self::Hunting => "Hunting",
            Self::Dead => "Dead",
        }
    }
}

impl std::fmt::Display for NpcMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
