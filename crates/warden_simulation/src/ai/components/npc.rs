//! Npc component — brain агента + связь с целью

use bevy::prelude::*;

use crate::ai::brain::NpcBrain;

/// Состояние поиска цели
///
/// Цель ищется один раз (первый `Player` с нужным tag). Не нашли → `Missing`
/// навсегда: агент патрулирует и никогда не охотится.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetLink {
    #[default]
    Unresolved,
    Linked(Entity),
    Missing,
}

/// NPC entity
///
/// Transform — поза агента (позиция + forward), её двигает navigation backend.
#[derive(Component, Debug)]
#[require(Transform)]
pub struct Npc {
    pub brain: NpcBrain,
    pub target: TargetLink,
}

impl Npc {
    pub fn new(brain: NpcBrain) -> Self {
        Self {
            brain,
            target: TargetLink::Unresolved,
        }
    }
}
