//! AI Events — попадания по NPC и наблюдаемые изменения состояния
//!
//! Вход: HitDelivered (оружие/снаряд игрока → NPC).
//! Выход: NpcWounded / NpcDied / NpcModeChanged (UI, звук, статистика).

use bevy::prelude::*;

use crate::ai::NpcMode;

/// Попадание по NPC (один hit = минус один hit point)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitDelivered {
    pub target: Entity,
}

/// NPC пережил попадание
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpcWounded {
    pub entity: Entity,
    pub remaining: u32,
}

/// NPC умер (ровно один раз на entity)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpcDied {
    pub entity: Entity,
}

/// Переход FSM
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpcModeChanged {
    pub entity: Entity,
    pub from: NpcMode,
    pub to: NpcMode,
}
