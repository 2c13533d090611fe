//! Vitality — hit points NPC и переход в смерть

use serde::{Deserialize, Serialize};

/// Результат одного попадания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// Пережил попадание, осталось `remaining` hit points
    Wounded { remaining: u32 },
    /// Попадание при нулевых hit points — смерть
    Killed,
    /// Уже мёртв, попадание игнорируется
    AlreadyDead,
}

/// Счётчик hit points
///
/// Проверка "уже ноль" идёт ДО декремента: агент переживает ровно
/// `hit_points` попаданий и умирает на следующем.
/// Инвариант: hit points не уходят ниже нуля, смерть необратима.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitality {
    hit_points: u32,
    dead: bool,
}

impl Vitality {
    pub fn new(hit_points: u32) -> Self {
        Self {
            hit_points,
            dead: false,
        }
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn absorb_hit(&mut self) -> HitOutcome {
        if self.dead {
            return HitOutcome::AlreadyDead;
        }

        if self.hit_points == 0 {
            self.dead = true;
            HitOutcome::Killed
        } else {
            self.hit_points -= 1;
            HitOutcome::Wounded {
                remaining: self.hit_points,
            }
        }
    }
}
