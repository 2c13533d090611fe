//! Таймеры NPC (hunt timeout, idle duration)
//!
//! Каждый слот хранит свой оставшийся отсчёт (`bevy::time::Timer`, внутри
//! `Duration`), а не дедлайн на общих часах: точность не зависит от
//! времени жизни агента.
//!
//! Тик владельца: `advance(delta)` до решения, `poll()` после. Таймер,
//! запущенный внутри решения, получает первую delta только на следующем тике.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// Одноразовый отложенный сигнал
///
/// `start` заменяет уже запущенный отсчёт (в слоте не бывает двух таймеров).
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    timer: Option<Timer>,
}

impl Countdown {
    pub fn start(&mut self, duration: f32) {
        self.timer = Some(Timer::from_seconds(duration, TimerMode::Once));
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.timer.as_ref().map(Timer::remaining_secs)
    }

    pub fn advance(&mut self, delta: Duration) {
        if let Some(timer) = self.timer.as_mut() {
            timer.tick(delta);
        }
    }

    /// true ровно один раз — в первом poll после истечения
    pub fn poll(&mut self) -> bool {
        if self.timer.as_ref().is_some_and(Timer::finished) {
            self.timer = None;
            true
        } else {
            false
        }
    }
}
