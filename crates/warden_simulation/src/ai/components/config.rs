//! NPC tuning parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::ClipId;

/// Ошибки конфигурации NPC
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Параметр должен быть > 0
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        field: &'static str,
        value: f32,
    },
    /// Шанс в процентах вне 0..=100
    #[error("stand_around_chance must be within 0..=100, got {0}")]
    ChanceOutOfRange(f32),
    /// Угол обзора вне (0, 360]
    #[error("view_angle must be within (0, 360] degrees, got {0}")]
    ViewAngleOutOfRange(f32),
    /// min > max
    #[error("idle duration range is inverted: min {min} > max {max}")]
    InvertedIdleRange { min: f32, max: f32 },
    #[error("patrol_sample_attempts must be at least 1")]
    NoSampleAttempts,
    /// Невалидный JSON
    #[error("failed to parse npc config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Параметры NPC (все настраиваемые, у всех есть defaults)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Сколько попаданий NPC переживает (умирает на hit_points + 1)
    pub hit_points: u32,
    /// Множитель скорости при охоте
    pub hunt_speed_multiplier: f32,
    /// Радиус выбора patrol точки (метры)
    pub patrol_radius: f32,
    /// Шанс встать на месте вместо нового шага патруля (проценты)
    pub stand_around_chance: f32,
    /// Длительность охоты (секунды), не продлевается повторным обнаружением
    pub hunt_timeout: f32,
    /// Интервал шагов при патруле (секунды)
    pub patrol_step_interval: f32,
    /// Интервал шагов при охоте (секунды)
    pub hunt_step_interval: f32,
    pub idle_duration_min: f32,
    pub idle_duration_max: f32,
    /// Дальность зрения (метры)
    pub view_distance: f32,
    /// Полный угол конуса зрения (градусы)
    pub view_angle: f32,
    /// Высота глаз над позицией агента (начало луча)
    pub eye_height: f32,
    /// Tag поверхности цели
    pub target_tag: String,
    pub patrol_sample_attempts: u32,
    /// Допуск snap'а на walkable поверхность (метры)
    pub patrol_sample_tolerance: f32,
    /// remaining_distance, ниже которой агент считается пришедшим
    pub arrival_tolerance: f32,
    pub footstep_clips: Vec<ClipId>,
    pub idle_clip: Option<ClipId>,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            hit_points: 5,
            hunt_speed_multiplier: 10.0,
            patrol_radius: 3.0,
            stand_around_chance: 15.0,
            hunt_timeout: 15.0,
            patrol_step_interval: 1.8,
            hunt_step_interval: 0.3,
            idle_duration_min: 1.0,
            idle_duration_max: 3.0,
            view_distance: 20.0,
            view_angle: 60.0,
            eye_height: 1.0,
            target_tag: "Player".to_string(),
            patrol_sample_attempts: 10,
            patrol_sample_tolerance: 1.5,
            arrival_tolerance: 0.1,
            footstep_clips: Vec::new(),
            idle_clip: None,
        }
    }
}

impl NpcConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("hunt_speed_multiplier", self.hunt_speed_multiplier),
            ("patrol_radius", self.patrol_radius),
            ("hunt_timeout", self.hunt_timeout),
            ("patrol_step_interval", self.patrol_step_interval),
            ("hunt_step_interval", self.hunt_step_interval),
            ("idle_duration_min", self.idle_duration_min),
            ("view_distance", self.view_distance),
            ("patrol_sample_tolerance", self.patrol_sample_tolerance),
        ];
        for (field, value) in positive {
            // NaN тоже не проходит
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(0.0..=100.0).contains(&self.stand_around_chance) {
            return Err(ConfigError::ChanceOutOfRange(self.stand_around_chance));
        }
        if !(self.view_angle > 0.0 && self.view_angle <= 360.0) {
            return Err(ConfigError::ViewAngleOutOfRange(self.view_angle));
        }
        if self.idle_duration_min > self.idle_duration_max {
            return Err(ConfigError::InvertedIdleRange {
                min: self.idle_duration_min,
                max: self.idle_duration_max,
            });
        }
        if self.patrol_sample_attempts == 0 {
            return Err(ConfigError::NoSampleAttempts);
        }

        Ok(())
    }
}
