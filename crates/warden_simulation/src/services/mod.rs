//! Внешние сервисы, которыми управляет NPC brain
//!
//! Архитектура:
//! - Симуляция = strategic layer (mode, таймеры, hit points)
//! - Движок = tactical layer (pathfinding, анимации, звук, raycast)
//!
//! Brain получает реализации через `NpcServices` при создании и никогда
//! не ищет их сам. Headless реализации — в `headless`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod headless;

/// Навигация (NavMesh agent)
///
/// Контракт повторяет типичный navmesh agent движка:
/// destination + прогресс пути + snap точки на walkable поверхность.
pub trait NavigationAgent: Send + Sync {
    /// Новая цель движения (заменяет текущую)
    fn set_destination(&mut self, point: Vec3);
    /// Путь ещё считается
    fn path_pending(&self) -> bool;
    /// Агент стоит на walkable поверхности
    fn is_on_nav_mesh(&self) -> bool;
    /// Оставшаяся дистанция до destination (метры)
    fn remaining_distance(&self) -> f32;
    /// Ближайшая walkable точка в радиусе `max_distance`, если есть
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
    /// Остановить агента (смерть)
    fn stop(&mut self);
}

/// Boolean параметры animator'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationFlag {
    Walking,
    Hunting,
}

impl AnimationFlag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::Hunting => "Hunting",
        }
    }
}

/// One-shot триггеры animator'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationTrigger {
    Death,
}

impl AnimationTrigger {
    pub fn name(self) -> &'static str {
        match self {
            Self::Death => "Death",
        }
    }
}

/// Animator (fire-and-forget)
pub trait AnimationSink: Send + Sync {
    fn set_flag(&mut self, flag: AnimationFlag, value: bool);
    fn trigger(&mut self, trigger: AnimationTrigger);
}

/// Идентификатор звукового клипа (путь ресурса в движке)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Audio source агента: `play` прерывает текущий клип на том же канале
pub trait AudioSink: Send + Sync {
    fn play(&mut self, clip: &ClipId);
}

/// Первое попадание луча
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Tag поверхности ("Player", "Wall", ...)
    pub tag: String,
    pub distance: f32,
}

/// Raycast по миру
///
/// Возвращает первую поверхность на луче в пределах `max_distance`.
/// `direction` должен быть нормализован.
pub trait VisibilityQuery: Send + Sync {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Набор сервисов одного NPC (dependency injection при создании brain)
///
/// Navigation/animation/audio принадлежат агенту. Visibility — общий для мира,
/// поэтому `Arc`.
pub struct NpcServices {
    pub navigation: Box<dyn NavigationAgent>,
    pub animation: Box<dyn AnimationSink>,
    pub audio: Box<dyn AudioSink>,
    pub visibility: Arc<dyn VisibilityQuery>,
}

impl std::fmt::Debug for NpcServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpcServices")
            .field("speed", &self.navigation.speed())
            .field("on_nav_mesh", &self.navigation.is_on_nav_mesh())
            .finish_non_exhaustive()
    }
}
