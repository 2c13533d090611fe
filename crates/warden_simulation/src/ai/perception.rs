//! Perception — конус зрения + line-of-sight raycast
//!
//! Проверка цели за тик:
//! 1. дистанция < view_distance
//! 2. угол между forward и направлением на цель < view_angle / 2
//! 3. первый объект на луче (от глаз) имеет tag цели
//!
//! Результат не кешируется: каждый вызов считает заново от текущих позиций.

use bevy::prelude::*;

use crate::ai::NpcConfig;
use crate::services::VisibilityQuery;

/// Позиция и направление взгляда агента (берутся из Transform каждый тик)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Forward = -Z (bevy convention)
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            forward: transform.forward().as_vec3(),
        }
    }
}

/// Параметры конуса зрения
#[derive(Debug, Clone, PartialEq)]
pub struct VisionCone {
    pub view_distance: f32,
    /// Полный угол (градусы)
    pub view_angle: f32,
    pub eye_height: f32,
    pub target_tag: String,
}

impl Default for VisionCone {
    fn default() -> Self {
        Self::from_config(&NpcConfig::default())
    }
}

impl VisionCone {
    pub fn from_config(config: &NpcConfig) -> Self {
        Self {
            view_distance: config.view_distance,
            view_angle: config.view_angle,
            eye_height: config.eye_height,
            target_tag: config.target_tag.clone(),
        }
    }

    /// Цель в пределах дистанции и угла (без raycast)
    pub fn contains(&self, observer: &Pose, target: Vec3) -> bool {
        let to_target = target - observer.position;
        let distance = to_target.length();
        if distance >= self.view_distance {
            return false;
        }

        // Цель в той же точке или вырожденный forward — направление не определено
        let (Some(direction), Some(forward)) =
            (to_target.try_normalize(), observer.forward.try_normalize())
        else {
            return false;
        };

        let angle = forward.dot(direction).clamp(-1.0, 1.0).acos().to_degrees();
        angle < self.view_angle / 2.0
    }
}

/// Видит ли агент цель в этом тике
///
/// Препятствие на луче — промах, не ошибка.
pub fn sees_target(
    observer: &Pose,
    target: Vec3,
    cone: &VisionCone,
    visibility: &dyn VisibilityQuery,
) -> bool {
    if !cone.contains(observer, target) {
        return false;
    }

    let Some(direction) = (target - observer.position).try_normalize() else {
        return false;
    };
    let eyes = observer.position + Vec3::Y * cone.eye_height;

    visibility
        .raycast(eyes, direction, cone.view_distance)
        .is_some_and(|hit| hit.tag == cone.target_tag)
}
