//! Headless реализации сервисов (без движка)
//!
//! Используются headless runner'ом и тестами:
//! - `HeadlessNavigation` — прямолинейное движение по прямоугольной walkable зоне
//! - `HeadlessVisibility` — raycast по tagged сферам
//! - `AnimationRecorder` / `AudioRecorder` — пишут вызовы в shared лог
//!
//! Состояние лежит за `Arc<Mutex<..>>`: одна копия внутри brain (как сервис),
//! вторая в ECS компоненте (для систем движения и для проверок в тестах).

use bevy::math::bounding::{BoundingSphere, RayCast3d};
use bevy::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::{
    AnimationFlag, AnimationSink, AnimationTrigger, AudioSink, ClipId, NavigationAgent,
    NpcServices, RayHit, VisibilityQuery,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Navigation
// ============================================================================

/// Прямоугольная walkable зона на плоскости XZ (высота пола = `height`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableArea {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl WalkableArea {
    /// Квадрат с центром в начале координат
    pub fn square(half_extent: f32) -> Self {
        Self {
            min: Vec2::splat(-half_extent),
            max: Vec2::splat(half_extent),
            height: 0.0,
        }
    }

    /// Ближайшая walkable точка, если она не дальше `max_distance` по горизонтали
    pub fn snap(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let clamped = Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.z.clamp(self.min.y, self.max.y),
        );
        let offset = Vec2::new(point.x, point.z).distance(clamped);

        (offset <= max_distance).then(|| Vec3::new(clamped.x, self.height, clamped.y))
    }
}

/// Состояние headless navmesh агента
#[derive(Debug, Clone)]
pub struct NavBody {
    pub position: Vec3,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopped: bool,
    pub path_pending: bool,
    pub on_nav_mesh: bool,
    /// `None` — sample_position всегда промахивается
    pub walkable: Option<WalkableArea>,
    /// Сколько раз выставляли destination (для тестов)
    pub destinations_issued: u32,
}

impl NavBody {
    pub fn new(position: Vec3, speed: f32, walkable: Option<WalkableArea>) -> Self {
        Self {
            position,
            destination: None,
            speed,
            stopped: false,
            path_pending: false,
            on_nav_mesh: true,
            walkable,
            destinations_issued: 0,
        }
    }

    /// Горизонтальная дистанция до destination (0 если цели нет)
    pub fn remaining_distance(&self) -> f32 {
        self.destination.map_or(0.0, |destination| {
            Vec2::new(self.position.x, self.position.z)
                .distance(Vec2::new(destination.x, destination.z))
        })
    }

    /// Сдвигает агента к destination на `speed * delta`.
    ///
    /// Возвращает направление движения (для поворота), `None` если стоим.
    pub fn step(&mut self, delta: f32) -> Option<Vec3> {
        if self.stopped || !self.on_nav_mesh {
            return None;
        }
        let destination = self.destination?;

        let to_target = Vec3::new(
            destination.x - self.position.x,
            0.0,
            destination.z - self.position.z,
        );
        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return None;
        }

        let direction = to_target / distance;
        let travel = self.speed * delta;
        if travel >= distance {
            self.position.x = destination.x;
            self.position.z = destination.z;
        } else {
            self.position += direction * travel;
        }

        Some(direction)
    }

    /// Мгновенно переносит агента в destination
    pub fn arrive(&mut self) {
        if let Some(destination) = self.destination {
            self.position.x = destination.x;
            self.position.z = destination.z;
        }
    }
}

/// Компонент: доступ ECS к `NavBody`, который brain использует как сервис
#[derive(Component, Debug, Clone)]
pub struct HeadlessNavHandle(Arc<Mutex<NavBody>>);

impl HeadlessNavHandle {
    pub fn new(body: NavBody) -> Self {
        Self(Arc::new(Mutex::new(body)))
    }

    /// Сервис для brain (делит состояние с handle)
    pub fn agent(&self) -> HeadlessNavigation {
        HeadlessNavigation {
            body: Arc::clone(&self.0),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut NavBody) -> R) -> R {
        f(&mut lock(&self.0))
    }

    pub fn snapshot(&self) -> NavBody {
        lock(&self.0).clone()
    }
}

/// `NavigationAgent` поверх shared `NavBody`
#[derive(Debug, Clone)]
pub struct HeadlessNavigation {
    body: Arc<Mutex<NavBody>>,
}

impl NavigationAgent for HeadlessNavigation {
    fn set_destination(&mut self, point: Vec3) {
        let mut body = lock(&self.body);
        body.destination = Some(point);
        body.destinations_issued += 1;
    }

    fn path_pending(&self) -> bool {
        lock(&self.body).path_pending
    }

    fn is_on_nav_mesh(&self) -> bool {
        lock(&self.body).on_nav_mesh
    }

    fn remaining_distance(&self) -> f32 {
        lock(&self.body).remaining_distance()
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        lock(&self.body)
            .walkable
            .and_then(|area| area.snap(point, max_distance))
    }

    fn speed(&self) -> f32 {
        lock(&self.body).speed
    }

    fn set_speed(&mut self, speed: f32) {
        lock(&self.body).speed = speed;
    }

    fn stop(&mut self) {
        lock(&self.body).stopped = true;
    }
}

/// Система: headless движение NPC к destination
///
/// NavBody — источник правды для позиции, Transform только отражает её.
/// Поворачиваем по направлению движения (forward = -Z).
pub fn drive_headless_navigation(
    mut query: Query<(&HeadlessNavHandle, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (handle, mut transform) in query.iter_mut() {
        handle.with(|body| {
            if let Some(direction) = body.step(delta) {
                transform.look_to(direction, Vec3::Y);
            }
            transform.translation = body.position;
        });
    }
}

// ============================================================================
// Visibility
// ============================================================================

/// Компонент: сферический коллайдер для headless raycast
///
/// NPC коллайдер не нужен (луч стартует внутри него и попал бы в себя).
#[derive(Component, Debug, Clone)]
pub struct HeadlessCollider {
    pub tag: String,
    pub radius: f32,
}

impl HeadlessCollider {
    pub fn new(tag: impl Into<String>, radius: f32) -> Self {
        Self {
            tag: tag.into(),
            radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSphere {
    pub center: Vec3,
    pub radius: f32,
    pub tag: String,
}

/// Resource: мир для raycast'ов (tagged сферы)
#[derive(Resource, Debug, Clone, Default)]
pub struct HeadlessVisibility {
    spheres: Arc<RwLock<Vec<TaggedSphere>>>,
}

impl HeadlessVisibility {
    pub fn new(spheres: Vec<TaggedSphere>) -> Self {
        Self {
            spheres: Arc::new(RwLock::new(spheres)),
        }
    }

    pub fn set_spheres(&self, spheres: Vec<TaggedSphere>) {
        *self.spheres.write().unwrap_or_else(PoisonError::into_inner) = spheres;
    }

    /// Сервис для brain (делит сферы с resource)
    pub fn service(&self) -> Arc<dyn VisibilityQuery> {
        Arc::new(self.clone())
    }
}

impl VisibilityQuery for HeadlessVisibility {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = Dir3::new(direction).ok()?;
        let ray = RayCast3d::from_ray(Ray3d::new(origin, direction), max_distance);
        let spheres = self.spheres.read().unwrap_or_else(PoisonError::into_inner);

        // Старт внутри сферы → попадание на дистанции 0
        spheres
            .iter()
            .filter_map(|sphere| {
                ray.sphere_intersection_at(&BoundingSphere::new(sphere.center, sphere.radius))
                    .map(|distance| (distance, sphere))
            })
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(distance, sphere)| RayHit {
                tag: sphere.tag.clone(),
                distance,
            })
    }
}

/// Система: пересобирает сферы из HeadlessCollider компонентов
pub fn sync_headless_colliders(
    visibility: Res<HeadlessVisibility>,
    colliders: Query<(&Transform, &HeadlessCollider)>,
) {
    let spheres = colliders
        .iter()
        .map(|(transform, collider)| TaggedSphere {
            center: transform.translation,
            radius: collider.radius,
            tag: collider.tag.clone(),
        })
        .collect();

    visibility.set_spheres(spheres);
}

// ============================================================================
// Animation / Audio
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationCall {
    Flag(AnimationFlag, bool),
    Trigger(AnimationTrigger),
}

/// Animator, записывающий все вызовы
#[derive(Debug, Clone, Default)]
pub struct AnimationRecorder {
    calls: Arc<Mutex<Vec<AnimationCall>>>,
}

impl AnimationRecorder {
    pub fn calls(&self) -> Vec<AnimationCall> {
        lock(&self.calls).clone()
    }

    /// Последнее выставленное значение flag'а (false если не выставлялся)
    pub fn flag(&self, flag: AnimationFlag) -> bool {
        lock(&self.calls)
            .iter()
            .rev()
            .find_map(|call| match call {
                AnimationCall::Flag(f, value) if *f == flag => Some(*value),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn trigger_count(&self, trigger: AnimationTrigger) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| **call == AnimationCall::Trigger(trigger))
            .count()
    }
}

impl AnimationSink for AnimationRecorder {
    fn set_flag(&mut self, flag: AnimationFlag, value: bool) {
        lock(&self.calls).push(AnimationCall::Flag(flag, value));
    }

    fn trigger(&mut self, trigger: AnimationTrigger) {
        lock(&self.calls).push(AnimationCall::Trigger(trigger));
    }
}

/// Audio source, записывающий проигранные клипы
#[derive(Debug, Clone, Default)]
pub struct AudioRecorder {
    played: Arc<Mutex<Vec<ClipId>>>,
}

impl AudioRecorder {
    pub fn played(&self) -> Vec<ClipId> {
        lock(&self.played).clone()
    }

    pub fn play_count(&self) -> usize {
        lock(&self.played).len()
    }

    pub fn clear(&self) {
        lock(&self.played).clear();
    }
}

impl AudioSink for AudioRecorder {
    fn play(&mut self, clip: &ClipId) {
        lock(&self.played).push(clip.clone());
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Handles на headless сервисы одного NPC (для ECS и проверок)
#[derive(Debug, Clone)]
pub struct HeadlessRig {
    pub navigation: HeadlessNavHandle,
    pub animation: AnimationRecorder,
    pub audio: AudioRecorder,
}

/// Собирает `NpcServices` на headless реализациях
pub fn headless_services(body: NavBody, visibility: &HeadlessVisibility) -> (NpcServices, HeadlessRig) {
    let rig = HeadlessRig {
        navigation: HeadlessNavHandle::new(body),
        animation: AnimationRecorder::default(),
        audio: AudioRecorder::default(),
    };

    let services = NpcServices {
        navigation: Box::new(rig.navigation.agent()),
        animation: Box::new(rig.animation.clone()),
        audio: Box::new(rig.audio.clone()),
        visibility: visibility.service(),
    };

    (services, rig)
}

/// Plugin: headless движение + коллайдеры
///
/// Системы идут ДО AI систем: brain видит позиции и прогресс пути текущего тика.
pub struct HeadlessBackendPlugin;

impl Plugin for HeadlessBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessVisibility>().add_systems(
            FixedUpdate,
            (drive_headless_navigation, sync_headless_colliders)
                .chain()
                .before(crate::ai::NpcAiSet),
        );
    }
}
