//! NPC brain — state machine одного агента
//!
//! Тик:
//! 1. Dead → ничего (AI отключен навсегда)
//! 2. uptime += delta, запущенные таймеры и шаги получают delta
//! 3. решение по текущему режиму:
//!    - StandingAround: пропуск (ни perception, ни патруля)
//!    - Hunting: destination = живая позиция цели (каждый тик)
//!    - Patrolling: видим цель → Hunting, иначе случайная прогулка
//! 4. пробуждение истёкших таймеров (hunt timeout, idle, шаги)
//!
//! Решение тика видит режим таким, каким его оставил прошлый тик. Таймер,
//! запущенный в решении, начинает отсчёт со следующего тика.
//! Все сервисы (навигация, анимации, звук, raycast) приходят через `NpcServices`.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::footsteps::{ActivityId, FootstepCadence, FootstepScheduler};
use crate::ai::locomotion::{pick_patrol_point, PatrolSampling};
use crate::ai::perception::{sees_target, Pose, VisionCone};
use crate::ai::timers::Countdown;
use crate::ai::{ConfigError, NpcConfig, NpcMode};
use crate::components::{HitOutcome, Vitality};
use crate::services::{AnimationFlag, AnimationTrigger, NpcServices};

/// Переход между режимами (для ECS событий)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: NpcMode,
    pub to: NpcMode,
}

#[derive(Debug)]
pub struct NpcBrain {
    name: String,
    config: NpcConfig,
    cone: VisionCone,
    sampling: PatrolSampling,
    cadence: FootstepCadence,

    mode: NpcMode,
    vitality: Vitality,
    /// Скорость агента до первой охоты (восстанавливается при выходе из Hunting)
    baseline_speed: f32,

    /// Время жизни агента (только для диагностики, таймеры считают сами)
    uptime: Duration,
    /// Растёт при каждом входе в StandingAround/Dead (кооперативная отмена шагов)
    quiet_epoch: u64,
    hunt_timer: Countdown,
    idle_timer: Countdown,
    footsteps: FootstepScheduler,

    /// Переходы последнего вызова tick/apply_hit
    transitions: Vec<ModeChange>,
    services: NpcServices,
}

impl NpcBrain {
    pub fn new(name: impl Into<String>, config: NpcConfig, services: NpcServices) -> Result<Self, ConfigError> {
        config.validate()?;

        let baseline_speed = services.navigation.speed();
        let cone = VisionCone::from_config(&config);
        let sampling = PatrolSampling {
            radius: config.patrol_radius,
            max_attempts: config.patrol_sample_attempts,
            tolerance: config.patrol_sample_tolerance,
        };
        let cadence = FootstepCadence {
            patrol_interval: config.patrol_step_interval,
            hunt_interval: config.hunt_step_interval,
        };

        Ok(Self {
            name: name.into(),
            vitality: Vitality::new(config.hit_points),
            config,
            cone,
            sampling,
            cadence,
            mode: NpcMode::Patrolling,
            baseline_speed,
            uptime: Duration::ZERO,
            quiet_epoch: 0,
            hunt_timer: Countdown::default(),
            idle_timer: Countdown::default(),
            footsteps: FootstepScheduler::default(),
            transitions: Vec::new(),
            services,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> NpcMode {
        self.mode
    }

    pub fn is_dead(&self) -> bool {
        self.mode == NpcMode::Dead
    }

    pub fn hit_points(&self) -> u32 {
        self.vitality.hit_points()
    }

    pub fn config(&self) -> &NpcConfig {
        &self.config
    }

    pub fn uptime(&self) -> Duration {
        self.uptime
    }

    pub fn speed(&self) -> f32 {
        self.services.navigation.speed()
    }

    pub fn baseline_speed(&self) -> f32 {
        self.baseline_speed
    }

    pub fn footstep_activity(&self) -> Option<ActivityId> {
        self.footsteps.active_id()
    }

    pub fn active_footstep_activities(&self) -> usize {
        self.footsteps.active_count()
    }

    pub fn hunt_time_remaining(&self) -> Option<f32> {
        self.hunt_timer.remaining()
    }

    pub fn idle_time_remaining(&self) -> Option<f32> {
        self.idle_timer.remaining()
    }

    /// Переходы, сделанные последним `tick` или `apply_hit` (не больше одного)
    pub fn transitions(&self) -> &[ModeChange] {
        &self.transitions
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Один тик решения. `target` — текущая позиция цели (`None` если цели нет).
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, pose: Pose, target: Option<Vec3>, rng: &mut R) {
        self.transitions.clear();
        if self.is_dead() {
            return;
        }

        self.uptime += delta;
        self.hunt_timer.advance(delta);
        self.idle_timer.advance(delta);
        self.footsteps.advance(delta);

        self.decide(&pose, target, rng);
        self.resume_timers(rng);
    }

    fn decide<R: Rng + ?Sized>(&mut self, pose: &Pose, target: Option<Vec3>, rng: &mut R) {
        match self.mode {
            NpcMode::Dead | NpcMode::StandingAround => {}

            NpcMode::Hunting => {
                // Цель двигается — обновляем destination каждый тик
                if let Some(target) = target {
                    self.services.navigation.set_destination(target);
                }
            }

            NpcMode::Patrolling => {
                let spotted = target.filter(|target| {
                    sees_target(pose, *target, &self.cone, self.services.visibility.as_ref())
                });

                match spotted {
                    Some(target) => self.start_hunt(target),
                    None => self.random_walk(pose, rng),
                }
            }
        }
    }

    fn resume_timers<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.hunt_timer.poll() {
            self.end_hunt();
        }

        if self.idle_timer.poll() && self.mode == NpcMode::StandingAround {
            self.set_mode(NpcMode::Patrolling);
        }

        self.footsteps.poll(
            self.mode,
            self.quiet_epoch,
            &self.config.footstep_clips,
            self.services.audio.as_mut(),
            rng,
        );
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn set_mode(&mut self, to: NpcMode) {
        let from = self.mode;
        if from == to {
            return;
        }

        crate::log(&format!("AI: {} {} → {}", self.name, from, to));
        self.mode = to;
        if to.is_quiet() {
            self.quiet_epoch += 1;
        }
        self.transitions.push(ModeChange { from, to });
    }

    fn start_hunt(&mut self, target: Vec3) {
        let navigation = &mut self.services.navigation;
        let hunt_speed = navigation.speed() * self.config.hunt_speed_multiplier;
        navigation.set_speed(hunt_speed);
        navigation.set_destination(target);
        self.services.animation.set_flag(AnimationFlag::Hunting, true);

        crate::log(&format!("⚔️ {} spotted target at {:?}, hunting", self.name, target));
        self.set_mode(NpcMode::Hunting);

        self.footsteps
            .start(NpcMode::Hunting, self.quiet_epoch, &self.cadence);
        self.hunt_timer.start(self.config.hunt_timeout);
    }

    fn end_hunt(&mut self) {
        self.services.animation.set_flag(AnimationFlag::Hunting, false);
        self.services.navigation.set_speed(self.baseline_speed);
        self.footsteps.cancel();
        self.set_mode(NpcMode::Patrolling);
    }

    /// Агент ещё идёт (путь считается, не на navmesh или не дошёл)
    fn is_mid_move(&self) -> bool {
        let navigation = &self.services.navigation;
        navigation.path_pending()
            || !navigation.is_on_nav_mesh()
            || navigation.remaining_distance() > self.config.arrival_tolerance
    }

    fn random_walk<R: Rng + ?Sized>(&mut self, pose: &Pose, rng: &mut R) {
        if self.is_mid_move() {
            return;
        }

        let roll = rng.gen_range(0..100u32) as f32;
        if roll < self.config.stand_around_chance {
            self.stand_around(rng);
        } else {
            self.walk_around(pose.position, rng);
        }
    }

    fn stand_around<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(clip) = &self.config.idle_clip {
            self.services.audio.play(clip);
        }

        self.set_mode(NpcMode::StandingAround);
        self.services.animation.set_flag(AnimationFlag::Walking, false);

        let duration = rng.gen_range(self.config.idle_duration_min..=self.config.idle_duration_max);
        self.idle_timer.start(duration);
    }

    fn walk_around<R: Rng + ?Sized>(&mut self, center: Vec3, rng: &mut R) {
        let destination = pick_patrol_point(
            rng,
            self.services.navigation.as_ref(),
            center,
            &self.sampling,
        );
        self.services.navigation.set_destination(destination);
        self.services.animation.set_flag(AnimationFlag::Walking, true);
        self.set_mode(NpcMode::Patrolling);

        self.footsteps
            .start(NpcMode::Patrolling, self.quiet_epoch, &self.cadence);
    }

    // ------------------------------------------------------------------
    // Hits
    // ------------------------------------------------------------------

    /// Внешнее попадание по NPC
    ///
    /// Повторные попадания по мёртвому — no-op.
    pub fn apply_hit(&mut self) -> HitOutcome {
        self.transitions.clear();
        let outcome = self.vitality.absorb_hit();

        match outcome {
            HitOutcome::Wounded { remaining } => {
                crate::log_info(&format!("Enemy {} has {} left", self.name, remaining));
            }
            HitOutcome::Killed => self.die(),
            HitOutcome::AlreadyDead => {
                crate::log(&format!("{} is already dead, hit ignored", self.name));
            }
        }

        outcome
    }

    fn die(&mut self) {
        self.services.animation.trigger(AnimationTrigger::Death);
        self.services.navigation.stop();

        self.hunt_timer.cancel();
        self.idle_timer.cancel();
        self.footsteps.cancel();

        crate::log_info(&format!("💀 {} died", self.name));
        self.set_mode(NpcMode::Dead);
    }
}

#[cfg(test)]
#[path = "brain_tests.rs"]
mod brain_tests;
