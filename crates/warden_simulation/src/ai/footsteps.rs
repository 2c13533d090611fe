//! Footstep scheduler — периодические звуки шагов
//!
//! Один активный activity на агента. Activity:
//! - просыпается через интервал (быстрый при охоте, медленный при патруле)
//! - играет случайный клип из набора
//! - завершается сам, если с прошлого запуска агент встал на месте или умер
//!
//! Интервал фиксируется при старте: смена режима всегда либо перезапускает
//! activity (патруль → охота), либо гасит его.
//!
//! Отмена кооперативная: activity проверяет режим и "quiet epoch" при каждом
//! пробуждении. Epoch растёт при каждом входе в StandingAround/Dead, поэтому
//! даже короткая остановка между пробуждениями гасит шаги.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};
use rand::Rng;

use crate::ai::NpcMode;
use crate::services::{AudioSink, ClipId};

/// Интервалы шагов по режимам
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootstepCadence {
    pub patrol_interval: f32,
    pub hunt_interval: f32,
}

impl FootstepCadence {
    pub fn interval(&self, mode: NpcMode) -> f32 {
        if mode == NpcMode::Hunting {
            self.hunt_interval
        } else {
            self.patrol_interval
        }
    }
}

/// Идентификатор запуска activity (растёт с каждым start)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityId(pub u64);

#[derive(Debug, Clone)]
struct FootstepActivity {
    id: ActivityId,
    cadence: Timer,
    /// Пробуждения, накопленные advance и ещё не обработанные poll
    pending_wakes: u32,
    epoch: u64,
    warned_empty: bool,
}

/// Владелец footstep activity агента
#[derive(Debug, Default)]
pub struct FootstepScheduler {
    active: Option<FootstepActivity>,
    launched: u64,
}

impl FootstepScheduler {
    /// Запускает новый activity, предварительно отменив текущий
    pub fn start(&mut self, mode: NpcMode, epoch: u64, cadence: &FootstepCadence) -> ActivityId {
        if let Some(previous) = self.active.take() {
            crate::log(&format!("Footsteps: activity {:?} replaced", previous.id));
        }

        self.launched += 1;
        let id = ActivityId(self.launched);
        self.active = Some(FootstepActivity {
            id,
            cadence: Timer::from_seconds(cadence.interval(mode), TimerMode::Repeating),
            pending_wakes: 0,
            epoch,
            warned_empty: false,
        });
        id
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn active_id(&self) -> Option<ActivityId> {
        self.active.as_ref().map(|activity| activity.id)
    }

    /// 0 или 1
    pub fn active_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn advance(&mut self, delta: Duration) {
        if let Some(activity) = self.active.as_mut() {
            activity.cadence.tick(delta);
            activity.pending_wakes += activity.cadence.times_finished_this_tick();
        }
    }

    /// Обрабатывает накопленные пробуждения. Возвращает число сыгранных клипов.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        mode: NpcMode,
        epoch: u64,
        clips: &[ClipId],
        audio: &mut dyn AudioSink,
        rng: &mut R,
    ) -> u32 {
        let Some(activity) = self.active.as_mut() else {
            return 0;
        };
        let wakes = std::mem::take(&mut activity.pending_wakes);
        if wakes == 0 {
            return 0;
        }

        if mode.is_quiet() || activity.epoch != epoch {
            crate::log(&format!("Footsteps: activity {:?} finished ({})", activity.id, mode));
            self.active = None;
            return 0;
        }

        if clips.is_empty() {
            if !activity.warned_empty {
                crate::log_warning("Footsteps: no footstep clips configured, playing nothing");
                activity.warned_empty = true;
            }
            return 0;
        }

        for _ in 0..wakes {
            let clip = &clips[rng.gen_range(0..clips.len())];
            audio.play(clip);
        }
        wakes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::headless::AudioRecorder;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const CADENCE: FootstepCadence = FootstepCadence {
        patrol_interval: 2.0,
        hunt_interval: 0.5,
    };

    fn clips() -> Vec<ClipId> {
        vec![ClipId::new("step_a"), ClipId::new("step_b")]
    }

    fn secs(seconds: f32) -> Duration {
        Duration::from_secs_f32(seconds)
    }

    #[test]
    fn test_first_clip_after_one_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let recorder = AudioRecorder::default();
        let mut audio = recorder.clone();
        let mut scheduler = FootstepScheduler::default();

        scheduler.start(NpcMode::Patrolling, 0, &CADENCE);
        scheduler.advance(secs(1.5));
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 0, &clips(), &mut audio, &mut rng), 0);
        scheduler.advance(secs(0.5));
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 0, &clips(), &mut audio, &mut rng), 1);
        // 4.0 и 6.0
        scheduler.advance(secs(4.0));
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 0, &clips(), &mut audio, &mut rng), 2);
        assert_eq!(recorder.play_count(), 3);
        assert!(recorder.played().iter().all(|clip| clips().contains(clip)));
    }

    #[test]
    fn test_poll_does_not_replay_same_wake() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut audio = AudioRecorder::default();
        let mut scheduler = FootstepScheduler::default();

        scheduler.start(NpcMode::Patrolling, 0, &CADENCE);
        scheduler.advance(secs(2.0));
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 0, &clips(), &mut audio, &mut rng), 1);
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 0, &clips(), &mut audio, &mut rng), 0);
    }

    #[test]
    fn test_hunting_uses_fast_cadence() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut audio = AudioRecorder::default();
        let mut scheduler = FootstepScheduler::default();

        scheduler.start(NpcMode::Hunting, 0, &CADENCE);
        // 0.5, 1.0, 1.5, 2.0
        scheduler.advance(secs(2.0));
        assert_eq!(scheduler.poll(NpcMode::Hunting, 0, &clips(), &mut audio, &mut rng), 4);
    }

    #[test]
    fn test_second_start_replaces_first() {
        let mut scheduler = FootstepScheduler::default();

        let first = scheduler.start(NpcMode::Patrolling, 0, &CADENCE);
        let second = scheduler.start(NpcMode::Hunting, 0, &CADENCE);

        assert_ne!(first, second);
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(scheduler.active_id(), Some(second));
    }

    #[test]
    fn test_standing_around_terminates_without_playing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let recorder = AudioRecorder::default();
        let mut audio = recorder.clone();
        let mut scheduler = FootstepScheduler::default();

        scheduler.start(NpcMode::Patrolling, 0, &CADENCE);
        scheduler.advance(secs(2.0));
        assert_eq!(scheduler.poll(NpcMode::StandingAround, 1, &clips(), &mut audio, &mut rng), 0);
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(recorder.play_count(), 0);
    }

    #[test]
    fn test_epoch_change_terminates_even_if_patrolling_again() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut audio = AudioRecorder::default();
        let mut scheduler = FootstepScheduler::default();

        scheduler.start(NpcMode::Patrolling, 3, &CADENCE);
        // Агент постоял и снова патрулирует, но activity старый
        scheduler.advance(secs(2.0));
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 4, &clips(), &mut audio, &mut rng), 0);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_empty_clip_set_keeps_running_silently() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let recorder = AudioRecorder::default();
        let mut audio = recorder.clone();
        let mut scheduler = FootstepScheduler::default();

        scheduler.start(NpcMode::Patrolling, 0, &CADENCE);
        scheduler.advance(secs(10.0));
        assert_eq!(scheduler.poll(NpcMode::Patrolling, 0, &[], &mut audio, &mut rng), 0);
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(recorder.play_count(), 0);
    }
}
