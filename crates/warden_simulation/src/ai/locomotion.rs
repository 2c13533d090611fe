//! Locomotion planner — выбор patrol точек

use bevy::prelude::*;
use rand::Rng;

use crate::services::NavigationAgent;

/// Параметры выбора patrol точки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolSampling {
    pub radius: f32,
    pub max_attempts: u32,
    /// Допуск snap'а на walkable поверхность
    pub tolerance: f32,
}

impl Default for PatrolSampling {
    fn default() -> Self {
        Self {
            radius: 3.0,
            max_attempts: 10,
            tolerance: 1.5,
        }
    }
}

/// Случайная точка в круге радиуса `radius` вокруг `center` (плоскость XZ)
///
/// sqrt(u) по радиусу → равномерно по площади круга.
pub fn random_point_in_disk<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let distance = rng.gen::<f32>().sqrt() * radius;

    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Выбор patrol точки
///
/// До `max_attempts` раз берём случайную точку в круге и просим навигацию
/// snap'нуть её на walkable поверхность. Все попытки неудачны → `center`
/// (destination есть всегда).
pub fn pick_patrol_point<R: Rng + ?Sized>(
    rng: &mut R,
    navigation: &dyn NavigationAgent,
    center: Vec3,
    sampling: &PatrolSampling,
) -> Vec3 {
    for _ in 0..sampling.max_attempts {
        let candidate = random_point_in_disk(rng, center, sampling.radius);
        if let Some(point) = navigation.sample_position(candidate, sampling.tolerance) {
            return point;
        }
    }

    crate::log(&format!(
        "Patrol: no walkable point within {:.1}m of {:?} after {} attempts, staying put",
        sampling.radius, center, sampling.max_attempts
    ));
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::headless::{HeadlessNavHandle, NavBody, WalkableArea};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_point_stays_in_disk() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let center = Vec3::new(4.0, 1.0, -2.0);

        for _ in 0..500 {
            let point = random_point_in_disk(&mut rng, center, 3.0);
            assert_eq!(point.y, center.y);
            assert!(point.distance(center) <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_all_attempts_fail_returns_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // walkable = None → sample_position всегда промахивается
        let handle = HeadlessNavHandle::new(NavBody::new(Vec3::ZERO, 1.0, None));
        let center = Vec3::new(12.5, 0.0, -3.25);

        let point = pick_patrol_point(&mut rng, &handle.agent(), center, &PatrolSampling::default());
        assert_eq!(point, center);
    }

    #[test]
    fn test_point_is_snapped_to_walkable_area() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let area = WalkableArea::square(50.0);
        let handle = HeadlessNavHandle::new(NavBody::new(Vec3::ZERO, 1.0, Some(area)));

        for _ in 0..50 {
            let point = pick_patrol_point(&mut rng, &handle.agent(), Vec3::ZERO, &PatrolSampling::default());
            assert_eq!(point.y, area.height);
            assert!(point.length() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_point_far_outside_area_falls_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Центр в 100м от зоны, радиус 3 + допуск 1.5 не дотягивается
        let handle = HeadlessNavHandle::new(NavBody::new(Vec3::ZERO, 1.0, Some(WalkableArea::square(5.0))));
        let center = Vec3::new(100.0, 0.0, 0.0);

        let point = pick_patrol_point(&mut rng, &handle.agent(), center, &PatrolSampling::default());
        assert_eq!(point, center);
    }
}
