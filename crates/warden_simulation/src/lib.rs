//! WARDEN Simulation Core
//!
//! ECS-симуляция NPC охранников на Bevy 0.16.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (mode, таймеры, hit points, решения)
//! - Движок = tactical layer (pathfinding, анимации, звук, raycast) через `services`

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;
pub mod services;

// Re-export базовых типов для удобства
pub use ai::{
    HitDelivered, Npc, NpcAIPlugin, NpcAiSet, NpcBrain, NpcConfig, NpcDied, NpcMode,
    NpcModeChanged, NpcWounded, TargetLink,
};
pub use components::*;
pub use logger::*;
pub use services::NpcServices;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed 42, если не задан заранее)
            .init_resource::<DeterministicRng>()
            .add_plugins(NpcAIPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все случайные решения NPC (idle roll, patrol точки, клипы шагов) идут через него.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Состояние одного NPC для сравнения прогонов
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpcSnapshot {
    pub entity: u32,
    pub name: String,
    pub mode: NpcMode,
    pub hit_points: u32,
    pub position: [f32; 3],
}

/// Snapshot всех NPC (сортировка по Entity index для детерминизма)
pub fn npc_snapshot(world: &mut World) -> Vec<NpcSnapshot> {
    let mut query = world.query::<(Entity, &Npc, &Transform)>();
    let mut snapshot: Vec<_> = query
        .iter(world)
        .map(|(entity, npc, transform)| NpcSnapshot {
            entity: entity.index(),
            name: npc.brain.name().to_string(),
            mode: npc.brain.mode(),
            hit_points: npc.brain.hit_points(),
            position: transform.translation.to_array(),
        })
        .collect();

    snapshot.sort_by_key(|npc| npc.entity);
    snapshot
}

/// Строка прогресса: живые/мёртвые и режим каждого NPC
pub fn format_status(snapshot: &[NpcSnapshot]) -> String {
    let dead = snapshot.iter().filter(|npc| npc.mode == NpcMode::Dead).count();
    let modes: Vec<String> = snapshot
        .iter()
        .map(|npc| format!("{}={}", npc.name, npc.mode))
        .collect();

    format!(
        "{} alive, {} dead [{}]",
        snapshot.len() - dead,
        dead,
        modes.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc(name: &str, mode: NpcMode) -> NpcSnapshot {
        NpcSnapshot {
            entity: 0,
            name: name.to_string(),
            mode,
            hit_points: 1,
            position: [0.0; 3],
        }
    }

    #[test]
    fn test_format_status_counts_live_and_dead() {
        let snapshot = vec![
            npc("Guard-1", NpcMode::Dead),
            npc("Guard-2", NpcMode::Hunting),
            npc("Guard-3", NpcMode::StandingAround),
        ];

        let status = format_status(&snapshot);
        assert!(status.starts_with("2 alive, 1 dead"), "{}", status);
        assert!(status.contains("Guard-1=Dead"));
        assert!(status.contains("Guard-2=Hunting"));
        assert!(status.contains("Guard-3=StandingAround"));
    }

    #[test]
    fn test_format_status_empty_world() {
        assert_eq!(format_status(&[]), "0 alive, 0 dead []");
    }
}
