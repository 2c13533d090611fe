//! Headless симуляция WARDEN
//!
//! Запускает Bevy App без рендера: три охранника патрулируют арену,
//! игрок ходит по кругу, на середине прогона первого охранника убивают.
//!
//! Usage: warden_simulation [config.json] [seed]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use warden_simulation::services::headless::{
    drive_headless_navigation, headless_services, HeadlessBackendPlugin, HeadlessCollider,
    HeadlessVisibility, NavBody, WalkableArea,
};
use warden_simulation::{
    create_headless_app, format_status, log_info, npc_snapshot, HitDelivered, Npc, NpcBrain,
    NpcConfig, NpcDied, NpcModeChanged, Player, SimulationPlugin,
};

const TICK_HZ: f64 = 60.0;
const SIMULATED_SECONDS: u32 = 60;

/// Игрок идёт по кругу вокруг центра арены
#[derive(Component, Debug)]
struct PlayerOrbit {
    radius: f32,
    angular_speed: f32,
    angle: f32,
}

fn walk_player(mut players: Query<(&mut PlayerOrbit, &mut Transform)>, time: Res<Time<Fixed>>) {
    for (mut orbit, mut transform) in players.iter_mut() {
        orbit.angle += orbit.angular_speed * time.delta_secs();
        transform.translation = Vec3::new(
            orbit.angle.cos() * orbit.radius,
            0.0,
            orbit.angle.sin() * orbit.radius,
        );
    }
}

fn report_npc_events(
    mut mode_events: EventReader<NpcModeChanged>,
    mut died_events: EventReader<NpcDied>,
) {
    for event in mode_events.read() {
        log_info(&format!("{:?}: {} → {}", event.entity, event.from, event.to));
    }
    for event in died_events.read() {
        log_info(&format!("💀 {:?} is down", event.entity));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => NpcConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => NpcConfig::default(),
    };
    let seed = args.next().map(|seed| seed.parse::<u64>()).transpose()?.unwrap_or(42);

    println!("Starting WARDEN headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessBackendPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )))
        .add_systems(FixedUpdate, walk_player.before(drive_headless_navigation))
        .add_systems(Update, report_npc_events);

    app.world_mut().spawn((
        Player::default(),
        Transform::from_xyz(12.0, 0.0, 0.0),
        HeadlessCollider::new("Player", 1.5),
        PlayerOrbit {
            radius: 12.0,
            angular_speed: 0.3,
            angle: 0.0,
        },
    ));
    app.world_mut()
        .spawn((Transform::from_xyz(4.0, 0.0, 0.0), HeadlessCollider::new("Wall", 2.0)));

    let visibility = app.world().resource::<HeadlessVisibility>().clone();
    let mut guards = Vec::new();
    for (index, position) in [Vec3::new(-6.0, 0.0, -6.0), Vec3::new(6.0, 0.0, 6.0), Vec3::ZERO]
        .into_iter()
        .enumerate()
    {
        let body = NavBody::new(position, 2.0, Some(WalkableArea::square(20.0)));
        let (services, rig) = headless_services(body, &visibility);
        let brain = NpcBrain::new(format!("Guard-{}", index + 1), config.clone(), services)?;

        let entity = app
            .world_mut()
            .spawn((Npc::new(brain), Transform::from_translation(position), rig.navigation))
            .id();
        guards.push(entity);
    }

    let total_ticks = SIMULATED_SECONDS * TICK_HZ as u32;
    for tick in 0..total_ticks {
        if tick == total_ticks / 2 {
            // Добиваем первого охранника: hit_points попаданий + одно смертельное
            for _ in 0..=config.hit_points {
                app.world_mut().send_event(HitDelivered { target: guards[0] });
            }
        }

        app.update();

        if tick % 600 == 0 {
            println!("Tick {}: {}", tick, format_status(&npc_snapshot(app.world_mut())));
        }
    }

    let snapshot = npc_snapshot(app.world_mut());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!("Simulation complete!");

    Ok(())
}
