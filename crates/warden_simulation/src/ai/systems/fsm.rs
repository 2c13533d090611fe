//! FSM AI systems (target resolution, decision tick).

use bevy::prelude::*;

use crate::ai::perception::Pose;
use crate::ai::{Npc, NpcModeChanged, TargetLink};
use crate::components::Player;
use crate::DeterministicRng;

/// Система: связывает новых NPC с целью
///
/// Цель — первый `Player`, чей tag совпадает с `NpcConfig::target_tag`.
/// Player с чужим tag пропускается (warning в лог). Разрешается один раз
/// на NPC. Подходящего Player нет → ошибка в лог, агент без цели.
pub fn resolve_npc_targets(mut npcs: Query<&mut Npc>, players: Query<(Entity, &Player)>) {
    for mut npc in npcs.iter_mut() {
        if npc.target != TargetLink::Unresolved {
            continue;
        }

        let wanted = npc.brain.config().target_tag.as_str();
        let mut found = None;
        for (entity, player) in players.iter() {
            if player.tag == wanted {
                found = Some(entity);
                break;
            }
            crate::log_warning(&format!(
                "{} skips Player {:?}: tag '{}' != '{}'",
                npc.brain.name(),
                entity,
                player.tag,
                wanted
            ));
        }

        let link = match found {
            Some(player) => {
                crate::log(&format!("🎯 {} locked on target {:?}", npc.brain.name(), player));
                TargetLink::Linked(player)
            }
            None => {
                crate::log_error(&format!(
                    "{} did not find target: no Player tagged '{}', hunting disabled",
                    npc.brain.name(),
                    wanted
                ));
                TargetLink::Missing
            }
        };
        npc.target = link;
    }
}

/// Система: decision tick всех живых NPC
///
/// Поза агента берётся из Transform, позиция цели — из Transform игрока.
/// Цель despawned → тик без цели (охота продолжается до timeout).
pub fn npc_decision_tick(
    mut npcs: Query<(Entity, &Transform, &mut Npc)>,
    targets: Query<&Transform, (With<Player>, Without<Npc>)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut mode_events: EventWriter<NpcModeChanged>,
) {
    let delta = time.delta();

    for (entity, transform, mut npc) in npcs.iter_mut() {
        if npc.brain.is_dead() {
            continue;
        }

        let target = match npc.target {
            TargetLink::Linked(player) => targets.get(player).ok().map(|t| t.translation),
            TargetLink::Unresolved | TargetLink::Missing => None,
        };

        npc.brain
            .tick(delta, Pose::from_transform(transform), target, &mut rng.rng);

        for change in npc.brain.transitions() {
            mode_events.write(NpcModeChanged {
                entity,
                from: change.from,
                to: change.to,
            });
        }
    }
}
