//! AI reaction systems (hits, death).

use bevy::prelude::*;

use crate::ai::{HitDelivered, Npc, NpcDied, NpcModeChanged, NpcWounded};
use crate::components::HitOutcome;

/// System: попадания → hit points NPC
///
/// Попадание по мёртвому NPC игнорируется (NpcDied только один раз).
/// Идёт ДО decision tick: агент, убитый в этом тике, уже не решает.
pub fn apply_npc_hits(
    mut hits: EventReader<HitDelivered>,
    mut npcs: Query<&mut Npc>,
    mut wounded_events: EventWriter<NpcWounded>,
    mut died_events: EventWriter<NpcDied>,
    mut mode_events: EventWriter<NpcModeChanged>,
) {
    for hit in hits.read() {
        let Ok(mut npc) = npcs.get_mut(hit.target) else {
            crate::log_warning(&format!("Hit on {:?} ignored: not an NPC", hit.target));
            continue;
        };

        match npc.brain.apply_hit() {
            HitOutcome::Wounded { remaining } => {
                wounded_events.write(NpcWounded {
                    entity: hit.target,
                    remaining,
                });
            }
            HitOutcome::Killed => {
                died_events.write(NpcDied { entity: hit.target });
            }
            HitOutcome::AlreadyDead => {}
        }

        for change in npc.brain.transitions() {
            mode_events.write(NpcModeChanged {
                entity: hit.target,
                from: change.from,
                to: change.to,
            });
        }
    }
}
