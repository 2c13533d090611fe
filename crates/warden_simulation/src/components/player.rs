//! Player marker component
//!
//! Отмечает entity, за которым охотятся NPC. Управление игроком (input,
//! движение камеры) живёт вне симуляции — здесь нужна только позиция.

use bevy::prelude::Component;

/// Marker component для цели NPC
///
/// NPC связывается с первым `Player`, чей `tag` равен его
/// `NpcConfig::target_tag` (см. `resolve_npc_targets`). Тот же tag
/// несёт поверхность игрока в raycast мире.
///
/// # Single-player
/// Обычно только один entity имеет этот компонент.
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub tag: String,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            tag: "Player".to_string(),
        }
    }
}
