//! Legacy inline tags for clients that scrape the message text.

use serde_json::json;

use super::turn::TurnEvent;

/// Appends `[ENEMY:{json}]` for each spawned enemy and `[DICE:NdM]` for each
/// roll to `message`.
pub fn append_legacy_tags(message: &mut String, events: &[TurnEvent]) {
    for event in events {
        let tag = match event {
            TurnEvent::EnemySpawned {
                name,
                hp,
                ac,
                damage,
                description,
            } => {
                let enemy = json!({
                    "name": name,
                    "hp": hp,
                    "ac": ac,
                    "damage": damage,
                    "description": description,
                });
                format!("[ENEMY:{enemy}]")
            }
            TurnEvent::DiceRolled { expression, .. } => {
                let dice = expression.split(['+', '-']).next().unwrap_or(expression);
                format!("[DICE:{dice}]")
            }
            _ => continue,
        };
        message.push('\n');
        message.push_str(&tag);
    }
}
