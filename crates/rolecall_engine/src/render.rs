//! Full menu rendering.

use crate::{MessageKind, ReactionRoleMessage};
use rolecall_core::{MenuContent, MenuLine};

/// Render data for a full menu; `None` for custom messages.
///
/// Blocked pairs are left out since reacting to them does nothing.
pub fn menu_content(entity: &ReactionRoleMessage) -> Option<MenuContent> {
    let MessageKind::Full(menu) = entity.kind() else {
        return None;
    };

    let lines = entity
        .pairs()
        .iter()
        .filter(|pair| !pair.blocked())
        .map(|pair| MenuLine {
            emote: pair.emote().clone(),
            role: *pair.role(),
            description: pair.description().clone(),
        })
        .collect();

    Some(MenuContent {
        title: menu.name().clone(),
        description: menu.description().clone(),
        color: *menu.color(),
        lines,
    })
}
