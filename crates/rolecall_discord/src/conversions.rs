//! Conversions between Serenity types and Rolecall types.

use rolecall_core::{Emote, EmojiId, MenuContent};
use rolecall_error::{GatewayError, GatewayErrorKind};
use serenity::all::{CreateEmbed, ReactionType};

/// Classify an HTTP status from Discord.
///
/// Only 404 means the target is gone; 403 is a permission or rank problem;
/// anything else (including no status at all) is treated as transient.
///
/// # Examples
///
/// ```
/// use rolecall_discord::kind_for_status;
/// use rolecall_error::GatewayErrorKind;
///
/// assert!(matches!(kind_for_status(Some(404), "gone".into()), GatewayErrorKind::NotFound(_)));
/// assert!(matches!(kind_for_status(Some(429), "slow".into()), GatewayErrorKind::Transport(_)));
/// ```
pub fn kind_for_status(status: Option<u16>, message: String) -> GatewayErrorKind {
    match status {
        Some(404) => GatewayErrorKind::NotFound(message),
        Some(401) => GatewayErrorKind::InvalidToken,
        Some(403) => GatewayErrorKind::Forbidden(message),
        _ => GatewayErrorKind::Transport(message),
    }
}

/// Convert a Serenity error into a [`GatewayError`], naming what was being
/// touched.
#[track_caller]
pub(crate) fn gateway_error(err: serenity::Error, target: impl std::fmt::Display) -> GatewayError {
    let status = match &err {
        serenity::Error::Http(http) => http.status_code().map(|status| status.as_u16()),
        _ => None,
    };
    GatewayError::new(kind_for_status(status, format!("{target}: {err}")))
}

/// The Rolecall emote for a Discord reaction, if it is one we understand.
pub fn emote_from_reaction(reaction: &ReactionType) -> Option<Emote> {
    match reaction {
        ReactionType::Custom { animated, id, name } => Some(Emote::Custom {
            id: EmojiId::new(id.get()),
            name: name.clone().unwrap_or_default(),
            animated: *animated,
        }),
        ReactionType::Unicode(sequence) => Some(Emote::Unicode(sequence.clone())),
        _ => None,
    }
}

/// The Discord reaction for a Rolecall emote.
pub fn reaction_type(emote: &Emote) -> ReactionType {
    match emote {
        Emote::Custom { id, name, animated } => ReactionType::Custom {
            animated: *animated,
            id: serenity::all::EmojiId::new(id.get()),
            name: Some(name.clone()),
        },
        Emote::Unicode(sequence) => ReactionType::Unicode(sequence.clone()),
    }
}

/// The embed body: the menu description followed by one line per pair.
pub(crate) fn menu_body(menu: &MenuContent) -> String {
    let mut body = Vec::with_capacity(menu.lines.len() + 2);
    if let Some(description) = &menu.description {
        body.push(description.clone());
        body.push(String::new());
    }
    body.extend(menu.lines.iter().map(|line| line.render()));
    body.join("\n")
}

/// Build the embed for a full menu.
pub fn menu_embed(menu: &MenuContent) -> CreateEmbed {
    let mut embed = CreateEmbed::new().colour(menu.color);
    if let Some(title) = &menu.title {
        embed = embed.title(title);
    }
    let body = menu_body(menu);
    if !body.is_empty() {
        embed = embed.description(body);
    }
    embed
}
