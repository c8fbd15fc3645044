//! Render data for full menus.

use crate::{Emote, RoleId};
use rolecall_error::{ReactionRoleError, ReactionRoleErrorKind};
use serde::{Deserialize, Serialize};

/// Embed color used when a full menu has none configured.
pub const DEFAULT_MENU_COLOR: u32 = 0x5865F2;

/// Everything a renderer needs to draw a full menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuContent {
    /// Embed title
    pub title: Option<String>,
    /// Embed body
    pub description: Option<String>,
    /// Embed color
    pub color: u32,
    /// Pairs in display order
    pub lines: Vec<MenuLine>,
}

/// One pair as shown in a full menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLine {
    /// Emote members react with
    pub emote: Emote,
    /// Role the emote grants
    pub role: RoleId,
    /// Text after the role mention
    pub description: Option<String>,
}

impl MenuLine {
    /// `emote <@&role>` followed by the description, if any.
    pub fn render(&self) -> String {
        match &self.description {
            Some(description) => format!("{} <@&{}> {}", self.emote, self.role, description),
            None => format!("{} <@&{}>", self.emote, self.role),
        }
    }
}

/// Parse a `#RRGGBB`, `0xRRGGBB` or `RRGGBB` color.
///
/// # Examples
///
/// ```
/// use rolecall_core::parse_color;
///
/// assert_eq!(parse_color("#ff8800").unwrap(), 0xFF8800);
/// assert_eq!(parse_color("0x00ff00").unwrap(), 0x00FF00);
/// assert!(parse_color("orange").is_err());
/// ```
#[track_caller]
pub fn parse_color(input: &str) -> Result<u32, ReactionRoleError> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);

    if hex.len() != 6 {
        return Err(ReactionRoleError::new(ReactionRoleErrorKind::InvalidColor(
            trimmed.to_string(),
        )));
    }

    u32::from_str_radix(hex, 16).map_err(|_| {
        ReactionRoleError::new(ReactionRoleErrorKind::InvalidColor(trimmed.to_string()))
    })
}
