//! Emote parsing.
//!
//! An emote is either a custom guild emote, written `<:name:id>` (or
//! `<a:name:id>` when animated), or a standard unicode emoji. The storage
//! form is exactly the [`Display`](std::fmt::Display) output, so a parsed
//! emote always writes back the string it was read from.
//!
//! Custom emotes are identified by id alone: renaming an emote on the
//! platform must not break the pair that uses it.

use crate::EmojiId;
use regex::Regex;
use rolecall_error::{ReactionRoleError, ReactionRoleErrorKind};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static CUSTOM_EMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(a?):([A-Za-z0-9_]{2,32}):([0-9]{1,20})>$").expect("Valid custom emote regex")
});

/// Longest sequence (in chars) accepted as a single unicode emoji.
const MAX_UNICODE_EMOJI_CHARS: usize = 16;

/// A reaction emote.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub enum Emote {
    /// A custom emote uploaded to a guild.
    Custom {
        /// Emote id
        id: EmojiId,
        /// Emote name at the time it was configured
        name: String,
        /// Whether the emote is animated
        animated: bool,
    },
    /// A standard unicode emoji sequence.
    Unicode(String),
}

/// Identity of an emote, used for lookups and uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmoteKey {
    /// Custom emotes compare by id.
    Custom(EmojiId),
    /// Unicode emoji compare by their exact sequence.
    Unicode(String),
}

impl Emote {
    /// Parse an emote from its textual form.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolecall_core::{Emote, EmojiId};
    ///
    /// let custom = Emote::parse("<:party:112233>").unwrap();
    /// assert_eq!(custom.custom_id(), Some(EmojiId::new(112233)));
    ///
    /// let unicode = Emote::parse("🟢").unwrap();
    /// assert_eq!(unicode.to_string(), "🟢");
    ///
    /// assert!(Emote::parse("green").is_err());
    /// ```
    #[track_caller]
    pub fn parse(input: &str) -> Result<Self, ReactionRoleError> {
        let trimmed = input.trim();

        if let Some(captures) = CUSTOM_EMOTE.captures(trimmed) {
            let id = captures[3].parse::<u64>().map_err(|_| {
                ReactionRoleError::new(ReactionRoleErrorKind::InvalidEmote(trimmed.to_string()))
            })?;
            return Ok(Emote::Custom {
                id: EmojiId::new(id),
                name: captures[2].to_string(),
                animated: !captures[1].is_empty(),
            });
        }

        if is_unicode_emoji(trimmed) {
            return Ok(Emote::Unicode(trimmed.to_string()));
        }

        Err(ReactionRoleError::new(ReactionRoleErrorKind::InvalidEmote(
            trimmed.to_string(),
        )))
    }

    /// The lookup identity of this emote.
    pub fn key(&self) -> EmoteKey {
        match self {
            Emote::Custom { id, .. } => EmoteKey::Custom(*id),
            Emote::Unicode(sequence) => EmoteKey::Unicode(sequence.clone()),
        }
    }

    /// The custom emote id, if this is a custom emote.
    pub fn custom_id(&self) -> Option<EmojiId> {
        match self {
            Emote::Custom { id, .. } => Some(*id),
            Emote::Unicode(_) => None,
        }
    }
}

impl PartialEq for Emote {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Hash for Emote {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Display for Emote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Emote::Custom {
                id,
                name,
                animated: true,
            } => write!(f, "<a:{name}:{id}>"),
            Emote::Custom { id, name, .. } => write!(f, "<:{name}:{id}>"),
            Emote::Unicode(sequence) => f.write_str(sequence),
        }
    }
}

impl FromStr for Emote {
    type Err = ReactionRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emote::parse(s)
    }
}

/// Accepts exactly one emoji sequence: a flag, a keycap, or ZWJ-joined
/// pictographs each with an optional skin tone and variation selector. A
/// tag sequence may close the last pictograph.
fn is_unicode_emoji(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() > MAX_UNICODE_EMOJI_CHARS {
        return false;
    }

    match chars.as_slice() {
        [] => false,
        [first, second] if is_regional_indicator(*first) && is_regional_indicator(*second) => true,
        [base, '\u{20E3}'] | [base, '\u{FE0F}', '\u{20E3}'] => {
            matches!(*base, '0'..='9' | '#' | '*')
        }
        sequence => sequence.split(|c| *c == ZWJ).all(is_emoji_element),
    }
}

const ZWJ: char = '\u{200D}';

/// One pictograph with its modifiers, as found between ZWJs.
fn is_emoji_element(element: &[char]) -> bool {
    let Some((&base, rest)) = element.split_first() else {
        return false;
    };
    if !is_pictographic(base) || is_skin_tone(base) || is_regional_indicator(base) {
        return false;
    }

    let rest = match rest {
        [tone, tail @ ..] if is_skin_tone(*tone) => tail,
        _ => rest,
    };
    let rest = match rest {
        ['\u{FE0E}' | '\u{FE0F}', tail @ ..] => tail,
        _ => rest,
    };

    match rest {
        [] => true,
        [tags @ .., '\u{E007F}'] => {
            !tags.is_empty() && tags.iter().all(|c| ('\u{E0020}'..='\u{E007E}').contains(c))
        }
        _ => false,
    }
}

fn is_skin_tone(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x2194..=0x2199
            | 0x21A9..=0x21AA
            | 0x231A..=0x231B
            | 0x2328
            | 0x23CF
            | 0x23E9..=0x23F3
            | 0x23F8..=0x23FA
            | 0x24C2
            | 0x25AA..=0x25AB
            | 0x25B6
            | 0x25C0
            | 0x25FB..=0x25FE
            | 0x2600..=0x27BF
            | 0x2934..=0x2935
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x1F000..=0x1FAFF
    )
}
