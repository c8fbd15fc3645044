//! Engine behavior switches.

use derive_getters::Getters;
use rolecall_core::DEFAULT_MENU_COLOR;
use serde::{Deserialize, Serialize};

/// Settings that change how the engine renders and guards menus.
///
/// # Example
///
/// ```
/// use rolecall_engine::EngineSettingsBuilder;
///
/// let settings = EngineSettingsBuilder::default()
///     .restrict_reactions(false)
///     .build()
///     .unwrap();
/// assert!(!settings.restrict_reactions());
/// assert_eq!(*settings.default_color(), rolecall_core::DEFAULT_MENU_COLOR);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct EngineSettings {
    /// Deny members new reactions in channels hosting a full menu
    #[serde(default = "default_restrict_reactions")]
    restrict_reactions: bool,

    /// Embed color for full menus without one
    #[serde(default = "default_color")]
    default_color: u32,
}

fn default_restrict_reactions() -> bool {
    true
}

fn default_color() -> u32 {
    DEFAULT_MENU_COLOR
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            restrict_reactions: default_restrict_reactions(),
            default_color: default_color(),
        }
    }
}
