//! Game configuration.
//!
//! `GameOptions` is fixed when a game is built: which expansions are in
//! play, the RNG seed and the timing of timer requests. Nothing in the
//! engine reads configuration from the environment; the embedding layer
//! builds the options and hands them over.

use serde::{Deserialize, Serialize};

use super::flags::Expansions;

/// Ticks a damage timer runs before the damage lands.
pub const DEFAULT_DAMAGE_TIMER: u32 = 140;

/// Options for a single game.
///
/// ```
/// use bang_engine::core::{Expansions, GameOptions};
///
/// let options = GameOptions::new(42)
///     .with_expansion(Expansions::GOLDRUSH)
///     .with_character_choice(true);
///
/// assert!(options.has_expansion(Expansions::GOLDRUSH));
/// assert!(!options.has_expansion(Expansions::HIGHNOON));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Seed for every random decision of the game.
    pub seed: u64,

    pub expansions: Expansions,

    /// Players pick one of two dealt characters instead of getting the first.
    pub character_choice: bool,

    /// Countdown of timer damage, in ticks.
    pub damage_timer: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameOptions {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            expansions: Expansions::empty(),
            character_choice: false,
            damage_timer: DEFAULT_DAMAGE_TIMER,
        }
    }

    /// Enable an expansion (builder pattern).
    #[must_use]
    pub fn with_expansion(mut self, expansion: Expansions) -> Self {
        self.expansions.insert(expansion);
        self
    }

    #[must_use]
    pub fn with_character_choice(mut self, enabled: bool) -> Self {
        self.character_choice = enabled;
        self
    }

    #[must_use]
    pub fn with_damage_timer(mut self, ticks: u32) -> Self {
        self.damage_timer = ticks;
        self
    }

    /// True if any of the given expansions is enabled.
    #[must_use]
    pub fn has_expansion(&self, expansion: Expansions) -> bool {
        self.expansions.intersects(expansion)
    }
}
