//! Core types: ids, seating, flags, RNG, options, messages and errors.

pub mod config;
pub mod entity;
pub mod error;
pub mod flags;
pub mod format;
pub mod player;
pub mod rng;

pub use config::{GameOptions, DEFAULT_DAMAGE_TIMER};
pub use entity::{CardId, CubeId};
pub use error::{GameError, Result};
pub use flags::{EffectFlags, Expansions, PlayerFlags, ScenarioFlags};
pub use format::{FormatArg, FormatArgs, FormattedString};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
