//! # bang-engine
//!
//! Rules engine for a Bang!-style multiplayer card game.
//!
//! The engine keeps the authoritative game state and reacts to player
//! input. It does no networking and no rendering: callers feed actions
//! in and forward the queued [`GameUpdate`](rules::GameUpdate)s to the
//! players that may see them.
//!
//! ## Architecture
//!
//! - **Data-driven cards**: a card is a list of effect slots and equips,
//!   each a tag plus filters. Tags map to compile-time behaviours.
//!
//! - **Event bus**: equipped cards hook into the game through listeners
//!   and modifiers owned by the card, removed in one call when it leaves.
//!
//! - **Request queue**: every question put to a player is a request; only
//!   the front one can be answered. Follow-up work waits in a delayed
//!   action queue until the requests it depends on are gone.
//!
//! - **Deterministic**: all randomness flows through one seeded
//!   [`GameRng`](core::GameRng), so a game replays from its seed.
//!
//! ## Modules
//!
//! - `core`: ids, flags, options, RNG, messages and errors
//! - `cards`: card data, runtime cards, signs and the built-in catalog
//! - `piles`: piles, players and the card store
//! - `events`: event bus and disablers
//! - `effects`: effect/equip behaviours and play validation
//! - `requests`: the request queue and its handlers
//! - `rules`: the game itself, turn flow and player actions
//!
//! ## Example
//!
//! ```
//! use bang_engine::rules::GameBuilder;
//! use bang_engine::piles::Pile;
//!
//! let mut game = GameBuilder::new().player_count(4).build(1);
//! let sheriff = game.playing().unwrap();
//!
//! // The sheriff's turn opens with a draw from the deck.
//! game.pick_card(sheriff, Pile::MainDeck, None, None).unwrap();
//! game.end_turn(sheriff).ok();
//!
//! let updates = game.drain_updates();
//! assert!(!updates.is_empty());
//! ```

pub mod cards;
pub mod core;
pub mod effects;
pub mod events;
pub mod piles;
pub mod requests;
pub mod rules;

pub use crate::cards::{Card, CardCatalog, CardColor, CardData};
pub use crate::core::{CardId, Expansions, GameError, GameOptions, PlayerId, Result};
pub use crate::piles::Pile;
pub use crate::rules::{Game, GameBuilder, GameUpdate, PlayCardArgs, Role};
