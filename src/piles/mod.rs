//! Piles, players and the pile store.
//!
//! ## Key Components
//!
//! - [`Pile`]: named card locations (hand, table, decks, discard pile, ...)
//! - [`Player`]: the runtime record of one seat
//! - [`PileStore`]: the card arena and every pile's contents

mod pile;
mod player;
mod store;

pub use pile::{Pile, Visibility};
pub use player::{Player, PredrawCheck, DEFAULT_CARDS_TO_DRAW};
pub use store::{PileStore, NUM_CUBES};
