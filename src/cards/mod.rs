//! Cards: static data, runtime records, signs and the built-in catalog.
//!
//! ## Key Types
//!
//! - [`CardData`]: what a card does, as plain data
//! - [`Card`]: a card in play (pile, owner, usages, cubes)
//! - [`CardSign`]: suit and rank, read by draw checks
//! - [`CardCatalog`]: the card lists a game is dealt from

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod sign;

pub use catalog::CardCatalog;
pub use definition::{CardColor, CardData, CardModifier, EffectList, EquipList};
pub use instance::{Card, MAX_CUBES};
pub use sign::{CardSign, Rank, Suit};
