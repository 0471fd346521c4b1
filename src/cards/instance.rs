//! Card instances - runtime card state.
//!
//! A `Card` is one physical card of a game: its static [`CardData`] plus
//! where it is, who holds it, how often it was used this turn, whether it
//! is tapped and which cubes sit on it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardColor, CardData};
use crate::core::{CardId, CubeId, PlayerId};
use crate::piles::Pile;

/// Most cubes a single card can hold.
pub const MAX_CUBES: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    pub data: CardData,

    /// Current pile. A card is in exactly one pile at a time.
    pub pile: Pile,

    /// Holder of the pile; `None` for shared piles.
    pub owner: Option<PlayerId>,

    /// Activations this turn, reset at the start of the owner's turn.
    pub usages: i32,

    /// Tapped. Green cards are inactive on the turn they are equipped.
    pub inactive: bool,

    pub cubes: SmallVec<[CubeId; MAX_CUBES]>,
}

impl Card {
    pub fn new(id: CardId, data: CardData, pile: Pile, owner: Option<PlayerId>) -> Self {
        Self {
            id,
            data,
            pile,
            owner,
            usages: 0,
            inactive: false,
            cubes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    #[must_use]
    pub fn color(&self) -> CardColor {
        self.data.color
    }

    /// True while the card sits in a pile where its equips are active.
    #[must_use]
    pub fn is_equipped(&self) -> bool {
        matches!(self.pile, Pile::PlayerTable | Pile::PlayerCharacter)
    }

    /// Free cube slots left on this card.
    #[must_use]
    pub fn free_cube_slots(&self) -> usize {
        MAX_CUBES - self.cubes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_clean() {
        let card = Card::new(
            CardId(1),
            CardData::new("Mustang", CardColor::Blue),
            Pile::MainDeck,
            None,
        );
        assert_eq!(card.usages, 0);
        assert!(!card.inactive);
        assert!(!card.is_equipped());
        assert_eq!(card.free_cube_slots(), MAX_CUBES);
        assert_eq!(card.name(), "Mustang");
    }

    #[test]
    fn test_is_equipped_by_pile() {
        let mut card = Card::new(
            CardId(2),
            CardData::new("Paul Regret", CardColor::None),
            Pile::PlayerCharacter,
            Some(PlayerId(0)),
        );
        assert!(card.is_equipped());
        card.pile = Pile::PlayerBackup;
        assert!(!card.is_equipped());
    }
}
