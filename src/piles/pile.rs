//! Named card locations.

use serde::{Deserialize, Serialize};

/// A named, mutually exclusive card location.
///
/// The first four piles belong to a player; the rest are shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pile {
    PlayerHand,
    PlayerTable,
    PlayerCharacter,
    PlayerBackup,
    MainDeck,
    DiscardPile,
    /// Cards revealed for a pick (general store, draw checks).
    Selection,
    ShopDeck,
    ShopSelection,
    ShopDiscard,
    HiddenDeck,
    ScenarioDeck,
    ScenarioCard,
}

/// Who sees a card once it lands in a pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Only the owner sees the face.
    Owner,
    Public,
    Hidden,
}

impl Pile {
    /// Every shared pile, in a fixed order.
    pub const SHARED: [Pile; 9] = [
        Pile::MainDeck,
        Pile::DiscardPile,
        Pile::Selection,
        Pile::ShopDeck,
        Pile::ShopSelection,
        Pile::ShopDiscard,
        Pile::HiddenDeck,
        Pile::ScenarioDeck,
        Pile::ScenarioCard,
    ];

    /// True for piles held by a player.
    #[must_use]
    pub fn is_player_pile(self) -> bool {
        matches!(
            self,
            Pile::PlayerHand | Pile::PlayerTable | Pile::PlayerCharacter | Pile::PlayerBackup
        )
    }

    /// Default visibility of a card entering this pile.
    ///
    /// ```
    /// use bang_engine::piles::{Pile, Visibility};
    ///
    /// assert_eq!(Pile::PlayerHand.visibility(), Visibility::Owner);
    /// assert_eq!(Pile::DiscardPile.visibility(), Visibility::Public);
    /// assert_eq!(Pile::MainDeck.visibility(), Visibility::Hidden);
    /// ```
    #[must_use]
    pub fn visibility(self) -> Visibility {
        match self {
            Pile::PlayerHand => Visibility::Owner,
            Pile::PlayerBackup | Pile::MainDeck | Pile::ShopDeck | Pile::HiddenDeck | Pile::ScenarioDeck => {
                Visibility::Hidden
            }
            _ => Visibility::Public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_piles_are_not_player_piles() {
        for pile in Pile::SHARED {
            assert!(!pile.is_player_pile(), "{:?}", pile);
        }
        assert!(Pile::PlayerBackup.is_player_pile());
    }

    #[test]
    fn test_table_is_public() {
        assert_eq!(Pile::PlayerTable.visibility(), Visibility::Public);
        assert_eq!(Pile::ShopSelection.visibility(), Visibility::Public);
        assert_eq!(Pile::PlayerBackup.visibility(), Visibility::Hidden);
    }
}
