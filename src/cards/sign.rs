//! Suit and rank of a playing card.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

/// Rank, ordered from 2 up to ace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// The suit/rank pair printed on a drawable card.
///
/// ```
/// use bang_engine::cards::{CardSign, Rank, Suit};
///
/// let sign = CardSign::new(Suit::Spades, Rank::Five);
/// assert!(sign.is_in(Suit::Spades, Rank::Two, Rank::Nine));
/// assert!(!sign.is_in(Suit::Hearts, Rank::Two, Rank::Nine));
/// assert_eq!(sign.to_string(), "5♠");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardSign {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardSign {
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// True if the sign has the given suit and a rank in `low..=high`.
    #[must_use]
    pub fn is_in(self, suit: Suit, low: Rank, high: Rank) -> bool {
        self.suit == suit && self.rank >= low && self.rank <= high
    }
}

impl std::fmt::Display for CardSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = match self.rank {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        let suit = match self.suit {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        };
        write!(f, "{}{}", rank, suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(Rank::Two < Rank::Nine);
        assert!(Rank::King < Rank::Ace);
    }

    #[test]
    fn test_dynamite_window() {
        let boom = |rank| CardSign::new(Suit::Spades, rank).is_in(Suit::Spades, Rank::Two, Rank::Nine);
        assert!(boom(Rank::Two));
        assert!(boom(Rank::Nine));
        assert!(!boom(Rank::Ten));
        assert!(!boom(Rank::Ace));
    }

    #[test]
    fn test_display() {
        assert_eq!(CardSign::new(Suit::Hearts, Rank::Ten).to_string(), "10♥");
        assert_eq!(CardSign::new(Suit::Clubs, Rank::Ace).to_string(), "A♣");
    }
}
