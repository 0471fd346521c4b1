//! Stable identifiers for cards and cubes.
//!
//! Cards live in an arena owned by the pile store and are referenced by
//! `CardId` from everywhere else: pile lists, requests, event handler
//! keys and disablers. Ids are allocated once per game and never reused,
//! so an id held by a closure stays valid for the lifetime of the game.
//!
//! ## Usage
//!
//! ```
//! use bang_engine::core::CardId;
//!
//! let card = CardId::new(7);
//! assert_eq!(card.index(), 6);
//! assert_eq!(format!("{}", card), "Card(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a card. Ids start at 1; 0 is never allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Slot of this card in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identifier of a resource cube.
///
/// Cubes sit either in the shared pool or on a card; see
/// [`PileStore::cube_pool_len`](crate::piles::PileStore::cube_pool_len).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CubeId(pub u16);

impl std::fmt::Display for CubeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cube({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_index() {
        assert_eq!(CardId::new(1).index(), 0);
        assert_eq!(CardId::new(42).index(), 41);
        assert_eq!(CardId::from(3).raw(), 3);
    }

    #[test]
    fn test_ordering_follows_allocation() {
        let mut ids = vec![CardId(5), CardId(2), CardId(9)];
        ids.sort();
        assert_eq!(ids, vec![CardId(2), CardId(5), CardId(9)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CardId(42)), "Card(42)");
        assert_eq!(format!("{}", CubeId(3)), "Cube(3)");
    }

    #[test]
    fn test_serialization() {
        let id = CardId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
