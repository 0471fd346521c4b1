//! The pile store: card arena, players, piles and the cube pool.
//!
//! Cards live in an id-indexed arena and never leave it. Piles hold ids
//! only; moving a card removes its id from the old pile list and pushes it
//! on top of the new one, updating the card's `pile`/`owner` in the same
//! step, so a card is always in exactly one pile.
//!
//! For ordered piles the last element is the top (drawn first).
//!
//! The store does not emit updates; `Game` wraps every move with the
//! matching outbound records.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::pile::Pile;
use super::player::Player;
use crate::cards::{Card, CardData};
use crate::core::{CardId, CubeId, GameRng, PlayerId, PlayerMap};

/// Cubes in the shared pool at game start.
pub const NUM_CUBES: u16 = 32;

/// All mutable card and player state of a game.
///
/// ```
/// use bang_engine::cards::{CardColor, CardData};
/// use bang_engine::core::{PlayerId, PlayerMap};
/// use bang_engine::piles::{Pile, PileStore, Player};
/// use bang_engine::rules::Role;
///
/// let players = PlayerMap::new(2, |id| Player::new(id, Role::Outlaw));
/// let mut store = PileStore::new(players);
///
/// let card = store.add_card(CardData::new("Beer", CardColor::Brown), Pile::MainDeck, None);
/// assert_eq!(store.top_of(Pile::MainDeck), Some(card));
///
/// store.move_card(card, Pile::PlayerHand, Some(PlayerId::new(1)));
/// assert!(store.pile(Pile::MainDeck, None).is_empty());
/// assert_eq!(store.player(PlayerId::new(1)).hand.len(), 1);
/// assert_eq!(store.card(card).owner, Some(PlayerId::new(1)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileStore {
    /// Arena: `cards[id.index()]`.
    cards: Vec<Card>,

    players: PlayerMap<Player>,

    /// Contents of every shared pile.
    shared: FxHashMap<Pile, Vector<CardId>>,

    /// Free cubes.
    cube_pool: Vec<CubeId>,
}

impl PileStore {
    pub fn new(players: PlayerMap<Player>) -> Self {
        let shared = Pile::SHARED.into_iter().map(|pile| (pile, Vector::new())).collect();
        Self {
            cards: Vec::new(),
            players,
            shared,
            cube_pool: (1..=NUM_CUBES).map(CubeId).collect(),
        }
    }

    /// Add a new card on top of a pile. Ids are allocated sequentially from 1.
    pub fn add_card(&mut self, data: CardData, pile: Pile, owner: Option<PlayerId>) -> CardId {
        let id = CardId::new(self.cards.len() as u32 + 1);
        self.cards.push(Card::new(id, data, pile, owner));
        self.pile_mut(pile, owner).push_back(id);
        id
    }

    // === Cards ===

    /// Look up a card by an id that came from outside.
    #[must_use]
    pub fn get_card(&self, id: CardId) -> Option<&Card> {
        if id.raw() == 0 {
            return None;
        }
        self.cards.get(id.index())
    }

    /// Look up a card by an id the engine handed out.
    ///
    /// Panics on an unknown id: internal ids are always valid.
    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        match self.get_card(id) {
            Some(card) => card,
            None => panic!("unknown card id {}", id),
        }
    }

    pub fn card_mut(&mut self, id: CardId) -> &mut Card {
        let index = id.index();
        match self.cards.get_mut(index) {
            Some(card) => card,
            None => panic!("unknown card id {}", id),
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn num_cards(&self) -> usize {
        self.cards.len()
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut PlayerMap<Player> {
        &mut self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // === Piles ===

    /// Contents of a pile, bottom first.
    ///
    /// Player piles need an owner; shared piles ignore it.
    #[must_use]
    pub fn pile(&self, pile: Pile, owner: Option<PlayerId>) -> &Vector<CardId> {
        if pile.is_player_pile() {
            let Some(owner) = owner else {
                panic!("{:?} needs an owner", pile);
            };
            let player = &self.players[owner];
            match pile {
                Pile::PlayerHand => &player.hand,
                Pile::PlayerTable => &player.table,
                Pile::PlayerCharacter => &player.characters,
                _ => &player.backup_characters,
            }
        } else {
            &self.shared[&pile]
        }
    }

    fn pile_mut(&mut self, pile: Pile, owner: Option<PlayerId>) -> &mut Vector<CardId> {
        if pile.is_player_pile() {
            let Some(owner) = owner else {
                panic!("{:?} needs an owner", pile);
            };
            let player = &mut self.players[owner];
            match pile {
                Pile::PlayerHand => &mut player.hand,
                Pile::PlayerTable => &mut player.table,
                Pile::PlayerCharacter => &mut player.characters,
                _ => &mut player.backup_characters,
            }
        } else {
            self.shared.entry(pile).or_default()
        }
    }

    /// Contents of a shared pile.
    #[must_use]
    pub fn shared(&self, pile: Pile) -> &Vector<CardId> {
        self.pile(pile, None)
    }

    /// Top card of a shared pile.
    #[must_use]
    pub fn top_of(&self, pile: Pile) -> Option<CardId> {
        self.shared(pile).back().copied()
    }

    /// Move a card on top of another pile.
    ///
    /// Returns the pile and owner the card came from.
    pub fn move_card(&mut self, card: CardId, pile: Pile, owner: Option<PlayerId>) -> (Pile, Option<PlayerId>) {
        let (old_pile, old_owner) = {
            let c = self.card(card);
            (c.pile, c.owner)
        };
        let old_list = self.pile_mut(old_pile, old_owner);
        if let Some(pos) = old_list.index_of(&card) {
            old_list.remove(pos);
        }

        let owner = if pile.is_player_pile() { owner } else { None };
        self.pile_mut(pile, owner).push_back(card);

        let c = self.card_mut(card);
        c.pile = pile;
        c.owner = owner;
        (old_pile, old_owner)
    }

    /// Shuffle a shared pile in place.
    pub fn shuffle(&mut self, pile: Pile, rng: &mut GameRng) {
        let list = self.pile_mut(pile, None);
        let mut cards: Vec<CardId> = list.iter().copied().collect();
        rng.shuffle(&mut cards);
        *list = cards.into_iter().collect();
    }

    // === Cubes ===

    #[must_use]
    pub fn cube_pool_len(&self) -> usize {
        self.cube_pool.len()
    }

    /// Take up to `n` cubes from the pool.
    pub fn take_cubes(&mut self, n: usize) -> SmallVec<[CubeId; 4]> {
        let n = n.min(self.cube_pool.len());
        let at = self.cube_pool.len() - n;
        self.cube_pool.drain(at..).collect()
    }

    pub fn return_cube(&mut self, cube: CubeId) {
        self.cube_pool.push(cube);
    }

    /// Binary image of the whole store.
    ///
    /// Two snapshots compare equal exactly when no card, pile, player
    /// or cube changed in between.
    pub fn snapshot(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardColor;
    use crate::rules::Role;

    fn store(players: usize) -> PileStore {
        PileStore::new(PlayerMap::new(players, |id| Player::new(id, Role::Outlaw)))
    }

    fn add(store: &mut PileStore, name: &str, pile: Pile, owner: Option<PlayerId>) -> CardId {
        store.add_card(CardData::new(name, CardColor::Brown), pile, owner)
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut s = store(2);
        let a = add(&mut s, "a", Pile::MainDeck, None);
        let b = add(&mut s, "b", Pile::MainDeck, None);
        assert_eq!(a, CardId(1));
        assert_eq!(b, CardId(2));
        assert!(s.get_card(CardId(0)).is_none());
        assert!(s.get_card(CardId(3)).is_none());
        assert_eq!(s.num_cards(), 2);
    }

    #[test]
    fn test_card_in_exactly_one_pile() {
        let mut s = store(3);
        let p1 = PlayerId(1);
        let card = add(&mut s, "a", Pile::MainDeck, None);

        s.move_card(card, Pile::PlayerHand, Some(p1));
        s.move_card(card, Pile::PlayerTable, Some(p1));
        s.move_card(card, Pile::DiscardPile, Some(p1));

        let holders: usize = Pile::SHARED
            .iter()
            .map(|&pile| s.shared(pile).iter().filter(|&&c| c == card).count())
            .sum::<usize>()
            + s.players()
                .values()
                .map(|p| {
                    [&p.hand, &p.table, &p.characters, &p.backup_characters]
                        .iter()
                        .map(|list| list.iter().filter(|&&c| c == card).count())
                        .sum::<usize>()
                })
                .sum::<usize>();
        assert_eq!(holders, 1);
        assert_eq!(s.card(card).pile, Pile::DiscardPile);
        assert_eq!(s.card(card).owner, None);
    }

    #[test]
    fn test_move_returns_origin() {
        let mut s = store(2);
        let card = add(&mut s, "a", Pile::PlayerHand, Some(PlayerId(0)));
        let from = s.move_card(card, Pile::PlayerTable, Some(PlayerId(0)));
        assert_eq!(from, (Pile::PlayerHand, Some(PlayerId(0))));
    }

    #[test]
    fn test_top_is_last_added() {
        let mut s = store(2);
        add(&mut s, "a", Pile::DiscardPile, None);
        let b = add(&mut s, "b", Pile::DiscardPile, None);
        assert_eq!(s.top_of(Pile::DiscardPile), Some(b));
        assert_eq!(s.top_of(Pile::Selection), None);
    }

    #[test]
    fn test_shuffle_keeps_contents() {
        let mut s = store(2);
        let ids: Vec<_> = (0..20).map(|i| add(&mut s, &i.to_string(), Pile::MainDeck, None)).collect();
        let mut rng = GameRng::new(3);
        s.shuffle(Pile::MainDeck, &mut rng);
        let mut after: Vec<_> = s.shared(Pile::MainDeck).iter().copied().collect();
        after.sort_unstable();
        assert_eq!(after, ids);
    }

    #[test]
    fn test_cube_pool() {
        let mut s = store(2);
        assert_eq!(s.cube_pool_len(), NUM_CUBES as usize);
        let taken = s.take_cubes(3);
        assert_eq!(taken.len(), 3);
        assert_eq!(s.cube_pool_len(), NUM_CUBES as usize - 3);
        for cube in taken {
            s.return_cube(cube);
        }
        assert_eq!(s.cube_pool_len(), NUM_CUBES as usize);
        assert_eq!(s.take_cubes(100).len(), NUM_CUBES as usize);
        assert!(s.take_cubes(1).is_empty());
    }

    #[test]
    fn test_snapshot_detects_changes() {
        let mut s = store(2);
        let card = add(&mut s, "a", Pile::MainDeck, None);
        let before = s.snapshot().unwrap();
        assert_eq!(before, s.snapshot().unwrap());
        s.move_card(card, Pile::DiscardPile, None);
        assert_ne!(before, s.snapshot().unwrap());
    }

    #[test]
    #[should_panic(expected = "needs an owner")]
    fn test_player_pile_without_owner_panics() {
        let s = store(2);
        let _ = s.pile(Pile::PlayerHand, None);
    }
}
