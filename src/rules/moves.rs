//! Card movement, deck draws and cubes.
//!
//! Every move goes through [`Game::move_card`], which keeps the store
//! consistent and records who may see the card in its new pile. Moves
//! of equipped cards also tear down their equips; see
//! [`Game::move_owned_card`].

use tracing::{debug, trace};

use super::game::Game;
use super::updates::{GameUpdate, UpdateTarget};
use crate::cards::{CardColor, MAX_CUBES};
use crate::core::{CardId, PlayerId};
use crate::events::Event;
use crate::fmt_str;
use crate::piles::{Pile, Visibility};
use crate::requests::{Request, RequestKind};

/// Cards kept face up in the shop.
pub const SHOP_SELECTION_SIZE: usize = 3;

/// Cubes an orange card arrives with.
pub const ORANGE_CARD_CUBES: usize = 3;

impl Game {
    // === Moves ===

    /// Move a card on top of a pile and tell everyone what they can see of it.
    pub fn move_card(&mut self, card: CardId, pile: Pile, owner: Option<PlayerId>) {
        let (old_pile, old_owner) = self.store.move_card(card, pile, owner);
        trace!(%card, ?old_pile, ?pile, ?owner, "move card");

        match (pile.visibility(), owner) {
            (Visibility::Owner, Some(owner)) => {
                self.show_card(card, UpdateTarget::Only(owner));
                if old_pile.visibility() == Visibility::Public {
                    self.add_update(UpdateTarget::Except(owner), GameUpdate::HideCard { card });
                }
            }
            (Visibility::Public, _) => {
                if old_pile.visibility() != Visibility::Public {
                    match old_owner.filter(|_| old_pile.visibility() == Visibility::Owner) {
                        Some(old_owner) => self.show_card(card, UpdateTarget::Except(old_owner)),
                        None => self.show_card(card, UpdateTarget::All),
                    }
                }
            }
            _ => {
                if old_pile.visibility() != Visibility::Hidden {
                    self.add_update(UpdateTarget::All, GameUpdate::HideCard { card });
                }
            }
        }
        let owner = self.card(card).owner;
        self.add_update(UpdateTarget::All, GameUpdate::MoveCard { card, pile, owner });
    }

    /// Move a card out of `owner`'s piles.
    ///
    /// A card leaving a table or character slot is untapped, loses its
    /// cubes and has its equips torn down on `owner`, who is no longer
    /// its owner by the time the hooks run.
    pub fn move_owned_card(&mut self, owner: PlayerId, card: CardId, pile: Pile, new_owner: Option<PlayerId>) {
        let c = self.card(card);
        if c.owner != Some(owner) {
            self.move_card(card, pile, new_owner);
            return;
        }
        if !c.is_equipped() {
            self.move_card(card, pile, new_owner);
            return;
        }

        let from_table = c.pile == Pile::PlayerTable;
        let enabled = !self.is_disabled(card);
        self.set_inactive(card, false);
        self.drop_all_cubes(card);
        self.move_card(card, pile, new_owner);
        if enabled {
            self.unequip_card_effects_of(card, owner);
        }
        if from_table {
            self.queue_event(Event::PostDiscardCard { target: owner, card });
        }
    }

    /// Discard a card held by `owner`. Black cards go back to the shop.
    pub fn discard_card(&mut self, owner: PlayerId, card: CardId) {
        let pile = if self.card(card).color() == CardColor::Black {
            Pile::ShopDiscard
        } else {
            Pile::DiscardPile
        };
        self.move_owned_card(owner, card, pile, None);
    }

    /// Move a card from its owner into the hand of `origin`.
    pub fn steal_card(&mut self, origin: PlayerId, card: CardId) {
        match self.card(card).owner {
            Some(owner) => self.move_owned_card(owner, card, Pile::PlayerHand, Some(origin)),
            None => self.move_card(card, Pile::PlayerHand, Some(origin)),
        }
    }

    /// Discard the whole hand and table of a player.
    pub fn discard_all(&mut self, player: PlayerId) {
        let p = self.player(player);
        let cards: Vec<CardId> = p.table.iter().chain(p.hand.iter()).copied().collect();
        for card in cards {
            self.discard_card(player, card);
        }
    }

    /// Tap or untap a card.
    pub(crate) fn set_inactive(&mut self, card: CardId, inactive: bool) {
        if self.card(card).inactive != inactive {
            self.store.card_mut(card).inactive = inactive;
            self.add_update(UpdateTarget::All, GameUpdate::TapCard { card, inactive });
        }
    }

    /// Untap every card on a player's table.
    pub(crate) fn untap_table(&mut self, player: PlayerId) {
        let table: Vec<CardId> = self.player(player).table.iter().copied().collect();
        for card in table {
            self.set_inactive(card, false);
        }
    }

    // === Draws ===

    /// Move the top card of the main deck into a pile.
    ///
    /// An empty deck is rebuilt from the discard pile first, and again
    /// right after the draw if the draw emptied it.
    pub fn draw_card_to(&mut self, pile: Pile, owner: Option<PlayerId>) -> Option<CardId> {
        if self.shared_pile(Pile::MainDeck).is_empty() {
            self.reshuffle_deck();
        }
        let card = self.store.top_of(Pile::MainDeck)?;
        self.move_card(card, pile, owner);
        if self.shared_pile(Pile::MainDeck).is_empty() {
            self.reshuffle_deck();
        }
        Some(card)
    }

    /// Draw a card into a player's hand.
    pub fn draw_card(&mut self, player: PlayerId) -> Option<CardId> {
        let card = self.draw_card_to(Pile::PlayerHand, Some(player))?;
        self.add_log_for(UpdateTarget::Only(player), fmt_str!("LOG_DRAWN_CARD", player, card));
        self.add_log_for(UpdateTarget::Except(player), fmt_str!("LOG_DRAWN_CARDS", player, 1));
        Some(card)
    }

    /// Draw-phase card: from the discard pile under the abandoned mine.
    pub(crate) fn draw_phase_one_card(&mut self, player: PlayerId) -> Option<CardId> {
        if self.has_scenario(crate::core::ScenarioFlags::ABANDONEDMINE) {
            if let Some(card) = self.store.top_of(Pile::DiscardPile) {
                self.move_card(card, Pile::PlayerHand, Some(player));
                self.add_log(fmt_str!("LOG_DRAWN_FROM_DISCARD", player, card));
                return Some(card);
            }
        }
        self.draw_card(player)
    }

    /// Turn the discard pile, minus its top card, into a fresh deck.
    fn reshuffle_deck(&mut self) {
        let discards: Vec<CardId> = self.shared_pile(Pile::DiscardPile).iter().copied().collect();
        let Some((_, rest)) = discards.split_last() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        for &card in rest {
            self.store.move_card(card, Pile::MainDeck, None);
        }
        self.shuffle_pile(Pile::MainDeck);
        debug!(cards = rest.len(), "deck reshuffled");
        self.add_update(UpdateTarget::All, GameUpdate::DeckShuffled { pile: Pile::MainDeck });
        self.add_log(fmt_str!("LOG_DECK_RESHUFFLED"));
    }

    /// Reveal the next shop card, rebuilding the shop deck when it runs out.
    pub fn draw_shop_card(&mut self) -> Option<CardId> {
        if self.shared_pile(Pile::ShopDeck).is_empty() {
            let discards: Vec<CardId> = self.shared_pile(Pile::ShopDiscard).iter().copied().collect();
            if discards.is_empty() {
                return None;
            }
            for card in discards {
                self.store.move_card(card, Pile::ShopDeck, None);
            }
            self.shuffle_pile(Pile::ShopDeck);
            self.add_update(UpdateTarget::All, GameUpdate::DeckShuffled { pile: Pile::ShopDeck });
        }
        let card = self.store.top_of(Pile::ShopDeck)?;
        self.move_card(card, Pile::ShopSelection, None);
        Some(card)
    }

    /// Refill the shop selection up to its size.
    pub(crate) fn refill_shop(&mut self) {
        while self.shared_pile(Pile::ShopSelection).len() < SHOP_SELECTION_SIZE {
            if self.draw_shop_card().is_none() {
                break;
            }
        }
    }

    /// Replace the active scenario card with the next one.
    pub fn draw_scenario_card(&mut self) {
        let Some(first) = self.first_player else {
            return;
        };
        let Some(next) = self.store.top_of(Pile::ScenarioDeck) else {
            return;
        };
        if let Some(old) = self.store.top_of(Pile::ScenarioCard) {
            if !self.is_disabled(old) {
                self.unequip_card_effects_of(old, first);
            }
            self.move_card(old, Pile::DiscardPile, None);
        }
        self.move_card(next, Pile::ScenarioCard, None);
        self.add_log(fmt_str!("LOG_SCENARIO_CARD", next));
        let equips = self.card(next).data.equips.clone();
        if !self.is_disabled(next) {
            for spec in equips {
                spec.kind.behavior().on_equip(self, next, first, &spec);
            }
        }
    }

    // === Cubes ===

    #[must_use]
    pub fn cube_pool_len(&self) -> usize {
        self.store.cube_pool_len()
    }

    /// Cube slots left on the character and orange cards of a player.
    #[must_use]
    pub fn free_cube_slots(&self, player: PlayerId) -> usize {
        let p = self.player(player);
        let character = p.character().map_or(0, |c| self.card(c).free_cube_slots());
        let orange: usize = p
            .table
            .iter()
            .map(|&c| self.card(c))
            .filter(|c| c.color() == CardColor::Orange)
            .map(|c| c.free_cube_slots())
            .sum();
        character + orange
    }

    /// Move up to `n` cubes from the pool onto a card.
    pub fn add_cubes(&mut self, card: CardId, n: usize) {
        let n = n.min(self.card(card).free_cube_slots());
        let cubes = self.store.take_cubes(n);
        if cubes.is_empty() {
            return;
        }
        let num = cubes.len();
        self.store.card_mut(card).cubes.extend(cubes);
        self.add_update(
            UpdateTarget::All,
            GameUpdate::MoveCubes {
                num,
                origin_card: None,
                target_card: Some(card),
            },
        );
    }

    /// Pay `n` cubes from a card back to the pool.
    ///
    /// An orange card paying its last cube is discarded.
    pub fn pay_cubes(&mut self, card: CardId, n: usize) {
        let c = self.store.card_mut(card);
        let n = n.min(c.cubes.len());
        let at = c.cubes.len() - n;
        let paid: Vec<_> = c.cubes.drain(at..).collect();
        for cube in paid {
            self.store.return_cube(cube);
        }
        if n > 0 {
            self.add_update(
                UpdateTarget::All,
                GameUpdate::MoveCubes {
                    num: n,
                    origin_card: Some(card),
                    target_card: None,
                },
            );
        }

        let c = self.card(card);
        if c.color() == CardColor::Orange && c.cubes.is_empty() && c.pile == Pile::PlayerTable {
            if let Some(owner) = c.owner {
                self.discard_card(owner, card);
                self.queue_event(Event::PostDiscardOrangeCard { target: owner, card });
            }
        }
    }

    /// Return every cube of a card to the pool.
    pub(crate) fn drop_all_cubes(&mut self, card: CardId) {
        let cubes = std::mem::take(&mut self.store.card_mut(card).cubes);
        if cubes.is_empty() {
            return;
        }
        let num = cubes.len();
        for cube in cubes {
            self.store.return_cube(cube);
        }
        self.add_update(
            UpdateTarget::All,
            GameUpdate::MoveCubes {
                num,
                origin_card: Some(card),
                target_card: None,
            },
        );
    }

    /// Let a player place `n` cubes from the pool.
    ///
    /// Placement is automatic when there are no more free slots than
    /// cubes to place; otherwise an `AddCube` request asks where.
    pub fn queue_request_add_cube(&mut self, origin_card: Option<CardId>, player: PlayerId, n: usize) {
        let n = n.min(self.cube_pool_len());
        let free = self.free_cube_slots(player);
        if n == 0 || free == 0 {
            return;
        }
        if free <= n {
            let p = self.player(player);
            let slots: Vec<CardId> = p
                .character()
                .into_iter()
                .chain(p.table.iter().copied().filter(|&c| self.card(c).color() == CardColor::Orange))
                .collect();
            for card in slots {
                self.add_cubes(card, MAX_CUBES);
            }
        } else {
            self.queue_request(
                Request::new(RequestKind::AddCube { ncubes: n as i32 }, player).with_origin(origin_card, Some(player)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardData;
    use crate::core::Expansions;

    fn plain(name: &str) -> CardData {
        CardData::new(name, CardColor::Brown)
    }

    #[test]
    fn test_hand_cards_shown_to_owner_only() {
        let mut game = Game::test_game(3);
        let card = game.add_test_card(plain("Beer"), Pile::MainDeck, None);
        game.draw_card(PlayerId(1));
        let updates = game.drain_updates();
        let shows: Vec<_> = updates
            .iter()
            .filter(|r| matches!(r.update, GameUpdate::ShowCard { card: c, .. } if c == card))
            .collect();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].target, UpdateTarget::Only(PlayerId(1)));
    }

    #[test]
    fn test_empty_deck_reshuffles_keeping_top_discard() {
        let mut game = Game::test_game(3);
        let bottom = game.add_test_card(plain("a"), Pile::DiscardPile, None);
        let middle = game.add_test_card(plain("b"), Pile::DiscardPile, None);
        let top = game.add_test_card(plain("c"), Pile::DiscardPile, None);

        let drawn = game.draw_card(PlayerId(0));
        assert!(drawn == Some(bottom) || drawn == Some(middle));
        assert_eq!(game.store.top_of(Pile::DiscardPile), Some(top));
        assert_eq!(game.shared_pile(Pile::MainDeck).len(), 1);
        assert!(game
            .drain_updates()
            .iter()
            .any(|r| r.update == GameUpdate::DeckShuffled { pile: Pile::MainDeck }));
    }

    #[test]
    fn test_draw_from_nothing() {
        let mut game = Game::test_game(3);
        game.add_test_card(plain("last"), Pile::DiscardPile, None);
        assert_eq!(game.draw_card(PlayerId(0)), None);
    }

    #[test]
    fn test_orange_card_discarded_with_last_cube() {
        let mut game = Game::test_game(3);
        let me = PlayerId(0);
        let card = game.add_test_card(CardData::new("Bell", CardColor::Orange), Pile::PlayerTable, Some(me));
        game.add_cubes(card, 2);
        let pool = game.cube_pool_len();
        game.pay_cubes(card, 1);
        assert_eq!(game.card(card).pile, Pile::PlayerTable);
        game.pay_cubes(card, 1);
        assert_eq!(game.card(card).pile, Pile::DiscardPile);
        assert_eq!(game.cube_pool_len(), pool + 2);
    }

    #[test]
    fn test_cubes_capped_per_card() {
        let mut game = Game::test_game(3);
        let character = game.add_test_card(CardData::new("x", CardColor::None), Pile::PlayerCharacter, Some(PlayerId(0)));
        game.add_cubes(character, 10);
        assert_eq!(game.card(character).cubes.len(), MAX_CUBES);
        assert_eq!(game.free_cube_slots(PlayerId(0)), 0);
    }

    #[test]
    fn test_add_cube_request_only_when_there_is_a_choice() {
        let mut game = Game::test_game(3);
        let me = PlayerId(0);
        let character = game.add_test_card(CardData::new("x", CardColor::None), Pile::PlayerCharacter, Some(me));
        game.queue_request_add_cube(None, me, 4);
        assert_eq!(game.pending_requests(), 0);
        assert_eq!(game.card(character).cubes.len(), 4);

        game.add_test_card(CardData::new("y", CardColor::Orange), Pile::PlayerTable, Some(me));
        game.queue_request_add_cube(None, me, 2);
        assert_eq!(game.pending_requests(), 1);
    }

    #[test]
    fn test_shop_deck_rebuilt_from_shop_discard() {
        let mut game = Game::test_game(3);
        game.options = game.options.clone().with_expansion(Expansions::GOLDRUSH);
        for name in ["a", "b", "c", "d"] {
            game.add_test_card(CardData::new(name, CardColor::Black), Pile::ShopDiscard, None);
        }
        game.refill_shop();
        assert_eq!(game.shared_pile(Pile::ShopSelection).len(), SHOP_SELECTION_SIZE);
        assert_eq!(game.shared_pile(Pile::ShopDeck).len(), 1);
        assert!(game.shared_pile(Pile::ShopDiscard).is_empty());
    }
}
