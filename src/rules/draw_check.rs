//! Draw checks: reveal cards from the deck and act on the one kept.

use tracing::debug;

use super::game::Game;
use crate::core::{CardId, PlayerId};
use crate::events::Event;
use crate::fmt_str;
use crate::piles::Pile;
use crate::requests::{Request, RequestKind};

pub(crate) type CheckCallback = Box<dyn FnOnce(&mut Game, CardId)>;

/// The draw check waiting for its card.
pub(crate) struct DrawCheck {
    pub(crate) origin: PlayerId,
    pub(crate) origin_card: Option<CardId>,
    callback: CheckCallback,
}

impl Game {
    /// Reveal `num_checks` cards for `origin` and run `callback` on the kept one.
    ///
    /// A single card is kept right away. With more, a `Check` request lets
    /// the player pick; every revealed card ends on the discard pile before
    /// the callback runs.
    ///
    /// Returns false when neither the deck nor the discard pile had a card
    /// to reveal. The check then counts as failed and the callback never
    /// runs; the caller decides how its flow goes on.
    pub fn draw_check_then(
        &mut self,
        origin: PlayerId,
        origin_card: Option<CardId>,
        callback: impl FnOnce(&mut Game, CardId) + 'static,
    ) -> bool {
        let num_checks = self.player(origin).num_checks.max(1);
        let drawn: Vec<CardId> = (0..num_checks)
            .filter_map(|_| self.draw_card_to(Pile::Selection, None))
            .collect();
        let Some(&first) = drawn.first() else {
            debug!(%origin, "draw check with an empty deck");
            self.add_log(fmt_str!("LOG_CHECK_NO_CARDS", origin).with_opt(origin_card));
            return false;
        };

        self.current_check = Some(DrawCheck {
            origin,
            origin_card,
            callback: Box::new(callback),
        });
        if drawn.len() == 1 {
            self.move_card(first, Pile::DiscardPile, None);
            self.queue_event(Event::OnDrawCheck { player: origin, card: first });
            self.resolve_draw_check(first);
        } else {
            self.queue_request(Request::new(RequestKind::Check, origin).with_origin(origin_card, Some(origin)));
        }
        true
    }

    /// Run the pending check callback on the kept card.
    pub fn resolve_draw_check(&mut self, card: CardId) {
        let Some(check) = self.current_check.take() else {
            return;
        };
        self.add_log(fmt_str!("LOG_CHECK_DREW_CARD", check.origin, card).with_opt(check.origin_card));
        (check.callback)(self, card);
    }

    #[must_use]
    pub fn has_pending_check(&self) -> bool {
        self.current_check.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardColor, CardData, Rank, Suit};
    use crate::requests::RequestTag;
    use std::cell::Cell;
    use std::rc::Rc;

    fn signed(game: &mut Game, suit: Suit) -> CardId {
        let data = CardData::new("x", CardColor::Brown).with_sign(suit, Rank::Five);
        game.add_test_card(data, Pile::MainDeck, None)
    }

    #[test]
    fn test_single_check_resolves_at_once() {
        let mut game = Game::test_game(3);
        let card = signed(&mut game, Suit::Hearts);
        let seen = Rc::new(Cell::new(None));
        let out = Rc::clone(&seen);
        let started = game.draw_check_then(PlayerId(0), None, move |game, drawn| {
            assert_eq!(game.card(drawn).pile, Pile::DiscardPile);
            out.set(Some(drawn));
        });
        assert!(started);
        assert_eq!(seen.get(), Some(card));
        assert!(!game.has_pending_check());
        assert_eq!(game.pending_requests(), 0);
    }

    #[test]
    fn test_two_checks_ask_for_a_pick() {
        let mut game = Game::test_game(3);
        game.store.player_mut(PlayerId(0)).num_checks = 2;
        signed(&mut game, Suit::Spades);
        let hearts = signed(&mut game, Suit::Hearts);
        signed(&mut game, Suit::Clubs);

        let seen = Rc::new(Cell::new(None));
        let out = Rc::clone(&seen);
        game.draw_check_then(PlayerId(0), None, move |_, drawn| out.set(Some(drawn)));
        assert!(game.top_request_is(RequestTag::Check, Some(PlayerId(0))));
        assert!(game.has_pending_check());
        assert_eq!(game.shared_pile(Pile::Selection).len(), 2);

        game.pick_card(PlayerId(0), Pile::Selection, None, Some(hearts)).unwrap();
        assert_eq!(seen.get(), Some(hearts));
        assert!(game.shared_pile(Pile::Selection).is_empty());
        assert_eq!(game.pending_requests(), 0);
    }

    #[test]
    fn test_check_without_cards_fails() {
        let mut game = Game::test_game(3);
        let ran = Rc::new(Cell::new(false));
        let out = Rc::clone(&ran);
        let started = game.draw_check_then(PlayerId(0), None, move |_, _| out.set(true));
        assert!(!started);
        assert!(!ran.get());
        assert!(!game.has_pending_check());
        assert_eq!(game.pending_requests(), 0);
    }
}
