//! The turn controller.
//!
//! A turn runs through start of turn, the predraw checks (highest
//! priority first, one `Predraw` request at a time), the `Draw` request,
//! free play and the pass. Each step that needs input queues a request
//! and returns; the next step is scheduled as a delayed action so it only
//! runs once every request raised by the previous one is answered.

use tracing::debug;

use super::game::Game;
use super::updates::{GameUpdate, UpdateTarget};
use crate::core::{CardId, PlayerFlags, PlayerId, ScenarioFlags};
use crate::events::{Event, Modifier};
use crate::fmt_str;
use crate::requests::{Request, RequestKind, RequestTag};

/// Hit points a revived dead man comes back with.
const DEADMAN_HP: i32 = 2;

impl Game {
    /// Make `player` the player in turn.
    pub fn start_of_turn(&mut self, player: PlayerId) {
        if self.is_game_over() {
            return;
        }
        if self.playing != Some(player) && self.first_player == Some(player) {
            self.draw_scenario_card();
        }
        self.playing = Some(player);
        debug!(%player, "turn start");

        {
            let p = self.store.player_mut(player);
            p.bangs_played = 0;
            p.bangs_per_turn = 1;
            p.num_drawn_cards = 0;
            p.mandatory_card = None;
            p.flags.insert(PlayerFlags::START_OF_TURN);
            for check in p.predraw_checks.values_mut() {
                check.resolved = false;
            }
        }

        let p = self.player(player);
        if p.is_dead() && !p.is_ghost() {
            if self.has_scenario(ScenarioFlags::GHOSTTOWN) {
                let p = self.store.player_mut(player);
                p.flags.insert(PlayerFlags::GHOST);
                p.num_cards_to_draw += 1;
                self.equip_characters(player);
                self.send_player_status(player);
            } else if self.has_scenario(ScenarioFlags::DEADMAN) && self.first_dead == Some(player) {
                self.store.player_mut(player).flags.remove(PlayerFlags::DEAD);
                self.set_hp(player, DEADMAN_HP);
                self.draw_card(player);
                self.draw_card(player);
                self.equip_characters(player);
                self.send_player_status(player);
            }
        }

        let p = self.player(player);
        let reset: Vec<CardId> = p.table.iter().chain(p.characters.iter()).copied().collect();
        for card in reset {
            self.store.card_mut(card).usages = 0;
        }

        self.add_update(UpdateTarget::All, GameUpdate::SwitchTurn { player });
        self.add_log(fmt_str!("LOG_TURN_START", player));
        self.queue_event(Event::PreTurnStart { player });
        self.queue_action(move |game| game.continue_predraw_checks(player));
    }

    fn equip_characters(&mut self, player: PlayerId) {
        let characters: Vec<CardId> = self.player(player).characters.iter().copied().collect();
        for card in characters {
            self.equip_if_enabled(card);
        }
    }

    /// Mark the check of `card` resolved and move on to the next one.
    pub fn next_predraw_check(&mut self, player: PlayerId, card: CardId) {
        self.queue_action(move |game| {
            if let Some(check) = game.store.player_mut(player).predraw_checks.get_mut(&card) {
                check.resolved = true;
            }
            game.continue_predraw_checks(player);
        });
    }

    /// Ask for the next unresolved predraw check, or go on to the draw.
    fn continue_predraw_checks(&mut self, player: PlayerId) {
        if self.playing != Some(player) {
            return;
        }
        if self.player(player).top_predraw_priority().is_some() {
            self.queue_request(Request::new(RequestKind::Predraw, player).with_origin(None, Some(player)));
        } else {
            self.request_drawing(player);
        }
    }

    /// Open the draw phase.
    ///
    /// `OnRequestDraw` handlers may replace the draw with their own
    /// request; otherwise a `Draw` request waits for the deck pick.
    pub fn request_drawing(&mut self, player: PlayerId) {
        self.queue_event(Event::OnTurnStart { player });
        self.queue_action(move |game| {
            if game.playing != Some(player) {
                return;
            }
            game.queue_event(Event::OnRequestDraw { player });
            if game.pending_requests() == 0 {
                game.queue_request(Request::new(RequestKind::Draw, player).with_origin(None, Some(player)));
            }
        });
    }

    /// Answer the `Draw` request: draw the phase-one cards.
    pub fn draw_from_deck(&mut self, player: PlayerId) {
        self.pop_request_noupdate(Some(RequestTag::Draw));
        let saved = self.player(player).num_cards_to_draw;

        self.queue_event(Event::OnDrawFromDeck { player });
        if self.pending_requests() == 0 {
            let mut drawn = false;
            while self.player(player).num_drawn_cards < self.player(player).num_cards_to_draw {
                self.store.player_mut(player).num_drawn_cards += 1;
                if let Some(card) = self.draw_phase_one_card(player) {
                    self.call_event(Event::OnCardDrawn { player, card });
                    drawn = true;
                }
            }
            if drawn {
                self.add_log(fmt_str!("LOG_DRAWN_FROM_DECK", player));
            }
        }

        let p = self.store.player_mut(player);
        p.num_cards_to_draw = saved;
        p.flags.remove(PlayerFlags::START_OF_TURN);
        self.queue_event(Event::PostDrawCards { player });
        self.update_requests();
    }

    /// Cards `player` may keep when passing.
    #[must_use]
    pub fn max_cards_end_of_turn(&self, player: PlayerId) -> i32 {
        let hp = self.player(player).hp;
        self.apply_modifier(Modifier::MaxCards { player, count: hp })
            .int_value()
            .unwrap_or(hp)
    }

    /// Pass the turn, discarding down to the hand limit first.
    pub fn pass_turn(&mut self, player: PlayerId) {
        if self.player(player).hand.len() as i32 > self.max_cards_end_of_turn(player) {
            self.queue_request(
                Request::new(RequestKind::DiscardPass { ndiscarded: 0 }, player).with_origin(None, Some(player)),
            );
        } else {
            self.end_of_turn(player);
        }
    }

    fn end_of_turn(&mut self, player: PlayerId) {
        self.untap_table(player);

        let extra = self.player(player).extra_turns > 0;
        if extra {
            let p = self.store.player_mut(player);
            p.extra_turns -= 1;
            p.flags.insert(PlayerFlags::EXTRA_TURN);
        } else {
            self.store.player_mut(player).flags.remove(PlayerFlags::EXTRA_TURN);
            self.call_event(Event::OnTurnEnd { player });
            self.queue_event(Event::PostTurnEnd { player });
        }

        let p = self.player(player);
        if p.is_dead() && p.is_ghost() {
            self.store.player_mut(player).num_cards_to_draw -= 1;
            self.player_death(None, player);
            // A ghost leaving decides the game like any death, without rewards.
            if let Some(winner) = self.find_winner(None, player) {
                self.game_over(winner);
                return;
            }
        }
        if self.num_alive() == 0 || self.is_game_over() {
            return;
        }

        let next = if extra { player } else { self.get_next_in_turn(player) };
        debug!(%player, %next, "pass turn");
        self.queue_action(move |game| game.start_of_turn(next));
    }

    /// End the turn of a jailed player before the draw.
    pub fn skip_turn(&mut self, player: PlayerId) {
        self.untap_table(player);
        self.call_event(Event::OnTurnEnd { player });
        let next = self.get_next_in_turn(player);
        debug!(%player, %next, "skip turn");
        self.queue_action(move |game| game.start_of_turn(next));
    }
}
