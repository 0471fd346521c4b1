//! Per-variant request handlers.
//!
//! Each request variant supports a subset of the operations below. A pick
//! on a variant that takes no picks is never legal; a confirm on a variant
//! that is not resolvable is rejected by the caller.

use tracing::debug;

use super::request::{Request, RequestKind, RequestTag};
use crate::cards::{CardColor, MAX_CUBES};
use crate::core::{CardId, Expansions, FormattedString, PlayerId, ScenarioFlags};
use crate::events::Event;
use crate::fmt_str;
use crate::piles::Pile;
use crate::rules::Game;

/// True if `card` really sits in `pile` under `owner`.
fn lies_in(game: &Game, card: CardId, pile: Pile, owner: Option<PlayerId>) -> bool {
    let c = game.card(card);
    c.pile == pile && c.owner == owner
}

/// True if the request accepts this pick from its target.
///
/// The pile and player of a pick are claims made by the caller; every
/// card pick is checked against where the card actually is.
pub fn can_pick(game: &Game, req: &Request, pile: Pile, player: Option<PlayerId>, card: Option<CardId>) -> bool {
    let target = req.target;
    let own_hand_card = pile == Pile::PlayerHand
        && player == Some(target)
        && card.is_some_and(|c| lies_in(game, c, Pile::PlayerHand, Some(target)));
    match &req.kind {
        RequestKind::CharacterChoice | RequestKind::Discard { .. } | RequestKind::DiscardPass { .. } => own_hand_card,
        RequestKind::Draw => {
            if game.has_scenario(ScenarioFlags::ABANDONEDMINE) && !game.shared_pile(Pile::DiscardPile).is_empty() {
                pile == Pile::DiscardPile
            } else {
                pile == Pile::MainDeck
            }
        }
        RequestKind::Predraw => {
            if pile != Pile::PlayerTable || player != Some(target) {
                return false;
            }
            let Some(card) = card else {
                return false;
            };
            if !lies_in(game, card, Pile::PlayerTable, Some(target)) {
                return false;
            }
            let p = game.player(target);
            match (p.predraw_checks.get(&card), p.top_predraw_priority()) {
                (Some(check), Some(top)) => !check.resolved && check.priority == top,
                _ => false,
            }
        }
        RequestKind::Check | RequestKind::GeneralStore => {
            pile == Pile::Selection && card.is_some_and(|c| lies_in(game, c, Pile::Selection, None))
        }
        RequestKind::Indians | RequestKind::Duel { .. } => {
            own_hand_card && card.is_some_and(|c| game.is_bangcard(target, c))
        }
        RequestKind::AddCube { .. } => {
            let Some(card) = card else {
                return false;
            };
            if player != Some(target) || !lies_in(game, card, pile, Some(target)) {
                return false;
            }
            let c = game.card(card);
            let slot = match pile {
                Pile::PlayerCharacter => game.player(target).character() == Some(card),
                Pile::PlayerTable => c.color() == CardColor::Orange,
                _ => false,
            };
            slot && c.cubes.len() < MAX_CUBES
        }
        RequestKind::Bang { .. }
        | RequestKind::Steal { .. }
        | RequestKind::Destroy { .. }
        | RequestKind::Death { .. }
        | RequestKind::TimerDamaging { .. } => false,
    }
}

/// The target of Indians or a duel answered with a Bang.
///
/// Indians are over for that player; a duel passes back to the other side.
pub(crate) fn answer_with_bang(game: &mut Game) {
    let Some(req) = game.top_request().cloned() else {
        return;
    };
    match req.kind {
        RequestKind::Indians => {
            game.pop_request(Some(RequestTag::Indians));
        }
        RequestKind::Duel { respond_to } => {
            game.pop_request_noupdate(Some(RequestTag::Duel));
            game.queue_request(
                Request::new(RequestKind::Duel { respond_to: req.target }, respond_to)
                    .with_origin(req.origin_card, req.origin)
                    .with_flags(req.flags),
            );
        }
        _ => {}
    }
}

/// Apply a pick accepted by [`can_pick`].
pub(crate) fn on_pick(game: &mut Game, req: Request, pile: Pile, player: Option<PlayerId>, card: Option<CardId>) {
    let target = req.target;
    debug!(kind = ?req.tag(), ?pile, ?player, ?card, "pick");
    match req.kind {
        RequestKind::CharacterChoice => {
            let Some(card) = card else { return };
            game.move_card(card, Pile::PlayerCharacter, Some(target));
            game.equip_if_enabled(card);
            let max_hp = game.player(target).max_hp;
            game.set_hp(target, max_hp);
            if let Some(&rest) = game.player(target).hand.front() {
                game.move_card(rest, Pile::PlayerBackup, Some(target));
            }
            game.pop_request(Some(RequestTag::CharacterChoice));
        }
        RequestKind::Draw => game.draw_from_deck(target),
        RequestKind::Predraw => {
            let Some(card) = card else { return };
            let Some(check) = game.player(target).predraw_checks.get(&card).copied() else {
                return;
            };
            game.pop_request(Some(RequestTag::Predraw));
            let started = game.draw_check_then(target, Some(card), move |game, drawn| {
                check.equip.behavior().on_predraw_check(game, card, target, drawn);
            });
            if !started {
                game.next_predraw_check(target, card);
            }
        }
        RequestKind::Check => {
            let Some(card) = card else { return };
            while let Some(&drawn) = game.shared_pile(Pile::Selection).front() {
                game.move_card(drawn, Pile::DiscardPile, None);
                game.queue_event(Event::OnDrawCheck { player: target, card: drawn });
            }
            game.pop_request_noupdate(Some(RequestTag::Check));
            game.resolve_draw_check(card);
            game.update_requests();
        }
        RequestKind::GeneralStore => {
            let Some(card) = card else { return };
            let next = game.get_next_player(target);
            let selection_len = game.shared_pile(Pile::Selection).len();
            if selection_len == 2 {
                game.add_log(fmt_str!("LOG_DRAWN_FROM_GENERALSTORE", target, card).with_opt(req.origin_card));
                game.move_card(card, Pile::PlayerHand, Some(target));
                if let Some(&last) = game.shared_pile(Pile::Selection).front() {
                    game.add_log(fmt_str!("LOG_DRAWN_FROM_GENERALSTORE", next, last).with_opt(req.origin_card));
                    game.move_card(last, Pile::PlayerHand, Some(next));
                }
                game.pop_request(Some(RequestTag::GeneralStore));
            } else {
                game.pop_request_noupdate(Some(RequestTag::GeneralStore));
                game.add_log(fmt_str!("LOG_DRAWN_FROM_GENERALSTORE", target, card).with_opt(req.origin_card));
                game.move_card(card, Pile::PlayerHand, Some(target));
                game.queue_request(
                    Request::new(RequestKind::GeneralStore, next).with_origin(req.origin_card, req.origin),
                );
            }
        }
        RequestKind::Discard { .. } => {
            let Some(card) = card else { return };
            let done = match game.top_request_mut() {
                Some(Request { kind: RequestKind::Discard { ncards }, .. }) => {
                    *ncards -= 1;
                    *ncards <= 0
                }
                _ => false,
            };
            if done {
                game.pop_request(Some(RequestTag::Discard));
            }
            game.discard_card(target, card);
            game.queue_event(Event::OnEffectEnd { player: target, card: req.origin_card });
        }
        RequestKind::DiscardPass { .. } => {
            let Some(card) = card else { return };
            if game.has_scenario(ScenarioFlags::ABANDONEDMINE) {
                game.move_owned_card(target, card, Pile::MainDeck, None);
            } else {
                game.discard_card(target, card);
            }
            if let Some(Request { kind: RequestKind::DiscardPass { ndiscarded }, .. }) = game.top_request_mut() {
                *ndiscarded += 1;
            }
            game.add_log(fmt_str!("LOG_DISCARDED_SELF_CARD", target, card));
            game.call_event(Event::OnDiscardPass { player: target, card });
            if game.has_expansion(Expansions::ARMEDANDDANGEROUS) {
                game.queue_action(move |game| game.queue_request_add_cube(None, target, 1));
            }
            if game.player(target).hand.len() as i32 <= game.max_cards_end_of_turn(target) {
                game.pop_request(Some(RequestTag::DiscardPass));
                game.queue_action(move |game| game.pass_turn(target));
            } else {
                game.send_request_update();
            }
        }
        RequestKind::Indians | RequestKind::Duel { .. } => {
            let Some(card) = card else { return };
            game.queue_event(Event::OnPlayHandCard { player: target, card });
            game.discard_card(target, card);
            answer_with_bang(game);
        }
        RequestKind::AddCube { .. } => {
            let Some(card) = card else { return };
            game.add_cubes(card, 1);
            let done = match game.top_request_mut() {
                Some(Request { kind: RequestKind::AddCube { ncubes }, .. }) => {
                    *ncubes -= 1;
                    *ncubes <= 0
                }
                _ => true,
            };
            if done || game.cube_pool_len() == 0 || game.free_cube_slots(target) == 0 {
                game.pop_request(Some(RequestTag::AddCube));
            } else {
                game.send_request_update();
            }
        }
        RequestKind::Bang { .. }
        | RequestKind::Steal { .. }
        | RequestKind::Destroy { .. }
        | RequestKind::Death { .. }
        | RequestKind::TimerDamaging { .. } => {}
    }
}

/// True if the request can be confirmed without a pick or a response.
#[must_use]
pub fn is_resolvable(req: &Request) -> bool {
    matches!(
        req.kind,
        RequestKind::Indians
            | RequestKind::Duel { .. }
            | RequestKind::Bang { .. }
            | RequestKind::Steal { .. }
            | RequestKind::Destroy { .. }
            | RequestKind::Death { .. }
    )
}

/// Confirm the live request: take the hit, lose the card, or die.
pub(crate) fn on_resolve(game: &mut Game, req: Request) {
    let target = req.target;
    debug!(kind = ?req.tag(), %target, "resolve");
    match req.kind {
        RequestKind::Indians | RequestKind::Duel { .. } => {
            game.pop_request_noupdate(Some(req.tag()));
            game.damage(req.origin_card, req.origin, target, 1, false, false);
            game.update_requests();
        }
        RequestKind::Bang { damage, is_bang_card, .. } => {
            game.pop_request_noupdate(Some(RequestTag::Bang));
            game.damage(req.origin_card, req.origin, target, damage, is_bang_card, false);
            game.update_requests();
        }
        RequestKind::Steal { card } => {
            game.pop_request_noupdate(Some(RequestTag::Steal));
            if let Some(origin) = req.origin {
                crate::effects::resolve_steal(game, req.origin_card, origin, card);
            }
            game.update_requests();
        }
        RequestKind::Destroy { card } => {
            game.pop_request_noupdate(Some(RequestTag::Destroy));
            if let Some(origin) = req.origin {
                crate::effects::resolve_destroy(game, req.origin_card, origin, card);
            }
            game.update_requests();
        }
        RequestKind::Death { .. } => {
            game.player_death(req.origin, target);
            game.pop_request_noupdate(Some(RequestTag::Death));
            game.check_game_over(req.origin, target);
            game.update_requests();
        }
        _ => panic!("{:?} request is not resolvable", req.tag()),
    }
}

/// A damage timer ran out: land the damage.
pub(crate) fn on_timer_finished(game: &mut Game) {
    let Some(req) = game.top_request().cloned() else {
        return;
    };
    let RequestKind::TimerDamaging { damage, is_bang, .. } = req.kind else {
        return;
    };
    game.pop_request_noupdate(Some(RequestTag::TimerDamaging));
    game.damage(req.origin_card, req.origin, req.target, damage, is_bang, true);
    game.update_requests();
}

/// Runs when a request leaves the queue.
pub(crate) fn on_cleanup(game: &mut Game, req: &Request) {
    if matches!(req.kind, RequestKind::Check | RequestKind::GeneralStore) {
        // Picks normally empty the selection; this covers requests
        // dropped before completion.
        while let Some(&card) = game.shared_pile(Pile::Selection).front() {
            if req.is(RequestTag::Check) && game.has_pending_check() {
                break;
            }
            game.move_card(card, Pile::DiscardPile, None);
        }
    }
}

/// Status line of the request as seen by `viewer`.
#[must_use]
pub fn status_text(game: &Game, req: &Request, viewer: PlayerId) -> Option<FormattedString> {
    let own = viewer == req.target;
    let target = req.target;
    let text = |key: &str| {
        if own {
            FormattedString::new(key)
        } else {
            FormattedString::new(format!("{}_OTHER", key)).with(target)
        }
    };

    let status = match &req.kind {
        RequestKind::CharacterChoice => text("STATUS_CHARACTERCHOICE"),
        RequestKind::Draw => text("STATUS_YOUR_TURN"),
        RequestKind::Predraw => {
            let top = game.player(target).top_predraw_checks();
            if let [single] = top.as_slice() {
                text("STATUS_PREDRAW_FOR").with(*single)
            } else {
                text("STATUS_PREDRAW")
            }
        }
        RequestKind::Check => text("STATUS_CHECK").with_opt(req.origin_card),
        RequestKind::GeneralStore => text("STATUS_GENERALSTORE").with_opt(req.origin_card),
        RequestKind::Discard { ncards } => text("STATUS_DISCARD").with_opt(req.origin_card).with(*ncards),
        RequestKind::DiscardPass { .. } => {
            let diff = game.player(target).hand.len() as i32 - game.max_cards_end_of_turn(target);
            if diff > 1 {
                text("STATUS_DISCARD_PASS_PLURAL").with(diff)
            } else {
                text("STATUS_DISCARD_PASS")
            }
        }
        RequestKind::Indians => text("STATUS_INDIANS").with_opt(req.origin_card),
        RequestKind::Duel { .. } => text("STATUS_DUEL").with_opt(req.origin_card),
        RequestKind::Bang { strength, unavoidable, .. } => {
            if !own {
                text("STATUS_BANG").with_opt(req.origin_card)
            } else if *unavoidable {
                text("STATUS_BANG_UNAVOIDABLE").with_opt(req.origin_card)
            } else if *strength > 1 {
                text("STATUS_BANG_MULTIPLE_MISSED").with_opt(req.origin_card).with(*strength)
            } else {
                text("STATUS_BANG").with_opt(req.origin_card)
            }
        }
        RequestKind::Steal { card } => text("STATUS_STEAL").with_opt(req.origin_card).with(*card),
        RequestKind::Destroy { card } => text("STATUS_DESTROY").with_opt(req.origin_card).with(*card),
        RequestKind::Death { .. } => text("STATUS_DEATH"),
        RequestKind::AddCube { ncubes } => text("STATUS_ADD_CUBE").with(*ncubes),
        RequestKind::TimerDamaging { damage, .. } => text("STATUS_DAMAGING").with_opt(req.origin_card).with(*damage),
    };
    Some(status)
}
