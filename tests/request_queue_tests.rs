//! Request queue tests.
//!
//! Only the front request may be answered, and queued events and
//! delayed actions wait for the queue to empty, in insertion order.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use bang_engine::core::{CardId, GameError, PlayerId};
use bang_engine::events::{Event, EventKind};
use bang_engine::requests::{Request, RequestKind, RequestTag};
use bang_engine::rules::{GameUpdate, PlayCardArgs};
use bang_engine::effects::PlayTarget;

use common::*;

// ============================================================================
// Single active request
// ============================================================================

/// A Gatling asks each other player in seat order, one at a time.
#[test]
fn test_gatling_asks_one_player_at_a_time() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, gatling());
    game.play_card(me, PlayCardArgs::new(card).with_target(PlayTarget::OtherPlayers))
        .unwrap();

    assert_eq!(game.pending_requests(), 3);
    for seat in 1..=3u8 {
        let target = PlayerId::new(seat);
        assert!(game.top_request_is(RequestTag::Bang, Some(target)));
        game.confirm_request(target).unwrap();
        assert_eq!(game.player(target).hp, 3);
    }
    assert_eq!(game.pending_requests(), 0);
}

/// Players behind the front request cannot answer yet.
#[test]
fn test_queued_target_cannot_respond() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, gatling());
    let dodge = give(&mut game, PlayerId::new(2), missed());
    game.play_card(me, PlayCardArgs::new(card).with_target(PlayTarget::OtherPlayers))
        .unwrap();

    assert!(!game.can_respond_with(PlayerId::new(2), dodge));
    let err = game.respond_card(PlayerId::new(2), PlayCardArgs::new(dodge).with_target(PlayTarget::None));
    assert_eq!(err, Err(GameError::CantPlayCard(dodge)));
    assert_eq!(game.confirm_request(PlayerId::new(2)), Err(GameError::InvalidAction));

    game.confirm_request(PlayerId::new(1)).unwrap();
    assert!(game.can_respond_with(PlayerId::new(2), dodge));
    game.respond_card(PlayerId::new(2), PlayCardArgs::new(dodge).with_target(PlayTarget::None))
        .unwrap();
    assert_eq!(game.player(PlayerId::new(2)).hp, 4);
}

/// Status updates only ever describe the front request.
#[test]
fn test_status_updates_follow_the_front() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, gatling());
    game.drain_updates();

    game.play_card(me, PlayCardArgs::new(card).with_target(PlayTarget::OtherPlayers))
        .unwrap();
    for seat in 1..=3u8 {
        let front = game.top_request().map(|r| r.target);
        for record in game.drain_updates() {
            if let GameUpdate::RequestStatus(status) = record.update {
                assert_eq!(Some(status.target), front);
            }
        }
        game.confirm_request(PlayerId::new(seat)).unwrap();
    }
}

/// Turn actions are refused while anything is pending.
#[test]
fn test_no_end_turn_while_pending() {
    let mut game = table(3);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, bang());
    let args = PlayCardArgs::new(card).with_targets(vec![PlayTarget::None, PlayTarget::Player(PlayerId::new(1))]);
    game.play_card(me, args).unwrap();

    assert_eq!(game.end_turn(me), Err(GameError::RequestPending));
}

// ============================================================================
// Deferred events and delayed actions
// ============================================================================

/// Events queued behind a request fire in insertion order once it is gone.
#[test]
fn test_backlog_is_fifo() {
    let mut game = table(3);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    game.add_listener(CardId::new(900), EventKind::OnTurnEnd, move |_, event| {
        if let Event::OnTurnEnd { player } = event {
            log.borrow_mut().push(*player);
        }
    });

    game.queue_request(Request::new(RequestKind::Draw, PlayerId::new(0)));
    for seat in [2u8, 0, 1] {
        game.queue_event(Event::OnTurnEnd { player: PlayerId::new(seat) });
    }
    assert!(seen.borrow().is_empty());

    game.pop_request(Some(RequestTag::Draw));
    assert_eq!(
        *seen.borrow(),
        vec![PlayerId::new(2), PlayerId::new(0), PlayerId::new(1)]
    );
}

/// Events queued with nothing pending fire right away.
#[test]
fn test_event_without_request_is_immediate() {
    let mut game = table(3);
    let count = Rc::new(RefCell::new(0));
    let hits = Rc::clone(&count);
    game.add_listener(CardId::new(900), EventKind::OnTurnEnd, move |_, _| *hits.borrow_mut() += 1);
    game.queue_event(Event::OnTurnEnd { player: PlayerId::new(1) });
    assert_eq!(*count.borrow(), 1);
}

/// Delayed actions run after the requests, front insertions first.
#[test]
fn test_delayed_actions_order() {
    let mut game = table(3);
    let seen = Rc::new(RefCell::new(Vec::new()));

    game.queue_request(Request::new(RequestKind::Draw, PlayerId::new(0)));
    for n in [1, 2] {
        let log = Rc::clone(&seen);
        game.queue_action(move |_| log.borrow_mut().push(n));
    }
    let log = Rc::clone(&seen);
    game.queue_action_front(move |_| log.borrow_mut().push(0));
    assert!(seen.borrow().is_empty());

    game.pop_request(Some(RequestTag::Draw));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
}

/// A delayed action that raises a request stops the drain until it is answered.
#[test]
fn test_delayed_action_waits_for_new_request() {
    let mut game = table(3);
    let seen = Rc::new(RefCell::new(Vec::new()));

    game.queue_request(Request::new(RequestKind::Draw, PlayerId::new(0)));
    let log = Rc::clone(&seen);
    game.queue_action(move |game| {
        log.borrow_mut().push("first");
        game.queue_request(Request::new(RequestKind::Draw, PlayerId::new(1)));
    });
    let log = Rc::clone(&seen);
    game.queue_action(move |_| log.borrow_mut().push("second"));

    game.pop_request(Some(RequestTag::Draw));
    assert_eq!(*seen.borrow(), vec!["first"]);
    assert!(game.top_request_is(RequestTag::Draw, Some(PlayerId::new(1))));

    game.pop_request(Some(RequestTag::Draw));
    assert_eq!(*seen.borrow(), vec!["first", "second"]);
}
