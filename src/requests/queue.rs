//! The interactive request queue.
//!
//! Only the front request is live. Code that needs a player's input
//! queues a request and returns; the inbound action that answers it pops
//! the request and the game continues from there.
//!
//! Two side queues hang off the request queue:
//!
//! - the event backlog, holding events fired with
//!   [`Game::queue_event`] while a request was pending;
//! - delayed actions, closures scheduled with [`Game::queue_action`].
//!
//! When the last request is popped the backlog is flushed first, then
//! delayed actions run, each in insertion order, stopping as soon as one
//! of them queues a new request.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::handlers;
use super::request::{Request, RequestKind, RequestTag};
use crate::core::{CardId, PlayerId};
use crate::events::Event;
use crate::piles::Pile;
use crate::rules::{GameUpdate, PickTarget, RequestStatus, UpdateTarget};
use crate::rules::Game;

/// A deferred step of game logic.
pub type DelayedAction = Box<dyn FnOnce(&mut Game)>;

/// Pending requests plus the event backlog and the delayed actions.
#[derive(Default)]
pub struct RequestQueue {
    requests: VecDeque<Request>,
    backlog: VecDeque<Event>,
    delayed: VecDeque<DelayedAction>,

    /// Set while the backlog is being flushed.
    pub(crate) flushing: bool,
    /// Set while delayed actions are running.
    pub(crate) draining: bool,
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("requests", &self.requests)
            .field("backlog", &self.backlog)
            .field("delayed", &self.delayed.len())
            .finish()
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// The live request.
    #[must_use]
    pub fn front(&self) -> Option<&Request> {
        self.requests.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }

    #[must_use]
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    #[must_use]
    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }

    pub(crate) fn push_backlog(&mut self, event: Event) {
        self.backlog.push_back(event);
    }

    pub(crate) fn pop_backlog(&mut self) -> Option<Event> {
        self.backlog.pop_front()
    }

    /// Drop everything; used when the game ends.
    pub(crate) fn clear(&mut self) {
        self.requests.clear();
        self.backlog.clear();
        self.delayed.clear();
    }
}

impl Game {
    // === Requests ===

    /// The live request, if any.
    #[must_use]
    pub fn top_request(&self) -> Option<&Request> {
        self.requests.front()
    }

    pub(crate) fn top_request_mut(&mut self) -> Option<&mut Request> {
        self.requests.requests.front_mut()
    }

    /// True if the live request has the given tag and, when given, target.
    #[must_use]
    pub fn top_request_is(&self, tag: RequestTag, target: Option<PlayerId>) -> bool {
        self.top_request()
            .is_some_and(|req| req.is(tag) && target.map_or(true, |t| req.target == t))
    }

    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Append a request. It becomes live (and is broadcast) if the queue was empty.
    pub fn queue_request(&mut self, request: Request) {
        debug!(kind = ?request.tag(), target = %request.target, "queue request");
        self.requests.requests.push_back(request);
        if self.requests.len() == 1 {
            self.send_request_update();
        }
    }

    /// Put a request in front of the live one. It becomes live immediately.
    pub fn queue_request_front(&mut self, request: Request) {
        debug!(kind = ?request.tag(), target = %request.target, "queue request front");
        self.requests.requests.push_front(request);
        self.send_request_update();
    }

    /// Pop the live request if it has the expected tag (or unconditionally).
    ///
    /// With the queue empty afterwards, the backlog is flushed and delayed
    /// actions run; otherwise the new live request is broadcast.
    pub fn pop_request(&mut self, expected: Option<RequestTag>) -> bool {
        if self.pop_request_noupdate(expected) {
            self.update_requests();
            true
        } else {
            false
        }
    }

    /// Pop the live request without broadcasting or resuming the game.
    pub(crate) fn pop_request_noupdate(&mut self, expected: Option<RequestTag>) -> bool {
        let Some(front) = self.requests.front().cloned() else {
            return false;
        };
        if expected.is_some_and(|tag| !front.is(tag)) {
            return false;
        }
        handlers::on_cleanup(self, &front);
        self.requests.requests.pop_front();
        debug!(kind = ?front.tag(), target = %front.target, "pop request");
        true
    }

    /// Broadcast the live request, or resume the game if there is none.
    pub(crate) fn update_requests(&mut self) {
        if self.requests.is_empty() {
            self.add_update(UpdateTarget::All, GameUpdate::StatusClear);
            self.flush_events();
            self.run_delayed_actions();
        } else {
            self.send_request_update();
        }
    }

    /// Send every player the live request as they see it.
    pub(crate) fn send_request_update(&mut self) {
        let Some(req) = self.requests.front().cloned() else {
            return;
        };
        for viewer in self.players().player_ids().collect::<Vec<_>>() {
            let status = RequestStatus {
                kind: req.tag(),
                origin_card: req.origin_card,
                origin: req.origin,
                target: req.target,
                flags: req.flags,
                text: handlers::status_text(self, &req, viewer),
                respond_ids: self.respond_ids(viewer),
                pick_ids: if viewer == req.target {
                    self.pick_ids(&req)
                } else {
                    Vec::new()
                },
            };
            self.add_update(UpdateTarget::Only(viewer), GameUpdate::RequestStatus(status));
        }
    }

    /// Cards the viewer could answer the live request with.
    fn respond_ids(&self, viewer: PlayerId) -> Vec<CardId> {
        let player = self.player(viewer);
        player
            .hand
            .iter()
            .chain(player.table.iter())
            .chain(player.characters.iter())
            .copied()
            .filter(|&card| self.can_respond_with(viewer, card))
            .collect()
    }

    /// Every pick the target of the live request could make.
    fn pick_ids(&self, req: &Request) -> Vec<PickTarget> {
        let mut candidates = vec![
            PickTarget::pile(Pile::MainDeck),
            PickTarget::pile(Pile::DiscardPile),
        ];
        for card in self.shared_pile(Pile::Selection).iter() {
            candidates.push(PickTarget::card(Pile::Selection, None, *card));
        }
        for (id, player) in self.players().iter() {
            for (pile, list) in [
                (Pile::PlayerHand, &player.hand),
                (Pile::PlayerTable, &player.table),
                (Pile::PlayerCharacter, &player.characters),
            ] {
                for card in list.iter() {
                    candidates.push(PickTarget::card(pile, Some(id), *card));
                }
            }
        }
        candidates.retain(|pick| handlers::can_pick(self, req, pick.pile, pick.player, pick.card));
        candidates
    }

    // === Delayed actions ===

    /// Run `action` once no request is pending, after every action already waiting.
    pub fn queue_action(&mut self, action: impl FnOnce(&mut Game) + 'static) {
        self.requests.delayed.push_back(Box::new(action));
        if self.requests.is_empty() {
            self.run_delayed_actions();
        }
    }

    /// Like [`Game::queue_action`], ahead of the actions already waiting.
    pub fn queue_action_front(&mut self, action: impl FnOnce(&mut Game) + 'static) {
        self.requests.delayed.push_front(Box::new(action));
        if self.requests.is_empty() {
            self.run_delayed_actions();
        }
    }

    /// Run delayed actions in order while no request is pending.
    pub(crate) fn run_delayed_actions(&mut self) {
        if self.requests.draining {
            return;
        }
        self.requests.draining = true;
        while self.requests.is_empty() && !self.is_game_over() {
            let Some(action) = self.requests.delayed.pop_front() else {
                break;
            };
            trace!(remaining = self.requests.delayed.len(), "run delayed action");
            action(self);
        }
        self.requests.draining = false;
    }

    // === Timers ===

    /// Advance the live request's countdown by one tick.
    pub fn tick(&mut self) {
        let finished = match self.top_request_mut() {
            Some(Request {
                kind: RequestKind::TimerDamaging { ticks, .. },
                ..
            }) if *ticks > 0 => {
                *ticks -= 1;
                *ticks == 0
            }
            _ => false,
        };
        if finished {
            handlers::on_timer_finished(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn draw_request(target: u8) -> Request {
        Request::new(RequestKind::Draw, PlayerId(target))
    }

    #[test]
    fn test_only_front_is_live() {
        let mut game = Game::test_game(4);
        game.queue_request(draw_request(0));
        game.queue_request(draw_request(1));
        assert_eq!(game.pending_requests(), 2);
        assert_eq!(game.top_request().map(|r| r.target), Some(PlayerId(0)));

        game.queue_request_front(Request::new(RequestKind::Indians, PlayerId(2)));
        assert!(game.top_request_is(RequestTag::Indians, Some(PlayerId(2))));
    }

    #[test]
    fn test_pop_checks_expected_tag() {
        let mut game = Game::test_game(4);
        game.queue_request(draw_request(0));
        assert!(!game.pop_request(Some(RequestTag::Bang)));
        assert_eq!(game.pending_requests(), 1);
        assert!(game.pop_request(Some(RequestTag::Draw)));
        assert_eq!(game.pending_requests(), 0);
        assert!(!game.pop_request(None));
    }

    #[test]
    fn test_queue_request_broadcasts_once_live() {
        let mut game = Game::test_game(3);
        game.drain_updates();
        game.queue_request(draw_request(0));
        let sent = game
            .drain_updates()
            .into_iter()
            .filter(|u| matches!(u.update, GameUpdate::RequestStatus(_)))
            .count();
        assert_eq!(sent, 3);

        game.queue_request(draw_request(1));
        assert!(game
            .drain_updates()
            .iter()
            .all(|u| !matches!(u.update, GameUpdate::RequestStatus(_))));
    }

    #[test]
    fn test_action_runs_now_without_requests() {
        let mut game = Game::test_game(4);
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        game.queue_action(move |_| *flag.borrow_mut() = true);
        assert!(*ran.borrow());
    }

    #[test]
    fn test_actions_wait_for_requests_in_order() {
        let mut game = Game::test_game(4);
        let log = Rc::new(RefCell::new(Vec::new()));
        game.queue_request(draw_request(0));

        for i in 0..3 {
            let l = Rc::clone(&log);
            game.queue_action(move |_| l.borrow_mut().push(i));
        }
        let l = Rc::clone(&log);
        game.queue_action_front(move |_| l.borrow_mut().push(-1));
        assert!(log.borrow().is_empty());

        game.pop_request(None);
        assert_eq!(*log.borrow(), vec![-1, 0, 1, 2]);
    }

    #[test]
    fn test_action_queueing_request_stops_draining() {
        let mut game = Game::test_game(4);
        let log = Rc::new(RefCell::new(Vec::new()));
        game.queue_request(draw_request(0));

        let l = Rc::clone(&log);
        game.queue_action(move |game| {
            l.borrow_mut().push("first");
            game.queue_request(draw_request(1));
        });
        let l = Rc::clone(&log);
        game.queue_action(move |_| l.borrow_mut().push("second"));

        game.pop_request(None);
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(game.requests.delayed_len(), 1);

        game.pop_request(None);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_timer_counts_down() {
        let mut game = Game::test_game(4);
        game.set_hp(PlayerId(1), 3);
        game.queue_request(Request::new(
            RequestKind::TimerDamaging { damage: 1, is_bang: false, ticks: 2 },
            PlayerId(1),
        ));
        game.tick();
        assert_eq!(game.player(PlayerId(1)).hp, 3);
        assert_eq!(game.pending_requests(), 1);
        game.tick();
        assert_eq!(game.player(PlayerId(1)).hp, 2);
        assert_eq!(game.pending_requests(), 0);
    }
}
