//! Event bus.
//!
//! Card behaviours register handlers under an [`EventKey`] (owning card
//! plus priority). Firing an event runs every handler registered for its
//! kind, highest priority first; handlers with the same priority run in
//! registration order. Removing a card's key drops all of its handlers at
//! once, whatever their kind.
//!
//! Listeners receive `&mut Game`, so they may register or remove handlers
//! and fire further events while a dispatch is running. The bus hands out a
//! snapshot of the matching handlers and the game skips entries removed in
//! the meantime.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::event::{Event, EventKind, Modifier, ModifierKind};
use crate::core::CardId;
use crate::rules::Game;

/// Notification handler.
pub type Listener = Rc<dyn Fn(&mut Game, &Event)>;

/// Value-query handler. Gets the game read-only.
pub type ModifierFn = Rc<dyn Fn(&Game, &mut Modifier)>;

/// Unique identifier of a registered handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub u32);

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler({})", self.0)
    }
}

/// Owner and priority of a handler.
///
/// ```
/// use bang_engine::core::CardId;
/// use bang_engine::events::EventKey;
///
/// let key: EventKey = CardId::new(4).into();
/// assert_eq!(key.priority, 0);
/// assert_eq!(EventKey::new(CardId::new(4), 2).priority, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub card: CardId,
    /// Higher priority handlers run first.
    pub priority: i32,
}

impl EventKey {
    #[must_use]
    pub const fn new(card: CardId, priority: i32) -> Self {
        Self { card, priority }
    }
}

impl From<CardId> for EventKey {
    fn from(card: CardId) -> Self {
        Self::new(card, 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Topic {
    Event(EventKind),
    Modifier(ModifierKind),
}

#[derive(Clone)]
enum Handler {
    Listener(Listener),
    Modifier(ModifierFn),
}

#[derive(Clone)]
struct Entry {
    key: EventKey,
    topic: Topic,
    handler: Handler,
}

/// Registry of event and modifier handlers.
#[derive(Clone, Default)]
pub struct EventBus {
    entries: FxHashMap<HandlerId, Entry>,

    /// Handlers per topic, kept in dispatch order.
    by_topic: FxHashMap<Topic, Vec<HandlerId>>,

    by_card: FxHashMap<CardId, SmallVec<[HandlerId; 4]>>,

    next_id: u32,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.entries.len())
            .field("cards", &self.by_card.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next registered handler will get.
    #[must_use]
    pub fn peek_id(&self) -> HandlerId {
        HandlerId(self.next_id)
    }

    fn insert(&mut self, key: EventKey, topic: Topic, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        // Ids grow monotonically, so inserting after every handler with
        // priority >= ours keeps ties in registration order.
        let list = self.by_topic.entry(topic).or_default();
        let entries = &self.entries;
        let pos = list.partition_point(|other| entries[other].key.priority >= key.priority);
        list.insert(pos, id);

        self.by_card.entry(key.card).or_default().push(id);
        self.entries.insert(id, Entry { key, topic, handler });
        id
    }

    /// Register a notification handler.
    pub fn add_listener(&mut self, key: EventKey, kind: EventKind, listener: Listener) -> HandlerId {
        self.insert(key, Topic::Event(kind), Handler::Listener(listener))
    }

    /// Register a value-query handler.
    pub fn add_modifier(&mut self, key: EventKey, kind: ModifierKind, modifier: ModifierFn) -> HandlerId {
        self.insert(key, Topic::Modifier(kind), Handler::Modifier(modifier))
    }

    /// Remove a single handler.
    pub fn remove(&mut self, id: HandlerId) {
        let Some(entry) = self.entries.remove(&id) else {
            return;
        };
        if let Some(list) = self.by_topic.get_mut(&entry.topic) {
            list.retain(|&other| other != id);
            if list.is_empty() {
                self.by_topic.remove(&entry.topic);
            }
        }
        if let Some(list) = self.by_card.get_mut(&entry.key.card) {
            list.retain(|&mut other| other != id);
            if list.is_empty() {
                self.by_card.remove(&entry.key.card);
            }
        }
    }

    /// Remove every handler owned by a card, whatever its priority.
    pub fn remove_card(&mut self, card: CardId) {
        let Some(ids) = self.by_card.remove(&card) else {
            return;
        };
        for id in ids {
            if let Some(entry) = self.entries.remove(&id) {
                if let Some(list) = self.by_topic.get_mut(&entry.topic) {
                    list.retain(|&other| other != id);
                    if list.is_empty() {
                        self.by_topic.remove(&entry.topic);
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: HandlerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// True if the card owns at least one handler.
    #[must_use]
    pub fn has_card(&self, card: CardId) -> bool {
        self.by_card.contains_key(&card)
    }

    /// Snapshot of the listeners for an event kind, in dispatch order.
    #[must_use]
    pub fn listeners(&self, kind: EventKind) -> SmallVec<[(HandlerId, Listener); 8]> {
        self.by_topic
            .get(&Topic::Event(kind))
            .into_iter()
            .flatten()
            .filter_map(|id| match &self.entries[id].handler {
                Handler::Listener(listener) => Some((*id, Rc::clone(listener))),
                Handler::Modifier(_) => None,
            })
            .collect()
    }

    /// Modifier handlers for a kind, in dispatch order.
    pub fn modifiers(&self, kind: ModifierKind) -> impl Iterator<Item = &ModifierFn> + '_ {
        self.by_topic
            .get(&Topic::Modifier(kind))
            .into_iter()
            .flatten()
            .filter_map(|id| match &self.entries[id].handler {
                Handler::Modifier(modifier) => Some(modifier),
                Handler::Listener(_) => None,
            })
    }

    /// Total number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Game {
    /// Register a listener for an event kind.
    pub fn add_listener(
        &mut self,
        key: impl Into<EventKey>,
        kind: EventKind,
        listener: impl Fn(&mut Game, &Event) + 'static,
    ) -> HandlerId {
        self.bus.add_listener(key.into(), kind, Rc::new(listener))
    }

    /// Register a listener that removes itself the first time it returns `true`.
    pub fn add_single_call_listener(
        &mut self,
        key: impl Into<EventKey>,
        kind: EventKind,
        listener: impl Fn(&mut Game, &Event) -> bool + 'static,
    ) -> HandlerId {
        let id = self.bus.peek_id();
        self.bus.add_listener(
            key.into(),
            kind,
            Rc::new(move |game: &mut Game, event: &Event| {
                if listener(game, event) {
                    game.bus.remove(id);
                }
            }),
        )
    }

    /// Register a modifier handler.
    pub fn add_modifier(
        &mut self,
        key: impl Into<EventKey>,
        kind: ModifierKind,
        modifier: impl Fn(&Game, &mut Modifier) + 'static,
    ) -> HandlerId {
        self.bus.add_modifier(key.into(), kind, Rc::new(modifier))
    }

    /// Drop every handler owned by a card.
    pub fn remove_events(&mut self, card: CardId) {
        self.bus.remove_card(card);
    }

    /// Fire an event now, whatever the state of the request queue.
    pub fn call_event(&mut self, event: Event) {
        trace!(?event, "call event");
        for (id, listener) in self.bus.listeners(event.kind()) {
            if self.bus.contains(id) {
                listener(self, &event);
            }
        }
    }

    /// Fire an event once no request is pending.
    ///
    /// With an empty request queue the event fires now (after anything
    /// already waiting in the backlog); otherwise it waits in the backlog,
    /// which is flushed in order when the queue empties.
    pub fn queue_event(&mut self, event: Event) {
        self.requests.push_backlog(event);
        if self.requests.is_empty() {
            self.flush_events();
        }
    }

    /// Fire backlogged events in insertion order until a request gets queued.
    ///
    /// Re-entrant calls return immediately: events queued by a handler
    /// while flushing join the end of the backlog.
    pub(crate) fn flush_events(&mut self) {
        if self.requests.flushing {
            return;
        }
        self.requests.flushing = true;
        while self.requests.is_empty() {
            let Some(event) = self.requests.pop_backlog() else {
                break;
            };
            self.call_event(event);
        }
        self.requests.flushing = false;
    }

    /// Ask every modifier handler for its adjustment of a value.
    #[must_use]
    pub fn apply_modifier(&self, mut modifier: Modifier) -> Modifier {
        for handler in self.bus.modifiers(modifier.kind()) {
            handler(self, &mut modifier);
        }
        modifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use std::cell::RefCell;

    fn noop() -> Listener {
        Rc::new(|_: &mut Game, _: &Event| {})
    }

    #[test]
    fn test_priority_then_registration_order() {
        let mut bus = EventBus::new();
        let a = bus.add_listener(EventKey::new(CardId(1), 0), EventKind::OnHit, noop());
        let b = bus.add_listener(EventKey::new(CardId(2), 2), EventKind::OnHit, noop());
        let c = bus.add_listener(EventKey::new(CardId(3), 0), EventKind::OnHit, noop());
        let d = bus.add_listener(EventKey::new(CardId(4), 1), EventKind::OnHit, noop());

        let order: Vec<_> = bus.listeners(EventKind::OnHit).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![b, d, a, c]);
    }

    #[test]
    fn test_kinds_are_separate() {
        let mut bus = EventBus::new();
        bus.add_listener(CardId(1).into(), EventKind::OnHit, noop());
        bus.add_modifier(
            CardId(1).into(),
            ModifierKind::MaxCards,
            Rc::new(|_: &Game, _: &mut Modifier| {}),
        );
        assert_eq!(bus.listeners(EventKind::OnHit).len(), 1);
        assert!(bus.listeners(EventKind::OnMissed).is_empty());
        assert_eq!(bus.modifiers(ModifierKind::MaxCards).count(), 1);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn test_remove_card_drops_all_kinds_and_priorities() {
        let mut bus = EventBus::new();
        bus.add_listener(EventKey::new(CardId(7), 0), EventKind::OnHit, noop());
        bus.add_listener(EventKey::new(CardId(7), 3), EventKind::OnTurnStart, noop());
        let other = bus.add_listener(CardId(8).into(), EventKind::OnHit, noop());

        bus.remove_card(CardId(7));
        assert!(!bus.has_card(CardId(7)));
        assert_eq!(bus.len(), 1);
        assert!(bus.contains(other));
        assert!(bus.listeners(EventKind::OnTurnStart).is_empty());
    }

    #[test]
    fn test_snapshot_survives_removal() {
        let mut bus = EventBus::new();
        let id = bus.add_listener(CardId(1).into(), EventKind::OnHit, noop());
        let snapshot = bus.listeners(EventKind::OnHit);
        bus.remove(id);
        assert_eq!(snapshot.len(), 1);
        assert!(!bus.contains(snapshot[0].0));
    }

    #[test]
    fn test_peek_id_matches_next_registration() {
        let mut bus = EventBus::new();
        let peeked = bus.peek_id();
        let id = bus.add_listener(CardId(1).into(), EventKind::OnHit, noop());
        assert_eq!(peeked, id);
    }

    #[test]
    fn test_single_call_listener_removes_itself() {
        let mut game = Game::test_game(4);
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        game.add_single_call_listener(CardId(1), EventKind::OnTurnEnd, move |_, _| {
            *counter.borrow_mut() += 1;
            *counter.borrow() >= 2
        });

        for _ in 0..4 {
            game.call_event(Event::OnTurnEnd { player: PlayerId(0) });
        }
        assert_eq!(*calls.borrow(), 2);
        assert!(!game.bus.has_card(CardId(1)));
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let mut game = Game::test_game(4);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        game.add_listener(EventKey::new(CardId(1), 1), EventKind::OnTurnEnd, move |game, _| {
            l.borrow_mut().push(1);
            game.remove_events(CardId(2));
        });
        let l = Rc::clone(&log);
        game.add_listener(CardId(2), EventKind::OnTurnEnd, move |_, _| l.borrow_mut().push(2));

        game.call_event(Event::OnTurnEnd { player: PlayerId(0) });
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn test_apply_modifier_chains_handlers() {
        let mut game = Game::test_game(4);
        game.add_modifier(EventKey::new(CardId(1), 1), ModifierKind::MaxCards, |_, m| {
            if let Modifier::MaxCards { count, .. } = m {
                *count += 2;
            }
        });
        game.add_modifier(CardId(2), ModifierKind::MaxCards, |_, m| {
            if let Modifier::MaxCards { count, .. } = m {
                *count *= 10;
            }
        });
        let result = game.apply_modifier(Modifier::MaxCards { player: PlayerId(0), count: 1 });
        assert_eq!(result.int_value(), Some(30));
    }
}
