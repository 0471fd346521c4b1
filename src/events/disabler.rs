//! Disabler registry.
//!
//! A disabler is a predicate over cards, keyed by the card that installed
//! it. While any predicate matches an equipped card, that card's equips
//! are switched off: its handlers are unregistered through the equips'
//! unequip hooks, but the card stays where it is. Lifting the last
//! matching disabler runs the equip hooks again.

use std::rc::Rc;

use tracing::debug;

use crate::cards::Card;
use crate::core::{CardId, PlayerId};
use crate::rules::Game;

/// Predicate selecting the cards a disabler switches off.
pub type DisablerFn = Rc<dyn Fn(&Card) -> bool>;

/// Active disablers in installation order.
#[derive(Clone, Default)]
pub struct DisablerRegistry {
    entries: Vec<(CardId, DisablerFn)>,
}

impl std::fmt::Debug for DisablerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(key, _)| key)).finish()
    }
}

impl DisablerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: CardId, disabler: DisablerFn) {
        self.entries.push((key, disabler));
    }

    /// Remove every disabler installed under `key`.
    pub fn remove(&mut self, key: CardId) {
        self.entries.retain(|(other, _)| *other != key);
    }

    #[must_use]
    pub fn contains(&self, key: CardId) -> bool {
        self.entries.iter().any(|(other, _)| *other == key)
    }

    /// True if any disabler matches the card.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        self.entries.iter().any(|(_, disabler)| disabler(card))
    }

    /// True if a disabler installed under a key other than `key` matches.
    #[must_use]
    pub fn matches_except(&self, key: CardId, card: &Card) -> bool {
        self.entries
            .iter()
            .any(|(other, disabler)| *other != key && disabler(card))
    }

    /// True if a disabler installed under `key` matches.
    #[must_use]
    pub fn matches_key(&self, key: CardId, card: &Card) -> bool {
        self.entries
            .iter()
            .any(|(other, disabler)| *other == key && disabler(card))
    }

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
    /// True if any active disabler matches the card.
    #[must_use]
    pub fn is_disabled(&self, card: CardId) -> bool {
        self.disablers.matches(self.card(card))
    }

    /// Cards whose equips are live: every table and character card.
    fn equipped_cards(&self) -> Vec<CardId> {
        self.players()
            .values()
            .flat_map(|p| p.table.iter().chain(p.characters.iter()).copied())
            .collect()
    }

    /// Install a disabler.
    ///
    /// Equipped cards that were enabled and match the predicate get their
    /// equips switched off before the disabler is stored.
    pub fn add_disabler(&mut self, key: CardId, disabler: impl Fn(&Card) -> bool + 'static) {
        let disabler: DisablerFn = Rc::new(disabler);
        let targets: Vec<CardId> = self
            .equipped_cards()
            .into_iter()
            .filter(|&card| {
                let c = self.card(card);
                !self.disablers.matches(c) && disabler(c)
            })
            .collect();

        debug!(%key, disabled = targets.len(), "add disabler");
        for card in targets {
            self.unequip_card_effects(card);
        }
        self.disablers.insert(key, disabler);
    }

    /// Lift every disabler installed under `key`.
    ///
    /// Equipped cards matched by this key and by no other disabler get
    /// their equips switched back on.
    pub fn remove_disablers(&mut self, key: CardId) {
        if !self.disablers.contains(key) {
            return;
        }
        let targets: Vec<CardId> = self
            .equipped_cards()
            .into_iter()
            .filter(|&card| {
                let c = self.card(card);
                self.disablers.matches_key(key, c) && !self.disablers.matches_except(key, c)
            })
            .collect();

        debug!(%key, enabled = targets.len(), "remove disabler");
        for card in targets {
            self.equip_card_effects(card);
        }
        self.disablers.remove(key);
    }

    /// Run the equip hooks of a card on its current owner.
    pub(crate) fn equip_card_effects(&mut self, card: CardId) {
        let Some(owner) = self.card(card).owner else {
            return;
        };
        let equips = self.card(card).data.equips.clone();
        for spec in equips {
            spec.kind.behavior().on_equip(self, card, owner, &spec);
        }
    }

    /// Run the unequip hooks of a card on its current owner.
    pub(crate) fn unequip_card_effects(&mut self, card: CardId) {
        if let Some(owner) = self.card(card).owner {
            self.unequip_card_effects_of(card, owner);
        }
    }

    /// Run the unequip hooks of a card on `owner`, for cards that already left them.
    pub(crate) fn unequip_card_effects_of(&mut self, card: CardId, owner: PlayerId) {
        let equips = self.card(card).data.equips.clone();
        for spec in equips {
            spec.kind.behavior().on_unequip(self, card, owner, &spec);
        }
    }

    /// Run the equip hooks unless the card is disabled.
    pub(crate) fn equip_if_enabled(&mut self, card: CardId) {
        if !self.is_disabled(card) {
            self.equip_card_effects(card);
        }
    }

    /// Run the unequip hooks unless the card is disabled.
    pub(crate) fn unequip_if_enabled(&mut self, card: CardId) {
        if !self.is_disabled(card) {
            self.unequip_card_effects(card);
        }
    }
}
