//! Event and modifier payloads.
//!
//! Two kinds of things travel over the bus:
//!
//! - [`Event`]s are notifications ("a card was drawn", "a player took a
//!   hit"). Listeners get `&mut Game` and may change anything.
//! - [`Modifier`]s are value queries ("how many cards may this player
//!   keep?"). Modifier handlers get `&Game` and may only change the
//!   payload, so asking a modifier never changes the game. The validator
//!   relies on this.

use serde::{Deserialize, Serialize};

use crate::cards::CardSign;
use crate::core::{CardId, EffectFlags, PlayerId};

/// A notification fired over the bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    OnDiscardPass {
        player: PlayerId,
        card: CardId,
    },
    OnDrawCheck {
        player: PlayerId,
        card: CardId,
    },
    /// A card is about to be stolen or destroyed.
    OnDiscardCard {
        origin: PlayerId,
        target: PlayerId,
        card: CardId,
    },
    OnHit {
        origin_card: Option<CardId>,
        origin: Option<PlayerId>,
        target: PlayerId,
        damage: i32,
        is_bang: bool,
    },
    OnMissed {
        origin_card: Option<CardId>,
        origin: Option<PlayerId>,
        target: PlayerId,
        is_bang: bool,
    },
    OnPlayerDeath {
        killer: Option<PlayerId>,
        target: PlayerId,
    },
    OnEquip {
        origin: PlayerId,
        target: PlayerId,
        card: CardId,
    },
    OnPlayHandCard {
        player: PlayerId,
        card: CardId,
    },
    PostDiscardCard {
        target: PlayerId,
        card: CardId,
    },
    PostDiscardOrangeCard {
        target: PlayerId,
        card: CardId,
    },
    OnEffectEnd {
        player: PlayerId,
        card: Option<CardId>,
    },
    OnCardDrawn {
        player: PlayerId,
        card: CardId,
    },
    OnPlayBeer {
        player: PlayerId,
    },
    PreTurnStart {
        player: PlayerId,
    },
    OnTurnStart {
        player: PlayerId,
    },
    OnTurnEnd {
        player: PlayerId,
    },
    PostTurnEnd {
        player: PlayerId,
    },
    OnRequestDraw {
        player: PlayerId,
    },
    OnDrawFromDeck {
        player: PlayerId,
    },
    PostDrawCards {
        player: PlayerId,
    },
}

/// Discriminant of an [`Event`], used to register listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    OnDiscardPass,
    OnDrawCheck,
    OnDiscardCard,
    OnHit,
    OnMissed,
    OnPlayerDeath,
    OnEquip,
    OnPlayHandCard,
    PostDiscardCard,
    PostDiscardOrangeCard,
    OnEffectEnd,
    OnCardDrawn,
    OnPlayBeer,
    PreTurnStart,
    OnTurnStart,
    OnTurnEnd,
    PostTurnEnd,
    OnRequestDraw,
    OnDrawFromDeck,
    PostDrawCards,
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::OnDiscardPass { .. } => EventKind::OnDiscardPass,
            Self::OnDrawCheck { .. } => EventKind::OnDrawCheck,
            Self::OnDiscardCard { .. } => EventKind::OnDiscardCard,
            Self::OnHit { .. } => EventKind::OnHit,
            Self::OnMissed { .. } => EventKind::OnMissed,
            Self::OnPlayerDeath { .. } => EventKind::OnPlayerDeath,
            Self::OnEquip { .. } => EventKind::OnEquip,
            Self::OnPlayHandCard { .. } => EventKind::OnPlayHandCard,
            Self::PostDiscardCard { .. } => EventKind::PostDiscardCard,
            Self::PostDiscardOrangeCard { .. } => EventKind::PostDiscardOrangeCard,
            Self::OnEffectEnd { .. } => EventKind::OnEffectEnd,
            Self::OnCardDrawn { .. } => EventKind::OnCardDrawn,
            Self::OnPlayBeer { .. } => EventKind::OnPlayBeer,
            Self::PreTurnStart { .. } => EventKind::PreTurnStart,
            Self::OnTurnStart { .. } => EventKind::OnTurnStart,
            Self::OnTurnEnd { .. } => EventKind::OnTurnEnd,
            Self::PostTurnEnd { .. } => EventKind::PostTurnEnd,
            Self::OnRequestDraw { .. } => EventKind::OnRequestDraw,
            Self::OnDrawFromDeck { .. } => EventKind::OnDrawFromDeck,
            Self::PostDrawCards { .. } => EventKind::PostDrawCards,
        }
    }
}

/// A value query answered by modifier handlers.
///
/// Each variant carries its inputs and the value being computed; handlers
/// adjust the value field in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Hit points healed by a beer.
    Beer { player: PlayerId, amount: i32 },
    /// Hand size allowed at the end of the turn.
    MaxCards { player: PlayerId, count: i32 },
    /// Whether the player may play any number of bangs.
    Volcanic { player: PlayerId, unlimited: bool },
    /// Whether the target ignores the card.
    Immunity {
        origin_card: CardId,
        target: PlayerId,
        immune: bool,
    },
    /// Whether the target may escape the card.
    Escapable {
        origin_card: CardId,
        origin: PlayerId,
        target: PlayerId,
        flags: EffectFlags,
        escapable: bool,
    },
    /// Cards dealt at game start.
    InitialCards { player: PlayerId, count: i32 },
    /// Missed cards needed to cancel a bang played by `origin`.
    Bang { origin: PlayerId, strength: i32 },
    /// The sign a card counts as.
    Sign { card: CardId, sign: Option<CardSign> },
}

/// Discriminant of a [`Modifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    Beer,
    MaxCards,
    Volcanic,
    Immunity,
    Escapable,
    InitialCards,
    Bang,
    Sign,
}

impl Modifier {
    #[must_use]
    pub fn kind(&self) -> ModifierKind {
        match self {
            Self::Beer { .. } => ModifierKind::Beer,
            Self::MaxCards { .. } => ModifierKind::MaxCards,
            Self::Volcanic { .. } => ModifierKind::Volcanic,
            Self::Immunity { .. } => ModifierKind::Immunity,
            Self::Escapable { .. } => ModifierKind::Escapable,
            Self::InitialCards { .. } => ModifierKind::InitialCards,
            Self::Bang { .. } => ModifierKind::Bang,
            Self::Sign { .. } => ModifierKind::Sign,
        }
    }

    /// The integer being computed, for integer-valued modifiers.
    #[must_use]
    pub fn int_value(&self) -> Option<i32> {
        match *self {
            Self::Beer { amount, .. } => Some(amount),
            Self::MaxCards { count, .. } | Self::InitialCards { count, .. } => Some(count),
            Self::Bang { strength, .. } => Some(strength),
            _ => None,
        }
    }

    /// The flag being computed, for boolean modifiers.
    #[must_use]
    pub fn bool_value(&self) -> Option<bool> {
        match *self {
            Self::Volcanic { unlimited, .. } => Some(unlimited),
            Self::Immunity { immune, .. } => Some(immune),
            Self::Escapable { escapable, .. } => Some(escapable),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        let ev = Event::OnHit {
            origin_card: None,
            origin: None,
            target: PlayerId(1),
            damage: 2,
            is_bang: false,
        };
        assert_eq!(ev.kind(), EventKind::OnHit);
        assert_eq!(Event::PostDrawCards { player: PlayerId(0) }.kind(), EventKind::PostDrawCards);
    }

    #[test]
    fn test_modifier_values() {
        let m = Modifier::MaxCards { player: PlayerId(0), count: 4 };
        assert_eq!(m.kind(), ModifierKind::MaxCards);
        assert_eq!(m.int_value(), Some(4));
        assert_eq!(m.bool_value(), None);

        let v = Modifier::Volcanic { player: PlayerId(0), unlimited: true };
        assert_eq!(v.bool_value(), Some(true));
        assert_eq!(v.int_value(), None);
    }
}
