//! Pending interactive decisions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, EffectFlags, PlayerId};

/// Variant-specific state of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Pick the active character among the two dealt ones.
    CharacterChoice,
    /// Pick the next predraw check to resolve.
    Predraw,
    /// Draw phase: pick the deck.
    Draw,
    /// Pick one of the revealed draw-check cards.
    Check,
    /// Take a card from the general store selection.
    GeneralStore,
    /// Discard `ncards` more cards.
    Discard { ncards: i32 },
    /// Discard down to the hand limit before passing the turn.
    DiscardPass { ndiscarded: i32 },
    /// Discard a Bang or take a hit.
    Indians,
    /// Discard a Bang (the duel passes to `respond_to`) or take a hit.
    Duel { respond_to: PlayerId },
    /// Answer with `strength` Missed-equivalents or take `damage`.
    Bang {
        strength: i32,
        damage: i32,
        unavoidable: bool,
        is_bang_card: bool,
        /// Cards already used to answer (a barrel can only be tried once).
        cards_used: SmallVec<[CardId; 2]>,
    },
    /// Confirm losing `card` to the origin.
    Steal { card: CardId },
    /// Confirm `card` being discarded.
    Destroy { card: CardId },
    /// Last chance: hp dropped to 0 or below.
    Death { draw_attempts: SmallVec<[CardId; 2]> },
    /// Place `ncubes` cubes on the character or orange cards.
    AddCube { ncubes: i32 },
    /// Damage landing once `ticks` run out.
    TimerDamaging { damage: i32, is_bang: bool, ticks: u32 },
}

/// Discriminant of a [`RequestKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestTag {
    CharacterChoice,
    Predraw,
    Draw,
    Check,
    GeneralStore,
    Discard,
    DiscardPass,
    Indians,
    Duel,
    Bang,
    Steal,
    Destroy,
    Death,
    AddCube,
    TimerDamaging,
}

impl RequestKind {
    /// A Bang needing one Missed, dealing one damage.
    #[must_use]
    pub fn bang() -> Self {
        Self::Bang {
            strength: 1,
            damage: 1,
            unavoidable: false,
            is_bang_card: false,
            cards_used: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn tag(&self) -> RequestTag {
        match self {
            Self::CharacterChoice => RequestTag::CharacterChoice,
            Self::Predraw => RequestTag::Predraw,
            Self::Draw => RequestTag::Draw,
            Self::Check => RequestTag::Check,
            Self::GeneralStore => RequestTag::GeneralStore,
            Self::Discard { .. } => RequestTag::Discard,
            Self::DiscardPass { .. } => RequestTag::DiscardPass,
            Self::Indians => RequestTag::Indians,
            Self::Duel { .. } => RequestTag::Duel,
            Self::Bang { .. } => RequestTag::Bang,
            Self::Steal { .. } => RequestTag::Steal,
            Self::Destroy { .. } => RequestTag::Destroy,
            Self::Death { .. } => RequestTag::Death,
            Self::AddCube { .. } => RequestTag::AddCube,
            Self::TimerDamaging { .. } => RequestTag::TimerDamaging,
        }
    }
}

/// A pending decision of `target`.
///
/// ```
/// use bang_engine::core::{CardId, EffectFlags, PlayerId};
/// use bang_engine::requests::{Request, RequestKind, RequestTag};
///
/// let req = Request::new(RequestKind::Indians, PlayerId::new(2))
///     .with_origin(Some(CardId::new(9)), Some(PlayerId::new(0)))
///     .with_flags(EffectFlags::ESCAPABLE);
/// assert_eq!(req.tag(), RequestTag::Indians);
/// assert!(req.flags.contains(EffectFlags::ESCAPABLE));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub origin_card: Option<CardId>,
    /// `None` for requests raised by the game itself.
    pub origin: Option<PlayerId>,
    /// Player who must answer.
    pub target: PlayerId,
    pub flags: EffectFlags,
    pub kind: RequestKind,
}

impl Request {
    #[must_use]
    pub fn new(kind: RequestKind, target: PlayerId) -> Self {
        Self {
            origin_card: None,
            origin: None,
            target,
            flags: EffectFlags::empty(),
            kind,
        }
    }

    /// Set the originating card and player (builder pattern).
    #[must_use]
    pub fn with_origin(mut self, origin_card: Option<CardId>, origin: Option<PlayerId>) -> Self {
        self.origin_card = origin_card;
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: EffectFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn tag(&self) -> RequestTag {
        self.kind.tag()
    }

    #[must_use]
    pub fn is(&self, tag: RequestTag) -> bool {
        self.tag() == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bang_defaults() {
        let RequestKind::Bang { strength, damage, unavoidable, is_bang_card, cards_used } = RequestKind::bang() else {
            panic!("expected a bang");
        };
        assert_eq!((strength, damage), (1, 1));
        assert!(!unavoidable && !is_bang_card);
        assert!(cards_used.is_empty());
    }

    #[test]
    fn test_tags() {
        let req = Request::new(RequestKind::Duel { respond_to: PlayerId(0) }, PlayerId(1));
        assert!(req.is(RequestTag::Duel));
        assert!(!req.is(RequestTag::Bang));
        assert_eq!(RequestKind::AddCube { ncubes: 2 }.tag(), RequestTag::AddCube);
    }

    #[test]
    fn test_serialization() {
        let req = Request::new(RequestKind::Steal { card: CardId(4) }, PlayerId(3))
            .with_origin(Some(CardId(1)), Some(PlayerId(0)));
        let json = serde_json::to_string(&req).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }
}
