//! Card data - the static description of a card.
//!
//! `CardData` is what the card-data loader hands to the engine: name,
//! sign, colour and the ordered effect/response/optional/equip lists.
//! The engine treats it as validated input and never parses text.
//!
//! Runtime state (pile, owner, usages, cubes) lives in [`Card`](super::Card).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::sign::{CardSign, Rank, Suit};
use crate::core::Expansions;
use crate::effects::{EffectSpec, EffectType, EquipSpec, EquipType, MultiTargetType};

/// Colour class of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardColor {
    /// Characters, scenario cards and other non-deck cards.
    None,
    /// Single use: played from hand, goes to the discard pile.
    Brown,
    /// Permanent equip.
    Blue,
    /// Equip that can be activated from the table once it has untapped.
    Green,
    /// Shop equip; discarded to the shop discard pile.
    Black,
    /// Equip that arrives with cubes and leaves when they run out.
    Orange,
}

/// Role of a card played together with a main card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardModifier {
    #[default]
    None,
    /// Only valid together with a Bang card.
    BangMod,
    /// Lowers the price of a shop card by one.
    Discount,
    /// The main card ignores distance for this play.
    Belltower,
    /// One more Bang this turn.
    Bandolier,
}

pub type EffectList = SmallVec<[EffectSpec; 3]>;
pub type EquipList = SmallVec<[EquipSpec; 2]>;

/// Static card description.
///
/// ## Example
///
/// ```
/// use bang_engine::cards::{CardColor, CardData, Rank, Suit};
/// use bang_engine::effects::{EffectSpec, EffectType, PlayerFilter};
///
/// let beer = CardData::new("Beer", CardColor::Brown)
///     .with_sign(Suit::Hearts, Rank::Six)
///     .with_effect(EffectSpec::player(EffectType::Beer, PlayerFilter::SELF));
///
/// assert!(beer.effects_first_is(EffectType::Beer));
/// assert!(beer.responses.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,

    /// Absent for cards that are never drawn (characters, scenarios).
    pub sign: Option<CardSign>,

    pub color: CardColor,

    /// Effects played on the card's turn, one per target slot.
    pub effects: EffectList,

    /// Effects played while answering a request.
    pub responses: EffectList,

    /// Trailing optional target slots. A final `Repeatable` entry makes
    /// the whole optional group repeatable.
    pub optionals: EffectList,

    pub equips: EquipList,

    /// Handler verifying and playing the collected `MthAdd` targets.
    pub multi_target: Option<MultiTargetType>,

    pub modifier: CardModifier,

    /// Price in gold when bought from the shop.
    pub buy_cost: i32,

    /// Expansion the card belongs to; empty for the base game.
    pub expansion: Expansions,
}

impl CardData {
    /// Create a card with no effects.
    #[must_use]
    pub fn new(name: impl Into<String>, color: CardColor) -> Self {
        Self {
            name: name.into(),
            sign: None,
            color,
            effects: EffectList::new(),
            responses: EffectList::new(),
            optionals: EffectList::new(),
            equips: EquipList::new(),
            multi_target: None,
            modifier: CardModifier::None,
            buy_cost: 0,
            expansion: Expansions::empty(),
        }
    }

    /// Set the sign (builder pattern).
    #[must_use]
    pub fn with_sign(mut self, suit: Suit, rank: Rank) -> Self {
        self.sign = Some(CardSign::new(suit, rank));
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_response(mut self, effect: EffectSpec) -> Self {
        self.responses.push(effect);
        self
    }

    #[must_use]
    pub fn with_optional(mut self, effect: EffectSpec) -> Self {
        self.optionals.push(effect);
        self
    }

    #[must_use]
    pub fn with_equip(mut self, equip: EquipSpec) -> Self {
        self.equips.push(equip);
        self
    }

    #[must_use]
    pub fn with_multi_target(mut self, handler: MultiTargetType) -> Self {
        self.multi_target = Some(handler);
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: CardModifier) -> Self {
        self.modifier = modifier;
        self
    }

    #[must_use]
    pub fn with_buy_cost(mut self, cost: i32) -> Self {
        self.buy_cost = cost;
        self
    }

    #[must_use]
    pub fn with_expansion(mut self, expansion: Expansions) -> Self {
        self.expansion = expansion;
        self
    }

    #[must_use]
    pub fn effects_first_is(&self, kind: EffectType) -> bool {
        self.effects.first().is_some_and(|e| e.kind == kind)
    }

    #[must_use]
    pub fn effects_last_is(&self, kind: EffectType) -> bool {
        self.effects.last().is_some_and(|e| e.kind == kind)
    }

    #[must_use]
    pub fn responses_last_is(&self, kind: EffectType) -> bool {
        self.responses.last().is_some_and(|e| e.kind == kind)
    }

    #[must_use]
    pub fn optionals_last_is(&self, kind: EffectType) -> bool {
        self.optionals.last().is_some_and(|e| e.kind == kind)
    }

    #[must_use]
    pub fn equips_first_is(&self, kind: EquipType) -> bool {
        self.equips.first().is_some_and(|e| e.kind == kind)
    }

    #[must_use]
    pub fn equips_last_is(&self, kind: EquipType) -> bool {
        self.equips.last().is_some_and(|e| e.kind == kind)
    }

    #[must_use]
    pub fn has_effect(&self, kind: EffectType) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    #[must_use]
    pub fn is_weapon(&self) -> bool {
        self.equips.iter().any(|e| e.kind == EquipType::Weapon)
    }

    /// Effect list used for a play: responses when answering a request.
    #[must_use]
    pub fn play_effects(&self, is_response: bool) -> &EffectList {
        if is_response {
            &self.responses
        } else {
            &self.effects
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{PlayerFilter, TargetKind};

    #[test]
    fn test_builder_orders_slots() {
        let card = CardData::new("Bang!", CardColor::Brown)
            .with_sign(Suit::Spades, Rank::Ace)
            .with_effect(EffectSpec::none(EffectType::BangLimit))
            .with_effect(EffectSpec::player(
                EffectType::BangCard,
                PlayerFilter::REACHABLE | PlayerFilter::NOTSELF,
            ))
            .with_response(EffectSpec::none(EffectType::BangResponse));

        assert!(card.effects_first_is(EffectType::BangLimit));
        assert!(card.effects_last_is(EffectType::BangCard));
        assert!(card.responses_last_is(EffectType::BangResponse));
        assert_eq!(card.effects[1].target, TargetKind::Player);
        assert_eq!(card.sign.map(|s| s.suit), Some(Suit::Spades));
    }

    #[test]
    fn test_weapon_and_equips() {
        let card = CardData::new("Schofield", CardColor::Blue)
            .with_equip(EquipSpec::new(EquipType::Weapon).with_value(2));
        assert!(card.is_weapon());
        assert!(card.equips_first_is(EquipType::Weapon));
        assert!(card.play_effects(false).is_empty());
    }
}
