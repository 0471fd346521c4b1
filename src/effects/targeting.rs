//! Target filters and target checks.
//!
//! Each effect slot declares a player filter and (for card targets) a
//! card filter. The checks here read the game and never mutate it; they
//! are shared by the validator and by request pick checks.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardColor;
use crate::core::flags::flag_set;
use crate::core::{CardId, GameError, PlayerId, Result};
use crate::effects::EffectType;
use crate::effects::EquipType;
use crate::piles::Pile;
use crate::rules::{Game, Role};

flag_set! {
    /// Constraints on a targeted player (or on the owner of a targeted card).
    pub struct PlayerFilter {
        /// Target must be dead; without it the target must be alive.
        const DEAD = 0;
        const SELF = 1;
        const NOTSELF = 2;
        const NOTSHERIFF = 3;
        /// Within weapon range.
        const REACHABLE = 4;
        const RANGE_1 = 5;
        const RANGE_2 = 6;
    }
}

flag_set! {
    /// Constraints on a targeted card.
    pub struct CardFilter {
        /// Target must be black; without it the target must not be black.
        const BLACK = 0;
        const TABLE = 1;
        const HAND = 2;
        const BLUE = 3;
        const CLUBS = 4;
        const BANG = 5;
        const MISSED = 6;
        const BEER = 7;
        const BRONCO = 8;
        const CUBE_SLOT = 9;
    }
}

/// One entry of the target list of a play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayTarget {
    None,
    Player(PlayerId),
    Card(CardId),
    OtherPlayers,
    CardsOtherPlayers(SmallVec<[CardId; 8]>),
}

impl PlayTarget {
    /// The slot kind this target can bind to.
    #[must_use]
    pub fn kind(&self) -> super::TargetKind {
        use super::TargetKind;
        match self {
            Self::None => TargetKind::None,
            Self::Player(_) => TargetKind::Player,
            Self::Card(_) => TargetKind::Card,
            Self::OtherPlayers => TargetKind::OtherPlayers,
            Self::CardsOtherPlayers(_) => TargetKind::CardsOtherPlayers,
        }
    }
}

/// Check a targeted player against a slot's player filter.
///
/// `range_bonus` is added to the origin's range modifier; it carries the
/// effect of modifier cards played alongside without touching the player.
pub fn check_player_filter(
    game: &Game,
    origin: PlayerId,
    filter: PlayerFilter,
    target: PlayerId,
    range_bonus: i32,
) -> Result<()> {
    let alive = game.is_alive(target);
    if alive && filter.contains(PlayerFilter::DEAD) {
        return Err(GameError::TargetNotDead);
    }
    if !alive && !filter.contains(PlayerFilter::DEAD) {
        return Err(GameError::TargetDead);
    }

    if filter.contains(PlayerFilter::SELF) && target != origin {
        return Err(GameError::TargetNotSelf);
    }
    if filter.contains(PlayerFilter::NOTSELF) && target == origin {
        return Err(GameError::TargetSelf);
    }
    if filter.contains(PlayerFilter::NOTSHERIFF) && game.player(target).role == Role::Sheriff {
        return Err(GameError::TargetSheriff);
    }

    let player = game.player(origin);
    let range_mod = player.range_mod + range_bonus;
    if filter.contains(PlayerFilter::REACHABLE)
        && (player.weapon_range == 0 || game.distance(origin, target) > player.weapon_range + range_mod)
    {
        return Err(GameError::TargetNotInRange);
    }
    if filter.contains(PlayerFilter::RANGE_1) && game.distance(origin, target) > 1 + range_mod {
        return Err(GameError::TargetNotInRange);
    }
    if filter.contains(PlayerFilter::RANGE_2) && game.distance(origin, target) > 2 + range_mod {
        return Err(GameError::TargetNotInRange);
    }
    Ok(())
}

/// Check a targeted card against a slot's card filter.
pub fn check_card_filter(game: &Game, origin: PlayerId, filter: CardFilter, target: CardId) -> Result<()> {
    let card = game.card(target);
    let data = &card.data;

    if (data.color == CardColor::Black) != filter.contains(CardFilter::BLACK) {
        return Err(if data.color == CardColor::Black {
            GameError::TargetBlack
        } else {
            GameError::TargetNotBlack
        });
    }
    if filter.contains(CardFilter::TABLE) && card.pile != Pile::PlayerTable {
        return Err(GameError::TargetNotTableCard);
    }
    if filter.contains(CardFilter::HAND) && card.pile != Pile::PlayerHand {
        return Err(GameError::TargetNotHandCard);
    }
    if filter.contains(CardFilter::BLUE) && data.color != CardColor::Blue {
        return Err(GameError::TargetNotBlueCard);
    }
    if filter.contains(CardFilter::CLUBS)
        && game.card_sign(origin, target).map(|s| s.suit) != Some(crate::cards::Suit::Clubs)
    {
        return Err(GameError::TargetNotClubs);
    }
    if filter.contains(CardFilter::BANG) && (!game.is_bangcard(origin, target) || !data.equips.is_empty()) {
        return Err(GameError::TargetNotBang);
    }
    if filter.contains(CardFilter::MISSED) && !data.responses_last_is(EffectType::MissedCard) {
        return Err(GameError::TargetNotMissed);
    }
    if filter.contains(CardFilter::BEER) && !data.effects_first_is(EffectType::Beer) {
        return Err(GameError::TargetNotBeer);
    }
    if filter.contains(CardFilter::BRONCO) && !data.equips_last_is(EquipType::Bronco) {
        return Err(GameError::TargetNotBronco);
    }
    if filter.contains(CardFilter::CUBE_SLOT) {
        let is_character = card
            .owner
            .and_then(|owner| game.player(owner).characters.front().copied())
            == Some(target);
        if !is_character && data.color != CardColor::Orange {
            return Err(GameError::TargetNotCubeSlot);
        }
    }
    Ok(())
}
