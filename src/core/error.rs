//! Rule violations.
//!
//! Every way an inbound action can be illegal is a `GameError` variant.
//! Errors are raised before anything is mutated, so a caller that gets an
//! `Err` can drop the attempt: the game is exactly as it was.
//!
//! Each variant maps to a localization key and a list of typed arguments
//! ([`GameError::key`], [`GameError::args`]). Broken internal invariants
//! are not represented here; they panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::CardId;
use super::format::{FormatArg, FormatArgs, FormattedString};

#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("invalid action")]
    InvalidAction,

    #[error("unknown card {0}")]
    UnknownCard(CardId),

    #[error("the game is over")]
    GameOver,

    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("a request is waiting for an answer")]
    RequestPending,

    #[error("the player must draw first")]
    MustDraw,

    #[error("{0} is disabled")]
    CardDisabled(CardId),

    #[error("{0} is inactive")]
    CardInactive(CardId),

    #[error("{0} must be played first")]
    MandatoryCard(CardId),

    #[error("{0} must be played")]
    ForcedCard(CardId),

    #[error("{0} cannot be played now")]
    CantPlayCard(CardId),

    #[error("{0} cannot be used as a modifier here")]
    InvalidModifier(CardId),

    #[error("target list does not match the card")]
    InvalidTargets,

    #[error("targets must be distinct")]
    TargetsNotDistinct,

    #[error("target is dead")]
    TargetDead,

    #[error("target is not dead")]
    TargetNotDead,

    #[error("cannot target yourself")]
    TargetSelf,

    #[error("must target yourself")]
    TargetNotSelf,

    #[error("cannot target the sheriff")]
    TargetSheriff,

    #[error("target is out of range")]
    TargetNotInRange,

    #[error("target card is black")]
    TargetBlack,

    #[error("target card is not black")]
    TargetNotBlack,

    #[error("target card is not on a table")]
    TargetNotTableCard,

    #[error("target card is not in a hand")]
    TargetNotHandCard,

    #[error("target card is not blue")]
    TargetNotBlueCard,

    #[error("target card is not clubs")]
    TargetNotClubs,

    #[error("target card is not a bang")]
    TargetNotBang,

    #[error("target card is not a missed")]
    TargetNotMissed,

    #[error("target card is not a beer")]
    TargetNotBeer,

    #[error("target card is not a bronco")]
    TargetNotBronco,

    #[error("target card cannot hold cubes")]
    TargetNotCubeSlot,

    #[error("cards cannot be equipped")]
    CantEquipCards,

    #[error("{0} is already equipped")]
    DuplicatedCard(CardId),

    #[error("not enough cubes")]
    NotEnoughCubes,

    #[error("not enough gold")]
    NotEnoughGold,

    #[error("cannot pay to discard an own black card")]
    CantDiscardOwnBlack,

    #[error("{card} already used {max} times")]
    MaxUsages { card: CardId, max: i32 },

    #[error("only one bang per turn")]
    OneBangPerTurn,

    #[error("cannot damage yourself below 1 hp")]
    CantSelfDamage,

    #[error("cannot heal past full hp")]
    CantHealPastFullHp,

    #[error("discard pile is empty")]
    DiscardPileEmpty,
}

impl GameError {
    /// Localization key of this error.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::InvalidAction => "ERROR_INVALID_ACTION",
            Self::UnknownCard(_) => "ERROR_INVALID_CARD",
            Self::GameOver => "ERROR_GAME_OVER",
            Self::NotYourTurn => "ERROR_PLAYER_NOT_IN_TURN",
            Self::RequestPending => "ERROR_PLAYER_MUST_RESPOND",
            Self::MustDraw => "ERROR_PLAYER_MUST_DRAW",
            Self::CardDisabled(_) => "ERROR_CARD_DISABLED",
            Self::CardInactive(_) => "ERROR_CARD_INACTIVE",
            Self::MandatoryCard(_) => "ERROR_MANDATORY_CARD",
            Self::ForcedCard(_) => "ERROR_FORCED_CARD",
            Self::CantPlayCard(_) => "ERROR_CANT_PLAY_CARD",
            Self::InvalidModifier(_) => "ERROR_INVALID_MODIFIER_CARD",
            Self::InvalidTargets => "ERROR_INVALID_TARGETS",
            Self::TargetsNotDistinct => "ERROR_TARGETS_NOT_DISTINCT",
            Self::TargetDead => "ERROR_TARGET_DEAD",
            Self::TargetNotDead => "ERROR_TARGET_NOT_DEAD",
            Self::TargetSelf => "ERROR_TARGET_SELF",
            Self::TargetNotSelf => "ERROR_TARGET_NOT_SELF",
            Self::TargetSheriff => "ERROR_TARGET_SHERIFF",
            Self::TargetNotInRange => "ERROR_TARGET_NOT_IN_RANGE",
            Self::TargetBlack => "ERROR_TARGET_BLACK",
            Self::TargetNotBlack => "ERROR_TARGET_NOT_BLACK",
            Self::TargetNotTableCard => "ERROR_TARGET_NOT_TABLE_CARD",
            Self::TargetNotHandCard => "ERROR_TARGET_NOT_HAND_CARD",
            Self::TargetNotBlueCard => "ERROR_TARGET_NOT_BLUE_CARD",
            Self::TargetNotClubs => "ERROR_TARGET_NOT_CLUBS",
            Self::TargetNotBang => "ERROR_TARGET_NOT_BANG",
            Self::TargetNotMissed => "ERROR_TARGET_NOT_MISSED",
            Self::TargetNotBeer => "ERROR_TARGET_NOT_BEER",
            Self::TargetNotBronco => "ERROR_TARGET_NOT_BRONCO",
            Self::TargetNotCubeSlot => "ERROR_TARGET_NOT_CUBE_SLOT",
            Self::CantEquipCards => "ERROR_CANT_EQUIP_CARDS",
            Self::DuplicatedCard(_) => "ERROR_DUPLICATED_CARD",
            Self::NotEnoughCubes => "ERROR_NOT_ENOUGH_CUBES",
            Self::NotEnoughGold => "ERROR_NOT_ENOUGH_GOLD",
            Self::CantDiscardOwnBlack => "ERROR_CANT_DISCARD_OWN_BLACK",
            Self::MaxUsages { .. } => "ERROR_MAX_USAGES",
            Self::OneBangPerTurn => "ERROR_ONE_BANG_PER_TURN",
            Self::CantSelfDamage => "ERROR_CANT_SELF_DAMAGE",
            Self::CantHealPastFullHp => "ERROR_CANT_HEAL_PAST_FULL_HP",
            Self::DiscardPileEmpty => "ERROR_DISCARD_PILE_EMPTY",
        }
    }

    /// Typed arguments of this error, in message order.
    #[must_use]
    pub fn args(&self) -> FormatArgs {
        let mut args = FormatArgs::new();
        match self {
            Self::UnknownCard(card)
            | Self::CardDisabled(card)
            | Self::CardInactive(card)
            | Self::MandatoryCard(card)
            | Self::ForcedCard(card)
            | Self::CantPlayCard(card)
            | Self::InvalidModifier(card)
            | Self::DuplicatedCard(card) => args.push(FormatArg::Card(*card)),
            Self::MaxUsages { card, max } => {
                args.push(FormatArg::Card(*card));
                args.push(FormatArg::Int(*max));
            }
            _ => {}
        }
        args
    }

    /// The error as a localizable message.
    #[must_use]
    pub fn to_formatted(&self) -> FormattedString {
        FormattedString {
            key: self.key().to_owned(),
            args: self.args(),
        }
    }
}

/// Result type for fallible game operations.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_args() {
        let err = GameError::MaxUsages { card: CardId(12), max: 1 };
        assert_eq!(err.key(), "ERROR_MAX_USAGES");
        assert_eq!(
            err.args().as_slice(),
            &[FormatArg::Card(CardId(12)), FormatArg::Int(1)]
        );
    }

    #[test]
    fn test_args_empty_for_plain_errors() {
        assert!(GameError::TargetNotInRange.args().is_empty());
        assert_eq!(GameError::TargetNotInRange.key(), "ERROR_TARGET_NOT_IN_RANGE");
    }

    #[test]
    fn test_display_and_formatted() {
        let err = GameError::DuplicatedCard(CardId(3));
        assert_eq!(err.to_string(), "Card(3) is already equipped");
        let formatted = err.to_formatted();
        assert_eq!(formatted.key, "ERROR_DUPLICATED_CARD");
        assert_eq!(formatted.args.len(), 1);
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner(fail: bool) -> Result<i32> {
            if fail {
                return Err(GameError::NotEnoughGold);
            }
            Ok(1)
        }
        fn outer(fail: bool) -> Result<i32> {
            let v = inner(fail)?;
            Ok(v + 1)
        }
        assert_eq!(outer(false), Ok(2));
        assert_eq!(outer(true), Err(GameError::NotEnoughGold));
    }
}
