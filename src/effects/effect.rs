//! Effect and equip specs.
//!
//! A spec is plain data: a tag selecting one of the compile-time-known
//! behaviours plus the shared fields every behaviour reads (target kind,
//! declared filters, a small integer argument). The behaviour itself is
//! looked up from the tag at dispatch time, see [`super::dispatch`].

use serde::{Deserialize, Serialize};

use super::targeting::{CardFilter, PlayerFilter};

/// What a single effect slot targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    None,
    Player,
    Card,
    /// Every other alive player, implied (no explicit id).
    OtherPlayers,
    /// One card from each other alive player that has any.
    CardsOtherPlayers,
}

/// Behaviour tag of an effect slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Limits activations per turn to `value`.
    MaxUsages,
    /// Self-inflicted damage; `value` is unused.
    Damage,
    Bang,
    /// The Bang card: a Bang subject to the bang modifiers.
    BangCard,
    /// Counts against the one-Bang-per-turn limit.
    BangLimit,
    Missed,
    /// Response marker of Missed cards.
    MissedCard,
    /// Bang used as a Missed while missed-as-bang is active.
    BangResponse,
    Barrel,
    Indians,
    Duel,
    GeneralStore,
    Beer,
    Heal,
    HealNotFull,
    Saloon,
    DeathSave,
    Steal,
    Destroy,
    Draw,
    DrawDiscard,
    DrawToDiscard,
    /// Cancels an escapable request aimed at the player.
    Escape,
    AddGold,
    PayGold,
    /// Pays `value` cubes from the played card itself.
    PayCube,
    /// Puts `value` cubes on the targeted cube slot.
    AddCube,
    /// Marks the optional group as repeatable, at most `value` times (0: unbounded).
    Repeatable,
    /// Collects the target for the card's multi-target handler.
    MthAdd,
}

/// Behaviour tag of an equip entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipType {
    MaxHp,
    Mustang,
    Scope,
    Jail,
    Dynamite,
    Horse,
    Weapon,
    Volcanic,
    Boots,
    HorseCharm,
    Pickaxe,
    Bronco,
    CalamityJanet,
    SlabTheKiller,
    ElGringo,
    SuzyLafayette,
    VultureSam,
    GregDigger,
    GhostTown,
    DeadMan,
    Judge,
    AbandonedMine,
    InvertRotation,
    Hangover,
    Lasso,
}

/// Multi-target handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiTargetType {
    /// Discard two hand cards, then Bang the chosen player.
    DocHolyday,
}

/// One effect slot of a card.
///
/// ```
/// use bang_engine::effects::{EffectSpec, EffectType, PlayerFilter, TargetKind};
///
/// let panic = EffectSpec::card(EffectType::Steal, PlayerFilter::RANGE_1 | PlayerFilter::NOTSELF, Default::default());
/// assert_eq!(panic.target, TargetKind::Card);
/// assert_eq!(panic.value, 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectSpec {
    pub kind: EffectType,
    pub target: TargetKind,
    pub player_filter: PlayerFilter,
    pub card_filter: CardFilter,
    pub value: i32,
}

impl EffectSpec {
    #[must_use]
    pub fn new(kind: EffectType, target: TargetKind) -> Self {
        Self {
            kind,
            target,
            player_filter: PlayerFilter::empty(),
            card_filter: CardFilter::empty(),
            value: 0,
        }
    }

    /// An effect without a target.
    #[must_use]
    pub fn none(kind: EffectType) -> Self {
        Self::new(kind, TargetKind::None)
    }

    /// An effect targeting one player.
    #[must_use]
    pub fn player(kind: EffectType, filter: PlayerFilter) -> Self {
        Self {
            player_filter: filter,
            ..Self::new(kind, TargetKind::Player)
        }
    }

    /// An effect targeting one card; `player_filter` applies to its owner.
    #[must_use]
    pub fn card(kind: EffectType, player_filter: PlayerFilter, card_filter: CardFilter) -> Self {
        Self {
            player_filter,
            card_filter,
            ..Self::new(kind, TargetKind::Card)
        }
    }

    /// Set the integer argument (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn is(&self, kind: EffectType) -> bool {
        self.kind == kind
    }
}

/// One equip entry of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipSpec {
    pub kind: EquipType,
    /// Filter on the player the card gets equipped to.
    pub player_filter: PlayerFilter,
    pub value: i32,
}

impl EquipSpec {
    #[must_use]
    pub fn new(kind: EquipType) -> Self {
        Self {
            kind,
            player_filter: PlayerFilter::empty(),
            value: 0,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    /// Equip onto a player matching `filter` instead of the player itself.
    #[must_use]
    pub fn with_player_filter(mut self, filter: PlayerFilter) -> Self {
        self.player_filter = filter;
        self
    }
}
