//! Capability traits and tag dispatch.
//!
//! Every [`EffectType`], [`EquipType`] and [`MultiTargetType`] tag maps to
//! a unit-struct behaviour implementing only the hooks it needs. The
//! query hooks (`verify*`, `can_respond`, `prompt*`) default to "no
//! constraint", "cannot respond" and "no warning". The mutating hooks
//! default to a panic: reaching one means a card declared an effect in a
//! shape its behaviour does not support, which is a bug in the card data.

use crate::core::{CardId, EffectFlags, FormattedString, PlayerId, Result};
use crate::rules::Game;

use super::behaviors::*;
use super::effect::{EffectSpec, EffectType, EquipSpec, EquipType, MultiTargetType};
use super::equips::*;
use super::multi_target::DocHolydayHandler;
use super::targeting::PlayTarget;

/// Who is playing what, plus the adjustments of the modifier cards
/// played alongside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub origin_card: CardId,
    pub origin: PlayerId,
    pub flags: EffectFlags,
    /// Added to the origin's range for this play only.
    pub range_bonus: i32,
    /// Bangs allowed this turn on top of the player's own limit.
    pub extra_bangs: i32,
}

impl EffectContext {
    #[must_use]
    pub fn new(origin_card: CardId, origin: PlayerId) -> Self {
        Self {
            origin_card,
            origin,
            flags: EffectFlags::empty(),
            range_bonus: 0,
            extra_bangs: 0,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: EffectFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[track_caller]
fn missing_hook(behavior: &str, hook: &str) -> ! {
    panic!("{} does not implement {}", behavior, hook)
}

/// Hooks of an effect slot, one set per target shape.
pub trait EffectBehavior {
    fn verify(&self, _game: &Game, _ctx: &EffectContext, _spec: &EffectSpec) -> Result<()> {
        Ok(())
    }

    fn verify_player(&self, _game: &Game, _ctx: &EffectContext, _spec: &EffectSpec, _target: PlayerId) -> Result<()> {
        Ok(())
    }

    fn verify_card(
        &self,
        _game: &Game,
        _ctx: &EffectContext,
        _spec: &EffectSpec,
        _target: PlayerId,
        _card: CardId,
    ) -> Result<()> {
        Ok(())
    }

    /// True if `card` can answer the live request for `origin`.
    fn can_respond(&self, _game: &Game, _card: CardId, _origin: PlayerId) -> bool {
        false
    }

    /// Warning shown before the play is carried out.
    fn prompt(&self, _game: &Game, _ctx: &EffectContext, _spec: &EffectSpec) -> Option<FormattedString> {
        None
    }

    fn prompt_player(
        &self,
        _game: &Game,
        _ctx: &EffectContext,
        _spec: &EffectSpec,
        _target: PlayerId,
    ) -> Option<FormattedString> {
        None
    }

    fn on_play(&self, _game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec) {
        missing_hook(std::any::type_name::<Self>(), "on_play")
    }

    fn on_play_player(&self, _game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec, _target: PlayerId) {
        missing_hook(std::any::type_name::<Self>(), "on_play_player")
    }

    fn on_play_card(
        &self,
        _game: &mut Game,
        _ctx: &EffectContext,
        _spec: &EffectSpec,
        _target: PlayerId,
        _card: CardId,
    ) {
        missing_hook(std::any::type_name::<Self>(), "on_play_card")
    }
}

/// Hooks of an equip entry.
pub trait EquipBehavior {
    /// Runs before the card lands on the table.
    fn on_pre_equip(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {}

    fn on_equip(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        missing_hook(std::any::type_name::<Self>(), "on_equip")
    }

    fn on_unequip(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        missing_hook(std::any::type_name::<Self>(), "on_unequip")
    }

    /// Resolve the predraw check registered by this equip with the drawn card.
    fn on_predraw_check(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _drawn: CardId) {
        missing_hook(std::any::type_name::<Self>(), "on_predraw_check")
    }

    fn prompt(&self, _game: &Game, _card: CardId, _target: PlayerId) -> Option<FormattedString> {
        None
    }
}

/// Hooks of a handler taking the whole target list of a play.
pub trait MultiTargetBehavior {
    fn verify(&self, _game: &Game, _ctx: &EffectContext, _targets: &[PlayTarget]) -> Result<()> {
        Ok(())
    }

    fn on_play(&self, _game: &mut Game, _ctx: &EffectContext, _targets: &[PlayTarget]) {
        missing_hook(std::any::type_name::<Self>(), "on_play")
    }
}

impl EffectType {
    /// The behaviour implementing this tag.
    #[must_use]
    pub fn behavior(self) -> &'static dyn EffectBehavior {
        match self {
            Self::MaxUsages => &MaxUsagesEffect,
            Self::Damage => &DamageEffect,
            Self::Bang => &BangEffect,
            Self::BangCard => &BangCardEffect,
            Self::BangLimit => &BangLimitEffect,
            Self::Missed | Self::MissedCard => &MissedEffect,
            Self::BangResponse => &BangResponseEffect,
            Self::Barrel => &BarrelEffect,
            Self::Indians => &IndiansEffect,
            Self::Duel => &DuelEffect,
            Self::GeneralStore => &GeneralStoreEffect,
            Self::Beer => &BeerEffect,
            Self::Heal => &HealEffect,
            Self::HealNotFull => &HealNotFullEffect,
            Self::Saloon => &SaloonEffect,
            Self::DeathSave => &DeathSaveEffect,
            Self::Steal => &StealEffect,
            Self::Destroy => &DestroyEffect,
            Self::Draw => &DrawEffect,
            Self::DrawDiscard => &DrawDiscardEffect,
            Self::DrawToDiscard => &DrawToDiscardEffect,
            Self::Escape => &EscapeEffect,
            Self::AddGold => &AddGoldEffect,
            Self::PayGold => &PayGoldEffect,
            Self::PayCube => &PayCubeEffect,
            Self::AddCube => &AddCubeEffect,
            Self::Repeatable | Self::MthAdd => &MarkerEffect,
        }
    }
}

impl EquipType {
    /// The behaviour implementing this tag.
    #[must_use]
    pub fn behavior(self) -> &'static dyn EquipBehavior {
        match self {
            Self::MaxHp => &MaxHpEquip,
            Self::Mustang => &MustangEquip,
            Self::Scope => &ScopeEquip,
            Self::Jail => &JailEquip,
            Self::Dynamite => &DynamiteEquip,
            Self::Horse => &HorseEquip,
            Self::Weapon => &WeaponEquip,
            Self::Volcanic => &VolcanicEquip,
            Self::Boots => &BootsEquip,
            Self::HorseCharm => &HorseCharmEquip,
            Self::Pickaxe => &PickaxeEquip,
            Self::Bronco => &BroncoEquip,
            Self::CalamityJanet => &CalamityJanetEquip,
            Self::SlabTheKiller => &SlabTheKillerEquip,
            Self::ElGringo => &ElGringoEquip,
            Self::SuzyLafayette => &SuzyLafayetteEquip,
            Self::VultureSam => &VultureSamEquip,
            Self::GregDigger => &GregDiggerEquip,
            Self::GhostTown => &ScenarioFlagEquip(crate::core::ScenarioFlags::GHOSTTOWN),
            Self::DeadMan => &ScenarioFlagEquip(crate::core::ScenarioFlags::DEADMAN),
            Self::Judge => &ScenarioFlagEquip(crate::core::ScenarioFlags::JUDGE),
            Self::AbandonedMine => &ScenarioFlagEquip(crate::core::ScenarioFlags::ABANDONEDMINE),
            Self::InvertRotation => &ScenarioFlagEquip(crate::core::ScenarioFlags::INVERT_ROTATION),
            Self::Hangover => &HangoverEquip,
            Self::Lasso => &LassoEquip,
        }
    }
}

impl MultiTargetType {
    #[must_use]
    pub fn behavior(self) -> &'static dyn MultiTargetBehavior {
        match self {
            Self::DocHolyday => &DocHolydayHandler,
        }
    }
}
