//! Card effects: slot descriptions, behaviours and play validation.
//!
//! ## Key Types
//!
//! - [`EffectSpec`] / [`EquipSpec`]: the data side, one entry per slot
//! - [`EffectBehavior`] / [`EquipBehavior`] / [`MultiTargetBehavior`]:
//!   hooks a tag maps to
//! - [`PlayTarget`]: what a player picked for one slot
//!
//! Validation ([`verify_play`], [`verify_equip_target`]) only reads the
//! game; behaviours mutate it once a play has been accepted.

mod behaviors;
mod dispatch;
mod effect;
mod equips;
mod multi_target;
mod targeting;
mod validator;

pub use behaviors::{resolve_destroy, resolve_steal};
pub use dispatch::{EffectBehavior, EffectContext, EquipBehavior, MultiTargetBehavior};
pub use effect::{EffectSpec, EffectType, EquipSpec, EquipType, MultiTargetType, TargetKind};
pub use targeting::{check_card_filter, check_player_filter, CardFilter, PlayTarget, PlayerFilter};
pub use validator::{
    check_card_usable, check_cardinality, check_prompt, check_prompt_equip, multi_target_args, slot_for,
    verify_card_targets, verify_equip_target, verify_modifiers, verify_play, BELLTOWER_RANGE,
};
