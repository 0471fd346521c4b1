//! Equip behaviours: what a card does while it sits on a table or as a
//! character.
//!
//! Equips that react to events register handlers keyed by their own card
//! and drop them all on unequip with [`Game::remove_events`].

use crate::cards::{Rank, Suit};
use crate::core::{CardId, PlayerFlags, PlayerId, ScenarioFlags};
use crate::events::{Event, EventKind, Modifier, ModifierKind};
use crate::fmt_str;
use crate::piles::{Pile, Player};
use crate::rules::{Game, Role};

use super::dispatch::EquipBehavior;
use super::effect::{EquipSpec, EquipType};

fn adjust_player(game: &mut Game, target: PlayerId, f: impl FnOnce(&mut Player)) {
    f(game.store.player_mut(target));
    game.send_player_status(target);
}

/// Discard whatever else of the same equip class `target` has on the table.
fn discard_same_class(game: &mut Game, card: CardId, target: PlayerId, kind: EquipType) {
    let others: Vec<CardId> = game
        .player(target)
        .table
        .iter()
        .copied()
        .filter(|&other| other != card && game.card(other).data.equips.iter().any(|e| e.kind == kind))
        .collect();
    for other in others {
        game.discard_card(target, other);
    }
}

/// Starting hit points of a character. The sheriff gets one more.
pub struct MaxHpEquip;

impl EquipBehavior for MaxHpEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, spec: &EquipSpec) {
        let bonus = i32::from(game.player(target).role == Role::Sheriff);
        game.set_max_hp(target, spec.value + bonus);
    }

    fn on_unequip(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {}
}

/// Horse class marker: a new horse replaces the old one.
pub struct HorseEquip;

impl EquipBehavior for HorseEquip {
    fn on_pre_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        discard_same_class(game, card, target, EquipType::Horse);
    }

    fn on_equip(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {}

    fn on_unequip(&self, _game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {}
}

pub struct MustangEquip;

impl EquipBehavior for MustangEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.distance_mod += 1);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.distance_mod -= 1);
    }
}

pub struct ScopeEquip;

impl EquipBehavior for ScopeEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.range_mod += 1);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.range_mod -= 1);
    }
}

pub struct BroncoEquip;

impl EquipBehavior for BroncoEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.distance_mod += 1);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.distance_mod -= 1);
    }
}

/// Skip the turn unless the check draws hearts.
pub struct JailEquip;

impl EquipBehavior for JailEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.store.player_mut(target).add_predraw_check(card, 1, EquipType::Jail);
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.store.player_mut(target).remove_predraw_check(card);
    }

    fn on_predraw_check(&self, game: &mut Game, card: CardId, target: PlayerId, drawn: CardId) {
        game.discard_card(target, card);
        let hearts = game.card_sign(target, drawn).is_some_and(|s| s.suit == Suit::Hearts);
        if hearts {
            game.add_log(fmt_str!("LOG_JAIL_BREAK", target));
            game.next_predraw_check(target, card);
        } else {
            game.add_log(fmt_str!("LOG_SKIP_TURN", target));
            game.skip_turn(target);
        }
    }
}

/// Explodes on spades 2-9, otherwise moves on.
pub struct DynamiteEquip;

impl DynamiteEquip {
    pub const DAMAGE: i32 = 3;
}

impl EquipBehavior for DynamiteEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.store.player_mut(target).add_predraw_check(card, 2, EquipType::Dynamite);
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.store.player_mut(target).remove_predraw_check(card);
    }

    fn on_predraw_check(&self, game: &mut Game, card: CardId, target: PlayerId, drawn: CardId) {
        let explodes = game
            .card_sign(target, drawn)
            .is_some_and(|s| s.is_in(Suit::Spades, Rank::Two, Rank::Nine));
        if explodes {
            game.add_log(fmt_str!("LOG_CARD_EXPLODES", card));
            game.discard_card(target, card);
            game.damage(Some(card), None, target, Self::DAMAGE, false, false);
        } else {
            let name = game.card(card).name().to_owned();
            let mut next = game.get_next_player(target);
            while next != target
                && game
                    .player(next)
                    .table
                    .iter()
                    .any(|&other| game.card(other).name() == name)
            {
                next = game.get_next_player(next);
            }
            if next != target {
                game.unequip_if_enabled(card);
                game.move_card(card, Pile::PlayerTable, Some(next));
                game.equip_if_enabled(card);
            }
        }
        game.next_predraw_check(target, card);
    }
}

/// Sets the weapon range; a new weapon replaces the old one.
pub struct WeaponEquip;

impl EquipBehavior for WeaponEquip {
    fn on_pre_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        discard_same_class(game, card, target, EquipType::Weapon);
    }

    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, spec: &EquipSpec) {
        let range = spec.value;
        adjust_player(game, target, |p| p.weapon_range = range);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.weapon_range = 1);
    }
}

pub struct VolcanicEquip;

impl EquipBehavior for VolcanicEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_modifier(card, ModifierKind::Volcanic, move |_, modifier| {
            if let Modifier::Volcanic { player, unlimited } = modifier {
                if *player == target {
                    *unlimited = true;
                }
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

/// Draw a card for every point of damage taken.
pub struct BootsEquip;

impl EquipBehavior for BootsEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_listener(card, EventKind::OnHit, move |game, event| {
            if let Event::OnHit { target: hit, damage, .. } = *event {
                if hit == target && game.is_alive(target) {
                    for _ in 0..damage {
                        game.draw_card(target);
                    }
                }
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

pub struct HorseCharmEquip;

impl EquipBehavior for HorseCharmEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.num_checks += 1);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.num_checks -= 1);
    }
}

pub struct PickaxeEquip;

impl EquipBehavior for PickaxeEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.num_cards_to_draw += 1);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.num_cards_to_draw -= 1);
    }
}

/// Bangs and Missed are interchangeable.
pub struct CalamityJanetEquip;

impl EquipBehavior for CalamityJanetEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.flags.insert(PlayerFlags::TREAT_MISSED_AS_BANG));
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, target: PlayerId, _spec: &EquipSpec) {
        adjust_player(game, target, |p| p.flags.remove(PlayerFlags::TREAT_MISSED_AS_BANG));
    }
}

/// Her Bangs need one more Missed.
pub struct SlabTheKillerEquip;

impl EquipBehavior for SlabTheKillerEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_modifier(card, ModifierKind::Bang, move |_, modifier| {
            if let Modifier::Bang { origin, strength } = modifier {
                if *origin == target {
                    *strength += 1;
                }
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

/// Takes a random hand card from the attacker for every point of damage.
pub struct ElGringoEquip;

impl EquipBehavior for ElGringoEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_listener(card, EventKind::OnHit, move |game, event| {
            let Event::OnHit { origin: Some(origin), target: hit, damage, .. } = *event else {
                return;
            };
            if hit != target || origin == target || !game.is_alive(target) {
                return;
            }
            for _ in 0..damage {
                let Some(stolen) = game.random_hand_card(origin) else {
                    break;
                };
                game.add_log(fmt_str!("LOG_STOLEN_CARD_FROM_HAND", target, origin, card));
                game.move_card(stolen, Pile::PlayerHand, Some(target));
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

/// Draws as soon as her hand is empty.
pub struct SuzyLafayetteEquip;

impl EquipBehavior for SuzyLafayetteEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_listener(card, EventKind::OnEffectEnd, move |game, _| {
            if game.is_alive(target) && game.player(target).hand.is_empty() {
                game.draw_card(target);
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

/// Takes every card of an eliminated player.
pub struct VultureSamEquip;

impl EquipBehavior for VultureSamEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_listener(card, EventKind::OnPlayerDeath, move |game, event| {
            let Event::OnPlayerDeath { target: dead, .. } = *event else {
                return;
            };
            if dead == target || !game.is_alive(target) {
                return;
            }
            let player = game.player(dead);
            let cards: Vec<CardId> = player.hand.iter().chain(player.table.iter()).copied().collect();
            for taken in cards {
                game.move_owned_card(dead, taken, Pile::PlayerHand, Some(target));
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

/// Heals 2 whenever another player is eliminated.
pub struct GregDiggerEquip;

impl EquipBehavior for GregDiggerEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, target: PlayerId, _spec: &EquipSpec) {
        game.add_listener(card, EventKind::OnPlayerDeath, move |game, event| {
            if let Event::OnPlayerDeath { target: dead, .. } = *event {
                if dead != target && game.is_alive(target) {
                    game.heal(target, 2);
                }
            }
        });
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_events(card);
    }
}

/// Scenario card switching a rule flag while it is the active scenario.
pub struct ScenarioFlagEquip(pub ScenarioFlags);

impl EquipBehavior for ScenarioFlagEquip {
    fn on_equip(&self, game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.scenario_flags.insert(self.0);
    }

    fn on_unequip(&self, game: &mut Game, _card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.scenario_flags.remove(self.0);
    }
}

/// Characters have no ability.
pub struct HangoverEquip;

impl EquipBehavior for HangoverEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.add_disabler(card, |c| c.pile == Pile::PlayerCharacter);
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_disablers(card);
    }
}

/// Cards on the table have no effect.
pub struct LassoEquip;

impl EquipBehavior for LassoEquip {
    fn on_equip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.add_disabler(card, |c| c.pile == Pile::PlayerTable);
    }

    fn on_unequip(&self, game: &mut Game, card: CardId, _target: PlayerId, _spec: &EquipSpec) {
        game.remove_disablers(card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardColor, CardData};
    use crate::effects::EquipSpec;

    fn equip_card(game: &mut Game, data: CardData, target: PlayerId) -> CardId {
        let card = game.add_test_card(data, Pile::PlayerTable, Some(target));
        game.equip_if_enabled(card);
        card
    }

    #[test]
    fn test_mustang_changes_distance_to_owner_only() {
        let mut game = Game::test_game(4);
        let (a, b) = (PlayerId(0), PlayerId(1));
        let before = (game.distance(a, b), game.distance(b, a));
        let mustang = CardData::new("Mustang", CardColor::Blue)
            .with_equip(EquipSpec::new(EquipType::Horse))
            .with_equip(EquipSpec::new(EquipType::Mustang));
        let card = equip_card(&mut game, mustang, b);

        assert_eq!(game.distance(a, b), before.0 + 1);
        assert_eq!(game.distance(b, a), before.1);

        game.discard_card(b, card);
        assert_eq!(game.distance(a, b), before.0);
    }

    #[test]
    fn test_new_weapon_replaces_old() {
        let mut game = Game::test_game(4);
        let p = PlayerId(0);
        let schofield = CardData::new("Schofield", CardColor::Blue).with_equip(EquipSpec::new(EquipType::Weapon).with_value(2));
        let winchester = CardData::new("Winchester", CardColor::Blue).with_equip(EquipSpec::new(EquipType::Weapon).with_value(5));

        let old = equip_card(&mut game, schofield, p);
        assert_eq!(game.player(p).weapon_range, 2);

        let new = game.add_test_card(winchester, Pile::PlayerHand, Some(p));
        let spec = game.card(new).data.equips[0];
        WeaponEquip.on_pre_equip(&mut game, new, p, &spec);
        game.move_card(new, Pile::PlayerTable, Some(p));
        game.equip_if_enabled(new);

        assert_eq!(game.card(old).pile, Pile::DiscardPile);
        assert_eq!(game.player(p).weapon_range, 5);
    }

    #[test]
    fn test_volcanic_modifier_scoped_to_owner() {
        let mut game = Game::test_game(4);
        let volcanic = CardData::new("Volcanic", CardColor::Blue).with_equip(EquipSpec::new(EquipType::Volcanic));
        let card = equip_card(&mut game, volcanic, PlayerId(2));

        let ask = |game: &Game, player| {
            game.apply_modifier(Modifier::Volcanic { player, unlimited: false }).bool_value()
        };
        assert_eq!(ask(&game, PlayerId(2)), Some(true));
        assert_eq!(ask(&game, PlayerId(1)), Some(false));

        game.discard_card(PlayerId(2), card);
        assert_eq!(ask(&game, PlayerId(2)), Some(false));
    }

    #[test]
    fn test_scenario_flag_toggles() {
        let mut game = Game::test_game(4);
        let spec = EquipSpec::new(EquipType::Judge);
        let behavior = ScenarioFlagEquip(ScenarioFlags::JUDGE);
        behavior.on_equip(&mut game, CardId(1), PlayerId(0), &spec);
        assert!(game.has_scenario(ScenarioFlags::JUDGE));
        behavior.on_unequip(&mut game, CardId(1), PlayerId(0), &spec);
        assert!(!game.has_scenario(ScenarioFlags::JUDGE));
    }

    #[test]
    fn test_lasso_switches_table_cards_off_and_on() {
        let mut game = Game::test_game(4);
        let scope = CardData::new("Scope", CardColor::Blue).with_equip(EquipSpec::new(EquipType::Scope));
        let card = equip_card(&mut game, scope, PlayerId(0));
        assert_eq!(game.player(PlayerId(0)).range_mod, 1);

        let lasso = CardId(999);
        let spec = EquipSpec::new(EquipType::Lasso);
        LassoEquip.on_equip(&mut game, lasso, PlayerId(0), &spec);
        assert!(game.is_disabled(card));
        assert_eq!(game.player(PlayerId(0)).range_mod, 0);

        LassoEquip.on_unequip(&mut game, lasso, PlayerId(0), &spec);
        assert!(!game.is_disabled(card));
        assert_eq!(game.player(PlayerId(0)).range_mod, 1);
    }
}
