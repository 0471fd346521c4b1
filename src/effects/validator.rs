//! Play validation.
//!
//! Everything here takes `&Game`: a rejected play leaves the game exactly
//! as it was, so the same checks can be asked speculatively for hints.
//! Modifier cards (belltower, bandolier) change range and bang limit
//! through the returned [`EffectContext`] instead of touching the player.
//!
//! Checks run in this order:
//!
//! 1. modifier cards ([`verify_modifiers`]);
//! 2. disabled, inactive, mandatory and forced cards;
//! 3. target count against the card's slots ([`check_cardinality`]);
//! 4. per target: slot kind, player filter, card filter, then the
//!    behaviour's own `verify` hook;
//! 5. the multi-target handler, if the card has one.

use smallvec::SmallVec;

use crate::cards::{CardColor, CardData, CardModifier};
use crate::core::{CardId, FormattedString, GameError, PlayerId, Result, ScenarioFlags};
use crate::piles::Pile;
use crate::rules::Game;

use super::dispatch::EffectContext;
use super::effect::{EffectSpec, EffectType, TargetKind};
use super::targeting::{check_card_filter, check_player_filter, PlayTarget};

/// Extra range granted by a belltower: enough to reach anyone.
pub const BELLTOWER_RANGE: i32 = 50;

/// The repeatable group of a card and its bound.
///
/// The group is the optional slots without a trailing `Repeatable`
/// marker; the marker's value caps the repetitions (0: unbounded).
fn optional_group(data: &CardData) -> (&[EffectSpec], Option<i32>) {
    match data.optionals.split_last() {
        Some((last, group)) if last.is(EffectType::Repeatable) => (group, Some(last.value)),
        _ => (&data.optionals, None),
    }
}

/// Check a target count against the slots of a card.
///
/// Without a repeatable group the optional slots are all-or-nothing.
/// With one, any whole number of extra groups is accepted up to the bound.
///
/// ```
/// use bang_engine::cards::{CardColor, CardData};
/// use bang_engine::effects::{check_cardinality, EffectSpec, EffectType};
///
/// let card = CardData::new("Gatling", CardColor::Brown)
///     .with_effect(EffectSpec::none(EffectType::Draw))
///     .with_optional(EffectSpec::none(EffectType::Heal))
///     .with_optional(EffectSpec::none(EffectType::Repeatable).with_value(2));
///
/// assert!(check_cardinality(&card, false, 1).is_ok());
/// assert!(check_cardinality(&card, false, 3).is_ok());
/// assert!(check_cardinality(&card, false, 4).is_err());
/// assert!(check_cardinality(&card, false, 0).is_err());
/// ```
pub fn check_cardinality(data: &CardData, is_response: bool, num_targets: usize) -> Result<()> {
    let effects = data.play_effects(is_response);
    let diff = num_targets as i64 - effects.len() as i64;
    let (group, repeatable) = optional_group(data);
    let group_len = group.len() as i64;

    let valid = match repeatable {
        Some(max) => {
            diff >= 0
                && (diff == 0 || (group_len > 0 && diff % group_len == 0))
                && (max <= 0 || group_len == 0 || diff / group_len <= i64::from(max))
        }
        None => diff == 0 || diff == group_len,
    };
    if valid {
        Ok(())
    } else {
        Err(GameError::InvalidTargets)
    }
}

/// The slot the `index`-th target binds to.
///
/// Primary slots come first, then the optional group cycles. Only valid
/// for target counts accepted by [`check_cardinality`].
#[must_use]
pub fn slot_for(data: &CardData, is_response: bool, index: usize) -> &EffectSpec {
    let effects = data.play_effects(is_response);
    if index < effects.len() {
        &effects[index]
    } else {
        let (group, _) = optional_group(data);
        &group[(index - effects.len()) % group.len()]
    }
}

/// Targets bound to `MthAdd` slots, in order.
#[must_use]
pub fn multi_target_args(data: &CardData, is_response: bool, targets: &[PlayTarget]) -> SmallVec<[PlayTarget; 4]> {
    targets
        .iter()
        .enumerate()
        .filter(|&(i, _)| slot_for(data, is_response, i).is(EffectType::MthAdd))
        .map(|(_, target)| target.clone())
        .collect()
}

fn known_card(game: &Game, card: CardId) -> Result<()> {
    game.store
        .get_card(card)
        .map(|_| ())
        .ok_or(GameError::UnknownCard(card))
}

fn known_player(game: &Game, player: PlayerId) -> Result<()> {
    if player.index() < game.players().len() {
        Ok(())
    } else {
        Err(GameError::InvalidAction)
    }
}

/// True if the player holds `card` somewhere a play can start from.
fn holds_playable(game: &Game, origin: PlayerId, card: CardId) -> bool {
    let c = game.card(card);
    c.owner == Some(origin) && matches!(c.pile, Pile::PlayerHand | Pile::PlayerTable | Pile::PlayerCharacter)
}

/// Check the modifier cards of a play and fold their adjustments into a context.
pub fn verify_modifiers(game: &Game, origin: PlayerId, card: CardId, modifiers: &[CardId]) -> Result<EffectContext> {
    let mut ctx = EffectContext::new(card, origin);
    let main = game.card(card);

    for (i, &mod_card) in modifiers.iter().enumerate() {
        known_card(game, mod_card)?;
        if mod_card == card || modifiers[..i].contains(&mod_card) || !holds_playable(game, origin, mod_card) {
            return Err(GameError::InvalidModifier(mod_card));
        }
        if game.is_disabled(mod_card) {
            return Err(GameError::CardDisabled(mod_card));
        }

        let data = &game.card(mod_card).data;
        match data.modifier {
            CardModifier::None => return Err(GameError::InvalidModifier(mod_card)),
            CardModifier::BangMod => {
                if !main.data.effects_last_is(EffectType::BangCard) {
                    return Err(GameError::InvalidModifier(mod_card));
                }
            }
            CardModifier::Discount => {
                if main.pile != Pile::ShopSelection {
                    return Err(GameError::InvalidModifier(mod_card));
                }
            }
            CardModifier::Belltower => ctx.range_bonus += BELLTOWER_RANGE,
            CardModifier::Bandolier => ctx.extra_bangs += 1,
        }

        let mod_ctx = EffectContext::new(mod_card, origin);
        for spec in &data.effects {
            spec.kind.behavior().verify(game, &mod_ctx, spec)?;
        }
    }
    Ok(ctx)
}

/// Check that `origin` may use `card` at all: enabled, untapped, and not
/// blocked by a mandatory or forced card.
pub fn check_card_usable(
    game: &Game,
    origin: PlayerId,
    card: CardId,
    is_response: bool,
    modifiers: &[CardId],
) -> Result<()> {
    let c = game.card(card);
    if game.is_disabled(card) {
        return Err(GameError::CardDisabled(card));
    }
    if c.inactive {
        return Err(GameError::CardInactive(card));
    }

    let player = game.player(origin);
    if let Some(mandatory) = player.mandatory_card {
        if mandatory != card
            && game.card(mandatory).data.has_effect(EffectType::BangLimit)
            && c.data.play_effects(is_response).iter().any(|e| e.is(EffectType::BangLimit))
        {
            return Err(GameError::MandatoryCard(mandatory));
        }
    }
    if let Some(forced) = player.forced_card {
        if forced != card && !modifiers.contains(&forced) {
            return Err(GameError::ForcedCard(forced));
        }
    }
    Ok(())
}

/// Check the targets of a play against the card's slots.
pub fn verify_card_targets(
    game: &Game,
    ctx: &EffectContext,
    is_response: bool,
    targets: &[PlayTarget],
) -> Result<()> {
    let origin = ctx.origin;
    let data = &game.card(ctx.origin_card).data;

    check_cardinality(data, is_response, targets.len())?;

    let mut seen_cards: SmallVec<[CardId; 4]> = SmallVec::new();
    let mut note_card = |target: CardId| {
        if seen_cards.contains(&target) {
            return Err(GameError::TargetsNotDistinct);
        }
        seen_cards.push(target);
        Ok(())
    };

    for (i, target) in targets.iter().enumerate() {
        let spec = slot_for(data, is_response, i);
        if spec.target != target.kind() {
            return Err(GameError::InvalidTargets);
        }
        let behavior = spec.kind.behavior();

        match target {
            PlayTarget::None => behavior.verify(game, ctx, spec)?,
            PlayTarget::Player(p) => {
                known_player(game, *p)?;
                check_player_filter(game, origin, spec.player_filter, *p, ctx.range_bonus)?;
                behavior.verify_player(game, ctx, spec, *p)?;
            }
            PlayTarget::Card(target_card) => {
                known_card(game, *target_card)?;
                let Some(owner) = game.card(*target_card).owner else {
                    return Err(GameError::InvalidTargets);
                };
                note_card(*target_card)?;
                check_player_filter(game, origin, spec.player_filter, owner, ctx.range_bonus)?;
                check_card_filter(game, origin, spec.card_filter, *target_card)?;
                behavior.verify_card(game, ctx, spec, owner, *target_card)?;
            }
            PlayTarget::OtherPlayers => {
                for p in game.other_players(origin) {
                    behavior.verify_player(game, ctx, spec, p)?;
                }
            }
            PlayTarget::CardsOtherPlayers(cards) => {
                for &target_card in cards {
                    known_card(game, target_card)?;
                    note_card(target_card)?;
                }
                for (id, p) in game.players().iter() {
                    if !game.is_alive(id) {
                        continue;
                    }
                    let found = cards.iter().filter(|&&c| game.card(c).owner == Some(id)).count();
                    let expected = usize::from(id != origin && !(p.hand.is_empty() && p.table.is_empty()));
                    if found != expected {
                        return Err(GameError::InvalidTargets);
                    }
                }
                for &target_card in cards {
                    let Some(owner) = game.card(target_card).owner else {
                        return Err(GameError::InvalidTargets);
                    };
                    behavior.verify_card(game, ctx, spec, owner, target_card)?;
                }
            }
        }
    }

    if let Some(handler) = data.multi_target {
        handler
            .behavior()
            .verify(game, ctx, &multi_target_args(data, is_response, targets))?;
    }
    Ok(())
}

/// Full check of a non-equip play: the card itself, its modifiers, then
/// its targets.
pub fn verify_play(
    game: &Game,
    origin: PlayerId,
    card: CardId,
    is_response: bool,
    modifiers: &[CardId],
    targets: &[PlayTarget],
) -> Result<EffectContext> {
    known_card(game, card)?;
    check_card_usable(game, origin, card, is_response, modifiers)?;
    let ctx = verify_modifiers(game, origin, card, modifiers)?;
    verify_card_targets(game, &ctx, is_response, targets)?;
    Ok(ctx)
}

/// Check an equip and return the player the card goes to.
///
/// An empty equip filter means the card goes on the player's own table;
/// otherwise the only target must be a player matching the filter.
pub fn verify_equip_target(game: &Game, origin: PlayerId, card: CardId, targets: &[PlayTarget]) -> Result<PlayerId> {
    if game.is_disabled(card) {
        return Err(GameError::CardDisabled(card));
    }
    if game.has_scenario(ScenarioFlags::JUDGE) {
        return Err(GameError::CantEquipCards);
    }

    let data = &game.card(card).data;
    let filter = data.equips.first().map(|e| e.player_filter).unwrap_or_default();
    let target = if filter.is_empty() {
        match targets {
            [] => origin,
            [PlayTarget::Player(p)] if *p == origin => origin,
            _ => return Err(GameError::InvalidTargets),
        }
    } else {
        let [PlayTarget::Player(p)] = targets else {
            return Err(GameError::InvalidTargets);
        };
        known_player(game, *p)?;
        check_player_filter(game, origin, filter, *p, 0)?;
        *p
    };

    if let Some(&duplicate) = game
        .player(target)
        .table
        .iter()
        .find(|&&other| game.card(other).name() == data.name)
    {
        return Err(GameError::DuplicatedCard(duplicate));
    }
    if data.color == CardColor::Orange && game.cube_pool_len() < 3 {
        return Err(GameError::NotEnoughCubes);
    }
    Ok(target)
}

/// First warning any target of the play would trigger.
///
/// For implied targets (every other player) the warning is only shown if
/// it applies to all of them.
#[must_use]
pub fn check_prompt(game: &Game, ctx: &EffectContext, is_response: bool, targets: &[PlayTarget]) -> Option<FormattedString> {
    let data = &game.card(ctx.origin_card).data;
    for (i, target) in targets.iter().enumerate() {
        let spec = slot_for(data, is_response, i);
        let behavior = spec.kind.behavior();
        let message = match target {
            PlayTarget::None => behavior.prompt(game, ctx, spec),
            PlayTarget::Player(p) => behavior.prompt_player(game, ctx, spec, *p),
            PlayTarget::OtherPlayers => {
                let mut message = None;
                for p in game.other_players(ctx.origin) {
                    message = behavior.prompt_player(game, ctx, spec, p);
                    if message.is_none() {
                        break;
                    }
                }
                message
            }
            PlayTarget::Card(_) | PlayTarget::CardsOtherPlayers(_) => None,
        };
        if message.is_some() {
            return message;
        }
    }
    None
}

/// First warning any equip of the card would trigger on `target`.
#[must_use]
pub fn check_prompt_equip(game: &Game, card: CardId, target: PlayerId) -> Option<FormattedString> {
    game.card(card)
        .data
        .equips
        .iter()
        .find_map(|spec| spec.kind.behavior().prompt(game, card, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use crate::effects::{CardFilter, EquipSpec, EquipType, PlayerFilter};

    fn bang() -> CardData {
        CardData::new("Bang!", CardColor::Brown)
            .with_sign(Suit::Spades, Rank::Ace)
            .with_effect(EffectSpec::none(EffectType::BangLimit))
            .with_effect(EffectSpec::player(
                EffectType::BangCard,
                PlayerFilter::REACHABLE | PlayerFilter::NOTSELF,
            ))
    }

    fn panic_card() -> CardData {
        CardData::new("Panic!", CardColor::Brown)
            .with_sign(Suit::Hearts, Rank::Jack)
            .with_effect(EffectSpec::card(
                EffectType::Steal,
                PlayerFilter::RANGE_1 | PlayerFilter::NOTSELF,
                CardFilter::empty(),
            ))
    }

    #[test]
    fn test_cardinality_without_repeat_is_all_or_nothing() {
        let card = CardData::new("x", CardColor::Brown)
            .with_effect(EffectSpec::none(EffectType::Draw))
            .with_optional(EffectSpec::none(EffectType::Heal))
            .with_optional(EffectSpec::none(EffectType::AddGold));
        assert!(check_cardinality(&card, false, 1).is_ok());
        assert!(check_cardinality(&card, false, 3).is_ok());
        assert_eq!(check_cardinality(&card, false, 2), Err(GameError::InvalidTargets));
        assert_eq!(check_cardinality(&card, false, 0), Err(GameError::InvalidTargets));
    }

    #[test]
    fn test_optional_slots_cycle() {
        let card = CardData::new("x", CardColor::Brown)
            .with_effect(EffectSpec::none(EffectType::Draw))
            .with_optional(EffectSpec::none(EffectType::Heal))
            .with_optional(EffectSpec::none(EffectType::AddGold))
            .with_optional(EffectSpec::none(EffectType::Repeatable));
        assert!(slot_for(&card, false, 0).is(EffectType::Draw));
        assert!(slot_for(&card, false, 1).is(EffectType::Heal));
        assert!(slot_for(&card, false, 2).is(EffectType::AddGold));
        assert!(slot_for(&card, false, 3).is(EffectType::Heal));
        assert!(check_cardinality(&card, false, 5).is_ok());
        assert!(check_cardinality(&card, false, 4).is_err());
    }

    #[test]
    fn test_bang_needs_range() {
        let mut game = Game::test_game(5);
        let me = PlayerId(0);
        let card = game.add_test_card(bang(), Pile::PlayerHand, Some(me));
        let args = [PlayTarget::None, PlayTarget::Player(PlayerId(2))];
        assert_eq!(
            verify_play(&game, me, card, false, &[], &args).err(),
            Some(GameError::TargetNotInRange)
        );

        let near = [PlayTarget::None, PlayTarget::Player(PlayerId(1))];
        assert!(verify_play(&game, me, card, false, &[], &near).is_ok());

        let myself = [PlayTarget::None, PlayTarget::Player(me)];
        assert_eq!(verify_play(&game, me, card, false, &[], &myself).err(), Some(GameError::TargetSelf));
    }

    #[test]
    fn test_belltower_extends_range_without_mutation() {
        let mut game = Game::test_game(5);
        let me = PlayerId(0);
        let card = game.add_test_card(bang(), Pile::PlayerHand, Some(me));
        let belltower = game.add_test_card(
            CardData::new("Belltower", CardColor::Brown).with_modifier(CardModifier::Belltower),
            Pile::PlayerHand,
            Some(me),
        );
        let args = [PlayTarget::None, PlayTarget::Player(PlayerId(2))];
        let ctx = verify_play(&game, me, card, false, &[belltower], &args).unwrap();
        assert_eq!(ctx.range_bonus, BELLTOWER_RANGE);
        assert_eq!(game.player(me).range_mod, 0);
    }

    #[test]
    fn test_kind_mismatch_and_bad_ids() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let card = game.add_test_card(bang(), Pile::PlayerHand, Some(me));
        let wrong = [PlayTarget::None, PlayTarget::Card(card)];
        assert_eq!(verify_play(&game, me, card, false, &[], &wrong).err(), Some(GameError::InvalidTargets));

        let ghost = [PlayTarget::None, PlayTarget::Player(PlayerId(9))];
        assert_eq!(verify_play(&game, me, card, false, &[], &ghost).err(), Some(GameError::InvalidAction));

        assert_eq!(
            verify_play(&game, me, CardId(500), false, &[], &[]).err(),
            Some(GameError::UnknownCard(CardId(500)))
        );
    }

    #[test]
    fn test_card_target_needs_owner() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let card = game.add_test_card(panic_card(), Pile::PlayerHand, Some(me));
        let loose = game.add_test_card(CardData::new("Beer", CardColor::Brown), Pile::DiscardPile, None);
        let theirs = game.add_test_card(CardData::new("Beer", CardColor::Brown), Pile::PlayerHand, Some(PlayerId(1)));

        assert_eq!(
            verify_play(&game, me, card, false, &[], &[PlayTarget::Card(loose)]).err(),
            Some(GameError::InvalidTargets)
        );
        assert!(verify_play(&game, me, card, false, &[], &[PlayTarget::Card(theirs)]).is_ok());
    }

    #[test]
    fn test_cards_other_players_one_each() {
        let mut game = Game::test_game(3);
        let me = PlayerId(0);
        let data = CardData::new("Brawl", CardColor::Brown).with_effect(EffectSpec::new(
            EffectType::Destroy,
            TargetKind::CardsOtherPlayers,
        ));
        let card = game.add_test_card(data, Pile::PlayerHand, Some(me));
        let a = game.add_test_card(CardData::new("a", CardColor::Brown), Pile::PlayerHand, Some(PlayerId(1)));
        let b = game.add_test_card(CardData::new("b", CardColor::Brown), Pile::PlayerHand, Some(PlayerId(2)));
        let b2 = game.add_test_card(CardData::new("b2", CardColor::Brown), Pile::PlayerHand, Some(PlayerId(2)));

        let ok = PlayTarget::CardsOtherPlayers([a, b].into_iter().collect());
        assert!(verify_play(&game, me, card, false, &[], &[ok]).is_ok());

        let missing = PlayTarget::CardsOtherPlayers([a].into_iter().collect());
        assert_eq!(verify_play(&game, me, card, false, &[], &[missing]).err(), Some(GameError::InvalidTargets));

        let twice = PlayTarget::CardsOtherPlayers([a, b, b2].into_iter().collect());
        assert_eq!(verify_play(&game, me, card, false, &[], &[twice]).err(), Some(GameError::InvalidTargets));
    }

    #[test]
    fn test_mandatory_bang_blocks_other_bangs() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let first = game.add_test_card(bang(), Pile::PlayerHand, Some(me));
        let second = game.add_test_card(bang(), Pile::PlayerHand, Some(me));
        game.store.player_mut(me).mandatory_card = Some(first);

        let args = [PlayTarget::None, PlayTarget::Player(PlayerId(1))];
        assert_eq!(
            verify_play(&game, me, second, false, &[], &args).err(),
            Some(GameError::MandatoryCard(first))
        );
        assert!(verify_play(&game, me, first, false, &[], &args).is_ok());
    }

    #[test]
    fn test_bangmod_needs_bang() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let beer = game.add_test_card(CardData::new("Beer", CardColor::Brown), Pile::PlayerHand, Some(me));
        let modifier = game.add_test_card(
            CardData::new("Mod", CardColor::Brown).with_modifier(CardModifier::BangMod),
            Pile::PlayerHand,
            Some(me),
        );
        assert_eq!(
            verify_modifiers(&game, me, beer, &[modifier]).err(),
            Some(GameError::InvalidModifier(modifier))
        );
    }

    #[test]
    fn test_card_checked_before_its_modifiers() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let beer = game.add_test_card(CardData::new("Beer", CardColor::Brown), Pile::PlayerHand, Some(me));
        let modifier = game.add_test_card(
            CardData::new("Mod", CardColor::Brown).with_modifier(CardModifier::BangMod),
            Pile::PlayerHand,
            Some(me),
        );
        game.add_disabler(CardId(90), move |c| c.id == beer);
        assert_eq!(
            verify_play(&game, me, beer, false, &[modifier], &[]).err(),
            Some(GameError::CardDisabled(beer))
        );

        game.remove_disablers(CardId(90));
        game.store.player_mut(me).forced_card = Some(modifier);
        let other = game.add_test_card(CardData::new("Other", CardColor::Brown), Pile::PlayerHand, Some(me));
        assert_eq!(
            verify_play(&game, me, other, false, &[], &[]).err(),
            Some(GameError::ForcedCard(modifier))
        );
    }

    #[test]
    fn test_equip_target_rules() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let mustang = CardData::new("Mustang", CardColor::Blue).with_equip(EquipSpec::new(EquipType::Mustang));
        let card = game.add_test_card(mustang.clone(), Pile::PlayerHand, Some(me));
        assert_eq!(verify_equip_target(&game, me, card, &[]), Ok(me));
        assert_eq!(
            verify_equip_target(&game, me, card, &[PlayTarget::Player(PlayerId(1))]),
            Err(GameError::InvalidTargets)
        );

        let on_table = game.add_test_card(mustang, Pile::PlayerTable, Some(me));
        assert_eq!(verify_equip_target(&game, me, card, &[]), Err(GameError::DuplicatedCard(on_table)));

        let jail = CardData::new("Jail", CardColor::Blue).with_equip(
            EquipSpec::new(EquipType::Jail).with_player_filter(PlayerFilter::NOTSELF | PlayerFilter::NOTSHERIFF),
        );
        let jail = game.add_test_card(jail, Pile::PlayerHand, Some(me));
        assert_eq!(verify_equip_target(&game, me, jail, &[PlayTarget::Player(PlayerId(2))]), Ok(PlayerId(2)));
        assert_eq!(
            verify_equip_target(&game, me, jail, &[PlayTarget::Player(me)]),
            Err(GameError::TargetSelf)
        );

        game.scenario_flags.insert(ScenarioFlags::JUDGE);
        assert_eq!(verify_equip_target(&game, me, jail, &[]), Err(GameError::CantEquipCards));
    }

    #[test]
    fn test_prompt_for_useless_beer() {
        let mut game = Game::test_game(4);
        let me = PlayerId(0);
        let beer = CardData::new("Beer", CardColor::Brown)
            .with_effect(EffectSpec::player(EffectType::Beer, PlayerFilter::SELF));
        let card = game.add_test_card(beer, Pile::PlayerHand, Some(me));
        let ctx = EffectContext::new(card, me);
        let args = [PlayTarget::Player(me)];
        assert!(check_prompt(&game, &ctx, false, &args).is_some());

        game.set_hp(me, 1);
        assert!(check_prompt(&game, &ctx, false, &args).is_none());
    }
}
