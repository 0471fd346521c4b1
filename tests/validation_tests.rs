//! Play validation tests.
//!
//! A rejected play leaves the game exactly as it was, and the number of
//! targets a card accepts follows its slot lists.

mod common;

use bang_engine::cards::{CardColor, CardData};
use bang_engine::core::{GameError, PlayerId};
use bang_engine::effects::{check_cardinality, EffectSpec, EffectType, PlayTarget};
use bang_engine::rules::{Game, PlayCardArgs};
use proptest::prelude::*;

use common::*;

fn snapshot(game: &Game) -> Vec<u8> {
    bincode::serialize(game.store()).unwrap()
}

fn bang_at(target: PlayerId) -> Vec<PlayTarget> {
    vec![PlayTarget::None, PlayTarget::Player(target)]
}

/// Play and expect a rejection that changed nothing.
fn assert_rejected(game: &mut Game, player: PlayerId, args: PlayCardArgs) -> GameError {
    game.drain_updates();
    let before = snapshot(game);
    let err = game.play_card(player, args).unwrap_err();
    assert_eq!(snapshot(game), before, "store changed by rejected play ({err})");
    assert!(game.drain_updates().is_empty(), "updates sent for rejected play ({err})");
    err
}

// ============================================================================
// Validator purity
// ============================================================================

/// Shooting yourself is refused.
#[test]
fn test_self_target_is_pure() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, bang());
    let err = assert_rejected(&mut game, me, PlayCardArgs::new(card).with_targets(bang_at(me)));
    assert_eq!(err, GameError::TargetSelf);
}

/// Shooting past the weapon range is refused.
#[test]
fn test_out_of_range_is_pure() {
    let mut game = table(5);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, bang());
    let err = assert_rejected(
        &mut game,
        me,
        PlayCardArgs::new(card).with_targets(bang_at(PlayerId::new(2))),
    );
    assert_eq!(err, GameError::TargetNotInRange);
}

/// The second Bang of a turn is refused.
#[test]
fn test_second_bang_is_pure() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let first = give(&mut game, me, bang());
    let second = give(&mut game, me, bang());
    game.play_card(me, PlayCardArgs::new(first).with_targets(bang_at(PlayerId::new(1))))
        .unwrap();
    game.confirm_request(PlayerId::new(1)).unwrap();

    let err = assert_rejected(
        &mut game,
        me,
        PlayCardArgs::new(second).with_targets(bang_at(PlayerId::new(1))),
    );
    assert_eq!(err, GameError::OneBangPerTurn);
}

/// Playing out of turn is refused.
#[test]
fn test_out_of_turn_is_pure() {
    let mut game = table(4);
    begin_turn(&mut game, PlayerId::new(0));
    let card = give(&mut game, PlayerId::new(2), bang());
    let err = assert_rejected(
        &mut game,
        PlayerId::new(2),
        PlayCardArgs::new(card).with_targets(bang_at(PlayerId::new(1))),
    );
    assert_eq!(err, GameError::NotYourTurn);
}

/// A second copy of an equipped card is refused.
#[test]
fn test_duplicate_equip_is_pure() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    equip(&mut game, me, mustang());
    let copy = give(&mut game, me, mustang());
    assert_rejected(&mut game, me, PlayCardArgs::new(copy));
    assert_eq!(game.player(me).distance_mod, 1);
}

/// Too few targets is refused before anything happens.
#[test]
fn test_missing_target_is_pure() {
    let mut game = table(4);
    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, bang());
    let err = assert_rejected(&mut game, me, PlayCardArgs::new(card).with_target(PlayTarget::None));
    assert_eq!(err, GameError::InvalidTargets);
}

// ============================================================================
// Cardinality
// ============================================================================

fn card_with(effects: usize, optionals: usize, repeatable: Option<i32>) -> CardData {
    let mut card = CardData::new("x", CardColor::Brown);
    for _ in 0..effects {
        card = card.with_effect(EffectSpec::none(EffectType::Draw));
    }
    for _ in 0..optionals {
        card = card.with_optional(EffectSpec::none(EffectType::Heal));
    }
    if let Some(max) = repeatable {
        card = card.with_optional(EffectSpec::none(EffectType::Repeatable).with_value(max));
    }
    card
}

/// Target counts a card accepts, worked out independently.
fn accepts(effects: usize, optionals: usize, repeatable: Option<i32>, n: usize) -> bool {
    if n < effects {
        return false;
    }
    let extra = n - effects;
    if extra == 0 {
        return true;
    }
    if optionals == 0 {
        return false;
    }
    match repeatable {
        None => extra == optionals,
        Some(max) => extra % optionals == 0 && (max <= 0 || extra / optionals <= max as usize),
    }
}

proptest! {
    /// The validator agrees with the slot arithmetic for any target count.
    #[test]
    fn prop_cardinality(
        effects in 0usize..4,
        optionals in 0usize..3,
        repeatable in proptest::option::of(0i32..4),
        n in 0usize..12,
    ) {
        let card = card_with(effects, optionals, repeatable);
        prop_assert_eq!(
            check_cardinality(&card, false, n).is_ok(),
            accepts(effects, optionals, repeatable, n)
        );
    }

    /// A Bang takes exactly two targets: its limit slot and the player.
    #[test]
    fn prop_bang_target_count(n in 0usize..6) {
        prop_assert_eq!(check_cardinality(&bang(), false, n).is_ok(), n == 2);
        prop_assert_eq!(check_cardinality(&bang(), true, n).is_ok(), n == 1);
    }
}
