//! Distance and range tests.
//!
//! Seat distance is symmetric; equipment only moves the distance seen
//! by others (horses) or the reach of the owner (scopes, weapons).

mod common;

use bang_engine::core::PlayerId;
use bang_engine::effects::PlayTarget;
use bang_engine::rules::PlayCardArgs;
use proptest::prelude::*;

use common::*;

fn seat_distance(n: usize, a: usize, b: usize) -> i32 {
    let d = a.abs_diff(b);
    d.min(n - d) as i32
}

// ============================================================================
// Asymmetry from equipment
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Horses add to the distance others see, and only that.
    #[test]
    fn prop_distance_asymmetry(
        n in 3usize..=8,
        a in 0usize..8,
        b in 0usize..8,
        horses in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let (a, b) = (a % n, b % n);
        prop_assume!(a != b);

        let mut game = table(n);
        for (seat, &has_horse) in horses.iter().enumerate().take(n) {
            if has_horse {
                equip(&mut game, PlayerId::new(seat as u8), mustang());
            }
        }

        let (pa, pb) = (PlayerId::new(a as u8), PlayerId::new(b as u8));
        let mod_a = game.player(pa).distance_mod;
        let mod_b = game.player(pb).distance_mod;
        prop_assert_eq!(mod_a, i32::from(horses[a]));
        prop_assert_eq!(mod_b, i32::from(horses[b]));

        prop_assert_eq!(game.distance(pa, pb), seat_distance(n, a, b) + mod_b);
        prop_assert_eq!(game.distance(pa, pb) - game.distance(pb, pa), mod_b - mod_a);
    }
}

// ============================================================================
// Range in plays
// ============================================================================

/// A scope lets the owner reach one seat further, others are unaffected.
#[test]
fn test_scope_extends_own_reach() {
    let mut game = table(5);
    let me = PlayerId::new(0);
    let far = PlayerId::new(2);
    equip(&mut game, me, scope());
    assert_eq!(game.player(me).range_mod, 1);
    assert_eq!(game.distance(me, far), 2);
    assert_eq!(game.distance(far, me), 2);

    let card = give(&mut game, me, bang());
    game.play_card(
        me,
        PlayCardArgs::new(card).with_targets(vec![PlayTarget::None, PlayTarget::Player(far)]),
    )
    .unwrap();
    assert!(game.top_request().is_some_and(|r| r.target == far));
}

/// A mustang on the target pushes it out of reach.
#[test]
fn test_mustang_blocks_adjacent_bang() {
    let mut game = table(4);
    let target = PlayerId::new(1);
    equip(&mut game, target, mustang());

    let me = PlayerId::new(0);
    begin_turn(&mut game, me);
    let card = give(&mut game, me, bang());
    let args = PlayCardArgs::new(card).with_targets(vec![PlayTarget::None, PlayTarget::Player(target)]);
    assert!(game.play_card(me, args).is_err());
    assert_eq!(game.distance(me, target), 2);
    assert_eq!(game.distance(target, me), 1);
}

/// Dead players drop out of the seat count.
#[test]
fn test_dead_seats_are_skipped() {
    let mut game = table(5);
    assert_eq!(game.distance(PlayerId::new(0), PlayerId::new(2)), 2);
    game.player_death(None, PlayerId::new(1));
    assert_eq!(game.distance(PlayerId::new(0), PlayerId::new(2)), 1);
    assert_eq!(game.distance(PlayerId::new(2), PlayerId::new(0)), 1);
}
