//! Handlers playing the whole target list of a card at once.

use crate::core::{CardId, GameError, PlayerId, Result};
use crate::piles::Pile;
use crate::requests::{Request, RequestKind};
use crate::rules::Game;

use super::dispatch::{EffectContext, MultiTargetBehavior};
use super::targeting::PlayTarget;

fn split_targets(targets: &[PlayTarget]) -> (Vec<CardId>, Option<PlayerId>) {
    let mut cards = Vec::new();
    let mut player = None;
    for target in targets {
        match target {
            PlayTarget::Card(card) => cards.push(*card),
            PlayTarget::Player(p) => player = Some(*p),
            _ => {}
        }
    }
    (cards, player)
}

/// Discard two hand cards, then Bang a player in range.
pub struct DocHolydayHandler;

impl MultiTargetBehavior for DocHolydayHandler {
    fn verify(&self, game: &Game, ctx: &EffectContext, targets: &[PlayTarget]) -> Result<()> {
        let (cards, player) = split_targets(targets);
        let [first, second] = cards.as_slice() else {
            return Err(GameError::InvalidTargets);
        };
        if first == second {
            return Err(GameError::TargetsNotDistinct);
        }
        for &card in &cards {
            let c = game.card(card);
            if c.pile != Pile::PlayerHand || c.owner != Some(ctx.origin) {
                return Err(GameError::TargetNotHandCard);
            }
        }
        if player.is_none() {
            return Err(GameError::InvalidTargets);
        }
        Ok(())
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, targets: &[PlayTarget]) {
        let (cards, player) = split_targets(targets);
        for card in cards {
            game.discard_card(ctx.origin, card);
        }
        if let Some(target) = player {
            game.queue_request(
                Request::new(RequestKind::bang(), target)
                    .with_origin(Some(ctx.origin_card), Some(ctx.origin))
                    .with_flags(ctx.flags),
            );
        }
    }
}
