//! Effect behaviours.
//!
//! One unit struct per [`EffectType`](super::EffectType) tag, implementing
//! only the hooks its tag supports.

use crate::cards::Suit;
use crate::core::{CardId, EffectFlags, FormattedString, GameError, PlayerFlags, PlayerId, Result};
use crate::events::{Event, Modifier};
use crate::fmt_str;
use crate::piles::Pile;
use crate::requests::{handlers, Request, RequestKind, RequestTag};
use crate::rules::Game;

use super::dispatch::{EffectBehavior, EffectContext};
use super::effect::EffectSpec;

/// Take one Missed off the live Bang; at zero the Bang is dodged.
pub(crate) fn apply_missed(game: &mut Game) {
    let remaining = match game.top_request_mut() {
        Some(Request {
            kind: RequestKind::Bang { strength, .. },
            ..
        }) => {
            *strength -= 1;
            *strength
        }
        _ => return,
    };
    if remaining > 0 {
        game.send_request_update();
        return;
    }
    if let Some(req) = game.top_request().cloned() {
        let is_bang = matches!(req.kind, RequestKind::Bang { is_bang_card: true, .. });
        game.call_event(Event::OnMissed {
            origin_card: req.origin_card,
            origin: req.origin,
            target: req.target,
            is_bang,
        });
        game.pop_request(Some(RequestTag::Bang));
    }
}

/// Move `card` into the hand of `origin`.
pub fn resolve_steal(game: &mut Game, origin_card: Option<CardId>, origin: PlayerId, card: CardId) {
    let Some(target) = game.card(card).owner else {
        return;
    };
    game.call_event(Event::OnDiscardCard { origin, target, card });
    if origin != target {
        game.add_log(fmt_str!("LOG_STOLEN_CARD", origin, target, card).with_opt(origin_card));
    } else {
        game.add_log(fmt_str!("LOG_STOLEN_SELF_CARD", origin, card));
    }
    game.steal_card(origin, card);
}

/// Discard `card` from wherever its owner holds it.
pub fn resolve_destroy(game: &mut Game, origin_card: Option<CardId>, origin: PlayerId, card: CardId) {
    let Some(target) = game.card(card).owner else {
        return;
    };
    game.call_event(Event::OnDiscardCard { origin, target, card });
    if origin != target {
        game.add_log(fmt_str!("LOG_DISCARDED_CARD", origin, target, card).with_opt(origin_card));
    } else {
        game.add_log(fmt_str!("LOG_DISCARDED_SELF_CARD", origin, card));
    }
    game.discard_card(target, card);
}

fn queue_targeted(game: &mut Game, ctx: &EffectContext, kind: RequestKind, target: PlayerId) {
    game.queue_request(
        Request::new(kind, target)
            .with_origin(Some(ctx.origin_card), Some(ctx.origin))
            .with_flags(ctx.flags),
    );
}

pub struct MaxUsagesEffect;

impl EffectBehavior for MaxUsagesEffect {
    fn verify(&self, game: &Game, ctx: &EffectContext, spec: &EffectSpec) -> Result<()> {
        if game.card(ctx.origin_card).usages >= spec.value {
            return Err(GameError::MaxUsages {
                card: ctx.origin_card,
                max: spec.value,
            });
        }
        Ok(())
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        game.store.card_mut(ctx.origin_card).usages += 1;
    }
}

/// Lose one hit point on purpose.
pub struct DamageEffect;

impl EffectBehavior for DamageEffect {
    fn verify_player(&self, game: &Game, _ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) -> Result<()> {
        if game.player(target).hp <= 1 {
            return Err(GameError::CantSelfDamage);
        }
        Ok(())
    }

    fn on_play_player(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        game.damage(Some(ctx.origin_card), Some(ctx.origin), target, 1, false, false);
    }
}

pub struct BangEffect;

impl EffectBehavior for BangEffect {
    fn on_play_player(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        queue_targeted(game, ctx, RequestKind::bang(), target);
    }
}

pub struct BangCardEffect;

impl EffectBehavior for BangCardEffect {
    fn on_play_player(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        let strength = game
            .apply_modifier(Modifier::Bang {
                origin: ctx.origin,
                strength: 1,
            })
            .int_value()
            .unwrap_or(1);
        let kind = RequestKind::Bang {
            strength,
            damage: 1,
            unavoidable: false,
            is_bang_card: true,
            cards_used: Default::default(),
        };
        let ctx = ctx.with_flags(ctx.flags | EffectFlags::IS_BANG);
        queue_targeted(game, &ctx, kind, target);
    }
}

pub struct BangLimitEffect;

impl EffectBehavior for BangLimitEffect {
    fn verify(&self, game: &Game, ctx: &EffectContext, _spec: &EffectSpec) -> Result<()> {
        let unlimited = game
            .apply_modifier(Modifier::Volcanic {
                player: ctx.origin,
                unlimited: false,
            })
            .bool_value()
            .unwrap_or(false);
        let player = game.player(ctx.origin);
        if !unlimited && player.bangs_played >= player.bangs_per_turn + ctx.extra_bangs {
            return Err(GameError::OneBangPerTurn);
        }
        Ok(())
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        game.store.player_mut(ctx.origin).bangs_played += 1;
    }
}

fn can_miss(game: &Game, origin: PlayerId) -> bool {
    matches!(
        game.top_request(),
        Some(Request { target, kind: RequestKind::Bang { unavoidable: false, .. }, .. }) if *target == origin
    )
}

pub struct MissedEffect;

impl EffectBehavior for MissedEffect {
    fn can_respond(&self, game: &Game, _card: CardId, origin: PlayerId) -> bool {
        can_miss(game, origin)
    }

    fn on_play(&self, game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec) {
        apply_missed(game);
    }
}

/// A Bang answering Indians or a duel.
pub struct BangResponseEffect;

impl EffectBehavior for BangResponseEffect {
    fn can_respond(&self, game: &Game, _card: CardId, origin: PlayerId) -> bool {
        game.top_request_is(RequestTag::Indians, Some(origin))
            || game.top_request_is(RequestTag::Duel, Some(origin))
            || (can_miss(game, origin) && game.player(origin).has_flag(PlayerFlags::TREAT_MISSED_AS_BANG))
    }

    fn on_play(&self, game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec) {
        if game.top_request_is(RequestTag::Bang, None) {
            apply_missed(game);
        } else {
            handlers::answer_with_bang(game);
        }
    }
}

pub struct BarrelEffect;

impl EffectBehavior for BarrelEffect {
    fn can_respond(&self, game: &Game, card: CardId, origin: PlayerId) -> bool {
        can_miss(game, origin)
            && matches!(
                game.top_request(),
                Some(Request { kind: RequestKind::Bang { cards_used, .. }, .. }) if !cards_used.contains(&card)
            )
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        if let Some(Request {
            kind: RequestKind::Bang { cards_used, .. },
            ..
        }) = game.top_request_mut()
        {
            cards_used.push(ctx.origin_card);
        }
        game.send_request_update();

        let target = ctx.origin;
        game.draw_check_then(target, Some(ctx.origin_card), move |game, drawn| {
            let hearts = game.card_sign(target, drawn).is_some_and(|s| s.suit == Suit::Hearts);
            if hearts && can_miss(game, target) {
                apply_missed(game);
            }
        });
    }
}

pub struct IndiansEffect;

impl EffectBehavior for IndiansEffect {
    fn on_play_player(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        queue_targeted(game, ctx, RequestKind::Indians, target);
    }
}

pub struct DuelEffect;

impl EffectBehavior for DuelEffect {
    fn on_play_player(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        queue_targeted(game, ctx, RequestKind::Duel { respond_to: ctx.origin }, target);
    }
}

/// Reveal one card per alive player; everyone picks one in turn.
pub struct GeneralStoreEffect;

impl EffectBehavior for GeneralStoreEffect {
    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        for _ in 0..game.num_alive() {
            game.draw_card_to(Pile::Selection, None);
        }
        game.queue_request(
            Request::new(RequestKind::GeneralStore, ctx.origin).with_origin(Some(ctx.origin_card), Some(ctx.origin)),
        );
    }
}

pub struct BeerEffect;

impl BeerEffect {
    fn has_effect(game: &Game) -> bool {
        game.players().len() <= 2 || game.num_alive() > 2
    }
}

impl EffectBehavior for BeerEffect {
    /// A Beer only saves from death while more than two players are alive.
    fn verify_player(&self, game: &Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) -> Result<()> {
        if game.top_request_is(RequestTag::Death, Some(target)) && !Self::has_effect(game) {
            return Err(GameError::CantPlayCard(ctx.origin_card));
        }
        Ok(())
    }

    fn prompt_player(
        &self,
        game: &Game,
        ctx: &EffectContext,
        _spec: &EffectSpec,
        target: PlayerId,
    ) -> Option<FormattedString> {
        let player = game.player(target);
        if !Self::has_effect(game) || player.hp >= player.max_hp {
            return Some(fmt_str!("PROMPT_CARD_NO_EFFECT", ctx.origin_card));
        }
        None
    }

    fn on_play_player(&self, game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        game.queue_event(Event::OnPlayBeer { player: target });
        if Self::has_effect(game) {
            let amount = game
                .apply_modifier(Modifier::Beer { player: target, amount: 1 })
                .int_value()
                .unwrap_or(1);
            game.heal(target, amount);
        }
    }
}

pub struct HealEffect;

impl EffectBehavior for HealEffect {
    fn on_play_player(&self, game: &mut Game, _ctx: &EffectContext, spec: &EffectSpec, target: PlayerId) {
        game.heal(target, spec.value.max(1));
    }
}

pub struct HealNotFullEffect;

impl EffectBehavior for HealNotFullEffect {
    fn verify_player(&self, game: &Game, _ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) -> Result<()> {
        let player = game.player(target);
        if player.hp >= player.max_hp {
            return Err(GameError::CantHealPastFullHp);
        }
        Ok(())
    }

    fn on_play_player(&self, game: &mut Game, _ctx: &EffectContext, spec: &EffectSpec, target: PlayerId) {
        game.heal(target, spec.value.max(1));
    }
}

pub struct SaloonEffect;

impl EffectBehavior for SaloonEffect {
    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        let mut player = ctx.origin;
        loop {
            game.heal(player, 1);
            player = game.get_next_player(player);
            if player == ctx.origin {
                break;
            }
        }
    }
}

/// Leaves the death request once the player is back above 0 hp.
pub struct DeathSaveEffect;

impl EffectBehavior for DeathSaveEffect {
    fn can_respond(&self, game: &Game, _card: CardId, origin: PlayerId) -> bool {
        matches!(
            game.top_request(),
            Some(Request { target, kind: RequestKind::Death { draw_attempts }, .. })
                if *target == origin && draw_attempts.is_empty()
        )
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        if game.player(ctx.origin).hp > 0 {
            game.pop_request(Some(RequestTag::Death));
        }
    }
}

pub struct StealEffect;

impl EffectBehavior for StealEffect {
    fn on_play_card(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId, card: CardId) {
        if target != ctx.origin && game.can_escape(ctx.origin, ctx.origin_card, target, ctx.flags) {
            queue_targeted(game, ctx, RequestKind::Steal { card }, target);
        } else {
            resolve_steal(game, Some(ctx.origin_card), ctx.origin, card);
        }
    }
}

pub struct DestroyEffect;

impl EffectBehavior for DestroyEffect {
    fn on_play_card(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId, card: CardId) {
        if target != ctx.origin && game.can_escape(ctx.origin, ctx.origin_card, target, ctx.flags) {
            queue_targeted(game, ctx, RequestKind::Destroy { card }, target);
        } else {
            resolve_destroy(game, Some(ctx.origin_card), ctx.origin, card);
        }
    }
}

pub struct DrawEffect;

impl EffectBehavior for DrawEffect {
    fn on_play_player(&self, game: &mut Game, _ctx: &EffectContext, spec: &EffectSpec, target: PlayerId) {
        for _ in 0..spec.value.max(1) {
            if let Some(card) = game.draw_card_to(Pile::PlayerHand, Some(target)) {
                game.add_log(fmt_str!("LOG_DRAWN_CARD", target, card));
            }
        }
    }
}

pub struct DrawDiscardEffect;

impl EffectBehavior for DrawDiscardEffect {
    fn verify_player(&self, game: &Game, _ctx: &EffectContext, _spec: &EffectSpec, _target: PlayerId) -> Result<()> {
        if game.shared_pile(Pile::DiscardPile).is_empty() {
            return Err(GameError::DiscardPileEmpty);
        }
        Ok(())
    }

    fn on_play_player(&self, game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec, target: PlayerId) {
        if let Some(card) = game.store.top_of(Pile::DiscardPile) {
            game.add_log(fmt_str!("LOG_DRAWN_FROM_DISCARD", target, card));
            game.move_card(card, Pile::PlayerHand, Some(target));
        }
    }
}

pub struct DrawToDiscardEffect;

impl EffectBehavior for DrawToDiscardEffect {
    fn on_play(&self, game: &mut Game, _ctx: &EffectContext, spec: &EffectSpec) {
        for _ in 0..spec.value.max(1) {
            game.draw_card_to(Pile::DiscardPile, None);
        }
    }
}

/// Cancel an escapable request.
pub struct EscapeEffect;

impl EffectBehavior for EscapeEffect {
    fn can_respond(&self, game: &Game, _card: CardId, origin: PlayerId) -> bool {
        let Some(req) = game.top_request() else {
            return false;
        };
        let (Some(origin_card), Some(from)) = (req.origin_card, req.origin) else {
            return false;
        };
        req.target == origin
            && req.flags.contains(EffectFlags::ESCAPABLE)
            && game.can_escape(from, origin_card, origin, req.flags)
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, _spec: &EffectSpec) {
        game.add_log(fmt_str!("LOG_ESCAPED", ctx.origin, ctx.origin_card));
        game.pop_request(None);
    }
}

pub struct AddGoldEffect;

impl EffectBehavior for AddGoldEffect {
    fn on_play(&self, game: &mut Game, ctx: &EffectContext, spec: &EffectSpec) {
        game.add_gold(ctx.origin, spec.value.max(1));
    }

    fn on_play_player(&self, game: &mut Game, _ctx: &EffectContext, spec: &EffectSpec, target: PlayerId) {
        game.add_gold(target, spec.value.max(1));
    }
}

pub struct PayGoldEffect;

impl EffectBehavior for PayGoldEffect {
    fn verify(&self, game: &Game, ctx: &EffectContext, spec: &EffectSpec) -> Result<()> {
        if game.player(ctx.origin).gold < spec.value {
            return Err(GameError::NotEnoughGold);
        }
        Ok(())
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, spec: &EffectSpec) {
        game.add_gold(ctx.origin, -spec.value);
    }
}

/// Pay cubes from the played card itself.
pub struct PayCubeEffect;

impl EffectBehavior for PayCubeEffect {
    fn verify(&self, game: &Game, ctx: &EffectContext, spec: &EffectSpec) -> Result<()> {
        if (game.card(ctx.origin_card).cubes.len() as i32) < spec.value.max(1) {
            return Err(GameError::NotEnoughCubes);
        }
        Ok(())
    }

    fn on_play(&self, game: &mut Game, ctx: &EffectContext, spec: &EffectSpec) {
        game.pay_cubes(ctx.origin_card, spec.value.max(1) as usize);
    }
}

pub struct AddCubeEffect;

impl EffectBehavior for AddCubeEffect {
    fn on_play_card(&self, game: &mut Game, _ctx: &EffectContext, spec: &EffectSpec, _target: PlayerId, card: CardId) {
        game.add_cubes(card, spec.value.max(1) as usize);
    }
}

/// Slots whose targets are consumed elsewhere (repeat markers, multi-target input).
pub struct MarkerEffect;

impl EffectBehavior for MarkerEffect {
    fn on_play(&self, _game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec) {}

    fn on_play_player(&self, _game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec, _target: PlayerId) {}

    fn on_play_card(&self, _game: &mut Game, _ctx: &EffectContext, _spec: &EffectSpec, _target: PlayerId, _card: CardId) {}
}
