//! Inbound actions.
//!
//! These are the only entry points the embedding layer calls to move the
//! game forward. Each checks that the caller may act at all, runs the
//! validator, and only then mutates. An `Err` leaves the game untouched.

use smallvec::SmallVec;
use tracing::debug;

use super::game::Game;
use super::moves::{ORANGE_CARD_CUBES, SHOP_SELECTION_SIZE};
use super::updates::{GameUpdate, UpdateTarget};
use crate::cards::{CardColor, CardModifier};
use crate::core::{CardId, EffectFlags, Expansions, FormattedString, GameError, PlayerFlags, PlayerId, Result};
use crate::effects::{
    check_prompt, check_prompt_equip, multi_target_args, slot_for, verify_equip_target, verify_play,
    verify_modifiers, EffectContext, EffectSpec, EffectType, PlayTarget,
};
use crate::events::{Event, Modifier};
use crate::fmt_str;
use crate::piles::Pile;
use crate::requests::handlers;

/// What a play does with its card.
///
/// Besides playing normally, a goldrush player may sell a Beer from hand
/// for one gold, or pay a black card's cost plus one to make its owner
/// discard it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayMode {
    #[default]
    Play,
    SellBeer,
    DiscardBlack,
}

/// A play as sent by a player: the card, its modifiers and one target per slot.
///
/// ```
/// use bang_engine::core::{CardId, PlayerId};
/// use bang_engine::effects::PlayTarget;
/// use bang_engine::rules::PlayCardArgs;
///
/// let args = PlayCardArgs::new(CardId::new(4))
///     .with_modifier(CardId::new(9))
///     .with_target(PlayTarget::Player(PlayerId::new(2)));
/// assert_eq!(args.targets.len(), 1);
/// assert!(!args.prompt_confirmed);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayCardArgs {
    pub card: CardId,
    pub modifiers: SmallVec<[CardId; 2]>,
    pub targets: Vec<PlayTarget>,
    /// Skip the warning prompt: the player already confirmed it.
    pub prompt_confirmed: bool,
    pub mode: PlayMode,
}

impl PlayCardArgs {
    #[must_use]
    pub fn new(card: CardId) -> Self {
        Self {
            card,
            modifiers: SmallVec::new(),
            targets: Vec::new(),
            prompt_confirmed: false,
            mode: PlayMode::Play,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PlayMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, card: CardId) -> Self {
        self.modifiers.push(card);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: PlayTarget) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = PlayTarget>) -> Self {
        self.targets.extend(targets);
        self
    }

    #[must_use]
    pub fn confirmed(mut self) -> Self {
        self.prompt_confirmed = true;
        self
    }
}

/// A play held back until its player answers the warning prompt.
#[derive(Clone, Debug)]
pub(crate) struct PendingPlay {
    pub(crate) player: PlayerId,
    pub(crate) args: PlayCardArgs,
    pub(crate) is_response: bool,
}

impl Game {
    fn check_known(&self, card: CardId) -> Result<()> {
        self.store
            .get_card(card)
            .map(|_| ())
            .ok_or(GameError::UnknownCard(card))
    }

    fn check_not_over(&self) -> Result<()> {
        if self.is_game_over() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    /// Hold the play back and warn the player if any of its effects asks to.
    fn prompt_first(
        &mut self,
        player: PlayerId,
        args: &PlayCardArgs,
        is_response: bool,
        message: Option<FormattedString>,
    ) -> bool {
        let Some(message) = message.filter(|_| !args.prompt_confirmed) else {
            return false;
        };
        self.pending_play = Some(PendingPlay {
            player,
            args: args.clone(),
            is_response,
        });
        self.add_update(UpdateTarget::Only(player), GameUpdate::GamePrompt(message));
        true
    }

    // === Play ===

    /// Play a card on the player's own turn, with no request pending.
    ///
    /// Hand cards are played or equipped by colour; table and character
    /// cards play their effects; cards in the shop selection are bought.
    pub fn play_card(&mut self, player: PlayerId, args: PlayCardArgs) -> Result<()> {
        self.check_not_over()?;
        self.check_known(args.card)?;
        for &modifier in &args.modifiers {
            self.check_known(modifier)?;
        }
        if self.playing != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        if self.pending_requests() > 0 {
            return Err(GameError::RequestPending);
        }
        match args.mode {
            PlayMode::Play => {}
            PlayMode::SellBeer => return self.sell_beer(player, args.card),
            PlayMode::DiscardBlack => return self.discard_black(player, args.card),
        }

        let card = args.card;
        let c = self.card(card);
        let (pile, color) = (c.pile, c.color());
        let owned = c.owner == Some(player);
        let has_effects = !c.data.effects.is_empty();
        match pile {
            Pile::ShopSelection => self.buy_card(player, &args),
            Pile::ScenarioCard if has_effects => self.play_effects(player, &args),
            Pile::PlayerHand if owned => match color {
                CardColor::Brown | CardColor::None => self.play_effects(player, &args),
                CardColor::Blue | CardColor::Green | CardColor::Orange | CardColor::Black => {
                    self.play_equip(player, &args)
                }
            },
            Pile::PlayerTable | Pile::PlayerCharacter if owned && has_effects => self.play_effects(player, &args),
            _ => Err(GameError::CantPlayCard(card)),
        }
    }

    fn play_effects(&mut self, player: PlayerId, args: &PlayCardArgs) -> Result<()> {
        let ctx = verify_play(self, player, args.card, false, &args.modifiers, &args.targets)?;
        let message = check_prompt(self, &ctx, false, &args.targets);
        if self.prompt_first(player, args, false, message) {
            return Ok(());
        }
        self.play_modifiers(player, &args.modifiers);
        self.do_play_card(ctx, false, &args.targets);
        Ok(())
    }

    fn play_equip(&mut self, player: PlayerId, args: &PlayCardArgs) -> Result<()> {
        if !args.modifiers.is_empty() {
            return Err(GameError::InvalidModifier(args.modifiers[0]));
        }
        let target = verify_equip_target(self, player, args.card, &args.targets)?;
        let message = check_prompt_equip(self, args.card, target);
        if self.prompt_first(player, args, false, message) {
            return Ok(());
        }
        self.equip_card(player, target, args.card);
        Ok(())
    }

    /// Buy a card from the shop selection.
    ///
    /// The price is the card's cost less one per discount modifier; it is
    /// waived while the selection holds more cards than usual.
    fn buy_card(&mut self, player: PlayerId, args: &PlayCardArgs) -> Result<()> {
        let card = args.card;
        let discount = args
            .modifiers
            .iter()
            .filter(|&&m| self.card(m).data.modifier == CardModifier::Discount)
            .count() as i32;
        let cost = if self.shared_pile(Pile::ShopSelection).len() > SHOP_SELECTION_SIZE {
            0
        } else {
            (self.card(card).data.buy_cost - discount).max(0)
        };
        if self.player(player).gold < cost {
            return Err(GameError::NotEnoughGold);
        }

        if self.card(card).color() == CardColor::Black {
            let target = verify_equip_target(self, player, card, &args.targets)?;
            verify_modifiers(self, player, card, &args.modifiers)?;
            let message = check_prompt_equip(self, card, target);
            if self.prompt_first(player, args, false, message) {
                return Ok(());
            }
            self.play_modifiers(player, &args.modifiers);
            self.add_gold(player, -cost);
            self.equip_card(player, target, card);
        } else {
            let ctx = verify_play(self, player, card, false, &args.modifiers, &args.targets)?;
            let message = check_prompt(self, &ctx, false, &args.targets);
            if self.prompt_first(player, args, false, message) {
                return Ok(());
            }
            self.play_modifiers(player, &args.modifiers);
            self.add_gold(player, -cost);
            self.do_play_card(ctx, false, &args.targets);
        }
        self.queue_action(|game| game.refill_shop());
        Ok(())
    }

    fn check_has_drawn(&self, player: PlayerId) -> Result<()> {
        if self.player(player).flags.contains(PlayerFlags::START_OF_TURN) {
            Err(GameError::MustDraw)
        } else {
            Ok(())
        }
    }

    /// Trade a Beer from hand for one gold.
    fn sell_beer(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        self.check_has_drawn(player)?;
        if !self.has_expansion(Expansions::GOLDRUSH) {
            return Err(GameError::InvalidAction);
        }
        let c = self.card(card);
        if c.pile != Pile::PlayerHand || c.owner != Some(player) {
            return Err(GameError::TargetNotHandCard);
        }
        if !c.data.effects_first_is(EffectType::Beer) {
            return Err(GameError::TargetNotBeer);
        }

        debug!(%player, %card, "sell beer");
        self.discard_card(player, card);
        self.add_gold(player, 1);
        self.add_log(fmt_str!("LOG_SOLD_BEER", player, card));
        self.queue_event(Event::OnPlayBeer { player });
        self.queue_event(Event::OnEffectEnd { player, card: Some(card) });
        Ok(())
    }

    /// Pay a black card's cost plus one to have its owner discard it.
    fn discard_black(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        self.check_has_drawn(player)?;
        let c = self.card(card);
        let Some(owner) = c.owner.filter(|_| c.pile == Pile::PlayerTable) else {
            return Err(GameError::TargetNotTableCard);
        };
        if owner == player {
            return Err(GameError::CantDiscardOwnBlack);
        }
        if c.color() != CardColor::Black {
            return Err(GameError::TargetNotBlack);
        }
        let cost = c.data.buy_cost + 1;
        if self.player(player).gold < cost {
            return Err(GameError::NotEnoughGold);
        }

        debug!(%player, %owner, %card, cost, "discard black");
        self.add_gold(player, -cost);
        self.discard_card(owner, card);
        self.add_log(fmt_str!("LOG_DISCARDED_BLACK", player, owner, card));
        Ok(())
    }

    /// Answer the live request with a response card.
    pub fn respond_card(&mut self, player: PlayerId, args: PlayCardArgs) -> Result<()> {
        self.check_not_over()?;
        self.check_known(args.card)?;
        if self.top_request().is_none() {
            return Err(GameError::InvalidAction);
        }
        if !self.can_respond_with(player, args.card) {
            return Err(GameError::CantPlayCard(args.card));
        }
        let ctx = verify_play(self, player, args.card, true, &args.modifiers, &args.targets)?;
        let message = check_prompt(self, &ctx, true, &args.targets);
        if self.prompt_first(player, &args, true, message) {
            return Ok(());
        }
        self.play_modifiers(player, &args.modifiers);
        self.do_play_card(ctx, true, &args.targets);
        Ok(())
    }

    /// True if `viewer` could answer the live request with `card`.
    ///
    /// The card must be somewhere its owner can use it from and enabled;
    /// any one of its response slots accepting the request is enough.
    #[must_use]
    pub fn can_respond_with(&self, viewer: PlayerId, card: CardId) -> bool {
        let Some(c) = self.store.get_card(card) else {
            return false;
        };
        if self.top_request().is_none() || c.owner != Some(viewer) || self.is_disabled(card) {
            return false;
        }
        let usable = match c.pile {
            Pile::PlayerHand => c.color() == CardColor::Brown,
            Pile::PlayerTable => !c.inactive,
            Pile::PlayerCharacter => true,
            _ => false,
        };
        usable
            && c.data
                .responses
                .iter()
                .any(|spec| spec.kind.behavior().can_respond(self, card, viewer))
    }

    // === Requests ===

    /// Answer the live request's pick prompt.
    pub fn pick_card(
        &mut self,
        player: PlayerId,
        pile: Pile,
        target_player: Option<PlayerId>,
        card: Option<CardId>,
    ) -> Result<()> {
        self.check_not_over()?;
        if let Some(card) = card {
            self.check_known(card)?;
        }
        let Some(req) = self.top_request().cloned() else {
            return Err(GameError::InvalidAction);
        };
        if req.target != player || !handlers::can_pick(self, &req, pile, target_player, card) {
            return Err(GameError::InvalidAction);
        }
        handlers::on_pick(self, req, pile, target_player, card);
        Ok(())
    }

    /// Confirm the live request without answering it: take the hit, lose the card.
    pub fn confirm_request(&mut self, player: PlayerId) -> Result<()> {
        self.check_not_over()?;
        let Some(req) = self.top_request().cloned() else {
            return Err(GameError::InvalidAction);
        };
        if req.target != player || !handlers::is_resolvable(&req) {
            return Err(GameError::InvalidAction);
        }
        handlers::on_resolve(self, req);
        Ok(())
    }

    /// Pass the turn.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<()> {
        self.check_not_over()?;
        if self.playing != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        if self.pending_requests() > 0 {
            return Err(GameError::RequestPending);
        }
        self.pass_turn(player);
        Ok(())
    }

    /// Answer the warning prompt of a held-back play.
    pub fn prompt_response(&mut self, player: PlayerId, confirm: bool) -> Result<()> {
        match self.pending_play.take() {
            Some(pending) if pending.player == player => {
                if !confirm {
                    return Ok(());
                }
                let args = pending.args.confirmed();
                if pending.is_response {
                    self.respond_card(player, args)
                } else {
                    self.play_card(player, args)
                }
            }
            other => {
                self.pending_play = other;
                Err(GameError::InvalidAction)
            }
        }
    }

    // === Execution ===

    fn play_modifiers(&mut self, player: PlayerId, modifiers: &[CardId]) {
        for &card in modifiers {
            let targets = vec![PlayTarget::None; self.card(card).data.effects.len()];
            self.do_play_card(EffectContext::new(card, player), false, &targets);
        }
    }

    fn is_immune(&self, origin_card: CardId, target: PlayerId) -> bool {
        self.apply_modifier(Modifier::Immunity {
            origin_card,
            target,
            immune: false,
        })
        .bool_value()
        .unwrap_or(false)
    }

    /// Carry out a verified play: move the card, then run each slot on its target.
    pub(crate) fn do_play_card(&mut self, ctx: EffectContext, is_response: bool, targets: &[PlayTarget]) {
        let card = ctx.origin_card;
        let origin = ctx.origin;
        let data = self.card(card).data.clone();
        debug!(%card, %origin, is_response, "play card");

        let log_key = if is_response { "LOG_RESPONDED_WITH_CARD" } else { "LOG_PLAYED_CARD" };
        match self.card(card).pile {
            Pile::PlayerHand => {
                self.move_card(card, Pile::DiscardPile, None);
                self.queue_event(Event::OnPlayHandCard { player: origin, card });
                self.add_log(fmt_str!(log_key, card, origin));
            }
            Pile::PlayerTable => {
                if data.color == CardColor::Green {
                    self.discard_card(origin, card);
                }
                self.add_log(fmt_str!("LOG_PLAYED_TABLE_CARD", card, origin));
            }
            Pile::ShopSelection => {
                if data.color == CardColor::Brown {
                    self.move_card(card, Pile::ShopDiscard, None);
                }
                self.add_log(fmt_str!("LOG_BOUGHT_CARD", card, origin));
            }
            _ => self.add_log(fmt_str!(log_key, card, origin)),
        }
        self.store.player_mut(origin).last_played_card = Some(card);

        let mut escapable = EffectFlags::empty();
        if data.color == CardColor::Brown {
            escapable.insert(EffectFlags::ESCAPABLE);
        }

        for (i, target) in targets.iter().enumerate() {
            let spec = *slot_for(&data, is_response, i);
            let behavior = spec.kind.behavior();
            match target {
                PlayTarget::None => behavior.on_play(self, &ctx, &spec),
                PlayTarget::Player(p) => {
                    if *p != origin && self.is_immune(card, *p) {
                        continue;
                    }
                    let ctx = ctx.with_flags(ctx.flags | escapable | EffectFlags::SINGLE_TARGET);
                    behavior.on_play_player(self, &ctx, &spec, *p);
                }
                PlayTarget::OtherPlayers => {
                    let ctx = ctx.with_flags(ctx.flags | escapable);
                    for p in self.other_players(origin) {
                        if !self.is_immune(card, p) {
                            behavior.on_play_player(self, &ctx, &spec, p);
                        }
                    }
                }
                PlayTarget::Card(target_card) => {
                    let ctx = ctx.with_flags(ctx.flags | escapable | EffectFlags::SINGLE_TARGET);
                    self.play_on_card(&ctx, &spec, *target_card);
                }
                PlayTarget::CardsOtherPlayers(cards) => {
                    let ctx = ctx.with_flags(ctx.flags | escapable);
                    for &target_card in cards {
                        self.play_on_card(&ctx, &spec, target_card);
                    }
                }
            }
        }

        if let Some(handler) = data.multi_target {
            handler
                .behavior()
                .on_play(self, &ctx, &multi_target_args(&data, is_response, targets));
        }
        self.queue_event(Event::OnEffectEnd {
            player: origin,
            card: Some(card),
        });
    }

    /// Run a card slot on `target_card`. A card taken from another
    /// player's hand is replaced by a random one of that hand.
    fn play_on_card(&mut self, ctx: &EffectContext, spec: &EffectSpec, target_card: CardId) {
        let Some(owner) = self.card(target_card).owner else {
            return;
        };
        if owner != ctx.origin && self.is_immune(ctx.origin_card, owner) {
            return;
        }
        let card = if owner != ctx.origin && self.card(target_card).pile == Pile::PlayerHand {
            self.random_hand_card(owner).unwrap_or(target_card)
        } else {
            target_card
        };
        spec.kind.behavior().on_play_card(self, ctx, spec, owner, card);
    }

    /// Put a card on `target`'s table and run its equips.
    pub(crate) fn equip_card(&mut self, origin: PlayerId, target: PlayerId, card: CardId) {
        let data = self.card(card).data.clone();
        if data.color == CardColor::Orange && self.is_immune(card, target) {
            self.discard_card(origin, card);
            self.queue_event(Event::OnEffectEnd { player: origin, card: Some(card) });
            return;
        }
        for spec in &data.equips {
            spec.kind.behavior().on_pre_equip(self, card, target, spec);
        }
        self.move_card(card, Pile::PlayerTable, Some(target));
        self.equip_if_enabled(card);

        match data.color {
            CardColor::Green => self.set_inactive(card, true),
            CardColor::Orange => self.add_cubes(card, ORANGE_CARD_CUBES),
            _ => {}
        }
        if origin == target {
            self.add_log(fmt_str!("LOG_EQUIPPED_CARD", card, origin));
        } else {
            self.add_log(fmt_str!("LOG_EQUIPPED_CARD_TO", card, origin, target));
        }
        if data.color == CardColor::Blue
            && self.has_expansion(Expansions::ARMEDANDDANGEROUS)
            && self.free_cube_slots(origin) > 0
        {
            self.queue_request_add_cube(None, origin, 1);
        }
        self.queue_event(Event::OnEquip { origin, target, card });
        self.queue_event(Event::OnEffectEnd { player: origin, card: Some(card) });
    }
}
