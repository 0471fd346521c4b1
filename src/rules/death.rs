//! Hit points, gold, elimination and the end of the game.

use tracing::debug;

use super::game::Game;
use super::roles::Role;
use super::updates::{GameUpdate, UpdateTarget};
use crate::core::{CardId, EffectFlags, Expansions, PlayerFlags, PlayerId, ScenarioFlags};
use crate::events::{Event, Modifier};
use crate::fmt_str;
use crate::requests::{Request, RequestKind};

/// Cards drawn as a reward for an elimination.
const KILL_REWARD_CARDS: usize = 3;

impl Game {
    pub fn set_hp(&mut self, player: PlayerId, hp: i32) {
        self.store.player_mut(player).hp = hp;
        self.add_update(UpdateTarget::All, GameUpdate::PlayerHp { player, hp });
    }

    /// Set the ceiling healing stops at. Character equips do this at set-up.
    pub fn set_max_hp(&mut self, player: PlayerId, max_hp: i32) {
        self.store.player_mut(player).max_hp = max_hp;
        self.send_player_status(player);
    }

    /// True for players that neither take damage nor heal.
    fn is_untouchable(&self, player: PlayerId) -> bool {
        let p = self.player(player);
        p.is_ghost() || (p.hp <= 0 && self.has_scenario(ScenarioFlags::GHOSTTOWN)) || !self.is_alive(player)
    }

    /// Deal `value` damage to `target`.
    ///
    /// Under the valley of shadows the damage waits on a front
    /// `TimerDamaging` request unless `instant` is set. Dropping to 0 hp
    /// or below puts a `Death` request in front of everything else.
    pub fn damage(
        &mut self,
        origin_card: Option<CardId>,
        origin: Option<PlayerId>,
        target: PlayerId,
        value: i32,
        is_bang: bool,
        instant: bool,
    ) {
        if value <= 0 || self.is_untouchable(target) {
            return;
        }
        if !instant && self.has_expansion(Expansions::VALLEYOFSHADOWS) {
            let ticks = self.options.damage_timer;
            self.queue_request_front(
                Request::new(RequestKind::TimerDamaging { damage: value, is_bang, ticks }, target)
                    .with_origin(origin_card, origin),
            );
            return;
        }

        let hp = self.player(target).hp - value;
        self.set_hp(target, hp);
        let key = if value == 1 { "LOG_TAKEN_DAMAGE" } else { "LOG_TAKEN_DAMAGE_PLURAL" };
        self.add_log(fmt_str!(key, target, value).with_opt(origin_card));
        debug!(%target, value, hp, "damage");

        if hp <= 0 {
            self.queue_request_front(
                Request::new(RequestKind::Death { draw_attempts: Default::default() }, target)
                    .with_origin(origin_card, origin),
            );
        }
        if self.has_expansion(Expansions::GOLDRUSH) {
            if let Some(origin) = origin.filter(|&o| o != target && self.playing == Some(o)) {
                self.add_gold(origin, value);
            }
        }
        self.queue_event(Event::OnHit {
            origin_card,
            origin,
            target,
            damage: value,
            is_bang,
        });
    }

    /// Restore up to `value` hit points, never past max hp.
    pub fn heal(&mut self, player: PlayerId, value: i32) {
        if self.is_untouchable(player) {
            return;
        }
        let p = self.player(player);
        let hp = (p.hp + value).min(p.max_hp);
        if hp != p.hp {
            self.set_hp(player, hp);
        }
    }

    pub fn add_gold(&mut self, player: PlayerId, amount: i32) {
        let gold = (self.player(player).gold + amount).max(0);
        self.store.player_mut(player).gold = gold;
        self.add_update(UpdateTarget::All, GameUpdate::PlayerGold { player, gold });
    }

    /// True if `target` may answer `origin_card` with an escape.
    ///
    /// Escapable cards always can under the valley of shadows; otherwise
    /// only an `Escapable` modifier grants it.
    #[must_use]
    pub fn can_escape(&self, origin: PlayerId, origin_card: CardId, target: PlayerId, flags: EffectFlags) -> bool {
        if flags.contains(EffectFlags::ESCAPABLE) && self.has_expansion(Expansions::VALLEYOFSHADOWS) {
            return true;
        }
        self.apply_modifier(Modifier::Escapable {
            origin_card,
            origin,
            target,
            flags,
            escapable: false,
        })
        .bool_value()
        .unwrap_or(false)
    }

    /// Eliminate `target`.
    ///
    /// The character equips are torn down before the cards go, so nothing
    /// the dead player held reacts to its own elimination.
    pub fn player_death(&mut self, killer: Option<PlayerId>, target: PlayerId) {
        debug!(%target, ?killer, "player death");
        if killer != Some(target) {
            self.add_log(fmt_str!("LOG_PLAYER_KILLED", target).with_opt(killer));
        } else {
            self.add_log(fmt_str!("LOG_SUICIDE", target));
        }

        {
            let p = self.store.player_mut(target);
            p.flags.insert(PlayerFlags::DEAD);
            p.flags.remove(PlayerFlags::GHOST);
            p.hp = 0;
        }
        if self.first_dead.is_none() {
            self.first_dead = Some(target);
        }

        self.call_event(Event::OnPlayerDeath { killer, target });

        let characters: Vec<CardId> = self.player(target).characters.iter().copied().collect();
        for card in characters {
            if !self.is_disabled(card) {
                self.unequip_card_effects(card);
            }
            self.drop_all_cubes(card);
        }
        self.discard_all(target);
        if self.player(target).gold != 0 {
            self.store.player_mut(target).gold = 0;
            self.add_update(UpdateTarget::All, GameUpdate::PlayerGold { player: target, gold: 0 });
        }

        self.add_update(UpdateTarget::All, GameUpdate::PlayerHp { player: target, hp: 0 });
        let role = self.player(target).role;
        self.add_update(UpdateTarget::All, GameUpdate::PlayerShowRole { player: target, role });
        if !self.has_expansion(Expansions::GHOSTCARDS) {
            self.add_update(UpdateTarget::All, GameUpdate::PlayerRemove { player: target });
        }
    }

    /// Decide the game after an elimination, or hand out the rewards.
    pub fn check_game_over(&mut self, killer: Option<PlayerId>, target: PlayerId) {
        let killer = killer.filter(|&k| self.playing == Some(k));
        if let Some(winner) = self.find_winner(killer, target) {
            self.game_over(winner);
            return;
        }

        let Some(killer) = killer.filter(|&k| k != target) else {
            if self.playing == Some(target) {
                let next = self.get_next_in_turn(target);
                self.queue_action(move |game| game.start_of_turn(next));
            }
            return;
        };

        let target_role = self.player(target).role;
        if self.players().len() > 3 {
            match target_role {
                Role::Outlaw => self.draw_reward(killer),
                Role::Deputy if self.player(killer).role == Role::Sheriff => {
                    self.add_log(fmt_str!("LOG_SHERIFF_KILLED_DEPUTY", killer));
                    self.discard_all(killer);
                }
                _ => {}
            }
        } else {
            self.draw_reward(killer);
        }
    }

    fn draw_reward(&mut self, player: PlayerId) {
        for _ in 0..KILL_REWARD_CARDS {
            self.draw_card(player);
        }
    }

    /// End the game: reveal every role and drop everything pending.
    pub(crate) fn game_over(&mut self, winner: Role) {
        debug!(?winner, "game over");
        self.winner = Some(winner);
        for id in self.players().player_ids().collect::<Vec<_>>() {
            let role = self.player(id).role;
            self.add_update(UpdateTarget::All, GameUpdate::PlayerShowRole { player: id, role });
        }
        self.requests.clear();
        self.current_check = None;
        self.pending_play = None;
        self.add_log(fmt_str!("LOG_GAME_OVER"));
        self.add_update(UpdateTarget::All, GameUpdate::GameOver { winner });
    }
}
