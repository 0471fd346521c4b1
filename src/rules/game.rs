//! The game aggregate root: state, seating and distance.

use im::Vector;
use smallvec::SmallVec;
use tracing::debug;

use super::actions::PendingPlay;
use super::draw_check::DrawCheck;
use super::roles::Role;
use super::updates::UpdateRecord;
use crate::cards::{Card, CardData, CardSign};
use crate::core::{
    CardId, Expansions, GameOptions, GameRng, PlayerFlags, PlayerId, PlayerMap, ScenarioFlags,
};
use crate::effects::EffectType;
use crate::events::{DisablerRegistry, EventBus, Modifier};
use crate::piles::{Pile, PileStore, Player};
use crate::requests::RequestQueue;

/// A game of Bang!.
///
/// Owns every card and player, the event bus, the disablers and the
/// request queue. All rules code takes `&mut Game`; queries take `&Game`
/// and never mutate.
pub struct Game {
    pub(crate) store: PileStore,
    pub(crate) bus: EventBus,
    pub(crate) disablers: DisablerRegistry,
    pub(crate) requests: RequestQueue,
    pub(crate) scenario_flags: ScenarioFlags,
    pub(crate) options: GameOptions,
    pub(crate) rng: GameRng,
    pub(crate) updates: Vec<UpdateRecord>,

    /// Player in turn.
    pub(crate) playing: Option<PlayerId>,
    pub(crate) first_player: Option<PlayerId>,
    pub(crate) first_dead: Option<PlayerId>,

    pub(crate) current_check: Option<DrawCheck>,
    pub(crate) pending_play: Option<PendingPlay>,
    pub(crate) winner: Option<Role>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("playing", &self.playing)
            .field("requests", &self.requests)
            .field("scenario_flags", &self.scenario_flags)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// An empty table: one player per role, no cards, nobody in turn.
    ///
    /// Use [`GameBuilder`](super::GameBuilder) for a dealt game.
    pub fn new(roles: &[Role], options: GameOptions) -> Self {
        let players = PlayerMap::new(roles.len(), |id| Player::new(id, roles[id.index()]));
        Self {
            store: PileStore::new(players),
            bus: EventBus::new(),
            disablers: DisablerRegistry::new(),
            requests: RequestQueue::new(),
            scenario_flags: ScenarioFlags::empty(),
            rng: GameRng::new(options.seed),
            options,
            updates: Vec::new(),
            playing: None,
            first_player: None,
            first_dead: None,
            current_check: None,
            pending_play: None,
            winner: None,
        }
    }

    /// Create a card directly in a pile, without updates or equip hooks.
    ///
    /// Meant for set-up: the builder deals through it, and scenarios can
    /// be staged with it before play starts.
    pub fn add_card(&mut self, data: CardData, pile: Pile, owner: Option<PlayerId>) -> CardId {
        self.store.add_card(data, pile, owner)
    }

    // === Queries ===

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// The pile store, for inspection and snapshots.
    #[must_use]
    pub fn store(&self) -> &PileStore {
        &self.store
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        self.store.card(id)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        self.store.player(id)
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        self.store.players()
    }

    #[must_use]
    pub fn shared_pile(&self, pile: Pile) -> &Vector<CardId> {
        self.store.shared(pile)
    }

    #[must_use]
    pub fn playing(&self) -> Option<PlayerId> {
        self.playing
    }

    #[must_use]
    pub fn first_player(&self) -> Option<PlayerId> {
        self.first_player
    }

    /// Winning side once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn has_scenario(&self, flag: ScenarioFlags) -> bool {
        self.scenario_flags.contains(flag)
    }

    #[must_use]
    pub fn has_expansion(&self, expansion: Expansions) -> bool {
        self.options.has_expansion(expansion)
    }

    /// Alive players, plus ghosts playing on.
    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        let p = self.player(player);
        !p.is_dead() || p.is_ghost()
    }

    #[must_use]
    pub fn num_alive(&self) -> usize {
        self.players().player_ids().filter(|&p| self.is_alive(p)).count()
    }

    // === Seating ===

    /// Next alive player in seat order. Never affected by rotation.
    #[must_use]
    pub fn get_next_player(&self, player: PlayerId) -> PlayerId {
        let n = self.players().len();
        let mut next = player.next_seat(n);
        while next != player && !self.is_alive(next) {
            next = next.next_seat(n);
        }
        next
    }

    /// Next player to take a turn after `player`.
    ///
    /// Follows the rotation scenario. Dead players are skipped unless a
    /// scenario keeps them in the rotation.
    #[must_use]
    pub fn get_next_in_turn(&self, player: PlayerId) -> PlayerId {
        let n = self.players().len();
        let step = |p: PlayerId| {
            if self.has_scenario(ScenarioFlags::INVERT_ROTATION) {
                p.prev_seat(n)
            } else {
                p.next_seat(n)
            }
        };
        let eligible = |p: PlayerId| {
            self.is_alive(p)
                || self.has_scenario(ScenarioFlags::GHOSTTOWN)
                || (self.has_scenario(ScenarioFlags::DEADMAN) && self.first_dead == Some(p))
        };
        let mut next = step(player);
        while next != player && !eligible(next) {
            next = step(next);
        }
        next
    }

    /// Alive players other than `origin`, in seat order after it.
    #[must_use]
    pub fn other_players(&self, origin: PlayerId) -> SmallVec<[PlayerId; 8]> {
        let n = self.players().len();
        let mut others = SmallVec::new();
        let mut p = origin.next_seat(n);
        while p != origin {
            if self.is_alive(p) {
                others.push(p);
            }
            p = p.next_seat(n);
        }
        others
    }

    /// Distance from `from` to `to`.
    ///
    /// Shortest way around the table counting alive players only, plus
    /// the distance modifier of `to`. Not symmetric: a horse on `to`
    /// makes `to` harder to reach but does not change how far `to` sees.
    #[must_use]
    pub fn distance(&self, from: PlayerId, to: PlayerId) -> i32 {
        if from == to {
            return 0;
        }
        let to_player = self.player(to);
        if self.player(from).has_flag(PlayerFlags::DISABLE_PLAYER_DISTANCES) {
            return to_player.distance_mod;
        }
        if self.player(from).has_flag(PlayerFlags::SEE_EVERYONE_RANGE_1) {
            return 1;
        }
        let n = self.players().len();
        let count = |start: PlayerId, end: PlayerId| {
            let mut d = 1;
            let mut p = start.next_seat(n);
            while p != end && p != start {
                if self.is_alive(p) {
                    d += 1;
                }
                p = p.next_seat(n);
            }
            d
        };
        count(from, to).min(count(to, from)) + to_player.distance_mod
    }

    // === Card queries ===

    /// The sign a card counts as when `origin` checks it.
    #[must_use]
    pub fn card_sign(&self, _origin: PlayerId, card: CardId) -> Option<CardSign> {
        let sign = self.card(card).data.sign;
        match self.apply_modifier(Modifier::Sign { card, sign }) {
            Modifier::Sign { sign, .. } => sign,
            _ => sign,
        }
    }

    /// True if `origin` may use the card as a Bang.
    #[must_use]
    pub fn is_bangcard(&self, origin: PlayerId, card: CardId) -> bool {
        let player = self.player(origin);
        let data = &self.card(card).data;
        player.has_flag(PlayerFlags::TREAT_ANY_AS_BANG)
            || data.effects_last_is(EffectType::BangCard)
            || (player.has_flag(PlayerFlags::TREAT_MISSED_AS_BANG) && data.responses_last_is(EffectType::MissedCard))
    }

    // === Randomness ===

    /// A random card of the player's hand.
    pub fn random_hand_card(&mut self, player: PlayerId) -> Option<CardId> {
        let hand = &self.store.player(player).hand;
        if hand.is_empty() {
            return None;
        }
        let index = self.rng.gen_range_usize(0..hand.len());
        hand.get(index).copied()
    }

    /// Shuffle a shared pile with the game's RNG.
    pub(crate) fn shuffle_pile(&mut self, pile: Pile) {
        debug!(?pile, "shuffle");
        self.store.shuffle(pile, &mut self.rng);
    }
}

#[cfg(test)]
impl Game {
    /// A table of players with the given roles at 4 of 4 hp.
    pub(crate) fn with_roles(roles: &[Role]) -> Self {
        let mut game = Self::new(roles, GameOptions::default());
        for (_, p) in game.store.players_mut().iter_mut() {
            p.hp = 4;
            p.max_hp = 4;
        }
        game
    }

    /// A sheriff in seat 0 and outlaws everywhere else, at 4 of 4 hp.
    pub(crate) fn test_game(num_players: usize) -> Self {
        let roles: Vec<Role> = (0..num_players)
            .map(|i| if i == 0 { Role::Sheriff } else { Role::Outlaw })
            .collect();
        Self::with_roles(&roles)
    }

    pub(crate) fn add_test_card(&mut self, data: CardData, pile: Pile, owner: Option<PlayerId>) -> CardId {
        self.add_card(data, pile, owner)
    }
}
