//! Game set-up.
//!
//! `GameBuilder` deals roles, characters and starting hands from a
//! [`CardCatalog`], shuffles the decks and opens the first turn.

use tracing::debug;

use super::game::Game;
use super::roles::deal_roles;
use super::updates::{GameUpdate, UpdateTarget};
use crate::cards::{CardCatalog, CardData};
use crate::core::{Expansions, GameOptions, GameRng, PlayerFlags, PlayerId};
use crate::events::Modifier;
use crate::fmt_str;
use crate::piles::Pile;
use crate::requests::{Request, RequestKind};

/// Builder for a ready-to-play game.
///
/// ## Example
///
/// ```
/// use bang_engine::rules::GameBuilder;
/// use bang_engine::core::Expansions;
///
/// let game = GameBuilder::new()
///     .player_count(5)
///     .expansion(Expansions::DODGECITY)
///     .build(42);
///
/// assert_eq!(game.players().len(), 5);
/// assert!(game.playing().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    player_count: usize,
    options: GameOptions,
    catalog: Option<CardCatalog>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            player_count: 4,
            options: GameOptions::default(),
            catalog: None,
        }
    }
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics unless `count` is between 3 and 8.
    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        assert!((3..=8).contains(&count), "player count must be 3-8");
        self.player_count = count;
        self
    }

    /// Replace the options; the seed passed to [`build`](Self::build) wins.
    #[must_use]
    pub fn options(mut self, options: GameOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn expansion(mut self, expansion: Expansions) -> Self {
        self.options = self.options.with_expansion(expansion);
        self
    }

    #[must_use]
    pub fn character_choice(mut self, enabled: bool) -> Self {
        self.options = self.options.with_character_choice(enabled);
        self
    }

    /// Deal from `catalog` instead of the built-in cards.
    #[must_use]
    pub fn catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the game and start the first turn.
    ///
    /// # Panics
    ///
    /// Panics if the catalog has fewer characters than players.
    #[must_use]
    pub fn build(self, seed: u64) -> Game {
        let mut options = self.options;
        options.seed = seed;
        let catalog = self
            .catalog
            .unwrap_or_else(|| CardCatalog::standard(options.expansions));

        let mut rng = GameRng::new(seed);
        let roles = deal_roles(self.player_count, &mut rng);
        let mut game = Game::new(&roles, options);
        game.rng = rng;
        debug!(players = self.player_count, seed, "new game");

        game.fill_piles(&catalog);
        game.deal_characters(catalog.characters());
        game.reveal_roles();

        if game.options.character_choice {
            for player in game.players().player_ids().collect::<Vec<_>>() {
                game.queue_request(Request::new(RequestKind::CharacterChoice, player));
            }
        }
        game.queue_action(|game| game.start_game());
        game
    }
}

impl Game {
    fn fill_piles(&mut self, catalog: &CardCatalog) {
        for data in catalog.deck() {
            self.add_card(data.clone(), Pile::MainDeck, None);
        }
        self.shuffle_pile(Pile::MainDeck);

        if self.has_expansion(Expansions::GOLDRUSH) {
            for data in catalog.shop() {
                self.add_card(data.clone(), Pile::ShopDeck, None);
            }
            self.shuffle_pile(Pile::ShopDeck);
        }

        if self.has_expansion(Expansions::HIGHNOON | Expansions::FISTFULOFCARDS) {
            for data in catalog.scenarios() {
                self.add_card(data.clone(), Pile::ScenarioDeck, None);
            }
            self.shuffle_pile(Pile::ScenarioDeck);
        }
    }

    /// Two characters each when there are enough, otherwise one.
    fn deal_characters(&mut self, characters: &[CardData]) {
        let num_players = self.players().len();
        assert!(
            characters.len() >= num_players,
            "{} characters for {num_players} players",
            characters.len()
        );
        let mut order: Vec<usize> = (0..characters.len()).collect();
        self.rng.shuffle(&mut order);
        let per_player = if characters.len() >= 2 * num_players { 2 } else { 1 };
        let choice = self.options.character_choice && per_player == 2;

        let mut dealt = order.into_iter();
        for player in self.players().player_ids().collect::<Vec<_>>() {
            for slot in 0..per_player {
                let Some(index) = dealt.next() else { break };
                let data = characters[index].clone();
                let pile = match (choice, slot) {
                    (true, _) => Pile::PlayerHand,
                    (false, 0) => Pile::PlayerCharacter,
                    (false, _) => Pile::PlayerBackup,
                };
                let card = self.add_card(data, pile, Some(player));
                let viewers = if pile == Pile::PlayerHand {
                    UpdateTarget::Only(player)
                } else {
                    UpdateTarget::All
                };
                self.show_card(card, viewers);
                if pile == Pile::PlayerCharacter {
                    self.equip_if_enabled(card);
                    let max_hp = self.player(player).max_hp;
                    self.set_hp(player, max_hp);
                }
            }
        }
        self.options.character_choice = choice;
    }

    /// The sheriff shows their role; with three players everyone does.
    fn reveal_roles(&mut self) {
        let three_players = self.players().len() == 3;
        for player in self.players().player_ids().collect::<Vec<_>>() {
            let role = self.player(player).role;
            if three_players || role.is_first_player() {
                self.store.player_mut(player).flags.insert(PlayerFlags::ROLE_REVEALED);
                self.add_update(UpdateTarget::All, GameUpdate::PlayerShowRole { player, role });
            }
        }
    }

    fn initial_cards(&self, player: PlayerId) -> i32 {
        let hp = self.player(player).hp;
        self.apply_modifier(Modifier::InitialCards { player, count: hp })
            .int_value()
            .unwrap_or(hp)
    }

    /// Deal the starting hands round by round and open the first turn.
    fn start_game(&mut self) {
        let players: Vec<PlayerId> = self.players().player_ids().collect();
        let targets: Vec<(PlayerId, usize)> = players
            .iter()
            .map(|&p| (p, self.initial_cards(p).max(0) as usize))
            .collect();
        let rounds = targets.iter().map(|&(_, n)| n).max().unwrap_or(0);
        for _ in 0..rounds {
            for &(player, count) in &targets {
                if self.player(player).hand.len() < count {
                    self.draw_card(player);
                }
            }
        }

        if self.has_expansion(Expansions::GOLDRUSH) {
            self.refill_shop();
        }

        let Some(first) = players.iter().copied().find(|&p| self.player(p).role.is_first_player()) else {
            return;
        };
        self.first_player = Some(first);
        self.add_log(fmt_str!("LOG_GAME_START"));
        self.start_of_turn(first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::RequestTag;
    use crate::rules::Role;

    #[test]
    fn test_hands_match_hp() {
        let game = GameBuilder::new().player_count(5).build(7);
        for (id, p) in game.players().iter() {
            assert_eq!(p.hand.len(), p.hp as usize, "player {id}");
            assert_eq!(p.characters.len(), 1);
            assert_eq!(p.hp, p.max_hp);
        }
    }

    #[test]
    fn test_sheriff_opens_and_gets_the_draw() {
        let mut game = GameBuilder::new().player_count(4).build(3);
        let sheriff = game.playing().unwrap();
        assert_eq!(game.player(sheriff).role, Role::Sheriff);
        assert!(game.player(sheriff).has_flag(PlayerFlags::ROLE_REVEALED));
        assert_eq!(game.first_player(), Some(sheriff));

        let before = game.player(sheriff).hand.len();
        assert!(game.top_request_is(RequestTag::Draw, Some(sheriff)));
        game.pick_card(sheriff, Pile::MainDeck, None, None).unwrap();
        assert_eq!(game.player(sheriff).hand.len(), before + 2);
    }

    #[test]
    fn test_sheriff_gets_an_extra_hp() {
        let game = GameBuilder::new().player_count(4).build(11);
        let sheriff = game.first_player().unwrap();
        let character = game.player(sheriff).characters[0];
        let printed = game.card(character).data.equips[0].value;
        assert_eq!(game.player(sheriff).max_hp, printed + 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = GameBuilder::new().player_count(6).build(99);
        let b = GameBuilder::new().player_count(6).build(99);
        for ((_, pa), (_, pb)) in a.players().iter().zip(b.players().iter()) {
            assert_eq!(pa.role, pb.role);
            assert_eq!(pa.hand, pb.hand);
        }
        assert_eq!(a.shared_pile(Pile::MainDeck), b.shared_pile(Pile::MainDeck));
    }

    #[test]
    fn test_three_players_reveal_everyone() {
        let game = GameBuilder::new().player_count(3).build(5);
        for (_, p) in game.players().iter() {
            assert!(p.has_flag(PlayerFlags::ROLE_REVEALED));
        }
        let first = game.first_player().unwrap();
        assert_eq!(game.player(first).role, Role::Deputy3p);
    }

    #[test]
    fn test_character_choice_waits_for_picks() {
        let mut game = GameBuilder::new()
            .player_count(3)
            .character_choice(true)
            .build(8);
        assert!(game.playing().is_none());

        while let Some(req) = game.top_request().cloned() {
            assert_eq!(req.kind.tag(), RequestTag::CharacterChoice);
            let card = game.player(req.target).hand[0];
            game.pick_card(req.target, Pile::PlayerHand, Some(req.target), Some(card)).unwrap();
            if game.playing().is_some() {
                break;
            }
        }

        for (_, p) in game.players().iter() {
            assert_eq!(p.characters.len(), 1);
            assert_eq!(p.backup_characters.len(), 1);
        }
        assert!(game.playing().is_some());
    }

    #[test]
    fn test_goldrush_fills_the_shop() {
        let game = GameBuilder::new()
            .player_count(4)
            .expansion(Expansions::GOLDRUSH)
            .build(1);
        assert_eq!(game.shared_pile(Pile::ShopSelection).len(), crate::rules::SHOP_SELECTION_SIZE);
    }

    #[test]
    #[should_panic(expected = "player count")]
    fn test_rejects_two_players() {
        let _ = GameBuilder::new().player_count(2);
    }
}
