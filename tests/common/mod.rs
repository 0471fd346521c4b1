//! Shared set-up for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use bang_engine::cards::{CardCatalog, CardColor, CardData, Rank, Suit};
use bang_engine::core::{CardId, Expansions, GameOptions, PlayerId};
use bang_engine::effects::{EffectSpec, EffectType, EquipSpec, EquipType, PlayerFilter};
use bang_engine::piles::Pile;
use bang_engine::requests::RequestTag;
use bang_engine::rules::{Game, PlayCardArgs, Role};

static INIT: Once = Once::new();

/// Install a test-writer subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A sheriff in seat 0 and outlaws elsewhere, each at 4 of 4 hp, with a deck.
pub fn table(num_players: usize) -> Game {
    init_tracing();
    let roles: Vec<Role> = (0..num_players)
        .map(|i| if i == 0 { Role::Sheriff } else { Role::Outlaw })
        .collect();
    let mut game = Game::new(&roles, GameOptions::new(7));
    for i in 0..num_players {
        let player = PlayerId::new(i as u8);
        game.set_max_hp(player, 4);
        game.set_hp(player, 4);
    }
    fill_deck(&mut game, 60);
    game
}

/// Put `n` plain cards on the main deck, all clubs so draw checks fail.
pub fn fill_deck(game: &mut Game, n: usize) {
    for i in 0..n {
        let data = CardData::new(format!("filler {i}"), CardColor::Brown).with_sign(Suit::Clubs, Rank::Five);
        game.add_card(data, Pile::MainDeck, None);
    }
}

/// Open `player`'s turn and take the draw.
pub fn begin_turn(game: &mut Game, player: PlayerId) {
    game.start_of_turn(player);
    if game.top_request_is(RequestTag::Draw, Some(player)) {
        game.pick_card(player, Pile::MainDeck, None, None).unwrap();
    }
}

/// Give `player` a card in hand.
pub fn give(game: &mut Game, player: PlayerId, data: CardData) -> CardId {
    game.add_card(data, Pile::PlayerHand, Some(player))
}

/// Equip `data` on `player` by playing it from hand on their turn.
pub fn equip(game: &mut Game, player: PlayerId, data: CardData) -> CardId {
    if game.playing() != Some(player) {
        begin_turn(game, player);
    }
    let card = give(game, player, data);
    game.play_card(player, PlayCardArgs::new(card)).unwrap();
    card
}

/// A card of the built-in base deck, by name.
pub fn catalog_card(name: &str) -> CardData {
    CardCatalog::standard(Expansions::empty())
        .deck()
        .iter()
        .find(|card| card.name == name)
        .cloned()
        .unwrap_or_else(|| panic!("no {name} in the base deck"))
}

pub fn bang() -> CardData {
    CardData::new("Bang!", CardColor::Brown)
        .with_effect(EffectSpec::none(EffectType::BangLimit))
        .with_effect(EffectSpec::player(
            EffectType::BangCard,
            PlayerFilter::REACHABLE | PlayerFilter::NOTSELF,
        ))
        .with_response(EffectSpec::none(EffectType::BangResponse))
}

pub fn missed() -> CardData {
    CardData::new("Missed!", CardColor::Brown).with_response(EffectSpec::none(EffectType::MissedCard))
}

pub fn mustang() -> CardData {
    CardData::new("Mustang", CardColor::Blue)
        .with_equip(EquipSpec::new(EquipType::Horse))
        .with_equip(EquipSpec::new(EquipType::Mustang))
}

pub fn scope() -> CardData {
    CardData::new("Scope", CardColor::Blue)
        .with_equip(EquipSpec::new(EquipType::Horse))
        .with_equip(EquipSpec::new(EquipType::Scope))
}

pub fn gatling() -> CardData {
    CardData::new("Gatling", CardColor::Brown)
        .with_effect(EffectSpec::new(EffectType::Bang, bang_engine::effects::TargetKind::OtherPlayers))
}
