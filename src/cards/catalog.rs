//! Built-in card lists.
//!
//! The `CardCatalog` hands the builder the cards a game starts with,
//! grouped by the pile they are dealt into. Every card is already
//! validated data; the catalog only filters by expansion.

use super::definition::{CardColor, CardData, CardModifier};
use super::sign::{Rank, Suit};
use crate::core::Expansions;
use crate::effects::{
    CardFilter, EffectSpec, EffectType, EquipSpec, EquipType, MultiTargetType, PlayerFilter, TargetKind,
};

use Rank::*;
use Suit::*;

/// Card lists consumed at game start.
///
/// ## Example
///
/// ```
/// use bang_engine::cards::CardCatalog;
/// use bang_engine::core::Expansions;
///
/// let base = CardCatalog::standard(Expansions::empty());
/// let with_shop = CardCatalog::standard(Expansions::GOLDRUSH);
///
/// assert!(base.shop().is_empty());
/// assert!(!with_shop.shop().is_empty());
/// assert_eq!(base.deck().len(), with_shop.deck().len());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    deck: Vec<CardData>,
    characters: Vec<CardData>,
    shop: Vec<CardData>,
    scenarios: Vec<CardData>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in cards of the base game and of the given expansions.
    #[must_use]
    pub fn standard(expansions: Expansions) -> Self {
        let mut catalog = Self::new();
        base_deck(&mut catalog);
        base_characters(&mut catalog);
        dodgecity(&mut catalog);
        goldrush(&mut catalog);
        armedanddangerous(&mut catalog);
        valleyofshadows(&mut catalog);
        scenarios(&mut catalog);
        catalog.retain_expansions(expansions);
        catalog
    }

    /// Drop every card belonging to an expansion not in `expansions`.
    pub fn retain_expansions(&mut self, expansions: Expansions) {
        let keep = |card: &CardData| card.expansion.is_empty() || expansions.intersects(card.expansion);
        self.deck.retain(keep);
        self.characters.retain(keep);
        self.shop.retain(keep);
        self.scenarios.retain(keep);
    }

    pub fn add_deck_card(&mut self, card: CardData) {
        self.deck.push(card);
    }

    pub fn add_character(&mut self, card: CardData) {
        self.characters.push(card);
    }

    pub fn add_shop_card(&mut self, card: CardData) {
        self.shop.push(card);
    }

    pub fn add_scenario_card(&mut self, card: CardData) {
        self.scenarios.push(card);
    }

    #[must_use]
    pub fn deck(&self) -> &[CardData] {
        &self.deck
    }

    #[must_use]
    pub fn characters(&self) -> &[CardData] {
        &self.characters
    }

    #[must_use]
    pub fn shop(&self) -> &[CardData] {
        &self.shop
    }

    #[must_use]
    pub fn scenarios(&self) -> &[CardData] {
        &self.scenarios
    }

    /// Number of cards across every list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len() + self.characters.len() + self.shop.len() + self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add one deck copy of `card` per sign.
    fn deck_copies(&mut self, card: CardData, signs: &[(Suit, Rank)]) {
        for &(suit, rank) in signs {
            self.deck.push(card.clone().with_sign(suit, rank));
        }
    }

    fn shop_copies(&mut self, card: CardData, copies: usize) {
        for _ in 0..copies {
            self.shop.push(card.clone());
        }
    }
}

fn self_player(kind: EffectType) -> EffectSpec {
    EffectSpec::player(kind, PlayerFilter::SELF)
}

fn draw(n: i32) -> EffectSpec {
    self_player(EffectType::Draw).with_value(n)
}

fn missed_response(card: CardData) -> CardData {
    card.with_response(EffectSpec::none(EffectType::MissedCard))
}

fn weapon(name: &str, range: i32) -> CardData {
    CardData::new(name, CardColor::Blue).with_equip(EquipSpec::new(EquipType::Weapon).with_value(range))
}

fn character(name: &str, max_hp: i32) -> CardData {
    CardData::new(name, CardColor::None).with_equip(EquipSpec::new(EquipType::MaxHp).with_value(max_hp))
}

fn base_deck(catalog: &mut CardCatalog) {
    let bang = CardData::new("Bang!", CardColor::Brown)
        .with_effect(EffectSpec::none(EffectType::BangLimit))
        .with_effect(EffectSpec::player(
            EffectType::BangCard,
            PlayerFilter::REACHABLE | PlayerFilter::NOTSELF,
        ))
        .with_response(EffectSpec::none(EffectType::BangResponse));
    let mut bang_signs = vec![(Spades, Ace), (Hearts, Queen), (Hearts, King), (Hearts, Ace)];
    bang_signs.extend(
        [Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace].map(|r| (Diamonds, r)),
    );
    bang_signs.extend([Two, Three, Four, Five, Six, Seven, Eight, Nine].map(|r| (Clubs, r)));
    catalog.deck_copies(bang, &bang_signs);

    let missed = missed_response(CardData::new("Missed!", CardColor::Brown));
    catalog.deck_copies(
        missed,
        &[
            (Clubs, Ten),
            (Clubs, Jack),
            (Clubs, Queen),
            (Clubs, King),
            (Clubs, Ace),
            (Spades, Two),
            (Spades, Three),
            (Spades, Four),
            (Spades, Five),
            (Spades, Six),
            (Spades, Seven),
            (Spades, Eight),
        ],
    );

    // Also the last-chance answer to a Death request.
    let beer = CardData::new("Beer", CardColor::Brown)
        .with_effect(self_player(EffectType::Beer))
        .with_response(self_player(EffectType::Beer))
        .with_response(EffectSpec::none(EffectType::DeathSave));
    catalog.deck_copies(beer, &[Six, Seven, Eight, Nine, Ten, Jack].map(|r| (Hearts, r)));

    let panic = CardData::new("Panic!", CardColor::Brown).with_effect(EffectSpec::card(
        EffectType::Steal,
        PlayerFilter::RANGE_1 | PlayerFilter::NOTSELF,
        CardFilter::empty(),
    ));
    catalog.deck_copies(panic, &[(Hearts, Jack), (Hearts, Queen), (Hearts, Ace), (Diamonds, Eight)]);

    let cat_balou = CardData::new("Cat Balou", CardColor::Brown).with_effect(EffectSpec::card(
        EffectType::Destroy,
        PlayerFilter::NOTSELF,
        CardFilter::empty(),
    ));
    catalog.deck_copies(
        cat_balou,
        &[(Hearts, King), (Diamonds, Nine), (Diamonds, Ten), (Diamonds, Jack)],
    );

    catalog.deck_copies(
        CardData::new("Stagecoach", CardColor::Brown).with_effect(draw(2)),
        &[(Spades, Nine), (Spades, Nine)],
    );
    catalog.deck_copies(
        CardData::new("Wells Fargo", CardColor::Brown).with_effect(draw(3)),
        &[(Hearts, Three)],
    );
    catalog.deck_copies(
        CardData::new("Gatling", CardColor::Brown).with_effect(EffectSpec::new(EffectType::Bang, TargetKind::OtherPlayers)),
        &[(Hearts, Ten)],
    );
    catalog.deck_copies(
        CardData::new("Indians!", CardColor::Brown)
            .with_effect(EffectSpec::new(EffectType::Indians, TargetKind::OtherPlayers)),
        &[(Diamonds, King), (Diamonds, Ace)],
    );
    catalog.deck_copies(
        CardData::new("Duel", CardColor::Brown).with_effect(EffectSpec::player(EffectType::Duel, PlayerFilter::NOTSELF)),
        &[(Diamonds, Queen), (Spades, Jack), (Clubs, Eight)],
    );
    catalog.deck_copies(
        CardData::new("General Store", CardColor::Brown).with_effect(EffectSpec::none(EffectType::GeneralStore)),
        &[(Clubs, Nine), (Spades, Queen)],
    );
    catalog.deck_copies(
        CardData::new("Saloon", CardColor::Brown).with_effect(EffectSpec::none(EffectType::Saloon)),
        &[(Hearts, Five)],
    );

    catalog.deck_copies(
        CardData::new("Barrel", CardColor::Blue).with_response(EffectSpec::none(EffectType::Barrel)),
        &[(Spades, Queen), (Spades, King)],
    );
    catalog.deck_copies(
        CardData::new("Dynamite", CardColor::Blue).with_equip(EquipSpec::new(EquipType::Dynamite)),
        &[(Hearts, Two)],
    );
    catalog.deck_copies(
        CardData::new("Jail", CardColor::Blue).with_equip(
            EquipSpec::new(EquipType::Jail).with_player_filter(PlayerFilter::NOTSELF | PlayerFilter::NOTSHERIFF),
        ),
        &[(Spades, Jack), (Spades, Ten), (Hearts, Four)],
    );
    catalog.deck_copies(
        CardData::new("Mustang", CardColor::Blue)
            .with_equip(EquipSpec::new(EquipType::Horse))
            .with_equip(EquipSpec::new(EquipType::Mustang)),
        &[(Hearts, Eight), (Hearts, Nine)],
    );
    catalog.deck_copies(
        CardData::new("Scope", CardColor::Blue)
            .with_equip(EquipSpec::new(EquipType::Horse))
            .with_equip(EquipSpec::new(EquipType::Scope)),
        &[(Spades, Ace)],
    );

    catalog.deck_copies(
        weapon("Volcanic", 1).with_equip(EquipSpec::new(EquipType::Volcanic)),
        &[(Spades, Ten), (Clubs, Ten)],
    );
    catalog.deck_copies(weapon("Schofield", 2), &[(Clubs, Jack), (Clubs, Queen), (Spades, King)]);
    catalog.deck_copies(weapon("Remington", 3), &[(Clubs, King)]);
    catalog.deck_copies(weapon("Rev. Carabine", 4), &[(Clubs, Ace)]);
    catalog.deck_copies(weapon("Winchester", 5), &[(Spades, Eight)]);
}

fn base_characters(catalog: &mut CardCatalog) {
    let with = |name: &str, hp: i32, kind: EquipType| character(name, hp).with_equip(EquipSpec::new(kind));

    catalog.add_character(with("Bart Cassidy", 4, EquipType::Boots));
    catalog.add_character(with("Calamity Janet", 4, EquipType::CalamityJanet));
    catalog.add_character(with("El Gringo", 3, EquipType::ElGringo));
    catalog.add_character(
        character("Jourdonnais", 4).with_response(EffectSpec::none(EffectType::Barrel)),
    );
    catalog.add_character(with("Lucky Duke", 4, EquipType::HorseCharm));
    catalog.add_character(with("Paul Regret", 3, EquipType::Mustang));
    catalog.add_character(with("Rose Doolan", 4, EquipType::Scope));
    catalog.add_character(with("Slab the Killer", 4, EquipType::SlabTheKiller));
    catalog.add_character(with("Suzy Lafayette", 4, EquipType::SuzyLafayette));
    catalog.add_character(with("Vulture Sam", 4, EquipType::VultureSam));
    catalog.add_character(with("Willy the Kid", 4, EquipType::Volcanic));
}

fn dodgecity(catalog: &mut CardCatalog) {
    let exp = Expansions::DODGECITY;
    let green = |name: &str| CardData::new(name, CardColor::Green).with_expansion(exp);

    catalog.deck_copies(
        CardData::new("Punch", CardColor::Brown)
            .with_effect(EffectSpec::player(EffectType::Bang, PlayerFilter::RANGE_1 | PlayerFilter::NOTSELF))
            .with_expansion(exp),
        &[(Spades, Ten)],
    );
    catalog.deck_copies(
        missed_response(CardData::new("Dodge", CardColor::Brown))
            .with_response(draw(1))
            .with_expansion(exp),
        &[(Diamonds, Seven), (Hearts, King)],
    );
    catalog.deck_copies(
        green("Derringer")
            .with_effect(EffectSpec::player(EffectType::Bang, PlayerFilter::RANGE_1 | PlayerFilter::NOTSELF))
            .with_effect(draw(1)),
        &[(Spades, Seven)],
    );
    catalog.deck_copies(
        green("Pepperbox").with_effect(EffectSpec::player(
            EffectType::Bang,
            PlayerFilter::REACHABLE | PlayerFilter::NOTSELF,
        )),
        &[(Hearts, Ace)],
    );
    catalog.deck_copies(
        green("Howitzer").with_effect(EffectSpec::new(EffectType::Bang, TargetKind::OtherPlayers)),
        &[(Spades, Nine)],
    );
    catalog.deck_copies(
        green("Canteen").with_effect(self_player(EffectType::HealNotFull)),
        &[(Hearts, Seven)],
    );
    catalog.deck_copies(
        green("Conestoga").with_effect(EffectSpec::card(EffectType::Steal, PlayerFilter::NOTSELF, CardFilter::empty())),
        &[(Diamonds, Nine)],
    );
    catalog.deck_copies(
        green("Can Can").with_effect(EffectSpec::card(EffectType::Destroy, PlayerFilter::NOTSELF, CardFilter::empty())),
        &[(Clubs, Jack)],
    );
    catalog.deck_copies(missed_response(green("Sombrero")), &[(Clubs, Seven)]);
    catalog.deck_copies(missed_response(green("Iron Plate")), &[(Diamonds, Ace), (Spades, Queen)]);
    catalog.deck_copies(missed_response(green("Bible")).with_response(draw(1)), &[(Hearts, Ten)]);
    catalog.deck_copies(
        CardData::new("Hideout", CardColor::Blue)
            .with_equip(EquipSpec::new(EquipType::Mustang))
            .with_expansion(exp),
        &[(Spades, King)],
    );

    catalog.add_character(
        character("Chuck Wengam", 4)
            .with_effect(self_player(EffectType::Damage))
            .with_effect(draw(2))
            .with_expansion(exp),
    );
    catalog.add_character(
        character("Doc Holyday", 4)
            .with_effect(EffectSpec::none(EffectType::MaxUsages).with_value(1))
            .with_effect(EffectSpec::card(EffectType::MthAdd, PlayerFilter::SELF, CardFilter::HAND))
            .with_effect(EffectSpec::card(EffectType::MthAdd, PlayerFilter::SELF, CardFilter::HAND))
            .with_effect(EffectSpec::player(
                EffectType::MthAdd,
                PlayerFilter::REACHABLE | PlayerFilter::NOTSELF,
            ))
            .with_multi_target(MultiTargetType::DocHolyday)
            .with_expansion(exp),
    );
    catalog.add_character(
        character("Greg Digger", 4)
            .with_equip(EquipSpec::new(EquipType::GregDigger))
            .with_expansion(exp),
    );
    catalog.add_character(
        character("Jose Delgado", 4)
            .with_effect(EffectSpec::none(EffectType::MaxUsages).with_value(2))
            .with_effect(EffectSpec::card(
                EffectType::Destroy,
                PlayerFilter::SELF,
                CardFilter::HAND | CardFilter::BLUE,
            ))
            .with_effect(draw(2))
            .with_expansion(exp),
    );
    catalog.add_character(
        character("Pixie Pete", 3)
            .with_equip(EquipSpec::new(EquipType::Pickaxe))
            .with_expansion(exp),
    );
}

fn goldrush(catalog: &mut CardCatalog) {
    let exp = Expansions::GOLDRUSH;
    let brown = |name: &str, cost: i32| {
        CardData::new(name, CardColor::Brown).with_buy_cost(cost).with_expansion(exp)
    };
    let black = |name: &str, cost: i32, kind: EquipType| {
        CardData::new(name, CardColor::Black)
            .with_equip(EquipSpec::new(kind))
            .with_buy_cost(cost)
            .with_expansion(exp)
    };

    catalog.shop_copies(brown("Pony Express", 3).with_effect(draw(3)), 2);
    catalog.shop_copies(
        brown("Whisky", 1).with_effect(self_player(EffectType::Heal).with_value(2)),
        2,
    );
    catalog.shop_copies(
        brown("Tequila", 1).with_effect(EffectSpec::player(EffectType::Heal, PlayerFilter::empty())),
        2,
    );
    catalog.shop_copies(
        brown("Rucksack", 1).with_modifier(CardModifier::Discount),
        2,
    );
    catalog.shop_copies(black("Boots", 1, EquipType::Boots), 2);
    catalog.shop_copies(black("Horse Charm", 2, EquipType::HorseCharm), 2);
    catalog.shop_copies(black("Pickaxe", 4, EquipType::Pickaxe), 2);
}

fn armedanddangerous(catalog: &mut CardCatalog) {
    let exp = Expansions::ARMEDANDDANGEROUS;

    catalog.deck_copies(
        CardData::new("Bandolier", CardColor::Orange)
            .with_modifier(CardModifier::Bandolier)
            .with_effect(EffectSpec::none(EffectType::PayCube).with_value(1))
            .with_expansion(exp),
        &[(Clubs, Two)],
    );
    catalog.deck_copies(
        CardData::new("Bell Tower", CardColor::Brown)
            .with_modifier(CardModifier::Belltower)
            .with_expansion(exp),
        &[(Diamonds, Two)],
    );
    catalog.deck_copies(
        CardData::new("Double Barrel", CardColor::Brown)
            .with_modifier(CardModifier::BangMod)
            .with_expansion(exp),
        &[(Hearts, Three)],
    );
    catalog.deck_copies(
        CardData::new("Bronco", CardColor::Blue)
            .with_equip(EquipSpec::new(EquipType::Bronco))
            .with_expansion(exp),
        &[(Hearts, Eight)],
    );
    catalog.deck_copies(
        CardData::new("Caravan", CardColor::Brown).with_effect(draw(2)).with_expansion(exp),
        &[(Diamonds, Ten)],
    );
}

fn valleyofshadows(catalog: &mut CardCatalog) {
    catalog.deck_copies(
        CardData::new("Escape", CardColor::Brown)
            .with_response(EffectSpec::none(EffectType::Escape))
            .with_expansion(Expansions::VALLEYOFSHADOWS),
        &[(Hearts, Three), (Spades, Five)],
    );
}

fn scenarios(catalog: &mut CardCatalog) {
    let scenario = |name: &str, kind: EquipType, exp: Expansions| {
        CardData::new(name, CardColor::None)
            .with_equip(EquipSpec::new(kind))
            .with_expansion(exp)
    };

    catalog.add_scenario_card(scenario("Ghost Town", EquipType::GhostTown, Expansions::HIGHNOON));
    catalog.add_scenario_card(scenario("Hangover", EquipType::Hangover, Expansions::HIGHNOON));
    catalog.add_scenario_card(scenario("Invert Rotation", EquipType::InvertRotation, Expansions::HIGHNOON));
    catalog.add_scenario_card(scenario("Dead Man", EquipType::DeadMan, Expansions::FISTFULOFCARDS));
    catalog.add_scenario_card(scenario("The Judge", EquipType::Judge, Expansions::FISTFULOFCARDS));
    catalog.add_scenario_card(scenario("Abandoned Mine", EquipType::AbandonedMine, Expansions::FISTFULOFCARDS));
    catalog.add_scenario_card(scenario("Lasso", EquipType::Lasso, Expansions::FISTFULOFCARDS));
}
