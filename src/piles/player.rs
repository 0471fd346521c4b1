//! The runtime player record.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerFlags, PlayerId};
use crate::effects::EquipType;
use crate::rules::Role;

/// Cards drawn in the draw phase unless something changes it.
pub const DEFAULT_CARDS_TO_DRAW: i32 = 2;

/// A check registered by an equipped card, resolved before the draw phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredrawCheck {
    /// Higher priority checks are resolved first.
    pub priority: i32,
    pub resolved: bool,
    /// Equip whose draw-check hook runs on the drawn card.
    pub equip: EquipType,
}

/// One seat at the table.
///
/// Players are never removed: a dead player stays as a passive record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub role: Role,

    pub hand: Vector<CardId>,
    pub table: Vector<CardId>,
    /// Active character first; extra characters follow.
    pub characters: Vector<CardId>,
    pub backup_characters: Vector<CardId>,

    pub hp: i32,
    pub max_hp: i32,

    /// Added to every range check made by this player.
    pub range_mod: i32,
    pub weapon_range: i32,
    /// Added to every distance measured to this player.
    pub distance_mod: i32,

    pub bangs_played: i32,
    pub bangs_per_turn: i32,

    /// Cards revealed by each draw check.
    pub num_checks: i32,
    pub num_cards_to_draw: i32,
    pub num_drawn_cards: i32,

    pub extra_turns: i32,
    pub gold: i32,
    pub flags: PlayerFlags,

    pub predraw_checks: FxHashMap<CardId, PredrawCheck>,

    /// Card that must be played before any other this turn.
    pub mandatory_card: Option<CardId>,
    /// Card that must be part of the next play.
    pub forced_card: Option<CardId>,
    pub last_played_card: Option<CardId>,
}

impl Player {
    pub fn new(id: PlayerId, role: Role) -> Self {
        Self {
            id,
            role,
            hand: Vector::new(),
            table: Vector::new(),
            characters: Vector::new(),
            backup_characters: Vector::new(),
            hp: 0,
            max_hp: 0,
            range_mod: 0,
            weapon_range: 1,
            distance_mod: 0,
            bangs_played: 0,
            bangs_per_turn: 1,
            num_checks: 1,
            num_cards_to_draw: DEFAULT_CARDS_TO_DRAW,
            num_drawn_cards: 0,
            extra_turns: 0,
            gold: 0,
            flags: PlayerFlags::empty(),
            predraw_checks: FxHashMap::default(),
            mandatory_card: None,
            forced_card: None,
            last_played_card: None,
        }
    }

    #[must_use]
    pub fn has_flag(&self, flag: PlayerFlags) -> bool {
        self.flags.contains(flag)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.has_flag(PlayerFlags::DEAD)
    }

    #[must_use]
    pub fn is_ghost(&self) -> bool {
        self.has_flag(PlayerFlags::GHOST)
    }

    /// The active character card.
    #[must_use]
    pub fn character(&self) -> Option<CardId> {
        self.characters.front().copied()
    }

    /// Register a predraw check. An existing check for the same card is kept.
    pub fn add_predraw_check(&mut self, card: CardId, priority: i32, equip: EquipType) {
        self.predraw_checks.entry(card).or_insert(PredrawCheck {
            priority,
            resolved: false,
            equip,
        });
    }

    pub fn remove_predraw_check(&mut self, card: CardId) {
        self.predraw_checks.remove(&card);
    }

    /// Highest priority among the unresolved checks.
    #[must_use]
    pub fn top_predraw_priority(&self) -> Option<i32> {
        self.predraw_checks
            .values()
            .filter(|check| !check.resolved)
            .map(|check| check.priority)
            .max()
    }

    /// Unresolved checks at the top priority, sorted by card id.
    #[must_use]
    pub fn top_predraw_checks(&self) -> Vec<CardId> {
        let Some(top) = self.top_predraw_priority() else {
            return Vec::new();
        };
        let mut cards: Vec<CardId> = self
            .predraw_checks
            .iter()
            .filter(|(_, check)| !check.resolved && check.priority == top)
            .map(|(&card, _)| card)
            .collect();
        cards.sort_unstable();
        cards
    }
}
