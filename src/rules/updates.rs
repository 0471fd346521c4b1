//! Outbound update stream.
//!
//! Every state change visible to a player is recorded as an
//! [`UpdateRecord`]: a [`GameUpdate`] plus the players it is addressed to.
//! The engine only appends; the embedding layer drains the records with
//! [`Game::drain_updates`] and fans them out per connection.

use serde::{Deserialize, Serialize};

use super::game::Game;
use super::roles::Role;
use crate::cards::CardSign;
use crate::core::{CardId, EffectFlags, FormattedString, PlayerFlags, PlayerId};
use crate::piles::Pile;
use crate::requests::RequestTag;

/// Who receives an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateTarget {
    All,
    Only(PlayerId),
    /// Everyone but the given player.
    Except(PlayerId),
}

impl UpdateTarget {
    /// True if `viewer` receives updates sent to this target.
    #[must_use]
    pub fn includes(self, viewer: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => p == viewer,
            Self::Except(p) => p != viewer,
        }
    }
}

/// A pick the target of the live request could make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickTarget {
    pub pile: Pile,
    pub player: Option<PlayerId>,
    pub card: Option<CardId>,
}

impl PickTarget {
    /// Pick a whole pile (the deck, the discard pile).
    #[must_use]
    pub fn pile(pile: Pile) -> Self {
        Self {
            pile,
            player: None,
            card: None,
        }
    }

    #[must_use]
    pub fn card(pile: Pile, player: Option<PlayerId>, card: CardId) -> Self {
        Self {
            pile,
            player,
            card: Some(card),
        }
    }
}

/// The live request as one viewer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatus {
    pub kind: RequestTag,
    pub origin_card: Option<CardId>,
    pub origin: Option<PlayerId>,
    pub target: PlayerId,
    pub flags: EffectFlags,
    pub text: Option<FormattedString>,
    /// Cards the viewer could answer with.
    pub respond_ids: Vec<CardId>,
    /// Picks the viewer could make; empty unless the viewer is the target.
    pub pick_ids: Vec<PickTarget>,
}

/// One state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameUpdate {
    MoveCard {
        card: CardId,
        pile: Pile,
        owner: Option<PlayerId>,
    },
    /// The face of a card becomes visible to the receiver.
    ShowCard {
        card: CardId,
        name: String,
        sign: Option<CardSign>,
    },
    HideCard {
        card: CardId,
    },
    TapCard {
        card: CardId,
        inactive: bool,
    },
    DeckShuffled {
        pile: Pile,
    },
    MoveCubes {
        num: usize,
        /// `None` is the shared pool.
        origin_card: Option<CardId>,
        target_card: Option<CardId>,
    },
    PlayerHp {
        player: PlayerId,
        hp: i32,
    },
    PlayerGold {
        player: PlayerId,
        gold: i32,
    },
    PlayerStatus {
        player: PlayerId,
        flags: PlayerFlags,
        range_mod: i32,
        weapon_range: i32,
        distance_mod: i32,
    },
    PlayerShowRole {
        player: PlayerId,
        role: Role,
    },
    PlayerRemove {
        player: PlayerId,
    },
    SwitchTurn {
        player: PlayerId,
    },
    RequestStatus(RequestStatus),
    StatusClear,
    /// A warning the player must confirm before the play goes ahead.
    GamePrompt(FormattedString),
    GameLog(FormattedString),
    GameOver {
        winner: Role,
    },
}

/// An update with its addressees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub target: UpdateTarget,
    pub update: GameUpdate,
}

impl Game {
    pub fn add_update(&mut self, target: UpdateTarget, update: GameUpdate) {
        self.updates.push(UpdateRecord { target, update });
    }

    /// Append a game-log entry visible to everyone.
    pub fn add_log(&mut self, message: FormattedString) {
        self.add_update(UpdateTarget::All, GameUpdate::GameLog(message));
    }

    /// Append a game-log entry visible to some players only.
    pub fn add_log_for(&mut self, target: UpdateTarget, message: FormattedString) {
        self.add_update(target, GameUpdate::GameLog(message));
    }

    /// Take every update recorded since the last call.
    pub fn drain_updates(&mut self) -> Vec<UpdateRecord> {
        std::mem::take(&mut self.updates)
    }

    /// Updates received by one viewer, without draining.
    pub fn updates_for(&self, viewer: PlayerId) -> impl Iterator<Item = &GameUpdate> + '_ {
        self.updates
            .iter()
            .filter(move |record| record.target.includes(viewer))
            .map(|record| &record.update)
    }

    /// Broadcast the range and distance fields of a player.
    pub fn send_player_status(&mut self, player: PlayerId) {
        let p = self.player(player);
        let update = GameUpdate::PlayerStatus {
            player,
            flags: p.flags,
            range_mod: p.range_mod,
            weapon_range: p.weapon_range,
            distance_mod: p.distance_mod,
        };
        self.add_update(UpdateTarget::All, update);
    }

    /// Send the face of a card to the given viewers.
    pub(crate) fn show_card(&mut self, card: CardId, target: UpdateTarget) {
        let c = self.card(card);
        let update = GameUpdate::ShowCard {
            card,
            name: c.name().to_owned(),
            sign: c.data.sign,
        };
        self.add_update(target, update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_target_includes() {
        let (a, b) = (PlayerId(0), PlayerId(1));
        assert!(UpdateTarget::All.includes(a));
        assert!(UpdateTarget::Only(a).includes(a));
        assert!(!UpdateTarget::Only(a).includes(b));
        assert!(!UpdateTarget::Except(a).includes(a));
        assert!(UpdateTarget::Except(a).includes(b));
    }

    #[test]
    fn test_private_log_filtered_per_viewer() {
        let mut game = Game::test_game(3);
        game.add_log_for(UpdateTarget::Only(PlayerId(1)), FormattedString::new("LOG_DRAWN_CARD"));
        game.add_log(FormattedString::new("LOG_GAME_START"));

        assert_eq!(game.updates_for(PlayerId(1)).count(), 2);
        assert_eq!(game.updates_for(PlayerId(0)).count(), 1);
        assert_eq!(game.drain_updates().len(), 2);
        assert!(game.drain_updates().is_empty());
    }
}
