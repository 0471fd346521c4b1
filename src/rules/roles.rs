//! Roles and win conditions.

use serde::{Deserialize, Serialize};

use super::game::Game;
use crate::core::{GameRng, PlayerId};

/// Secret team of a player.
///
/// The `*3p` roles are used in three-player games, where everyone plays
/// against one designated opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Sheriff,
    Deputy,
    Outlaw,
    Renegade,
    Deputy3p,
    Outlaw3p,
    Renegade3p,
}

/// Roles dealt for 4 to 8 players: the first `n` are used.
const ROLES: [Role; 8] = [
    Role::Sheriff,
    Role::Outlaw,
    Role::Outlaw,
    Role::Renegade,
    Role::Deputy,
    Role::Outlaw,
    Role::Deputy,
    Role::Renegade,
];

const ROLES_3P: [Role; 3] = [Role::Deputy3p, Role::Outlaw3p, Role::Renegade3p];

impl Role {
    /// True for the role that opens the game.
    #[must_use]
    pub fn is_first_player(self) -> bool {
        matches!(self, Self::Sheriff | Self::Deputy3p)
    }

    /// True for the sheriff's side.
    #[must_use]
    pub fn is_law(self) -> bool {
        matches!(self, Self::Sheriff | Self::Deputy)
    }

    /// The role a three-player role wins by eliminating.
    #[must_use]
    pub fn three_player_prey(self) -> Option<Role> {
        match self {
            Self::Deputy3p => Some(Self::Renegade3p),
            Self::Outlaw3p => Some(Self::Deputy3p),
            Self::Renegade3p => Some(Self::Outlaw3p),
            _ => None,
        }
    }
}

/// Shuffle the roles for a table of `num_players`.
///
/// ```
/// use bang_engine::core::GameRng;
/// use bang_engine::rules::{deal_roles, Role};
///
/// let mut rng = GameRng::new(7);
/// let roles = deal_roles(5, &mut rng);
/// assert_eq!(roles.len(), 5);
/// assert_eq!(roles.iter().filter(|r| **r == Role::Sheriff).count(), 1);
/// assert_eq!(roles.iter().filter(|r| **r == Role::Deputy).count(), 1);
/// ```
pub fn deal_roles(num_players: usize, rng: &mut GameRng) -> Vec<Role> {
    let mut roles = if num_players > 3 {
        ROLES[..num_players.min(ROLES.len())].to_vec()
    } else {
        ROLES_3P[..num_players].to_vec()
    };
    rng.shuffle(&mut roles);
    roles
}

impl Game {
    /// The side that won after `target` was eliminated, if the game is decided.
    ///
    /// `killer` only counts when it was the player in turn.
    pub(crate) fn find_winner(&self, killer: Option<PlayerId>, target: PlayerId) -> Option<Role> {
        let alive: Vec<PlayerId> = self
            .players()
            .player_ids()
            .filter(|&p| self.is_alive(p))
            .collect();

        let Some(&first) = alive.first() else {
            return Some(Role::Outlaw);
        };
        if alive.len() == 1 || alive.iter().all(|&p| self.player(p).role.is_law()) {
            return Some(self.player(first).role);
        }

        let target_role = self.player(target).role;
        if self.players().len() > 3 {
            return (target_role == Role::Sheriff).then_some(Role::Outlaw);
        }

        let killer_role = self.player(killer?).role;
        (killer_role.three_player_prey() == Some(target_role)).then_some(killer_role)
    }
}
