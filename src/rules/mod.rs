//! The game: state, turn flow, player actions and the update stream.
//!
//! [`Game`] owns everything. Player input enters through
//! [`Game::play_card`], [`Game::respond_card`], [`Game::pick_card`],
//! [`Game::confirm_request`], [`Game::end_turn`] and
//! [`Game::prompt_response`]; what the players should see leaves through
//! [`Game::drain_updates`].

mod actions;
mod builder;
mod death;
mod draw_check;
mod game;
mod moves;
mod roles;
mod turn;
mod updates;

pub use actions::{PlayCardArgs, PlayMode};
pub use builder::GameBuilder;
pub use game::Game;
pub use moves::{ORANGE_CARD_CUBES, SHOP_SELECTION_SIZE};
pub use roles::{deal_roles, Role};
pub use updates::{GameUpdate, PickTarget, RequestStatus, UpdateRecord, UpdateTarget};
