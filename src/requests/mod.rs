//! Interactive requests.
//!
//! A request is a question put to one player: pick a card, answer an
//! attack, or confirm. Only the front of the [`RequestQueue`] is live.

pub mod handlers;
mod queue;
mod request;

pub use handlers::{can_pick, is_resolvable, status_text};
pub use queue::{DelayedAction, RequestQueue};
pub use request::{Request, RequestKind, RequestTag};
