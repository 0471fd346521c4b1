//! Event bus and disabler registry.
//!
//! ## Key Types
//!
//! - `Event` / `EventKind`: notifications fired by the engine
//! - `Modifier` / `ModifierKind`: read-only value queries
//! - `EventBus`: priority-ordered handler registry keyed by owning card
//! - `DisablerRegistry`: predicates switching equipped cards off
//!
//! Dispatch lives on `Game` (`call_event`, `queue_event`,
//! `apply_modifier`, `add_disabler`, ...) because handlers need the whole
//! game.

pub mod bus;
pub mod disabler;
pub mod event;

pub use bus::{EventBus, EventKey, HandlerId, Listener, ModifierFn};
pub use disabler::{DisablerFn, DisablerRegistry};
pub use event::{Event, EventKind, Modifier, ModifierKind};
