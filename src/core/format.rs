//! Localizable messages.
//!
//! The engine never produces display text. Errors, game-log entries,
//! prompts and request status lines are all a message key plus typed
//! arguments; the presentation layer looks the key up in its string
//! table and formats the arguments (card names, player names, numbers).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::CardId;
use super::player::PlayerId;

/// A typed argument of a localizable message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatArg {
    Card(CardId),
    Player(PlayerId),
    Int(i32),
}

impl From<CardId> for FormatArg {
    fn from(card: CardId) -> Self {
        Self::Card(card)
    }
}

impl From<PlayerId> for FormatArg {
    fn from(player: PlayerId) -> Self {
        Self::Player(player)
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card(card) => write!(f, "{}", card),
            Self::Player(player) => write!(f, "{}", player),
            Self::Int(value) => write!(f, "{}", value),
        }
    }
}

/// Argument list of a message. Messages rarely carry more than three.
pub type FormatArgs = SmallVec<[FormatArg; 3]>;

/// A message key with its arguments.
///
/// ```
/// use bang_engine::core::{CardId, FormattedString, PlayerId};
///
/// let log = FormattedString::new("LOG_PLAYED_CARD_ON")
///     .with(CardId::new(3))
///     .with(PlayerId::new(0))
///     .with(PlayerId::new(2));
/// assert_eq!(log.to_string(), "LOG_PLAYED_CARD_ON(Card(3), seat 0, seat 2)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedString {
    pub key: String,
    pub args: FormatArgs,
}

impl FormattedString {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: FormatArgs::new(),
        }
    }

    /// Append an argument (builder pattern).
    #[must_use]
    pub fn with(mut self, arg: impl Into<FormatArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an argument if present.
    #[must_use]
    pub fn with_opt<T: Into<FormatArg>>(mut self, arg: Option<T>) -> Self {
        if let Some(arg) = arg {
            self.args.push(arg.into());
        }
        self
    }
}

impl From<&str> for FormattedString {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Build a [`FormattedString`] from a key and any number of arguments.
///
/// ```
/// use bang_engine::fmt_str;
/// use bang_engine::core::PlayerId;
///
/// let s = fmt_str!("STATUS_DEATH_OTHER", PlayerId::new(1));
/// assert_eq!(s.args.len(), 1);
/// ```
#[macro_export]
macro_rules! fmt_str {
    ($key:expr $(, $arg:expr)* $(,)?) => {
        $crate::core::FormattedString::new($key)$(.with($arg))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_args() {
        assert_eq!(FormattedString::new("LOG_GAME_OVER").to_string(), "LOG_GAME_OVER");
    }

    #[test]
    fn test_macro_builds_args_in_order() {
        let s = fmt_str!("LOG_TAKEN_DAMAGE_PLURAL", CardId(4), PlayerId(1), 2);
        assert_eq!(
            s.args.as_slice(),
            &[
                FormatArg::Card(CardId(4)),
                FormatArg::Player(PlayerId(1)),
                FormatArg::Int(2)
            ]
        );
    }
}
