//! Small bit-flag sets.
//!
//! Player status, effect flags, scenario flags, expansions and target
//! filters are all sets of named booleans. `flag_set!` generates a
//! `Copy` newtype over `u32` with named constants and set operations.
//!
//! ```
//! use bang_engine::core::PlayerFlags;
//!
//! let mut flags = PlayerFlags::empty();
//! flags.insert(PlayerFlags::DEAD | PlayerFlags::GHOST);
//! assert!(flags.contains(PlayerFlags::DEAD));
//! flags.remove(PlayerFlags::DEAD);
//! assert!(!flags.contains(PlayerFlags::DEAD));
//! assert!(flags.contains(PlayerFlags::GHOST));
//! ```

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* const $flag:ident = $bit:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
        pub struct $name(u32);

        #[allow(dead_code)]
        impl $name {
            $( $(#[$fmeta])* pub const $flag: Self = Self(1 << $bit); )*

            const NAMES: &'static [(&'static str, Self)] = &[$( (stringify!($flag), Self::$flag) ),*];

            #[must_use]
            pub const fn empty() -> Self {
                Self(0)
            }

            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// True if every flag of `other` is set.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// True if any flag of `other` is set.
            #[must_use]
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut set = f.debug_set();
                for (name, flag) in Self::NAMES {
                    if self.contains(*flag) {
                        set.entry(name);
                    }
                }
                set.finish()
            }
        }
    };
}

pub(crate) use flag_set;

flag_set! {
    /// Player status flags.
    pub struct PlayerFlags {
        const DEAD = 0;
        const GHOST = 1;
        const START_OF_TURN = 2;
        const EXTRA_TURN = 3;
        const DISABLE_PLAYER_DISTANCES = 4;
        const SEE_EVERYONE_RANGE_1 = 5;
        const TREAT_MISSED_AS_BANG = 6;
        const TREAT_ANY_AS_BANG = 7;
        const ROLE_REVEALED = 8;
    }
}

flag_set! {
    /// Flags attached to a played effect and carried by the requests it creates.
    pub struct EffectFlags {
        /// The target may cancel the resulting request with an escape response.
        const ESCAPABLE = 0;
        /// The card was played against exactly one player.
        const SINGLE_TARGET = 1;
        const IS_BANG = 2;
    }
}

flag_set! {
    /// Rule switches set by the active scenario card.
    pub struct ScenarioFlags {
        const INVERT_ROTATION = 0;
        const GHOSTTOWN = 1;
        const JUDGE = 2;
        const ABANDONEDMINE = 3;
        const DEADMAN = 4;
    }
}

flag_set! {
    /// Expansions enabled for a game.
    pub struct Expansions {
        const DODGECITY = 0;
        const GOLDRUSH = 1;
        const ARMEDANDDANGEROUS = 2;
        const VALLEYOFSHADOWS = 3;
        const HIGHNOON = 4;
        const FISTFULOFCARDS = 5;
        const GHOSTCARDS = 6;
    }
}
