//! Player identification, seating and per-player storage.
//!
//! ## PlayerId
//!
//! Seat index around the table, 0-based. Turn order walks the seats
//! circularly; `next_seat`/`prev_seat` give the neighbours without
//! looking at who is alive (the game decides who gets skipped).
//!
//! ## PlayerMap
//!
//! One value per seat, looked up by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Index into per-seat storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping around.
    ///
    /// ```
    /// use bang_engine::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(1).next_seat(4), PlayerId::new(2));
    /// assert_eq!(PlayerId::new(3).next_seat(4), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next_seat(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// The seat before this one, wrapping around.
    #[must_use]
    pub fn prev_seat(self, player_count: usize) -> Self {
        Self(((self.index() + player_count - 1) % player_count) as u8)
    }

    /// Iterate over all seats of a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// One value per seat, indexed by [`PlayerId`].
///
/// ```
/// use bang_engine::core::{PlayerId, PlayerMap};
///
/// let mut hp: PlayerMap<i32> = PlayerMap::new(4, |_| 4);
/// hp[PlayerId::new(1)] -= 1;
/// assert_eq!(hp[PlayerId::new(1)], 3);
/// assert_eq!(hp.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Fill every seat of a `seat_count` table from `init`.
    ///
    /// # Panics
    ///
    /// When the table is empty or has more seats than a `PlayerId` can name.
    pub fn new(seat_count: usize, init: impl Fn(PlayerId) -> T) -> Self {
        assert!(seat_count > 0, "a table needs at least one seat");
        assert!(seat_count <= usize::from(u8::MAX), "too many seats");
        Self {
            seats: PlayerId::all(seat_count).map(init).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }

    /// Seats with their values, in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.seats.iter()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.seats.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_wraparound() {
        assert_eq!(PlayerId::new(0).prev_seat(5), PlayerId::new(4));
        assert_eq!(PlayerId::new(4).next_seat(5), PlayerId::new(0));
        assert_eq!(PlayerId::new(2).prev_seat(5), PlayerId::new(1));
    }

    #[test]
    fn test_seat_walk_visits_everyone() {
        let mut seat = PlayerId::new(0);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(seat);
            seat = seat.next_seat(6);
        }
        assert_eq!(seen, PlayerId::all(6).collect::<Vec<_>>());
        assert_eq!(seat, PlayerId::new(0));
    }

    #[test]
    fn test_seats_keep_their_values() {
        let mut cards: PlayerMap<Vec<u32>> = PlayerMap::new(3, |_| Vec::new());
        cards[PlayerId::new(2)].push(7);
        for (_, hand) in cards.iter_mut() {
            hand.push(1);
        }
        let sizes: Vec<_> = cards.iter().map(|(p, h)| (p.index(), h.len())).collect();
        assert_eq!(sizes, vec![(0, 1), (1, 1), (2, 2)]);
    }

    #[test]
    #[should_panic(expected = "at least one seat")]
    fn test_empty_table() {
        let _: PlayerMap<u8> = PlayerMap::new(0, |_| 0);
    }
}
