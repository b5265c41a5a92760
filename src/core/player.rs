//! Player identification, roles, and per-seat data storage.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. The engine keys all targeting, voting, and
//! script attribution by seat index; external identity ids stay opaque
//! inside [`Identity`](crate::core::Identity).
//!
//! ## Role / Faction
//!
//! Closed enums. A role never changes once dealt; the faction split drives
//! win evaluation.
//!
//! ## PlayerMap
//!
//! Per-seat data storage backed by `Vec` for O(1) access, indexed by
//! `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::identity::Identity;

/// Seat identifier for a player at the table.
///
/// Seat indices are 0-based: the user always sits at `PlayerId(0)`,
/// companions fill the remaining seats in the order they were supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new seat ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seat IDs for a table with `seat_count` seats.
    pub fn all(seat_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..seat_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// The closed set of roles in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
}

impl Role {
    /// The faction this role wins with.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolf,
            Role::Villager | Role::Seer | Role::Witch => Faction::Village,
        }
    }

    /// Whether this is a "god" role: village-aligned with a night action.
    #[must_use]
    pub const fn is_god(self) -> bool {
        matches!(self, Role::Seer | Role::Witch)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Werewolf => "werewolf",
            Role::Villager => "villager",
            Role::Seer => "seer",
            Role::Witch => "witch",
        };
        f.write_str(name)
    }
}

/// The two factions competing for the win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Werewolf,
    Village,
}

impl Faction {
    /// The faction that wins when this one loses.
    #[must_use]
    pub const fn opponent(self) -> Faction {
        match self {
            Faction::Werewolf => Faction::Village,
            Faction::Village => Faction::Werewolf,
        }
    }
}

/// One seat at the table.
///
/// `role` is immutable once dealt. `is_alive` only ever transitions
/// true → false. `status_tag` is presentation data the engine stores but
/// never reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// External identity (opaque id, display name, avatar handle).
    pub identity: Identity,

    /// The dealt role.
    pub role: Role,

    /// Dead players stay at the table but cannot act, speak, or be targeted.
    pub is_alive: bool,

    /// Exactly one seat holds the human user.
    pub is_user: bool,

    /// Optional presentation tag owned by the UI layer.
    pub status_tag: Option<String>,
}

impl Player {
    /// Create a live player from an identity and a dealt role.
    #[must_use]
    pub fn new(identity: Identity, role: Role, is_user: bool) -> Self {
        Self {
            identity,
            role,
            is_alive: true,
            is_user,
            status_tag: None,
        }
    }

    /// The display name from the seat's identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.display_name
    }
}

/// Per-seat data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per seat. Use `PlayerMap::new()` to
/// create with a factory function.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::{PlayerId, PlayerMap};
///
/// let mut votes: PlayerMap<Option<PlayerId>> = PlayerMap::new(6, |_| None);
/// votes[PlayerId::new(0)] = Some(PlayerId::new(3));
/// assert_eq!(votes[PlayerId::new(0)], Some(PlayerId::new(3)));
/// assert_eq!(votes[PlayerId::new(1)], None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each seat.
    pub fn new(seat_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(seat_count > 0, "Must have at least 1 seat");
        assert!(seat_count <= 255, "At most 255 seats supported");

        let data = (0..seat_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Build a PlayerMap from an already-ordered Vec of seat values.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 seat");
        assert!(data.len() <= 255, "At most 255 seats supported");
        Self { data }
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Checked lookup: `None` for an out-of-range seat.
    #[must_use]
    pub fn try_get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all seat IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
