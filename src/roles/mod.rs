//! The role deck: the fixed multiset dealt at setup.
//!
//! A standard 6-seat table always plays 2 werewolves, 2 villagers, 1 seer,
//! and 1 witch. The deck is shuffled with a uniform Fisher–Yates pass and
//! dealt positionally: card 0 to the user's seat, the rest to companions in
//! order. Role assignment is therefore independent of who the identities
//! are.

use crate::core::{GameRng, Role};

/// Seats at a standard table.
pub const TABLE_SIZE: usize = 6;

/// The fixed role multiset for a table size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleDeck {
    roles: Vec<Role>,
}

impl RoleDeck {
    /// The standard 6-seat deck: 2 werewolves, 2 villagers, 1 seer, 1 witch.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            roles: vec![
                Role::Werewolf,
                Role::Werewolf,
                Role::Villager,
                Role::Villager,
                Role::Seer,
                Role::Witch,
            ],
        }
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the deck is empty. Standard decks never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// The unshuffled card list, for inspecting the multiset.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Shuffle and deal the deck.
    ///
    /// Returns one role per seat, index 0 first. The deck length must equal
    /// the seat count being dealt; that is the caller's precondition, not a
    /// runtime error path.
    #[must_use]
    pub fn deal(&self, rng: &mut GameRng) -> Vec<Role> {
        let mut dealt = self.roles.clone();
        rng.shuffle(&mut dealt);
        dealt
    }

    /// Count cards with a given role.
    #[must_use]
    pub fn count(&self, role: Role) -> usize {
        self.roles.iter().filter(|&&r| r == role).count()
    }
}
