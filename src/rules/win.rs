//! Win-condition evaluation.
//!
//! A pure read over the roster, safe to call repeatedly: it mutates
//! nothing. Evaluated after every elimination, night or day.

use crate::core::{Faction, GameState, Role};

/// Determine the winning faction, if the game is decided.
///
/// - No live werewolves → the village wins.
/// - No live non-werewolves → the werewolves win.
/// - No live plain villagers, or no live god roles (seer, witch), among
///   the survivors → the werewolves win by wiping out a side.
/// - Otherwise the game continues.
#[must_use]
pub fn evaluate_winner(state: &GameState) -> Option<Faction> {
    let wolves = state
        .live_seats_where(|p| p.role == Role::Werewolf)
        .count();
    let non_wolves = state
        .live_seats_where(|p| p.role != Role::Werewolf)
        .count();

    if wolves == 0 {
        return Some(Faction::Village);
    }
    if non_wolves == 0 {
        return Some(Faction::Werewolf);
    }

    let villagers = state
        .live_seats_where(|p| p.role == Role::Villager)
        .count();
    let gods = state.live_seats_where(|p| p.role.is_god()).count();

    if villagers == 0 || gods == 0 {
        return Some(Faction::Werewolf);
    }

    None
}

/// The moderator line announcing a decided game.
#[must_use]
pub fn win_announcement(winner: Faction) -> &'static str {
    match winner {
        Faction::Werewolf => "The werewolves have taken the village. Werewolves win.",
        Faction::Village => "Every werewolf has been rooted out. The village wins.",
    }
}
