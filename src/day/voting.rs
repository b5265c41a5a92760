//! Plurality voting.
//!
//! The day's ballot is the union of the round script's vote intents and
//! the user's explicit selection. A voter with no entry abstains. The seat
//! with the strictly highest count is eliminated; any tie at the eventual
//! maximum eliminates no one.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{GameState, PlayerId};

/// The result of resolving a day's ballots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// One seat had the strictly highest count and is banished.
    Eliminated {
        seat: PlayerId,
        votes: u32,
    },
    /// The maximum was shared (or nobody voted); no one is banished.
    NoElimination,
}

/// Merge script votes with the user's ballot, dropping invalid entries.
///
/// Script entries are kept only when the voter is a live non-user seat and
/// the target is a live seat; everything else counts as an abstention. The
/// user's ballot, already validated by the caller, is added last under the
/// user's own seat.
#[must_use]
pub(crate) fn collect_ballots(
    state: &GameState,
    script_votes: &FxHashMap<PlayerId, PlayerId>,
    user_vote: Option<PlayerId>,
) -> FxHashMap<PlayerId, PlayerId> {
    let mut ballots = FxHashMap::default();

    for (&voter, &target) in script_votes {
        let voter_ok = state
            .try_player(voter)
            .is_some_and(|p| p.is_alive && !p.is_user);
        let target_ok = state.try_player(target).is_some_and(|p| p.is_alive);

        if voter_ok && target_ok {
            ballots.insert(voter, target);
        } else {
            debug!(voter = voter.0, target = target.0, "dropping invalid ballot");
        }
    }

    if let Some(target) = user_vote {
        ballots.insert(state.user_seat(), target);
    }

    ballots
}

/// Resolve ballots into an outcome.
///
/// Only the eventual maximum matters for tie detection: `{A:2, B:2, C:1}`
/// is a tie, `{A:3, B:2, C:2}` eliminates A.
#[must_use]
pub(crate) fn resolve_plurality(ballots: &FxHashMap<PlayerId, PlayerId>) -> VoteOutcome {
    let mut counts: FxHashMap<PlayerId, u32> = FxHashMap::default();
    for &target in ballots.values() {
        *counts.entry(target).or_insert(0) += 1;
    }

    let Some(&max) = counts.values().max() else {
        return VoteOutcome::NoElimination;
    };

    let mut leaders = counts.iter().filter(|(_, &count)| count == max);
    let (&seat, _) = leaders.next().expect("max came from this map");

    if leaders.next().is_some() {
        return VoteOutcome::NoElimination;
    }

    VoteOutcome::Eliminated { seat, votes: max }
}
