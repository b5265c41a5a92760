//! Engine error taxonomy.
//!
//! Everything here is locally recoverable: a rejected action mutates
//! nothing and the caller re-prompts. Structural invariant violations
//! (role multiset mismatch, double elimination) are programmer errors and
//! assert instead.

use thiserror::Error;

use crate::core::{Phase, PlayerId};
use crate::night::NightPhase;

/// A rejected player action. No state was mutated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The operation is not legal in the current coarse phase.
    #[error("not legal in phase {phase:?}")]
    WrongPhase { phase: Phase },

    /// The night submission does not match the awaited sub-phase.
    #[error("night is in sub-phase {phase:?}")]
    WrongNightPhase { phase: NightPhase },

    /// The submission came from a seat that does not hold the acting role.
    #[error("the acting seat does not hold that role")]
    NotTheActor,

    /// The acting player is dead and cannot act.
    #[error("the acting player is dead")]
    ActorDead,

    /// The chosen seat does not exist at this table.
    #[error("unknown seat {0}")]
    UnknownSeat(PlayerId),

    /// The chosen seat is already dead.
    #[error("{0} is not alive")]
    DeadTarget(PlayerId),

    /// Self-targeting is forbidden for this action.
    #[error("cannot target your own seat")]
    SelfTarget,

    /// Werewolves cannot target their own pack.
    #[error("{0} is a werewolf")]
    WerewolfTarget(PlayerId),

    /// The required potion has already been consumed.
    #[error("that potion has already been used")]
    PotionSpent,

    /// The user already made this day's statement.
    #[error("the user has already spoken today")]
    AlreadySpoken,

    /// A discussion script is already being played for this day.
    #[error("a discussion script is already in flight")]
    ScriptInFlight,

    /// The game has a winner; no further operations are accepted.
    #[error("the game is over")]
    GameOver,
}

/// A failed narrative generator call.
///
/// The engine never retries these; it substitutes the fallback discussion
/// line and moves the day to voting.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The request could not be made or did not come back.
    #[error("narrative request failed: {0}")]
    Request(String),

    /// The response came back but could not be understood.
    #[error("narrative response could not be parsed: {0}")]
    Parse(String),
}
