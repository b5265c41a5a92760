//! The narrative generator contract.
//!
//! Once per day-discussion phase the engine asks an injected generator for
//! a "round script": a batch of in-character dialogue lines plus a vote
//! intent for each live non-user participant. The generator is the
//! engine's only external integration point; it may be backed by a remote
//! model, a canned corpus, or the built-in [`LocalNarrator`].
//!
//! [`LocalNarrator`]: super::LocalNarrator

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Player, PlayerId, PlayerMap};
use crate::error::GeneratorError;

/// One scripted dialogue line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionLine {
    /// The seat speaking the line.
    pub speaker: PlayerId,

    /// What they say.
    pub content: String,

    /// The seat the line is aimed at, for accusations and defenses.
    pub target: Option<PlayerId>,
}

/// A full round script: dialogue plus vote intents.
///
/// Immutable once received; the engine plays the lines out one at a time
/// and folds the votes into the day's ballot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionScript {
    /// Dialogue lines in speaking order.
    pub discussions: Vec<DiscussionLine>,

    /// Vote intent per voter seat.
    pub votes: FxHashMap<PlayerId, PlayerId>,
}

/// What the generator is told about the table.
#[derive(Clone, Copy, Debug)]
pub struct ScriptRequest<'a> {
    /// The full roster, roles included: the generator scripts each
    /// participant in character for their hidden role.
    pub players: &'a PlayerMap<Player>,

    /// Completed-night counter.
    pub day: u32,

    /// Who died last night (0 or 1 seats).
    pub dead_this_night: &'a [PlayerId],
}

/// The injected narrative capability.
///
/// A failed call is not retried; the engine substitutes a fallback line
/// and carries the day to voting regardless.
pub trait NarrativeGenerator {
    /// Produce one round script for the current day.
    fn generate(&mut self, request: &ScriptRequest<'_>)
        -> Result<DiscussionScript, GeneratorError>;
}

/// The moderator line substituted when the generator fails.
pub const FALLBACK_LINE: &str = "No one has anything to say.";
