//! # werewolf-engine
//!
//! A turn-based Werewolf/Mafia social-deduction engine for a 6-seat table:
//! one human user, five scripted companions.
//!
//! ## Design Principles
//!
//! 1. **Library, not app**: the engine exposes operations to a presentation
//!    layer and owns no I/O, no timers, and no persistence.
//!
//! 2. **One seam**: the only external integration point is the
//!    [`NarrativeGenerator`], which returns a whole round script (dialogue
//!    lines + vote intents) in a single fallible call. Failure degrades to
//!    a fallback line; the day always reaches the vote.
//!
//! 3. **Seeded chance**: every randomized decision (the role shuffle, the
//!    substitute wolf kill, the simulated witch's coin flip, reveal jitter)
//!    draws from an injected [`GameRng`], so a seed pins a game's outcomes.
//!
//! ## Game loop
//!
//! Setup → night (werewolf → witch save → witch poison → seer → end) → day
//! discussion (one generator call, line-by-line playback) → day vote
//! (plurality, ties lynch no one) → back to setup, with win evaluation
//! after every elimination.
//!
//! ## Modules
//!
//! - `core`: identities, players/roles, state, RNG, transcript
//! - `roles`: the fixed role deck and the deal
//! - `night`: the night sub-phase state machine
//! - `day`: script playback and plurality voting
//! - `narrative`: the generator contract and a built-in local narrator
//! - `rules`: win-condition evaluation
//! - `game`: the orchestrating `Game` type and its builder

pub mod core;
pub mod day;
pub mod error;
pub mod game;
pub mod narrative;
pub mod night;
pub mod roles;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Faction, GameLog, GameRng, GameState, Identity, LogEntry, Phase, Player, PlayerId, PlayerMap,
    Role, Speaker, VerifyResult, WitchPotions,
};

pub use crate::day::{ScriptLine, ScriptPlayback, VoteOutcome};

pub use crate::error::{ActionError, GeneratorError};

pub use crate::game::{Game, GameBuilder};

pub use crate::narrative::{
    DiscussionLine, DiscussionScript, LocalNarrator, NarrativeGenerator, ScriptRequest,
    FALLBACK_LINE,
};

pub use crate::night::{NightPhase, NightResolver, NightStatus};

pub use crate::roles::{RoleDeck, TABLE_SIZE};

pub use crate::rules::evaluate_winner;
