//! Core engine types: identities, players, roles, state, RNG, transcript.
//!
//! These are the building blocks the phase resolvers operate on. Nothing
//! here knows about night ordering or vote tallying; that logic lives in
//! the `night`, `day`, and `rules` modules.

pub mod identity;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use identity::Identity;
pub use log::{GameLog, LogEntry, Speaker};
pub use player::{Faction, Player, PlayerId, PlayerMap, Role};
pub use rng::GameRng;
pub use state::{GameState, Phase, VerifyResult, WitchPotions};
