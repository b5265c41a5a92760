//! Day resolution: scripted discussion playback and plurality voting.

pub mod discussion;
pub mod voting;

pub use discussion::{ScriptLine, ScriptPlayback};
pub use voting::VoteOutcome;
