//! The narrative seam: script types, the generator trait, and the
//! built-in local implementation.

pub mod local;
pub mod script;

pub use local::LocalNarrator;
pub use script::{
    DiscussionLine, DiscussionScript, NarrativeGenerator, ScriptRequest, FALLBACK_LINE,
};
