//! Night resolution: sub-phase ordering and the resolver state machine.

pub mod phase;
pub mod resolver;

pub use phase::NightPhase;
pub use resolver::{NightResolver, NightStatus};
