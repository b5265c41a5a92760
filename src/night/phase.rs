//! Night sub-phase ordering.

use serde::{Deserialize, Serialize};

/// The strictly sequential night sub-phases.
///
/// A sub-phase is skipped only when its acting role is absent, dead, or
/// has no legal action; it is never reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightPhase {
    /// The wolves pick a kill target.
    Werewolf,
    /// The witch may spend the heal on the pending victim.
    WitchSave,
    /// The witch may spend the poison on a new target.
    WitchPoison,
    /// The seer inspects one live player.
    Seer,
    /// Finalize casualties and hand over to the day.
    End,
}

impl NightPhase {
    /// The sub-phase that follows this one. `End` is a fixed point.
    #[must_use]
    pub const fn next(self) -> NightPhase {
        match self {
            NightPhase::Werewolf => NightPhase::WitchSave,
            NightPhase::WitchSave => NightPhase::WitchPoison,
            NightPhase::WitchPoison => NightPhase::Seer,
            NightPhase::Seer => NightPhase::End,
            NightPhase::End => NightPhase::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let mut phase = NightPhase::Werewolf;
        let mut visited = vec![phase];

        while phase != NightPhase::End {
            phase = phase.next();
            visited.push(phase);
        }

        assert_eq!(
            visited,
            vec![
                NightPhase::Werewolf,
                NightPhase::WitchSave,
                NightPhase::WitchPoison,
                NightPhase::Seer,
                NightPhase::End,
            ]
        );
    }

    #[test]
    fn test_end_is_terminal() {
        assert_eq!(NightPhase::End.next(), NightPhase::End);
    }
}
