//! Script playback for the discussion phase.
//!
//! The generator returns a whole round script at once; the table should
//! not hear it all at once. `ScriptPlayback` queues the valid lines with a
//! randomized per-line reveal delay and hands them out one at a time. The
//! presentation layer owns the clock: take a line, wait its delay, render
//! it, poll again. Cancelling (the user conceding mid-playback) drops all
//! pending lines.
//!
//! Lines attributed to an unknown or dead speaker are dropped at queue
//! time; the rest of a partial script still plays out in order.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{GameRng, GameState, PlayerId};
use crate::narrative::DiscussionScript;

/// Reveal delay bounds, in milliseconds.
const REVEAL_DELAY_MS: std::ops::Range<u64> = 2000..3000;

/// One line ready to be revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptLine {
    /// The live seat speaking.
    pub speaker: PlayerId,

    /// The dialogue.
    pub content: String,

    /// Who the line is aimed at, if anyone.
    pub target: Option<PlayerId>,

    /// How long the presentation should wait before showing this line.
    pub delay_ms: u64,
}

/// A round script mid-reveal.
#[derive(Clone, Debug)]
pub struct ScriptPlayback {
    queue: VecDeque<ScriptLine>,
    cancelled: bool,
}

impl ScriptPlayback {
    /// Queue a script's valid lines, stamping each with a reveal delay.
    #[must_use]
    pub(crate) fn new(script: &DiscussionScript, state: &GameState, rng: &mut GameRng) -> Self {
        let mut queue = VecDeque::with_capacity(script.discussions.len());

        for line in &script.discussions {
            let valid = state
                .try_player(line.speaker)
                .is_some_and(|p| p.is_alive && !p.is_user);
            if !valid {
                debug!(speaker = line.speaker.0, "dropping line from invalid speaker");
                continue;
            }

            queue.push_back(ScriptLine {
                speaker: line.speaker,
                content: line.content.clone(),
                target: line.target,
                delay_ms: rng.gen_range_u64(REVEAL_DELAY_MS),
            });
        }

        Self {
            queue,
            cancelled: false,
        }
    }

    /// Take the next line to reveal.
    ///
    /// Returns `None` once the script is exhausted or cancelled.
    pub fn next_line(&mut self) -> Option<ScriptLine> {
        if self.cancelled {
            return None;
        }
        self.queue.pop_front()
    }

    /// Drop all pending lines. No further lines will be revealed.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.queue.clear();
    }

    /// Whether playback was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Lines not yet revealed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Whether every line has been handed out (or cancelled away).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}
