//! The public game transcript.
//!
//! Everything said at the table lands here in order: moderator
//! announcements (dawn reports, vote results, the win call), player
//! discussion lines, and the user's own statements. Backed by a persistent
//! vector so presentation layers can snapshot the transcript cheaply.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Who a transcript entry is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The impartial narrator running the table.
    Moderator,
    /// A seated player.
    Player(PlayerId),
}

/// One line of the public transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub speaker: Speaker,
    pub content: String,
}

impl LogEntry {
    /// A moderator announcement.
    #[must_use]
    pub fn moderator(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Moderator,
            content: content.into(),
        }
    }

    /// A line spoken by a player.
    #[must_use]
    pub fn player(seat: PlayerId, content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Player(seat),
            content: content.into(),
        }
    }
}

/// Append-only transcript with O(1) snapshot clones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<LogEntry>,
}

impl GameLog {
    /// An empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Iterate over entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}
