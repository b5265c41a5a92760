//! External participant identities and filler-seat generation.
//!
//! The engine never fetches or validates identities: identity resolution
//! and avatar storage belong to external collaborators. It only needs an
//! opaque `{ id, display_name, avatar_ref }` triple per seat, and a way to
//! pad a short companion list up to the fixed table size.

use serde::{Deserialize, Serialize};

/// Names handed to filler seats when fewer than five companions are supplied.
const FILLER_NAMES: &[&str] = &[
    "Drifter", "Stranger", "Wanderer", "Onlooker", "Newcomer",
    "Milo", "Rosa", "Jasper", "Lena", "Hugh",
    "Sage", "Perry", "June", "Arlo", "Wren",
];

/// An opaque participant identity supplied by the caller.
///
/// `avatar_ref` is a handle owned by an external presentation layer; the
/// engine stores it untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// External identifier, opaque to the engine.
    pub id: String,

    /// Name shown in the transcript.
    pub display_name: String,

    /// Avatar handle, opaque to the engine.
    pub avatar_ref: String,
}

impl Identity {
    /// Create an identity from its three opaque parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        avatar_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_ref: avatar_ref.into(),
        }
    }

    /// Generate filler identities for unfilled seats.
    ///
    /// Picks from a fixed name pool, skipping any name already present in
    /// `taken_names`. Filler avatars are empty; the presentation layer
    /// renders a placeholder for them.
    #[must_use]
    pub fn fillers(count: usize, taken_names: &[&str]) -> Vec<Identity> {
        FILLER_NAMES
            .iter()
            .filter(|name| !taken_names.contains(*name))
            .take(count)
            .enumerate()
            .map(|(i, name)| Identity::new(format!("filler_{i}"), *name, ""))
            .collect()
    }
}
