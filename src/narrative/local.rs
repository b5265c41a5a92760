//! A built-in, zero-I/O narrative generator.
//!
//! Produces serviceable table talk without any external model: each live
//! non-user player speaks once or twice from small canned pools, and votes
//! consistently with their hidden role. Useful for offline play and as a
//! production-shaped stand-in during development.

use rustc_hash::FxHashMap;

use crate::core::{GameRng, PlayerId, Role};
use crate::error::GeneratorError;

use super::script::{DiscussionLine, DiscussionScript, NarrativeGenerator, ScriptRequest};

const DEFENSES: &[&str] = &[
    "I was asleep all night, ask anyone.",
    "I'm just a villager, there's nothing to find here.",
    "Whoever it was, it wasn't me.",
    "I don't like how quiet some of you are being.",
    "We should think about who benefited from last night.",
];

const ACCUSATIONS: &[&str] = &[
    "{name} has been dodging every question.",
    "I'd look hard at {name} if I were you.",
    "Something about {name}'s story doesn't add up.",
    "{name} was awfully quick to point fingers yesterday.",
];

/// Role-consistent scripted narrator backed by its own seeded RNG.
#[derive(Clone, Debug)]
pub struct LocalNarrator {
    rng: GameRng,
}

impl LocalNarrator {
    /// Create a narrator with its own seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    fn pick_line(&mut self, pool: &[&str]) -> String {
        let idx = self.rng.gen_range_usize(0..pool.len());
        pool[idx].to_string()
    }
}

impl NarrativeGenerator for LocalNarrator {
    fn generate(
        &mut self,
        request: &ScriptRequest<'_>,
    ) -> Result<DiscussionScript, GeneratorError> {
        let speakers: Vec<PlayerId> = request
            .players
            .iter()
            .filter(|(_, p)| p.is_alive && !p.is_user)
            .map(|(seat, _)| seat)
            .collect();

        let live: Vec<PlayerId> = request
            .players
            .iter()
            .filter(|(_, p)| p.is_alive)
            .map(|(seat, _)| seat)
            .collect();

        let mut discussions = Vec::new();
        let mut votes: FxHashMap<PlayerId, PlayerId> = FxHashMap::default();

        for &speaker in &speakers {
            discussions.push(DiscussionLine {
                speaker,
                content: self.pick_line(DEFENSES),
                target: None,
            });

            // Roughly half the table adds a pointed second line.
            if self.rng.gen_bool(0.5) {
                let suspects: Vec<PlayerId> =
                    live.iter().copied().filter(|&s| s != speaker).collect();
                if let Some(&accused) = self.rng.choose(&suspects) {
                    let name = request.players[accused].name().to_string();
                    discussions.push(DiscussionLine {
                        speaker,
                        content: self.pick_line(ACCUSATIONS).replace("{name}", &name),
                        target: Some(accused),
                    });
                }
            }

            // Vote in character: wolves hunt the village, the village
            // guesses.
            let role = request.players[speaker].role;
            let candidates: Vec<PlayerId> = match role {
                Role::Werewolf => live
                    .iter()
                    .copied()
                    .filter(|&s| request.players[s].role != Role::Werewolf)
                    .collect(),
                _ => live.iter().copied().filter(|&s| s != speaker).collect(),
            };
            if let Some(&ballot) = self.rng.choose(&candidates) {
                votes.insert(speaker, ballot);
            }
        }

        Ok(DiscussionScript { discussions, votes })
    }
}
