//! The orchestrating game type.
//!
//! `Game` owns the authoritative state, the engine RNG, and the injected
//! narrative generator, and sequences the loop: setup → night → day
//! discussion → day voting → back to setup, with the win evaluation run
//! after every elimination.
//!
//! All user interaction flows through the submission methods; each either
//! mutates the state and advances, or rejects the input with an
//! [`ActionError`] and mutates nothing.

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::core::{
    Faction, GameRng, GameState, Identity, LogEntry, Phase, Player, PlayerId, PlayerMap,
};
use crate::day::discussion::ScriptPlayback;
use crate::day::voting::{collect_ballots, resolve_plurality};
use crate::day::{ScriptLine, VoteOutcome};
use crate::error::ActionError;
use crate::narrative::{LocalNarrator, NarrativeGenerator, ScriptRequest, FALLBACK_LINE};
use crate::night::{NightResolver, NightStatus};
use crate::roles::{RoleDeck, TABLE_SIZE};
use crate::rules;

/// Per-day bookkeeping for the discussion and vote.
#[derive(Debug, Default)]
struct DayTurn {
    user_spoken: bool,
    playback: Option<ScriptPlayback>,
    script_votes: FxHashMap<PlayerId, PlayerId>,
}

/// Builder for seating a table and starting a game.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::Identity;
/// use werewolf_engine::game::GameBuilder;
///
/// let game = GameBuilder::new(Identity::new("me", "Morgan", ""))
///     .companion(Identity::new("c1", "Ash", ""))
///     .companion(Identity::new("c2", "Briar", ""))
///     .build(42);
///
/// assert_eq!(game.state().seat_count(), 6);
/// ```
pub struct GameBuilder {
    user: Identity,
    companions: Vec<Identity>,
    generator: Option<Box<dyn NarrativeGenerator>>,
}

impl GameBuilder {
    /// Start a builder with the user's identity.
    #[must_use]
    pub fn new(user: Identity) -> Self {
        Self {
            user,
            companions: Vec::new(),
            generator: None,
        }
    }

    /// Seat one companion. At most five can be seated.
    #[must_use]
    pub fn companion(mut self, identity: Identity) -> Self {
        assert!(
            self.companions.len() < TABLE_SIZE - 1,
            "At most {} companions",
            TABLE_SIZE - 1
        );
        self.companions.push(identity);
        self
    }

    /// Seat several companions at once.
    #[must_use]
    pub fn companions(mut self, identities: impl IntoIterator<Item = Identity>) -> Self {
        for identity in identities {
            self = self.companion(identity);
        }
        self
    }

    /// Inject the narrative generator.
    ///
    /// Defaults to a [`LocalNarrator`] seeded alongside the game.
    #[must_use]
    pub fn generator(mut self, generator: Box<dyn NarrativeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Deal roles and seat the table.
    ///
    /// Missing companion seats are padded with filler identities. The
    /// shuffle, every simulated night decision, and the reveal jitter all
    /// derive from `seed`.
    #[must_use]
    pub fn build(self, seed: u64) -> Game {
        let mut rng = GameRng::new(seed);

        let mut identities = Vec::with_capacity(TABLE_SIZE);
        identities.push(self.user);
        identities.extend(self.companions);

        let taken: Vec<&str> = identities.iter().map(|i| i.display_name.as_str()).collect();
        let fillers = Identity::fillers(TABLE_SIZE - identities.len(), &taken);
        identities.extend(fillers);

        let deck = RoleDeck::standard();
        assert!(
            deck.len() == identities.len(),
            "Deck size must match the table"
        );
        let dealt = deck.deal(&mut rng);

        let players: Vec<Player> = identities
            .into_iter()
            .zip(dealt)
            .enumerate()
            .map(|(seat, (identity, role))| Player::new(identity, role, seat == 0))
            .collect();

        let generator = self
            .generator
            .unwrap_or_else(|| Box::new(LocalNarrator::new(seed)));

        info!(seed, "table seated");

        Game {
            state: GameState::new(PlayerMap::from_vec(players)),
            rng,
            generator,
            night: None,
            day_turn: None,
        }
    }
}

/// A running game.
pub struct Game {
    state: GameState,
    rng: GameRng,
    generator: Box<dyn NarrativeGenerator>,
    night: Option<NightResolver>,
    day_turn: Option<DayTurn>,
}

impl Game {
    /// The authoritative state, read-only.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The in-progress night, if one is running.
    #[must_use]
    pub fn night(&self) -> Option<&NightResolver> {
        self.night.as_ref()
    }

    /// Evaluate the win condition without mutating anything.
    #[must_use]
    pub fn check_game_over(&self) -> Option<Faction> {
        rules::evaluate_winner(&self.state)
    }

    fn ensure_active(&self) -> Result<(), ActionError> {
        if self.state.phase() == Phase::GameOver || self.state.winner().is_some() {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    // === Night ===

    /// Begin the night.
    ///
    /// Runs the night machine until user input is required or, when the
    /// user holds no live night role, all the way through to dawn.
    pub fn start_night(&mut self) -> Result<NightStatus, ActionError> {
        self.ensure_active()?;
        if self.state.phase() != Phase::Setup {
            return Err(ActionError::WrongPhase {
                phase: self.state.phase(),
            });
        }

        info!(day = self.state.day(), "night falls");
        self.state.set_phase(Phase::Night);
        let mut night = NightResolver::new();
        let status = night.advance(&mut self.state, &mut self.rng);
        self.night = Some(night);
        Ok(self.after_night(status))
    }

    /// The user-werewolf picks tonight's victim.
    pub fn submit_werewolf_kill(&mut self, target: PlayerId) -> Result<NightStatus, ActionError> {
        self.ensure_active()?;
        let night = self.night.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.state.phase(),
        })?;
        let status = night.submit_werewolf_kill(&mut self.state, &mut self.rng, target)?;
        Ok(self.after_night(status))
    }

    /// The user-witch decides on the heal.
    pub fn submit_witch_save(&mut self, save: bool) -> Result<NightStatus, ActionError> {
        self.ensure_active()?;
        let night = self.night.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.state.phase(),
        })?;
        let status = night.submit_witch_save(&mut self.state, &mut self.rng, save)?;
        Ok(self.after_night(status))
    }

    /// The user-witch poisons a seat, or declines with `None`.
    pub fn submit_witch_poison(
        &mut self,
        target: Option<PlayerId>,
    ) -> Result<NightStatus, ActionError> {
        self.ensure_active()?;
        let night = self.night.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.state.phase(),
        })?;
        let status = night.submit_witch_poison(&mut self.state, &mut self.rng, target)?;
        Ok(self.after_night(status))
    }

    /// The user-seer inspects a seat.
    pub fn submit_seer_verify(&mut self, target: PlayerId) -> Result<NightStatus, ActionError> {
        self.ensure_active()?;
        let night = self.night.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.state.phase(),
        })?;
        let status = night.submit_seer_verify(&mut self.state, target)?;
        Ok(self.after_night(status))
    }

    /// The user-seer acknowledges the inspection result.
    pub fn acknowledge_verify(&mut self) -> Result<NightStatus, ActionError> {
        self.ensure_active()?;
        let night = self.night.as_mut().ok_or(ActionError::WrongPhase {
            phase: self.state.phase(),
        })?;
        let status = night.acknowledge_verify(&mut self.state, &mut self.rng)?;
        Ok(self.after_night(status))
    }

    /// Tear down a finished night and open the day.
    fn after_night(&mut self, status: NightStatus) -> NightStatus {
        if status == NightStatus::Finished {
            self.night = None;
            if self.state.phase() == Phase::DayDiscussion {
                self.day_turn = Some(DayTurn::default());
            }
        }
        status
    }

    // === Day discussion ===

    /// The user makes their public statement, triggering the day's one
    /// generator call.
    pub fn submit_user_speech(&mut self, text: &str) -> Result<(), ActionError> {
        self.ensure_active()?;
        if self.state.phase() != Phase::DayDiscussion {
            return Err(ActionError::WrongPhase {
                phase: self.state.phase(),
            });
        }
        let user = self.state.user_seat();
        if !self.state.player(user).is_alive {
            return Err(ActionError::ActorDead);
        }
        let day = self.day_turn.as_ref().expect("day turn exists in discussion");
        if day.user_spoken {
            return Err(ActionError::AlreadySpoken);
        }
        if day.playback.is_some() {
            return Err(ActionError::ScriptInFlight);
        }

        self.state.push_log(LogEntry::player(user, text));
        self.day_turn.as_mut().expect("checked above").user_spoken = true;
        self.run_generator();
        Ok(())
    }

    /// Pass over the user's statement (a dead user's seat, or a live user
    /// staying silent) and trigger the generator.
    pub fn skip_user_speech(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        if self.state.phase() != Phase::DayDiscussion {
            return Err(ActionError::WrongPhase {
                phase: self.state.phase(),
            });
        }
        let day = self.day_turn.as_ref().expect("day turn exists in discussion");
        if day.user_spoken {
            return Err(ActionError::AlreadySpoken);
        }
        if day.playback.is_some() {
            return Err(ActionError::ScriptInFlight);
        }

        self.day_turn.as_mut().expect("checked above").user_spoken = true;
        self.run_generator();
        Ok(())
    }

    /// One generator call per day; failure substitutes the fallback line.
    fn run_generator(&mut self) {
        let speakers_left = self
            .state
            .live_seats_where(|p| !p.is_user)
            .next()
            .is_some();
        if !speakers_left {
            self.finish_discussion();
            return;
        }

        let request = ScriptRequest {
            players: self.state.roster(),
            day: self.state.day(),
            dead_this_night: self.state.dead_this_night(),
        };
        match self.generator.generate(&request) {
            Ok(script) => {
                let playback = ScriptPlayback::new(&script, &self.state, &mut self.rng);
                let day = self.day_turn.as_mut().expect("day turn exists");
                day.script_votes = script.votes;
                if playback.is_finished() {
                    self.finish_discussion();
                } else {
                    day.playback = Some(playback);
                }
            }
            Err(err) => {
                warn!(%err, "narrative generator failed; falling back");
                self.state.push_log(LogEntry::moderator(FALLBACK_LINE));
                self.finish_discussion();
            }
        }
    }

    /// Reveal the next scripted line, if playback is running.
    ///
    /// The returned line has already been appended to the transcript; its
    /// `delay_ms` tells the presentation how long to sit on it before
    /// rendering. `Ok(None)` means there is nothing to reveal right now.
    pub fn poll_script_line(&mut self) -> Result<Option<ScriptLine>, ActionError> {
        self.ensure_active()?;
        if self.state.phase() != Phase::DayDiscussion {
            return Err(ActionError::WrongPhase {
                phase: self.state.phase(),
            });
        }

        let Some(day) = self.day_turn.as_mut() else {
            return Ok(None);
        };
        let Some(playback) = day.playback.as_mut() else {
            return Ok(None);
        };

        let Some(line) = playback.next_line() else {
            return Ok(None);
        };
        let finished = playback.is_finished();

        self.state
            .push_log(LogEntry::player(line.speaker, line.content.clone()));
        if finished {
            day.playback = None;
            self.finish_discussion();
        }
        Ok(Some(line))
    }

    /// Close the discussion and open the ballot.
    fn finish_discussion(&mut self) {
        self.state.push_log(LogEntry::moderator(
            "The discussion is over. Cast your votes.",
        ));
        self.state.set_phase(Phase::DayVoting);
    }

    // === Day voting ===

    /// Cast the user's ballot (`None` abstains) and resolve the day's vote.
    pub fn submit_vote(&mut self, choice: Option<PlayerId>) -> Result<VoteOutcome, ActionError> {
        self.ensure_active()?;
        if self.state.phase() != Phase::DayVoting {
            return Err(ActionError::WrongPhase {
                phase: self.state.phase(),
            });
        }

        let user = self.state.user_seat();
        if let Some(target) = choice {
            if !self.state.player(user).is_alive {
                return Err(ActionError::ActorDead);
            }
            let picked = self
                .state
                .try_player(target)
                .ok_or(ActionError::UnknownSeat(target))?;
            if !picked.is_alive {
                return Err(ActionError::DeadTarget(target));
            }
            if target == user {
                return Err(ActionError::SelfTarget);
            }
        }

        let day = self.day_turn.take().expect("day turn exists in voting");
        let ballots = collect_ballots(&self.state, &day.script_votes, choice);
        let outcome = resolve_plurality(&ballots);

        match outcome {
            VoteOutcome::Eliminated { seat, votes } => {
                self.state.push_log(LogEntry::moderator(format!(
                    "The vote ends: {} is banished with {} votes.",
                    self.state.player(seat).name(),
                    votes
                )));
                self.state.mark_dead(seat);
                info!(seat = seat.0, votes, "day elimination");

                if let Some(winner) = rules::evaluate_winner(&self.state) {
                    self.state.set_winner(winner);
                    self.state
                        .push_log(LogEntry::moderator(rules::win_announcement(winner)));
                    self.state.set_phase(Phase::GameOver);
                } else {
                    self.state.set_phase(Phase::Setup);
                }
            }
            VoteOutcome::NoElimination => {
                self.state.push_log(LogEntry::moderator(
                    "The vote is tied. No one is banished.",
                ));
                self.state.set_phase(Phase::Setup);
            }
        }

        Ok(outcome)
    }

    // === Concession ===

    /// The user concedes: pending script lines are cancelled and the
    /// opposing faction takes the win immediately.
    pub fn concede(&mut self) -> Result<Faction, ActionError> {
        self.ensure_active()?;

        if let Some(day) = self.day_turn.as_mut() {
            if let Some(playback) = day.playback.as_mut() {
                playback.cancel();
            }
        }
        self.night = None;
        self.day_turn = None;

        let user = self.state.user_seat();
        let winner = self.state.player(user).role.faction().opponent();
        self.state.push_log(LogEntry::moderator(format!(
            "{} concedes the game.",
            self.state.player(user).name()
        )));
        self.state.set_winner(winner);
        self.state
            .push_log(LogEntry::moderator(rules::win_announcement(winner)));
        self.state.set_phase(Phase::GameOver);

        info!(?winner, "user conceded");
        Ok(winner)
    }
}
