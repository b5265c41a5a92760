//! Authoritative game state.
//!
//! ## GameState
//!
//! The single mutable record for a game: the seated players, the coarse
//! phase, the day counter, the public transcript, the night's casualties,
//! the witch's consumables, the winner once decided, and the pending seer
//! result.
//!
//! Mutation goes through narrow crate-internal methods so the state
//! invariants hold by construction:
//! - the roster and its role multiset never change after setup; only
//!   `is_alive` (and the presentation-owned `status_tag`) mutate;
//! - each potion is spent at most once, ever;
//! - `day` never decreases;
//! - a player is eliminated at most once.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::log::{GameLog, LogEntry};
use super::player::{Faction, Player, PlayerId, PlayerMap, Role};

/// Coarse engine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Pre-game, and the lobby between a day vote and the next night.
    Setup,
    /// Night sub-phases are running (see `night::NightPhase`).
    Night,
    /// Dawn announcement made; waiting on speech and script playback.
    DayDiscussion,
    /// Script played out; waiting on the ballot.
    DayVoting,
    /// Terminal. Every further operation is rejected.
    GameOver,
}

/// The witch's single-use consumables.
///
/// Each flag transitions true → false at most once across an entire game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitchPotions {
    pub heal: bool,
    pub poison: bool,
}

impl Default for WitchPotions {
    fn default() -> Self {
        Self {
            heal: true,
            poison: true,
        }
    }
}

/// What the seer learned tonight. Cleared on acknowledgement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    /// The inspected seat.
    pub target: PlayerId,
    /// Whether that seat holds a werewolf.
    pub is_werewolf: bool,
}

/// The authoritative mutable record of one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    players: PlayerMap<Player>,
    phase: Phase,
    day: u32,
    log: GameLog,
    dead_this_night: SmallVec<[PlayerId; 1]>,
    witch_potions: WitchPotions,
    winner: Option<Faction>,
    verify_result: Option<VerifyResult>,
}

impl GameState {
    /// Create the state for a freshly seated table.
    ///
    /// Starts in `Setup` at day 0 with both potions available and an empty
    /// transcript. Exactly one seated player must be the user.
    #[must_use]
    pub fn new(players: PlayerMap<Player>) -> Self {
        let user_seats = players.iter().filter(|(_, p)| p.is_user).count();
        assert!(user_seats == 1, "Exactly one seat must hold the user");

        Self {
            players,
            phase: Phase::Setup,
            day: 0,
            log: GameLog::new(),
            dead_this_night: SmallVec::new(),
            witch_potions: WitchPotions::default(),
            winner: None,
            verify_result: None,
        }
    }

    // === Roster ===

    /// Number of seats at the table.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.players.seat_count()
    }

    /// A seat's player record.
    #[must_use]
    pub fn player(&self, seat: PlayerId) -> &Player {
        &self.players[seat]
    }

    /// Checked seat lookup.
    #[must_use]
    pub fn try_player(&self, seat: PlayerId) -> Option<&Player> {
        self.players.try_get(seat)
    }

    /// Iterate all seats in table order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter()
    }

    /// The full seat-ordered roster.
    #[must_use]
    pub fn roster(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// The user's seat.
    #[must_use]
    pub fn user_seat(&self) -> PlayerId {
        self.players
            .iter()
            .find(|(_, p)| p.is_user)
            .map(|(seat, _)| seat)
            .expect("roster always contains the user")
    }

    /// Whether a seat is occupied by a live player.
    #[must_use]
    pub fn is_alive(&self, seat: PlayerId) -> bool {
        self.players.try_get(seat).is_some_and(|p| p.is_alive)
    }

    /// Live seats matching a predicate, in table order.
    pub fn live_seats_where<'a>(
        &'a self,
        pred: impl Fn(&Player) -> bool + 'a,
    ) -> impl Iterator<Item = PlayerId> + 'a {
        self.players
            .iter()
            .filter(move |(_, p)| p.is_alive && pred(p))
            .map(|(seat, _)| seat)
    }

    /// The live seat holding `role`, if any.
    ///
    /// Valid for the singleton roles (seer, witch); for werewolves it
    /// returns the first live one in table order.
    #[must_use]
    pub fn live_seat_with_role(&self, role: Role) -> Option<PlayerId> {
        self.live_seats_where(move |p| p.role == role).next()
    }

    /// Set a seat's presentation tag. The engine never reads it back.
    pub fn set_status_tag(&mut self, seat: PlayerId, tag: Option<String>) {
        self.players[seat].status_tag = tag;
    }

    /// Eliminate a seat.
    ///
    /// A seat dies at most once; eliminating it twice is a setup bug.
    pub(crate) fn mark_dead(&mut self, seat: PlayerId) {
        let player = &mut self.players[seat];
        assert!(player.is_alive, "double elimination of {seat}");
        player.is_alive = false;
        debug!(seat = seat.0, name = %player.identity.display_name, "player eliminated");
    }

    // === Phase & day ===

    /// Current coarse phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Completed-night counter. Day 0 is before the first night.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Called exactly once per completed night.
    pub(crate) fn advance_day(&mut self) {
        self.day += 1;
    }

    // === Night results ===

    /// Seats that died during the most recent night (0 or 1 entries).
    #[must_use]
    pub fn dead_this_night(&self) -> &[PlayerId] {
        &self.dead_this_night
    }

    pub(crate) fn set_dead_this_night(&mut self, dead: SmallVec<[PlayerId; 1]>) {
        self.dead_this_night = dead;
    }

    // === Potions ===

    /// Remaining witch consumables.
    #[must_use]
    pub fn witch_potions(&self) -> WitchPotions {
        self.witch_potions
    }

    pub(crate) fn spend_heal(&mut self) {
        assert!(self.witch_potions.heal, "heal potion spent twice");
        self.witch_potions.heal = false;
    }

    pub(crate) fn spend_poison(&mut self) {
        assert!(self.witch_potions.poison, "poison potion spent twice");
        self.witch_potions.poison = false;
    }

    // === Winner ===

    /// The winning faction once the game is decided.
    #[must_use]
    pub fn winner(&self) -> Option<Faction> {
        self.winner
    }

    pub(crate) fn set_winner(&mut self, faction: Faction) {
        self.winner = Some(faction);
    }

    // === Seer result ===

    /// The pending seer result, if the user-seer has not acknowledged yet.
    #[must_use]
    pub fn verify_result(&self) -> Option<VerifyResult> {
        self.verify_result
    }

    pub(crate) fn set_verify_result(&mut self, result: VerifyResult) {
        self.verify_result = Some(result);
    }

    pub(crate) fn clear_verify_result(&mut self) {
        self.verify_result = None;
    }

    // === Transcript ===

    /// The public transcript.
    #[must_use]
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub(crate) fn push_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }
}
