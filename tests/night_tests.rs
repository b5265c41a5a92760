//! Night scenarios through the public surface.
//!
//! The deal is seeded, so these scan seeds until the user draws the role
//! a scenario needs, then play that night out deterministically.

use werewolf_engine::{
    ActionError, Game, GameBuilder, Identity, NightStatus, Phase, PlayerId, Role,
};

fn build_game(seed: u64) -> Game {
    GameBuilder::new(Identity::new("user", "Morgan", ""))
        .companions((1..6).map(|i| Identity::new(format!("c{i}"), format!("Companion {i}"), "")))
        .build(seed)
}

/// Find a seed that deals the user the wanted role.
fn game_where_user_is(role: Role) -> Game {
    for seed in 0..500 {
        let game = build_game(seed);
        if game.state().player(PlayerId::new(0)).role == role {
            return game;
        }
    }
    panic!("no seed in 0..500 dealt the user a {role}");
}

#[test]
fn test_user_wolf_night_pauses_then_resolves() {
    let mut game = game_where_user_is(Role::Werewolf);

    let status = game.start_night().unwrap();
    assert_eq!(status, NightStatus::AwaitingWerewolf);
    assert_eq!(game.state().phase(), Phase::Night);

    let target = game
        .state()
        .players()
        .find(|(_, p)| p.is_alive && p.role != Role::Werewolf)
        .map(|(seat, _)| seat)
        .unwrap();

    let status = game.submit_werewolf_kill(target).unwrap();
    assert_eq!(status, NightStatus::Finished);

    // The simulated witch may have saved the target; either way at most
    // one seat died and the day moved on.
    let dead = game.state().dead_this_night();
    assert!(dead.is_empty() || dead == [target]);
    assert_eq!(game.state().day(), 1);
    assert!(matches!(
        game.state().phase(),
        Phase::DayDiscussion | Phase::GameOver
    ));
}

#[test]
fn test_user_wolf_cannot_kill_packmate() {
    let mut game = game_where_user_is(Role::Werewolf);
    let _ = game.start_night().unwrap();

    let packmate = game
        .state()
        .players()
        .find(|(seat, p)| p.role == Role::Werewolf && seat.0 != 0)
        .map(|(seat, _)| seat)
        .unwrap();

    assert_eq!(
        game.submit_werewolf_kill(packmate),
        Err(ActionError::WerewolfTarget(packmate))
    );
    // Still waiting on a legal target.
    assert_eq!(game.state().phase(), Phase::Night);
}

#[test]
fn test_user_witch_successful_save() {
    // Scan for a night where the wolves picked someone other than the
    // witch herself, so the save is legal.
    for seed in 0..500 {
        let mut game = build_game(seed);
        if game.state().player(PlayerId::new(0)).role != Role::Witch {
            continue;
        }

        let status = game.start_night().unwrap();
        let NightStatus::AwaitingWitchSave { victim } = status else {
            continue;
        };
        if victim == PlayerId::new(0) {
            continue;
        }

        let status = game.submit_witch_save(true).unwrap();
        assert_eq!(status, NightStatus::AwaitingWitchPoison);
        let status = game.submit_witch_poison(None).unwrap();
        assert_eq!(status, NightStatus::Finished);

        assert!(game.state().dead_this_night().is_empty());
        assert!(game.state().is_alive(victim));
        assert!(!game.state().witch_potions().heal, "the save spent the heal");
        assert!(game.state().witch_potions().poison, "declining kept the poison");
        assert_eq!(game.state().day(), 1);
        return;
    }
    panic!("no seed produced a saveable victim for a user witch");
}

#[test]
fn test_user_witch_poison_overwrites_wolf_kill() {
    for seed in 0..500 {
        let mut game = build_game(seed);
        if game.state().player(PlayerId::new(0)).role != Role::Witch {
            continue;
        }

        let status = game.start_night().unwrap();
        let NightStatus::AwaitingWitchSave { victim } = status else {
            continue;
        };

        let status = game.submit_witch_save(false).unwrap();
        assert_eq!(status, NightStatus::AwaitingWitchPoison);

        // Poison someone other than the wolves' victim.
        let poisoned = game
            .state()
            .players()
            .find(|(seat, p)| p.is_alive && seat.0 != 0 && *seat != victim)
            .map(|(seat, _)| seat)
            .unwrap();

        let status = game.submit_witch_poison(Some(poisoned)).unwrap();
        assert_eq!(status, NightStatus::Finished);

        // Overwrite semantics: only the poisoned seat died.
        assert_eq!(game.state().dead_this_night(), &[poisoned]);
        assert!(game.state().is_alive(victim), "the wolves' victim survived");
        assert!(!game.state().witch_potions().poison);
        assert!(game.state().witch_potions().heal, "declining kept the heal");
        return;
    }
    panic!("no seed paused a user witch at the save decision");
}

#[test]
fn test_user_seer_learns_and_acknowledges() {
    let mut game = game_where_user_is(Role::Seer);

    let status = game.start_night().unwrap();
    assert_eq!(status, NightStatus::AwaitingSeer);

    let wolf = game
        .state()
        .players()
        .find(|(_, p)| p.is_alive && p.role == Role::Werewolf)
        .map(|(seat, _)| seat)
        .unwrap();

    let status = game.submit_seer_verify(wolf).unwrap();
    let NightStatus::AwaitingVerifyAck(result) = status else {
        panic!("expected a pending verify result");
    };
    assert_eq!(result.target, wolf);
    assert!(result.is_werewolf);
    assert_eq!(game.state().verify_result(), Some(result));

    let status = game.acknowledge_verify().unwrap();
    assert_eq!(status, NightStatus::Finished);
    assert!(game.state().verify_result().is_none());
}

#[test]
fn test_user_seer_reads_a_villager_as_clean() {
    let mut game = game_where_user_is(Role::Seer);
    let _ = game.start_night().unwrap();

    let villager = game
        .state()
        .players()
        .find(|(_, p)| p.is_alive && p.role == Role::Villager)
        .map(|(seat, _)| seat)
        .unwrap();

    let status = game.submit_seer_verify(villager).unwrap();
    let NightStatus::AwaitingVerifyAck(result) = status else {
        panic!("expected a pending verify result");
    };
    assert!(!result.is_werewolf);
}

#[test]
fn test_night_submissions_outside_night_are_rejected() {
    let mut game = build_game(42);

    assert!(matches!(
        game.submit_werewolf_kill(PlayerId::new(1)),
        Err(ActionError::WrongPhase { phase: Phase::Setup })
    ));
    assert!(matches!(
        game.submit_witch_save(true),
        Err(ActionError::WrongPhase { .. })
    ));
    assert!(matches!(
        game.submit_seer_verify(PlayerId::new(1)),
        Err(ActionError::WrongPhase { .. })
    ));
    assert!(matches!(
        game.acknowledge_verify(),
        Err(ActionError::WrongPhase { .. })
    ));
}

#[test]
fn test_user_villager_sleeps_through_the_night() {
    let mut game = game_where_user_is(Role::Villager);

    let status = game.start_night().unwrap();

    // No role to play: the whole night resolves in one call.
    assert_eq!(status, NightStatus::Finished);
    assert_eq!(game.state().day(), 1);
    assert!(game.night().is_none());
}
