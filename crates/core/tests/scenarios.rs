use tower_core::config::SafetyZone;
use tower_core::{
    Campaign, Direction, EffectKind, EngineConfig, FloorSettings, LevelRows, LogEvent,
    MemoryScoreStore, MoveOutcome, Pos, Session, SessionState, TileKind,
};

fn session_on(plans: &[&[&str]]) -> Session {
    let campaign = Campaign {
        plans: plans.iter().map(|rows| LevelRows::from_strs(rows)).collect(),
        floors: plans.iter().map(|_| FloorSettings::default()).collect(),
    };
    let config = EngineConfig {
        safety_zone: SafetyZone { width: 0, height: 0 },
        ..EngineConfig::default()
    };
    let mut session =
        Session::new(&campaign, config, 99, "Scout", Box::new(MemoryScoreStore::new(10)))
            .expect("scenario session");
    session.start();
    session
}

#[test]
fn treasure_then_locked_exit_reverts_to_the_treasure_cell() {
    let mut session = session_on(&[&[":::::", ":-*+:", ":::::"], &[":::", ":-:", ":::"]]);
    assert_eq!(session.player().pos(), Pos { y: 1, x: 1 });

    assert_eq!(session.move_player(Direction::Right), Some(MoveOutcome::Accepted));
    assert_eq!(session.player().treasure, 1);
    assert_eq!(session.current_floor().get_tile(Pos { y: 1, x: 2 }), TileKind::Empty);

    session.move_player(Direction::Right);
    assert_eq!(session.player().pos(), Pos { y: 1, x: 2 });
    assert_eq!(session.floor_index(), 0);
    assert!(session.log().contains(&LogEvent::MoveReverted {
        tile: TileKind::Exit,
        to: Pos { y: 1, x: 2 },
    }));
}

#[test]
fn hp_potions_are_not_capped() {
    let mut session = session_on(&[&["::::::", ":-@@@:", "::::::"]]);
    for _ in 0..3 {
        session.move_player(Direction::Right);
    }
    assert_eq!(session.player().hp, 13);
}

#[test]
fn last_trophy_finishes_the_run_exactly_once() {
    let mut session = session_on(&[&["::::::", ":-GG :", "::::::"]]);
    assert_eq!(session.total_trophies(), 2);

    session.move_player(Direction::Right);
    assert_eq!(session.state(), SessionState::Playing);
    session.move_player(Direction::Right);
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.player().trophies, 2);
    assert_eq!(session.score(), 160);

    assert_eq!(session.move_player(Direction::Right), None);
    session.tick();
    session.toggle_pause();
    let finished = session
        .log()
        .iter()
        .filter(|event| matches!(event, LogEvent::StateChanged { to: SessionState::Finished, .. }))
        .count();
    assert_eq!(finished, 1);
    assert_eq!(session.state(), SessionState::Finished);
}

#[test]
fn action_after_the_run_resets_effects_and_counters() {
    let mut session = session_on(&[&["::::::", ":-/G :", "::::::"]]);
    session.move_player(Direction::Right);
    assert!(session.effects().is_active(EffectKind::Sword));
    session.move_player(Direction::Right);
    assert_eq!(session.state(), SessionState::Finished);

    session.press_action();
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.effects().is_empty());
    assert!(!session.player().sword);
    assert_eq!(session.player().trophies, 0);
    assert_eq!(session.current_tick(), 0);
    assert_eq!(session.player().pos(), session.current_floor().entrance());
    assert_eq!(session.player().name, "Scout");
}

#[test]
fn descending_lands_on_the_lower_exit() {
    let mut session = session_on(&[&[":::::", ":-%+:", ":::::"], &[":::::", ": - :", ":::::"]]);
    session.move_player(Direction::Right);
    session.move_player(Direction::Right);
    assert_eq!(session.floor_index(), 1);

    session.move_player(Direction::Right);
    session.move_player(Direction::Left);
    assert_eq!(session.floor_index(), 0);
    assert_eq!(session.player().pos(), Pos { y: 1, x: 3 });
}

#[test]
fn bomb_blast_hurts_a_player_in_range() {
    let mut session = session_on(&[&["::::::", ":- B :", "::::::"]]);
    session.move_player(Direction::Right);
    // Fuse 5 at one step per two pulses, then one more step resolves the blast.
    for _ in 0..12 {
        session.tick();
    }
    assert_eq!(session.player().hp, 7);
    assert_eq!(session.current_floor().get_tile(Pos { y: 1, x: 3 }), TileKind::Empty);
}
