use super::support::*;

fn rows(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// A one-cell-high corridor between two wall rows.
fn corridor(middle: &str) -> Vec<String> {
    let wall = "#".repeat(middle.chars().count());
    vec![wall.clone(), middle.to_string(), wall]
}

fn guard_facing(game: &mut Game, dir: Dir) {
    game.state.monsters[0].dir = dir;
}

#[test]
fn lit_player_in_the_cone_is_noticed_and_hunted() {
    let mut game =
        game_on(&corridor("*********"), Pos { y: 1, x: 1 }, &[(MonsterKind::Guard, Pos { y: 1, x: 5 })]);
    guard_facing(&mut game, Dir::W);
    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);

    let guard = &game.state().monsters[0];
    assert_eq!(guard.state, MonsterState::Hunting);
    assert_eq!(guard.target, Some(Pos { y: 1, x: 1 }));
    assert_eq!(guard.pos, Pos { y: 1, x: 4 });
    assert!(guard.moved_last_turn);
    assert_eq!(count_log(&game, |event| *event == LogEvent::MonsterNoticed { monster: MonsterIdx(0) }), 1);

    assert!(game.visible_monsters().contains(&MonsterIdx(0)));
    assert!(game.watched_cells().contains(&Pos { y: 1, x: 1 }));
    assert!(!game.watched_cells().contains(&Pos { y: 1, x: 8 }), "cells behind the guard are unwatched");
}

#[test]
fn unlit_player_beyond_darkness_range_goes_unnoticed() {
    let mut game =
        game_on(&corridor("........."), Pos { y: 1, x: 1 }, &[(MonsterKind::Guard, Pos { y: 1, x: 5 })]);
    guard_facing(&mut game, Dir::W);
    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);

    assert_ne!(game.state().monsters[0].state, MonsterState::Hunting);
    assert_eq!(count_log(&game, |event| matches!(event, LogEvent::MonsterNoticed { .. })), 0);
}

#[test]
fn lit_status_makes_the_player_visible_in_the_dark() {
    let mut game =
        game_on(&corridor("........."), Pos { y: 1, x: 1 }, &[(MonsterKind::Guard, Pos { y: 1, x: 5 })]);
    guard_facing(&mut game, Dir::W);
    game.apply_player_status(PlayerStatus::Lit, 5);
    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);

    assert_eq!(game.state().monsters[0].state, MonsterState::Hunting);
}

#[test]
fn monster_facing_away_does_not_notice() {
    let mut game =
        game_on(&corridor("*********"), Pos { y: 1, x: 1 }, &[(MonsterKind::Guard, Pos { y: 1, x: 5 })]);
    guard_facing(&mut game, Dir::E);
    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);

    assert_eq!(count_log(&game, |event| matches!(event, LogEvent::MonsterNoticed { .. })), 0);
}

#[test]
fn barrel_beside_the_player_hides_them() {
    let mut game =
        game_on(&corridor("**o******"), Pos { y: 1, x: 1 }, &[(MonsterKind::Guard, Pos { y: 1, x: 5 })]);
    guard_facing(&mut game, Dir::W);
    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);

    assert_eq!(count_log(&game, |event| matches!(event, LogEvent::MonsterNoticed { .. })), 0);
    assert!(game.visible_monsters().contains(&MonsterIdx(0)), "barrels do not block the player's sight");
}

#[test]
fn adjacent_guard_attacks_and_can_kill() {
    let mut config = SimConfig::default();
    config.combat.player_hp = 2;
    let mut game = game_with(
        config,
        &corridor("*****"),
        Pos { y: 1, x: 1 },
        &[(MonsterKind::Guard, Pos { y: 1, x: 2 })],
    );
    guard_facing(&mut game, Dir::W);
    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();

    let result = game.advance(100);
    assert_eq!(result.stop_reason, AdvanceStopReason::Finished(RunOutcome::Death));
    assert_eq!(game.outcome(), Some(RunOutcome::Death));
    assert!(game.log().contains(&LogEvent::PlayerHit {
        monster: MonsterIdx(0),
        damage: 2,
        hp_left: 0
    }));
    assert_eq!(game.log().last(), Some(&LogEvent::RunEnded { outcome: RunOutcome::Death }));
    assert_eq!(game.submit(Command::Wait), Err(GameError::Finished));
}

#[test]
fn bumping_a_monster_attacks_until_it_dies() {
    let mut game =
        game_on(&corridor("......"), Pos { y: 1, x: 1 }, &[(MonsterKind::Hound, Pos { y: 1, x: 2 })]);
    pin_monster(&mut game, 0);
    run_to_input(&mut game);

    game.submit(Command::Move(Dir::E)).unwrap();
    assert_eq!(game.state().monsters[0].hp, 2);
    assert_eq!(game.state().monsters[0].state, MonsterState::Hunting);
    assert_eq!(game.state().player.pos, Pos { y: 1, x: 1 });

    run_to_input(&mut game);
    game.submit(Command::Move(Dir::E)).unwrap();
    assert!(!game.state().monsters[0].alive);
    assert!(game.log().contains(&LogEvent::MonsterKilled { monster: MonsterIdx(0) }));

    run_to_input(&mut game);
    game.submit(Command::Move(Dir::E)).unwrap();
    assert_eq!(game.state().player.pos, Pos { y: 1, x: 2 }, "dead monsters free their cell");
}

#[test]
fn digger_tunnels_through_a_wall_instead_of_stepping() {
    let layout = rows(&["...#...", "...#...", "...#...", "...#...", "...#..."]);
    let mut game = game_on(&layout, Pos { y: 2, x: 1 }, &[(MonsterKind::Digger, Pos { y: 2, x: 4 })]);
    {
        let digger = &mut game.state.monsters[0];
        digger.state = MonsterState::Hunting;
        digger.target = Some(Pos { y: 2, x: 1 });
    }
    wait_until(&mut game, 20);

    let dug: Vec<Pos> = game
        .log()
        .iter()
        .filter_map(|event| match event {
            LogEvent::WallDug { monster: MonsterIdx(0), pos } => Some(*pos),
            _ => None,
        })
        .collect();
    assert_eq!(dug.len(), 1, "log: {:?}", game.log());
    assert_eq!(dug[0].x, 3);
    assert_eq!(game.state().dungeon.terrain_at(dug[0]), Terrain::Ground);
    assert_eq!(game.state().monsters[0].pos, Pos { y: 2, x: 4 }, "digging takes the whole turn");
    assert!(!game.state().monsters[0].moved_last_turn);
}

#[test]
fn confused_monster_stumbles_to_a_neighbour() {
    let mut game =
        game_on(&open_rows(5, 5), Pos { y: 0, x: 0 }, &[(MonsterKind::Hound, Pos { y: 2, x: 2 })]);
    game.apply_monster_status(MonsterIdx(0), MonsterStatus::Confused, 5).unwrap();
    assert!(game.log().contains(&LogEvent::MonsterStatusStarted {
        monster: MonsterIdx(0),
        status: MonsterStatus::Confused
    }));

    run_to_input(&mut game);
    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);

    let hound = &game.state().monsters[0];
    assert_eq!(hound.pos.distance(Pos { y: 2, x: 2 }), 1);
    assert_ne!(hound.pos, Pos { y: 0, x: 0 });
}

#[test]
fn noise_alerts_monsters_within_earshot() {
    let mut game = game_on(
        &open_rows(12, 12),
        Pos { y: 0, x: 0 },
        &[(MonsterKind::Guard, Pos { y: 6, x: 6 }), (MonsterKind::Guard, Pos { y: 11, x: 11 })],
    );
    let origin = Pos { y: 5, x: 5 };
    let heard = game.make_noise(origin, 4).unwrap();

    assert_eq!(heard, vec![MonsterIdx(0)]);
    let near = &game.state().monsters[0];
    assert_eq!(near.state, MonsterState::Wandering);
    assert_eq!(near.target, Some(origin));
    assert_eq!(game.state().monsters[1].state, MonsterState::Resting);
    assert_eq!(game.log(), &[LogEvent::MonsterHeardNoise { monster: MonsterIdx(0), origin }]);
}

#[test]
fn stepping_onto_a_door_is_noisy() {
    let mut game =
        game_on(&rows(&["...+..."]), Pos { y: 0, x: 2 }, &[(MonsterKind::Hound, Pos { y: 0, x: 6 })]);
    run_to_input(&mut game);
    game.submit(Command::Move(Dir::E)).unwrap();

    let door = Pos { y: 0, x: 3 };
    assert!(game.log().contains(&LogEvent::DoorNoise { pos: door }));
    assert!(game.log().contains(&LogEvent::MonsterHeardNoise { monster: MonsterIdx(0), origin: door }));
    assert_eq!(game.state().monsters[0].target, Some(door));
}

#[test]
fn unseen_moving_monsters_are_heard_through_walls() {
    let mut config = SimConfig::default();
    config.noise.hearing_radius = 30;
    let mut game = game_with(
        config,
        &partition_rows(),
        Pos { y: 0, x: 0 },
        &[(MonsterKind::Hound, Pos { y: 0, x: 9 })],
    );
    {
        let hound = &mut game.state.monsters[0];
        hound.state = MonsterState::Wandering;
        hound.target = Some(Pos { y: 9, x: 9 });
    }
    run_to_input(&mut game);
    assert!(game.heard_noises().is_empty(), "nothing has moved yet");

    game.submit(Command::Wait).unwrap();
    run_to_input(&mut game);
    let hound = &game.state().monsters[0];
    assert_eq!(hound.pos.y, 1, "one step toward its wander target");
    assert!(game.visible_monsters().is_empty());
    assert_eq!(game.heard_noises().iter().copied().collect::<Vec<_>>(), vec![hound.pos]);
}

#[test]
fn unknown_monster_index_is_an_error() {
    let mut game = game_on(&open_rows(3, 3), Pos { y: 0, x: 0 }, &[]);
    assert_eq!(
        game.apply_monster_status(MonsterIdx(5), MonsterStatus::Slow, 3),
        Err(SimError::UnknownMonster(5))
    );
}
