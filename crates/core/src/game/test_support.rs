//! Level builders and drivers shared by the `game` test suites.

use super::*;
use crate::state::Dungeon;

pub(super) fn open_rows(width: usize, height: usize) -> Vec<String> {
    vec![".".repeat(width); height]
}

/// A 10x10 floor split by a wall at x = 5 with one gap at the bottom row.
pub(super) fn partition_rows() -> Vec<String> {
    (0..10)
        .map(|y| {
            (0..10)
                .map(|x| if x == 5 && y != 9 { '#' } else { '.' })
                .collect()
        })
        .collect()
}

pub(super) fn level(rows: &[String], player: Pos, monsters: &[(MonsterKind, Pos)]) -> LevelSetup {
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    LevelSetup {
        dungeon: Dungeon::parse(&rows).expect("fixture rows are valid"),
        player,
        monsters: monsters.to_vec(),
    }
}

pub(super) fn game_with(
    config: SimConfig,
    rows: &[String],
    player: Pos,
    monsters: &[(MonsterKind, Pos)],
) -> Game {
    Game::from_level(1, config, level(rows, player, monsters)).expect("fixture level is valid")
}

pub(super) fn game_on(rows: &[String], player: Pos, monsters: &[(MonsterKind, Pos)]) -> Game {
    game_with(SimConfig::default(), rows, player, monsters)
}

/// Advances until the player is asked for a command.
pub(super) fn run_to_input(game: &mut Game) -> AdvanceResult {
    let result = game.advance(10_000);
    assert_eq!(result.stop_reason, AdvanceStopReason::AwaitingInput, "log: {:?}", game.log());
    result
}

/// Keeps a monster in place and harmless so tests can focus on the player.
pub(super) fn pin_monster(game: &mut Game, index: usize) {
    let monster = &mut game.state.monsters[index];
    monster.statuses.insert(MonsterStatus::Paralysed, u32::MAX);
}

pub(super) fn count_log(game: &Game, matches: impl Fn(&LogEvent) -> bool) -> usize {
    game.log().iter().filter(|event| matches(event)).count()
}
