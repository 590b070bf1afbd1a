use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use umbra_core::{AdvanceStopReason, Command, Dir, Game, Pos, SimConfig};

fn random_command(rng: &mut ChaCha8Rng, width: i32, height: i32) -> Command {
    match rng.next_u64() % 8 {
        0 => Command::Wait,
        1 => Command::Rest,
        2 => Command::Explore,
        3 => {
            let x = (rng.next_u64() % width as u64) as i32;
            let y = (rng.next_u64() % height as u64) as i32;
            Command::TravelTo(Pos { y, x })
        }
        _ => Command::Move(Dir::ALL[(rng.next_u64() % 16) as usize]),
    }
}

fn run_fuzz_simulation(map_seed: u64, command_seed: u64, max_commands: u32) -> Result<(), String> {
    let config = SimConfig::default();
    let (width, height) = (config.level.width, config.level.height);
    let mut game = Game::new(map_seed, config).map_err(|error| error.to_string())?;
    let mut rng = ChaCha8Rng::seed_from_u64(command_seed);
    let mut last_rank = game.current_rank();

    let mut commands = 0;
    while commands < max_commands {
        let result = game.advance(500);
        match result.stop_reason {
            AdvanceStopReason::Finished(_) => break,
            AdvanceStopReason::EngineFailure(failure) => {
                return Err(format!("engine failure on map_seed {map_seed}: {failure}"));
            }
            AdvanceStopReason::QueueEmpty => {
                return Err(format!("event queue drained on map_seed {map_seed}"));
            }
            AdvanceStopReason::AwaitingInput => {
                let _ = game.submit(random_command(&mut rng, width, height));
                commands += 1;
            }
            AdvanceStopReason::BudgetExhausted => {}
        }

        if game.current_rank() < last_rank {
            return Err(format!("rank went backwards on map_seed {map_seed}"));
        }
        last_rank = game.current_rank();

        let state = game.state();
        if state.player.hp > state.player.max_hp {
            return Err(format!("player hp above max on map_seed {map_seed}"));
        }
        if !state.dungeon.is_passable(state.player.pos) {
            return Err(format!("player inside a wall on map_seed {map_seed}"));
        }
        for (index, monster) in state.living_monsters() {
            if !state.dungeon.is_passable(monster.pos) {
                return Err(format!("monster {index:?} inside a wall on map_seed {map_seed}"));
            }
            if monster.pos == state.player.pos {
                return Err(format!("monster {index:?} shares the player cell on map_seed {map_seed}"));
            }
        }
    }

    Ok(())
}

#[test]
fn test_fuzz_random_commands_preserve_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(16));
    let seeds = (any::<u64>(), any::<u64>());

    runner
        .run(&seeds, |(map_seed, command_seed)| {
            run_fuzz_simulation(map_seed, command_seed, 300).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("random command runs should preserve invariants");
}
