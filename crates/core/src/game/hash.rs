//! Stable snapshot hashing for deterministic verification.

use std::hash::{Hash, Hasher};

use xxhash_rust::xxh3::Xxh3;

use super::*;

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.x);
    hasher.write_i32(pos.y);
}

fn write_optional_pos(hasher: &mut Xxh3, pos: Option<Pos>) {
    match pos {
        Some(pos) => {
            hasher.write_u8(1);
            write_pos(hasher, pos);
        }
        None => hasher.write_u8(0),
    }
}

impl Game {
    /// Digest of everything that can influence later turns. Derived perception
    /// is left out; it is recomputed at the next player turn.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_i64(self.current_rank);
        hasher.write_u64(self.rng_draws);

        let player = &self.state.player;
        write_pos(&mut hasher, player.pos);
        hasher.write_i32(player.hp);
        hasher.write_usize(player.statuses.len());
        for (status, remaining) in &player.statuses {
            hasher.write_u8(*status as u8);
            hasher.write_u32(*remaining);
        }

        hasher.write_usize(self.state.monsters.len());
        for monster in &self.state.monsters {
            hasher.write_u8(monster.kind as u8);
            write_pos(&mut hasher, monster.pos);
            hasher.write_u8(monster.dir.sector());
            hasher.write_u8(monster.state as u8);
            hasher.write_i32(monster.hp);
            hasher.write_u8(u8::from(monster.alive));
            write_optional_pos(&mut hasher, monster.target);
            hasher.write_usize(monster.statuses.len());
            for (status, remaining) in &monster.statuses {
                hasher.write_u8(*status as u8);
                hasher.write_u32(*remaining);
            }
        }

        hasher.write_usize(self.state.clouds.len());
        for (pos, kind) in &self.state.clouds {
            write_pos(&mut hasher, *pos);
            hasher.write_u8(*kind as u8);
            hasher.write_i64(self.state.cloud_expiry.get(pos).copied().unwrap_or(-1));
        }
        hasher.write_usize(self.state.temporary_walls.len());
        for (pos, terrain) in &self.state.temporary_walls {
            write_pos(&mut hasher, *pos);
            hasher.write_u8(*terrain as u8);
        }
        hasher.write_usize(self.state.excluded.len());
        for pos in &self.state.excluded {
            write_pos(&mut hasher, *pos);
        }

        let dungeon = &self.state.dungeon;
        for pos in dungeon.positions() {
            hasher.write_u8(dungeon.terrain_at(pos) as u8);
            let flags = u8::from(dungeon.is_lit(pos)) | (u8::from(dungeon.is_explored(pos)) << 1);
            hasher.write_u8(flags);
        }

        hasher.write_u64(self.scheduler.next_seq());
        let pending = self.scheduler.pending();
        hasher.write_usize(pending.len());
        for scheduled in &pending {
            hasher.write_u64(scheduled.seq);
            hasher.write_i64(scheduled.event.rank);
            scheduled.event.kind.hash(&mut hasher);
        }
        self.awaiting.hash(&mut hasher);
        self.auto.hash(&mut hasher);

        hasher.write_usize(self.log.len());
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(RunOutcome::Quit) => 1,
            Some(RunOutcome::Death) => 2,
        });
        hasher.finish()
    }
}
