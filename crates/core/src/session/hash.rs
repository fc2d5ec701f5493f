//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from simulation control code.
//! It does not own replay execution or journal persistence.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Session {
    /// Hash over every piece of state a command or pulse can change.
    /// Wall-clock time is excluded.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.tick);
        hasher.write_u8(match self.state {
            SessionState::Ready => 0,
            SessionState::Playing => 1,
            SessionState::Paused => 2,
            SessionState::GameOver => 3,
            SessionState::Finished => 4,
        });
        hasher.write_usize(self.levels.current_index());

        let player = &self.player;
        hasher.write(player.name.as_bytes());
        hasher.write_i32(player.pos().x);
        hasher.write_i32(player.pos().y);
        hasher.write_i32(player.previous().x);
        hasher.write_i32(player.previous().y);
        hasher.write_u8(u8::from(player.moved()));
        for counter in [player.keys, player.exit_keys, player.treasure, player.trophies, player.kills] {
            hasher.write_u32(counter);
        }
        hasher.write_i32(player.hp);
        hasher.write_u8(u8::from(player.boss_key));
        hasher.write_u8(u8::from(player.sword));
        hasher.write_u8(u8::from(player.shield));

        for (kind, remaining) in self.effects.iter() {
            hasher.write_u8(kind as u8);
            hasher.write_u32(remaining);
        }
        for floor in self.levels.floors() {
            hasher.write(&floor.canonical_bytes());
        }
        hasher.finish()
    }
}
