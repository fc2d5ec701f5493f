//! Campaign content: per-floor settings plus the ASCII plans they apply to.
//!
//! A `Campaign` is the serialisable form read from disk. `Campaign::compile`
//! validates it once into a `Blueprint`, from which floors can be rebuilt any
//! number of times without further failure paths.

use std::hash::Hasher;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use xxhash_rust::xxh3::Xxh3;

use crate::config::EngineConfig;
use crate::error::BuildError;
use crate::floor::{Floor, LevelPlan, LevelRows};
use crate::tile::TileKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorSettings {
    pub name: String,
    pub enemies: u32,
    pub enemy_kind: TileKind,
    pub traps: u32,
    pub treasures: u32,
    /// Exit keys scattered over the floor.
    pub keys: u32,
    /// Kinds a SWITCH_TILE placeholder shows while the switch is off and on.
    pub switch_tiles: Option<(TileKind, TileKind)>,
}

impl Default for FloorSettings {
    fn default() -> Self {
        Self {
            name: "Nameless Floor".to_string(),
            enemies: 0,
            enemy_kind: TileKind::Goblin,
            traps: 0,
            treasures: 0,
            keys: 0,
            switch_tiles: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub plans: Vec<LevelRows>,
    pub floors: Vec<FloorSettings>,
}

/// A validated campaign: every settings record paired with a parsed plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blueprint {
    floors: Vec<(FloorSettings, LevelPlan)>,
}

impl Campaign {
    pub fn compile(&self, config: &EngineConfig) -> Result<Blueprint, BuildError> {
        if self.floors.is_empty() {
            return Err(BuildError::NoFloors);
        }
        if self.floors.len() > self.plans.len() {
            return Err(BuildError::MissingPlans {
                settings: self.floors.len(),
                plans: self.plans.len(),
            });
        }
        if config.starting_floor >= self.floors.len() {
            return Err(BuildError::StartOutOfRange {
                start: config.starting_floor,
                floors: self.floors.len(),
            });
        }

        let floors = self
            .floors
            .iter()
            .zip(&self.plans)
            .enumerate()
            .map(|(floor, (settings, rows))| {
                if !settings.enemy_kind.is_enemy() {
                    return Err(BuildError::NotAnEnemy { floor, kind: settings.enemy_kind });
                }
                Ok((settings.clone(), LevelPlan::parse(floor, &rows.0)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Blueprint { floors })
    }

    /// Stable hash of plans and settings. Journals record it so a replay can
    /// refuse content it was not recorded against.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_usize(self.plans.len());
        for rows in &self.plans {
            hasher.write_usize(rows.0.len());
            for row in &rows.0 {
                hasher.write(row.as_bytes());
                hasher.write_u8(b'\n');
            }
        }
        hasher.write_usize(self.floors.len());
        for settings in &self.floors {
            hasher.write(settings.name.as_bytes());
            hasher.write_u8(0);
            for count in [settings.enemies, settings.traps, settings.treasures, settings.keys] {
                hasher.write_u32(count);
            }
            hasher.write_u8(settings.enemy_kind as u8);
            match settings.switch_tiles {
                Some((off, on)) => {
                    hasher.write_u8(1);
                    hasher.write_u8(off as u8);
                    hasher.write_u8(on as u8);
                }
                None => hasher.write_u8(0),
            }
        }
        hasher.finish()
    }

    /// Small built-in tower used by the tools and by tests.
    pub fn demo() -> Self {
        let plans = vec![
            LevelRows::from_strs(&[
                "::::::::::::",
                ":-   T    @:",
                ":  :::::   :",
                ":  :G  D   :",
                ":  :::::  /:",
                ":    ?    +:",
                "::::::::::::",
            ]),
            LevelRows::from_strs(&[
                "::::::::::::",
                ":-  b   q  :",
                ":   ,  __  :",
                ":  III  G  :",
                ":   O   j  :",
                ":+   Y  2  :",
                "::::::::::::",
            ]),
            LevelRows::from_strs(&[
                "::::::::::::",
                ":-    H    :",
                ":  G   S   :",
                ":   U  J   :",
                ":  L   k  G:",
                ":     @    :",
                "::::::::::::",
            ]),
        ];
        let floors = vec![
            FloorSettings {
                name: "The Outer Gate".to_string(),
                enemies: 2,
                enemy_kind: TileKind::Skeleton,
                traps: 1,
                treasures: 3,
                keys: 1,
                switch_tiles: None,
            },
            FloorSettings {
                name: "Bomb Cellar".to_string(),
                enemies: 3,
                enemy_kind: TileKind::Goblin,
                traps: 1,
                treasures: 2,
                keys: 1,
                switch_tiles: Some((TileKind::Wall, TileKind::Empty)),
            },
            FloorSettings {
                name: "The Roost".to_string(),
                enemies: 2,
                enemy_kind: TileKind::Chicken,
                traps: 0,
                treasures: 4,
                keys: 0,
                switch_tiles: None,
            },
        ];
        Self { plans, floors }
    }
}

impl Blueprint {
    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Builds fresh floors with randomly placed items.
    pub fn build(&self, config: &EngineConfig, rng: &mut ChaCha8Rng) -> Vec<Floor> {
        self.floors
            .iter()
            .enumerate()
            .map(|(index, (settings, plan))| {
                let mut floor = Floor::from_plan(plan.clone(), settings, config, rng);
                floor.place_items(settings, config.placement_attempts, rng);
                info!(index, name = %settings.name, trophies = floor.trophies(), "floor built");
                floor
            })
            .collect()
    }
}
