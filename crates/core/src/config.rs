//! Engine tunables. Every field has a default so partial TOML tables load.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::tile::TileKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub starting_hp: i32,
    pub effect_duration: u32,
    pub bomb_fuse: u32,
    pub brazier_burn: u32,
    pub blast_damage: i32,
    pub placement_attempts: u32,
    pub safety_zone: SafetyZone,
    pub starting_floor: usize,
    pub high_score_capacity: usize,
    pub teleports: Vec<TeleportLink>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_hp: 10,
            effect_duration: 20,
            bomb_fuse: 5,
            brazier_burn: 5,
            blast_damage: 3,
            placement_attempts: 20,
            safety_zone: SafetyZone::default(),
            starting_floor: 0,
            high_score_capacity: 10,
            teleports: default_teleports(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyZone {
    pub width: u32,
    pub height: u32,
}

impl Default for SafetyZone {
    fn default() -> Self {
        Self { width: 4, height: 4 }
    }
}

impl SafetyZone {
    /// Inclusive offset range applied on each axis around a protected cell.
    pub fn offsets(self) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let half_x = (self.width / 2) as i32;
        let half_y = (self.height / 2) as i32;
        (-half_x..=half_x, -half_y..=half_y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportLink {
    pub tile: TileKind,
    pub floor: usize,
}

/// Starting floors of the tower's worlds, reached through teleport tiles.
pub mod worlds {
    pub const STARTING_LEVEL: usize = 0;
    pub const TRAINING_LEVEL: usize = 11;
    pub const CAVE_ENTRANCE: usize = 12;
    pub const FROST_WARD: usize = 20;
    pub const CHAOS: usize = 28;
}

fn default_teleports() -> Vec<TeleportLink> {
    vec![
        TeleportLink { tile: TileKind::Teleport1, floor: worlds::TRAINING_LEVEL },
        TeleportLink { tile: TileKind::Teleport2, floor: worlds::STARTING_LEVEL },
        TeleportLink { tile: TileKind::Well, floor: worlds::CAVE_ENTRANCE },
        TeleportLink { tile: TileKind::FrostTree, floor: worlds::FROST_WARD },
        TeleportLink { tile: TileKind::ChaosPortal, floor: worlds::CHAOS },
    ]
}
