//! Ordered floors of the tower and the moves between them.

use std::collections::BTreeMap;

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::content::Blueprint;
use crate::floor::Floor;
use crate::player::Player;
use crate::tile::TileKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGraph {
    floors: Vec<Floor>,
    current: usize,
    teleports: BTreeMap<TileKind, usize>,
    total_trophies: u32,
}

impl LevelGraph {
    /// `floors` must not be empty; `start` is clamped to the last floor.
    pub fn new(floors: Vec<Floor>, config: &EngineConfig) -> Self {
        let total_trophies = floors.iter().map(Floor::trophies).sum();
        let teleports = config.teleports.iter().map(|link| (link.tile, link.floor)).collect();
        let current = config.starting_floor.min(floors.len().saturating_sub(1));
        Self { floors, current, teleports, total_trophies }
    }

    pub fn build(blueprint: &Blueprint, config: &EngineConfig, rng: &mut ChaCha8Rng) -> Self {
        Self::new(blueprint.build(config, rng), config)
    }

    pub fn current(&self) -> &Floor {
        &self.floors[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Floor {
        &mut self.floors[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// GOAL tiles across every floor at build time.
    pub fn total_trophies(&self) -> u32 {
        self.total_trophies
    }

    pub fn teleport_target(&self, tile: TileKind) -> Option<usize> {
        self.teleports.get(&tile).copied()
    }

    /// Moves `delta` floors up (positive) or down. Ascending lands on the new
    /// floor's entrance, descending on its exit. Returns false when the target
    /// floor does not exist.
    pub fn advance(&mut self, delta: i32, player: &mut Player) -> bool {
        let Some(target) = self.current.checked_add_signed(delta as isize) else {
            return false;
        };
        if target >= self.floors.len() {
            return false;
        }
        self.current = target;
        let floor = self.current();
        let landing = if delta > 0 { floor.entrance() } else { floor.exit().unwrap_or(floor.entrance()) };
        player.place(landing);
        debug!(floor = target, name = floor.name(), ?landing, "changed floor");
        true
    }

    /// Teleports to the entrance of floor `index`. Out-of-range targets are a no-op.
    pub fn jump_to(&mut self, index: usize, player: &mut Player) -> bool {
        if index >= self.floors.len() {
            debug!(index, floors = self.floors.len(), "teleport target out of range");
            return false;
        }
        self.current = index;
        player.place(self.current().entrance());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeleportLink;
    use crate::types::Pos;

    fn tower() -> LevelGraph {
        let config = EngineConfig {
            teleports: vec![
                TeleportLink { tile: TileKind::Teleport1, floor: 2 },
                TeleportLink { tile: TileKind::Well, floor: 9 },
            ],
            ..EngineConfig::default()
        };
        let floors = vec![
            Floor::from_rows(&[":::::", ":-G+:", ":::::"], &config).expect("floor 0"),
            Floor::from_rows(&[":::::", ":- +:", ":::::"], &config).expect("floor 1"),
            Floor::from_rows(&[":::::", ":-GG:", ":::::"], &config).expect("floor 2"),
        ];
        LevelGraph::new(floors, &config)
    }

    #[test]
    fn totals_trophies_across_floors() {
        assert_eq!(tower().total_trophies(), 3);
    }

    #[test]
    fn ascending_lands_on_entrance_and_descending_on_exit() {
        let mut graph = tower();
        let mut player = Player::new("p", 10);
        assert!(graph.advance(1, &mut player));
        assert_eq!(graph.current_index(), 1);
        assert_eq!(player.pos(), Pos { y: 1, x: 1 });

        assert!(graph.advance(-1, &mut player));
        assert_eq!(graph.current_index(), 0);
        assert_eq!(player.pos(), Pos { y: 1, x: 3 });
        assert!(!player.moved());
    }

    #[test]
    fn descending_to_floor_without_exit_lands_on_entrance() {
        let config = EngineConfig { starting_floor: 1, ..EngineConfig::default() };
        let floors = vec![
            Floor::from_rows(&[":::::", ":  -:", ":::::"], &config).expect("floor 0"),
            Floor::from_rows(&[":::::", ":- +:", ":::::"], &config).expect("floor 1"),
        ];
        let mut graph = LevelGraph::new(floors, &config);
        assert_eq!(graph.current_index(), 1);
        let mut player = Player::new("p", 10);
        assert!(graph.advance(-1, &mut player));
        assert_eq!(player.pos(), Pos { y: 1, x: 3 });
    }

    #[test]
    fn moves_past_either_end_are_ignored() {
        let mut graph = tower();
        let mut player = Player::new("p", 10);
        player.place(Pos { y: 1, x: 2 });
        assert!(!graph.advance(-1, &mut player));
        assert_eq!(player.pos(), Pos { y: 1, x: 2 });
        graph.jump_to(2, &mut player);
        assert!(!graph.advance(1, &mut player));
        assert_eq!(graph.current_index(), 2);
    }

    #[test]
    fn teleports_follow_the_configured_table() {
        let mut graph = tower();
        let mut player = Player::new("p", 10);
        let target = graph.teleport_target(TileKind::Teleport1).expect("linked");
        assert!(graph.jump_to(target, &mut player));
        assert_eq!(graph.current_index(), 2);

        let unreachable = graph.teleport_target(TileKind::Well).expect("linked");
        assert!(!graph.jump_to(unreachable, &mut player));
        assert_eq!(graph.current_index(), 2);
        assert_eq!(graph.teleport_target(TileKind::Teleport2), None);
    }
}
