use std::collections::BTreeSet;

use super::*;
use crate::types::KillCause;

impl Floor {
    /// Blasts left by the previous step resolve first, then fuses and braziers
    /// burn down. A bomb that expires now leaves a marker for the next step.
    pub(super) fn advance_hazards(&mut self, player: &mut Player, events: &mut Vec<LogEvent>) {
        self.resolve_blasts(player, events);
        self.burn_fuses(events);
        self.burn_braziers(events);
    }

    fn resolve_blasts(&mut self, player: &mut Player, events: &mut Vec<LogEvent>) {
        let snapshot = self.resolved_cells();
        let markers: Vec<Pos> = snapshot
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == TileKind::Bang)
            .map(|(index, _)| self.pos_of(index))
            .collect();
        if markers.is_empty() {
            return;
        }

        let mut affected = BTreeSet::new();
        for marker in &markers {
            events.push(LogEvent::BlastResolved { pos: *marker });
            let mut hits_player = false;
            for cell in marker.neighbourhood() {
                if !self.in_bounds(cell) {
                    continue;
                }
                affected.insert(cell);
                hits_player |= cell == player.pos();
            }
            if hits_player {
                let amount = self.timings.blast_damage;
                player.take_damage(amount);
                events.push(LogEvent::PlayerDamaged { amount, source: DamageSource::Blast });
            }
        }

        for cell in affected {
            let kind = snapshot[self.index(cell)];
            if kind.is_enemy() {
                player.kills += 1;
                events.push(LogEvent::EnemyKilled { tile: kind, pos: cell, cause: KillCause::Blast });
            }
            if !kind.is_indestructible() {
                self.set_tile(cell, TileKind::Empty);
            }
        }
    }

    fn burn_fuses(&mut self, events: &mut Vec<LogEvent>) {
        let lit: Vec<Pos> = self.bombs.keys().copied().collect();
        for pos in lit {
            if tick_down(&mut self.bombs, pos) {
                self.set_tile(pos, TileKind::Bang);
                events.push(LogEvent::BombDetonated { pos });
            }
        }
    }

    fn burn_braziers(&mut self, events: &mut Vec<LogEvent>) {
        let lit: Vec<Pos> = self.braziers.keys().copied().collect();
        for pos in lit {
            if !tick_down(&mut self.braziers, pos) {
                continue;
            }
            self.set_tile(pos, TileKind::Brazier);
            events.push(LogEvent::BrazierBurntOut { pos });
            for cell in pos.neighbourhood() {
                if let Some(next) = self.stored_tile(cell).melted() {
                    self.set_tile(cell, next);
                }
            }
        }
    }
}

/// Decrements the entry at `pos`; removes it and returns true when it hits zero.
fn tick_down(table: &mut BTreeMap<Pos, u32>, pos: Pos) -> bool {
    let Some(remaining) = table.get_mut(&pos) else {
        return false;
    };
    *remaining = remaining.saturating_sub(1);
    if *remaining == 0 {
        table.remove(&pos);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::tests::{bare_config, floor, player_at};
    use crate::rng::seeded;

    fn step(floor: &mut Floor, player: &mut Player, steps: usize) -> Vec<LogEvent> {
        let mut rng = seeded(0);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(floor.tick(player, false, &mut rng));
        }
        events
    }

    #[test]
    fn bomb_detonates_after_fuse_and_blasts_one_step_later() {
        let mut floor = floor(&["::::::", ":-   :", ":  ^ :", ":    :", "::::::"]);
        let mut player = player_at(Pos { y: 1, x: 1 });
        let bomb = Pos { y: 2, x: 2 };
        floor.set_tile(bomb, TileKind::BombLit);

        step(&mut floor, &mut player, 4);
        assert_eq!(floor.get_tile(bomb), TileKind::BombLit);
        assert_eq!(floor.bomb_countdowns().get(&bomb), Some(&1));

        let events = step(&mut floor, &mut player, 1);
        assert!(events.contains(&LogEvent::BombDetonated { pos: bomb }));
        assert_eq!(floor.get_tile(bomb), TileKind::Bang);
        assert!(floor.bomb_countdowns().is_empty());
        assert_eq!(floor.get_tile(Pos { y: 2, x: 3 }), TileKind::Trap);
        assert_eq!(player.hp, 10);

        let events = step(&mut floor, &mut player, 1);
        assert!(events.contains(&LogEvent::BlastResolved { pos: bomb }));
        assert_eq!(floor.get_tile(bomb), TileKind::Empty);
        assert_eq!(floor.get_tile(Pos { y: 2, x: 3 }), TileKind::Empty);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 1 }), TileKind::Empty);
        assert_eq!(player.hp, 7);
    }

    #[test]
    fn blast_spares_indestructible_cells_and_credits_kills() {
        let mut floor = floor(&["-::::", ":?=X:", ":W  :", ":::::"]);
        let mut player = player_at(Pos { y: 0, x: 0 });
        step(&mut floor, &mut player, 1);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 1 }), TileKind::Key);
        assert_eq!(floor.get_tile(Pos { y: 2, x: 1 }), TileKind::Water);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 3 }), TileKind::Empty);
        assert_eq!(floor.get_tile(Pos { y: 0, x: 2 }), TileKind::Empty);
        assert_eq!(player.kills, 1);
        assert_eq!(player.hp, 10);
    }

    #[test]
    fn blast_clears_lit_bombs_without_stale_countdowns() {
        let mut floor = floor(&["-::::", ":=B :", ":::::"]);
        let mut player = player_at(Pos { y: 0, x: 0 });
        assert_eq!(floor.bomb_countdowns().len(), 1);
        step(&mut floor, &mut player, 1);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 2 }), TileKind::Empty);
        assert!(floor.bomb_countdowns().is_empty());
        assert!(floor.countdowns_consistent());
    }

    #[test]
    fn overlapping_blasts_damage_per_blast() {
        let mut floor = floor(&["-::::", ":= =:", ":::::"]);
        let mut player = player_at(Pos { y: 1, x: 2 });
        step(&mut floor, &mut player, 1);
        assert_eq!(player.hp, 4);
    }

    #[test]
    fn burnt_out_brazier_reverts_and_melts_neighbours() {
        let mut floor = floor(&["-::::", ":IQi:", ":I I:", ":::::"]);
        let mut player = player_at(Pos { y: 0, x: 0 });
        let events = step(&mut floor, &mut player, 5);
        assert!(events.contains(&LogEvent::BrazierBurntOut { pos: Pos { y: 1, x: 2 } }));
        assert_eq!(floor.get_tile(Pos { y: 1, x: 2 }), TileKind::Brazier);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 1 }), TileKind::Ice);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 3 }), TileKind::Empty);
        assert_eq!(floor.get_tile(Pos { y: 2, x: 1 }), TileKind::Ice);
        assert_eq!(floor.get_tile(Pos { y: 2, x: 3 }), TileKind::Ice);
        assert!(floor.brazier_countdowns().is_empty());
    }

    #[test]
    fn burnt_out_brazier_leaves_switch_placeholders_alone() {
        let plan = LevelPlan::parse(0, &["-::::", ":_Q :", ":::::"]).expect("plan");
        let settings = FloorSettings {
            switch_tiles: Some((TileKind::Ice, TileKind::Snow)),
            ..FloorSettings::default()
        };
        let mut floor = Floor::from_plan(plan, &settings, &bare_config(), &mut seeded(1));
        let mut player = player_at(Pos { y: 0, x: 0 });
        let events = step(&mut floor, &mut player, 5);
        assert!(events.contains(&LogEvent::BrazierBurntOut { pos: Pos { y: 1, x: 2 } }));
        assert_eq!(floor.stored_tile(Pos { y: 1, x: 1 }), TileKind::SwitchTile);
        assert_eq!(floor.get_tile(Pos { y: 1, x: 1 }), TileKind::Ice);
    }

    #[test]
    fn relighting_a_brazier_restarts_its_countdown() {
        let mut floor = floor(&["-q"]);
        let cell = Pos { y: 0, x: 1 };
        floor.set_tile(cell, TileKind::BrazierLit);
        let mut player = player_at(Pos { y: 0, x: 0 });
        step(&mut floor, &mut player, 5);
        assert_eq!(floor.get_tile(cell), TileKind::Brazier);
        floor.set_tile(cell, TileKind::BrazierLit);
        assert_eq!(floor.brazier_countdowns().get(&cell), Some(&5));
    }
}
