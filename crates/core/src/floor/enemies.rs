use super::*;
use crate::types::KillCause;

/// Candidate steps for a randomly wandering enemy: stay, left, right, up, down.
const WANDER_STEPS: [(i32, i32); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];

impl Floor {
    /// Moves every enemy once. Destinations are chosen against a snapshot of the
    /// stored cells taken before any enemy moves; the first enemy in row-major
    /// order to claim an empty cell gets it. Switch placeholders are never
    /// empty, whatever they currently resolve to.
    pub(super) fn move_enemies(
        &mut self,
        player: &mut Player,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<LogEvent>,
    ) {
        let snapshot = self.cells.clone();
        let mut claims: BTreeMap<Pos, (Pos, TileKind)> = BTreeMap::new();
        let mut struck: Vec<(Pos, TileKind)> = Vec::new();

        for (index, kind) in snapshot.iter().enumerate() {
            if !kind.is_enemy() {
                continue;
            }
            let origin = self.pos_of(index);
            let dest = match self.move_mode {
                MoveMode::Random => {
                    let (dx, dy) = WANDER_STEPS[roll(rng, WANDER_STEPS.len())];
                    origin.offset(dx, dy)
                }
                MoveMode::Magnet => self.magnet_step(origin, player.pos(), &snapshot),
            };
            if dest == origin || !self.in_bounds(dest) {
                continue;
            }
            match snapshot[self.index(dest)] {
                TileKind::Empty => {
                    claims.entry(dest).or_insert((origin, *kind));
                }
                TileKind::Lightning => struck.push((origin, *kind)),
                _ => {}
            }
        }

        for (origin, kind) in struck {
            self.set_tile(origin, TileKind::Empty);
            player.kills += 1;
            events.push(LogEvent::EnemyKilled { tile: kind, pos: origin, cause: KillCause::Lightning });
        }
        for (dest, (origin, kind)) in claims {
            self.set_tile(origin, TileKind::Empty);
            self.set_tile(dest, kind);
        }
    }

    /// One step toward `target`: along x first, falling back to y from the
    /// origin when the x step leaves the floor or lands on an occupied cell.
    fn magnet_step(&self, origin: Pos, target: Pos, snapshot: &[TileKind]) -> Pos {
        let horizontal = origin.offset((target.x - origin.x).signum(), 0);
        let passable = self.in_bounds(horizontal)
            && matches!(snapshot[self.index(horizontal)], TileKind::Empty | TileKind::Lightning);
        if passable {
            horizontal
        } else {
            origin.offset(0, (target.y - origin.y).signum())
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::floor::tests::{bare_config, floor, player_at};

    fn open_room() -> Floor {
        floor(&["-::::::", ":     :", ":     :", ":  X  :", ":     :", ":     :", ":::::::"])
    }

    fn goblin_positions(floor: &Floor) -> Vec<Pos> {
        (0..floor.height() as i32)
            .flat_map(|y| (0..floor.width() as i32).map(move |x| Pos { y, x }))
            .filter(|pos| floor.get_tile(*pos) == TileKind::Goblin)
            .collect()
    }

    #[test]
    fn random_wandering_is_roughly_uniform() {
        let origin = Pos { y: 3, x: 3 };
        let mut counts: BTreeMap<Pos, u32> = BTreeMap::new();
        let trials = 2_000;
        for seed in 0..trials {
            let mut floor = open_room();
            let mut player = player_at(Pos { y: 0, x: 0 });
            let mut rng = seeded(seed);
            floor.tick(&mut player, false, &mut rng);
            let landed = match goblin_positions(&floor).as_slice() {
                [landed] => *landed,
                other => panic!("expected one goblin, found {other:?}"),
            };
            *counts.entry(landed).or_default() += 1;
        }
        assert_eq!(counts.len(), 5);
        for (pos, count) in counts {
            let share = f64::from(count) / trials as f64;
            assert!((0.15..0.25).contains(&share), "{pos:?} chosen with share {share}");
            assert!((pos.x - origin.x).abs() + (pos.y - origin.y).abs() <= 1);
        }
    }

    #[test]
    fn boxed_in_enemy_stays_put() {
        let mut floor = floor(&["-::::", ":::::", "::X::", ":::::", ":::::"]);
        let mut player = player_at(Pos { y: 0, x: 0 });
        for seed in 0..20 {
            floor.tick(&mut player, false, &mut seeded(seed));
            assert_eq!(goblin_positions(&floor), vec![Pos { y: 2, x: 2 }]);
        }
    }

    #[test]
    fn single_open_neighbour_is_taken_one_time_in_five() {
        let trials = 2_000;
        let mut moved = 0u32;
        for seed in 0..trials {
            let mut floor = floor(&["-::::", ":::::", "::X :", ":::::", ":::::"]);
            let mut player = player_at(Pos { y: 0, x: 0 });
            floor.tick(&mut player, false, &mut seeded(seed));
            match goblin_positions(&floor).as_slice() {
                [Pos { y: 2, x: 3 }] => moved += 1,
                [Pos { y: 2, x: 2 }] => {}
                other => panic!("goblin left its corridor: {other:?}"),
            }
        }
        let share = f64::from(moved) / trials as f64;
        assert!((0.15..0.25).contains(&share), "moved with share {share}");
        assert!((0.75..0.85).contains(&(1.0 - share)), "stayed with share {}", 1.0 - share);
    }

    #[test]
    fn enemies_never_occupy_an_open_switch_gate() {
        let plan = LevelPlan::parse(0, &["-::::", ":X_::", ":::::"]).expect("plan");
        let settings = FloorSettings {
            switch_tiles: Some((TileKind::Wall, TileKind::Empty)),
            ..FloorSettings::default()
        };
        let mut floor = Floor::from_plan(plan, &settings, &bare_config(), &mut seeded(1));
        let gate = Pos { y: 1, x: 2 };
        floor.toggle_switch();
        assert_eq!(floor.get_tile(gate), TileKind::Empty);

        let mut player = player_at(Pos { y: 1, x: 3 });
        floor.set_move_mode(MoveMode::Magnet);
        floor.tick(&mut player, false, &mut seeded(0));
        floor.set_move_mode(MoveMode::Random);
        for seed in 0..20 {
            floor.tick(&mut player, false, &mut seeded(seed));
        }
        assert_eq!(floor.stored_tile(gate), TileKind::SwitchTile);
        assert_eq!(goblin_positions(&floor), vec![Pos { y: 1, x: 1 }]);

        floor.toggle_switch();
        assert_eq!(floor.get_tile(gate), TileKind::Wall);
    }

    #[test]
    fn enemies_do_not_enter_safety_tiles() {
        let mut floor = floor(&["-8888", "88X88", "88888"]);
        let mut player = player_at(Pos { y: 0, x: 0 });
        for seed in 0..20 {
            floor.tick(&mut player, false, &mut seeded(seed));
        }
        assert_eq!(goblin_positions(&floor), vec![Pos { y: 1, x: 2 }]);
    }

    #[test]
    fn lightning_destroys_enemy_that_steps_onto_it() {
        let mut floor = floor(&["-::::", "::L::", ":LXL:", "::L::", ":::::"]);
        floor.set_move_mode(MoveMode::Magnet);
        let mut player = player_at(Pos { y: 2, x: 4 });
        let events = floor.tick(&mut player, false, &mut seeded(0));
        assert!(goblin_positions(&floor).is_empty());
        assert_eq!(player.kills, 1);
        assert_eq!(floor.get_tile(Pos { y: 2, x: 3 }), TileKind::Lightning);
        assert!(events.iter().any(|event| matches!(
            event,
            LogEvent::EnemyKilled { cause: KillCause::Lightning, .. }
        )));
    }

    #[test]
    fn magnet_prefers_horizontal_step_toward_player() {
        let mut floor = open_room();
        floor.set_move_mode(MoveMode::Magnet);
        let mut player = player_at(Pos { y: 5, x: 1 });
        floor.tick(&mut player, false, &mut seeded(0));
        assert_eq!(goblin_positions(&floor), vec![Pos { y: 3, x: 2 }]);
    }

    #[test]
    fn magnet_falls_back_to_vertical_step_when_aligned() {
        let mut floor = open_room();
        floor.set_move_mode(MoveMode::Magnet);
        let mut player = player_at(Pos { y: 1, x: 3 });
        floor.tick(&mut player, false, &mut seeded(0));
        assert_eq!(goblin_positions(&floor), vec![Pos { y: 2, x: 3 }]);
    }

    #[test]
    fn magnet_falls_back_to_vertical_step_when_blocked() {
        let mut floor = floor(&["-::::::", ":     :", ":     :", ": :X  :", ":     :", ":::::::"]);
        floor.set_move_mode(MoveMode::Magnet);
        let mut player = player_at(Pos { y: 4, x: 1 });
        floor.tick(&mut player, false, &mut seeded(0));
        assert_eq!(goblin_positions(&floor), vec![Pos { y: 4, x: 3 }]);
    }

    #[test]
    fn first_claimant_in_scan_order_wins_contested_cell() {
        let mut floor = floor(&["-::::", ":X X:", ":::::"]);
        floor.set_move_mode(MoveMode::Magnet);
        let mut player = player_at(Pos { y: 1, x: 2 });
        floor.tick(&mut player, false, &mut seeded(0));
        assert_eq!(goblin_positions(&floor), vec![Pos { y: 1, x: 2 }, Pos { y: 1, x: 3 }]);
    }

    proptest! {
        #[test]
        fn enemy_count_never_grows(seed in any::<u64>(), steps in 1usize..30) {
            let mut floor = floor(&[
                "-:::::::",
                ":X  A  :",
                ":  H  C:",
                ": L  Z :",
                "::::::::",
            ]);
            let before = (0..floor.height() * floor.width())
                .filter(|index| floor.get_tile(floor.pos_of(*index)).is_enemy())
                .count();
            let mut player = player_at(Pos { y: 0, x: 0 });
            let mut rng = seeded(seed);
            for _ in 0..steps {
                floor.tick(&mut player, false, &mut rng);
            }
            let after = (0..floor.height() * floor.width())
                .filter(|index| floor.get_tile(floor.pos_of(*index)).is_enemy())
                .count();
            prop_assert!(after <= before);
            prop_assert_eq!(before - after, player.kills as usize);
        }
    }
}
