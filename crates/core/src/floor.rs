//! One floor of the tower.
//!
//! This module exists to own a floor's mutable cell array together with the
//! per-cell countdown tables for lit bombs and lit braziers, and to run the
//! per-step world evolution (contact damage, hazards, enemy movement).
//! It does not own the player's counters beyond what a simulation step
//! touches directly, and it knows nothing about other floors.

use std::collections::BTreeMap;
use std::iter;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::content::FloorSettings;
use crate::error::BuildError;
use crate::player::Player;
use crate::rng::{roll, roll_between, seeded};
use crate::tile::TileKind;
use crate::types::{DamageSource, LogEvent, MoveMode, Pos};

mod enemies;
mod hazards;
mod plan;

pub use plan::{LevelPlan, LevelRows};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    OutOfBounds,
    Blocked(TileKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HazardTimings {
    bomb_fuse: u32,
    brazier_burn: u32,
    blast_damage: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Floor {
    name: String,
    width: usize,
    height: usize,
    cells: Vec<TileKind>,
    entrance: Pos,
    exit: Option<Pos>,
    fake_exits: Vec<Pos>,
    trophies: u32,
    switch_on: bool,
    switch_tiles: Option<(TileKind, TileKind)>,
    exit_locked: bool,
    move_mode: MoveMode,
    bombs: BTreeMap<Pos, u32>,
    braziers: BTreeMap<Pos, u32>,
    timings: HazardTimings,
}

const DEFAULT_ENTRANCE: Pos = Pos { y: 1, x: 1 };

impl Floor {
    /// Builds a floor from a parsed plan: locates the entrance, exit and goals,
    /// promotes a fake exit when no real exit exists, and stamps safety zones.
    pub fn from_plan(
        plan: LevelPlan,
        settings: &FloorSettings,
        config: &EngineConfig,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let entrance = plan
            .positions_of(TileKind::Entrance)
            .chain(plan.positions_of(TileKind::EntranceTeleport))
            .min()
            .unwrap_or(DEFAULT_ENTRANCE);
        let mut exit = plan.positions_of(TileKind::Exit).next();
        let mut fake_exits: Vec<Pos> = plan.positions_of(TileKind::FakeExit).collect();
        let trophies = plan.positions_of(TileKind::Goal).count() as u32;
        let (width, height) = (plan.width(), plan.height());

        let mut floor = Self {
            name: settings.name.clone(),
            width,
            height,
            cells: plan.into_cells(),
            entrance,
            exit: None,
            fake_exits: Vec::new(),
            trophies,
            switch_on: false,
            switch_tiles: settings.switch_tiles,
            exit_locked: true,
            move_mode: MoveMode::Random,
            bombs: BTreeMap::new(),
            braziers: BTreeMap::new(),
            timings: HazardTimings {
                bomb_fuse: config.bomb_fuse,
                brazier_burn: config.brazier_burn,
                blast_damage: config.blast_damage,
            },
        };

        if exit.is_none() && !fake_exits.is_empty() {
            let promoted = fake_exits.remove(roll(rng, fake_exits.len()));
            floor.set_tile(promoted, TileKind::Exit);
            debug!(floor = %floor.name, ?promoted, "promoted fake exit");
            exit = Some(promoted);
        }
        floor.exit = exit;
        floor.fake_exits = fake_exits;

        let protected: Vec<Pos> =
            iter::once(entrance).chain(exit).chain(floor.fake_exits.iter().copied()).collect();
        for centre in protected {
            floor.stamp_safety_zone(centre, config);
        }
        floor.reconcile_countdowns();
        floor
    }

    /// Parses `rows` and builds a floor with default settings. Used by tools
    /// and tests that work with a single hand-written floor.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], config: &EngineConfig) -> Result<Self, BuildError> {
        let plan = LevelPlan::parse(0, rows)?;
        Ok(Self::from_plan(plan, &FloorSettings::default(), config, &mut seeded(0)))
    }

    fn stamp_safety_zone(&mut self, centre: Pos, config: &EngineConfig) {
        let (xs, ys) = config.safety_zone.offsets();
        for dy in ys {
            for dx in xs.clone() {
                let cell = centre.offset(dx, dy);
                if self.in_bounds(cell) && self.cells[self.index(cell)] == TileKind::Empty {
                    self.set_tile(cell, TileKind::Safety);
                }
            }
        }
    }

    /// Scatters the floor's configured items over random empty interior cells.
    pub fn place_items(&mut self, settings: &FloorSettings, attempts: u32, rng: &mut ChaCha8Rng) {
        let batches = [
            (TileKind::ExitKey, settings.keys),
            (TileKind::Treasure, settings.treasures),
            (settings.enemy_kind, settings.enemies),
            (TileKind::Trap, settings.traps),
        ];
        for (kind, count) in batches {
            for _ in 0..count {
                if !self.place_one(kind, attempts, rng) {
                    warn!(floor = %self.name, ?kind, attempts, "no empty cell found; item skipped");
                }
            }
        }
    }

    fn place_one(&mut self, kind: TileKind, attempts: u32, rng: &mut ChaCha8Rng) -> bool {
        if self.width < 3 || self.height < 3 {
            return false;
        }
        for _ in 0..attempts {
            let cell = Pos {
                y: roll_between(rng, 1, self.height - 2) as i32,
                x: roll_between(rng, 1, self.width - 2) as i32,
            };
            if self.get_tile(cell) == TileKind::Empty {
                self.set_tile(cell, kind);
                return true;
            }
        }
        false
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn entrance(&self) -> Pos {
        self.entrance
    }

    pub fn exit(&self) -> Option<Pos> {
        self.exit
    }

    pub fn fake_exits(&self) -> &[Pos] {
        &self.fake_exits
    }

    /// GOAL tiles present when the floor was loaded.
    pub fn trophies(&self) -> u32 {
        self.trophies
    }

    pub fn switch_on(&self) -> bool {
        self.switch_on
    }

    pub fn exit_locked(&self) -> bool {
        self.exit_locked
    }

    pub fn unlock_exit(&mut self) {
        self.exit_locked = false;
    }

    pub fn move_mode(&self) -> MoveMode {
        self.move_mode
    }

    pub fn set_move_mode(&mut self, mode: MoveMode) {
        self.move_mode = mode;
    }

    pub fn bomb_countdowns(&self) -> &BTreeMap<Pos, u32> {
        &self.bombs
    }

    pub fn brazier_countdowns(&self) -> &BTreeMap<Pos, u32> {
        &self.braziers
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    fn pos_of(&self, index: usize) -> Pos {
        Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 }
    }

    /// Kind stored in the cell, without resolving switch placeholders.
    pub fn stored_tile(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.cells[self.index(pos)]
    }

    /// Resolved kind of the cell. Out-of-bounds cells read as walls.
    pub fn get_tile(&self, pos: Pos) -> TileKind {
        self.resolve(self.stored_tile(pos))
    }

    fn resolve(&self, stored: TileKind) -> TileKind {
        match (stored, self.switch_tiles) {
            (TileKind::SwitchTile, Some((off, on))) => {
                if self.switch_on {
                    on
                } else {
                    off
                }
            }
            _ => stored,
        }
    }

    fn resolved_cells(&self) -> Vec<TileKind> {
        self.cells.iter().map(|cell| self.resolve(*cell)).collect()
    }

    /// Unconditional write. Keeps the countdown tables in step with the
    /// resolved kind of the cell.
    pub fn set_tile(&mut self, pos: Pos, kind: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let index = self.index(pos);
        self.cells[index] = kind;
        self.sync_countdowns(pos);
    }

    fn sync_countdowns(&mut self, pos: Pos) {
        let resolved = self.get_tile(pos);
        sync_entry(&mut self.bombs, pos, resolved == TileKind::BombLit, self.timings.bomb_fuse);
        sync_entry(
            &mut self.braziers,
            pos,
            resolved == TileKind::BrazierLit,
            self.timings.brazier_burn,
        );
    }

    fn reconcile_countdowns(&mut self) {
        for index in 0..self.cells.len() {
            let pos = self.pos_of(index);
            self.sync_countdowns(pos);
        }
    }

    pub fn toggle_switch(&mut self) -> bool {
        self.switch_on = !self.switch_on;
        self.reconcile_countdowns();
        self.switch_on
    }

    /// True when every countdown entry matches a lit cell and vice versa.
    pub fn countdowns_consistent(&self) -> bool {
        (0..self.cells.len()).all(|index| {
            let pos = self.pos_of(index);
            let resolved = self.get_tile(pos);
            (resolved == TileKind::BombLit) == self.bombs.contains_key(&pos)
                && (resolved == TileKind::BrazierLit) == self.braziers.contains_key(&pos)
        })
    }

    pub fn count(&self, kind: TileKind) -> usize {
        (0..self.cells.len()).filter(|index| self.get_tile(self.pos_of(*index)) == kind).count()
    }

    /// Rows of resolved glyphs, top to bottom.
    pub fn render_rows(&self) -> Vec<String> {
        self.resolved_cells()
            .chunks(self.width)
            .map(|row| row.iter().map(|kind| kind.glyph()).collect())
            .collect()
    }

    pub fn move_request(&self, player: &mut Player, dx: i32, dy: i32) -> MoveOutcome {
        let target = player.pos().offset(dx, dy);
        if !self.in_bounds(target) {
            player.stay();
            return MoveOutcome::OutOfBounds;
        }
        let kind = self.get_tile(target);
        if kind.blocks_player() {
            player.stay();
            return MoveOutcome::Blocked(kind);
        }
        player.step_to(target);
        MoveOutcome::Accepted
    }

    /// One simulation step: contact damage, then hazards, then enemies.
    pub fn tick(
        &mut self,
        player: &mut Player,
        frost_active: bool,
        rng: &mut ChaCha8Rng,
    ) -> Vec<LogEvent> {
        let mut events = Vec::new();
        self.apply_contact_damage(player, frost_active, &mut events);
        self.advance_hazards(player, &mut events);
        self.move_enemies(player, rng, &mut events);
        events
    }

    fn apply_contact_damage(
        &mut self,
        player: &mut Player,
        frost_active: bool,
        events: &mut Vec<LogEvent>,
    ) {
        let pos = player.pos();
        let kind = self.get_tile(pos);
        if kind == TileKind::Lava && frost_active {
            self.set_tile(pos, TileKind::Empty);
            events.push(LogEvent::LavaFrozen { pos });
        } else if kind.damages_on_contact() {
            player.take_damage(1);
            events.push(LogEvent::PlayerDamaged { amount: 1, source: DamageSource::Contact(kind) });
        }
    }

    /// Stable byte encoding of everything a simulation step can change.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.cells.iter().map(|kind| *kind as u8));
        bytes.push(u8::from(self.switch_on));
        bytes.push(u8::from(self.exit_locked));
        bytes.push(match self.move_mode {
            MoveMode::Random => 0,
            MoveMode::Magnet => 1,
        });
        for table in [&self.bombs, &self.braziers] {
            bytes.extend((table.len() as u32).to_le_bytes());
            for (pos, remaining) in table {
                bytes.extend(pos.y.to_le_bytes());
                bytes.extend(pos.x.to_le_bytes());
                bytes.extend(remaining.to_le_bytes());
            }
        }
        bytes
    }
}

fn sync_entry(table: &mut BTreeMap<Pos, u32>, pos: Pos, lit: bool, start: u32) {
    if lit {
        table.entry(pos).or_insert(start);
    } else {
        table.remove(&pos);
    }
}
