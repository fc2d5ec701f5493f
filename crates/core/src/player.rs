use serde::{Deserialize, Serialize};

use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pos: Pos,
    previous: Pos,
    moved: bool,
    pub keys: u32,
    pub exit_keys: u32,
    pub boss_key: bool,
    pub treasure: u32,
    pub trophies: u32,
    pub kills: u32,
    pub hp: i32,
    pub sword: bool,
    pub shield: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, starting_hp: i32) -> Self {
        let origin = Pos { y: 0, x: 0 };
        Self {
            name: name.into(),
            pos: origin,
            previous: origin,
            moved: false,
            keys: 0,
            exit_keys: 0,
            boss_key: false,
            treasure: 0,
            trophies: 0,
            kills: 0,
            hp: starting_hp,
            sword: false,
            shield: false,
        }
    }

    /// Resets counters and equipment; name and position are kept.
    pub fn initialise(&mut self, starting_hp: i32) {
        self.keys = 0;
        self.exit_keys = 0;
        self.boss_key = false;
        self.treasure = 0;
        self.trophies = 0;
        self.kills = 0;
        self.hp = starting_hp;
        self.sword = false;
        self.shield = false;
        self.moved = false;
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn previous(&self) -> Pos {
        self.previous
    }

    /// True when the last movement command was accepted and not reverted.
    pub fn moved(&self) -> bool {
        self.moved
    }

    pub(crate) fn step_to(&mut self, pos: Pos) {
        self.previous = self.pos;
        self.pos = pos;
        self.moved = true;
    }

    pub(crate) fn stay(&mut self) {
        self.moved = false;
    }

    /// Places the player without a movement history, as on floor changes.
    pub fn place(&mut self, pos: Pos) {
        self.pos = pos;
        self.previous = pos;
        self.moved = false;
    }

    pub(crate) fn revert(&mut self) {
        self.pos = self.previous;
        self.moved = false;
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn score(&self) -> u32 {
        self.kills + self.treasure + self.trophies * 50
    }
}
