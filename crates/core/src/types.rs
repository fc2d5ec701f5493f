use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::effects::EffectKind;
use crate::tile::TileKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Pos { y: self.y + dy, x: self.x + dx }
    }

    /// Cells of the 3×3 block centred on `self`, row-major, including `self`.
    pub fn neighbourhood(self) -> [Pos; 9] {
        let mut cells = [self; 9];
        let mut index = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                cells[index] = self.offset(dx, dy);
                index += 1;
            }
        }
        cells
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Ready,
    Playing,
    Paused,
    GameOver,
    Finished,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::GameOver | SessionState::Finished)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveMode {
    #[default]
    Random,
    Magnet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    Contact(TileKind),
    Blast,
    Collision(TileKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillCause {
    Blast,
    Lightning,
    Sword,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    StateChanged { from: SessionState, to: SessionState },
    FloorChanged { from: usize, to: usize },
    EffectActivated { kind: EffectKind },
    EffectExpired { kind: EffectKind },
    ItemCollected { tile: TileKind, pos: Pos },
    TileSwapped { from: TileKind, to: TileKind, pos: Pos },
    SwitchToggled { on: bool },
    ExitUnlocked { floor: usize },
    DoorOpened { tile: TileKind, pos: Pos },
    MoveReverted { tile: TileKind, to: Pos },
    PlayerDamaged { amount: i32, source: DamageSource },
    AttackBlocked { tile: TileKind },
    EnemyKilled { tile: TileKind, pos: Pos, cause: KillCause },
    TrapDisarmed { pos: Pos },
    LavaFrozen { pos: Pos },
    BombDetonated { pos: Pos },
    BlastResolved { pos: Pos },
    BrazierBurntOut { pos: Pos },
    TrophyCollected { trophies: u32, total: u32 },
    HighScoreRecorded { name: String, score: u32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Period of the external clock pulse that drives `Session::tick`.
    pub fn pulse_interval(self) -> Duration {
        let millis = match self {
            Difficulty::Easy => 700,
            Difficulty::Medium => 500,
            Difficulty::Hard => 300,
        };
        Duration::from_millis(millis)
    }
}
