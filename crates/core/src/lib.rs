pub mod config;
pub mod content;
pub mod effects;
pub mod error;
pub mod floor;
pub mod journal;
pub mod level_graph;
pub mod player;
pub mod replay;
pub mod rng;
pub mod scores;
pub mod session;
pub mod tile;
pub mod types;

pub use config::EngineConfig;
pub use content::{Campaign, FloorSettings};
pub use effects::{EffectKind, EffectTimerRegistry};
pub use error::{BuildError, ScoreStoreError};
pub use floor::{Floor, LevelPlan, LevelRows, MoveOutcome};
pub use journal::{Command, InputJournal, InputRecord};
pub use level_graph::LevelGraph;
pub use player::Player;
pub use replay::*;
pub use scores::{HighScoreStore, HighScoreTable, MemoryScoreStore, ScoreEntry};
pub use session::Session;
pub use tile::TileKind;
pub use types::*;
