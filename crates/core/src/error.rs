use std::io;

use thiserror::Error;

use crate::tile::TileKind;

/// Configuration problems found while building a run. None of these are recoverable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("campaign configures {settings} floors but only {plans} level plans were supplied")]
    MissingPlans { settings: usize, plans: usize },
    #[error("level plan for floor {floor} has no rows")]
    EmptyPlan { floor: usize },
    #[error("level plan for floor {floor}: row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { floor: usize, row: usize, expected: usize, found: usize },
    #[error("level plan for floor {floor}: unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph { floor: usize, row: usize, column: usize, glyph: char },
    #[error("floor {floor} names {kind:?} as its enemy kind, which is not an enemy")]
    NotAnEnemy { floor: usize, kind: TileKind },
    #[error("campaign has no floors")]
    NoFloors,
    #[error("starting floor {start} is outside the {floors} floors of the campaign")]
    StartOutOfRange { start: usize, floors: usize },
}

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("high score storage I/O failed")]
    Io(#[from] io::Error),
    #[error("high score data is malformed")]
    Format(#[from] serde_json::Error),
}
