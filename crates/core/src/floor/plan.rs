//! Parsing of ASCII level diagrams into a rectangular grid of tile kinds.

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::tile::TileKind;
use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    width: usize,
    height: usize,
    cells: Vec<TileKind>,
}

/// Raw level diagram as it appears in campaign files: one string per row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelRows(pub Vec<String>);

impl LevelRows {
    pub fn from_strs(rows: &[&str]) -> Self {
        Self(rows.iter().map(|row| (*row).to_string()).collect())
    }
}

impl LevelPlan {
    /// Parses `rows` for floor number `floor`, used only for error reporting.
    pub fn parse<S: AsRef<str>>(floor: usize, rows: &[S]) -> Result<Self, BuildError> {
        let Some(first) = rows.first() else {
            return Err(BuildError::EmptyPlan { floor });
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(BuildError::EmptyPlan { floor });
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(BuildError::RaggedRow { floor, row: row_index, expected: width, found });
            }
            for (column, glyph) in row.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or(BuildError::UnknownGlyph {
                    floor,
                    row: row_index,
                    column,
                    glyph,
                })?;
                cells.push(kind);
            }
        }

        Ok(Self { width, height: rows.len(), cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        self.cells[(pos.y as usize) * self.width + (pos.x as usize)]
    }

    pub(super) fn into_cells(self) -> Vec<TileKind> {
        self.cells
    }

    /// Row-major positions holding `kind`.
    pub fn positions_of(&self, kind: TileKind) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().enumerate().filter(move |(_, cell)| **cell == kind).map(|(index, _)| {
            Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 }
        })
    }
}
