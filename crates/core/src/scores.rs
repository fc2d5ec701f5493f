//! High-score ranking and the storage contract the session reports to.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::error::ScoreStoreError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Bounded table ordered by descending score. Equal scores keep arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreTable {
    capacity: usize,
    entries: Vec<ScoreEntry>,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: Vec::new() }
    }

    /// Rebuilds a table from stored entries, re-sorting and trimming to `capacity`.
    pub fn from_entries(capacity: usize, entries: Vec<ScoreEntry>) -> Self {
        let mut table = Self::new(capacity);
        for entry in entries {
            table.add(entry.name, entry.score);
        }
        table
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_high_score(&self, score: u32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        self.entries.len() < self.capacity
            || self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    /// Inserts the score if it qualifies. Returns its rank when kept.
    pub fn add(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        if !self.is_high_score(score) {
            return None;
        }
        let rank = self.entries.partition_point(|entry| entry.score >= score);
        self.entries.insert(rank, ScoreEntry { name: name.into(), score });
        self.entries.truncate(self.capacity);
        Some(rank)
    }
}

/// Where finished runs are reported. Implementations own persistence.
pub trait HighScoreStore {
    fn load(&mut self) -> Result<(), ScoreStoreError>;
    fn save(&self) -> Result<(), ScoreStoreError>;
    fn is_high_score(&self, score: u32) -> bool;
    fn add(&mut self, name: &str, score: u32);
    fn entries(&self) -> &[ScoreEntry];
}

/// Store that keeps its table in memory. `save` only counts calls.
#[derive(Clone, Debug)]
pub struct MemoryScoreStore {
    table: HighScoreTable,
    saves: Cell<usize>,
}

impl MemoryScoreStore {
    pub fn new(capacity: usize) -> Self {
        Self { table: HighScoreTable::new(capacity), saves: Cell::new(0) }
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<(), ScoreStoreError> {
        Ok(())
    }

    fn save(&self) -> Result<(), ScoreStoreError> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn is_high_score(&self, score: u32) -> bool {
        self.table.is_high_score(score)
    }

    fn add(&mut self, name: &str, score: u32) {
        self.table.add(name, score);
    }

    fn entries(&self) -> &[ScoreEntry] {
        self.table.entries()
    }
}
