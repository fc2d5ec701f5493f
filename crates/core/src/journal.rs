use serde::{Deserialize, Serialize};

use crate::types::Direction;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Every external input a session accepts, in journal form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    TogglePause,
    Pause,
    Resume,
    Action,
    Reset,
    Rename { name: String },
    Move(Direction),
    /// One external clock pulse.
    Pulse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub content_hash: u64,
    pub seed: u64,
    pub player_name: String,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub command: Command,
}

impl InputJournal {
    pub fn new(seed: u64, content_hash: u64, player_name: impl Into<String>) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: env!("CARGO_PKG_VERSION").to_string(),
            content_hash,
            seed,
            player_name: player_name.into(),
            inputs: Vec::new(),
        }
    }

    pub fn append(&mut self, command: Command) -> u64 {
        let seq = self.inputs.last().map_or(0, |record| record.seq + 1);
        self.inputs.push(InputRecord { seq, command });
        seq
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.inputs.iter().map(|record| &record.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase_from_zero() {
        let mut journal = InputJournal::new(3, 0, "p");
        assert_eq!(journal.append(Command::Start), 0);
        assert_eq!(journal.append(Command::Move(Direction::Left)), 1);
        assert_eq!(journal.append(Command::Pulse), 2);
        assert_eq!(journal.commands().count(), 3);
    }

    #[test]
    fn journal_survives_json() {
        let mut journal = InputJournal::new(9, 77, "Doran");
        journal.append(Command::Rename { name: "Mira".to_string() });
        journal.append(Command::Move(Direction::Up));
        let text = serde_json::to_string(&journal).expect("serialise");
        let restored: InputJournal = serde_json::from_str(&text).expect("deserialise");
        assert_eq!(restored, journal);
    }
}
