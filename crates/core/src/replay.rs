//! Deterministic re-execution of recorded input journals.

use thiserror::Error;

use crate::config::EngineConfig;
use crate::content::Campaign;
use crate::error::BuildError;
use crate::floor::MoveOutcome;
use crate::journal::{Command, InputJournal, JOURNAL_FORMAT_VERSION};
use crate::scores::{HighScoreStore, MemoryScoreStore};
use crate::session::Session;
use crate::types::SessionState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("journal format {found} is not supported (expected {expected})")]
    UnsupportedFormat { found: u16, expected: u16 },
    #[error("journal was recorded against other content ({journal:#018x}, campaign is {campaign:#018x})")]
    ContentMismatch { journal: u64, campaign: u64 },
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_state: SessionState,
    pub final_snapshot_hash: u64,
    pub final_tick: u64,
    pub final_score: u32,
    pub final_floor: usize,
}

impl ReplayResult {
    pub fn of(session: &Session) -> Self {
        Self {
            final_state: session.state(),
            final_snapshot_hash: session.snapshot_hash(),
            final_tick: session.current_tick(),
            final_score: session.score(),
            final_floor: session.floor_index(),
        }
    }
}

/// A session whose every command is also written to a journal.
pub struct Recorder {
    session: Session,
    journal: InputJournal,
}

impl Recorder {
    pub fn new(
        campaign: &Campaign,
        config: EngineConfig,
        seed: u64,
        player_name: &str,
    ) -> Result<Self, BuildError> {
        let scores = Box::new(MemoryScoreStore::new(config.high_score_capacity));
        Self::with_store(campaign, config, seed, player_name, scores)
    }

    /// Like `new`, reporting finished runs to `scores`.
    pub fn with_store(
        campaign: &Campaign,
        config: EngineConfig,
        seed: u64,
        player_name: &str,
        scores: Box<dyn HighScoreStore>,
    ) -> Result<Self, BuildError> {
        let session = Session::new(campaign, config, seed, player_name, scores)?;
        let journal = InputJournal::new(seed, campaign.content_hash(), player_name);
        Ok(Self { session, journal })
    }

    pub fn apply(&mut self, command: Command) -> Option<MoveOutcome> {
        let outcome = self.session.apply(&command);
        self.journal.append(command);
        outcome
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn journal(&self) -> &InputJournal {
        &self.journal
    }

    pub fn into_journal(self) -> InputJournal {
        self.journal
    }
}

pub fn replay_to_end(
    campaign: &Campaign,
    config: &EngineConfig,
    journal: &InputJournal,
) -> Result<ReplayResult, ReplayError> {
    if journal.format_version != JOURNAL_FORMAT_VERSION {
        return Err(ReplayError::UnsupportedFormat {
            found: journal.format_version,
            expected: JOURNAL_FORMAT_VERSION,
        });
    }
    let content_hash = campaign.content_hash();
    if journal.content_hash != content_hash {
        return Err(ReplayError::ContentMismatch {
            journal: journal.content_hash,
            campaign: content_hash,
        });
    }

    let scores = Box::new(MemoryScoreStore::new(config.high_score_capacity));
    let mut session =
        Session::new(campaign, config.clone(), journal.seed, journal.player_name.clone(), scores)?;
    for command in journal.commands() {
        session.apply(command);
    }
    Ok(ReplayResult::of(&session))
}
