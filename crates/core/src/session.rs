//! The run orchestrator.
//!
//! This module exists to own one run's mutable state (player, floors, effect
//! timers, randomness, event log) behind a single struct and to gate every
//! external command on the session state machine:
//! READY -> PLAYING -> {PAUSED <-> PLAYING, GAME_OVER, FINISHED}.
//! It does not own presentation, input mapping or the pulse timer; callers
//! drive it with commands and read it through accessors.

use std::time::{Duration, Instant};

use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::content::{Blueprint, Campaign};
use crate::effects::EffectTimerRegistry;
use crate::error::BuildError;
use crate::floor::{Floor, MoveOutcome};
use crate::journal::Command;
use crate::level_graph::LevelGraph;
use crate::player::Player;
use crate::rng::seeded;
use crate::scores::{HighScoreStore, MemoryScoreStore, ScoreEntry};
use crate::types::{LogEvent, SessionState};

mod clock;
mod hash;
mod interaction;

pub struct Session {
    seed: u64,
    state: SessionState,
    tick: u64,
    levels: LevelGraph,
    player: Player,
    effects: EffectTimerRegistry,
    rng: ChaCha8Rng,
    started_at: Instant,
    log: Vec<LogEvent>,
    scores: Box<dyn HighScoreStore>,
    blueprint: Blueprint,
    config: EngineConfig,
}

impl Session {
    pub fn new(
        campaign: &Campaign,
        config: EngineConfig,
        seed: u64,
        player_name: impl Into<String>,
        scores: Box<dyn HighScoreStore>,
    ) -> Result<Self, BuildError> {
        let blueprint = campaign.compile(&config)?;
        let mut rng = seeded(seed);
        let levels = LevelGraph::build(&blueprint, &config, &mut rng);
        let mut player = Player::new(player_name, config.starting_hp);
        player.place(levels.current().entrance());
        info!(seed, floors = levels.len(), trophies = levels.total_trophies(), "session created");

        Ok(Self {
            seed,
            state: SessionState::Ready,
            tick: 0,
            levels,
            player,
            effects: EffectTimerRegistry::new(),
            rng,
            started_at: Instant::now(),
            log: Vec::new(),
            scores,
            blueprint,
            config,
        })
    }

    /// Session over the built-in demo tower with an in-memory score table.
    pub fn demo(seed: u64, player_name: impl Into<String>) -> Result<Self, BuildError> {
        let config = EngineConfig::default();
        let scores = Box::new(MemoryScoreStore::new(config.high_score_capacity));
        Self::new(&Campaign::demo(), config, seed, player_name, scores)
    }

    /// Rebuilds every floor and resets the player, effects and clock. The
    /// player's name survives.
    pub fn initialise(&mut self) {
        self.levels = LevelGraph::build(&self.blueprint, &self.config, &mut self.rng);
        self.player.initialise(self.config.starting_hp);
        self.player.place(self.levels.current().entrance());
        self.effects.clear();
        self.tick = 0;
        self.started_at = Instant::now();
        self.set_state(SessionState::Ready);
    }

    pub fn reset(&mut self) {
        self.initialise();
    }

    pub fn start(&mut self) {
        if self.state != SessionState::Ready {
            debug!(state = ?self.state, "start ignored");
            return;
        }
        self.started_at = Instant::now();
        self.set_state(SessionState::Playing);
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Playing => self.set_state(SessionState::Paused),
            SessionState::Paused => self.set_state(SessionState::Playing),
            other => debug!(state = ?other, "pause toggle ignored"),
        }
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Playing {
            self.set_state(SessionState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == SessionState::Paused {
            self.set_state(SessionState::Playing);
        }
    }

    /// The single "action" key: starts a ready run, toggles pause while a run
    /// is live, and sets up a new run once the current one has ended.
    pub fn press_action(&mut self) {
        match self.state {
            SessionState::Ready => self.start(),
            SessionState::Playing | SessionState::Paused => self.toggle_pause(),
            SessionState::GameOver | SessionState::Finished => self.initialise(),
        }
    }

    pub fn rename_player(&mut self, name: impl Into<String>) {
        self.player.name = name.into();
    }

    /// Returns `None` when the command was ignored because no run is playing.
    pub fn apply(&mut self, command: &Command) -> Option<MoveOutcome> {
        match command {
            Command::Start => self.start(),
            Command::TogglePause => self.toggle_pause(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Action => self.press_action(),
            Command::Reset => self.reset(),
            Command::Rename { name } => self.rename_player(name.clone()),
            Command::Move(direction) => return self.move_player(*direction),
            Command::Pulse => self.tick(),
        }
        None
    }

    fn set_state(&mut self, to: SessionState) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        info!(?from, ?to, tick = self.tick, "session state changed");
        self.log.push(LogEvent::StateChanged { from, to });
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn current_floor(&self) -> &Floor {
        self.levels.current()
    }

    pub fn floor_index(&self) -> usize {
        self.levels.current_index()
    }

    pub fn levels(&self) -> &LevelGraph {
        &self.levels
    }

    pub fn total_trophies(&self) -> u32 {
        self.levels.total_trophies()
    }

    pub fn effects(&self) -> &EffectTimerRegistry {
        &self.effects
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn score(&self) -> u32 {
        self.player.score()
    }

    pub fn high_scores(&self) -> &[ScoreEntry] {
        self.scores.entries()
    }

    pub fn is_high_score(&self) -> bool {
        self.scores.is_high_score(self.player.score())
    }
}
