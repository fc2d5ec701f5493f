//! Clock pulses: effect timers, step gating and the end-of-run check.

use tracing::{info, warn};

use super::*;
use crate::effects::EffectKind;
use crate::types::MoveMode;

impl Session {
    /// One external clock pulse. The counter always advances; the world only
    /// moves while playing, and only on pulses the speed rule selects.
    pub fn tick(&mut self) {
        self.tick += 1;
        if self.state != SessionState::Playing {
            return;
        }

        let step_due = self.step_due();
        let mode = if self.effects.is_active(EffectKind::Magnet) {
            MoveMode::Magnet
        } else {
            MoveMode::Random
        };
        self.levels.current_mut().set_move_mode(mode);

        for kind in self.effects.advance() {
            match kind {
                EffectKind::Sword => self.player.sword = false,
                EffectKind::Shield => self.player.shield = false,
                _ => {}
            }
            self.log.push(LogEvent::EffectExpired { kind });
        }

        if step_due {
            let frost = self.effects.is_active(EffectKind::Frost);
            let events = self.levels.current_mut().tick(&mut self.player, frost, &mut self.rng);
            self.log.extend(events);
            self.check_collision();
        }

        if self.player.is_dead() {
            self.game_over();
        }
    }

    /// Fast steps every pulse, slow every fourth, otherwise every second.
    fn step_due(&self) -> bool {
        if self.effects.is_active(EffectKind::Fast) {
            true
        } else if self.effects.is_active(EffectKind::Slow) {
            self.tick % 4 == 0
        } else {
            self.tick % 2 == 0
        }
    }

    fn game_over(&mut self) {
        self.set_state(SessionState::GameOver);
        let score = self.player.score();
        if !self.scores.is_high_score(score) {
            return;
        }
        self.scores.add(&self.player.name, score);
        info!(name = %self.player.name, score, "high score recorded");
        self.log.push(LogEvent::HighScoreRecorded { name: self.player.name.clone(), score });
        if let Err(error) = self.scores.save() {
            warn!(%error, "failed to save high scores");
        }
    }
}
