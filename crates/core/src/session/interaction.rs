//! Player movement and what the landed tile does.
//! This module exists to keep the priority-ordered rule table and collision
//! handling in one place. It does not own grid evolution or the clock.

use std::mem;

use tracing::{debug, info, trace};

use super::*;
use crate::effects::EffectKind;
use crate::tile::TileKind;
use crate::types::{DamageSource, Direction, KillCause, Pos};

/// One entry of the landing table. `applies` sees the resolved tile kind and
/// whether the player actually moved onto it.
struct Rule {
    name: &'static str,
    applies: fn(TileKind, bool) -> bool,
    apply: fn(&mut Session, TileKind, Pos),
}

/// Evaluated in order; the first match wins. The tile groups are disjoint, so
/// at most one rule can match a given tile.
const RULES: &[Rule] = &[
    Rule { name: "exit", applies: |tile, _| tile == TileKind::Exit, apply: Session::take_exit },
    Rule {
        name: "entrance",
        applies: |tile, moved| moved && tile == TileKind::Entrance,
        apply: Session::take_entrance,
    },
    Rule {
        name: "switch",
        applies: |tile, moved| moved && matches!(tile, TileKind::Switch | TileKind::SwitchLit),
        apply: Session::flip_switch,
    },
    Rule {
        name: "treasure",
        applies: |tile, _| matches!(tile, TileKind::Treasure | TileKind::TreasureChest),
        apply: Session::collect_treasure,
    },
    Rule {
        name: "hp potion",
        applies: |tile, _| tile == TileKind::HpPotion,
        apply: Session::drink_hp_potion,
    },
    Rule {
        name: "key",
        applies: |tile, _| matches!(tile, TileKind::Key | TileKind::ExitKey | TileKind::BossKey),
        apply: Session::collect_key,
    },
    Rule {
        name: "equipment",
        applies: |tile, _| {
            matches!(tile, TileKind::Sword | TileKind::FrostWand | TileKind::Shield | TileKind::Magnet)
        },
        apply: Session::collect_effect,
    },
    Rule { name: "swap", applies: |tile, _| tile.swapped().is_some(), apply: Session::swap_tile },
    Rule {
        name: "fake exit",
        applies: |tile, _| tile == TileKind::FakeExit,
        apply: Session::take_fake_exit,
    },
    Rule {
        name: "speed potion",
        applies: |tile, _| matches!(tile, TileKind::RedPotion | TileKind::YellowPotion),
        apply: Session::collect_effect,
    },
    Rule { name: "teleport", applies: |tile, _| tile.is_teleport(), apply: Session::take_teleport },
    Rule {
        name: "contact damage",
        applies: |tile, _| tile.damages_on_contact(),
        apply: Session::step_on_hazard,
    },
    Rule { name: "goal", applies: |tile, _| tile == TileKind::Goal, apply: Session::collect_goal },
    Rule {
        name: "door",
        applies: |tile, _| matches!(tile, TileKind::Door | TileKind::BossDoor),
        apply: Session::open_door,
    },
];

impl Session {
    /// Returns `None` when no run is playing and the command was ignored.
    pub fn move_player(&mut self, direction: Direction) -> Option<MoveOutcome> {
        if self.state != SessionState::Playing {
            debug!(state = ?self.state, ?direction, "move ignored");
            return None;
        }
        let (dx, dy) = direction.delta();
        let outcome = self.levels.current().move_request(&mut self.player, dx, dy);
        self.resolve_landing();
        self.check_collision();
        Some(outcome)
    }

    fn resolve_landing(&mut self) {
        let pos = self.player.pos();
        let tile = self.levels.current().get_tile(pos);
        let moved = self.player.moved();
        if let Some(rule) = RULES.iter().find(|rule| (rule.applies)(tile, moved)) {
            trace!(rule = rule.name, ?tile, ?pos, "landing rule");
            (rule.apply)(self, tile, pos);
        }
    }

    /// Enemies and traps on the player's cell: the sword clears them, the
    /// shield absorbs the hit, otherwise the player takes one damage.
    pub(super) fn check_collision(&mut self) {
        let pos = self.player.pos();
        let tile = self.levels.current().get_tile(pos);
        if !tile.is_collision() {
            return;
        }

        if self.effects.is_active(EffectKind::Sword) {
            if tile.is_enemy() {
                self.player.kills += 1;
                self.log.push(LogEvent::EnemyKilled { tile, pos, cause: KillCause::Sword });
            } else {
                self.log.push(LogEvent::TrapDisarmed { pos });
            }
            self.clear_tile(pos);
        } else if self.effects.is_active(EffectKind::Shield) {
            self.log.push(LogEvent::AttackBlocked { tile });
        } else {
            self.damage_player(1, DamageSource::Collision(tile));
            self.clear_tile(pos);
        }
    }

    fn clear_tile(&mut self, pos: Pos) {
        self.levels.current_mut().set_tile(pos, TileKind::Empty);
    }

    fn collect(&mut self, tile: TileKind, pos: Pos) {
        self.clear_tile(pos);
        self.log.push(LogEvent::ItemCollected { tile, pos });
    }

    fn damage_player(&mut self, amount: i32, source: DamageSource) {
        self.player.take_damage(amount);
        self.log.push(LogEvent::PlayerDamaged { amount, source });
    }

    fn revert_move(&mut self, tile: TileKind) {
        self.player.revert();
        self.log.push(LogEvent::MoveReverted { tile, to: self.player.pos() });
    }

    fn change_floor(&mut self, change: impl FnOnce(&mut LevelGraph, &mut Player) -> bool) -> bool {
        let from = self.levels.current_index();
        let changed = change(&mut self.levels, &mut self.player);
        if changed {
            let to = self.levels.current_index();
            info!(from, to, name = self.levels.current().name(), "floor changed");
            self.log.push(LogEvent::FloorChanged { from, to });
        }
        changed
    }

    fn activate_effect(&mut self, kind: EffectKind) {
        self.effects.activate(kind, self.config.effect_duration);
        match kind {
            EffectKind::Sword => self.player.sword = true,
            EffectKind::Shield => self.player.shield = true,
            _ => {}
        }
        self.log.push(LogEvent::EffectActivated { kind });
    }

    fn take_exit(&mut self, tile: TileKind, _pos: Pos) {
        let floor = self.levels.current_index();
        if self.levels.current().exit_locked() && self.player.exit_keys > 0 {
            self.player.exit_keys -= 1;
            self.levels.current_mut().unlock_exit();
            self.log.push(LogEvent::ExitUnlocked { floor });
        }
        if self.levels.current().exit_locked() {
            self.revert_move(tile);
            return;
        }
        if !self.change_floor(|levels, player| levels.advance(1, player)) {
            debug!(floor, "no floor above, staying on the exit");
        }
    }

    fn take_entrance(&mut self, _tile: TileKind, _pos: Pos) {
        self.change_floor(|levels, player| levels.advance(-1, player));
    }

    fn flip_switch(&mut self, tile: TileKind, pos: Pos) {
        let floor = self.levels.current_mut();
        let on = floor.toggle_switch();
        let flipped = if tile == TileKind::Switch { TileKind::SwitchLit } else { TileKind::Switch };
        floor.set_tile(pos, flipped);
        self.log.push(LogEvent::SwitchToggled { on });
    }

    fn collect_treasure(&mut self, tile: TileKind, pos: Pos) {
        self.player.treasure += if tile == TileKind::TreasureChest { 10 } else { 1 };
        self.collect(tile, pos);
    }

    fn drink_hp_potion(&mut self, tile: TileKind, pos: Pos) {
        self.player.hp += 1;
        self.collect(tile, pos);
    }

    fn collect_key(&mut self, tile: TileKind, pos: Pos) {
        match tile {
            TileKind::Key => self.player.keys += 1,
            TileKind::ExitKey => self.player.exit_keys += 1,
            _ => self.player.boss_key = true,
        }
        self.collect(tile, pos);
    }

    fn collect_effect(&mut self, tile: TileKind, pos: Pos) {
        let kind = match tile {
            TileKind::Sword => EffectKind::Sword,
            TileKind::FrostWand => EffectKind::Frost,
            TileKind::Shield => EffectKind::Shield,
            TileKind::Magnet => EffectKind::Magnet,
            TileKind::RedPotion => EffectKind::Slow,
            _ => EffectKind::Fast,
        };
        self.collect(tile, pos);
        self.activate_effect(kind);
    }

    fn swap_tile(&mut self, tile: TileKind, pos: Pos) {
        let Some(to) = tile.swapped() else {
            return;
        };
        self.levels.current_mut().set_tile(pos, to);
        self.log.push(LogEvent::TileSwapped { from: tile, to, pos });
    }

    fn take_fake_exit(&mut self, tile: TileKind, pos: Pos) {
        if self.levels.current().exit_locked() && self.player.exit_keys > 0 {
            self.clear_tile(pos);
        } else {
            self.revert_move(tile);
        }
    }

    fn take_teleport(&mut self, tile: TileKind, _pos: Pos) {
        if let Some(target) = self.levels.teleport_target(tile) {
            self.change_floor(|levels, player| levels.jump_to(target, player));
        }
    }

    fn step_on_hazard(&mut self, tile: TileKind, pos: Pos) {
        if tile == TileKind::Lava && self.effects.is_active(EffectKind::Frost) {
            self.clear_tile(pos);
            self.log.push(LogEvent::LavaFrozen { pos });
        } else {
            self.damage_player(1, DamageSource::Contact(tile));
        }
    }

    fn collect_goal(&mut self, tile: TileKind, pos: Pos) {
        self.player.treasure += 30;
        self.player.trophies += 1;
        self.collect(tile, pos);
        let total = self.levels.total_trophies();
        self.log.push(LogEvent::TrophyCollected { trophies: self.player.trophies, total });
        if self.player.trophies >= total && self.state == SessionState::Playing {
            self.set_state(SessionState::Finished);
        }
    }

    fn open_door(&mut self, tile: TileKind, pos: Pos) {
        let unlocked = if tile == TileKind::BossDoor {
            mem::take(&mut self.player.boss_key)
        } else if self.player.keys > 0 {
            self.player.keys -= 1;
            true
        } else {
            false
        };
        if unlocked {
            self.clear_tile(pos);
            self.log.push(LogEvent::DoorOpened { tile, pos });
        } else {
            self.revert_move(tile);
        }
    }
}
