//! Timed buffs and debuffs keyed by kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Sword,
    Shield,
    Slow,
    Fast,
    Magnet,
    Frost,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectTimerRegistry {
    remaining: BTreeMap<EffectKind, u32>,
}

impl EffectTimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remaining count to `duration`, replacing any count already running.
    pub fn activate(&mut self, kind: EffectKind, duration: u32) {
        if duration == 0 {
            self.remaining.remove(&kind);
            return;
        }
        self.remaining.insert(kind, duration);
    }

    /// Decrements every active entry and returns the kinds that reached zero.
    pub fn advance(&mut self) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for (kind, remaining) in self.remaining.iter_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                expired.push(*kind);
            }
        }
        for kind in &expired {
            self.remaining.remove(kind);
        }
        expired
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.remaining.contains_key(&kind)
    }

    pub fn remaining(&self, kind: EffectKind) -> Option<u32> {
        self.remaining.get(&kind).copied()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, u32)> + '_ {
        self.remaining.iter().map(|(kind, remaining)| (*kind, *remaining))
    }
}
