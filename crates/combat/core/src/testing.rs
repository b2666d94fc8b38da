//! Deterministic oracle doubles for tests.
//!
//! [`QueuedRolls`] hands out pre-programmed die faces so a test can force the
//! exact outcome of every roll, and [`TestCatalog`] is an in-memory catalog
//! built from plain definitions.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::action::CombatAction;
use crate::env::{BossDefinition, CatalogOracle, PcgRng, RngOracle};

/// RNG that returns queued values in order.
///
/// `roll_die` returns the queued value as the die face (clamped into
/// `[1, sides]`), and `range` returns it as the picked value (clamped into
/// `[min, max]`), so a boss ability choice is forced by queueing its index.
/// Once the queue is empty the double falls back to [`PcgRng`].
#[derive(Debug, Default)]
pub struct QueuedRolls {
    queue: Mutex<VecDeque<u32>>,
}

impl QueuedRolls {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: Mutex::new(values.into_iter().collect()),
        }
    }

    pub fn push(&self, value: u32) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(value);
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or_default()
    }

    fn pop(&self) -> Option<u32> {
        self.queue.lock().ok()?.pop_front()
    }
}

impl RngOracle for QueuedRolls {
    fn next_u32(&self, seed: u64) -> u32 {
        self.pop().unwrap_or_else(|| PcgRng.next_u32(seed))
    }

    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        match self.pop() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => PcgRng.roll_die(seed, sides),
        }
    }

    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        match self.pop() {
            Some(value) => value.clamp(min, max.max(min)),
            None => PcgRng.range(seed, min, max),
        }
    }
}

/// In-memory catalog for tests.
#[derive(Clone, Debug, Default)]
pub struct TestCatalog {
    bosses: Vec<BossDefinition>,
    player_abilities: Vec<(String, Vec<CombatAction>)>,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a boss together with the player's abilities for that fight.
    pub fn with_encounter(mut self, boss: BossDefinition, abilities: Vec<CombatAction>) -> Self {
        self.player_abilities.push((boss.id.clone(), abilities));
        self.bosses.push(boss);
        self
    }
}

impl CatalogOracle for TestCatalog {
    fn boss(&self, boss_id: &str) -> Option<&BossDefinition> {
        self.bosses.iter().find(|boss| boss.id == boss_id)
    }

    fn player_abilities(&self, boss_id: &str) -> &[CombatAction] {
        self.player_abilities
            .iter()
            .find(|(id, _)| id == boss_id)
            .map(|(_, abilities)| abilities.as_slice())
            .unwrap_or_default()
    }

    fn boss_ids(&self) -> Vec<String> {
        self.bosses.iter().map(|boss| boss.id.clone()).collect()
    }
}
