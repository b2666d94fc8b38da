//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or a random policy. The boss is
//! never driven by a provider; its turn is taken by the session worker.
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use combat_core::{CombatAction, CombatSession};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::errors::{Result, RuntimeError};

/// Trait for choosing the player's next ability.
///
/// Different implementations can handle:
/// - Player input (from a terminal or UI)
/// - Scripted/replayed choices
/// - Random play for soak tests
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Pick an ability id for the player's turn.
    ///
    /// # Arguments
    /// * `session` - Read-only snapshot taken at the start of the player turn
    /// * `abilities` - Abilities the player may use in this encounter
    async fn choose_action(
        &self,
        session: &CombatSession,
        abilities: &[CombatAction],
    ) -> Result<String>;
}

/// Replays a fixed list of ability ids, then fails with
/// [`RuntimeError::ProviderExhausted`].
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(ability_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(ability_ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|script| script.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn choose_action(
        &self,
        _session: &CombatSession,
        _abilities: &[CombatAction],
    ) -> Result<String> {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .ok_or(RuntimeError::ProviderExhausted)
    }
}

/// Picks uniformly among the offered abilities.
#[derive(Debug)]
pub struct RandomProvider {
    rng: Mutex<StdRng>,
}

impl RandomProvider {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

#[async_trait]
impl ActionProvider for RandomProvider {
    async fn choose_action(
        &self,
        session: &CombatSession,
        abilities: &[CombatAction],
    ) -> Result<String> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        abilities
            .choose(&mut *rng)
            .map(|ability| ability.id.clone())
            .ok_or_else(|| RuntimeError::NoPlayerAbilities {
                boss_id: session.boss_id().to_string(),
            })
    }
}
