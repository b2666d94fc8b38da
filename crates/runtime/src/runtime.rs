//! High-level runtime orchestrator.
//!
//! The runtime holds the shared oracles, spawns one worker per session, and
//! exposes a builder-based API for clients to start battles.

use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    CatalogOracle, ClockOracle, CombatConfig, CombatEngine, PcgRng, RngOracle, SystemClock,
};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::workers::{Oracles, SessionWorker};

/// Pacing and channel sizing shared by every session worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Pause before the boss acts once it is its turn and nothing animates.
    pub boss_turn_delay: Duration,
    /// Animation window after a player action.
    pub player_animation: Duration,
    /// Animation window after a boss action.
    pub boss_animation: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            boss_turn_delay: Duration::from_millis(1_500),
            player_animation: Duration::from_millis(1_000),
            boss_animation: Duration::from_millis(2_000),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `COMBAT_*` environment variables.
    ///
    /// Durations are read in milliseconds. Unparsable values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            boss_turn_delay: env_millis("COMBAT_BOSS_TURN_DELAY_MS")
                .unwrap_or(defaults.boss_turn_delay),
            player_animation: env_millis("COMBAT_PLAYER_ANIMATION_MS")
                .unwrap_or(defaults.player_animation),
            boss_animation: env_millis("COMBAT_BOSS_ANIMATION_MS")
                .unwrap_or(defaults.boss_animation),
            event_buffer_size: env_parse("COMBAT_EVENT_BUFFER")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.event_buffer_size),
            command_buffer_size: env_parse("COMBAT_COMMAND_BUFFER")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.command_buffer_size),
        }
    }

    /// No pauses at all; useful for headless play.
    pub fn instant() -> Self {
        Self {
            boss_turn_delay: Duration::ZERO,
            player_animation: Duration::ZERO,
            boss_animation: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable runtime setting");
            None
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_millis)
}

/// Entry point for starting sessions.
///
/// Cheap to clone; every clone shares the same oracles.
#[derive(Clone)]
pub struct CombatRuntime {
    oracles: Oracles,
    config: RuntimeConfig,
}

impl CombatRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn combat_config(&self) -> &CombatConfig {
        &self.oracles.config
    }

    /// Boss ids offered by the catalog, in catalog order.
    pub fn boss_ids(&self) -> Vec<String> {
        self.oracles.catalog.boss_ids()
    }

    /// Start a session against `boss_id` and spawn its worker.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Session`] if the boss is unknown or its content is
    /// broken; [`RuntimeError::NoPlayerAbilities`] if the player has nothing
    /// to fight with.
    pub fn start_session(&self, boss_id: &str, seed: u64) -> Result<SessionHandle> {
        let session = CombatEngine::start_session(self.oracles.env(), boss_id, seed)?;
        let abilities: Arc<[_]> = self.oracles.catalog.player_abilities(boss_id).into();
        if abilities.is_empty() {
            return Err(RuntimeError::NoPlayerAbilities {
                boss_id: boss_id.to_string(),
            });
        }

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (events, _) = broadcast::channel(self.config.event_buffer_size);

        let worker = SessionWorker::new(
            session,
            self.oracles.clone(),
            abilities.clone(),
            self.config.clone(),
            command_rx,
            command_tx.downgrade(),
            events.clone(),
            CancellationToken::new(),
        );
        tokio::spawn(worker.run());

        tracing::debug!(boss = boss_id, seed, "session spawned");
        Ok(SessionHandle::new(
            Arc::from(boss_id),
            abilities,
            command_tx,
            events,
        ))
    }
}

/// Builder for [`CombatRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    combat_config: CombatConfig,
    catalog: Option<Arc<dyn CatalogOracle>>,
    rng: Option<Arc<dyn RngOracle>>,
    clock: Option<Arc<dyn ClockOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            combat_config: CombatConfig::default(),
            catalog: None,
            rng: None,
            clock: None,
        }
    }

    /// Override runtime pacing
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override combat rules
    pub fn combat_config(mut self, config: CombatConfig) -> Self {
        self.combat_config = config;
        self
    }

    /// Set the required boss catalog
    pub fn catalog(mut self, catalog: Arc<dyn CatalogOracle>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the random source (defaults to [`PcgRng`])
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Set the log clock (defaults to [`SystemClock`])
    pub fn clock(mut self, clock: Arc<dyn ClockOracle>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CombatRuntime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        Ok(CombatRuntime {
            oracles: Oracles {
                catalog,
                rng: self.rng.unwrap_or_else(|| Arc::new(PcgRng)),
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                config: Arc::new(self.combat_config),
            },
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_ui_pacing() {
        let config = RuntimeConfig::default();
        assert_eq!(config.boss_turn_delay, Duration::from_millis(1_500));
        assert_eq!(config.player_animation, Duration::from_millis(1_000));
        assert_eq!(config.boss_animation, Duration::from_millis(2_000));
    }

    #[test]
    fn env_overrides_defaults() {
        // SAFETY: no other test in this crate reads or writes COMBAT_* variables.
        unsafe {
            std::env::set_var("COMBAT_BOSS_TURN_DELAY_MS", "250");
            std::env::set_var("COMBAT_EVENT_BUFFER", "lots");
            std::env::set_var("COMBAT_COMMAND_BUFFER", "0");
        }
        let config = RuntimeConfig::from_env();
        unsafe {
            std::env::remove_var("COMBAT_BOSS_TURN_DELAY_MS");
            std::env::remove_var("COMBAT_EVENT_BUFFER");
            std::env::remove_var("COMBAT_COMMAND_BUFFER");
        }

        assert_eq!(config.boss_turn_delay, Duration::from_millis(250));
        assert_eq!(config.player_animation, Duration::from_millis(1_000));
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.command_buffer_size, 32);
    }
}
