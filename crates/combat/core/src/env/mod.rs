//! Traits describing read-only inputs to the engine.
//!
//! Oracles expose the boss catalog, the random number source, and the clock.
//! The [`Env`] aggregate bundles them together with [`CombatConfig`] so the
//! engine can access everything it needs without hard coupling to concrete
//! implementations or to any global state.
mod catalog;
mod clock;
mod rng;

pub use catalog::{BossDefinition, CatalogOracle};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{ClockOracle, FixedClock};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::CombatConfig;

/// Aggregates read-only oracles required by the engine.
pub struct Env<'a, K, R, C>
where
    K: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    C: ClockOracle + ?Sized,
{
    catalog: &'a K,
    rng: &'a R,
    clock: &'a C,
    config: &'a CombatConfig,
}

impl<K, R, C> Clone for Env<'_, K, R, C>
where
    K: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    C: ClockOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, R, C> Copy for Env<'_, K, R, C>
where
    K: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    C: ClockOracle + ?Sized,
{
}

pub type CombatEnv<'a> =
    Env<'a, dyn CatalogOracle + 'a, dyn RngOracle + 'a, dyn ClockOracle + 'a>;

impl<'a, K, R, C> Env<'a, K, R, C>
where
    K: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
    C: ClockOracle + ?Sized,
{
    pub fn new(catalog: &'a K, rng: &'a R, clock: &'a C, config: &'a CombatConfig) -> Self {
        Self {
            catalog,
            rng,
            clock,
            config,
        }
    }

    pub fn catalog(&self) -> &'a K {
        self.catalog
    }

    pub fn rng(&self) -> &'a R {
        self.rng
    }

    pub fn clock(&self) -> &'a C {
        self.clock
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }
}

impl<'a, K, R, C> Env<'a, K, R, C>
where
    K: CatalogOracle + 'a,
    R: RngOracle + 'a,
    C: ClockOracle + 'a,
{
    /// Erases the concrete oracle types.
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        Env {
            catalog: self.catalog as &'a dyn CatalogOracle,
            rng: self.rng as &'a dyn RngOracle,
            clock: self.clock as &'a dyn ClockOracle,
            config: self.config,
        }
    }
}
