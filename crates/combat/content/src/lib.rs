//! Data-driven combat content and loaders.
//!
//! This crate houses the static encounter data and provides loaders for
//! RON/TOML files:
//! - Boss definitions (data-driven via RON)
//! - Player ability sets per encounter (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! The built-in realms are embedded in the binary, so a client works without
//! any data directory. Content is consumed through [`ContentCatalog`], which
//! implements the engine's catalog oracle, and never appears in session
//! state beyond the boss being fought.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ContentCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityLoader, AbilitySets, BossLoader, ConfigLoader, LoadResult};
