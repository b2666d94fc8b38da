//! Content loaders for reading combat data from files.
//!
//! This module provides loaders that convert RON/TOML files into the core
//! types consumed by [`crate::ContentCatalog`] and the engine.

pub mod abilities;
pub mod bosses;
pub mod config;

pub use abilities::{AbilityLoader, AbilitySets};
pub use bosses::{BossCatalogFile, BossLoader};
pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
