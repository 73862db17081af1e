//! Error types.

use thiserror::Error;

/// Failure to load or validate a [`crate::config::BattleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Returned by a pool `acquire` when every slot is in use. Not fatal: the
/// spawn is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity pool exhausted ({capacity} slots in use)")]
pub struct PoolExhausted {
    pub capacity: usize,
}
