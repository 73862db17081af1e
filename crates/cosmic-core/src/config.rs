//! Battle session configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub sim: SimConfig,
    pub pools: PoolConfig,
    pub combo: ComboConfig,
    pub ambient: AmbientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed of the engine RNG.
    pub seed: u64,
    /// Upper clamp on `update(dt)`.
    pub max_frame_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0xC05_B17,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub player_meteors: usize,
    pub lasers: usize,
    pub missiles: usize,
    pub debris: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            player_meteors: PLAYER_METEOR_POOL,
            lasers: LASER_POOL,
            missiles: MISSILE_POOL,
            debris: DEBRIS_POOL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    pub threshold: u32,
    /// Seconds a combo survives without a hit.
    pub window_secs: f32,
    pub epic_burst_size: usize,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            threshold: COMBO_THRESHOLD,
            window_secs: COMBO_WINDOW,
            epic_burst_size: EPIC_BURST_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub enabled: bool,
    pub interval_secs: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: AMBIENT_INTERVAL,
        }
    }
}

impl BattleConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    /// Copy of this config with every value `validate` would reject
    /// replaced by its default.
    pub fn sanitized(mut self) -> Self {
        let sim = SimConfig::default();
        let pools = PoolConfig::default();
        let combo = ComboConfig::default();
        let ambient = AmbientConfig::default();

        if !positive(self.sim.max_frame_dt) {
            self.sim.max_frame_dt = sim.max_frame_dt;
        }
        if self.pools.player_meteors == 0 {
            self.pools.player_meteors = pools.player_meteors;
        }
        if self.combo.threshold == 0 {
            self.combo.threshold = combo.threshold;
        }
        if !positive(self.combo.window_secs) {
            self.combo.window_secs = combo.window_secs;
        }
        if !positive(self.ambient.interval_secs) {
            self.ambient.interval_secs = ambient.interval_secs;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.sim.max_frame_dt) {
            return Err(ConfigError::Invalid(format!(
                "sim.max_frame_dt must be positive, got {}",
                self.sim.max_frame_dt
            )));
        }
        if self.pools.player_meteors == 0 {
            return Err(ConfigError::Invalid(
                "pools.player_meteors must be at least 1".into(),
            ));
        }
        if self.combo.threshold == 0 {
            return Err(ConfigError::Invalid("combo.threshold must be at least 1".into()));
        }
        if !positive(self.combo.window_secs) {
            return Err(ConfigError::Invalid(format!(
                "combo.window_secs must be positive, got {}",
                self.combo.window_secs
            )));
        }
        if self.ambient.enabled && !positive(self.ambient.interval_secs) {
            return Err(ConfigError::Invalid(format!(
                "ambient.interval_secs must be positive, got {}",
                self.ambient.interval_secs
            )));
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
