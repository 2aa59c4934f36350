use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Runtime tunables for the synthesis pipeline.
///
/// Loaded from a TOML file when one is supplied; every field falls back to
/// its default, so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Output sample rate in Hz. All frames and saved files use this rate.
    pub sample_rate: u32,
    /// Units with fewer meaningful characters than this merge into the
    /// previous unit during segmentation.
    pub min_unit_length: usize,
    /// Worker queue poll timeout in milliseconds. Bounds worst-case shutdown
    /// responsiveness and the playback device idle-close delay.
    pub poll_interval_ms: u64,
    /// Capacity of the bounded playback queue, in frames.
    pub playback_queue_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 32_000,
            min_unit_length: 7,
            poll_interval_ms: 1_000,
            playback_queue_capacity: 64,
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded runtime config from {}", path.display());
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
