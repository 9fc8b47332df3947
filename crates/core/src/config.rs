use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the viewport core.
///
/// All fields have defaults; a `backscroll.toml` only needs the keys it wants
/// to override:
///
/// ```toml
/// page_size = 64
/// track_height = 200
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Messages per subscription page
    pub page_size: u32,
    /// Extra context messages on paged requests, bridging into the loaded buffer
    pub overlap: u32,
    /// Remaining-message count below which an edge triggers a paged prefetch
    pub edge_threshold: usize,
    /// Distance from the bottom (px) under which the viewport counts as at-bottom
    pub bottom_threshold_px: i64,
    /// Suppression window after a programmatic scroll (ms)
    pub cooldown_ms: i64,
    /// Gap between messages (ms) that ends a timestamp run
    pub run_gap_ms: i64,
    /// Delay before a join/leave notice fades out (ms)
    pub fade_delay_ms: i64,
    /// Pixel height of the timeline density track (bucket count)
    pub track_height: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 32,
            overlap: 48,
            edge_threshold: 10,
            bottom_threshold_px: 16,
            cooldown_ms: 100,
            run_gap_ms: 60_000,
            fade_delay_ms: 1_000,
            track_height: 120,
        }
    }
}

impl ViewConfig {
    /// Parse a config from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: ViewConfig =
            toml::from_str(toml_str).map_err(|e| Error::Config(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&toml_str)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded viewport config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be positive".to_string()));
        }
        if self.track_height == 0 {
            return Err(Error::Config("track_height must be positive".to_string()));
        }
        Ok(())
    }
}
