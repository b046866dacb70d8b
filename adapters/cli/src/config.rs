use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use geocache_core::{GeoPoint, Rules};
use serde::Deserialize;

/// Latitude of the default starting point.
const START_LAT: f64 = 36.997936938057016;
/// Longitude of the default starting point.
const START_LNG: f64 = -122.05703507501151;
/// Tiles drawn on each side of the player.
const VIEWPORT_RADIUS: u32 = 8;

/// Settings read from the optional TOML configuration file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Gameplay tuning.
    pub(crate) rules: Rules,
    /// Latitude the player starts at.
    pub(crate) start_lat: f64,
    /// Longitude the player starts at.
    pub(crate) start_lng: f64,
    /// Tiles visible on each side of the player.
    pub(crate) viewport_radius: u32,
    /// Directory holding persistent memory.
    pub(crate) store_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            start_lat: START_LAT,
            start_lng: START_LNG,
            viewport_radius: VIEWPORT_RADIUS,
            store_dir: None,
        }
    }
}

impl Config {
    /// Loads the file at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub(crate) fn start(&self) -> GeoPoint {
        GeoPoint::new(self.start_lat, self.start_lng)
    }

    /// Directory for persistent memory: the configured one, otherwise the
    /// platform data directory.
    pub(crate) fn resolve_store_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.store_dir {
            return Ok(dir.clone());
        }

        directories::ProjectDirs::from("", "", "geocache")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("no home directory to keep game memory in; pass --store-dir")
    }
}
