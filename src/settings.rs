use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_CENTER, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TILE_URL, DEFAULT_ZOOM,
};
use crate::feed::FeedUrl;
use crate::marker::ColorKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub feed_url: String,
    pub port: u16,
    pub color_by: ColorKey,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub auto_open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: FeedUrl::default().to_string(),
            port: DEFAULT_PORT,
            color_by: ColorKey::Magnitude,
            center_lat: DEFAULT_CENTER[0],
            center_lon: DEFAULT_CENTER[1],
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            auto_open_browser: false,
        }
    }
}

impl Settings {
    /// Read `key = value` lines from `config_path`. Missing file or keys keep
    /// their defaults; unparsable values are logged and ignored.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(config_path).context("Failed to read config file")?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut settings = Settings::default();
        let mut config_map = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim(), value.trim().trim_matches('"'));
            }
        }

        if let Some(feed_url) = config_map.get("feed_url") {
            settings.feed_url = feed_url.to_string();
        }
        if let Some(tile_url) = config_map.get("tile_url") {
            settings.tile_url = tile_url.to_string();
        }
        read_parsed(&config_map, "port", &mut settings.port);
        read_parsed(&config_map, "color_by", &mut settings.color_by);
        read_parsed(&config_map, "center_lat", &mut settings.center_lat);
        read_parsed(&config_map, "center_lon", &mut settings.center_lon);
        read_parsed(&config_map, "zoom", &mut settings.zoom);
        read_parsed(
            &config_map,
            "request_timeout_secs",
            &mut settings.request_timeout_secs,
        );
        read_parsed(&config_map, "auto_open_browser", &mut settings.auto_open_browser);

        settings
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            crate::utils::ensure_directory_exists(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# QuakeMap Configuration File\n");
        content.push_str(&format!("feed_url = \"{}\"\n", self.feed_url));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("color_by = {}\n", self.color_by));
        content.push_str(&format!("center_lat = {}\n", self.center_lat));
        content.push_str(&format!("center_lon = {}\n", self.center_lon));
        content.push_str(&format!("zoom = {}\n", self.zoom));
        content.push_str(&format!("tile_url = \"{}\"\n", self.tile_url));
        content.push_str(&format!(
            "request_timeout_secs = {}\n",
            self.request_timeout_secs
        ));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    /// Feed address; `feed_url` may also hold the `level_period` shorthand.
    pub fn resolved_feed_url(&self) -> String {
        match self.feed_url.parse::<FeedUrl>() {
            Ok(shorthand) => shorthand.to_string(),
            Err(_) => self.feed_url.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_path() -> PathBuf {
        crate::utils::get_config_path()
    }
}

fn read_parsed<T: std::str::FromStr>(map: &HashMap<&str, &str>, key: &str, target: &mut T) {
    if let Some(raw) = map.get(key) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring invalid value '{}' for '{}' in config", raw, key),
        }
    }
}
