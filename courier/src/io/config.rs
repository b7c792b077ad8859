//! Courier configuration stored in `courier.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::map_view::MapSettings;

/// Courier configuration (TOML).
///
/// Missing fields default to the values the mobile app shipped with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CourierConfig {
    /// Base URL of the routes API, without a trailing `/routes`.
    pub api_base_url: String,

    /// Per-request timeout for remote calls, in seconds.
    pub request_timeout_secs: u64,

    pub map: MapSettings,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://10.0.2.2:3000/api".to_string(),
            request_timeout_secs: 15,
            map: MapSettings::default(),
        }
    }
}

impl CourierConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(anyhow!("api_base_url must not be empty"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(anyhow!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        let center = self.map.default_center;
        if !(-180.0..=180.0).contains(&center.lng) || !(-90.0..=90.0).contains(&center.lat) {
            return Err(anyhow!(
                "map.default_center must be [lng, lat] within range (got [{}, {}])",
                center.lng,
                center.lat
            ));
        }
        if !(self.map.default_zoom.is_finite() && self.map.default_zoom >= 0.0) {
            return Err(anyhow!("map.default_zoom must be >= 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `CourierConfig::default()`.
pub fn load_config(path: &Path) -> Result<CourierConfig> {
    if !path.exists() {
        let cfg = CourierConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CourierConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &CourierConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
