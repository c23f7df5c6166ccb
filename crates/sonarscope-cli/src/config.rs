//! Station configuration – reads/writes `~/.sonarscope/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use sonarscope_sweep::SweepConfig;

/// Persisted station configuration stored in `~/.sonarscope/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP port for the radar console.
    #[serde(default = "default_console_port")]
    pub console_port: u16,

    /// Lower bound of the scan arc, in degrees.
    #[serde(default)]
    pub min_angle_deg: u16,

    /// Upper bound of the scan arc, in degrees.
    #[serde(default = "default_max_angle_deg")]
    pub max_angle_deg: u16,

    /// Angular step between samples, in degrees.
    #[serde(default = "default_step_deg")]
    pub step_deg: u16,

    /// Servo settle time before each sample, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Alert servo hold duration, in milliseconds.
    #[serde(default = "default_alert_hold_ms")]
    pub alert_hold_ms: u64,

    /// Readings below this distance fire the alert sequence, in centimeters.
    #[serde(default = "default_near_range_cm")]
    pub near_range_cm: f64,

    /// Maximum usable range of the rangefinder, in centimeters.
    #[serde(default = "default_max_range_cm")]
    pub max_range_cm: f64,
}

fn default_console_port() -> u16 {
    8080
}
fn default_max_angle_deg() -> u16 {
    180
}
fn default_step_deg() -> u16 {
    10
}
fn default_settle_ms() -> u64 {
    300
}
fn default_alert_hold_ms() -> u64 {
    1000
}
fn default_near_range_cm() -> f64 {
    50.0
}
fn default_max_range_cm() -> f64 {
    300.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console_port: default_console_port(),
            min_angle_deg: 0,
            max_angle_deg: default_max_angle_deg(),
            step_deg: default_step_deg(),
            settle_ms: default_settle_ms(),
            alert_hold_ms: default_alert_hold_ms(),
            near_range_cm: default_near_range_cm(),
            max_range_cm: default_max_range_cm(),
        }
    }
}

impl Config {
    /// Build the controller configuration this station config describes.
    pub fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            min_angle_deg: self.min_angle_deg,
            max_angle_deg: self.max_angle_deg,
            step_deg: self.step_deg,
            settle: Duration::from_millis(self.settle_ms),
            alert_hold: Duration::from_millis(self.alert_hold_ms),
            near_range_cm: self.near_range_cm,
            max_range_cm: self.max_range_cm,
        }
    }
}

/// Return the path to `~/.sonarscope/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".sonarscope").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `SONARSCOPE_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `SONARSCOPE_CONSOLE_PORT` | `console_port` |
/// | `SONARSCOPE_STEP_DEG` | `step_deg` |
/// | `SONARSCOPE_MAX_RANGE_CM` | `max_range_cm` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("SONARSCOPE_CONSOLE_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        cfg.console_port = port;
    }
    if let Ok(v) = std::env::var("SONARSCOPE_STEP_DEG")
        && let Ok(step) = v.parse::<u16>()
    {
        cfg.step_deg = step;
    }
    if let Ok(v) = std::env::var("SONARSCOPE_MAX_RANGE_CM")
        && let Ok(range) = v.parse::<f64>()
    {
        cfg.max_range_cm = range;
    }
}

/// Save the config to disk, creating `~/.sonarscope/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}
