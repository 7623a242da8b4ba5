use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const CONFIG_ENV: &str = "NEUROCALC_CONFIG";
pub const PORT_ENV: &str = "NEUROCALC_PORT";
pub const DEBUG_ENV: &str = "NEUROCALC_DEBUG";
pub const DEFAULT_CONFIG_FILE: &str = "neurocalc.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".into(),
            baud_rate: 9600,
            read_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub serial: SerialSettings,
    pub window_ms: u64,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            window_ms: 3000,
            scaler_path: "scaler.json".into(),
            model_path: "model.json".into(),
        }
    }
}

impl Settings {
    /// Reads `NEUROCALC_CONFIG` (or `neurocalc.json`), then applies `NEUROCALC_PORT`.
    pub fn load() -> Result<Self> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut settings = Self::from_path(&path)?;

        if let Ok(port) = env::var(PORT_ENV) {
            settings.serial.port = port;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_ms == 0 {
            bail!("window_ms must be greater than zero");
        }
        if self.serial.read_timeout_ms == 0 {
            bail!("serial.read_timeout_ms must be greater than zero");
        }
        if self.serial.baud_rate == 0 {
            bail!("serial.baud_rate must be greater than zero");
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.serial.read_timeout_ms)
    }
}

pub fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        env::temp_dir().join(format!("neurocalc-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::from_path(&temp_path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.window(), Duration::from_millis(3000));
        assert_eq!(settings.serial.baud_rate, 9600);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let path = temp_path();
        fs::write(&path, r#"{"window_ms": 1500, "serial": {"port": "COM3"}}"#).unwrap();
        let settings = Settings::from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.window_ms, 1500);
        assert_eq!(settings.serial.port, "COM3");
        assert_eq!(settings.serial.baud_rate, 9600);
        assert_eq!(settings.model_path, PathBuf::from("model.json"));
    }

    #[test]
    fn unreadable_json_is_an_error() {
        let path = temp_path();
        fs::write(&path, "{ window_ms: ").unwrap();
        let result = Settings::from_path(&path);
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        let settings = Settings {
            window_ms: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
