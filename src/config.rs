use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Source file for the dashboard (CSV, JSON or Parquet).
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default)]
    pub window: WindowSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WindowSettings {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            window: WindowSettings::default(),
        }
    }
}

fn default_data_path() -> PathBuf { PathBuf::from("rto.csv") }
fn default_width() -> f32 { 1400.0 }
fn default_height() -> f32 { 900.0 }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (rto-dashboard.toml in the working directory)
    /// 3. Environment variables (prefixed with RTO_DASHBOARD__)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(File::with_name("rto-dashboard").required(false))
    }

    /// Load configuration from a specific file source, still applying the
    /// environment overrides.
    pub fn load_from(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(file)
            // e.g., RTO_DASHBOARD__DATA_PATH -> data_path,
            //       RTO_DASHBOARD__WINDOW__WIDTH -> window.width
            .add_source(
                Environment::with_prefix("RTO_DASHBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Settings for this launch: config sources, then the first CLI argument
    /// as the data path. Config errors fall back to defaults.
    pub fn resolve(args: impl IntoIterator<Item = String>) -> Self {
        let mut settings = Self::load().unwrap_or_else(|e| {
            log::warn!("Ignoring invalid configuration ({e}); using defaults");
            Self::default()
        });
        if let Some(path) = args.into_iter().nth(1) {
            settings.data_path = PathBuf::from(path);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serialises tests that read or write `RTO_DASHBOARD__*` variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_when_file_is_absent() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nothing.toml");
        let settings = Settings::load_from(File::from(missing).required(false)).unwrap();
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rto-dashboard.toml");
        std::fs::write(&path, "data_path = \"data/rto.csv\"\n[window]\nwidth = 800.0\n").unwrap();

        let settings = Settings::load_from(File::from(path)).unwrap();
        assert_eq!(settings.data_path, PathBuf::from("data/rto.csv"));
        assert_eq!(settings.window.width, 800.0);
        assert_eq!(settings.window.height, default_height());
    }

    #[test]
    fn environment_overrides_file_values() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rto-dashboard.toml");
        std::fs::write(&path, "data_path = \"from-file.csv\"\n[window]\nwidth = 800.0\n").unwrap();

        std::env::set_var("RTO_DASHBOARD__DATA_PATH", "from-env.csv");
        std::env::set_var("RTO_DASHBOARD__WINDOW__HEIGHT", "600");
        let settings = Settings::load_from(File::from(path));
        std::env::remove_var("RTO_DASHBOARD__DATA_PATH");
        std::env::remove_var("RTO_DASHBOARD__WINDOW__HEIGHT");

        let settings = settings.unwrap();
        assert_eq!(settings.data_path, PathBuf::from("from-env.csv"));
        assert_eq!(settings.window.width, 800.0);
        assert_eq!(settings.window.height, 600.0);
    }

    #[test]
    fn cli_argument_sets_the_data_path() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let args = ["rto-dashboard".to_string(), "elsewhere.csv".to_string()];
        let settings = Settings::resolve(args);
        assert_eq!(settings.data_path, PathBuf::from("elsewhere.csv"));
    }
}
