//! Configuration management for KeyDeck
//!
//! Provides persistent configuration that is loaded from and saved to a
//! platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keydeck/config.toml` |
//! | macOS | `~/Library/Application Support/keydeck/config.toml` |
//! | Windows | `%APPDATA%\keydeck\config.toml` |
//!
//! Enumerated settings are read leniently: an unrecognized value is logged
//! and replaced by its default instead of failing the whole load.
//!
//! ## Example
//!
//! ```no_run
//! use keydeck::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.ui.theme = config.ui.theme.toggle();
//! config.save().expect("Failed to save config");
//! ```

use crate::feedback::SoundProfile;
use crate::keyboard::LayoutId;
use crate::typing::{Difficulty, TimeLimit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const APP_DIR: &str = "keydeck";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A setting value that matches none of the recognized choices
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} \"{value}\"")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Returns the application directory, creating it if needed.
pub fn app_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join(APP_DIR);

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir)
}

/// Returns the path to the config file.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join("config.toml"))
}

/// Returns the path the binary writes its log to.
pub fn log_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join("keydeck.log"))
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub typing: TypingConfig,
    pub keyboard: KeyboardConfig,
    pub ui: UiConfig,
}

/// Speed test settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    #[serde(with = "lenient")]
    pub difficulty: Difficulty,
    #[serde(
        rename = "time_limit_secs",
        serialize_with = "lenient::serialize_number",
        deserialize_with = "lenient::deserialize"
    )]
    pub time_limit: TimeLimit,
}

/// Keyboard tester settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    #[serde(with = "lenient")]
    pub layout: LayoutId,
    #[serde(with = "lenient")]
    pub sound_profile: SoundProfile,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    #[serde(with = "lenient")]
    pub theme: Theme,
    /// Rainbow key colouring
    pub rgb_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            theme: Theme::Dark,
            rgb_mode: false,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(UnknownValue::new("theme", s)),
        }
    }
}

/// Serde adapter for enumerated settings: written as their display form,
/// read through `FromStr` with a logged fallback to `Default`.
mod lenient {
    use log::warn;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    /// Like `serialize`, but numeric display forms are written as integers
    pub fn serialize_number<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value.to_string().parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.collect_str(value),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + Default,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = match toml::Value::deserialize(deserializer)? {
            toml::Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(raw.parse().unwrap_or_else(|err: T::Err| {
            warn!("{err}; using default");
            T::default()
        }))
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but is not valid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Set the theme in the config file at `path`, keeping everything else.
    ///
    /// A missing file is created from the defaults. A file that fails to
    /// parse is left untouched and the parse error is returned.
    pub fn save_theme_to(path: &Path, theme: Theme) -> Result<(), ConfigError> {
        let mut on_disk = match Self::load_from(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e),
        };
        on_disk.ui.theme = theme;
        on_disk.save_to(path)
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path(tag: &str) -> PathBuf {
        env::temp_dir().join(format!("keydeck-test-{}-{}.toml", tag, std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.typing.difficulty, Difficulty::Medium);
        assert_eq!(config.typing.time_limit, TimeLimit::Thirty);
        assert_eq!(config.keyboard.layout, LayoutId::SixtyEight);
        assert_eq!(config.keyboard.sound_profile, SoundProfile::Clicky);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert!(!config.ui.rgb_mode);
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 60 Hz = 16666 microseconds per frame
        assert_eq!(config.refresh_interval().as_micros(), 16666);
    }

    #[test]
    fn config_refresh_interval_zero_hz() {
        let mut config = Config::default();
        config.ui.refresh_rate_hz = 0;
        assert_eq!(config.refresh_interval().as_secs(), 1);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path("roundtrip");

        let mut config = Config::default();
        config.typing.difficulty = Difficulty::Hard;
        config.typing.time_limit = TimeLimit::Sixty;
        config.keyboard.layout = LayoutId::Tkl;
        config.ui.theme = Theme::Light;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_load_invalid_toml_fails() {
        let path = temp_config_path("invalid");
        fs::write(&path, "[typing\ndifficulty = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).expect("Failed to serialize");

        assert!(toml_str.contains("[typing]"));
        assert!(toml_str.contains("[keyboard]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("difficulty = \"medium\""));
        assert!(toml_str.contains("time_limit_secs = 30"));
        assert!(toml_str.contains("layout = \"68\""));
        assert!(toml_str.contains("theme = \"dark\""));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[typing]
difficulty = "easy"
time_limit_secs = 15

[keyboard]
layout = "tkl"
sound_profile = "thocky"

[ui]
refresh_rate_hz = 144
theme = "light"
rgb_mode = true
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.typing.difficulty, Difficulty::Easy);
        assert_eq!(config.typing.time_limit, TimeLimit::Fifteen);
        assert_eq!(config.keyboard.layout, LayoutId::Tkl);
        assert_eq!(config.keyboard.sound_profile, SoundProfile::Thocky);
        assert_eq!(config.ui.refresh_rate_hz, 144);
        assert_eq!(config.ui.theme, Theme::Light);
        assert!(config.ui.rgb_mode);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let toml_str = r#"
[typing]
difficulty = "nightmare"
time_limit_secs = 45

[keyboard]
layout = "99"
sound_profile = "kazoo"

[ui]
theme = "solarized"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.typing.difficulty, Difficulty::Medium);
        assert_eq!(config.typing.time_limit, TimeLimit::Thirty);
        assert_eq!(config.keyboard.layout, LayoutId::SixtyEight);
        assert_eq!(config.keyboard.sound_profile, SoundProfile::Clicky);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn numeric_layout_ids_are_accepted() {
        let config: Config = toml::from_str("[keyboard]\nlayout = 104\n").unwrap();
        assert_eq!(config.keyboard.layout, LayoutId::Full104);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[ui]\nrgb_mode = true\n").unwrap();
        assert!(config.ui.rgb_mode);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.typing, TypingConfig::default());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }

    #[test]
    fn unknown_value_display() {
        let err = UnknownValue::new("layout", "99");
        assert_eq!(err.to_string(), "unrecognized layout \"99\"");
    }

    #[test]
    fn theme_toggle_and_parse() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn save_theme_keeps_other_settings() {
        let path = temp_config_path("theme-keep");
        let mut config = Config::default();
        config.typing.difficulty = Difficulty::Hard;
        config.keyboard.layout = LayoutId::Tkl;
        config.save_to(&path).unwrap();

        Config::save_theme_to(&path, Theme::Light).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.theme, Theme::Light);
        assert_eq!(loaded.typing.difficulty, Difficulty::Hard);
        assert_eq!(loaded.keyboard.layout, LayoutId::Tkl);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_theme_creates_missing_file() {
        let path = temp_config_path("theme-new");
        let _ = fs::remove_file(&path);

        Config::save_theme_to(&path, Theme::Light).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.theme, Theme::Light);
        assert_eq!(loaded.typing.difficulty, Difficulty::Medium);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_theme_leaves_broken_file_alone() {
        let path = temp_config_path("theme-broken");
        fs::write(&path, "this is [not valid toml").unwrap();

        let result = Config::save_theme_to(&path, Theme::Light);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "this is [not valid toml");

        let _ = fs::remove_file(&path);
    }
}
