//! Configuration loader/writer plus strongly typed settings structures.
//!
//! The game reads a single `config.toml` from the data directory. An
//! embedded default is extracted on first run; keys missing from the user's
//! file fall back to the serde defaults below.

use crate::core::UiConfig;
use crate::widgets::RowAlign;
use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TERMINALIUM_DIR";

/// Top-level configuration object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub game: GameSettings,
    #[serde(skip)] // Set at load time, used by save()
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_output_delay_ms")]
    pub output_delay_ms: u64,
    #[serde(default = "default_true")]
    pub animations: bool,
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    #[serde(default = "default_menu_color")]
    pub menu_color: String,
    #[serde(default = "default_heading_align")]
    pub heading_align: String, // l/left, c/center or r/right
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sound_volume")]
    pub volume: f32, // Music volume (0.0 to 1.0)
    #[serde(default = "default_tick_volume")]
    pub tick_volume: f32, // Keystroke tick volume (0.0 to 1.0)
    #[serde(default)]
    pub cooldown_ms: u64, // Minimum gap between plays of the same sample
    #[serde(default = "default_tick_samples")]
    pub tick_samples: Vec<String>,
    #[serde(default = "default_tracks")]
    pub tracks: BTreeMap<String, String>, // Track name -> file in the sounds directory
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub cheats_enabled: bool,
    #[serde(default)]
    pub launch_count: u32,
}

fn default_true() -> bool {
    true
}

fn default_output_delay_ms() -> u64 {
    20
}

fn default_poll_timeout_ms() -> u64 {
    10
}

fn default_menu_color() -> String {
    "cyan".to_string()
}

fn default_sound_volume() -> f32 {
    0.5
}

fn default_tick_volume() -> f32 {
    0.1
}

fn default_tick_samples() -> Vec<String> {
    vec!["print.wav".to_string(), "print2.wav".to_string()]
}

fn default_tracks() -> BTreeMap<String, String> {
    [
        ("background", "BGmusic.wav"),
        ("battle", "Battle Music.wav"),
        ("shop", "Shop Music.wav"),
        ("forest", "Forest Music.wav"),
        ("void", "The Void.wav"),
    ]
    .into_iter()
    .map(|(name, file)| (name.to_string(), file.to_string()))
    .collect()
}

fn default_heading_align() -> String {
    "center".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            output_delay_ms: default_output_delay_ms(),
            animations: true,
            poll_timeout_ms: default_poll_timeout_ms(),
            menu_color: default_menu_color(),
            heading_align: default_heading_align(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_sound_volume(),
            tick_volume: default_tick_volume(),
            cooldown_ms: 0,
            tick_samples: default_tick_samples(),
            tracks: default_tracks(),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            cheats_enabled: false,
            launch_count: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // Parse from embedded default config.toml
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::error!("Embedded default config is invalid: {}", e);
            Self {
                ui: UiSettings::default(),
                sound: SoundConfig::default(),
                game: GameSettings::default(),
                path: None,
            }
        })
    }
}

impl Config {
    /// Load `config.toml` from the data directory, extracting the default
    /// file first if it is missing.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::extract_defaults(&path)?;
        Self::load_from_path(&path)
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let mut config = Self::parse(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        config.path = Some(path.to_path_buf());
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Write the config back to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::config_path()?,
        };
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents).context(format!("Failed to write config file: {:?}", path))?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// The read-only view handed to the widget toolkit.
    pub fn ui_config(&self) -> UiConfig {
        UiConfig {
            output_delay: Duration::from_millis(self.ui.output_delay_ms),
            cheats_enabled: self.game.cheats_enabled,
            animations: self.ui.animations,
            menu_color: parse_color(&self.ui.menu_color),
        }
    }

    /// Alignment of the heading row of game screen tables.
    pub fn heading_align(&self) -> RowAlign {
        RowAlign::from_name(&self.ui.heading_align)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.poll_timeout_ms.max(1))
    }

    /// Get the base directory (~/.terminalium/)
    /// Can be overridden with TERMINALIUM_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".terminalium"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    pub fn sounds_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("sounds"))
    }

    fn extract_defaults(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create data directory: {:?}", parent))?;
        }
        fs::write(path, DEFAULT_CONFIG)
            .context(format!("Failed to write default config: {:?}", path))?;
        tracing::info!("Extracted default config to {:?}", path);
        Ok(())
    }
}

/// Parse a color name or hex code, falling back to cyan.
pub fn parse_color(value: &str) -> Color {
    Color::from_str(value.trim()).unwrap_or_else(|_| {
        tracing::warn!("Unknown color '{}', using cyan", value);
        Color::Cyan
    })
}
