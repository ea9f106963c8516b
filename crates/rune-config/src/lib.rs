//! Rune navigation configuration system
//!
//! This crate provides centralized configuration management for the navigation
//! shell, loading settings from `rune.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "rune.toml";

/// Errors produced while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`RuneConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RuneConfig {
    /// Navigation manager settings
    pub navigation: NavigationConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Visual transition requested when a page is swapped into the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Swap without animation.
    None,
    /// Fade the new page in.
    #[default]
    FadeIn,
    /// Fade in while sliding up a short distance.
    FadeInWithSlide,
    /// Slide in from the bottom edge.
    SlideBottom,
    /// Slide in from the right edge.
    SlideRight,
    /// Slide in from the left edge.
    SlideLeft,
}

impl TransitionKind {
    /// Parse the snake_case name used in `rune.toml`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "fade_in" => Some(Self::FadeIn),
            "fade_in_with_slide" => Some(Self::FadeInWithSlide),
            "slide_bottom" => Some(Self::SlideBottom),
            "slide_right" => Some(Self::SlideRight),
            "slide_left" => Some(Self::SlideLeft),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FadeIn => "fade_in",
            Self::FadeInWithSlide => "fade_in_with_slide",
            Self::SlideBottom => "slide_bottom",
            Self::SlideRight => "slide_right",
            Self::SlideLeft => "slide_left",
        }
    }
}

/// Navigation manager configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Transition played when a page is displayed
    pub transition: TransitionKind,
    /// Transition duration in milliseconds
    pub transition_duration_ms: u32,
    /// Instantiate every cacheable page as soon as it is registered
    pub precache: bool,
    /// Cache policy applied to items that don't set one explicitly
    pub cache_by_default: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter string handed to the logger (e.g. "info", "rune_nav=debug")
    pub filter: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            transition: TransitionKind::FadeIn,
            transition_duration_ms: 200,
            precache: false,
            cache_by_default: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `path`, or return the defaults if it is missing
    /// or malformed. A malformed file is logged, a missing one is not.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(error) => {
                warn!(%error, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(CONFIG_FILE)
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_NAV_TRANSITION") {
            match TransitionKind::from_name(&val) {
                Some(kind) => self.navigation.transition = kind,
                None => warn!(value = %val, "ignoring unknown RUNE_NAV_TRANSITION"),
            }
        }
        if let Ok(val) = std::env::var("RUNE_NAV_TRANSITION_MS") {
            if let Ok(ms) = val.parse::<u32>() {
                self.navigation.transition_duration_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("RUNE_NAV_PRECACHE") {
            self.navigation.precache = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("RUNE_NAV_CACHE_DEFAULT") {
            self.navigation.cache_by_default = parse_flag(&val);
        }

        if let Ok(filter) = std::env::var("RUNE_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
