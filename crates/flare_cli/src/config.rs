//! Timeline file handling

use anyhow::{Context, Result};
use flare_animation::{AnimationError, AnimationPreset, Track};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Problems with a timeline file's contents
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("timeline has no tracks")]
    NoTracks,

    #[error("track '{0}' is declared more than once")]
    DuplicateTrack(String),

    #[error("fps must be greater than zero")]
    ZeroFps,

    #[error("start_ms must be finite, got {0}")]
    InvalidStart(f64),

    #[error(transparent)]
    Animation(#[from] AnimationError),
}

/// Top-level timeline file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimelineFile {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default, rename = "track")]
    pub tracks: Vec<Track>,
}

/// Real-time playback settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Frames per second used by `flare play`
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Timestamp playback starts from
    #[serde(default)]
    pub start_ms: f64,
}

fn default_fps() -> u32 {
    60
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            start_ms: 0.0,
        }
    }
}

impl TimelineFile {
    /// Load a timeline file, or the explosion preset when no path is given
    pub fn load_or_preset(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no timeline file given, using explosion preset");
                Ok(Self::preset())
            }
        }
    }

    /// Load and validate a timeline file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            tracks = file.tracks.len(),
            "loaded timeline file"
        );
        Ok(file)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TimelineFile = toml::from_str(content)?;
        file.validate()?;
        Ok(file)
    }

    /// The built-in explosion sequence
    pub fn preset() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            tracks: AnimationPreset::explosion(),
        }
    }

    /// Reject files that would fail or behave ambiguously at playback time
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.tracks.is_empty() {
            return Err(ConfigError::NoTracks);
        }
        if self.playback.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if !self.playback.start_ms.is_finite() {
            return Err(ConfigError::InvalidStart(self.playback.start_ms));
        }

        let mut seen = FxHashSet::default();
        for track in &self.tracks {
            if !seen.insert(track.name.as_str()) {
                return Err(ConfigError::DuplicateTrack(track.name.clone()));
            }
            track.compile()?;
        }
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize timeline")
    }
}
