use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

pub const CONFIG_ENV: &str = "PLAYLIST_PREP_CONFIG";

/// Runtime configuration shared by every pipeline stage.
///
/// The position of an entry in `categories` decides the name of its cache
/// file, so reordering the list changes which file the player loads for a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub categories: Vec<String>,
    pub audio_extensions: Vec<String>,
    pub ignored_dirs: Vec<String>,
    pub cache_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // nursery rhymes, classical poems, stories, music
            categories: vec![
                "/儿歌".to_string(),
                "/古诗".to_string(),
                "/故事".to_string(),
                "/音乐".to_string(),
            ],
            audio_extensions: ["mp3", "aac", "flac", "ogg", "wav"]
                .into_iter()
                .map(String::from)
                .collect(),
            ignored_dirs: [
                "System Volume Information",
                "$RECYCLE.BIN",
                ".Trashes",
                ".fseventsd",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            cache_prefix: ".playlist_cache_".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no categories configured")]
    NoCategories,
    #[error("no audio extensions configured")]
    NoAudioExtensions,
    #[error("cache prefix must be a non-empty dotfile prefix, got {0:?}")]
    InvalidCachePrefix(String),
    #[error("category {position} ({path:?}) resolves to the volume root")]
    CategoryIsRoot { position: usize, path: String },
    #[error("category {position} ({path:?}) must not contain `..`")]
    CategoryEscapesRoot { position: usize, path: String },
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(raw).context("Failed to parse settings")?;
        settings.normalized().validate()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn normalized(mut self) -> Self {
        for ext in self.audio_extensions.iter_mut() {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
        self.audio_extensions.retain(|e| !e.is_empty());
        self
    }

    pub fn validate(self) -> Result<Self> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories.into());
        }
        if self.audio_extensions.is_empty() {
            return Err(ConfigError::NoAudioExtensions.into());
        }
        if self.cache_prefix.len() < 2 || !self.cache_prefix.starts_with('.') {
            return Err(ConfigError::InvalidCachePrefix(self.cache_prefix.clone()).into());
        }
        for (position, path) in self.categories.iter().enumerate() {
            if path.split(['/', '\\']).any(|part| part == "..") {
                return Err(ConfigError::CategoryEscapesRoot {
                    position,
                    path: path.clone(),
                }
                .into());
            }
            if category_relative_path(path).as_os_str().is_empty() {
                return Err(ConfigError::CategoryIsRoot {
                    position,
                    path: path.clone(),
                }
                .into());
            }
        }
        Ok(self)
    }

    /// Absolute location of a category below `root`.
    pub fn category_dir(&self, root: &Path, category: &str) -> PathBuf {
        root.join(category_relative_path(category))
    }
}

/// Categories are written root-relative with either separator style
/// (`/Music/Kids`, `Music\Kids`); both resolve under the volume root.
pub fn category_relative_path(category: &str) -> PathBuf {
    category
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    if let Some(p) = cli.config.as_deref() {
        return Settings::load(p);
    }

    if let Ok(p) = env::var(CONFIG_ENV) {
        return Settings::load(Path::new(&p));
    }

    if let Some(p) = default_config_path()
        && p.exists()
    {
        return Settings::load(&p);
    }

    Ok(Settings::default())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("playlist-prep").join("config.json"))
}
