//! Playlist cache files at the volume root, one per category position.
//!
//! The player loads `<prefix><position>.txt` on mode switch and falls back to
//! its own (slow) scan when the file is missing or empty.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Settings;

pub fn cache_file_name(prefix: &str, position: usize) -> String {
    format!("{prefix}{position}.txt")
}

pub fn cache_file_path(root: &Path, settings: &Settings, position: usize) -> PathBuf {
    root.join(cache_file_name(&settings.cache_prefix, position))
}

/// Writes one track per line, replacing any previous file in one rename.
pub fn write_index(path: &Path, tracks: &[String]) -> Result<()> {
    let mut content = String::with_capacity(tracks.iter().map(|t| t.len() + 1).sum());
    for track in tracks {
        content.push_str(track);
        content.push('\n');
    }

    let mut tmp_os = path.as_os_str().to_os_string();
    tmp_os.push(".tmp");
    let tmp = PathBuf::from(tmp_os);
    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write index file: {}", tmp.display()))?;

    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err)
            .with_context(|| format!("Failed to replace index file: {}", path.display()));
    }
    Ok(())
}

/// Reads an index the way the player does: lines are trimmed and blank
/// lines dropped.
pub fn read_index(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read index file: {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Removes every cache file for the configured positions. Returns the
/// files that were removed; absent files are skipped.
pub fn clear_indexes(root: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for position in 0..settings.categories.len() {
        let path = cache_file_path(root, settings, position);
        if !path.exists() {
            continue;
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove index file: {}", path.display()))?;
        tracing::info!(file = %path.display(), "Removed index file");
        removed.push(path);
    }
    Ok(removed)
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexCheck {
    pub position: usize,
    pub category: String,
    pub index_file: PathBuf,
    pub present: bool,
    pub entries: usize,
    pub missing_tracks: Vec<String>,
}

/// Verifies each existing index against the volume: every listed track
/// must still exist as a file.
pub fn check_indexes(root: &Path, settings: &Settings) -> Result<Vec<IndexCheck>> {
    let mut checks = Vec::with_capacity(settings.categories.len());
    for (position, category) in settings.categories.iter().enumerate() {
        let index_file = cache_file_path(root, settings, position);
        if !index_file.is_file() {
            checks.push(IndexCheck {
                position,
                category: category.clone(),
                index_file,
                present: false,
                entries: 0,
                missing_tracks: Vec::new(),
            });
            continue;
        }

        let tracks = read_index(&index_file)?;
        let missing_tracks: Vec<String> = tracks
            .iter()
            .filter(|track| !root.join(track.trim_start_matches('/')).is_file())
            .cloned()
            .collect();
        if !missing_tracks.is_empty() {
            tracing::warn!(
                file = %index_file.display(),
                missing = missing_tracks.len(),
                "Index lists tracks that no longer exist"
            );
        }

        checks.push(IndexCheck {
            position,
            category: category.clone(),
            index_file,
            present: true,
            entries: tracks.len(),
            missing_tracks,
        });
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings(categories: &[&str]) -> Settings {
        Settings {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..Settings::default()
        }
    }

    #[test]
    fn cache_file_name_uses_prefix_and_position() {
        assert_eq!(cache_file_name(".playlist_cache_", 3), ".playlist_cache_3.txt");
    }

    #[test]
    fn write_index_overwrites_and_terminates_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".playlist_cache_0.txt");
        fs::write(&path, "/old/entry.mp3\n/old/other.mp3\n").unwrap();

        write_index(&path, &["/A/a.mp3".to_string(), "/A/b.mp3".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/A/a.mp3\n/A/b.mp3\n");
        assert!(!dir.path().join(".playlist_cache_0.txt.tmp").exists());
    }

    #[test]
    fn read_index_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx.txt");
        fs::write(&path, "/A/a.mp3\r\n\n  /A/b.mp3  \n").unwrap();

        assert_eq!(read_index(&path).unwrap(), vec!["/A/a.mp3", "/A/b.mp3"]);
    }

    #[test]
    fn clear_removes_only_configured_positions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".playlist_cache_0.txt"), "x\n").unwrap();
        fs::write(root.join(".playlist_cache_5.txt"), "x\n").unwrap();

        let removed = clear_indexes(root, &settings(&["/A", "/B"])).unwrap();

        assert_eq!(removed, vec![root.join(".playlist_cache_0.txt")]);
        assert!(root.join(".playlist_cache_5.txt").exists());
    }

    #[test]
    fn check_reports_stale_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("A")).unwrap();
        fs::write(root.join("A/a.mp3"), b"x").unwrap();
        fs::write(root.join(".playlist_cache_0.txt"), "/A/a.mp3\n/A/gone.mp3\n").unwrap();

        let checks = check_indexes(root, &settings(&["/A", "/B"])).unwrap();

        assert_eq!(checks.len(), 2);
        assert!(checks[0].present);
        assert_eq!(checks[0].entries, 2);
        assert_eq!(checks[0].missing_tracks, vec!["/A/gone.mp3"]);
        assert!(!checks[1].present);
    }
}
