use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cache::{cache_file_path, write_index};
use crate::classify::Classifier;
use crate::clean::clean_tree;
use crate::config::Settings;
use crate::dedup::remove_duplicates_excluding;
use crate::enumerate::enumerate_tracks_excluding;
use crate::report::{CategoryReport, CategoryStatus, VolumeReport};

#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("volume root does not exist: {0}")]
    NotFound(PathBuf),
    #[error("volume root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub fn ensure_volume_root(root: &Path) -> Result<(), VolumeError> {
    if !root.exists() {
        return Err(VolumeError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(VolumeError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Cleans, de-duplicates and indexes one category.
///
/// A missing category yields an empty report and writes nothing. A failed
/// index write is recorded on the report instead of being returned.
pub fn index_category(
    root: &Path,
    position: usize,
    category: &str,
    settings: &Settings,
    classifier: &Classifier,
    dry_run: bool,
) -> CategoryReport {
    let dir = settings.category_dir(root, category);
    if !dir.is_dir() {
        tracing::warn!(category, path = %dir.display(), "Category directory does not exist");
        return CategoryReport::new(position, category, CategoryStatus::Missing);
    }

    tracing::info!(category, path = %dir.display(), "Scanning category");
    let mut report = CategoryReport::new(position, category, CategoryStatus::Empty);
    report.cleaned = clean_tree(&dir, classifier, dry_run);

    // Only a dry run leaves planned removals on disk; later stages must not
    // see them.
    let mut excluded: HashSet<PathBuf> = HashSet::new();
    if dry_run {
        excluded.extend(report.cleaned.removed.iter().cloned());
    }
    report.deduplicated = remove_duplicates_excluding(&dir, classifier, &excluded, dry_run);
    if dry_run {
        excluded.extend(report.deduplicated.removed.iter().cloned());
    }
    report.tracks = enumerate_tracks_excluding(&dir, root, classifier, &excluded);

    if report.tracks.is_empty() {
        tracing::info!(category, "Category is empty, skipping index");
        return report;
    }

    let index_file = cache_file_path(root, settings, position);
    if dry_run {
        report.status = CategoryStatus::DryRun;
    } else {
        match write_index(&index_file, &report.tracks) {
            Ok(()) => {
                tracing::info!(
                    file = %index_file.display(),
                    tracks = report.tracks.len(),
                    "Wrote index"
                );
                report.status = CategoryStatus::Indexed;
            }
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(file = %index_file.display(), error = %reason, "Failed to write index");
                report.status = CategoryStatus::WriteFailed;
                report.write_error = Some(reason);
            }
        }
    }
    report.index_file = Some(index_file);
    report
}

/// Runs [`index_category`] for every configured category, in order.
pub fn index_volume(root: &Path, settings: &Settings, dry_run: bool) -> VolumeReport {
    let start = Instant::now();
    let classifier = Classifier::new(settings);

    let categories: Vec<CategoryReport> = settings
        .categories
        .iter()
        .enumerate()
        .map(|(position, category)| {
            index_category(root, position, category, settings, &classifier, dry_run)
        })
        .collect();
    let total_tracks: usize = categories.iter().map(CategoryReport::indexed_tracks).sum();

    VolumeReport {
        root: root.to_string_lossy().to_string(),
        dry_run,
        categories,
        total_tracks,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}
