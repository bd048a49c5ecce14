use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one cleanup pass over a subtree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl SweepReport {
    pub fn record(&mut self, path: &Path, outcome: std::io::Result<()>) {
        match outcome {
            Ok(()) => self.removed.push(path.to_path_buf()),
            Err(err) => self.failures.push(FileFailure {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }),
        }
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.removed.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Indexed,
    Empty,
    Missing,
    WriteFailed,
    DryRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub position: usize,
    pub category: String,
    pub status: CategoryStatus,
    pub cleaned: SweepReport,
    pub deduplicated: SweepReport,
    pub tracks: Vec<String>,
    pub index_file: Option<PathBuf>,
    pub write_error: Option<String>,
}

impl CategoryReport {
    pub fn new(position: usize, category: &str, status: CategoryStatus) -> Self {
        Self {
            position,
            category: category.to_string(),
            status,
            cleaned: SweepReport::default(),
            deduplicated: SweepReport::default(),
            tracks: Vec::new(),
            index_file: None,
            write_error: None,
        }
    }

    /// Tracks that count toward the volume total: only those that ended up
    /// (or would end up, in a dry run) in an index file.
    pub fn indexed_tracks(&self) -> usize {
        match self.status {
            CategoryStatus::Indexed | CategoryStatus::DryRun => self.tracks.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    pub root: String,
    pub dry_run: bool,
    pub categories: Vec<CategoryReport>,
    pub total_tracks: usize,
    pub duration_ms: u64,
}

impl VolumeReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileFailure> {
        self.categories
            .iter()
            .flat_map(|c| c.cleaned.failures.iter().chain(c.deduplicated.failures.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_successes_and_failures() {
        let mut report = SweepReport::default();
        report.record(Path::new("/a"), Ok(()));
        report.record(
            Path::new("/b"),
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked")),
        );

        assert_eq!(report.removed_count(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("/b"));
        assert!(report.failures[0].reason.contains("locked"));
        assert!(!report.is_clean());
    }

    #[test]
    fn only_written_categories_count_toward_total() {
        let mut indexed = CategoryReport::new(0, "/A", CategoryStatus::Indexed);
        indexed.tracks = vec!["/A/x.mp3".to_string()];
        let mut failed = CategoryReport::new(1, "/B", CategoryStatus::WriteFailed);
        failed.tracks = vec!["/B/y.mp3".to_string()];

        assert_eq!(indexed.indexed_tracks(), 1);
        assert_eq!(failed.indexed_tracks(), 0);
    }
}
