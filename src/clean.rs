use std::path::Path;

use crate::classify::Classifier;
use crate::report::SweepReport;
use crate::walk::{file_name, walk_files};

/// Removes non-audio clutter below `root`, one file at a time.
///
/// Directories are only descended into, never removed. A file that cannot
/// be removed is recorded as a failure and the sweep continues. With
/// `dry_run` set, candidates are reported as removed but left in place.
pub fn clean_tree(root: &Path, classifier: &Classifier, dry_run: bool) -> SweepReport {
    clean_tree_with(root, classifier, dry_run, |path| remove_file(path, dry_run))
}

pub(crate) fn clean_tree_with<F>(
    root: &Path,
    classifier: &Classifier,
    dry_run: bool,
    mut remove: F,
) -> SweepReport
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let mut report = SweepReport::default();

    for path in walk_files(root, classifier) {
        let name = file_name(&path);
        if !classifier.is_clutter(&name) {
            continue;
        }

        let outcome = remove(&path);
        match &outcome {
            Ok(()) => tracing::info!(file = %path.display(), dry_run, "Removed clutter"),
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "Failed to remove clutter")
            }
        }
        report.record(&path, outcome);
    }

    if report.removed_count() > 0 {
        tracing::info!(
            root = %root.display(),
            removed = report.removed_count(),
            "Cleaned non-audio files"
        );
    }
    report
}

pub(crate) fn remove_file(path: &Path, dry_run: bool) -> std::io::Result<()> {
    if dry_run {
        return Ok(());
    }
    std::fs::remove_file(path)
}
