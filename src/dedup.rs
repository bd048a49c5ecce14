use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::classify::{Classifier, split_duplicate_suffix};
use crate::clean::remove_file;
use crate::report::SweepReport;
use crate::walk::{file_name, walk_files};

/// Removes `<base>_<digits><ext>` copies whose `<base><ext>` sits in the
/// same directory.
///
/// Each directory is judged against a snapshot of its file names taken
/// before anything in it is removed, so the outcome does not depend on the
/// order entries are visited in.
pub fn remove_duplicates(root: &Path, classifier: &Classifier, dry_run: bool) -> SweepReport {
    remove_duplicates_excluding(root, classifier, &HashSet::new(), dry_run)
}

/// Same as [`remove_duplicates`], treating files in `excluded` as already
/// gone. A dry run passes the cleaner's planned removals here so both
/// stages report what a real run would do.
pub fn remove_duplicates_excluding(
    root: &Path,
    classifier: &Classifier,
    excluded: &HashSet<PathBuf>,
    dry_run: bool,
) -> SweepReport {
    remove_duplicates_with(root, classifier, excluded, dry_run, |path| {
        remove_file(path, dry_run)
    })
}

fn remove_duplicates_with<F>(
    root: &Path,
    classifier: &Classifier,
    excluded: &HashSet<PathBuf>,
    dry_run: bool,
    mut remove: F,
) -> SweepReport
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let mut report = SweepReport::default();

    for (dir, names) in files_by_directory(root, classifier, excluded) {
        let snapshot: HashSet<&str> = names.iter().map(String::as_str).collect();

        for name in names.iter() {
            if name.starts_with('.') || classifier.is_protected_file(name) {
                continue;
            }
            let Some(dup) = split_duplicate_suffix(name) else {
                continue;
            };
            let original = dup.original_name();
            if !snapshot.contains(original.as_str()) {
                continue;
            }

            let path = dir.join(name);
            let outcome = remove(&path);
            match &outcome {
                Ok(()) => tracing::info!(
                    file = %path.display(),
                    original = %original,
                    dry_run,
                    "Removed duplicate copy"
                ),
                Err(err) => tracing::warn!(
                    file = %path.display(),
                    error = %err,
                    "Failed to remove duplicate copy"
                ),
            }
            report.record(&path, outcome);
        }
    }

    if report.removed_count() > 0 {
        tracing::info!(
            root = %root.display(),
            removed = report.removed_count(),
            "Removed duplicate copies"
        );
    }
    report
}

fn files_by_directory(
    root: &Path,
    classifier: &Classifier,
    excluded: &HashSet<PathBuf>,
) -> BTreeMap<PathBuf, Vec<String>> {
    let mut dirs: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
    for path in walk_files(root, classifier) {
        if excluded.contains(&path) {
            continue;
        }
        let Some(parent) = path.parent() else {
            continue;
        };
        dirs.entry(parent.to_path_buf())
            .or_default()
            .push(file_name(&path));
    }
    dirs
}
