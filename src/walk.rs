use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::classify::Classifier;

/// Depth-first list of file entries under `root`.
///
/// Ignorable directories are pruned before descent, so their contents are
/// never opened. Siblings are visited in file-name order. Symbolic links
/// count as files unless they point at a directory; linked directories are
/// not followed. Entries that cannot be read are logged and skipped.
pub fn walk_files(root: &Path, classifier: &Classifier) -> Vec<PathBuf> {
    let prune = classifier.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && prune.is_ignorable_dir(&entry.file_name().to_string_lossy()))
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                let Some(file_type) = entry.file_type() else {
                    continue;
                };
                if file_type.is_file() {
                    files.push(entry.into_path());
                } else if file_type.is_symlink() {
                    if entry.path().is_dir() {
                        tracing::debug!(link = %entry.path().display(), "Skipping linked directory");
                    } else {
                        files.push(entry.into_path());
                    }
                }
            }
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "Failed to access entry");
            }
        }
    }
    files
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
