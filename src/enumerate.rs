use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::classify::Classifier;
use crate::walk::{file_name, walk_files};

/// Collects the playable tracks below `category_dir` as volume-rooted,
/// forward-slash paths (`/Music/album/song.mp3`), in walk order.
pub fn enumerate_tracks(category_dir: &Path, volume_root: &Path, classifier: &Classifier) -> Vec<String> {
    enumerate_tracks_excluding(category_dir, volume_root, classifier, &HashSet::new())
}

/// Same as [`enumerate_tracks`], skipping files in `excluded`. Used by dry
/// runs, where planned removals are still present on disk.
pub fn enumerate_tracks_excluding(
    category_dir: &Path,
    volume_root: &Path,
    classifier: &Classifier,
    excluded: &HashSet<PathBuf>,
) -> Vec<String> {
    walk_files(category_dir, classifier)
        .into_iter()
        .filter(|path| classifier.is_track(&file_name(path)) && !excluded.contains(path))
        .filter_map(|path| {
            let track = normalize_track_path(&path, volume_root);
            if track.is_none() {
                tracing::warn!(file = %path.display(), "Track lies outside the volume root");
            }
            track
        })
        .collect()
}

/// `path` relative to `volume_root`, joined with `/` and rooted with a
/// single leading `/`.
pub fn normalize_track_path(path: &Path, volume_root: &Path) -> Option<String> {
    let relative = path.strip_prefix(volume_root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                out.push('/');
                out.push_str(&part.to_string_lossy().replace('\\', "/"));
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    if out.is_empty() { None } else { Some(out) }
}
