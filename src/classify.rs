use std::collections::HashSet;

use crate::config::Settings;

/// Resource-fork files macOS leaves next to every file it copies.
pub const RESOURCE_FORK_PREFIX: &str = "._";

/// Name-only predicates; nothing here touches the filesystem.
#[derive(Debug, Clone)]
pub struct Classifier {
    audio_extensions: HashSet<String>,
    ignored_dirs: HashSet<String>,
    cache_prefix: String,
}

impl Classifier {
    pub fn new(settings: &Settings) -> Self {
        Self {
            audio_extensions: settings
                .audio_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            ignored_dirs: settings.ignored_dirs.iter().cloned().collect(),
            cache_prefix: settings.cache_prefix.clone(),
        }
    }

    pub fn is_audio(&self, name: &str) -> bool {
        name.rsplit_once('.')
            .is_some_and(|(_, ext)| self.audio_extensions.contains(&ext.to_lowercase()))
    }

    pub fn is_ignorable_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.ignored_dirs.contains(name)
    }

    pub fn is_protected_file(&self, name: &str) -> bool {
        name.starts_with(&self.cache_prefix)
    }

    /// Clutter the cleaner removes: resource forks, and any non-audio file
    /// that is not a dotfile. Other dotfiles belong to the OS and stay.
    pub fn is_clutter(&self, name: &str) -> bool {
        if self.is_protected_file(name) {
            return false;
        }
        name.starts_with(RESOURCE_FORK_PREFIX) || (!name.starts_with('.') && !self.is_audio(name))
    }

    /// Files the enumerator lists as tracks.
    pub fn is_track(&self, name: &str) -> bool {
        !name.starts_with('.') && self.is_audio(name)
    }
}

/// A file name of the form `<base>_<digits>.<ext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateName<'a> {
    pub base: &'a str,
    pub suffix: &'a str,
    /// Extension including its leading dot.
    pub ext: &'a str,
}

impl DuplicateName<'_> {
    /// Name of the file this one would be a copy of.
    pub fn original_name(&self) -> String {
        format!("{}{}", self.base, self.ext)
    }
}

/// Splits `name` into base, numeric suffix and extension.
///
/// The extension runs from the last `.` and must be word characters only;
/// the base is everything before the last `_` of the stem, so `a_1_2.mp3`
/// splits into `a_1`, `2`, `.mp3`.
pub fn split_duplicate_suffix(name: &str) -> Option<DuplicateName<'_>> {
    let dot = name.rfind('.')?;
    let (stem, ext) = name.split_at(dot);
    let ext_body = &ext[1..];
    if ext_body.is_empty() || !ext_body.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let (base, suffix) = stem.rsplit_once('_')?;
    if base.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(DuplicateName { base, suffix, ext })
}
