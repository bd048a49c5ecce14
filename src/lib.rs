//! # playlist-prep
//!
//! Prepares an SD card for a fixed-firmware audio player: every category
//! folder is stripped of non-audio clutter and duplicate copies, then its
//! tracks are listed in a cache file at the card root so the player can
//! load a playlist without scanning the card itself.
//!
//! ## Architecture
//!
//! - **classify**: Name-only predicates (audio, ignorable folder, protected cache file, `_N` copies)
//! - **walk**: Depth-first file walk with ignorable folders pruned before descent
//! - **clean**: Removal of non-audio and resource-fork files
//! - **dedup**: Removal of `<name>_<N>.<ext>` copies next to `<name>.<ext>`
//! - **enumerate**: Track listing as volume-rooted `/` paths
//! - **indexer**: Per-category pipeline and the whole-volume run
//! - **cache**: Cache file naming, atomic writes, reading, clearing and checking
//! - **report**: Per-file outcomes and run summaries
//! - **config**: Settings and where they are loaded from

pub mod cache;
pub mod classify;
pub mod clean;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod enumerate;
pub mod indexer;
pub mod report;
pub mod walk;
