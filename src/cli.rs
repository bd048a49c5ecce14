use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "playlist-prep", version)]
#[command(about = "Clean SD card category folders and write playlist cache files for the player")]
#[command(
    after_help = "`playlist-prep <ROOT>` runs `index`. A root literally named `index`, `clear` or \
`check` is read as a subcommand: pass `./check` or use `playlist-prep index check`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON settings file (categories, audio extensions, ignored folders)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log every traversal step
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Clean each category, remove duplicate copies and write its cache file
    Index {
        /// Mount point of the SD card
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Report what would be removed and indexed without touching the card
        #[arg(long)]
        dry_run: bool,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Delete the cache files so the player rescans on next mode switch
    Clear {
        #[arg(value_name = "ROOT")]
        root: PathBuf,
    },
    /// Verify that every track listed in the cache files still exists
    Check {
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
