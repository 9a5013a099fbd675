use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed task dashboard CLI with dual status systems.
/// Storage defaults to ~/.taskboard/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tb", version, about = "Task dashboard CLI")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// User recorded as the author of mutations. Defaults to $USER.
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
