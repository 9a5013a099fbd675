//! # tb - Task Dashboard CLI
//!
//! A command-line task/project dashboard built around a dual status system:
//! a compact four-bucket "custom" status (urgent, priority-2, priority-3,
//! done) kept in sync with a traditional lifecycle status (todo, in-progress,
//! done) plus a 1-4 priority level.
//!
//! ## Key behaviours
//!
//! - **Harmonised statuses**: every create or update recomputes both status
//!   axes from whichever one the caller supplied, so they never diverge.
//! - **Done deletes**: completing a task (in either system) removes the
//!   record instead of archiving it.
//! - **Mode-aware queries**: listing, filtering, and dashboard counts work in
//!   either status system without pre-normalising the data.
//!
//! ## Quick start
//!
//! ```bash
//! # Add a task
//! tb add "Fix login redirect" --priority-level high --due tomorrow
//!
//! # List in either status system
//! tb list
//! tb list --mode traditional --status in-progress
//!
//! # Complete (deletes the record)
//! tb complete 3
//!
//! # Dashboard summary
//! tb counts --mode traditional
//! ```
//!
//! Data is stored locally in `~/.taskboard/tasks.json`.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod convert;
pub mod db;
pub mod error;
pub mod policy;
pub mod project;
pub mod query;
pub mod status;
pub mod task;

use cli::Cli;
use cmd::*;
use db::Database;
use error::Result;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let db_path = cli.db.clone().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskboard");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create taskboard directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("tasks.json")
    });

    let user = cli
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "local".to_string());

    if let Err(e) = run(cli, &db_path, &user) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, db_path: &std::path::Path, user: &str) -> Result<()> {
    let mut db = Database::load(db_path)?;

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add {
            title,
            desc,
            status,
            traditional_status,
            priority_level,
            priority,
            due,
            project,
            assignees,
            tags,
        } => cmd_add(
            &mut db,
            db_path,
            user,
            title,
            desc,
            status,
            traditional_status,
            priority_level,
            priority,
            due,
            project,
            assignees,
            tags,
        ),

        Commands::List {
            mode,
            status,
            priority,
            project,
            assignee,
            tag,
            due,
            search,
            sort,
            direction,
            limit,
        } => cmd_list(
            &db, mode, status, priority, project, assignee, tag, due, search, sort, direction,
            limit,
        ),

        Commands::View { id, traditional } => cmd_view(&db, id, traditional),

        Commands::Update {
            id,
            title,
            desc,
            status,
            traditional_status,
            priority_level,
            priority,
            due,
            clear_due,
            project,
            clear_project,
            assignees,
            add_tags,
            rm_tags,
        } => cmd_update(
            &mut db,
            db_path,
            id,
            title,
            desc,
            status,
            traditional_status,
            priority_level,
            priority,
            due,
            clear_due,
            project,
            clear_project,
            assignees,
            add_tags,
            rm_tags,
        ),

        Commands::Complete { id } => cmd_complete(&mut db, db_path, id),

        Commands::Delete { id } => cmd_delete(&mut db, db_path, id),

        Commands::Counts { mode } => {
            cmd_counts(&db, mode);
            Ok(())
        }

        Commands::Project { action } => cmd_project(&mut db, db_path, user, action),
    }
}
