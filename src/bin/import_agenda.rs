//! Import an event agenda spreadsheet into the agenda database.
//!
//! Deletes any pre-existing database file, recreates the schema, and
//! streams the spreadsheet's data rows into it.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use agendadb::db::{AgendaDb, DEFAULT_DB_FILE};
use agendadb::importer::Importer;
use agendadb::sheet::{AgendaSheet, DEFAULT_SKIP_ROWS};

#[derive(Parser)]
#[command(
    name = "import_agenda",
    about = "Import an event agenda spreadsheet into a local database"
)]
struct Cli {
    /// Path to the agenda spreadsheet (.xls/.xlsx)
    spreadsheet: PathBuf,

    /// Database file to (re)create
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    database: PathBuf,

    /// Number of header rows to skip before the first data row
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    skip_rows: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.database.exists() {
        fs::remove_file(&cli.database).with_context(|| {
            format!(
                "Failed to remove existing database {}",
                cli.database.display()
            )
        })?;
    }

    let sheet = AgendaSheet::open(&cli.spreadsheet).with_context(|| {
        format!("Failed to open spreadsheet {}", cli.spreadsheet.display())
    })?;
    let db = AgendaDb::open_at(&cli.database).with_context(|| {
        format!("Failed to create database {}", cli.database.display())
    })?;

    Importer::new(&db)
        .run(&sheet, cli.skip_rows)
        .context("Import failed")?;
    Ok(())
}
