//! Query the agenda database built by `import_agenda`.
//!
//! Takes a lookup column and one or more value tokens, rejoins the tokens
//! with single spaces, and prints every matching session as a fixed-width
//! table. Matched top-level sessions are expanded into their subsessions.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use agendadb::db::{AgendaDb, DEFAULT_DB_FILE};
use agendadb::query::{lookup, LookupColumn};
use agendadb::render::render_table;
use agendadb::sanitize::sanitize_html;

#[derive(Parser)]
#[command(
    name = "lookup_agenda",
    about = "Look up agenda sessions by column value or speaker"
)]
struct Cli {
    /// Column to match: date, time_start, time_end, title, location,
    /// description, or speaker
    column: String,

    /// Value to look up; multiple tokens are joined with single spaces
    #[arg(required = true, num_args = 1..)]
    value: Vec<String>,

    /// Database file produced by import_agenda
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    database: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Reject bad column names before touching the database.
    let column: LookupColumn = cli.column.parse()?;
    let value = sanitize_html(&cli.value.join(" "));

    let db = AgendaDb::open_at(&cli.database)
        .with_context(|| format!("Failed to open database {}", cli.database.display()))?;
    let results = lookup(&db, column, &value)?;

    println!("{}", render_table(&results));
    Ok(())
}
