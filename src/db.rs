//! SQLite-backed storage for the agenda schema.
//!
//! The database is a plain file (default `agenda.db`) created from scratch
//! by `import_agenda` and read by `lookup_agenda`. Three tables: `speakers`,
//! `sessions`, and the `sessions_speakers` link table. Ids are SQLite
//! rowids, so insertion order determines id order — the query engine's
//! subsession watermark relies on that.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Default database filename, shared by both binaries.
pub const DEFAULT_DB_FILE: &str = "agenda.db";

/// Type label marking a top-level session, both in the spreadsheet and in
/// `sessions.session_type`.
pub const TOP_LEVEL_SESSION_TYPE: &str = "Session";

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A row from the `sessions` table.
#[derive(Debug, Clone)]
pub struct DbSession {
    pub session_id: i64,
    pub parent_session_id: Option<i64>,
    pub location: String,
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub session_type: String,
    pub title: String,
    pub description: String,
}

impl DbSession {
    /// Whether this row is a top-level session, i.e. expandable into
    /// subsessions.
    pub fn is_top_level(&self) -> bool {
        self.session_type == TOP_LEVEL_SESSION_TYPE
    }
}

/// A row from the `speakers` table.
#[derive(Debug, Clone)]
pub struct DbSpeaker {
    pub speaker_id: i64,
    pub speaker_name: String,
}

/// A row from the `sessions_speakers` link table.
#[derive(Debug, Clone)]
pub struct DbSessionSpeaker {
    pub session_id: i64,
    pub speaker_id: i64,
}

/// Session data assembled by the importer, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub parent_session_id: Option<i64>,
    pub location: String,
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub session_type: String,
    pub title: String,
    pub description: String,
}

/// Session columns a lookup may match against. Keeping this set closed
/// means user-supplied text is never interpolated into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Date,
    TimeStart,
    TimeEnd,
    Title,
    Location,
    Description,
}

impl SessionField {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::TimeStart => "time_start",
            Self::TimeEnd => "time_end",
            Self::Title => "title",
            Self::Location => "location",
            Self::Description => "description",
        }
    }
}

const SESSION_COLS: &str = "session_id, parent_session_id, location, date, \
     time_start, time_end, session_type, title, description";

/// SQLite connection wrapper for the agenda tables.
pub struct AgendaDb {
    conn: Connection,
}

impl AgendaDb {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open_at(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    // =========================================================================
    // Inserts
    // =========================================================================

    /// Insert a speaker and return its assigned id. `speaker_name` is
    /// UNIQUE; callers deduplicate before inserting.
    pub fn insert_speaker(&self, name: &str) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO speakers (speaker_name) VALUES (?1)",
            params![name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a session row and return its assigned id.
    pub fn insert_session(&self, session: &NewSession) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO sessions (parent_session_id, location, date, time_start,
                                   time_end, session_type, title, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.parent_session_id,
                session.location,
                session.date,
                session.time_start,
                session.time_end,
                session.session_type,
                session.title,
                session.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Bind a session to a speaker. The (session, speaker) pairing is
    /// UNIQUE.
    pub fn insert_link(&self, session_id: i64, speaker_id: i64) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO sessions_speakers (session_id, speaker_id) VALUES (?1, ?2)",
            params![session_id, speaker_id],
        )?;
        Ok(())
    }

    // =========================================================================
    // Selects
    // =========================================================================

    /// Sessions whose `field` column equals `value` exactly, in ascending
    /// id order.
    pub fn sessions_matching(
        &self,
        field: SessionField,
        value: &str,
    ) -> Result<Vec<DbSession>, DbError> {
        let sql = format!(
            "SELECT {SESSION_COLS} FROM sessions WHERE {} = ?1 ORDER BY session_id",
            field.column_name()
        );
        self.query_sessions(&sql, params![value])
    }

    /// Subsessions of `parent_id`, in ascending id order.
    pub fn subsessions_of(&self, parent_id: i64) -> Result<Vec<DbSession>, DbError> {
        let sql = format!(
            "SELECT {SESSION_COLS} FROM sessions \
             WHERE parent_session_id = ?1 ORDER BY session_id"
        );
        self.query_sessions(&sql, params![parent_id])
    }

    /// Fetch a single session by id.
    pub fn session_by_id(&self, session_id: i64) -> Result<Option<DbSession>, DbError> {
        let sql = format!("SELECT {SESSION_COLS} FROM sessions WHERE session_id = ?1");
        let session = self
            .conn
            .query_row(&sql, params![session_id], Self::map_session)
            .optional()?;
        Ok(session)
    }

    /// Fetch a speaker by exact name.
    pub fn speaker_by_name(&self, name: &str) -> Result<Option<DbSpeaker>, DbError> {
        let speaker = self
            .conn
            .query_row(
                "SELECT speaker_id, speaker_name FROM speakers WHERE speaker_name = ?1",
                params![name],
                |row| {
                    Ok(DbSpeaker {
                        speaker_id: row.get(0)?,
                        speaker_name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(speaker)
    }

    /// Link rows for a speaker, in ascending session id order.
    pub fn links_for_speaker(&self, speaker_id: i64) -> Result<Vec<DbSessionSpeaker>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, speaker_id FROM sessions_speakers \
             WHERE speaker_id = ?1 ORDER BY session_id",
        )?;
        let rows = stmt.query_map(params![speaker_id], |row| {
            Ok(DbSessionSpeaker {
                session_id: row.get(0)?,
                speaker_id: row.get(1)?,
            })
        })?;

        let mut links = Vec::new();
        for row in rows {
            links.push(row?);
        }
        Ok(links)
    }

    fn query_sessions<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<DbSession>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::map_session)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    fn map_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbSession> {
        Ok(DbSession {
            session_id: row.get(0)?,
            parent_session_id: row.get(1)?,
            location: row.get(2)?,
            date: row.get(3)?,
            time_start: row.get(4)?,
            time_end: row.get(5)?,
            session_type: row.get(6)?,
            title: row.get(7)?,
            description: row.get(8)?,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
