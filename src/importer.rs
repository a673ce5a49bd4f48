//! Single-pass import of agenda rows into the relational schema.
//!
//! Rows arrive in spreadsheet order. A row whose raw type label is
//! `Session` is top-level; every other row is a subsession of the most
//! recently seen top-level row, and its stored type becomes
//! `Subsession of <parent title>`. Speaker names are deduplicated into the
//! `speakers` table as they are first encountered.

use std::collections::HashMap;

use thiserror::Error;

use crate::db::{AgendaDb, DbError, NewSession, TOP_LEVEL_SESSION_TYPE};
use crate::sanitize::{sanitize, sanitize_html};
use crate::sheet::{self, SheetError, SheetSource};

/// Separator between names in the spreadsheet's speaker column.
const SPEAKER_DELIMITER: &str = "; ";

/// Errors that abort an import. No partial-row recovery: the first error
/// ends the run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Row {row}: subsession appears before any top-level session")]
    OrphanSubsession { row: usize },
}

/// Classification of one spreadsheet row.
#[derive(Debug)]
enum SessionKind {
    TopLevel,
    Subsession { parent_id: i64, parent_title: String },
}

/// Counts reported after a completed import.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportSummary {
    pub sessions: usize,
    pub speakers: usize,
    pub links: usize,
}

/// The most recently inserted top-level session; parent of any subsession
/// rows that follow it.
struct CurrentParent {
    id: i64,
    title: String,
}

/// One import pass over a sheet. All accumulator state (speaker dedup map,
/// current parent) lives here for the duration of a single [`run`] call.
///
/// [`run`]: Importer::run
pub struct Importer<'a> {
    db: &'a AgendaDb,
    speaker_ids: HashMap<String, i64>,
    current_parent: Option<CurrentParent>,
}

impl<'a> Importer<'a> {
    pub fn new(db: &'a AgendaDb) -> Self {
        Self {
            db,
            speaker_ids: HashMap::new(),
            current_parent: None,
        }
    }

    /// Stream every data row of `source` into the database. `skip_rows` is
    /// the index of the first data row.
    pub fn run<S: SheetSource>(
        mut self,
        source: &S,
        skip_rows: usize,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary::default();
        for row in skip_rows..source.row_count() {
            self.import_row(source, row, &mut summary)?;
        }

        log::info!(
            "Imported {} sessions, {} speakers, {} speaker links",
            summary.sessions,
            summary.speakers,
            summary.links
        );
        Ok(summary)
    }

    fn import_row<S: SheetSource>(
        &mut self,
        source: &S,
        row: usize,
        summary: &mut ImportSummary,
    ) -> Result<(), ImportError> {
        let raw_type = source.cell(row, sheet::COL_SESSION_TYPE);
        let title = sanitize(&source.cell(row, sheet::COL_TITLE));
        let location = sanitize(&source.cell(row, sheet::COL_LOCATION));
        let description = sanitize_html(&source.cell(row, sheet::COL_DESCRIPTION));

        let kind = self.classify(&raw_type, row)?;
        let (parent_session_id, session_type) = match &kind {
            SessionKind::TopLevel => (None, raw_type.clone()),
            SessionKind::Subsession {
                parent_id,
                parent_title,
            } => (Some(*parent_id), format!("Subsession of {parent_title}")),
        };

        let session_id = self.db.insert_session(&NewSession {
            parent_session_id,
            location,
            date: source.cell(row, sheet::COL_DATE),
            time_start: source.cell(row, sheet::COL_TIME_START),
            time_end: source.cell(row, sheet::COL_TIME_END),
            session_type,
            title: title.clone(),
            description,
        })?;
        summary.sessions += 1;

        if matches!(kind, SessionKind::TopLevel) {
            self.current_parent = Some(CurrentParent {
                id: session_id,
                title,
            });
        }

        let speaker_field = source.cell(row, sheet::COL_SPEAKERS);
        if !speaker_field.is_empty() {
            for name in speaker_field.split(SPEAKER_DELIMITER) {
                let speaker_id = self.speaker_id_for(&sanitize(name), summary)?;
                self.db.insert_link(session_id, speaker_id)?;
                summary.links += 1;
            }
        }

        Ok(())
    }

    /// Classify a row by its raw type label. A subsession with no preceding
    /// top-level row violates the input contract and fails the import.
    fn classify(&self, raw_type: &str, row: usize) -> Result<SessionKind, ImportError> {
        if raw_type == TOP_LEVEL_SESSION_TYPE {
            return Ok(SessionKind::TopLevel);
        }
        let parent = self
            .current_parent
            .as_ref()
            .ok_or(ImportError::OrphanSubsession { row })?;
        Ok(SessionKind::Subsession {
            parent_id: parent.id,
            parent_title: parent.title.clone(),
        })
    }

    /// Resolve a sanitized speaker name to its id, inserting a new speaker
    /// row on first sight.
    fn speaker_id_for(
        &mut self,
        name: &str,
        summary: &mut ImportSummary,
    ) -> Result<i64, ImportError> {
        if let Some(&id) = self.speaker_ids.get(name) {
            return Ok(id);
        }
        let id = self.db.insert_speaker(name)?;
        self.speaker_ids.insert(name.to_string(), id);
        summary.speakers += 1;
        Ok(id)
    }
}
