//! Read-only lookups over the imported agenda.
//!
//! A matched top-level session is expanded into its full subsession set,
//! emitted immediately after the parent. A watermark over subsession ids
//! suppresses re-emission when a later match or speaker link lands inside
//! an already-expanded block; ids ascend with insertion order, so a
//! parent's subsessions always carry higher ids than the parent itself.

use std::str::FromStr;

use thiserror::Error;

use crate::db::{AgendaDb, DbError, DbSession, SessionField};

/// Column a lookup invocation matches against: one of the session fields,
/// or a speaker name resolved through the link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupColumn {
    Session(SessionField),
    Speaker,
}

/// A column name outside the recognized lookup set. Reported before any
/// query executes.
#[derive(Debug, Error)]
#[error(
    "'{0}' is not a valid lookup column (expected one of: date, time_start, \
     time_end, title, location, description, speaker)"
)]
pub struct UnknownColumn(String);

impl FromStr for LookupColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Session(SessionField::Date)),
            "time_start" => Ok(Self::Session(SessionField::TimeStart)),
            "time_end" => Ok(Self::Session(SessionField::TimeEnd)),
            "title" => Ok(Self::Session(SessionField::Title)),
            "location" => Ok(Self::Session(SessionField::Location)),
            "description" => Ok(Self::Session(SessionField::Description)),
            "speaker" => Ok(Self::Speaker),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// Run one lookup and return the deduplicated, order-preserving result
/// set. A value matching nothing yields an empty vec, not an error.
pub fn lookup(db: &AgendaDb, column: LookupColumn, value: &str) -> Result<Vec<DbSession>, DbError> {
    match column {
        LookupColumn::Session(field) => by_session_field(db, field, value),
        LookupColumn::Speaker => by_speaker(db, value),
    }
}

fn by_session_field(
    db: &AgendaDb,
    field: SessionField,
    value: &str,
) -> Result<Vec<DbSession>, DbError> {
    let mut results = Vec::new();
    let mut watermark = 0;
    for row in db.sessions_matching(field, value)? {
        push_with_subsessions(db, row, &mut watermark, &mut results)?;
    }
    Ok(results)
}

fn by_speaker(db: &AgendaDb, name: &str) -> Result<Vec<DbSession>, DbError> {
    let Some(speaker) = db.speaker_by_name(name)? else {
        return Ok(Vec::new());
    };

    let mut results = Vec::new();
    // One watermark spans the whole link set: a subsession pulled in by
    // one linked session must not reappear when a later link lands in the
    // same parent's block.
    let mut watermark = 0;
    for link in db.links_for_speaker(speaker.speaker_id)? {
        if let Some(row) = db.session_by_id(link.session_id)? {
            push_with_subsessions(db, row, &mut watermark, &mut results)?;
        }
    }
    Ok(results)
}

/// Append `row` unless an earlier expansion already emitted it, then
/// expand a top-level row into its subsessions, raising the watermark to
/// the highest subsession id seen.
fn push_with_subsessions(
    db: &AgendaDb,
    row: DbSession,
    watermark: &mut i64,
    results: &mut Vec<DbSession>,
) -> Result<(), DbError> {
    let session_id = row.session_id;
    let top_level = row.is_top_level();

    if session_id > *watermark {
        results.push(row);
    }

    if top_level {
        for subsession in db.subsessions_of(session_id)? {
            *watermark = (*watermark).max(subsession.session_id);
            results.push(subsession);
        }
    }
    Ok(())
}
