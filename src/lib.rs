//! Event agenda spreadsheet importer and lookup tool.
//!
//! `import_agenda` streams the rows of an agenda workbook into a small
//! SQLite schema (speakers, sessions, session-speaker links), classifying
//! each row as a top-level session or a subsession of the most recently
//! seen top-level row. `lookup_agenda` answers exact-match queries against
//! the result, expanding matched top-level sessions into their full
//! subsession sets.

pub mod db;
pub mod importer;
pub mod query;
pub mod render;
pub mod sanitize;
pub mod sheet;
