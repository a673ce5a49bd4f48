//! End-to-end import + lookup scenarios over an in-memory sheet.

use agendadb::db::{AgendaDb, SessionField};
use agendadb::importer::Importer;
use agendadb::query::{lookup, LookupColumn};
use agendadb::render::render_table;
use agendadb::sheet::SheetSource;

/// In-memory agenda sheet in the fixed 8-column layout, no header rows.
struct MemorySheet {
    rows: Vec<[&'static str; 8]>,
}

impl SheetSource for MemorySheet {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> String {
        self.rows[row][col].to_string()
    }
}

fn test_db() -> AgendaDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("test_agenda.db");
    std::mem::forget(dir);
    AgendaDb::open_at(&path).expect("Failed to open test database")
}

/// The keynote fixture: a top-level session with two speakers, followed by
/// a panel subsession sharing its title and reusing one speaker.
fn keynote_sheet() -> MemorySheet {
    MemorySheet {
        rows: vec![
            [
                "06/16/2018",
                "09:00 AM",
                "10:00 AM",
                "Session",
                "Keynote",
                "Hall A",
                "",
                "Alice; Bob",
            ],
            [
                "06/16/2018",
                "10:00 AM",
                "11:00 AM",
                "Panel",
                "Keynote",
                "Hall B",
                "",
                "Alice",
            ],
        ],
    }
}

#[test]
fn test_import_builds_expected_rows() {
    let db = test_db();
    let summary = Importer::new(&db)
        .run(&keynote_sheet(), 0)
        .expect("import");

    assert_eq!(summary.sessions, 2);
    assert_eq!(summary.speakers, 2);
    assert_eq!(summary.links, 3);

    let alice = db
        .speaker_by_name("Alice")
        .expect("query")
        .expect("Alice exists");
    let bob = db
        .speaker_by_name("Bob")
        .expect("query")
        .expect("Bob exists");
    assert_eq!(alice.speaker_id, 1);
    assert_eq!(bob.speaker_id, 2);

    let parent = db
        .session_by_id(1)
        .expect("query")
        .expect("session 1 exists");
    assert_eq!(parent.parent_session_id, None);
    assert_eq!(parent.session_type, "Session");

    let subsession = db
        .session_by_id(2)
        .expect("query")
        .expect("session 2 exists");
    assert_eq!(subsession.parent_session_id, Some(1));
    assert_eq!(subsession.session_type, "Subsession of Keynote");

    // Alice speaks in both sessions through the same speaker row.
    assert_eq!(db.links_for_speaker(alice.speaker_id).expect("links").len(), 2);
    assert_eq!(db.links_for_speaker(bob.speaker_id).expect("links").len(), 1);
}

#[test]
fn test_title_lookup_returns_parent_then_subsession() {
    let db = test_db();
    Importer::new(&db)
        .run(&keynote_sheet(), 0)
        .expect("import");

    let results = lookup(&db, LookupColumn::Session(SessionField::Title), "Keynote")
        .expect("lookup");

    let ids: Vec<i64> = results.iter().map(|s| s.session_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_speaker_lookup_deduplicates_shared_sessions() {
    let db = test_db();
    Importer::new(&db)
        .run(&keynote_sheet(), 0)
        .expect("import");

    // Alice links to both sessions, and session 1's expansion already
    // covers session 2: each id must appear exactly once.
    let results = lookup(&db, LookupColumn::Speaker, "Alice").expect("lookup");
    let ids: Vec<i64> = results.iter().map(|s| s.session_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_zero_matches_renders_header_and_divider_only() {
    let db = test_db();
    Importer::new(&db)
        .run(&keynote_sheet(), 0)
        .expect("import");

    let results = lookup(
        &db,
        LookupColumn::Session(SessionField::Location),
        "Coral Lounge",
    )
    .expect("lookup");
    assert!(results.is_empty());

    let table = render_table(&results);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Title"));
    assert!(lines[1].chars().all(|c| c == '='));
}

#[test]
fn test_lookup_value_sanitized_like_import() {
    let db = test_db();
    let sheet = MemorySheet {
        rows: vec![[
            "06/16/2018",
            "09:00 AM",
            "10:00 AM",
            "Session",
            "Carl's \"Storage\" Overview",
            "Hall A",
            "",
            "",
        ]],
    };
    Importer::new(&db).run(&sheet, 0).expect("import");

    // The stored title had its quotes stripped on import; a lookup value
    // passed through the same sanitizer must still match.
    let value = agendadb::sanitize::sanitize_html("Carl's \"Storage\" Overview");
    let results =
        lookup(&db, LookupColumn::Session(SessionField::Title), &value).expect("lookup");
    assert_eq!(results.len(), 1);
}
