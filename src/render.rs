//! Fixed-width table rendering for lookup results.

use crate::db::DbSession;

const TITLE_WIDTH: usize = 40;
const LOCATION_WIDTH: usize = 20;
const DESCRIPTION_WIDTH: usize = 45;
const TYPE_WIDTH: usize = 35;

/// Characters reserved at the end of a column for the `...` overflow
/// marker.
const ELLIPSIS_RESERVE: usize = 5;

/// Render the result table: header line, `=` divider sized to the summed
/// column widths, one line per session. Zero rows render as header and
/// divider alone.
pub fn render_table(rows: &[DbSession]) -> String {
    let divider = "=".repeat(TITLE_WIDTH + LOCATION_WIDTH + DESCRIPTION_WIDTH + TYPE_WIDTH);

    let mut out = String::new();
    out.push_str(&format_line("Title", "Location", "Description", "Type"));
    out.push('\n');
    out.push_str(&divider);
    out.push('\n');

    for row in rows {
        out.push_str(&format_line(
            &shorten(&row.title, TITLE_WIDTH),
            &shorten(&row.location, LOCATION_WIDTH),
            &shorten(&row.description, DESCRIPTION_WIDTH),
            &shorten(&row.session_type, TYPE_WIDTH),
        ));
        out.push('\n');
    }
    out
}

fn format_line(title: &str, location: &str, description: &str, session_type: &str) -> String {
    format!(
        "{:<tw$} {:<lw$} {:<dw$} {:<yw$}",
        title,
        location,
        description,
        session_type,
        tw = TITLE_WIDTH,
        lw = LOCATION_WIDTH,
        dw = DESCRIPTION_WIDTH,
        yw = TYPE_WIDTH,
    )
}

/// Truncate `val` to `width - ELLIPSIS_RESERVE` characters, trimming any
/// trailing whitespace before appending `...`. Counts characters, not
/// bytes, so multibyte text cannot split mid-character.
fn shorten(val: &str, width: usize) -> String {
    let limit = width - ELLIPSIS_RESERVE;
    if val.chars().count() > limit {
        let cut: String = val.chars().take(limit).collect();
        format!("{}...", cut.trim_end())
    } else {
        val.to_string()
    }
}
