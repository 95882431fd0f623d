//! Post-session summary table.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use gitresolve_core::{ConflictState, SessionReport};

/// One row per file that carried a conflict, or `None` when there were none.
pub fn render(report: &SessionReport) -> Option<Table> {
    if report.files.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Conflict", "Outcome"]);

    for file in &report.files {
        let outcome = match file.state {
            ConflictState::Resolved => Cell::new("✓ resolved").fg(Color::Green),
            ConflictState::Unresolved => Cell::new("✗ unresolved").fg(Color::Red),
            ConflictState::None => Cell::new("clean"),
        };
        table.add_row(vec![
            Cell::new(file.path.display()),
            Cell::new(file.category.describe()),
            outcome,
        ]);
    }
    Some(table)
}
