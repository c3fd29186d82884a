use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::summary::{SummaryRecord, PENDING_STATUS};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn status_color(status: &str) -> TableColor {
    match status {
        "succeeded" => TableColor::Green,
        "failed" => TableColor::Red,
        "errored" => TableColor::Yellow,
        "aborted" => TableColor::DarkYellow,
        "started" => TableColor::Blue,
        PENDING_STATUS => TableColor::Grey,
        _ => TableColor::White,
    }
}

/// Percentage of `status` for a record, coloured like the status; zero shows as "-".
pub fn status_percent_cell(record: &SummaryRecord, status: &str) -> Cell {
    match record.percent(status) {
        0 => Cell::new("-").fg(TableColor::DarkGrey),
        percent => Cell::new(format!("{percent}%")).fg(status_color(status)),
    }
}

pub fn state_cell(record: &SummaryRecord) -> Cell {
    if record.paused {
        Cell::new("paused").fg(TableColor::Blue)
    } else if record.running {
        Cell::new("running").fg(TableColor::Cyan)
    } else {
        Cell::new("idle").fg(TableColor::DarkGrey)
    }
}
