use time::Date;

use super::layout::{DocumentLayout, PAGE_HEIGHT_MM, Rgb8, TextStyle};
use super::table::{Column, PageBand, TableStyle, draw_table};
use crate::api::HistorySession;
use crate::widgets::format::{fixed, numeric_date, session_timestamp};

pub const HISTORY_REPORT_FILE_NAME: &str = "ssts_training_report.pdf";

const LEFT: f32 = 14.0;

const COLUMNS: [Column; 7] = [
    Column::new("Date", 40.0),
    Column::new("Score", 18.0),
    Column::new("Cadence", 20.0),
    Column::new("Stride (m)", 22.0),
    Column::new("GCT (ms)", 20.0),
    Column::new("Duration (s)", 24.0),
    Column::new("Notes", 38.0),
];

const STRIPED: TableStyle = TableStyle {
    font_size: 10.0,
    padding: 1.8,
    head_fill: Rgb8(41, 128, 185),
    head_text: Rgb8::WHITE,
    body_text: Rgb8(80, 80, 80),
    grid: None,
    stripe: Some(Rgb8(245, 245, 245)),
};

pub fn history_cells(session: &HistorySession) -> Vec<String> {
    let notes = session
        .coach_notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .unwrap_or("-");
    vec![
        session_timestamp(&session.created_at),
        fixed(session.technique_score, 1),
        fixed(session.avg_cadence, 0),
        fixed(session.avg_stride_length, 2),
        fixed(session.avg_gct, 0),
        fixed(session.duration_seconds, 1),
        notes.to_string(),
    ]
}

/// Lay out the training history table in the order the sessions are given.
pub fn layout_history(sessions: &[HistorySession], today: Date) -> DocumentLayout {
    let mut doc = DocumentLayout::new("SSTS Training Report");
    doc.text("SSTS Training Report", LEFT, 22.0, TextStyle::new(20.0));
    doc.text(
        format!("Generated: {}", numeric_date(today)),
        LEFT,
        30.0,
        TextStyle::new(11.0),
    );
    let rows: Vec<Vec<String>> = sessions.iter().map(history_cells).collect();
    let band = PageBand {
        top: 15.0,
        bottom: PAGE_HEIGHT_MM - 15.0,
    };
    draw_table(&mut doc, LEFT, 40.0, &COLUMNS, &rows, &STRIPED, band);
    doc
}
