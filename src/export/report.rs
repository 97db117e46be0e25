//! Single-session biomechanics report.

use time::Date;

use super::layout::{
    Align, DocumentLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Rgb8, TextStyle, chars_per_line,
    wrap_text,
};
use super::table::{Column, PageBand, TableStyle, draw_table};
use crate::api::UserProfile;
use crate::stats::{StatsSnapshot, strip_markers};
use crate::widgets::ScoreBand;
use crate::widgets::format::{long_date, number};

const MARGIN: f32 = 20.0;
const BRAND_BLUE: Rgb8 = Rgb8(37, 99, 235);
const HEADING: Rgb8 = Rgb8(30, 41, 59);
const MUTED: Rgb8 = Rgb8(100, 116, 139);
const RULE: Rgb8 = Rgb8(200, 200, 200);
const BODY: Rgb8 = Rgb8(51, 65, 85);
const NO_FEEDBACK: &str = "No specific data available yet. Please complete a session.";

const METRIC_COLUMNS: [Column; 4] = [
    Column::new("Metric", 50.0).bold(),
    Column::new("Measured Value", 45.0),
    Column::new("Target Range", 40.0),
    Column::new("Status", 35.0),
];

const METRIC_TABLE: TableStyle = TableStyle {
    font_size: 10.0,
    padding: 4.0,
    head_fill: BRAND_BLUE,
    head_text: Rgb8::WHITE,
    body_text: Rgb8::BLACK,
    grid: Some(RULE),
    stripe: None,
};

/// File name of a report generated at `epoch_ms` for `identity`.
pub fn report_file_name(identity: Option<&UserProfile>, epoch_ms: i128) -> String {
    let name = identity
        .and_then(|profile| profile.full_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
        .unwrap_or_else(|| "Patient".to_string());
    format!("SSTS_Report_{name}_{epoch_ms}.pdf")
}

/// Rows of the biomechanical analysis table.
pub fn metric_rows(snapshot: Option<&StatsSnapshot>) -> Vec<Vec<String>> {
    let value = |read: fn(&StatsSnapshot) -> Option<f64>| {
        snapshot.and_then(read).filter(|value| *value != 0.0)
    };
    let cadence = value(|s| s.cadence);
    let stride = value(|s| s.stride_length).unwrap_or(0.0);
    let gct = value(|s| s.gct);
    let symmetry = snapshot.and_then(|s| s.symmetry);
    let left = symmetry.map(|s| s.left).filter(|v| *v != 0.0).unwrap_or(50.0);
    let right = symmetry.map(|s| s.right).filter(|v| *v != 0.0).unwrap_or(50.0);
    let error = |name: &str| snapshot.map(|s| s.error_percent(name)).unwrap_or(0.0);

    let cadence_status = if cadence.is_some_and(|c| c < 160.0) {
        "Low"
    } else {
        "Optimal"
    };
    let gct_status = if gct.is_some_and(|g| g > 250.0) {
        "High Risk"
    } else {
        "Good"
    };
    let symmetry_status = if (left - 50.0).abs() > 5.0 {
        "Asymmetric"
    } else {
        "Balanced"
    };

    vec![
        row(
            "Cadence",
            format!("{} spm", number(cadence.unwrap_or(0.0))),
            "170 - 190 spm",
            cadence_status,
        ),
        row("Stride Length", format!("{} m", number(stride)), "> 1.2 m", "-"),
        row(
            "Ground Contact Time",
            format!("{} ms", number(gct.unwrap_or(0.0))),
            "< 200 ms",
            gct_status,
        ),
        row(
            "Left/Right Symmetry",
            format!("L: {}% / R: {}%", number(left), number(right)),
            "50% / 50%",
            symmetry_status,
        ),
        row(
            "Swing Mechanics Error",
            format!("{}%", number(error("swing_mechanics"))),
            "< 10%",
            "-",
        ),
        row(
            "Hip Stability Error",
            format!("{}%", number(error("hip_stability"))),
            "< 10%",
            "-",
        ),
    ]
}

fn row(metric: &str, measured: String, target: &str, status: &str) -> Vec<String> {
    vec![
        metric.to_string(),
        measured,
        target.to_string(),
        status.to_string(),
    ]
}

/// Recommendation lines with markers stripped; a placeholder when empty.
pub fn recommendations(snapshot: Option<&StatsSnapshot>) -> Vec<String> {
    let lines: Vec<String> = snapshot
        .map(|snapshot| {
            snapshot
                .feedback
                .iter()
                .map(|message| strip_markers(message))
                .collect()
        })
        .unwrap_or_default();
    if lines.is_empty() {
        vec![NO_FEEDBACK.to_string()]
    } else {
        lines
    }
}

/// Lay out the report for `snapshot` as seen on `today`.
pub fn layout_report(
    snapshot: Option<&StatsSnapshot>,
    identity: Option<&UserProfile>,
    today: Date,
) -> DocumentLayout {
    let mut doc = DocumentLayout::new("Clinical Biomechanics Report");
    let right = PAGE_WIDTH_MM - MARGIN;
    let center = PAGE_WIDTH_MM / 2.0;

    doc.fill_rect(MARGIN, MARGIN, 15.0, 15.0, BRAND_BLUE);
    doc.text(
        "SSTS",
        MARGIN + 7.5,
        MARGIN + 10.0,
        TextStyle::new(10.0)
            .bold()
            .color(Rgb8::WHITE)
            .align(Align::Center),
    );
    doc.text(
        "Clinical Biomechanics Report",
        MARGIN + 20.0,
        MARGIN + 6.0,
        TextStyle::new(18.0).bold().color(HEADING),
    );
    doc.text(
        "Smart Sprint Training System",
        MARGIN + 20.0,
        MARGIN + 12.0,
        TextStyle::new(10.0).color(MUTED),
    );
    doc.text(
        long_date(today),
        right,
        MARGIN + 10.0,
        TextStyle::new(10.0).color(MUTED).align(Align::Right),
    );
    doc.hline(MARGIN, right, MARGIN + 20.0, 0.5, RULE);

    let mut y = MARGIN + 35.0;
    doc.text(
        "PATIENT DETAILS",
        MARGIN,
        y,
        TextStyle::new(10.0).bold().color(MUTED),
    );
    y += 8.0;
    let name = identity
        .and_then(|profile| profile.full_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("Unknown Athlete");
    let role = identity
        .map(|profile| profile.role.label())
        .unwrap_or("Athlete");
    doc.text(format!("Name: {name}"), MARGIN, y, TextStyle::new(12.0).bold());
    doc.text(format!("Role: {role}"), center, y, TextStyle::new(12.0));
    y += 15.0;
    doc.hline(MARGIN, right, y, 0.5, RULE);

    y += 20.0;
    doc.fill_rect(MARGIN, y, PAGE_WIDTH_MM - MARGIN * 2.0, 40.0, Rgb8(248, 250, 252));
    doc.text(
        "TECHNIQUE SCORE",
        center,
        y + 10.0,
        TextStyle::new(10.0).bold().color(MUTED).align(Align::Center),
    );
    let score = snapshot.and_then(|snapshot| snapshot.score).unwrap_or(0.0);
    let (r, g, b) = ScoreBand::for_score(score).report_rgb();
    doc.text(
        number(score),
        center,
        y + 25.0,
        TextStyle::new(30.0)
            .bold()
            .color(Rgb8(r, g, b))
            .align(Align::Center),
    );
    doc.text(
        "/ 100",
        center,
        y + 32.0,
        TextStyle::new(12.0)
            .color(Rgb8(148, 163, 184))
            .align(Align::Center),
    );
    y += 50.0;

    doc.text(
        "BIOMECHANICAL ANALYSIS",
        MARGIN,
        y,
        TextStyle::new(10.0).bold().color(MUTED),
    );
    y += 5.0;
    let band = PageBand {
        top: MARGIN,
        bottom: PAGE_HEIGHT_MM - MARGIN,
    };
    y = draw_table(
        &mut doc,
        MARGIN,
        y,
        &METRIC_COLUMNS,
        &metric_rows(snapshot),
        &METRIC_TABLE,
        band,
    );
    y += 20.0;

    if y > PAGE_HEIGHT_MM - 60.0 {
        doc.add_page();
        y = MARGIN;
    }
    doc.text(
        "CLINICAL RECOMMENDATIONS",
        MARGIN,
        y,
        TextStyle::new(10.0).bold().color(MUTED),
    );
    y += 10.0;

    let wrap_at = chars_per_line(PAGE_WIDTH_MM - MARGIN * 2.0 - 10.0, 10.0);
    for message in recommendations(snapshot) {
        let lines = wrap_text(&message, wrap_at);
        let height = lines.len() as f32 * 6.0;
        if y + height > PAGE_HEIGHT_MM - MARGIN {
            doc.add_page();
            y = MARGIN;
        }
        doc.fill_rect(MARGIN + 1.0, y - 2.0, 2.0, 2.0, BRAND_BLUE);
        for (index, line) in lines.iter().enumerate() {
            doc.text(
                line.as_str(),
                MARGIN + 8.0,
                y + index as f32 * 6.0,
                TextStyle::new(10.0).color(BODY),
            );
        }
        y += height + 4.0;
    }

    doc.stamp_every_page(
        "Generated by SSTS AI - Page {page} of {pages}",
        center,
        PAGE_HEIGHT_MM - 10.0,
        TextStyle::new(8.0)
            .color(Rgb8(150, 150, 150))
            .align(Align::Center),
    );
    doc
}
