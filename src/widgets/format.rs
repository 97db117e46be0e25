use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Render a metric the way the dashboard shows it: integers without a
/// fraction, everything else with at most two decimals.
pub fn number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Fixed-precision rendering used by report tables.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// "Monday, October 19, 2026", as printed in report headers.
pub fn long_date(date: Date) -> String {
    date.format(format_description!(
        "[weekday], [month repr:long] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

/// "10/19/2026".
pub fn numeric_date(date: Date) -> String {
    date.format(format_description!(
        "[month padding:none]/[day padding:none]/[year]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

/// Parse a backend timestamp; naive timestamps are taken as given.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) =
        OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
    {
        return Some(PrimitiveDateTime::new(parsed.date(), parsed.time()));
    }
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
        )
    })
    .ok()
}

/// "Oct 19, 2026, 10:00"; unparseable input is returned unchanged.
pub fn session_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .and_then(|stamp| {
            stamp
                .format(format_description!(
                    "[month repr:short] [day padding:none], [year], [hour]:[minute]"
                ))
                .ok()
        })
        .unwrap_or_else(|| raw.to_string())
}

/// Date part of a backend timestamp as "10/19/2026".
pub fn session_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|stamp| numeric_date(stamp.date()))
        .unwrap_or_else(|| raw.to_string())
}
