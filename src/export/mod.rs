//! Session exports: the backend CSV link and locally generated PDF reports.
//!
//! Reports are laid out as plain drawing operations first and only then
//! rendered with printpdf, so layout rules are testable without parsing PDFs.

mod history_pdf;
mod layout;
mod render;
mod report;
mod table;

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::api::{HistorySession, UserProfile};
use crate::stats::StatsSnapshot;

pub use history_pdf::{HISTORY_REPORT_FILE_NAME, history_cells, layout_history};
pub use layout::{Align, DocumentLayout, DrawOp, Rgb8, TextStyle, wrap_text};
pub use render::{render_pdf, write_pdf};
pub use report::{layout_report, metric_rows, recommendations, report_file_name};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("Failed to open {url}: {source}")]
    Open {
        url: String,
        source: std::io::Error,
    },
}

/// Absolute download link for a CSV export path returned by the backend.
pub fn csv_download_url(origin: &str, download_url: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), download_url)
}

/// Hand a URL or file to the desktop's default handler.
pub fn open_url(url: &str) -> Result<(), ExportError> {
    open::that(url).map_err(|source| ExportError::Open {
        url: url.to_string(),
        source,
    })
}

/// Write the single-session report into `out_dir` and return its path.
pub fn write_session_report(
    snapshot: Option<&StatsSnapshot>,
    identity: Option<&UserProfile>,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let now = local_now();
    let epoch_ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let path = out_dir.join(report_file_name(identity, epoch_ms));
    write_pdf(&layout_report(snapshot, identity, now.date()), &path)?;
    info!(path = %path.display(), "Session report written");
    Ok(path)
}

/// Write the training history table into `out_dir` and return its path.
pub fn write_history_report(
    sessions: &[HistorySession],
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = out_dir.join(HISTORY_REPORT_FILE_NAME);
    write_pdf(&layout_history(sessions, local_now().date()), &path)?;
    info!(path = %path.display(), rows = sessions.len(), "History report written");
    Ok(path)
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
