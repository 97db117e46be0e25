use std::path::Path;

use crate::api::{ApiClient, ApiError, SessionCreate, StreamCommand};
use crate::stats::StatsSnapshot;

/// Backend calls the live controller depends on.
///
/// Implementations are shared with the poll and upload threads, so they
/// must be thread-safe.
pub trait LiveBackend: Send + Sync + 'static {
    /// Origin used to build absolute download links.
    fn origin(&self) -> &str;
    fn video_feed_url(&self, descriptor: &str) -> String;
    fn stream_stats(&self) -> Result<StatsSnapshot, ApiError>;
    fn stream_command(&self, command: StreamCommand) -> Result<(), ApiError>;
    fn upload(&self, path: &Path) -> Result<String, ApiError>;
    fn export_csv(&self) -> Result<String, ApiError>;
    fn save_session(&self, payload: &SessionCreate) -> Result<(), ApiError>;
}

impl LiveBackend for ApiClient {
    fn origin(&self) -> &str {
        ApiClient::origin(self)
    }

    fn video_feed_url(&self, descriptor: &str) -> String {
        ApiClient::video_feed_url(self, descriptor)
    }

    fn stream_stats(&self) -> Result<StatsSnapshot, ApiError> {
        ApiClient::stream_stats(self)
    }

    fn stream_command(&self, command: StreamCommand) -> Result<(), ApiError> {
        ApiClient::stream_command(self, command)
    }

    fn upload(&self, path: &Path) -> Result<String, ApiError> {
        ApiClient::upload(self, path)
    }

    fn export_csv(&self) -> Result<String, ApiError> {
        ApiClient::export_csv(self)
    }

    fn save_session(&self, payload: &SessionCreate) -> Result<(), ApiError> {
        ApiClient::save_session(self, payload)
    }
}
