//! REST client for the SSTS analysis backend.
//!
//! Every call goes through the shared [`http_client::agent`], prefixes the
//! configured base path and attaches `Authorization: Bearer <token>` when a
//! credential is held.

mod error;
mod types;

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;

use crate::config::ServerSettings;
use crate::http_client;
use crate::stats::StatsSnapshot;

pub use error::ApiError;
pub use types::{
    HistorySession, OrganizationSummary, ProfileUpdate, RecentSession, RegisterRequest, Role,
    SessionCreate, UserProfile,
};

const MAX_SMALL_RESPONSE_BYTES: usize = 64 * 1024;
const MAX_LARGE_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Stream control endpoints that take no body and return nothing useful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamCommand {
    Pause,
    Resume,
    Restart,
    Stop,
}

impl StreamCommand {
    pub fn path(self) -> &'static str {
        match self {
            Self::Pause => "/stream/pause",
            Self::Resume => "/stream/resume",
            Self::Restart => "/stream/restart",
            Self::Stop => "/stream/stop",
        }
    }
}

/// Handle to the backend; cheap to clone, clones share the credential.
#[derive(Clone, Debug)]
pub struct ApiClient {
    origin: String,
    base_url: String,
    credential: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(settings: &ServerSettings) -> Self {
        let origin = settings.origin.trim_end_matches('/').to_string();
        let base_url = format!("{origin}{}", settings.api_prefix);
        Self {
            origin,
            base_url,
            credential: Arc::new(RwLock::new(None)),
        }
    }

    /// Scheme, host and port of the backend without the API prefix.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Full URL of an API path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn set_credential(&self, token: Option<String>) {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(|err| err.into_inner());
        *guard = token.map(|token| token.trim().to_string());
    }

    pub fn has_credential(&self) -> bool {
        self.credential
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Exchange username and password for an access token.
    pub fn login_access_token(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let request = self.request("POST", "/login/access-token");
        let response = send(request.send_form(&[("username", username), ("password", password)]))?;
        let token: types::TokenResponse = read_json(response, MAX_SMALL_RESPONSE_BYTES)?;
        Ok(token.access_token)
    }

    pub fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_json("/users/me", MAX_SMALL_RESPONSE_BYTES)
    }

    pub fn update_me(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let response = send(self.request("PUT", "/users/me").send_json(update))?;
        read_json(response, MAX_SMALL_RESPONSE_BYTES)
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        let response = send(self.request("POST", "/users/").send_json(request))?;
        read_json(response, MAX_SMALL_RESPONSE_BYTES)
    }

    pub fn athletes(&self) -> Result<Vec<UserProfile>, ApiError> {
        self.get_json("/users/athletes", MAX_LARGE_RESPONSE_BYTES)
    }

    /// URL the image element would load for a source descriptor.
    ///
    /// The controller never fetches this itself; the stream is consumed by
    /// whatever displays frames.
    pub fn video_feed_url(&self, descriptor: &str) -> String {
        let base = self.api_url("/stream/video_feed");
        match url::Url::parse_with_params(&base, &[("source", descriptor)]) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{base}?source={}", encode_query_value(descriptor)),
        }
    }

    pub fn stream_stats(&self) -> Result<StatsSnapshot, ApiError> {
        self.get_json("/stream/stats", MAX_LARGE_RESPONSE_BYTES)
    }

    pub fn stream_command(&self, command: StreamCommand) -> Result<(), ApiError> {
        let response = send(self.request("POST", command.path()).call())?;
        drain(response);
        Ok(())
    }

    /// Upload a media file and return the server-side path to stream from.
    pub fn upload(&self, path: &Path) -> Result<String, ApiError> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest(format!(
                "{} is larger than {} bytes",
                path.display(),
                MAX_UPLOAD_BYTES
            )));
        }
        let form = http_client::file_form("file", path)?;
        let client = http_client::upload_client().map_err(transport)?;
        let mut request = client
            .post(self.api_url("/upload/"))
            .header("Accept", "application/json")
            .multipart(form);
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(transport)?;
        let status = response.status().as_u16();
        let bytes = http_client::read_limited(response, MAX_SMALL_RESPONSE_BYTES)?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        if !(200..300).contains(&status) {
            return Err(error::map_status_error(status, body));
        }
        let upload: types::UploadResponse = parse_json(&body)?;
        Ok(upload.filepath)
    }

    /// Ask the backend to write the CSV export; returns its relative download URL.
    pub fn export_csv(&self) -> Result<String, ApiError> {
        let response = send(self.request("POST", "/stream/export_csv").call())?;
        let export: types::ExportCsvResponse = read_json(response, MAX_SMALL_RESPONSE_BYTES)?;
        Ok(export.download_url)
    }

    pub fn save_session(&self, payload: &SessionCreate) -> Result<(), ApiError> {
        let response = send(self.request("POST", "/history/save").send_json(payload))?;
        drain(response);
        Ok(())
    }

    /// Sessions of the current user, or of `user_id` when a coach asks.
    pub fn history(&self, user_id: Option<i64>) -> Result<Vec<HistorySession>, ApiError> {
        let mut request = self.request("GET", "/history/");
        if let Some(user_id) = user_id {
            request = request.query("user_id", &user_id.to_string());
        }
        let response = send(request.call())?;
        read_json(response, MAX_LARGE_RESPONSE_BYTES)
    }

    pub fn update_feedback(&self, session_id: i64, notes: &str) -> Result<(), ApiError> {
        let path = format!("/history/{session_id}/feedback");
        let body = types::FeedbackUpdate { coach_notes: notes };
        let response = send(self.request("PUT", &path).send_json(&body))?;
        drain(response);
        Ok(())
    }

    pub fn organization_summary(&self) -> Result<OrganizationSummary, ApiError> {
        self.get_json("/organization/summary", MAX_SMALL_RESPONSE_BYTES)
    }

    pub fn recent_sessions(&self) -> Result<Vec<RecentSession>, ApiError> {
        self.get_json("/organization/recent-sessions", MAX_LARGE_RESPONSE_BYTES)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, max_bytes: usize) -> Result<T, ApiError> {
        let response = send(self.request("GET", path).call())?;
        read_json(response, max_bytes)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let request = http_client::agent()
            .request(method, &self.api_url(path))
            .set("Accept", "application/json");
        match self.bearer() {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    fn bearer(&self) -> Option<String> {
        self.credential
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .filter(|token| !token.is_empty())
    }
}

/// Send-side wrapper that turns ureq status errors into [`ApiError`].
fn send(result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, ApiError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_body_limited(response, MAX_SMALL_RESPONSE_BYTES)
                .unwrap_or_else(|err| err);
            Err(error::map_status_error(code, body))
        }
        Err(ureq::Error::Transport(err)) => Err(ApiError::Transport(err.to_string())),
    }
}

fn read_json<T: DeserializeOwned>(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<T, ApiError> {
    let body = http_client::read_body_limited(response, max_bytes).map_err(ApiError::Json)?;
    parse_json(&body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body.trim())
        .map_err(|err| ApiError::Json(format!("{err}: {}", preview(body))))
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn drain(response: ureq::Response) {
    let _ = http_client::read_response_bytes(response, MAX_SMALL_RESPONSE_BYTES);
}

fn preview(body: &str) -> &str {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((index, _)) => &trimmed[..index],
        None => trimmed,
    }
}

fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
