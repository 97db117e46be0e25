//! Shared HTTP clients and bounded response reading.
//!
//! JSON calls go through the `ureq` agent. Media uploads need
//! `multipart/form-data`, which `ureq` 2 lacks, so they use a blocking
//! `reqwest` client with a longer write budget.

use std::io::{self, Read};
use std::path::Path;
use std::sync::OnceLock;

use reqwest::blocking::multipart::{Form, Part};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(120);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);
const USER_AGENT: &str = concat!("ssts/", env!("CARGO_PKG_VERSION"));

/// Return a shared HTTP agent with consistent timeouts.
pub(crate) fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
    })
}

/// Client for multipart uploads, built on first use.
pub(crate) fn upload_client() -> Result<&'static reqwest::blocking::Client, reqwest::Error> {
    static CLIENT: OnceLock<reqwest::blocking::Client> = OnceLock::new();
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(UPLOAD_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(CLIENT.get_or_init(|| client))
}

/// Form with `path` as the single file part `field`.
///
/// The part content type is guessed from the file name.
pub(crate) fn file_form(field: &str, path: &Path) -> Result<Form, io::Error> {
    let contents = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
    let part = Part::bytes(contents)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    Ok(Form::new().part(field.to_string(), part))
}

/// Read a response into memory, enforcing a maximum byte size.
pub(crate) fn read_response_bytes(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, io::Error> {
    check_content_length(&response, max_bytes)?;
    read_limited(response.into_reader(), max_bytes)
}

/// Read at most `max_bytes` from `reader`; more is an error.
pub(crate) fn read_limited(reader: impl Read, max_bytes: usize) -> Result<Vec<u8>, io::Error> {
    let mut limited = reader.take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}

/// Read a response body as UTF-8 text with the given size cap.
pub(crate) fn read_body_limited(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<String, String> {
    let bytes = read_response_bytes(response, max_bytes).map_err(|err| err.to_string())?;
    String::from_utf8(bytes).map_err(|err| err.to_string())
}

fn check_content_length(response: &ureq::Response, max_bytes: usize) -> Result<(), io::Error> {
    let Some(length) = response.header("Content-Length") else {
        return Ok(());
    };
    let Ok(length) = length.parse::<u64>() else {
        return Ok(());
    };
    if length > max_bytes as u64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response too large: {length} bytes"),
        ));
    }
    Ok(())
}
