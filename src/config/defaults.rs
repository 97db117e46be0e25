pub(super) const MIN_POLL_INTERVAL_MS: u64 = 50;
pub(super) const MAX_POLL_INTERVAL_MS: u64 = 5_000;

pub(super) fn clamp_poll_interval_ms(value: u64) -> u64 {
    value.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS)
}

pub(super) fn default_origin() -> String {
    "http://localhost:8000".to_string()
}

pub(super) fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

pub(super) fn default_poll_interval_ms() -> u64 {
    200
}

pub(super) fn default_toast_duration_ms() -> u64 {
    3_000
}
