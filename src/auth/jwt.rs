//! Minimal JWT payload reader.
//!
//! Only the claims segment is decoded; the signature belongs to the server
//! and is never checked here.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Claims the client cares about. Other claims are ignored whatever their
/// type.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch; JSON numbers may be fractional.
    #[serde(default)]
    pub exp: Option<f64>,
}

impl Claims {
    /// True once `now` (Unix seconds) has passed `exp`. Tokens without an
    /// expiry never expire on the client side.
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp < now as f64)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token is not a JWT (expected three segments)")]
    Malformed,
    #[error("Token payload is not base64url: {0}")]
    Base64(String),
    #[error("Token payload is not JSON: {0}")]
    Json(String),
}

/// Decode the payload segment of `token`.
pub fn decode_claims(token: &str) -> Result<Claims, JwtError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::Malformed);
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| JwtError::Base64(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| JwtError::Json(err.to_string()))
}

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims_json: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_exp() {
        let token = encode_for_test(r#"{"exp": 1700000000, "sub": "7"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(1_700_000_000.0));
    }

    #[test]
    fn numeric_subject_is_accepted() {
        let token = encode_for_test(r#"{"exp":4102444800,"sub":7}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(4_102_444_800.0));
        assert!(!claims.is_expired(1_800_000_000));
    }

    #[test]
    fn fractional_exp_is_accepted() {
        let token = encode_for_test(r#"{"exp":4102444800.5,"sub":"runner"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(4_102_444_800.5));
        assert!(!claims.is_expired(4_102_444_800));
        assert!(claims.is_expired(4_102_444_801));
    }

    #[test]
    fn missing_or_null_exp_never_expires() {
        for payload in [r#"{"sub":null}"#, r#"{"exp":null}"#, r#"{"role":["a"]}"#] {
            let claims = decode_claims(&encode_for_test(payload)).unwrap();
            assert_eq!(claims.exp, None);
            assert!(!claims.is_expired(i64::MAX));
        }
    }

    #[test]
    fn expiry_is_strictly_after_exp() {
        let claims = Claims { exp: Some(100.0) };
        assert!(!claims.is_expired(99));
        assert!(!claims.is_expired(100));
        assert!(claims.is_expired(101));
        assert!(!Claims::default().is_expired(i64::MAX));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode_claims("not-a-token"), Err(JwtError::Malformed));
        assert_eq!(decode_claims("a.b.c.d"), Err(JwtError::Malformed));
        assert!(matches!(decode_claims("a.!!!.c"), Err(JwtError::Base64(_))));
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode(b"hello"));
        assert!(matches!(decode_claims(&not_json), Err(JwtError::Json(_))));
    }

    #[test]
    fn tolerates_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(br#"{"exp":55}"#);
        let claims = decode_claims(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.exp, Some(55.0));
    }
}
