//! Time-limited signed URLs for object-store downloads.
//!
//! A URL carries `expires` (UTC Unix seconds) and an HMAC-SHA256 `signature`
//! over `"{path}\n{expires}"`. The server recomputes the signature before
//! serving any blob.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Default lifetime of a signed URL: one hour.
pub const DEFAULT_EXPIRY_SECS: i64 = 3600;

/// Compute the hex signature for a path and expiry.
pub fn sign(secret: &str, path: &str, expires: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(path.as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a signature and expiry against `now` (UTC Unix seconds).
pub fn verify(
    secret: &str,
    path: &str,
    expires: i64,
    signature: &str,
    now: i64,
) -> Result<(), CoreError> {
    if expires < now {
        return Err(CoreError::Forbidden("Signed URL has expired".into()));
    }
    let provided = hex::decode(signature)
        .ok_or_else(|| CoreError::Forbidden("Malformed signature".into()))?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(path.as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    mac.verify_slice(&provided)
        .map_err(|_| CoreError::Forbidden("Invalid signature".into()))
}

/// Build the relative download URL for `path`, valid for `ttl_secs` from `now`.
pub fn signed_url(base_url: &str, secret: &str, path: &str, now: i64, ttl_secs: i64) -> String {
    let expires = now + ttl_secs;
    let signature = sign(secret, path, expires);
    format!(
        "{}/api/v1/files/content/{}?expires={expires}&signature={signature}",
        base_url.trim_end_matches('/'),
        percent_encode_path(path)
    )
}

/// Percent-encode everything except unreserved characters and `/`.
pub fn percent_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
