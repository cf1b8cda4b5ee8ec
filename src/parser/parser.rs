use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, UtilError};

/// Claims this crate reads from a compact token. Everything else is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub email: String,
    /// Unix seconds
    pub exp: i64,
}

/// Decode the payload of a compact `header.payload.signature` token.
///
/// The signature is NOT verified: callers sit behind an upstream that already
/// validated the token, this only extracts claims.
pub fn decode_access_token(token: &str) -> Result<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(UtilError::MalformedToken(format!(
            "expected 3 segments, got {}",
            parts.len()
        )));
    }

    let decoded = decode_segment(parts[1])?;
    let claims = serde_json::from_slice::<TokenClaims>(&decoded)
        .map_err(|e| UtilError::MalformedToken(format!("invalid token payload: {}", e)))?;

    debug!(exp = claims.exp, "token claims decoded");
    Ok(claims)
}

/// Accepts url-safe and standard alphabets, padded or not.
fn decode_segment(segment: &str) -> Result<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|e| UtilError::MalformedToken(format!("base64 decode error: {}", e)))
}
