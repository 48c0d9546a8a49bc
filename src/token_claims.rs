use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
}

/// Extracts the `exp` claim from a JWT without verifying the signature. The
/// desktop only needs the expiry; token validity is the API server's concern.
pub(crate) fn token_expiry_unix(token: &str) -> Result<i64, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("invalid token format".to_string());
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|error| format!("failed to decode token payload: {error}"))?;
    let claims: TokenClaims = serde_json::from_slice(&payload)
        .map_err(|error| format!("failed to parse token payload: {error}"))?;
    Ok(claims.exp)
}

pub(crate) fn token_is_expired(token: &str, now_unix: i64) -> Result<bool, String> {
    Ok(token_expiry_unix(token)? < now_unix)
}
