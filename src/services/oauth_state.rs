// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! Format before encoding: `nonce|timestamp_ms_hex|hmac_sha256_hex`, then
//! URL-safe base64. The nonce is also kept in a callback-scoped cookie so a
//! state minted for one browser cannot complete a login in another.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// How long a login may take between `/login` and the callback.
pub const STATE_MAX_AGE_MS: i64 = 10 * 60 * 1000;

/// Sign `nonce` and the issue time into an opaque state string.
pub fn sign_state(nonce: &str, issued_at_ms: i64, key: &[u8]) -> Result<String, AppError> {
    let payload = format!("{}|{:x}", nonce, issued_at_ms);
    let signature = hex::encode(mac_for(key, &payload)?.finalize().into_bytes());
    let signed = format!("{}|{}", payload, signature);
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Check a state returned by the provider.
///
/// Fails on bad encoding, bad signature, a nonce that does not match the
/// browser's cookie, or a state older than [`STATE_MAX_AGE_MS`].
pub fn verify_state(
    state: &str,
    expected_nonce: &str,
    key: &[u8],
    now_ms: i64,
) -> Result<(), AppError> {
    let invalid = |reason: &str| AppError::OAuth(format!("Invalid state: {}", reason));

    let bytes = URL_SAFE_NO_PAD
        .decode(state)
        .map_err(|_| invalid("not base64"))?;
    let state_str = String::from_utf8(bytes).map_err(|_| invalid("not UTF-8"))?;

    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    let [nonce, timestamp_hex, signature_hex] = parts.as_slice() else {
        return Err(invalid("malformed"));
    };

    let payload = format!("{}|{}", nonce, timestamp_hex);
    let expected_signature = hex::encode(mac_for(key, &payload)?.finalize().into_bytes());
    if !bool::from(expected_signature.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return Err(invalid("signature mismatch"));
    }

    if !bool::from(nonce.as_bytes().ct_eq(expected_nonce.as_bytes())) {
        return Err(invalid("nonce mismatch"));
    }

    let issued_at = i64::from_str_radix(timestamp_hex, 16).map_err(|_| invalid("bad timestamp"))?;
    let age = now_ms - issued_at;
    if !(0..=STATE_MAX_AGE_MS).contains(&age) {
        return Err(invalid("expired"));
    }

    Ok(())
}

fn mac_for(key: &[u8], payload: &str) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(mac)
}
