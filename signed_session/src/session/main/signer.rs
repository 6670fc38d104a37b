//! Stateless minting and validation of signed session identifiers
//!
//! A session identifier is `random bytes || HMAC-SHA256(random bytes)`
//! encoded as URL-safe base64. Validation only recomputes the HMAC, so any
//! process holding the same signing key can verify identifiers minted by any
//! other, and no record of issued identifiers is kept.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::session::types::SessionId;
use crate::utils::{base64url_decode, base64url_encode, gen_random_bytes};

type HmacSha256 = Hmac<Sha256>;

/// Length of the random portion of an identifier.
pub(crate) const ID_LENGTH: usize = 32;
/// Length of an HMAC-SHA256 digest.
pub(crate) const SIGNATURE_LENGTH: usize = 32;
pub(crate) const SIGNED_LENGTH: usize = ID_LENGTH + SIGNATURE_LENGTH;

fn sign(random: &[u8], signing_key: &str) -> Result<Vec<u8>, SessionError> {
    let mut mac = HmacSha256::new_from_slice(signing_key.as_bytes())
        .map_err(|e| SessionError::Configuration(format!("Invalid signing key: {e}")))?;
    mac.update(random);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn ensure_signing_key(signing_key: &str) -> Result<(), SessionError> {
    if signing_key.is_empty() {
        tracing::error!("Refusing to use an empty session signing key");
        return Err(SessionError::Configuration(
            "Signing key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Create a new digitally signed session identifier using `signing_key` as
/// the HMAC key.
///
/// # Errors
/// * `SessionError::Configuration` if `signing_key` is empty
/// * `SessionError::Entropy` if the system random source fails
pub fn mint_session_id(signing_key: &str) -> Result<SessionId, SessionError> {
    ensure_signing_key(signing_key)?;

    let mut signed = gen_random_bytes(ID_LENGTH)?;
    let signature = sign(&signed, signing_key)?;
    signed.extend_from_slice(&signature);

    Ok(SessionId::from_encoded(base64url_encode(&signed)))
}

/// Validate a raw token (no scheme prefix) against `signing_key`.
///
/// Returns a `SessionId` wrapping `token` unchanged when the embedded
/// signature matches. The result depends on the two arguments only.
///
/// # Errors
/// * `SessionError::Configuration` if `signing_key` is empty
/// * `SessionError::MalformedToken` if `token` is not base64url or does not
///   decode to exactly 64 bytes
/// * `SessionError::SignatureMismatch` if the signature does not verify
pub fn validate_session_id(token: &str, signing_key: &str) -> Result<SessionId, SessionError> {
    ensure_signing_key(signing_key)?;

    let decoded = base64url_decode(token)?;
    if decoded.len() != SIGNED_LENGTH {
        tracing::debug!(
            "Session token decoded to {} bytes, expected {}",
            decoded.len(),
            SIGNED_LENGTH
        );
        return Err(SessionError::MalformedToken(format!(
            "Decoded token length {} is not {}",
            decoded.len(),
            SIGNED_LENGTH
        )));
    }

    let (random, presented) = decoded.split_at(ID_LENGTH);
    let expected = sign(random, signing_key)?;

    if bool::from(expected.as_slice().ct_eq(presented)) {
        Ok(SessionId::from_encoded(token.to_string()))
    } else {
        tracing::debug!("Session token signature does not match");
        Err(SessionError::SignatureMismatch)
    }
}
