//! World signing engine.
//!
//! A World is signed with a Curve25519 keypair, not an Ed25519 one. The
//! signed value is the first 32 bytes of SHA-512 over the message, and the
//! signature is a standard 64-byte Ed25519 signature produced by treating the
//! curve key bytes as an Ed25519 *expanded* secret key:
//!
//! ```text
//! expanded = curve_private (clamped scalar) || curve_public (nonce prefix)
//! ```
//!
//! Because X25519 and Ed25519 clamp the scalar the same way, the Ed25519
//! public point behind such a signature is the Edwards form of the curve
//! public key, which is what lets clients verify against the 32-byte key
//! embedded in a World.

use curve25519_dalek::montgomery::MontgomeryPoint;
use ed25519_dalek::hazmat::{raw_sign, ExpandedSecretKey};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha512};
use thiserror::Error;
use zeroize::Zeroize;

use crate::keys::{SigningKeyPair, KEY_LEN};

/// Length of a World signature.
pub const SIGNATURE_LEN: usize = 64;

/// Length of the digest value that is actually signed.
pub const SIGNED_DIGEST_LEN: usize = 32;

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Signing failed: {reason}")]
    SigningFailed { reason: String },

    #[error("Signature verification failed")]
    VerificationFailed,
}

/// Result type for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;

/// First 32 bytes of SHA-512 over `message`.
pub fn message_digest(message: &[u8]) -> [u8; SIGNED_DIGEST_LEN] {
    let hash = Sha512::digest(message);
    let mut digest = [0u8; SIGNED_DIGEST_LEN];
    digest.copy_from_slice(&hash[..SIGNED_DIGEST_LEN]);
    digest
}

/// Reinterpret a Curve25519 keypair as an Ed25519 expanded secret key.
///
/// WARNING: this is deliberate key reuse and part of the World format.
/// Deriving a proper Ed25519 key from a seed instead produces signatures
/// that existing clients reject.
fn curve_pair_as_expanded_key(
    public: &[u8; KEY_LEN],
    private: &[u8; KEY_LEN],
) -> [u8; 2 * KEY_LEN] {
    let mut expanded = [0u8; 2 * KEY_LEN];
    expanded[..KEY_LEN].copy_from_slice(private);
    expanded[KEY_LEN..].copy_from_slice(public);
    expanded
}

/// Sign `message` with a Curve25519 keypair.
///
/// Deterministic for identical inputs; message length is unbounded.
pub fn sign(
    public: &[u8; KEY_LEN],
    private: &[u8; KEY_LEN],
    message: &[u8],
) -> SigningResult<[u8; SIGNATURE_LEN]> {
    let digest = message_digest(message);

    let mut expanded = curve_pair_as_expanded_key(public, private);
    let esk = ExpandedSecretKey::from_slice(&expanded);
    expanded.zeroize();
    let esk = esk.map_err(|e| SigningError::SigningFailed {
        reason: e.to_string(),
    })?;

    let verifying_key = VerifyingKey::from(&esk);
    let signature = raw_sign::<Sha512>(&esk, &digest, &verifying_key);

    tracing::trace!(message_len = message.len(), "signed message digest");
    Ok(signature.to_bytes())
}

/// Sign `message` with a [`SigningKeyPair`].
pub fn sign_with(keypair: &SigningKeyPair, message: &[u8]) -> SigningResult<[u8; SIGNATURE_LEN]> {
    sign(keypair.public(), keypair.private(), message)
}

/// Verify a signature produced by [`sign`] against the 32-byte curve public
/// key.
///
/// The Montgomery form does not carry the sign of the Edwards point, so both
/// candidates are tried.
pub fn verify(
    public: &[u8; KEY_LEN],
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> SigningResult<()> {
    let digest = message_digest(message);
    let signature = Signature::from_bytes(signature);
    let montgomery = MontgomeryPoint(*public);

    for sign_bit in [0u8, 1u8] {
        let Some(point) = montgomery.to_edwards(sign_bit) else {
            continue;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&point.compress().to_bytes()) else {
            continue;
        };
        if verifying_key.verify(&digest, &signature).is_ok() {
            return Ok(());
        }
    }

    Err(SigningError::VerificationFailed)
}
