//! Key material generation.
//!
//! Two shapes of key are produced here:
//!
//! - [`SigningKeyPair`]: a single Curve25519 scalar and its public point. A
//!   World is signed by one of these and names another (or the same one) as
//!   the signer required for its next revision.
//! - [`DualKeyPair`]: a node's full identity key material, an X25519 pair and
//!   an independent Ed25519 pair packed into 64-byte public and private
//!   values, X25519 half first.

use ed25519_dalek::SigningKey;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use thiserror::Error;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a Curve25519 scalar or point.
pub const KEY_LEN: usize = 32;

/// Length of a dual public or private value.
pub const DUAL_KEY_LEN: usize = 64;

/// Length of a serialized signing keypair (public then private).
pub const KEYPAIR_FILE_LEN: usize = 64;

/// Errors raised while producing or loading key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Invalid key length: {actual} (expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Public key does not match private key")]
    Mismatch,
}

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// Fill `dest` from the operating system RNG.
pub fn fill_random(dest: &mut [u8]) -> KeyResult<()> {
    fill_random_from(&mut OsRng, dest)
}

fn fill_random_from<R: RngCore + CryptoRng>(rng: &mut R, dest: &mut [u8]) -> KeyResult<()> {
    rng.try_fill_bytes(dest)
        .map_err(|e| KeyError::EntropyUnavailable(e.to_string()))
}

/// Curve25519 public point for a private scalar.
pub fn curve_public_key(private: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    x25519(*private, X25519_BASEPOINT_BYTES)
}

/// Curve25519 keypair used to sign Worlds.
///
/// The private scalar is zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKeyPair {
    public: [u8; KEY_LEN],
    private: [u8; KEY_LEN],
}

impl SigningKeyPair {
    /// Draw a fresh private scalar and compute its public point.
    pub fn generate() -> KeyResult<Self> {
        let mut private = [0u8; KEY_LEN];
        fill_random(&mut private)?;
        let pair = Self::from_private(private);
        private.zeroize();
        Ok(pair)
    }

    pub fn from_private(private: [u8; KEY_LEN]) -> Self {
        Self {
            public: curve_public_key(&private),
            private,
        }
    }

    /// Load the 64-byte `public || private` layout used by key files.
    pub fn from_bytes(bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != KEYPAIR_FILE_LEN {
            return Err(KeyError::InvalidLength {
                expected: KEYPAIR_FILE_LEN,
                actual: bytes.len(),
            });
        }

        let mut private = [0u8; KEY_LEN];
        private.copy_from_slice(&bytes[KEY_LEN..]);
        let pair = Self::from_private(private);
        private.zeroize();

        if pair.public[..] != bytes[..KEY_LEN] {
            return Err(KeyError::Mismatch);
        }
        Ok(pair)
    }

    pub fn to_bytes(&self) -> [u8; KEYPAIR_FILE_LEN] {
        let mut bytes = [0u8; KEYPAIR_FILE_LEN];
        bytes[..KEY_LEN].copy_from_slice(&self.public);
        bytes[KEY_LEN..].copy_from_slice(&self.private);
        bytes
    }

    pub fn public(&self) -> &[u8; KEY_LEN] {
        &self.public
    }

    pub fn private(&self) -> &[u8; KEY_LEN] {
        &self.private
    }
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("public", &hex::encode(self.public))
            .field("private", &"<redacted>")
            .finish()
    }
}

/// Node identity key material: X25519 and Ed25519 halves, each from its own
/// fresh randomness.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DualKeyPair {
    public: [u8; DUAL_KEY_LEN],
    private: [u8; DUAL_KEY_LEN],
}

impl DualKeyPair {
    pub fn generate() -> KeyResult<Self> {
        let mut dh_private = [0u8; KEY_LEN];
        fill_random(&mut dh_private)?;
        let mut ed_seed = [0u8; KEY_LEN];
        fill_random(&mut ed_seed)?;

        let pair = Self::from_halves(&dh_private, &ed_seed);
        dh_private.zeroize();
        ed_seed.zeroize();
        Ok(pair)
    }

    fn from_halves(dh_private: &[u8; KEY_LEN], ed_seed: &[u8; KEY_LEN]) -> Self {
        let dh_public = curve_public_key(dh_private);
        let ed_public = SigningKey::from_bytes(ed_seed).verifying_key().to_bytes();

        let mut public = [0u8; DUAL_KEY_LEN];
        public[..KEY_LEN].copy_from_slice(&dh_public);
        public[KEY_LEN..].copy_from_slice(&ed_public);

        let mut private = [0u8; DUAL_KEY_LEN];
        private[..KEY_LEN].copy_from_slice(dh_private);
        private[KEY_LEN..].copy_from_slice(ed_seed);

        Self { public, private }
    }

    pub fn public(&self) -> &[u8; DUAL_KEY_LEN] {
        &self.public
    }

    pub fn private(&self) -> &[u8; DUAL_KEY_LEN] {
        &self.private
    }

    pub fn dh_public(&self) -> &[u8] {
        &self.public[..KEY_LEN]
    }

    pub fn signing_public(&self) -> &[u8] {
        &self.public[KEY_LEN..]
    }
}

impl std::fmt::Debug for DualKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualKeyPair")
            .field("public", &hex::encode(self.public))
            .field("private", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::{TEST_VECTOR_PRIVATE_KEY, TEST_VECTOR_PUBLIC_KEY_HEX};

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy pool drained"))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_signing_keypair_generation() {
        let pair = SigningKeyPair::generate().unwrap();
        assert_eq!(pair.public(), &curve_public_key(pair.private()));
        assert_ne!(pair.public(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn test_signing_keypairs_are_fresh() {
        let a = SigningKeyPair::generate().unwrap();
        let b = SigningKeyPair::generate().unwrap();
        assert_ne!(a.private(), b.private());
    }

    #[test]
    fn test_public_key_vector() {
        let pair = SigningKeyPair::from_private(TEST_VECTOR_PRIVATE_KEY);
        assert_eq!(hex::encode(pair.public()), TEST_VECTOR_PUBLIC_KEY_HEX);
    }

    #[test]
    fn test_keypair_bytes_layout() {
        let pair = SigningKeyPair::from_private(TEST_VECTOR_PRIVATE_KEY);
        let bytes = pair.to_bytes();
        assert_eq!(&bytes[..32], pair.public());
        assert_eq!(&bytes[32..], &TEST_VECTOR_PRIVATE_KEY);

        let loaded = SigningKeyPair::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.public(), pair.public());
    }

    #[test]
    fn test_keypair_bytes_rejects_wrong_length() {
        let result = SigningKeyPair::from_bytes(&[0u8; 63]);
        assert!(matches!(
            result,
            Err(KeyError::InvalidLength {
                expected: 64,
                actual: 63
            })
        ));
    }

    #[test]
    fn test_keypair_bytes_rejects_mismatch() {
        let mut bytes = SigningKeyPair::from_private(TEST_VECTOR_PRIVATE_KEY).to_bytes();
        bytes[0] ^= 0xff;
        assert!(matches!(
            SigningKeyPair::from_bytes(&bytes),
            Err(KeyError::Mismatch)
        ));
    }

    #[test]
    fn test_debug_redacts_private() {
        let pair = SigningKeyPair::from_private(TEST_VECTOR_PRIVATE_KEY);
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&hex::encode(TEST_VECTOR_PRIVATE_KEY)));
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let mut buf = [0u8; 32];
        let result = fill_random_from(&mut FailingRng, &mut buf);
        assert!(matches!(result, Err(KeyError::EntropyUnavailable(_))));
    }

    #[test]
    fn test_dual_pair_layout() {
        let pair = DualKeyPair::generate().unwrap();

        let mut dh_private = [0u8; KEY_LEN];
        dh_private.copy_from_slice(&pair.private()[..KEY_LEN]);
        assert_eq!(pair.dh_public(), &curve_public_key(&dh_private)[..]);

        let mut ed_seed = [0u8; KEY_LEN];
        ed_seed.copy_from_slice(&pair.private()[KEY_LEN..]);
        let ed_public = SigningKey::from_bytes(&ed_seed).verifying_key().to_bytes();
        assert_eq!(pair.signing_public(), &ed_public[..]);
    }

    #[test]
    fn test_dual_pair_halves_are_independent() {
        let pair = DualKeyPair::generate().unwrap();
        assert_ne!(&pair.private()[..KEY_LEN], &pair.private()[KEY_LEN..]);
        assert_ne!(pair.dh_public(), pair.signing_public());
    }
}
