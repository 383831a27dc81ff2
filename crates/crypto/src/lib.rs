//! Cryptographic primitives for ztworld trust anchors.
//!
//! This crate provides the three primitives a World file is built from:
//!
//! - **Identity hash**: a memory-hard digest from which node addresses are
//!   derived and against which identities are validated
//! - **Key material**: Curve25519 signing keypairs and 64-byte dual
//!   (X25519 + Ed25519) identity keypairs
//! - **Signing**: Ed25519 signatures made with Curve25519 key bytes, over the
//!   truncated SHA-512 of a canonical payload
//!
//! # Compatibility
//!
//! Every constant and byte order in this crate is fixed by clients that were
//! implemented independently. The golden vectors in the test suite guard
//! them.

pub mod identity_hash;
pub mod keys;
pub mod signing;

#[cfg(test)]
mod test_vectors;

pub use identity_hash::{
    address_from_digest, derive_address, hashcash_ok, is_reserved_address, memory_hard_hash,
    ADDRESS_LEN, DIGEST_LEN, MEMORY_SIZE,
};

pub use keys::{
    curve_public_key, fill_random, DualKeyPair, KeyError, KeyResult, SigningKeyPair,
    DUAL_KEY_LEN, KEYPAIR_FILE_LEN, KEY_LEN,
};

pub use signing::{
    message_digest, sign, sign_with, verify, SigningError, SigningResult, SIGNATURE_LEN,
};
