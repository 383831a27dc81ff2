//! Memory-hard identity hash.
//!
//! Derives the digest from which a node's short address is taken. Every
//! attempt at searching for a public key with a chosen address has to fill
//! and walk a 2 MiB scratch buffer, sequentially, so brute-forcing addresses
//! is expensive per candidate.
//!
//! The buffer size, the cipher (Salsa20/20 with a 64-bit block counter) and
//! the mixing order are all part of the identity format. Changing any of them
//! changes every address derived from an existing public key.

use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::{Key, Nonce, Salsa20};
use sha2::{Digest, Sha512};

/// Size of the scratch buffer filled per hash invocation.
pub const MEMORY_SIZE: usize = 2_097_152;

/// Length of the memory-hard digest.
pub const DIGEST_LEN: usize = 64;

/// Length of a node address.
pub const ADDRESS_LEN: usize = 5;

/// An identity is only acceptable if the first digest byte is below this.
pub const HASHCASH_FIRST_BYTE_LESS_THAN: u8 = 17;

/// Address prefix reserved for non-node use.
pub const RESERVED_ADDRESS_PREFIX: u8 = 0xff;

const BLOCK_LEN: usize = 64;
const WORD_LEN: usize = 8;
const STATE_WORDS: u64 = (DIGEST_LEN / WORD_LEN) as u64;
const MEMORY_WORDS: u64 = (MEMORY_SIZE / WORD_LEN) as u64;

/// Compute the memory-hard digest of a public key.
///
/// Pure function of its input. Allocates its own scratch buffer, so
/// concurrent calls do not interact.
pub fn memory_hard_hash(public_key: &[u8]) -> [u8; DIGEST_LEN] {
    let mut state = [0u8; DIGEST_LEN];
    state.copy_from_slice(&Sha512::digest(public_key));

    let mut cipher = Salsa20::new(
        Key::from_slice(&state[..32]),
        Nonce::from_slice(&state[32..40]),
    );

    let mut scratch = vec![0u8; MEMORY_SIZE];
    fill_scratch(&mut cipher, &mut scratch);
    mix(&mut cipher, &mut scratch, &mut state);

    state
}

/// Each block is the encryption of the block before it; the first block
/// encrypts zeros. The keystream counter advances once per block.
fn fill_scratch(cipher: &mut Salsa20, scratch: &mut [u8]) {
    cipher.apply_keystream(&mut scratch[..BLOCK_LEN]);
    for offset in (BLOCK_LEN..scratch.len()).step_by(BLOCK_LEN) {
        scratch.copy_within(offset - BLOCK_LEN..offset, offset);
        cipher.apply_keystream(&mut scratch[offset..offset + BLOCK_LEN]);
    }
}

/// Walk the scratch buffer two words at a time, swapping a state word with
/// a buffer word chosen by the pair, and re-encrypting the state after
/// every swap.
fn mix(cipher: &mut Salsa20, scratch: &mut [u8], state: &mut [u8; DIGEST_LEN]) {
    let words = scratch.len() / WORD_LEN;
    let mut word = 0;
    while word + 1 < words {
        let state_idx = (read_word(scratch, word) % STATE_WORDS) as usize * WORD_LEN;
        let scratch_idx = (read_word(scratch, word + 1) % MEMORY_WORDS) as usize * WORD_LEN;
        word += 2;

        let mut held = [0u8; WORD_LEN];
        held.copy_from_slice(&scratch[scratch_idx..scratch_idx + WORD_LEN]);
        scratch[scratch_idx..scratch_idx + WORD_LEN]
            .copy_from_slice(&state[state_idx..state_idx + WORD_LEN]);
        state[state_idx..state_idx + WORD_LEN].copy_from_slice(&held);

        cipher.apply_keystream(state);
    }
}

fn read_word(buffer: &[u8], word: usize) -> u64 {
    let mut bytes = [0u8; WORD_LEN];
    bytes.copy_from_slice(&buffer[word * WORD_LEN..(word + 1) * WORD_LEN]);
    u64::from_be_bytes(bytes)
}

/// Address carried by a digest: its five low-order bytes.
pub fn address_from_digest(digest: &[u8; DIGEST_LEN]) -> [u8; ADDRESS_LEN] {
    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&digest[DIGEST_LEN - ADDRESS_LEN..]);
    address
}

/// Derive a node address from a public key.
pub fn derive_address(public_key: &[u8]) -> [u8; ADDRESS_LEN] {
    address_from_digest(&memory_hard_hash(public_key))
}

/// Whether a digest satisfies the identity work criterion.
pub fn hashcash_ok(digest: &[u8; DIGEST_LEN]) -> bool {
    digest[0] < HASHCASH_FIRST_BYTE_LESS_THAN
}

/// Reserved addresses can never belong to a node.
pub fn is_reserved_address(address: &[u8; ADDRESS_LEN]) -> bool {
    address[0] == RESERVED_ADDRESS_PREFIX || address.iter().all(|b| *b == 0)
}
