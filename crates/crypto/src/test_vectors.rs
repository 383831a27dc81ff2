//! Fixed test vectors for the memory-hard hash and the signing engine.
//!
//! The expected values were computed independently of this crate and pin the
//! exact behaviour of the identity hash and the curve-key signature.

/// Public key used for the memory-hard hash regression.
pub const GOLDEN_PUBLIC_KEY: [u8; 32] = [0xaa; 32];

/// Memory-hard digest of [`GOLDEN_PUBLIC_KEY`].
pub const GOLDEN_DIGEST_HEX: &str = concat!(
    "f883a00de0a910741a89809fc2515665dadb647ea81d6d4ebd201c235bc46644",
    "559126c9d0c25dfc8c52b83cef996463787337427eaaf1167c78d71cafb84162",
);

/// Address derived from [`GOLDEN_DIGEST_HEX`].
pub const GOLDEN_ADDRESS_HEX: &str = "1cafb84162";

/// Fixed private scalar for signing vectors (32 bytes)
///
/// ⚠️ WARNING: DO NOT USE IN PRODUCTION ⚠️
///
/// This key is ONLY for reproducible test vectors and is publicly known.
pub const TEST_VECTOR_PRIVATE_KEY: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c, 0xc4,
    0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae, 0x7f, 0x60,
];

/// Curve25519 public point for [`TEST_VECTOR_PRIVATE_KEY`].
pub const TEST_VECTOR_PUBLIC_KEY_HEX: &str =
    "b755ced64d4a27ce32afcf199f18a3ed1f31897028b0ff6e55191ea449db2644";

/// Edwards form of the same point (its sign bit is set).
pub const TEST_VECTOR_EDWARDS_KEY_HEX: &str =
    "6bcd13f34666025085b004be4fb290add223afb6fb3c3962d61885c71ac6a2dc";

/// Message signed for [`TEST_VECTOR_SIGNATURE_HEX`].
pub const TEST_VECTOR_MESSAGE: &[u8] = b"worldgen signing vector";

/// First 32 bytes of SHA-512 over [`TEST_VECTOR_MESSAGE`].
pub const TEST_VECTOR_DIGEST_HEX: &str =
    "5c21dbba7da10c30139f2249c964487079f2441806d722325f721f41281a77c0";

/// Signature over [`TEST_VECTOR_MESSAGE`] by [`TEST_VECTOR_PRIVATE_KEY`].
pub const TEST_VECTOR_SIGNATURE_HEX: &str = concat!(
    "dbb62cbc288acee251cba889a1fbba38d728f1b4df307f57d820ed1c110b1218",
    "fe421779731efcbd74e2923b570e7602473939876ba47dd8ce4d63323f3b9306",
);
