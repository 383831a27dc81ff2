//! World codec and generation for ztworld.
//!
//! A World is the signed binary record that tells a peer-to-peer network
//! client which root servers to trust. This crate parses root identities and
//! endpoints, assembles and serializes Worlds in canonical (to-be-signed) and
//! final form, decodes and verifies existing Worlds, and drives end-to-end
//! planet generation including the on-disk artifacts.
//!
//! # Example
//! ```no_run
//! use ztworld_world::{generate_planet, GenerationRequest};
//!
//! let request = GenerationRequest {
//!     identity: format!("1234567890:0:{}", "aa".repeat(32)),
//!     endpoints: vec!["203.0.113.5/9993".to_string()],
//!     comment: "primary root".to_string(),
//!     output_path: Some("planet".into()),
//! };
//! let result = generate_planet(&request)?;
//! println!("world {} ({} bytes)", result.world_id, result.bytes.len());
//! # Ok::<(), ztworld_world::WorldError>(())
//! ```

mod buffer;
pub mod endpoint;
pub mod error;
pub mod identity;
pub mod keyfile;
pub mod planet;
pub mod world;

pub use endpoint::Endpoint;
pub use error::{WorldError, WorldResult};
pub use identity::{NodeIdentity, IDENTITY_PUBLIC_KEY_LEN};
pub use planet::{
    generate_moon, generate_planet, generate_world_update, GenerationRequest, GenerationResult,
    GenerationSummary,
};
pub use world::{
    Root, World, WorldType, MAX_ENDPOINTS_PER_ROOT, MAX_ROOTS, MAX_SERIALIZED_LENGTH,
};
