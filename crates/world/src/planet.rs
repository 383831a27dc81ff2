//! End-to-end World generation.
//!
//! Parses the caller's identity and endpoint text, mints signing key
//! material, signs the canonical form and returns (and optionally writes)
//! the final bytes.

use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ztworld_crypto::{fill_random, SigningKeyPair};

use crate::endpoint::Endpoint;
use crate::error::{WorldError, WorldResult};
use crate::identity::NodeIdentity;
use crate::keyfile;
use crate::world::{Root, World, WorldType};

/// Input to a generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Identity-public text of the single root
    pub identity: String,
    /// `<ip>/<port>` strings; may be empty
    pub endpoints: Vec<String>,
    /// Caller metadata; never serialized into the World
    pub comment: String,
    /// When set, the final bytes are written here
    pub output_path: Option<PathBuf>,
}

/// Output of a generation call.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub bytes: Vec<u8>,
    pub world_type: WorldType,
    pub world_id: u64,
    pub timestamp: u64,
    /// Text form of the generated root's identity
    pub identity: String,
    pub comment: String,
    /// Key that signed this World and must sign its next revision
    pub signing_key: SigningKeyPair,
}

/// Serializable view of a [`GenerationResult`], without key material.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub world_type: &'static str,
    pub world_id: u64,
    pub timestamp: u64,
    pub identity: String,
    pub comment: String,
    pub size: usize,
    pub signer: String,
}

impl GenerationResult {
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            world_type: self.world_type.name(),
            world_id: self.world_id,
            timestamp: self.timestamp,
            identity: self.identity.clone(),
            comment: self.comment.clone(),
            size: self.bytes.len(),
            signer: hex::encode(self.signing_key.public()),
        }
    }
}

/// Generate a planet with one root, signed by a fresh keypair that is also
/// named as the signer of the next revision.
pub fn generate_planet(request: &GenerationRequest) -> WorldResult<GenerationResult> {
    generate_world(WorldType::Planet, request)
}

/// Same as [`generate_planet`], producing a moon.
pub fn generate_moon(request: &GenerationRequest) -> WorldResult<GenerationResult> {
    generate_world(WorldType::Moon, request)
}

fn generate_world(
    world_type: WorldType,
    request: &GenerationRequest,
) -> WorldResult<GenerationResult> {
    let root = parse_root(request)?;
    let signing_key = SigningKeyPair::generate()?;
    let current = signing_key.clone();
    generate_world_with_keys(world_type, root, request, &signing_key, current)
}

/// Generate a World signed by `previous` that names `current` as the signer
/// of the next revision.
pub fn generate_world_update(
    world_type: WorldType,
    request: &GenerationRequest,
    previous: &SigningKeyPair,
    current: SigningKeyPair,
) -> WorldResult<GenerationResult> {
    let root = parse_root(request)?;
    generate_world_with_keys(world_type, root, request, previous, current)
}

fn parse_root(request: &GenerationRequest) -> WorldResult<Root> {
    let identity = NodeIdentity::parse(&request.identity).map_err(|e| {
        tracing::warn!(error = %e, "rejected root identity");
        e
    })?;
    let endpoints = request
        .endpoints
        .iter()
        .map(|text| Endpoint::parse(text))
        .collect::<WorldResult<Vec<_>>>()
        .map_err(|e| {
            tracing::warn!(error = %e, "rejected root endpoint");
            e
        })?;
    Root::new(identity, endpoints)
}

fn generate_world_with_keys(
    world_type: WorldType,
    root: Root,
    request: &GenerationRequest,
    previous: &SigningKeyPair,
    current: SigningKeyPair,
) -> WorldResult<GenerationResult> {
    if world_type == WorldType::Null {
        return Err(WorldError::Unknown(
            "cannot generate a world of the reserved null type".to_string(),
        ));
    }

    let world_id = random_world_id()?;
    let timestamp = current_timestamp_ms();
    let identity = root.identity().to_string();

    let world = World::new(
        world_type,
        world_id,
        timestamp,
        *current.public(),
        vec![root],
    )?
    .sign_with(previous)?;
    let bytes = world.to_bytes()?;

    if let Some(path) = &request.output_path {
        keyfile::write_world(path, &bytes)?;
    }

    tracing::info!(
        world_type = world_type.name(),
        world_id,
        timestamp,
        size = bytes.len(),
        "generated world"
    );

    Ok(GenerationResult {
        bytes,
        world_type,
        world_id,
        timestamp,
        identity,
        comment: request.comment.clone(),
        signing_key: current,
    })
}

/// Four random bytes read as a big-endian `u32`.
fn random_world_id() -> WorldResult<u64> {
    let mut bytes = [0u8; 4];
    fill_random(&mut bytes)?;
    Ok(u32::from_be_bytes(bytes) as u64)
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis()
        .min(u64::MAX as u128) as u64
}
