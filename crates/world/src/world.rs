//! The World record: the signed list of root servers a client trusts.
//!
//! # Layout
//!
//! Big-endian throughout. Fields marked *canonical* appear only in the
//! to-be-signed form, *final* only in the signed record.
//!
//! ```text
//! [canonical] u64  0x7f7f7f7f7f7f7f7f
//!             u8   world type
//!             u64  world id
//!             u64  timestamp (ms)
//!             [32] public key that must sign the next revision
//! [final]     [64] signature (omitted when unsigned)
//!             u8   root count
//!             per root:
//!               [5] address, u8 0, [32] public key, u8 0
//!               u8  endpoint count
//!               per endpoint: u8 family (4|6), [4|16] ip, u16 port
//! [moon]      u16  0
//! [canonical] u64  0xf7f7f7f7f7f7f7f7
//! ```

use ztworld_crypto::{sign_with, verify, SigningKeyPair, KEY_LEN, SIGNATURE_LEN};

use crate::buffer::{Reader, Writer};
use crate::endpoint::Endpoint;
use crate::error::{WorldError, WorldResult};
use crate::identity::NodeIdentity;

/// Maximum number of roots in a World.
pub const MAX_ROOTS: usize = 4;

/// Maximum number of endpoints per root.
pub const MAX_ENDPOINTS_PER_ROOT: usize = 32;

/// Upper bound on the length of either serialized form.
pub const MAX_SERIALIZED_LENGTH: usize =
    ((1024 + (32 * MAX_ENDPOINTS_PER_ROOT)) * MAX_ROOTS) + KEY_LEN + SIGNATURE_LEN + 128;

const CANONICAL_PREFIX: u64 = 0x7f7f_7f7f_7f7f_7f7f;
const CANONICAL_SUFFIX: u64 = 0xf7f7_f7f7_f7f7_f7f7;

/// Root-set family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorldType {
    /// Reserved
    Null = 0,
    /// The canonical root-server set
    Planet = 1,
    /// A supplementary root set
    Moon = 127,
}

impl WorldType {
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Null),
            1 => Some(Self::Planet),
            127 => Some(Self::Moon),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Planet => "planet",
            Self::Moon => "moon",
        }
    }
}

/// A trusted server and the endpoints it is reachable at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    identity: NodeIdentity,
    endpoints: Vec<Endpoint>,
}

impl Root {
    pub fn new(identity: NodeIdentity, endpoints: Vec<Endpoint>) -> WorldResult<Self> {
        check_endpoint_count(endpoints.len())?;
        Ok(Self {
            identity,
            endpoints,
        })
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    fn write(&self, writer: &mut Writer) -> WorldResult<()> {
        check_endpoint_count(self.endpoints.len())?;
        self.identity.write(writer)?;
        writer.append_u8(self.endpoints.len() as u8)?;
        for endpoint in &self.endpoints {
            endpoint.write(writer)?;
        }
        Ok(())
    }

    fn read(reader: &mut Reader<'_>) -> WorldResult<Self> {
        let identity = NodeIdentity::read(reader)?;
        let count = reader.read_u8()? as usize;
        check_endpoint_count(count)?;
        let endpoints = (0..count)
            .map(|_| Endpoint::read(reader))
            .collect::<WorldResult<Vec<_>>>()?;
        Ok(Self {
            identity,
            endpoints,
        })
    }
}

fn check_endpoint_count(count: usize) -> WorldResult<()> {
    if count > MAX_ENDPOINTS_PER_ROOT {
        return Err(WorldError::MaxEndpointsExceeded {
            count,
            max: MAX_ENDPOINTS_PER_ROOT,
        });
    }
    Ok(())
}

fn check_root_count(count: usize) -> WorldResult<()> {
    if count > MAX_ROOTS {
        return Err(WorldError::SerializedDataTooLarge(format!(
            "{} roots exceeds maximum of {}",
            count, MAX_ROOTS
        )));
    }
    Ok(())
}

/// A trust-anchor record. Immutable once signed; a new revision is a new
/// World with a new id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    world_type: WorldType,
    id: u64,
    timestamp: u64,
    updates_must_be_signed_by: [u8; KEY_LEN],
    signature: Option<[u8; SIGNATURE_LEN]>,
    roots: Vec<Root>,
}

impl World {
    /// Assemble an unsigned World. Fails before any bytes are produced if
    /// there are too many roots.
    pub fn new(
        world_type: WorldType,
        id: u64,
        timestamp: u64,
        updates_must_be_signed_by: [u8; KEY_LEN],
        roots: Vec<Root>,
    ) -> WorldResult<Self> {
        check_root_count(roots.len())?;
        Ok(Self {
            world_type,
            id,
            timestamp,
            updates_must_be_signed_by,
            signature: None,
            roots,
        })
    }

    pub fn world_type(&self) -> WorldType {
        self.world_type
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn updates_must_be_signed_by(&self) -> &[u8; KEY_LEN] {
        &self.updates_must_be_signed_by
    }

    pub fn signature(&self) -> Option<&[u8; SIGNATURE_LEN]> {
        self.signature.as_ref()
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Attach a signature computed elsewhere.
    pub fn with_signature(self, signature: [u8; SIGNATURE_LEN]) -> Self {
        Self {
            signature: Some(signature),
            ..self
        }
    }

    /// Sign the canonical form with `signer`.
    ///
    /// `signer` is the key named by the previous revision; for a first
    /// revision it is the key this World names itself.
    pub fn sign_with(self, signer: &SigningKeyPair) -> WorldResult<Self> {
        let canonical = self.to_canonical_bytes()?;
        let signature = sign_with(signer, &canonical)?;
        tracing::debug!(
            world_id = self.id,
            canonical_len = canonical.len(),
            "signed world"
        );
        Ok(self.with_signature(signature))
    }

    /// The sentinel-wrapped, signature-free bytes that are signed.
    pub fn to_canonical_bytes(&self) -> WorldResult<Vec<u8>> {
        self.serialize(true)
    }

    /// The final record as written to disk and served to clients.
    ///
    /// An unsigned World is written without the signature field, and
    /// [`World::decode`] does not read that form back. Sign before
    /// persisting.
    pub fn to_bytes(&self) -> WorldResult<Vec<u8>> {
        self.serialize(false)
    }

    fn serialize(&self, for_sign: bool) -> WorldResult<Vec<u8>> {
        check_root_count(self.roots.len())?;

        let mut writer = Writer::new();
        if for_sign {
            writer.append_u64(CANONICAL_PREFIX)?;
        }
        writer.append_u8(self.world_type.as_byte())?;
        writer.append_u64(self.id)?;
        writer.append_u64(self.timestamp)?;
        writer.append(&self.updates_must_be_signed_by)?;
        if !for_sign {
            if let Some(signature) = self.signature.as_ref().filter(|s| s.iter().any(|b| *b != 0))
            {
                writer.append(signature)?;
            }
        }
        writer.append_u8(self.roots.len() as u8)?;
        for root in &self.roots {
            root.write(&mut writer)?;
        }
        if self.world_type == WorldType::Moon {
            // no attached dictionary
            writer.append_u16(0)?;
        }
        if for_sign {
            writer.append_u64(CANONICAL_SUFFIX)?;
        }

        if writer.len() > MAX_SERIALIZED_LENGTH {
            return Err(WorldError::SerializedDataTooLarge(format!(
                "{} bytes exceeds maximum of {}",
                writer.len(),
                MAX_SERIALIZED_LENGTH
            )));
        }
        Ok(writer.into_vec())
    }

    /// Decode a final (signed) record.
    ///
    /// Always reads the 64 signature bytes, so the signature-less output of
    /// [`World::to_bytes`] on an unsigned World is rejected or misread. An
    /// all-zero signature field decodes as unsigned.
    pub fn decode(bytes: &[u8]) -> WorldResult<Self> {
        if bytes.len() > MAX_SERIALIZED_LENGTH {
            return Err(WorldError::SerializedDataTooLarge(format!(
                "{} bytes exceeds maximum of {}",
                bytes.len(),
                MAX_SERIALIZED_LENGTH
            )));
        }

        let mut reader = Reader::new(bytes);
        let type_byte = reader.read_u8()?;
        let world_type = WorldType::from_byte(type_byte)
            .ok_or_else(|| WorldError::Malformed(format!("unknown world type {}", type_byte)))?;
        let id = reader.read_u64()?;
        let timestamp = reader.read_u64()?;
        let updates_must_be_signed_by = reader.read_array::<KEY_LEN>()?;
        let signature = reader.read_array::<SIGNATURE_LEN>()?;

        let root_count = reader.read_u8()? as usize;
        check_root_count(root_count)?;
        let roots = (0..root_count)
            .map(|_| Root::read(&mut reader))
            .collect::<WorldResult<Vec<_>>>()?;

        if world_type == WorldType::Moon {
            let dictionary_len = reader.read_u16()?;
            if dictionary_len != 0 {
                return Err(WorldError::Malformed(format!(
                    "moon carries a {} byte dictionary",
                    dictionary_len
                )));
            }
        }

        if reader.remaining() != 0 {
            return Err(WorldError::Malformed(format!(
                "{} trailing bytes",
                reader.remaining()
            )));
        }

        let world = Self::new(world_type, id, timestamp, updates_must_be_signed_by, roots)?;
        if signature.iter().all(|b| *b == 0) {
            return Ok(world);
        }
        Ok(world.with_signature(signature))
    }

    /// Verify the signature against the key this World names for its next
    /// revision. Holds for self-signed Worlds; a revision signed by an
    /// earlier key needs [`World::verify_signature_with`].
    pub fn verify_signature(&self) -> WorldResult<()> {
        self.verify_signature_with(&self.updates_must_be_signed_by)
    }

    pub fn verify_signature_with(&self, signer: &[u8; KEY_LEN]) -> WorldResult<()> {
        let signature = self.signature.ok_or(WorldError::SignatureInvalid)?;
        let canonical = self.to_canonical_bytes()?;
        verify(signer, &canonical, &signature).map_err(|_| WorldError::SignatureInvalid)
    }
}
