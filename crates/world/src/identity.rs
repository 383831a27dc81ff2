//! Node identities as carried in a World.
//!
//! Text form: `<10 hex address>:0:<64 hex public key>[:ignored...]`.

use std::fmt;
use std::str::FromStr;

use ztworld_crypto::{address_from_digest, hashcash_ok, is_reserved_address, memory_hard_hash};

use crate::buffer::{Reader, Writer};
use crate::error::{WorldError, WorldResult};

pub use ztworld_crypto::ADDRESS_LEN;

/// Length of the public key stored for each root.
pub const IDENTITY_PUBLIC_KEY_LEN: usize = 32;

/// Identity type tag written after the address.
const IDENTITY_TYPE_C25519: u8 = 0;

/// Length of the serialized identity.
pub const IDENTITY_SERIALIZED_LEN: usize = ADDRESS_LEN + 1 + IDENTITY_PUBLIC_KEY_LEN + 1;

/// A short network address and the public key it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    address: [u8; ADDRESS_LEN],
    public_key: [u8; IDENTITY_PUBLIC_KEY_LEN],
}

impl NodeIdentity {
    pub fn new(address: [u8; ADDRESS_LEN], public_key: [u8; IDENTITY_PUBLIC_KEY_LEN]) -> Self {
        Self {
            address,
            public_key,
        }
    }

    /// Build an identity whose address is derived from `public_key` with the
    /// memory-hard hash.
    pub fn from_public_key(public_key: [u8; IDENTITY_PUBLIC_KEY_LEN]) -> Self {
        let digest = memory_hard_hash(&public_key);
        Self {
            address: address_from_digest(&digest),
            public_key,
        }
    }

    /// Parse the colon-delimited text form.
    pub fn parse(text: &str) -> WorldResult<Self> {
        let fields: Vec<&str> = text.trim().split(':').collect();
        if fields.len() < 3 {
            return Err(WorldError::InvalidIdentity(format!(
                "expected at least 3 ':'-separated fields, found {}",
                fields.len()
            )));
        }

        let address = decode_fixed::<ADDRESS_LEN>(fields[0], "address")?;
        let public_key = decode_fixed::<IDENTITY_PUBLIC_KEY_LEN>(fields[2], "public key")?;
        Ok(Self::new(address, public_key))
    }

    pub fn address(&self) -> &[u8; ADDRESS_LEN] {
        &self.address
    }

    pub fn address_hex(&self) -> String {
        hex::encode(self.address)
    }

    pub fn public_key(&self) -> &[u8; IDENTITY_PUBLIC_KEY_LEN] {
        &self.public_key
    }

    /// Recompute the memory-hard digest of the public key and check that it
    /// meets the work criterion and yields this identity's address.
    ///
    /// Costs one full memory-hard hash.
    pub fn locally_validate(&self) -> bool {
        if is_reserved_address(&self.address) {
            return false;
        }
        let digest = memory_hard_hash(&self.public_key);
        hashcash_ok(&digest) && address_from_digest(&digest) == self.address
    }

    pub(crate) fn write(&self, writer: &mut Writer) -> WorldResult<()> {
        writer.append(&self.address)?;
        writer.append_u8(IDENTITY_TYPE_C25519)?;
        writer.append(&self.public_key)?;
        // private key length: roots never carry one
        writer.append_u8(0)
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> WorldResult<Self> {
        let address = reader.read_array::<ADDRESS_LEN>()?;
        let identity_type = reader.read_u8()?;
        if identity_type != IDENTITY_TYPE_C25519 {
            return Err(WorldError::Malformed(format!(
                "unsupported identity type {}",
                identity_type
            )));
        }
        let public_key = reader.read_array::<IDENTITY_PUBLIC_KEY_LEN>()?;
        let private_len = reader.read_u8()?;
        if private_len != 0 {
            return Err(WorldError::Malformed(
                "root identity carries private key material".to_string(),
            ));
        }
        Ok(Self::new(address, public_key))
    }
}

fn decode_fixed<const N: usize>(field: &str, what: &str) -> WorldResult<[u8; N]> {
    let bytes = hex::decode(field)
        .map_err(|e| WorldError::InvalidIdentity(format!("{} is not hex: {}", what, e)))?;
    if bytes.len() != N {
        return Err(WorldError::InvalidIdentity(format!(
            "{} must be {} bytes, got {}",
            what,
            N,
            bytes.len()
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.address),
            IDENTITY_TYPE_C25519,
            hex::encode(self.public_key)
        )
    }
}

impl FromStr for NodeIdentity {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> String {
        format!("1234567890:0:{}", "aa".repeat(32))
    }

    #[test]
    fn test_parse_identity() {
        let identity = NodeIdentity::parse(&sample_text()).unwrap();
        assert_eq!(identity.address(), &[0x12, 0x34, 0x56, 0x78, 0x90]);
        assert_eq!(identity.public_key(), &[0xaa; 32]);
    }

    #[test]
    fn test_parse_ignores_trailing_fields() {
        let text = format!("{}:{}", sample_text(), "bb".repeat(32));
        let identity: NodeIdentity = text.parse().unwrap();
        assert_eq!(identity.public_key(), &[0xaa; 32]);
    }

    #[test]
    fn test_parse_rejects_too_few_fields() {
        let result = NodeIdentity::parse("1234567890:0");
        assert!(matches!(result, Err(WorldError::InvalidIdentity(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_lengths() {
        let short_address = format!("12345678:0:{}", "aa".repeat(32));
        assert!(NodeIdentity::parse(&short_address).is_err());

        let long_key = format!("1234567890:0:{}", "aa".repeat(64));
        assert!(NodeIdentity::parse(&long_key).is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let text = format!("123456789z:0:{}", "aa".repeat(32));
        assert!(matches!(
            NodeIdentity::parse(&text),
            Err(WorldError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let identity = NodeIdentity::parse(&sample_text()).unwrap();
        assert_eq!(identity.to_string(), sample_text());
    }

    #[test]
    fn test_serialized_layout() {
        let identity = NodeIdentity::parse(&sample_text()).unwrap();
        let mut writer = Writer::new();
        identity.write(&mut writer).unwrap();
        let bytes = writer.into_vec();

        assert_eq!(bytes.len(), IDENTITY_SERIALIZED_LEN);
        assert_eq!(&bytes[..5], &[0x12, 0x34, 0x56, 0x78, 0x90]);
        assert_eq!(bytes[5], 0);
        assert_eq!(&bytes[6..38], &[0xaa; 32]);
        assert_eq!(bytes[38], 0);

        let mut reader = Reader::new(&bytes);
        assert_eq!(NodeIdentity::read(&mut reader).unwrap(), identity);
    }

    #[test]
    fn test_read_rejects_private_key_material() {
        let mut bytes = vec![0x12, 0x34, 0x56, 0x78, 0x90, 0];
        bytes.extend_from_slice(&[0xaa; 32]);
        bytes.push(32);
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            NodeIdentity::read(&mut reader),
            Err(WorldError::Malformed(_))
        ));
    }

    #[test]
    fn test_derived_address_matches_hash() {
        let identity = NodeIdentity::from_public_key([0xaa; 32]);
        assert_eq!(identity.address_hex(), "1cafb84162");
    }

    #[test]
    fn test_locally_validate_rejects_mismatched_address() {
        // The address was not derived from the key.
        let identity = NodeIdentity::parse(&sample_text()).unwrap();
        assert!(!identity.locally_validate());
    }

    #[test]
    fn test_locally_validate_rejects_failed_hashcash() {
        // Digest of this key leads with 0xf8, so even the derived address is
        // not acceptable.
        let identity = NodeIdentity::from_public_key([0xaa; 32]);
        assert!(!identity.locally_validate());
    }

    #[test]
    fn test_locally_validate_accepts_derived_identity() {
        // Digest of this key meets the work criterion.
        let identity = NodeIdentity::from_public_key([43u8; 32]);
        assert!(!is_reserved_address(identity.address()));
        assert!(identity.locally_validate());

        let reparsed = NodeIdentity::parse(&identity.to_string()).unwrap();
        assert!(reparsed.locally_validate());
    }
}
