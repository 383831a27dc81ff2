//! Root endpoints: an IP address and UDP port, text form `<ip>/<port>`.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::buffer::{Reader, Writer};
use crate::error::{WorldError, WorldResult};

const FAMILY_IPV4: u8 = 4;
const FAMILY_IPV6: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub ip: IpAddr,
    pub port: u16,
}

impl Endpoint {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    pub fn parse(text: &str) -> WorldResult<Self> {
        let text = text.trim();
        let mut parts = text.split('/');
        let (Some(ip), Some(port), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(WorldError::InvalidEndpoint(format!(
                "'{}' is not of the form <ip>/<port>",
                text
            )));
        };

        let ip: IpAddr = ip
            .parse()
            .map_err(|e| WorldError::InvalidEndpoint(format!("bad IP '{}': {}", ip, e)))?;
        let port: u16 = port
            .parse()
            .map_err(|e| WorldError::InvalidEndpoint(format!("bad port '{}': {}", port, e)))?;

        Ok(Self::new(ip, port))
    }

    /// Encoded size in bytes.
    #[cfg(test)]
    pub(crate) fn serialized_len(&self) -> usize {
        match self.ip {
            IpAddr::V4(_) => 1 + 4 + 2,
            IpAddr::V6(_) => 1 + 16 + 2,
        }
    }

    pub(crate) fn write(&self, writer: &mut Writer) -> WorldResult<()> {
        match self.ip {
            IpAddr::V4(ip) => {
                writer.append_u8(FAMILY_IPV4)?;
                writer.append(&ip.octets())?;
            }
            IpAddr::V6(ip) => {
                writer.append_u8(FAMILY_IPV6)?;
                writer.append(&ip.octets())?;
            }
        }
        writer.append_u16(self.port)
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> WorldResult<Self> {
        let ip = match reader.read_u8()? {
            FAMILY_IPV4 => IpAddr::V4(Ipv4Addr::from(reader.read_array::<4>()?)),
            FAMILY_IPV6 => IpAddr::V6(Ipv6Addr::from(reader.read_array::<16>()?)),
            other => {
                return Err(WorldError::Malformed(format!(
                    "unknown endpoint address family {}",
                    other
                )))
            }
        };
        let port = reader.read_u16()?;
        Ok(Self::new(ip, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
