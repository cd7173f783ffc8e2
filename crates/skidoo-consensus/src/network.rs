use std::str::FromStr;

use thiserror::Error;

use crate::consensus::{Decodable, Encodable};
use crate::io::{Error as IoError, Read, Write};

/// Errors that can occur when parsing a network identifier.
#[derive(Clone, Debug, Error)]
pub enum NetworkIdError {
    /// The provided network identifier string is invalid.
    #[error("Invalid network identifier: {0}")]
    InvalidNetworkId(String),
}

/// The Skidoo network variants.
///
/// Selection of one of these drives every network-dependent consensus
/// constant: magic bytes, proof-of-work limits, fork heights, activation
/// heights and the genesis block. An unrecognized identifier is rejected by
/// [`Network::try_from`] before any parameter can be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Network {
    /// Mainnet Skidoo network.
    Mainnet,
    /// Testnet Skidoo network.
    Testnet,
    /// Regtest Skidoo network.
    Regtest,
    /// Unit-test network: mainnet parameters with test-only overrides.
    Unittest,
}

impl Network {
    /// Converts a magic value to the corresponding Network variant.
    ///
    /// # Arguments
    ///
    /// * `magic` - The magic bytes to convert
    ///
    /// # Returns
    ///
    /// * `Some(Network)` - The corresponding network if the magic is recognized
    /// * `None` - If the magic bytes don't match any known network
    ///
    /// The unit-test network shares mainnet's magic, so it never comes back
    /// out of this conversion.
    pub fn from_magic(magic: Magic) -> Option<Network> {
        Network::try_from(magic).ok()
    }

    /// Returns the magic bytes for this network.
    pub fn magic(self) -> Magic {
        Magic::from(self)
    }

    /// Returns the string representation of this network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "main",
            Network::Testnet => "test",
            Network::Regtest => "regtest",
            Network::Unittest => "unittest",
        }
    }
}

impl FromStr for Network {
    type Err = NetworkIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::try_from(s)
    }
}

impl TryFrom<&str> for Network {
    type Error = NetworkIdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "main" | "mainnet" => Ok(Network::Mainnet),
            "test" | "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            "unittest" => Ok(Network::Unittest),
            other => Err(NetworkIdError::InvalidNetworkId(other.to_string())),
        }
    }
}

impl TryFrom<String> for Network {
    type Error = NetworkIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Network::try_from(s.as_str())
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network magic bytes identifying which Skidoo network a message or record
/// belongs to.
///
/// The byte sequences are chosen to be unlikely in normal data: rarely used
/// values that are not valid UTF-8 and produce a large 4-byte integer at any
/// alignment.
#[derive(Debug, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Magic([u8; 4]);

impl Magic {
    /// Skidoo main network magic bytes.
    pub const MAINNET: Self = Self([0x02, 0x03, 0x02, 0x03]);
    /// Skidoo regression test network magic bytes.
    pub const REGTEST: Self = Self([0x04, 0x03, 0x02, 0x01]);
    /// Skidoo test network magic bytes.
    pub const TESTNET: Self = Self([0x01, 0xfe, 0xfe, 0x05]);

    /// Returns the magic bytes as a 4-byte array.
    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Creates a Magic instance from a raw 4-byte array.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Magic(bytes)
    }
}

impl From<Network> for Magic {
    fn from(network: Network) -> Self {
        match network {
            Network::Mainnet => Magic::MAINNET,
            Network::Testnet => Magic::TESTNET,
            Network::Regtest => Magic::REGTEST,
            // The unit-test network inherits mainnet's message start.
            Network::Unittest => Magic::MAINNET,
        }
    }
}

impl std::fmt::Display for Magic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        hex::encode(self.0).fmt(f)
    }
}

impl Encodable for Magic {
    fn consensus_encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, IoError> {
        self.0.consensus_encode(writer)
    }
}

impl Decodable for Magic {
    fn consensus_decode<R: Read + ?Sized>(
        reader: &mut R,
    ) -> Result<Self, bitcoin::consensus::encode::Error> {
        Ok(Magic(Decodable::consensus_decode(reader)?))
    }
}

/// Errors that can occur when working with magic bytes.
#[derive(Debug, PartialEq, Clone, Copy, Error)]
pub enum MagicError {
    /// The magic bytes don't correspond to any known network.
    #[error("unknown network magic: {0}")]
    UnknownMagic(Magic),
}

impl TryFrom<Magic> for Network {
    type Error = MagicError;

    fn try_from(magic: Magic) -> Result<Self, Self::Error> {
        match magic {
            Magic::MAINNET => Ok(Network::Mainnet),
            Magic::TESTNET => Ok(Network::Testnet),
            Magic::REGTEST => Ok(Network::Regtest),
            _ => Err(MagicError::UnknownMagic(magic)),
        }
    }
}
