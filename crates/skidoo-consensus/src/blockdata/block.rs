//! Block headers for the Skidoo network.
//!
//! A Skidoo header is Bitcoin's fixed 80-byte header plus, when the version
//! flag bit says so, an attached auxiliary proof-of-work record. The block
//! hash covers only the fixed fields; the auxpow payload is proof material,
//! not part of the hash preimage.

use bitcoin::block::Header as InnerHeader;
use bitcoin::{BlockHash, CompactTarget};
use serde::{Deserialize, Serialize};

use crate::auxpow::AuxPow;
use crate::consensus::{Decodable, Encodable, EncodeDecodeError};
use crate::io::{Error as IoError, Read, Write};

/// Version bit flagging that the header carries an auxiliary proof-of-work.
pub const VERSION_AUXPOW_FLAG: i32 = 1 << 8;

/// First version bit of the chain identifier; everything from this bit up is
/// the chain ID of the network the block was mined for.
pub const VERSION_CHAIN_START: i32 = 1 << 16;

/// Assembles a header version from its parts.
pub fn make_version(base: i32, chain_id: i32, aux_pow: bool) -> i32 {
    base + chain_id * VERSION_CHAIN_START + if aux_pow { VERSION_AUXPOW_FLAG } else { 0 }
}

/// The chain identifier carried in a header version.
pub fn version_chain_id(version: i32) -> i32 {
    version / VERSION_CHAIN_START
}

/// Whether a header version flags an attached auxiliary proof-of-work.
pub fn version_has_auxpow(version: i32) -> bool {
    version & VERSION_AUXPOW_FLAG != 0
}

/// A Skidoo block header.
///
/// Wraps the fixed 80-byte header and the optional auxpow record. The two are
/// kept consistent by construction: [`BlockHeader::new`] for plain headers,
/// [`BlockHeader::with_aux_pow`] for merged-mined ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    inner: InnerHeader,
    aux_pow: Option<AuxPow>,
}

impl BlockHeader {
    /// Creates a header without an auxiliary proof-of-work.
    ///
    /// # Panics
    ///
    /// Panics if `inner`'s version carries the auxpow flag; such a header
    /// must be built with [`BlockHeader::with_aux_pow`].
    pub fn new(inner: InnerHeader) -> Self {
        assert!(
            !version_has_auxpow(inner.version.to_consensus()),
            "auxpow version flag set on a header constructed without a payload"
        );
        BlockHeader {
            inner,
            aux_pow: None,
        }
    }

    /// Creates a header carrying an auxiliary proof-of-work.
    ///
    /// # Panics
    ///
    /// Panics if `inner`'s version does not carry the auxpow flag.
    pub fn with_aux_pow(inner: InnerHeader, aux_pow: AuxPow) -> Self {
        assert!(
            version_has_auxpow(inner.version.to_consensus()),
            "auxpow payload attached to a header whose version does not flag it"
        );
        BlockHeader {
            inner,
            aux_pow: Some(aux_pow),
        }
    }

    /// The fixed header fields.
    pub fn inner(&self) -> &InnerHeader {
        &self.inner
    }

    /// The raw header version.
    pub fn version(&self) -> i32 {
        self.inner.version.to_consensus()
    }

    /// The chain identifier encoded in the version.
    pub fn chain_id(&self) -> i32 {
        version_chain_id(self.version())
    }

    /// Whether the version flags an auxiliary proof-of-work.
    pub fn is_auxpow(&self) -> bool {
        version_has_auxpow(self.version())
    }

    /// The attached auxiliary proof-of-work, if any.
    pub fn aux_pow(&self) -> Option<&AuxPow> {
        self.aux_pow.as_ref()
    }

    /// The block hash: double-SHA256 of the 80 fixed header bytes only.
    pub fn block_hash(&self) -> BlockHash {
        self.inner.block_hash()
    }

    /// The compact difficulty target.
    pub fn bits(&self) -> CompactTarget {
        self.inner.bits
    }

    /// The miner-claimed timestamp.
    pub fn time(&self) -> u32 {
        self.inner.time
    }

    /// The previous block's hash.
    pub fn prev_blockhash(&self) -> BlockHash {
        self.inner.prev_blockhash
    }
}

impl Encodable for BlockHeader {
    fn consensus_encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, IoError> {
        let mut len = self.inner.consensus_encode(writer)?;
        // The version flag bit, not record length, signals auxpow presence.
        if let Some(ref aux_pow) = self.aux_pow {
            len += aux_pow.consensus_encode(writer)?;
        }
        Ok(len)
    }
}

impl Decodable for BlockHeader {
    fn consensus_decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, EncodeDecodeError> {
        let inner = InnerHeader::consensus_decode(reader)?;
        let aux_pow = if version_has_auxpow(inner.version.to_consensus()) {
            Some(AuxPow::consensus_decode(reader)?)
        } else {
            None
        };
        Ok(BlockHeader { inner, aux_pow })
    }
}
