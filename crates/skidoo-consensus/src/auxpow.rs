//! Auxiliary proof-of-work: merged mining against a parent chain.
//!
//! A merged-mined Skidoo block does not carry a winning hash of its own.
//! Instead it attaches an [`AuxPow`] record proving that its hash was
//! committed inside the coinbase transaction of a validly mined parent-chain
//! block: the coinbase scriptSig embeds the root of a small "chain merkle
//! tree" whose leaves are the block hashes of the merged chains, each chain
//! pinned to one slot derived from its chain ID.
//!
//! Verification never trusts positions the miner declares: the leaf slot is
//! re-derived from the embedded nonce and the chain ID, and a coinbase script
//! that could anchor more than one candidate root is rejected outright.

use bitcoin::block::Header as InnerHeader;
use bitcoin::{BlockHash, Transaction, TxMerkleNode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blockdata::block::version_chain_id;
use crate::consensus::{Decodable, Encodable, EncodeDecodeError, VarInt};
use crate::consensus::params::Params;
use crate::hashes::{combine_hashes, Hash};
use crate::io::{Error as IoError, Read, Write};
use crate::pow::check_proof_of_work;

/// Marker preceding the chain merkle root in a merged-mining coinbase
/// scriptSig: `0xfa 0xbe 'm' 'm'`.
pub const MERGED_MINING_HEADER: [u8; 4] = [0xfa, 0xbe, 0x6d, 0x6d];

/// Upper bound on the chain merkle branch length; a tree this deep already
/// holds a billion merged chains.
pub const MAX_CHAIN_MERKLE_BRANCH_LENGTH: usize = 30;

/// Decode-time sanity cap on merkle branch lengths.
const MAX_DECODED_BRANCH_LENGTH: u64 = 64;

/// Without a merged-mining marker, the chain merkle root must start within
/// this many bytes of the coinbase script (legacy embedding).
const UNMARKED_ROOT_WINDOW: usize = 20;

/// An auxiliary proof-of-work record, attached to a block header whose
/// version carries the auxpow flag.
///
/// The record is self-contained: it ships the parent coinbase transaction,
/// the merkle branch placing that coinbase in the parent block, the chain
/// merkle branch placing our block hash under the committed root, and the
/// full parent header. The parent header slot is always serialized so the
/// record size stays uniform; presence of the whole record is signaled by the
/// header version bit, never by record length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxPow {
    /// The parent chain's coinbase transaction carrying the commitment.
    pub coinbase_tx: Transaction,
    /// Hash of the parent block the coinbase belongs to.
    pub parent_hash: BlockHash,
    /// Merkle branch proving the coinbase is in the parent block.
    pub coinbase_branch: Vec<TxMerkleNode>,
    /// Position of the coinbase in the parent block's transaction tree.
    /// Must be 0: only the first transaction can be a coinbase.
    pub coinbase_index: u32,
    /// Merkle branch from our block hash up to the committed chain root.
    pub chain_merkle_branch: Vec<BlockHash>,
    /// Leaf slot of our chain in the chain merkle tree.
    pub chain_index: u32,
    /// The parent block's header, always present.
    pub parent_header: InnerHeader,
}

impl AuxPow {
    /// Hash of the parent block this proof is anchored in.
    pub fn parent_block_hash(&self) -> BlockHash {
        self.parent_header.block_hash()
    }

    /// Verifies this proof for the block `aux_block_hash` of the chain
    /// `chain_id`.
    ///
    /// Returns `false` on any structural violation; a failed proof is
    /// permanently invalid and callers must reject the block, never retry.
    pub fn check(&self, aux_block_hash: BlockHash, chain_id: i32, params: &Params) -> bool {
        if self.coinbase_index != 0 {
            debug!("auxpow rejected: coinbase is not the first transaction in the parent block");
            return false;
        }
        if self.parent_hash != self.parent_header.block_hash() {
            debug!("auxpow rejected: stored parent hash does not match the parent header");
            return false;
        }
        if version_chain_id(self.parent_header.version.to_consensus()) == chain_id {
            debug!("auxpow rejected: parent block carries our own chain ID");
            return false;
        }
        if self.chain_merkle_branch.len() > MAX_CHAIN_MERKLE_BRANCH_LENGTH {
            debug!("auxpow rejected: chain merkle branch too long");
            return false;
        }

        let mut chain_root = check_merkle_branch(
            aux_block_hash.to_byte_array(),
            self.chain_merkle_branch.iter().map(|hash| hash.to_byte_array()),
            self.chain_index,
        );
        // The root is embedded in the script in reversed byte order.
        chain_root.reverse();

        let Some(input) = self.coinbase_tx.input.first() else {
            debug!("auxpow rejected: parent coinbase has no input");
            return false;
        };
        let script = input.script_sig.as_bytes();

        let root_pos = match find_subslice(script, &MERGED_MINING_HEADER) {
            Some(header_pos) => {
                if find_subslice(&script[header_pos + 1..], &MERGED_MINING_HEADER).is_some() {
                    debug!("auxpow rejected: multiple merged mining markers in coinbase");
                    return false;
                }
                let root_pos = header_pos + MERGED_MINING_HEADER.len();
                if script.get(root_pos..root_pos + 32) != Some(&chain_root[..]) {
                    debug!("auxpow rejected: chain merkle root does not follow the marker");
                    return false;
                }
                root_pos
            }
            None => {
                let Some(root_pos) = find_subslice(script, &chain_root) else {
                    debug!("auxpow rejected: chain merkle root missing from coinbase script");
                    return false;
                };
                if root_pos > UNMARKED_ROOT_WINDOW {
                    debug!("auxpow rejected: unmarked chain merkle root buried in the script");
                    return false;
                }
                root_pos
            }
        };

        let Some(tail) = script.get(root_pos + 32..root_pos + 40) else {
            debug!("auxpow rejected: coinbase script ends before the size and nonce fields");
            return false;
        };
        let declared_size = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
        let nonce = u32::from_le_bytes([tail[4], tail[5], tail[6], tail[7]]);

        let merkle_height = self.chain_merkle_branch.len() as u32;
        if declared_size != 1u32 << merkle_height {
            debug!("auxpow rejected: declared merkle size inconsistent with branch length");
            return false;
        }
        if self.chain_index != expected_index(nonce, chain_id, merkle_height) {
            debug!("auxpow rejected: chain index does not match its derived slot");
            return false;
        }

        let coinbase_root = check_merkle_branch(
            self.coinbase_tx.compute_txid().to_byte_array(),
            self.coinbase_branch.iter().map(|node| node.to_byte_array()),
            self.coinbase_index,
        );
        if coinbase_root != self.parent_header.merkle_root.to_byte_array() {
            debug!("auxpow rejected: coinbase transaction not under the parent merkle root");
            return false;
        }

        if !check_proof_of_work(&self.parent_header.block_hash(), self.parent_header.bits, params)
        {
            debug!("auxpow rejected: parent block fails its own proof of work");
            return false;
        }

        true
    }
}

impl Encodable for AuxPow {
    fn consensus_encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, IoError> {
        let mut len = 0;
        len += self.coinbase_tx.consensus_encode(writer)?;
        len += self.parent_hash.consensus_encode(writer)?;
        len += VarInt(self.coinbase_branch.len() as u64).consensus_encode(writer)?;
        for node in &self.coinbase_branch {
            len += node.consensus_encode(writer)?;
        }
        len += self.coinbase_index.consensus_encode(writer)?;
        len += VarInt(self.chain_merkle_branch.len() as u64).consensus_encode(writer)?;
        for hash in &self.chain_merkle_branch {
            len += hash.consensus_encode(writer)?;
        }
        len += self.chain_index.consensus_encode(writer)?;
        len += self.parent_header.consensus_encode(writer)?;
        Ok(len)
    }
}

impl Decodable for AuxPow {
    fn consensus_decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, EncodeDecodeError> {
        let coinbase_tx = Transaction::consensus_decode(reader)?;
        let parent_hash = BlockHash::consensus_decode(reader)?;
        let coinbase_branch = decode_branch::<TxMerkleNode, R>(reader)?;
        let coinbase_index = u32::consensus_decode(reader)?;
        let chain_merkle_branch = decode_branch::<BlockHash, R>(reader)?;
        let chain_index = u32::consensus_decode(reader)?;
        let parent_header = InnerHeader::consensus_decode(reader)?;
        Ok(AuxPow {
            coinbase_tx,
            parent_hash,
            coinbase_branch,
            coinbase_index,
            chain_merkle_branch,
            chain_index,
            parent_header,
        })
    }
}

fn decode_branch<T: Decodable, R: Read + ?Sized>(
    reader: &mut R,
) -> Result<Vec<T>, EncodeDecodeError> {
    let len = VarInt::consensus_decode(reader)?.0;
    if len > MAX_DECODED_BRANCH_LENGTH {
        return Err(EncodeDecodeError::ParseFailed("merkle branch too long"));
    }
    let mut branch = Vec::with_capacity(len as usize);
    for _ in 0..len {
        branch.push(T::consensus_decode(reader)?);
    }
    Ok(branch)
}

/// Reconstructs a merkle root from a leaf, its sibling branch and its index.
///
/// At each level the current hash combines with the next sibling, ordered by
/// the parity of the running index, which is then halved.
pub(crate) fn check_merkle_branch<I>(leaf: [u8; 32], branch: I, index: u32) -> [u8; 32]
where
    I: IntoIterator<Item = [u8; 32]>,
{
    let mut hash = leaf;
    let mut index = index;
    for sibling in branch {
        if index & 1 == 1 {
            hash = combine_hashes(&sibling, &hash);
        } else {
            hash = combine_hashes(&hash, &sibling);
        }
        index >>= 1;
    }
    hash
}

/// Derives the one chain merkle slot a chain may occupy in a tree of height
/// `merkle_height`, from the miner-chosen nonce and the chain ID.
///
/// Two LCG steps over wrapping 32-bit arithmetic; the classic merged-mining
/// derivation. Pinning the slot prevents a parent block from proving the
/// same work for one chain in several slots, or for two chains in one slot.
pub(crate) fn expected_index(nonce: u32, chain_id: i32, merkle_height: u32) -> u32 {
    let mut rand = nonce;
    rand = rand.wrapping_mul(1_103_515_245).wrapping_add(12345);
    rand = rand.wrapping_add(chain_id as u32);
    rand = rand.wrapping_mul(1_103_515_245).wrapping_add(12345);
    rand % (1u32 << merkle_height)
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
