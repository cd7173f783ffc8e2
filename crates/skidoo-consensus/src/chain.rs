//! The block index consumed by the difficulty retargeter.
//!
//! Each accepted block gets one [`ChainIndexEntry`] carrying its header,
//! height and cumulative chain work, plus a weak back-reference to its
//! predecessor. The retargeter walks this structure backward a bounded number
//! of steps; it never needs forward links or random access.
//!
//! Ownership of the entries stays with the block-tree subsystem that accepts
//! blocks. The back-references are weak on purpose: the index here is
//! lookup-only and must not keep an abandoned chain alive. The caller
//! guarantees that every ancestor inside a required retarget window is still
//! committed before consensus code runs; a dangling back-reference is a
//! caller bug and aborts rather than silently substituting defaults.

use std::sync::{Arc, Weak};

use bitcoin::{BlockHash, CompactTarget};

use crate::blockdata::block::BlockHeader;
use crate::pow::{block_proof, Work};

/// One entry of the block index: a header plus its chain position.
#[derive(Debug)]
pub struct ChainIndexEntry {
    header: BlockHeader,
    height: u32,
    chain_work: Work,
    prev: Option<Weak<ChainIndexEntry>>,
}

impl ChainIndexEntry {
    /// Creates the index entry for a genesis block (height 0, no predecessor).
    pub fn genesis(header: BlockHeader) -> Arc<Self> {
        let chain_work = block_proof(header.bits());
        Arc::new(ChainIndexEntry {
            header,
            height: 0,
            chain_work,
            prev: None,
        })
    }

    /// Appends a block on top of `prev`, deriving height and cumulative work.
    pub fn extend(prev: &Arc<Self>, header: BlockHeader) -> Arc<Self> {
        let chain_work = prev.chain_work + block_proof(header.bits());
        Arc::new(ChainIndexEntry {
            header,
            height: prev.height + 1,
            chain_work,
            prev: Some(Arc::downgrade(prev)),
        })
    }

    /// The header this entry indexes.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Height of the block, genesis being 0.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total work of the chain ending in this block.
    pub fn chain_work(&self) -> Work {
        self.chain_work
    }

    /// The block's compact difficulty target.
    pub fn bits(&self) -> CompactTarget {
        self.header.bits()
    }

    /// The block's timestamp, as claimed by the miner.
    pub fn time(&self) -> u32 {
        self.header.time()
    }

    /// The block's hash.
    pub fn block_hash(&self) -> BlockHash {
        self.header.block_hash()
    }

    /// The predecessor entry, or `None` for the genesis block.
    ///
    /// # Panics
    ///
    /// Panics if the predecessor entry has been dropped while this entry is
    /// still being consulted. Retarget windows are only walked over ancestors
    /// the caller has committed, so a dangling link is a precondition
    /// violation of the validating subsystem, not a recoverable condition.
    pub fn prev(&self) -> Option<Arc<ChainIndexEntry>> {
        self.prev.as_ref().map(|weak| {
            weak.upgrade()
                .expect("chain index ancestor dropped while still referenced")
        })
    }

    /// Walks back `distance` predecessors (`distance` must be at least 1).
    ///
    /// Returns `None` when the walk runs past the genesis block, i.e. the
    /// chain is shorter than the requested distance.
    pub fn ancestor(&self, distance: u32) -> Option<Arc<ChainIndexEntry>> {
        assert!(distance >= 1, "ancestor distance must be at least 1");
        let mut entry = self.prev()?;
        for _ in 1..distance {
            entry = entry.prev()?;
        }
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockdata::block::make_version;
    use crate::hashes::Hash;
    use bitcoin::block::{Header as InnerHeader, Version};
    use bitcoin::TxMerkleNode;

    fn header(time: u32, bits: u32) -> BlockHeader {
        BlockHeader::new(InnerHeader {
            version: Version::from_consensus(make_version(2, 23, false)),
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time,
            bits: CompactTarget::from_consensus(bits),
            nonce: 0,
        })
    }

    fn build_chain(length: u32) -> Vec<Arc<ChainIndexEntry>> {
        let mut entries = vec![ChainIndexEntry::genesis(header(0, 0x1e0fffff))];
        for i in 1..length {
            let tip = Arc::clone(entries.last().unwrap());
            entries.push(ChainIndexEntry::extend(&tip, header(i * 138, 0x1e0fffff)));
        }
        entries
    }

    #[test]
    fn heights_and_links() {
        let chain = build_chain(10);
        assert_eq!(chain[9].height(), 9);
        assert_eq!(chain[9].prev().unwrap().height(), 8);
        assert!(chain[0].prev().is_none());
    }

    #[test]
    fn ancestor_walks_exactly() {
        let chain = build_chain(10);
        assert_eq!(chain[9].ancestor(1).unwrap().height(), 8);
        assert_eq!(chain[9].ancestor(9).unwrap().height(), 0);
        assert!(chain[9].ancestor(10).is_none());
    }

    #[test]
    fn chain_work_accumulates() {
        let chain = build_chain(3);
        let unit = block_proof(CompactTarget::from_consensus(0x1e0fffff));
        assert_eq!(chain[2].chain_work(), unit + unit + unit);
        assert!(chain[2].chain_work() > chain[1].chain_work());
    }
}
