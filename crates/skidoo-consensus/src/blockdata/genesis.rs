//! Genesis block construction for the Skidoo networks.
//!
//! Every network shares one coinbase transaction; the header fields (time,
//! bits, nonce) differ per network. [`genesis_block`] rebuilds the block from
//! scratch — script push by script push — and the parameter registry asserts
//! the result against the hard-coded hashes in [`GenesisInfo`] at selection
//! time, so silent corruption of transaction serialization or hashing is
//! caught at startup.

use bitcoin::absolute::LockTime;
use bitcoin::block::{Header as InnerHeader, Version};
use bitcoin::opcodes::all::OP_CHECKSIG;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::transaction::{self, OutPoint, TxIn, TxOut};
use bitcoin::{Amount, BlockHash, CompactTarget, Sequence, Transaction, TxMerkleNode, Witness};
use serde::{Deserialize, Serialize};

use crate::blockdata::block::BlockHeader;
use crate::hashes::Hash;
use crate::network::Network;

/// The message embedded in the genesis coinbase scriptSig.
pub const GENESIS_COINBASE_MESSAGE: &[u8; 48] =
    b"In thanks to Saint Jude for favors granted. A.W.";

/// Genesis block information for different networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisInfo {
    /// The hash of the genesis block.
    pub hash: BlockHash,
    /// The merkle root of the genesis block.
    pub merkle_root: TxMerkleNode,
    /// The timestamp of the genesis block.
    pub timestamp: u32,
    /// The nonce of the genesis block.
    pub nonce: u32,
    /// The bits (difficulty) of the genesis block.
    pub bits: u32,
    /// The version of the genesis block.
    pub version: i32,
}

/// The shared merkle root: the id of the single coinbase transaction.
const GENESIS_MERKLE_ROOT: [u8; 32] = [
    0x4e, 0xd1, 0x3d, 0x1c, 0x92, 0x83, 0x11, 0x17, 0xff, 0x7c, 0x44, 0x22, 0xeb, 0x26, 0x4b,
    0xc3, 0x07, 0x3c, 0xf5, 0x48, 0xe5, 0x99, 0x95, 0x32, 0xe2, 0x2f, 0xb0, 0xd9, 0x04, 0x16,
    0x1c, 0x92,
];

impl GenesisInfo {
    /// Returns the genesis block information for the specified network.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
            Network::Regtest => Self::regtest(),
            // The unit-test network runs on mainnet's genesis.
            Network::Unittest => Self::mainnet(),
        }
    }

    /// Returns the genesis block information for the mainnet network.
    pub fn mainnet() -> Self {
        Self {
            hash: BlockHash::from_byte_array([
                0xb3, 0xed, 0x3c, 0xec, 0xaa, 0x05, 0xb4, 0xa7, 0x88, 0x40, 0xe6, 0x1c, 0xbc,
                0x82, 0x91, 0xf9, 0x50, 0x63, 0xa1, 0xb3, 0xbe, 0x57, 0x38, 0xf4, 0x44, 0xbe,
                0x40, 0x68, 0x4e, 0x07, 0x00, 0x00,
            ]),
            merkle_root: TxMerkleNode::from_byte_array(GENESIS_MERKLE_ROOT),
            timestamp: 5,
            nonce: 1200094,
            bits: 0x1e0fffff,
            version: 1,
        }
    }

    /// Returns the genesis block information for the testnet network.
    pub fn testnet() -> Self {
        Self {
            hash: BlockHash::from_byte_array([
                0x5f, 0x80, 0xf3, 0xe3, 0x5f, 0x7a, 0x5d, 0x2c, 0xa0, 0xa4, 0x58, 0x4c, 0x09,
                0x0b, 0xf2, 0x6a, 0x65, 0x56, 0x2a, 0x3b, 0x03, 0x5f, 0x9c, 0xd3, 0xe9, 0x69,
                0x5c, 0xe8, 0x74, 0x03, 0x00, 0x00,
            ]),
            merkle_root: TxMerkleNode::from_byte_array(GENESIS_MERKLE_ROOT),
            timestamp: 2,
            nonce: 1294578,
            bits: 0x1e0fffff,
            version: 1,
        }
    }

    /// Returns the genesis block information for the regtest network.
    pub fn regtest() -> Self {
        Self {
            hash: BlockHash::from_byte_array([
                0x04, 0x5d, 0xa6, 0xce, 0xd7, 0xf6, 0x13, 0xc0, 0x1f, 0xad, 0x77, 0x21, 0x06,
                0xd0, 0x1e, 0x77, 0x29, 0x6d, 0x2c, 0x28, 0x93, 0x30, 0xaa, 0x30, 0x3c, 0xbc,
                0x0a, 0xbf, 0xe0, 0xaa, 0xfe, 0xcd,
            ]),
            merkle_root: TxMerkleNode::from_byte_array(GENESIS_MERKLE_ROOT),
            timestamp: 1375548985,
            nonce: 1,
            bits: 0x207fffff,
            version: 1,
        }
    }

    /// Assembles the expected header from the stored constants.
    pub fn to_header(&self) -> BlockHeader {
        BlockHeader::new(InnerHeader {
            version: Version::from_consensus(self.version),
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: self.merkle_root,
            time: self.timestamp,
            bits: CompactTarget::from_consensus(self.bits),
            nonce: self.nonce,
        })
    }
}

/// A freshly constructed genesis block: header plus its single coinbase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisBlock {
    /// The genesis block header.
    pub header: BlockHeader,
    /// The only transaction of the block.
    pub coinbase: Transaction,
}

/// Builds the genesis coinbase transaction shared by all networks.
///
/// The scriptSig reproduces the historical pushes byte for byte: the
/// 4-byte difficulty constant 0x1d00ffff, the scriptnum 4, then the coinbase
/// message. The single output is unspendable-by-convention: value zero, an
/// empty key push and OP_CHECKSIG.
pub fn genesis_coinbase() -> Transaction {
    let script_sig = Builder::new()
        .push_slice([0xff, 0xff, 0x00, 0x1d])
        .push_slice([0x04])
        .push_slice(GENESIS_COINBASE_MESSAGE)
        .into_script();
    let script_pubkey = Builder::new()
        .push_slice(PushBytesBuf::new())
        .push_opcode(OP_CHECKSIG)
        .into_script();

    Transaction {
        version: transaction::Version::ONE,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: Sequence::MAX,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: Amount::ZERO,
            script_pubkey,
        }],
    }
}

/// Constructs the genesis block for a network from first principles.
///
/// The merkle root is computed from the actual coinbase transaction, not
/// copied from [`GenesisInfo`]; comparing the result against the stored
/// constants is exactly what makes the startup self-check meaningful.
pub fn genesis_block(network: Network) -> GenesisBlock {
    let info = GenesisInfo::for_network(network);
    let coinbase = genesis_coinbase();
    let merkle_root = TxMerkleNode::from_byte_array(coinbase.compute_txid().to_byte_array());
    let header = BlockHeader::new(InnerHeader {
        version: Version::from_consensus(info.version),
        prev_blockhash: BlockHash::all_zeros(),
        merkle_root,
        time: info.timestamp,
        bits: CompactTarget::from_consensus(info.bits),
        nonce: info.nonce,
    });
    GenesisBlock { header, coinbase }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coinbase_script_bytes_are_exact() {
        let coinbase = genesis_coinbase();
        let mut expected = Vec::new();
        expected.extend_from_slice(&[0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04, 0x30]);
        expected.extend_from_slice(GENESIS_COINBASE_MESSAGE);
        assert_eq!(coinbase.input[0].script_sig.as_bytes(), &expected[..]);
        assert_eq!(coinbase.output[0].script_pubkey.as_bytes(), &[0x00, 0xac]);
    }

    #[test]
    fn constructed_genesis_matches_expected_constants() {
        for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
            let info = GenesisInfo::for_network(network);
            let block = genesis_block(network);
            assert_eq!(
                block.header.inner().merkle_root,
                info.merkle_root,
                "merkle root mismatch on {network}"
            );
            assert_eq!(
                block.header.block_hash(),
                info.hash,
                "genesis hash mismatch on {network}"
            );
            assert_eq!(block.header.block_hash(), info.to_header().block_hash());
        }
    }

    #[test]
    fn unittest_shares_mainnet_genesis() {
        assert_eq!(GenesisInfo::for_network(Network::Unittest), GenesisInfo::mainnet());
    }

    #[test]
    fn display_forms_match_explorer_strings() {
        assert_eq!(
            GenesisInfo::mainnet().hash.to_string(),
            "0000074e6840be44f43857beb3a16350f99182bc1ce64088a7b405aaec3cedb3"
        );
        assert_eq!(
            GenesisInfo::mainnet().merkle_root.to_string(),
            "921c1604d9b02fe2329599e548f53c07c34b26eb22447cff171183921c3dd14e"
        );
        assert_eq!(
            GenesisInfo::testnet().hash.to_string(),
            "00000374e85c69e9d39c5f033b2a56656af20b094c58a4a02c5d7a5fe3f3805f"
        );
    }

    #[test]
    fn genesis_meets_its_own_target() {
        use crate::pow::Target;
        for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
            let block = genesis_block(network);
            let target = Target::from_compact(block.header.bits()).unwrap();
            assert!(target.is_met_by(&block.header.block_hash()));
        }
    }
}
