//! Consensus-critical core for the Skidoo network.
//!
//! This library implements the pieces of the node that decide whether a block
//! is valid proof-of-work: per-network chain parameters, the difficulty
//! retargeting algorithm (with its fork-height algorithm switch), the plain
//! proof-of-work check, and verification of auxiliary proofs-of-work produced
//! by merged mining inside a parent chain's coinbase transaction.
//!
//! Everything here is pure and read-mostly: functions consult an immutable
//! parameter set and an append-only chain index, perform no I/O, and return
//! explicit success/failure values.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::arithmetic_side_effects))]
#![cfg_attr(test, allow(clippy::indexing_slicing))]
#![cfg_attr(test, allow(clippy::panic))]

/// Auxiliary proof-of-work (merged mining) structures and verification.
pub mod auxpow;
/// Block data structures: headers and the genesis block.
pub mod blockdata;
/// The block index used to walk ancestor chains.
pub mod chain;
/// Consensus encoding/decoding and chain parameters.
pub mod consensus;
/// Hash functions and types used by the consensus code.
pub mod hashes;
/// I/O traits consumed by the consensus codec.
pub mod io;
/// Network types and constants.
pub mod network;
/// Proof-of-work targets, difficulty retargeting and PoW checks.
pub mod pow;
/// Utility functions and types.
pub mod util;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
