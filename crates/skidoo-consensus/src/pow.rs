//! Proof-of-work targets, difficulty retargeting and PoW checks.
//!
//! A [`Target`] is a 256-bit threshold a block hash must not exceed to be
//! valid proof-of-work; the lower the target, the higher the difficulty.
//! Block headers carry targets in the 32-bit compact form ("nBits"): one
//! exponent byte (the byte length of the encoded value) followed by a 3-byte
//! big-endian mantissa whose bit 23 doubles as a sign flag. The encoding is
//! lossy by design; decoding is strict and never clamps.
//!
//! Retargeting runs in two eras split by a per-network fork height. Below the
//! fork the classic fixed-window rule applies: retarget every
//! `interval` blocks with actual time damped into `[timespan/4, timespan*4]`.
//! From the fork on, every block retargets against the average target of a
//! trailing window three intervals long, with asymmetric damping bounds.

use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use bitcoin::CompactTarget;

use crate::blockdata::block::BlockHeader;
use crate::chain::ChainIndexEntry;
use crate::consensus::params::{ChainParams, Params};
use crate::hashes::Hash;
use bitcoin::BlockHash;

/// Sign flag inside the compact mantissa. A set sign bit encodes a negative
/// target, which is never valid proof-of-work.
const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Represents a difficulty target expressed as an unsigned 256-bit integer.
///
/// Targets are compared numerically big-endian; the byte order of the hashes
/// they are compared against is handled by [`Target::is_met_by`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target(U256);

impl Target {
    /// Creates a new `Target` from a hexadecimal string representation.
    pub fn from_hex(hex: &str) -> Option<Self> {
        U256::from_str_radix(hex, 16).ok().map(Target)
    }

    /// Creates a Target from big-endian bytes.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        Self(U256::from_big_endian(bytes))
    }

    /// The all-zero target. No hash can meet it except the zero hash.
    pub const fn zero() -> Self {
        Target(U256::zero())
    }

    /// Proof-of-work limit for the main and test networks: `~0 >> 20`.
    pub fn mainnet_pow_limit() -> Self {
        Target(U256::MAX >> 20)
    }

    /// Proof-of-work limit for the regression test network: `~0 >> 1`.
    pub fn regtest_pow_limit() -> Self {
        Target(U256::MAX >> 1)
    }

    /// Decodes a compact ("nBits") encoding into a full target.
    ///
    /// The compact form stores a byte length in the exponent byte and the
    /// three most significant bytes of the value in the mantissa; the value is
    /// `mantissa * 256^(exponent - 3)`.
    ///
    /// Returns `None` for encodings that are not a valid positive target:
    /// sign bit set (negative), zero mantissa, a value that shifts down to
    /// zero, or an exponent beyond 256-bit range. No clamping to any network
    /// limit happens here; range policy belongs to the callers.
    pub fn from_compact(compact: CompactTarget) -> Option<Self> {
        let n = compact.to_consensus();
        let exponent = n >> 24;
        let mantissa = n & 0x00ff_ffff;

        if mantissa & COMPACT_SIGN_BIT != 0 {
            return None;
        }
        if mantissa == 0 {
            return None;
        }
        if exponent > 32 {
            return None;
        }

        let base = U256::from(mantissa);
        let target = if exponent <= 3 {
            base >> (8 * (3 - exponent as usize))
        } else {
            base << (8 * (exponent as usize - 3))
        };

        if target.is_zero() {
            return None;
        }
        Some(Target(target))
    }

    /// Encodes this target into the compact ("nBits") form.
    ///
    /// Values whose most significant mantissa bit would collide with the sign
    /// flag are normalized by shifting the mantissa down a byte and bumping
    /// the exponent. Precision below the top three bytes is dropped; the
    /// encoding is exact only for targets already representable in compact
    /// form.
    pub fn to_compact(self) -> CompactTarget {
        if self.0.is_zero() {
            return CompactTarget::from_consensus(0);
        }

        let mut size = (self.0.bits() + 7) / 8;
        let mut mantissa = if size <= 3 {
            self.0.low_u32() << (8 * (3 - size))
        } else {
            (self.0 >> (8 * (size - 3))).low_u32() & 0x00ff_ffff
        };

        if mantissa & COMPACT_SIGN_BIT != 0 {
            mantissa >>= 8;
            size += 1;
        }

        CompactTarget::from_consensus(((size as u32) << 24) | mantissa)
    }

    /// Whether `hash`, read as a 256-bit little-endian number, does not exceed
    /// this target.
    pub fn is_met_by(self, hash: &BlockHash) -> bool {
        U256::from_little_endian(&hash.to_byte_array()) <= self.0
    }

    /// Calculates the difficulty of this target relative to a maximum
    /// attainable target, capped at `u128::MAX`.
    ///
    /// Returns `None` when this target is zero.
    pub fn difficulty(self, max_attainable_target: Target) -> Option<u128> {
        let diff = max_attainable_target.0.checked_div(self.0)?;
        if diff > U256::from(u128::MAX) {
            Some(u128::MAX)
        } else {
            Some(diff.as_u128())
        }
    }

    /// Expected number of hash evaluations to find a block at this target,
    /// using the classic `2^256 / (target + 1) == ~target / (target+1) + 1`.
    pub fn to_work(self) -> Work {
        if self.0.is_zero() || self.0 == U256::one() {
            return Work(U256::MAX);
        }
        if self.0 == U256::MAX {
            return Work(U256::one());
        }
        Work((!self.0 / (self.0 + U256::one())) + U256::one())
    }

    /// `self * numerator / denominator` over a 512-bit intermediate, so the
    /// retarget multiply can never overflow; results beyond 256 bits saturate
    /// (callers clamp to the network limit right after).
    pub(crate) fn mul_div(self, numerator: u64, denominator: u64) -> Target {
        let wide = U512::from(self.0) * U512::from(numerator) / U512::from(denominator);
        Target(u512_to_u256_saturating(wide))
    }
}

/// Cumulative proof-of-work. Summed along the chain index to compare branch
/// weight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Work(U256);

impl Work {
    /// Zero work, the weight of an unverifiable header.
    pub const fn zero() -> Self {
        Work(U256::zero())
    }
}

impl core::ops::Add for Work {
    type Output = Work;

    fn add(self, rhs: Work) -> Work {
        Work(self.0.saturating_add(rhs.0))
    }
}

impl core::ops::AddAssign for Work {
    fn add_assign(&mut self, rhs: Work) {
        *self = *self + rhs;
    }
}

/// The amount of work one block with the given compact target contributes to
/// its chain. Undecodable targets contribute nothing.
pub fn block_proof(bits: CompactTarget) -> Work {
    match Target::from_compact(bits) {
        Some(target) => target.to_work(),
        None => Work::zero(),
    }
}

/// Plain proof-of-work check: `hash` must meet the target encoded in `bits`,
/// and that target must decode to a positive value no easier than the
/// network's limit.
pub fn check_proof_of_work(hash: &BlockHash, bits: CompactTarget, params: &Params) -> bool {
    let Some(target) = Target::from_compact(bits) else {
        debug!("proof of work rejected: nBits decode to zero or negative");
        return false;
    };
    if target > params.pow_limit {
        debug!("proof of work rejected: nBits above proof-of-work limit");
        return false;
    }
    target.is_met_by(hash)
}

/// Full block-level proof-of-work check.
///
/// Headers without the auxpow version flag must meet their own target.
/// Headers with the flag are only acceptable from the network's auxpow
/// activation height on, must carry a payload that survives
/// [`AuxPow::check`](crate::auxpow::AuxPow::check), and the parent block's
/// hash must meet this header's target.
pub fn check_block_proof_of_work(header: &BlockHeader, height: u32, params: &ChainParams) -> bool {
    let base = params.base();

    let Some(target) = Target::from_compact(header.bits()) else {
        debug!("block rejected: nBits decode to zero or negative");
        return false;
    };
    if target > base.pow_limit {
        debug!("block rejected: nBits above proof-of-work limit");
        return false;
    }

    // Test harness escape hatch; never set on production parameter sets.
    if params.skip_proof_of_work_check() {
        return true;
    }

    if !header.is_auxpow() {
        if header.aux_pow().is_some() {
            debug!("block rejected: auxpow payload without the version flag");
            return false;
        }
        return target.is_met_by(&header.block_hash());
    }

    if height < base.auxpow_start_height {
        debug!(height, "block rejected: auxpow below activation height");
        return false;
    }
    let Some(aux) = header.aux_pow() else {
        debug!("block rejected: auxpow version flag without payload");
        return false;
    };
    if !aux.check(header.block_hash(), base.chain_id, base) {
        return false;
    }
    target.is_met_by(&aux.parent_block_hash())
}

/// Computes the compact target required of the block that extends `last`.
///
/// `candidate` is the header being built or validated on top of `last`; only
/// its timestamp is consulted (for the testnet minimum-difficulty rule).
///
/// The caller must have committed every ancestor within the retarget window
/// to the chain index; shorter chains near genesis yield the network limit.
pub fn next_work_required(
    last: &ChainIndexEntry,
    candidate: &BlockHeader,
    params: &ChainParams,
) -> CompactTarget {
    let base = params.base();
    let next_height = last.height() + 1;
    if next_height >= base.pow_fork_height {
        averaging_next_work(last, base)
    } else {
        legacy_next_work(last, candidate, params)
    }
}

/// Pre-fork rule: fixed-window retarget every `interval` blocks, damped into
/// `[timespan/4, timespan*4]`; unchanged bits between boundaries.
fn legacy_next_work(
    last: &ChainIndexEntry,
    candidate: &BlockHeader,
    params: &ChainParams,
) -> CompactTarget {
    let base = params.base();
    let limit = base.pow_limit;
    let interval = base.interval() as u32;
    let next_height = last.height() + 1;

    if next_height % interval != 0 {
        if params.allow_min_difficulty_blocks() {
            // A block arriving more than twice the target spacing after its
            // predecessor may be mined at the minimum difficulty.
            if i64::from(candidate.time()) > i64::from(last.time()) + base.pow_target_spacing * 2 {
                return limit.to_compact();
            }
            return last_regular_bits(last, interval, limit);
        }
        return last.bits();
    }

    let Some(first) = last.ancestor(interval) else {
        // Not enough history for a full window yet.
        return limit.to_compact();
    };

    let old_bits = if params.allow_min_difficulty_blocks() {
        last_regular_bits(last, interval, limit)
    } else {
        last.bits()
    };
    let old_target = Target::from_compact(old_bits)
        .expect("committed block carries an undecodable compact target");

    let timespan = base.pow_target_timespan;
    let actual = (i64::from(last.time()) - i64::from(first.time()))
        .clamp(timespan / 4, timespan * 4);

    let new_target = old_target.mul_div(actual as u64, timespan as u64);
    new_target.min(limit).to_compact()
}

/// Post-fork rule: every block retargets against the average decoded target
/// of the trailing averaging window. Targets are summed first and divided
/// once. The actual timespan is measured against the block one full window
/// back and damped into the asymmetric bounds derived from the adjustment
/// percentages.
fn averaging_next_work(last: &ChainIndexEntry, base: &Params) -> CompactTarget {
    let limit = base.pow_limit;
    let window = base.averaging_interval();

    let mut sum = U512::from(
        Target::from_compact(last.bits())
            .expect("committed block carries an undecodable compact target")
            .0,
    );
    let mut cursor = last.prev();
    let mut counted: i64 = 1;
    while counted < window {
        let Some(entry) = cursor else {
            return limit.to_compact();
        };
        sum += U512::from(
            Target::from_compact(entry.bits())
                .expect("committed block carries an undecodable compact target")
                .0,
        );
        cursor = entry.prev();
        counted += 1;
    }
    // One more step back anchors the timespan measurement.
    let Some(anchor) = cursor else {
        return limit.to_compact();
    };

    let average = Target(u512_to_u256_saturating(sum / U512::from(window as u64)));

    let actual = (i64::from(last.time()) - i64::from(anchor.time()))
        .clamp(base.min_actual_timespan(), base.max_actual_timespan());
    // The lower damping bound is negative by construction. A timespan still
    // non-positive after damping collapses the target to zero, leaving the
    // chain unmineable until timestamps move forward again.
    let actual = actual.max(0) as u64;

    let new_target = average.mul_div(actual, base.averaging_target_timespan() as u64);
    new_target.min(limit).to_compact()
}

/// Walks back from `last` to the most recent block whose bits were not the
/// minimum-difficulty special case, stopping at retarget boundaries.
fn last_regular_bits(last: &ChainIndexEntry, interval: u32, limit: Target) -> CompactTarget {
    let limit_bits = limit.to_compact();
    let mut bits = last.bits();
    let mut height = last.height();
    let mut prev = last.prev();
    while height % interval != 0 && bits == limit_bits {
        match prev {
            Some(entry) => {
                bits = entry.bits();
                height = entry.height();
                prev = entry.prev();
            }
            None => break,
        }
    }
    bits
}

fn u512_to_u256_saturating(value: U512) -> U256 {
    if (value >> 256).is_zero() {
        let mut bytes = [0u8; 64];
        value.to_big_endian(&mut bytes);
        U256::from_big_endian(&bytes[32..])
    } else {
        U256::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockdata::block::make_version;
    use crate::consensus::params::ChainParams;
    use bitcoin::block::{Header as InnerHeader, Version};
    use bitcoin::TxMerkleNode;
    use std::sync::Arc;

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

    /// Builds a chain from (time, bits) pairs, genesis first.
    fn build_chain(specs: &[(u32, u32)]) -> Vec<Arc<ChainIndexEntry>> {
        assert!(!specs.is_empty());
        let mut entries = vec![ChainIndexEntry::genesis(header(specs[0].0, specs[0].1))];
        for &(time, bits) in &specs[1..] {
            let tip = Arc::clone(entries.last().unwrap());
            entries.push(ChainIndexEntry::extend(&tip, header(time, bits)));
        }
        entries
    }

    fn evenly_spaced(length: u32, spacing: u32, bits: u32) -> Vec<(u32, u32)> {
        (0..length).map(|i| (1_000_000 + i * spacing, bits)).collect()
    }

    #[test]
    fn decode_mainnet_genesis_bits() {
        let target = Target::from_compact(CompactTarget::from_consensus(0x1e0fffff)).unwrap();
        let expected = Target::from_hex(
            "00000fffff000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(target, expected);
    }

    #[test]
    fn decode_rejects_sign_bit() {
        // Exponent 3, mantissa with the high (sign) bit set.
        assert!(Target::from_compact(CompactTarget::from_consensus(0x03800000)).is_none());
        assert!(Target::from_compact(CompactTarget::from_consensus(0x1d80ffff)).is_none());
    }

    #[test]
    fn decode_rejects_zero_and_underflow() {
        assert!(Target::from_compact(CompactTarget::from_consensus(0)).is_none());
        assert!(Target::from_compact(CompactTarget::from_consensus(0x1d000000)).is_none());
        // Mantissa 1 with exponent 1 shifts down to zero.
        assert!(Target::from_compact(CompactTarget::from_consensus(0x01000001)).is_none());
    }

    #[test]
    fn decode_rejects_oversized_exponent() {
        assert!(Target::from_compact(CompactTarget::from_consensus(0x2100ffff)).is_none());
        assert!(Target::from_compact(CompactTarget::from_consensus(0xff00ffff)).is_none());
    }

    #[test]
    fn decode_does_not_clamp_to_network_limit() {
        // 0x207fffff decodes to well above the mainnet limit; the decoder must
        // hand it back untouched and leave range policy to the checker.
        let target = Target::from_compact(CompactTarget::from_consensus(0x207fffff)).unwrap();
        assert!(target > Target::mainnet_pow_limit());
        assert!(target <= Target::regtest_pow_limit());
    }

    #[test]
    fn encode_normalizes_sign_colliding_mantissa() {
        let target = Target(U256::from(0x800000u64));
        assert_eq!(target.to_compact().to_consensus(), 0x04008000);
        let target = Target(U256::from(0x7fffffu64));
        assert_eq!(target.to_compact().to_consensus(), 0x037fffff);
    }

    #[test]
    fn encode_small_targets() {
        assert_eq!(
            Target(U256::from(0x12u64)).to_compact().to_consensus(),
            0x01120000
        );
        assert_eq!(
            Target(U256::from(0x1234u64)).to_compact().to_consensus(),
            0x02123400
        );
        assert_eq!(
            Target(U256::from(0x123456u64)).to_compact().to_consensus(),
            0x03123456
        );
    }

    #[test]
    fn exact_compact_round_trips() {
        for bits in [0x1d00ffffu32, 0x1e0fffff, 0x1b04864c, 0x207fffff, 0x03123456] {
            let target = Target::from_compact(CompactTarget::from_consensus(bits)).unwrap();
            assert_eq!(target.to_compact().to_consensus(), bits);
            assert_eq!(Target::from_compact(target.to_compact()).unwrap(), target);
        }
    }

    #[test]
    fn genesis_target_work() {
        // nBits 0x1d00ffff; expected work 0x100010001 per 2^256 / (target+1).
        let target = Target::from_compact(CompactTarget::from_consensus(0x1d00ffff)).unwrap();
        assert_eq!(target.to_work(), Work(U256::from(0x1_0001_0001u64)));
    }

    #[test]
    fn work_edge_cases() {
        assert_eq!(Target::zero().to_work(), Work(U256::MAX));
        assert_eq!(Target(U256::one()).to_work(), Work(U256::MAX));
        assert_eq!(Target(U256::MAX).to_work(), Work(U256::one()));
    }

    #[test]
    fn block_proof_of_undecodable_bits_is_zero() {
        assert_eq!(
            block_proof(CompactTarget::from_consensus(0x03800000)),
            Work::zero()
        );
    }

    #[test]
    fn target_met_by_hash() {
        let target = Target::from_compact(CompactTarget::from_consensus(0x1e0fffff)).unwrap();
        assert!(target.is_met_by(&BlockHash::all_zeros()));
        assert!(!target.is_met_by(&BlockHash::from_byte_array([0xff; 32])));
    }

    #[test]
    fn plain_check_enforces_limit() {
        let main = Params::mainnet();
        let regtest = Params::regtest();
        let easy = CompactTarget::from_consensus(0x207fffff);
        // Above mainnet's limit regardless of how small the hash is.
        assert!(!check_proof_of_work(&BlockHash::all_zeros(), easy, &main));
        // Within regtest's limit.
        assert!(check_proof_of_work(&BlockHash::all_zeros(), easy, &regtest));
    }

    #[test]
    fn negative_bits_rejected_regardless_of_hash() {
        let params = ChainParams::for_network(crate::network::Network::Mainnet);
        let h = header(0, 0x03800000);
        assert!(!check_block_proof_of_work(&h, 10, &params));
    }

    #[test]
    fn skip_flag_bypasses_hash_comparison_but_not_decoding() {
        let params = ChainParams::for_network(crate::network::Network::Unittest);
        match &params {
            ChainParams::UnitTest(unit) => unit.set_skip_proof_of_work_check(true),
            ChainParams::Production(_) => unreachable!(),
        }
        // Valid bits, hash nowhere near the target: passes via the flag.
        let h = header(0, 0x1d00ffff);
        assert!(check_block_proof_of_work(&h, 10, &params));
        // Undecodable bits still fail.
        let h = header(0, 0x1d800000);
        assert!(!check_block_proof_of_work(&h, 10, &params));
    }

    #[test]
    fn plain_block_check_compares_own_hash() {
        let params = ChainParams::for_network(crate::network::Network::Regtest);
        let target = Target::from_compact(CompactTarget::from_consensus(0x207fffff)).unwrap();
        // Regtest's target admits about half of all hashes; grind a nonce.
        let mut nonce = 0u32;
        let h = loop {
            let inner = InnerHeader {
                version: Version::from_consensus(make_version(2, 23, false)),
                prev_blockhash: BlockHash::all_zeros(),
                merkle_root: TxMerkleNode::all_zeros(),
                time: 1,
                bits: CompactTarget::from_consensus(0x207fffff),
                nonce,
            };
            let candidate = BlockHeader::new(inner);
            if target.is_met_by(&candidate.block_hash()) {
                break candidate;
            }
            nonce += 1;
        };
        assert!(check_block_proof_of_work(&h, 1, &params));
        // A header that misses the target must fail.
        let mut missed = None;
        for nonce in 0..10_000u32 {
            let inner = InnerHeader {
                version: Version::from_consensus(make_version(2, 23, false)),
                prev_blockhash: BlockHash::all_zeros(),
                merkle_root: TxMerkleNode::all_zeros(),
                time: 2,
                bits: CompactTarget::from_consensus(0x207fffff),
                nonce,
            };
            let candidate = BlockHeader::new(inner);
            if !target.is_met_by(&candidate.block_hash()) {
                missed = Some(candidate);
                break;
            }
        }
        assert!(!check_block_proof_of_work(&missed.unwrap(), 1, &params));
    }

    #[test]
    fn legacy_off_boundary_keeps_previous_bits() {
        let params = ChainParams::for_network(crate::network::Network::Mainnet);
        let chain = build_chain(&evenly_spaced(10, 138, 0x1d00ffff));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params).to_consensus(),
            0x1d00ffff
        );
    }

    #[test]
    fn legacy_boundary_with_exact_spacing_keeps_target() {
        // 50 blocks spaced exactly at the target spacing; height 50 is a
        // retarget boundary and the damping factor is exactly 1.
        let params = ChainParams::for_network(crate::network::Network::Mainnet);
        let chain = build_chain(&evenly_spaced(50, 138, 0x1d00ffff));
        let last = chain.last().unwrap();
        assert_eq!(last.height(), 49);
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params).to_consensus(),
            0x1d00ffff
        );
    }

    #[test]
    fn legacy_boundary_clamps_to_quadruple() {
        // Spacing eight times the target: the raw multiplier would be 8 but
        // damping caps the timespan at timespan*4.
        let params = ChainParams::for_network(crate::network::Network::Mainnet);
        let chain = build_chain(&evenly_spaced(50, 138 * 8, 0x1d00ffff));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 138, 0);

        let old = Target::from_compact(CompactTarget::from_consensus(0x1d00ffff)).unwrap();
        let expected = Target(old.0 * U256::from(4u64))
            .min(Params::mainnet().pow_limit)
            .to_compact();
        assert_eq!(next_work_required(last, &candidate, &params), expected);
    }

    #[test]
    fn legacy_boundary_near_genesis_returns_limit() {
        // The very first boundary has no full window behind it.
        let params = ChainParams::for_network(crate::network::Network::Mainnet);
        let chain = build_chain(&evenly_spaced(25, 138, 0x1d00ffff));
        let last = chain.last().unwrap();
        assert_eq!(last.height(), 24);
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params),
            Params::mainnet().pow_limit.to_compact()
        );
    }

    #[test]
    fn legacy_min_difficulty_emergency_drop() {
        let params = ChainParams::for_network(crate::network::Network::Testnet);
        let base = Params::testnet();
        let chain = build_chain(&evenly_spaced(10, 138, 0x1d00ffff));
        let last = chain.last().unwrap();
        // Candidate arrives more than twice the spacing late.
        let candidate = header(last.time() + 138 * 2 + 1, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params),
            base.pow_limit.to_compact()
        );
        // On time, the previous regular bits stand.
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params).to_consensus(),
            0x1d00ffff
        );
    }

    #[test]
    fn legacy_min_difficulty_walks_back_past_special_cased_bits() {
        // Testnet's fork height is 50, so drive this window below it with a
        // shortened chain: heights 0..=44, tip off-boundary, where recent
        // blocks were mined at the minimum difficulty.
        let base = Params::testnet();
        let limit_bits = base.pow_limit.to_compact().to_consensus();
        let params = ChainParams::for_network(crate::network::Network::Testnet);
        let mut specs = evenly_spaced(45, 138, 0x1d00ffff);
        for spec in specs.iter_mut().skip(30) {
            spec.1 = limit_bits;
        }
        let chain = build_chain(&specs);
        let last = chain.last().unwrap();
        assert_eq!(last.height(), 44);
        // On-time candidate: the min-difficulty run is skipped and the last
        // regular bits are returned.
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params).to_consensus(),
            0x1d00ffff
        );
    }

    #[test]
    fn averaging_window_with_exact_spacing_keeps_target() {
        // Testnet forks to per-block averaging at height 50. With exact
        // spacing the clamped timespan equals the averaging timespan, and an
        // all-equal window averages to itself.
        let params = ChainParams::for_network(crate::network::Network::Testnet);
        let chain = build_chain(&evenly_spaced(130, 138, 0x1d00ffff));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params).to_consensus(),
            0x1d00ffff
        );
    }

    #[test]
    fn averaging_matches_independent_computation() {
        let base = Params::testnet();
        let params = ChainParams::for_network(crate::network::Network::Testnet);

        // Fast blocks: half the target spacing, no clamping.
        let chain = build_chain(&evenly_spaced(130, 69, 0x1d00ffff));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 69, 0);

        let window = base.averaging_interval() as u64;
        let avg = Target::from_compact(CompactTarget::from_consensus(0x1d00ffff)).unwrap();
        let actual = window * 69;
        assert!((actual as i64) > base.min_actual_timespan());
        let expected = Target(
            avg.0 * U256::from(actual) / U256::from(base.averaging_target_timespan() as u64),
        )
        .min(base.pow_limit)
        .to_compact();
        assert_eq!(next_work_required(last, &candidate, &params), expected);
    }

    #[test]
    fn averaging_clamps_slow_windows() {
        let base = Params::testnet();
        let params = ChainParams::for_network(crate::network::Network::Testnet);

        // Blocks far slower than the upper damping bound allows.
        let chain = build_chain(&evenly_spaced(130, 600, 0x1d00ffff));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 600, 0);

        let avg = Target::from_compact(CompactTarget::from_consensus(0x1d00ffff)).unwrap();
        let clamped = base.max_actual_timespan() as u64;
        let expected = Target(
            avg.0 * U256::from(clamped) / U256::from(base.averaging_target_timespan() as u64),
        )
        .min(base.pow_limit)
        .to_compact();
        assert_eq!(next_work_required(last, &candidate, &params), expected);
    }

    #[test]
    fn averaging_without_full_window_returns_limit() {
        let base = Params::testnet();
        let params = ChainParams::for_network(crate::network::Network::Testnet);
        // Past the fork but with fewer than window + 1 ancestors.
        let chain = build_chain(&evenly_spaced(60, 138, 0x1d00ffff));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 138, 0);
        assert_eq!(
            next_work_required(last, &candidate, &params),
            base.pow_limit.to_compact()
        );
    }

    #[test]
    fn averaging_sum_does_not_overflow_on_regtest_targets() {
        // Regtest's limit is ~2^255; summing a window of those must not wrap.
        let base = Params::regtest();
        let params = ChainParams::for_network(crate::network::Network::Regtest);
        let limit_bits = base.pow_limit.to_compact().to_consensus();
        let window = base.averaging_interval() as u32;
        let chain = build_chain(&evenly_spaced(window + 60, 60, limit_bits));
        let last = chain.last().unwrap();
        let candidate = header(last.time() + 60, 0);
        let required = next_work_required(last, &candidate, &params);
        // With exact spacing the result is clamped at the limit itself.
        assert_eq!(required, base.pow_limit.to_compact());
    }
}
