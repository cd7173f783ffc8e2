//! Per-network consensus parameters and the process-wide selection registry.
//!
//! One immutable [`Params`] value exists per network. Testnet and regtest are
//! produced from mainnet by explicit field overrides; there is no inheritance
//! and no virtual dispatch, so a variant can never accidentally pick up a
//! behavior flag it did not name. The unit-test network is a separate sum
//! variant ([`ChainParams::UnitTest`]) carrying a small override set behind a
//! lock; production variants have no setter surface at all.
//!
//! Selection is a one-time write performed before any validation starts:
//! [`select_params`] runs the genesis self-check and installs the chosen set,
//! [`params`] aborts if consulted before that. After selection the active set
//! is read-only and freely shared across validation threads.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use bitcoin::BlockHash;

use crate::blockdata::genesis::{genesis_block, GenesisInfo};
use crate::hashes::Hash;
use crate::network::{Magic, Network};
use crate::pow::Target;

/// Maximum per-block difficulty increase in the averaging era, in percent.
/// Feeds the lower damping bound on the measured timespan.
pub const MAX_ADJUST_UP: i64 = 123;

/// Maximum per-block difficulty decrease in the averaging era, in percent.
/// Feeds the upper damping bound on the measured timespan.
pub const MAX_ADJUST_DOWN: i64 = 23;

/// The averaging window is this many legacy retarget intervals long.
pub const AVERAGING_INTERVAL_MULTIPLIER: i64 = 3;

/// Skidoo's merged-mining chain identifier.
pub const SKIDOO_CHAIN_ID: i32 = 23;

/// Mainnet height at which retargeting switches to the averaging rule.
pub const PROOF_OF_WORK_FORK_HEIGHT_MAINNET: u32 = 45_000_000;

/// Testnet (and regtest) height of the retargeting fork.
pub const PROOF_OF_WORK_FORK_HEIGHT_TESTNET: u32 = 50;

/// Mainnet height from which auxpow-flagged headers become acceptable.
pub const AUXPOW_START_MAINNET: u32 = 600_000;

/// Testnet (and regtest) auxpow activation height.
pub const AUXPOW_START_TESTNET: u32 = 500;

/// Base58 version bytes for the address and key encodings of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base58Prefixes {
    /// Pay-to-pubkey-hash address version byte.
    pub pubkey_address: u8,
    /// Pay-to-script-hash address version byte.
    pub script_address: u8,
    /// WIF private key version byte.
    pub secret_key: u8,
    /// BIP32 extended public key version bytes.
    pub ext_public_key: [u8; 4],
    /// BIP32 extended secret key version bytes.
    pub ext_secret_key: [u8; 4],
}

/// A known-good block hash at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Height of the checkpointed block.
    pub height: u32,
    /// The block hash, in internal byte order.
    pub hash: [u8; 32],
}

/// Aggregate statistics about a network's checkpoint table, used by sync
/// progress estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointData {
    /// UNIX timestamp of the last checkpointed block.
    pub last_checkpoint_time: u32,
    /// Transactions between genesis and the last checkpoint.
    pub total_transactions: u64,
    /// Estimated transactions per day after the last checkpoint.
    pub transactions_per_day: u64,
}

static MAINNET_CHECKPOINTS: &[Checkpoint] = &[
    Checkpoint {
        height: 0,
        hash: [
            0xb3, 0xed, 0x3c, 0xec, 0xaa, 0x05, 0xb4, 0xa7, 0x88, 0x40, 0xe6, 0x1c, 0xbc, 0x82,
            0x91, 0xf9, 0x50, 0x63, 0xa1, 0xb3, 0xbe, 0x57, 0x38, 0xf4, 0x44, 0xbe, 0x40, 0x68,
            0x4e, 0x07, 0x00, 0x00,
        ],
    },
    Checkpoint {
        height: 25_000,
        hash: [
            0x6a, 0xc3, 0x7a, 0x8e, 0xb4, 0xb1, 0x12, 0xe8, 0x36, 0xee, 0xb6, 0x56, 0xc2, 0x70,
            0xce, 0x0f, 0xbe, 0xbc, 0xa4, 0x36, 0x82, 0xf4, 0x45, 0xd2, 0xad, 0x57, 0x07, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ],
    },
    Checkpoint {
        height: 303_709,
        hash: [
            0x80, 0x96, 0x13, 0xe6, 0xe0, 0xfe, 0x30, 0x1c, 0x41, 0xa1, 0x32, 0x87, 0x9e, 0xf4,
            0xdf, 0x99, 0xd5, 0x4b, 0xb0, 0xaf, 0x8d, 0xdc, 0x63, 0x72, 0xf5, 0x1b, 0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ],
    },
    Checkpoint {
        height: 303_710,
        hash: [
            0x65, 0x83, 0x48, 0x5a, 0x08, 0x3d, 0x35, 0x11, 0x42, 0x4a, 0x07, 0xec, 0xb2, 0x70,
            0xb7, 0x85, 0xbb, 0x1d, 0x38, 0xbe, 0x7c, 0x6e, 0x92, 0x51, 0x20, 0xea, 0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ],
    },
    Checkpoint {
        height: 309_600,
        hash: [
            0xdf, 0x40, 0xfb, 0xed, 0xf0, 0x44, 0x8c, 0x5a, 0x3a, 0xaa, 0x82, 0x0e, 0xe0, 0x87,
            0xf1, 0x85, 0x61, 0xee, 0xf4, 0x1d, 0xdc, 0x28, 0x8c, 0x0f, 0x55, 0x05, 0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ],
    },
];

static TESTNET_CHECKPOINTS: &[Checkpoint] = &[Checkpoint {
    height: 0,
    hash: [
        0x5f, 0x80, 0xf3, 0xe3, 0x5f, 0x7a, 0x5d, 0x2c, 0xa0, 0xa4, 0x58, 0x4c, 0x09, 0x0b,
        0xf2, 0x6a, 0x65, 0x56, 0x2a, 0x3b, 0x03, 0x5f, 0x9c, 0xd3, 0xe9, 0x69, 0x5c, 0xe8,
        0x74, 0x03, 0x00, 0x00,
    ],
}];

static REGTEST_CHECKPOINTS: &[Checkpoint] = &[Checkpoint {
    height: 0,
    hash: [
        0x04, 0x5d, 0xa6, 0xce, 0xd7, 0xf6, 0x13, 0xc0, 0x1f, 0xad, 0x77, 0x21, 0x06, 0xd0,
        0x1e, 0x77, 0x29, 0x6d, 0x2c, 0x28, 0x93, 0x30, 0xaa, 0x30, 0x3c, 0xbc, 0x0a, 0xbf,
        0xe0, 0xaa, 0xfe, 0xcd,
    ],
}];

static MAINNET_DNS_SEEDS: &[&str] = &[
    "23skidoo.xyz",
    "45.33.104.27",
    "107.134.126.6",
    "35.163.132.3",
    "147.135.191.162",
    "skidoo.duckdns.org",
    "chainz.cryptoid.info",
];

static TESTNET_DNS_SEEDS: &[&str] = &["23skidoo.info", "testnet.skidoo.info"];

/// Immutable consensus parameters of one network.
#[derive(Debug, Clone)]
pub struct Params {
    /// Network these parameters are defined for.
    pub network: Network,
    /// Message start bytes identifying the network on the wire.
    pub magic: Magic,
    /// Default peer-to-peer port.
    pub default_port: u16,
    /// The easiest allowed proof-of-work target.
    pub pow_limit: Target,
    /// Height at which retargeting switches to the averaging rule.
    pub pow_fork_height: u32,
    /// Height from which auxpow-flagged headers become acceptable.
    pub auxpow_start_height: u32,
    /// Merged-mining chain identifier carried in header versions.
    pub chain_id: i32,
    /// Blocks between block subsidy halvings.
    pub subsidy_halving_interval: u32,
    /// Blocks that must signal an upgrade before it is enforced.
    pub enforce_block_upgrade_majority: u32,
    /// Blocks that must signal before outdated blocks are rejected.
    pub reject_block_outdated_majority: u32,
    /// Window size over which the upgrade majorities are counted.
    pub to_check_block_upgrade_majority: u32,
    /// Seconds the legacy retarget window is expected to span.
    pub pow_target_timespan: i64,
    /// Expected seconds between blocks.
    pub pow_target_spacing: i64,
    /// Whether blocks arriving slowly may drop to the minimum difficulty.
    pub allow_min_difficulty_blocks: bool,
    /// Whether proof-of-work checking is disabled wholesale.
    pub skip_proof_of_work_check: bool,
    /// Whether the RPC server refuses to start without a password.
    pub require_rpc_password: bool,
    /// Whether mining requires connected peers.
    pub mining_requires_peers: bool,
    /// Whether the mempool is consistency-checked by default.
    pub default_check_mempool: bool,
    /// Whether non-standard transactions are rejected.
    pub require_standard: bool,
    /// Whether blocks are only mined on RPC demand.
    pub mine_blocks_on_demand: bool,
    /// Legacy RPC compatibility flag for the deprecated testnet field.
    pub testnet_to_be_deprecated_field_rpc: bool,
    /// Genesis block constants, asserted against a fresh construction at
    /// selection time.
    pub genesis: GenesisInfo,
    /// Address and key version bytes.
    pub base58_prefixes: Base58Prefixes,
    /// DNS seed hosts.
    pub dns_seeds: &'static [&'static str],
    /// Known-good block hashes.
    pub checkpoints: &'static [Checkpoint],
    /// Aggregate checkpoint statistics.
    pub checkpoint_data: CheckpointData,
}

impl Params {
    /// Consensus parameters for the main network.
    pub fn mainnet() -> Self {
        Params {
            network: Network::Mainnet,
            magic: Magic::MAINNET,
            default_port: 10005,
            pow_limit: Target::mainnet_pow_limit(),
            pow_fork_height: PROOF_OF_WORK_FORK_HEIGHT_MAINNET,
            auxpow_start_height: AUXPOW_START_MAINNET,
            chain_id: SKIDOO_CHAIN_ID,
            subsidy_halving_interval: 1_000_000,
            enforce_block_upgrade_majority: 75_000_000,
            reject_block_outdated_majority: 95_000_000,
            to_check_block_upgrade_majority: 10_000_000,
            pow_target_timespan: 3450, // 25 blocks at 138 seconds
            pow_target_spacing: 138,
            allow_min_difficulty_blocks: false,
            skip_proof_of_work_check: false,
            require_rpc_password: true,
            mining_requires_peers: true,
            default_check_mempool: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            testnet_to_be_deprecated_field_rpc: false,
            genesis: GenesisInfo::mainnet(),
            base58_prefixes: Base58Prefixes {
                pubkey_address: 142,
                script_address: 142,
                secret_key: 224,
                ext_public_key: [0x04, 0x88, 0xb2, 0x1e],
                ext_secret_key: [0x04, 0x88, 0xad, 0xe4],
            },
            dns_seeds: MAINNET_DNS_SEEDS,
            checkpoints: MAINNET_CHECKPOINTS,
            checkpoint_data: CheckpointData {
                last_checkpoint_time: 1_437_932_135,
                total_transactions: 317_206,
                transactions_per_day: 2880,
            },
        }
    }

    /// Consensus parameters for the test network: mainnet with the wire
    /// identity, genesis, activation heights and leniency flags overridden.
    pub fn testnet() -> Self {
        Params {
            network: Network::Testnet,
            magic: Magic::TESTNET,
            default_port: 55537,
            pow_fork_height: PROOF_OF_WORK_FORK_HEIGHT_TESTNET,
            auxpow_start_height: AUXPOW_START_TESTNET,
            enforce_block_upgrade_majority: 51_000_000,
            reject_block_outdated_majority: 75_000_000,
            allow_min_difficulty_blocks: true,
            require_standard: false,
            testnet_to_be_deprecated_field_rpc: true,
            genesis: GenesisInfo::testnet(),
            base58_prefixes: Base58Prefixes {
                pubkey_address: 130,
                script_address: 30,
                secret_key: 239,
                ext_public_key: [0x04, 0x35, 0x86, 0xce],
                ext_secret_key: [0x04, 0x35, 0x82, 0x93],
            },
            dns_seeds: TESTNET_DNS_SEEDS,
            checkpoints: TESTNET_CHECKPOINTS,
            checkpoint_data: CheckpointData {
                last_checkpoint_time: 2,
                total_transactions: 0,
                transactions_per_day: 2880,
            },
            ..Params::mainnet()
        }
    }

    /// Consensus parameters for the regression test network: testnet with
    /// near-trivial retargeting, a wide-open proof-of-work limit and a fixed
    /// low-difficulty genesis.
    pub fn regtest() -> Self {
        Params {
            network: Network::Regtest,
            magic: Magic::REGTEST,
            default_port: 18444,
            pow_limit: Target::regtest_pow_limit(),
            subsidy_halving_interval: 150,
            enforce_block_upgrade_majority: 750,
            reject_block_outdated_majority: 950,
            to_check_block_upgrade_majority: 1000,
            pow_target_timespan: 180, // 3 minutes
            pow_target_spacing: 60,
            skip_proof_of_work_check: true,
            require_rpc_password: false,
            mining_requires_peers: false,
            default_check_mempool: true,
            mine_blocks_on_demand: true,
            testnet_to_be_deprecated_field_rpc: false,
            genesis: GenesisInfo::regtest(),
            base58_prefixes: Base58Prefixes {
                pubkey_address: 0,
                script_address: 5,
                secret_key: 128,
                ext_public_key: [0x04, 0x35, 0x86, 0xce],
                ext_secret_key: [0x04, 0x35, 0x82, 0x93],
            },
            dns_seeds: &[],
            checkpoints: REGTEST_CHECKPOINTS,
            checkpoint_data: CheckpointData {
                last_checkpoint_time: 0,
                total_transactions: 0,
                transactions_per_day: 0,
            },
            ..Params::testnet()
        }
    }

    /// Base parameters for the unit-test network: mainnet with the service
    /// surface relaxed. Only reachable through [`ChainParams::UnitTest`].
    fn unittest() -> Self {
        Params {
            network: Network::Unittest,
            default_port: 18444,
            require_rpc_password: false,
            mining_requires_peers: false,
            default_check_mempool: true,
            allow_min_difficulty_blocks: false,
            mine_blocks_on_demand: true,
            dns_seeds: &[],
            ..Params::mainnet()
        }
    }

    /// The parameters of `network`.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Params::mainnet(),
            Network::Testnet => Params::testnet(),
            Network::Regtest => Params::regtest(),
            Network::Unittest => Params::unittest(),
        }
    }

    /// Blocks between legacy retarget boundaries.
    pub fn interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// Blocks in the averaging-era trailing window.
    pub fn averaging_interval(&self) -> i64 {
        self.interval() * AVERAGING_INTERVAL_MULTIPLIER
    }

    /// Seconds the averaging window is expected to span.
    pub fn averaging_target_timespan(&self) -> i64 {
        self.averaging_interval() * self.pow_target_spacing
    }

    /// Lower damping bound on the measured averaging timespan. Negative by
    /// construction; the division truncates toward zero.
    pub fn min_actual_timespan(&self) -> i64 {
        self.averaging_target_timespan() * (100 - MAX_ADJUST_UP) / 100
    }

    /// Upper damping bound on the measured averaging timespan.
    pub fn max_actual_timespan(&self) -> i64 {
        self.averaging_target_timespan() * (100 + MAX_ADJUST_DOWN) / 100
    }

    /// The checkpointed hash at `height`, if any.
    pub fn checkpoint_expected(&self, height: u32) -> Option<BlockHash> {
        self.checkpoints
            .iter()
            .find(|checkpoint| checkpoint.height == height)
            .map(|checkpoint| BlockHash::from_byte_array(checkpoint.hash))
    }

    /// Whether `hash` is acceptable at `height`: true when the height is not
    /// checkpointed or the hash matches the table.
    pub fn check_block(&self, height: u32, hash: &BlockHash) -> bool {
        match self.checkpoint_expected(height) {
            Some(expected) => expected == *hash,
            None => true,
        }
    }

    /// Height of the highest checkpoint.
    pub fn last_checkpoint_height(&self) -> Option<u32> {
        self.checkpoints.iter().map(|checkpoint| checkpoint.height).max()
    }

    /// Rebuilds the genesis block from scratch and asserts it reproduces the
    /// hard-coded hash and merkle root.
    ///
    /// # Panics
    ///
    /// Panics on any mismatch: the serialization or hashing code no longer
    /// reproduces the chain this node thinks it is on, and continuing would
    /// fork it.
    pub fn verify_genesis(&self) {
        let built = genesis_block(self.network);
        assert_eq!(
            built.header.inner().merkle_root,
            self.genesis.merkle_root,
            "genesis merkle root self-check failed for the {} network",
            self.network
        );
        assert_eq!(
            built.header.block_hash(),
            self.genesis.hash,
            "genesis hash self-check failed for the {} network",
            self.network
        );
    }
}

/// Consensus-parameter overrides available to unit-test harnesses.
#[derive(Debug, Default, Clone, Copy)]
struct TestOverrides {
    subsidy_halving_interval: Option<u32>,
    enforce_block_upgrade_majority: Option<u32>,
    reject_block_outdated_majority: Option<u32>,
    to_check_block_upgrade_majority: Option<u32>,
    default_check_mempool: Option<bool>,
    allow_min_difficulty_blocks: Option<bool>,
    skip_proof_of_work_check: Option<bool>,
}

/// The unit-test parameter set: mainnet-shaped base values plus a mutable
/// override set.
///
/// The setters exist only here; production parameter sets cannot acquire
/// them. Overrides must not be changed concurrently with validation.
#[derive(Debug)]
pub struct UnitTestParams {
    base: Params,
    overrides: RwLock<TestOverrides>,
}

impl UnitTestParams {
    pub(crate) fn new() -> Self {
        UnitTestParams {
            base: Params::unittest(),
            overrides: RwLock::new(TestOverrides::default()),
        }
    }

    /// The immutable base values.
    pub fn base(&self) -> &Params {
        &self.base
    }

    /// Overrides the subsidy halving interval.
    pub fn set_subsidy_halving_interval(&self, blocks: u32) {
        self.overrides.write().subsidy_halving_interval = Some(blocks);
    }

    /// Overrides the upgrade-enforcement majority.
    pub fn set_enforce_block_upgrade_majority(&self, blocks: u32) {
        self.overrides.write().enforce_block_upgrade_majority = Some(blocks);
    }

    /// Overrides the outdated-rejection majority.
    pub fn set_reject_block_outdated_majority(&self, blocks: u32) {
        self.overrides.write().reject_block_outdated_majority = Some(blocks);
    }

    /// Overrides the majority counting window.
    pub fn set_to_check_block_upgrade_majority(&self, blocks: u32) {
        self.overrides.write().to_check_block_upgrade_majority = Some(blocks);
    }

    /// Overrides the default mempool consistency checking flag.
    pub fn set_default_check_mempool(&self, check: bool) {
        self.overrides.write().default_check_mempool = Some(check);
    }

    /// Overrides whether minimum-difficulty blocks are allowed.
    pub fn set_allow_min_difficulty_blocks(&self, allow: bool) {
        self.overrides.write().allow_min_difficulty_blocks = Some(allow);
    }

    /// Overrides whether proof-of-work checking is skipped.
    pub fn set_skip_proof_of_work_check(&self, skip: bool) {
        self.overrides.write().skip_proof_of_work_check = Some(skip);
    }
}

/// The active parameter set: either a production network's immutable values
/// or the unit-test variant with its override capability.
#[derive(Debug)]
pub enum ChainParams {
    /// An immutable production parameter set.
    Production(Params),
    /// The unit-test parameter set with test-only setters.
    UnitTest(UnitTestParams),
}

impl ChainParams {
    /// Builds the parameter set for `network`.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Unittest => ChainParams::UnitTest(UnitTestParams::new()),
            other => ChainParams::Production(Params::for_network(other)),
        }
    }

    /// The immutable base values of the active set.
    pub fn base(&self) -> &Params {
        match self {
            ChainParams::Production(params) => params,
            ChainParams::UnitTest(unit) => unit.base(),
        }
    }

    /// The network this set belongs to.
    pub fn network(&self) -> Network {
        self.base().network
    }

    /// Blocks between block subsidy halvings, override-aware.
    pub fn subsidy_halving_interval(&self) -> u32 {
        match self {
            ChainParams::Production(params) => params.subsidy_halving_interval,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .subsidy_halving_interval
                .unwrap_or(unit.base.subsidy_halving_interval),
        }
    }

    /// Upgrade-enforcement majority, override-aware.
    pub fn enforce_block_upgrade_majority(&self) -> u32 {
        match self {
            ChainParams::Production(params) => params.enforce_block_upgrade_majority,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .enforce_block_upgrade_majority
                .unwrap_or(unit.base.enforce_block_upgrade_majority),
        }
    }

    /// Outdated-rejection majority, override-aware.
    pub fn reject_block_outdated_majority(&self) -> u32 {
        match self {
            ChainParams::Production(params) => params.reject_block_outdated_majority,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .reject_block_outdated_majority
                .unwrap_or(unit.base.reject_block_outdated_majority),
        }
    }

    /// Majority counting window, override-aware.
    pub fn to_check_block_upgrade_majority(&self) -> u32 {
        match self {
            ChainParams::Production(params) => params.to_check_block_upgrade_majority,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .to_check_block_upgrade_majority
                .unwrap_or(unit.base.to_check_block_upgrade_majority),
        }
    }

    /// Default mempool consistency checking, override-aware.
    pub fn default_check_mempool(&self) -> bool {
        match self {
            ChainParams::Production(params) => params.default_check_mempool,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .default_check_mempool
                .unwrap_or(unit.base.default_check_mempool),
        }
    }

    /// Whether minimum-difficulty blocks are allowed, override-aware.
    pub fn allow_min_difficulty_blocks(&self) -> bool {
        match self {
            ChainParams::Production(params) => params.allow_min_difficulty_blocks,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .allow_min_difficulty_blocks
                .unwrap_or(unit.base.allow_min_difficulty_blocks),
        }
    }

    /// Whether proof-of-work checking is skipped, override-aware.
    pub fn skip_proof_of_work_check(&self) -> bool {
        match self {
            ChainParams::Production(params) => params.skip_proof_of_work_check,
            ChainParams::UnitTest(unit) => unit
                .overrides
                .read()
                .skip_proof_of_work_check
                .unwrap_or(unit.base.skip_proof_of_work_check),
        }
    }
}

static CURRENT_PARAMS: OnceCell<ChainParams> = OnceCell::new();

/// Errors from [`select_params`].
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A parameter set was already selected for this process.
    #[error("chain parameters already selected for the {0} network")]
    AlreadySelected(Network),
}

/// Selects the process-wide parameter set. One-shot: a second call fails.
///
/// Runs the genesis self-check for the chosen network before installing it.
pub fn select_params(network: Network) -> Result<&'static ChainParams, SelectionError> {
    let built = ChainParams::for_network(network);
    built.base().verify_genesis();
    CURRENT_PARAMS
        .set(built)
        .map_err(|_| SelectionError::AlreadySelected(params().network()))?;
    info!(network = %network, "chain parameters selected");
    Ok(params())
}

/// The selected parameter set.
///
/// # Panics
///
/// Panics if no network has been selected yet. Consensus code running before
/// selection is caller misuse, not recoverable state.
pub fn params() -> &'static ChainParams {
    CURRENT_PARAMS
        .get()
        .expect("chain parameters consulted before selection; call select_params first")
}

/// The unit-test override handle of the selected parameter set.
///
/// # Panics
///
/// Panics if no network has been selected or a production network is active.
pub fn modifiable_params() -> &'static UnitTestParams {
    match params() {
        ChainParams::UnitTest(unit) => unit,
        ChainParams::Production(production) => panic!(
            "modifiable parameters requested while the {} network is selected",
            production.network
        ),
    }
}
