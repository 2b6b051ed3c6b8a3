//! Constants used in the governance deploy scripts

use alloy_primitives::Address;

// --------------------------
// | Governance Parameters |
// --------------------------

/// The percentage of the token supply that must vote for a proposal to reach quorum
pub const QUORUM_PERCENTAGE: u64 = 4;

/// The number of blocks a proposal stays open for voting (roughly 10 minutes)
pub const VOTING_PERIOD: u64 = 50;

/// The number of blocks between proposal creation and the start of voting
pub const VOTING_DELAY: u64 = 1;

/// The minimum delay, in seconds, between queueing and executing a proposal
pub const MIN_DELAY: u64 = 5;

/// The parameter passed to the governance token's constructor
pub const INITIAL_SUPPLY_PARAM: u64 = 2;

/// The initial token supply, denominated in ether
pub const INITIAL_SUPPLY_ETHER: &str = "100";

/// The zero address, granted the executor role so that anyone may execute
/// a queued proposal
pub const ZERO_ADDRESS: Address = Address::ZERO;

// ----------------
// | Transactions |
// ----------------

/// The number of confirmations to wait for on each transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The gas limit used for the self-delegation transaction
pub const DELEGATE_GAS_LIMIT: u64 = 3_000_000;

// -------------
// | Contracts |
// -------------

/// The name of the governance token contract artifact
pub const GOVERNANCE_TOKEN_CONTRACT: &str = "GovernanceToken";

/// The name of the timelock contract artifact
pub const TIMELOCK_CONTRACT: &str = "TimeLock";

/// The name of the governor contract artifact
pub const GOVERNOR_CONTRACT: &str = "MoralisGovernor";

/// The name of the governed box contract artifact
pub const BOX_CONTRACT: &str = "Box";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The extension of a Solidity source file, used as a directory name
/// in the forge artifact layout
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The key under which creation bytecode is stored in an artifact
pub const BYTECODE_KEY: &str = "bytecode";

/// The key under which the bytecode hex is nested in a forge artifact
pub const BYTECODE_OBJECT_KEY: &str = "object";

// -----------
// | Network |
// -----------

/// The default network name
pub const DEFAULT_NETWORK: &str = "devnet";

/// The default RPC URL, a local Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default private key, the first default account in an Anvil node
pub const DEFAULT_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "out";

/// The default per-network settings file
pub const DEFAULT_NETWORKS_FILE: &str = "networks.json";

// ----------------
// | Verification |
// ----------------

/// The name of the forge command
pub const FORGE_COMMAND: &str = "forge";

/// The forge subcommand used to verify a contract's source
pub const VERIFY_CONTRACT_COMMAND: &str = "verify-contract";
