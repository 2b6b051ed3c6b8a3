//! Configuration of a governance deployment
//!
//! The governance parameters are fixed at compile time; the per-network
//! settings are read from a JSON file keyed by network name. A missing file
//! configures no networks.

use std::{collections::HashMap, fs, path::Path};

use alloy_primitives::{utils::parse_ether, Address, U256};
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{
        DELEGATE_GAS_LIMIT, INITIAL_SUPPLY_ETHER, INITIAL_SUPPLY_PARAM, MIN_DELAY,
        NUM_DEPLOY_CONFIRMATIONS, QUORUM_PERCENTAGE, VOTING_DELAY, VOTING_PERIOD, ZERO_ADDRESS,
    },
    errors::ScriptError,
};

/// The parameters of a governance deployment, constructed once at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployConfig {
    /// The quorum, as a percentage of the token supply
    pub quorum_percentage: u64,
    /// The voting period, in blocks
    pub voting_period: u64,
    /// The voting delay, in blocks
    pub voting_delay: u64,
    /// The timelock's minimum delay, in seconds
    pub min_delay: u64,
    /// The parameter passed to the governance token's constructor
    pub initial_supply_param: u64,
    /// The initial token supply in wei. Not passed to any contract.
    pub initial_supply: U256,
    /// The account granted the timelock's executor role
    pub executor: Address,
    /// The number of confirmations to wait for on each transaction
    pub confirmations: u64,
    /// The gas limit for the self-delegation transaction
    pub delegate_gas_limit: u64,
    /// Whether to verify contract sources after deploying them
    pub verify_source: bool,
}

impl DeployConfig {
    /// Build the deployment config for a network with the given verification setting
    pub fn new(verify_source: bool) -> Result<Self, ScriptError> {
        let initial_supply = parse_ether(INITIAL_SUPPLY_ETHER)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

        Ok(Self {
            quorum_percentage: QUORUM_PERCENTAGE,
            voting_period: VOTING_PERIOD,
            voting_delay: VOTING_DELAY,
            min_delay: MIN_DELAY,
            initial_supply_param: INITIAL_SUPPLY_PARAM,
            initial_supply,
            executor: ZERO_ADDRESS,
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
            delegate_gas_limit: DELEGATE_GAS_LIMIT,
            verify_source,
        })
    }
}

/// Settings for a single network
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The RPC URL of the network, if not given on the command line
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Whether to verify contract sources on this network
    #[serde(default)]
    pub verify: bool,
}

/// Per-network settings, keyed by network name
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct NetworksConfig(HashMap<String, NetworkConfig>);

impl NetworksConfig {
    /// Read the networks file, returning an empty config if it does not exist
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        if !path.exists() {
            debug!("no networks file at {}", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;
        Self::parse(&contents)
    }

    /// Parse a networks config from its JSON contents
    pub fn parse(contents: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
    }

    /// Get the settings for the given network, defaulting if it is not configured
    pub fn network(&self, name: &str) -> NetworkConfig {
        self.0.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::Path};

    use alloy_primitives::{Address, U256};

    use super::{DeployConfig, NetworksConfig};

    #[test]
    fn test_default_parameters() {
        let config = DeployConfig::new(false).unwrap();

        assert_eq!(config.quorum_percentage, 4);
        assert_eq!(config.voting_period, 50);
        assert_eq!(config.voting_delay, 1);
        assert_eq!(config.min_delay, 5);
        assert_eq!(config.initial_supply_param, 2);
        assert_eq!(config.executor, Address::ZERO);
        assert_eq!(config.confirmations, 1);
        assert_eq!(
            config.initial_supply,
            U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn test_network_lookup() {
        let networks = NetworksConfig::parse(
            r#"{
                "sepolia": { "rpc_url": "https://rpc.sepolia.org", "verify": true },
                "devnet": {}
            }"#,
        )
        .unwrap();

        let sepolia = networks.network("sepolia");
        assert!(sepolia.verify);
        assert_eq!(sepolia.rpc_url.as_deref(), Some("https://rpc.sepolia.org"));

        assert!(!networks.network("devnet").verify);
        assert!(!networks.network("mainnet-fork").verify);
    }

    #[test]
    fn test_missing_networks_file() {
        let path = env::temp_dir().join(format!("no-networks-{}.json", std::process::id()));
        let networks = NetworksConfig::load(&path).unwrap();
        assert_eq!(networks.network("devnet").rpc_url, None);
        assert!(!networks.network("devnet").verify);
    }

    #[test]
    fn test_load_networks_file() {
        let path = env::temp_dir().join(format!("networks-{}.json", std::process::id()));
        fs::write(&path, r#"{ "sepolia": { "verify": true } }"#).unwrap();

        let networks = NetworksConfig::load(&path).unwrap();
        assert!(networks.network("sepolia").verify);
        assert_eq!(networks.network("sepolia").rpc_url, None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bundled_networks_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../networks.json");
        let networks = NetworksConfig::load(&path).unwrap();

        let devnet = networks.network("devnet");
        assert_eq!(devnet.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert!(!devnet.verify);
        assert!(networks.network("sepolia").verify);
    }

    #[test]
    fn test_malformed_networks_file() {
        assert!(NetworksConfig::parse("not json").is_err());
    }
}
