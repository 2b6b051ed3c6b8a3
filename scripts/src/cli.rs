//! Definitions of CLI arguments for the governance deploy script

use std::path::PathBuf;

use clap::Parser;

use crate::constants::{
    DEFAULT_ARTIFACTS_DIR, DEFAULT_NETWORK, DEFAULT_NETWORKS_FILE, DEFAULT_PKEY,
};

/// Deploy the governance token, timelock, governor and governed box,
/// and hand control of the box to the timelock.
///
/// Every argument has a default, targeting a local devnet node.
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer, defaults to the first Anvil dev account
    #[arg(short, long, env = "PRIV_KEY", default_value = DEFAULT_PKEY)]
    pub priv_key: String,

    /// Network RPC URL, overrides the URL configured for the network
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// The name of the network being deployed to
    #[arg(short, long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to a JSON file of per-network settings, ignored if it does not exist
    #[arg(long, default_value = DEFAULT_NETWORKS_FILE)]
    pub networks_file: PathBuf,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Path to the file the deployed addresses are written to,
    /// defaults to `deployments.<network>.json`
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// Skip checking the on-chain state after a successful deployment
    #[arg(long)]
    pub skip_check: bool,
}

impl Cli {
    /// The path of the deployments file for this run
    pub fn deployments_path(&self) -> PathBuf {
        self.deployments_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("deployments.{}.json", self.network)))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Cli;
    use crate::constants::DEFAULT_PKEY;

    #[test]
    fn test_zero_arguments() {
        let cli = Cli::try_parse_from(["deploy-governance"]).unwrap();

        assert_eq!(cli.network, "devnet");
        assert_eq!(cli.artifacts_dir, PathBuf::from("out"));
        assert_eq!(cli.networks_file, PathBuf::from("networks.json"));
        assert_eq!(cli.deployments_path(), PathBuf::from("deployments.devnet.json"));
        assert!(!cli.skip_check);
        // The env fallbacks may be set where the tests run
        if std::env::var("PRIV_KEY").is_err() {
            assert_eq!(cli.priv_key, DEFAULT_PKEY);
        }
    }

    #[test]
    fn test_network_names_deployments_file() {
        let cli = Cli::try_parse_from(["deploy-governance", "--network", "sepolia"]).unwrap();
        assert_eq!(cli.deployments_path(), PathBuf::from("deployments.sepolia.json"));
    }
}
