//! Utilities for the deploy scripts.

use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    process::{Command, Stdio},
    str::FromStr,
};

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{hex, Address};
use tracing::{debug, info};

use crate::{
    constants::{
        BOX_CONTRACT, FORGE_COMMAND, GOVERNANCE_TOKEN_CONTRACT, GOVERNOR_CONTRACT,
        TIMELOCK_CONTRACT, VERIFY_CONTRACT_COMMAND,
    },
    errors::ScriptError,
    types::PartialDeployment,
};

/// Sets up the client with which to deploy and call contracts, returning it
/// along with the address of the deploying account.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<(DynProvider, Address), ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    debug!(chain_id, deployer = %deployer, "connected to network");

    Ok((provider, deployer))
}

/// Reads the deployed addresses from a deployments file, keyed by contract name
pub fn read_deployments(file_path: &Path) -> Result<BTreeMap<String, Address>, ScriptError> {
    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Writes the deployed addresses to a deployments file.
///
/// Governance entries from earlier runs are replaced as a set. Entries for
/// other contracts are kept.
pub fn write_deployments(
    file_path: &Path,
    deployment: &PartialDeployment,
) -> Result<(), ScriptError> {
    let mut deployments = if file_path.exists() {
        read_deployments(file_path)?
    } else {
        BTreeMap::new()
    };

    for name in [
        GOVERNANCE_TOKEN_CONTRACT,
        TIMELOCK_CONTRACT,
        GOVERNOR_CONTRACT,
        BOX_CONTRACT,
    ] {
        deployments.remove(name);
    }
    for (name, address) in deployment.contracts() {
        deployments.insert(name.to_string(), address);
    }

    let contents = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    info!("Deployments written to {}", file_path.display());
    Ok(())
}

/// Run a command, mapping a failed exit status to the given error message
fn command_success_or(mut cmd: Command, err_msg: &str) -> Result<(), ScriptError> {
    if !cmd
        .output()
        .map_err(|e| ScriptError::ContractVerification(e.to_string()))?
        .status
        .success()
    {
        Err(ScriptError::ContractVerification(String::from(err_msg)))
    } else {
        Ok(())
    }
}

/// Verifies the source of a deployed contract on the network's block explorer.
///
/// Assumes that `forge` is locally available and that the explorer API key
/// is set in the environment.
pub fn verify_contract(
    rpc_url: &str,
    address: Address,
    contract_name: &str,
    constructor_args: &[u8],
) -> Result<(), ScriptError> {
    let mut verify_cmd = Command::new(FORGE_COMMAND);
    verify_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    verify_cmd.arg(VERIFY_CONTRACT_COMMAND);
    verify_cmd.arg("--rpc-url");
    verify_cmd.arg(rpc_url);
    if !constructor_args.is_empty() {
        verify_cmd.arg("--constructor-args");
        verify_cmd.arg(hex::encode_prefixed(constructor_args));
    }
    // Block until the explorer reports a result
    verify_cmd.arg("--watch");
    verify_cmd.arg(format!("{address:#x}"));
    verify_cmd.arg(contract_name);

    command_success_or(
        verify_cmd,
        &format!("Failed to verify {contract_name} at {address:#x}"),
    )
}
