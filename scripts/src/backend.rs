//! The remote call surface used by the deployment, and its implementation
//! over an alloy provider

use std::path::PathBuf;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use alloy_contract::{CallBuilder, CallDecoder};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolValue;
use tracing::{debug, info};

use crate::{
    artifacts::load_bytecode,
    constants::{BOX_CONTRACT, GOVERNANCE_TOKEN_CONTRACT, GOVERNOR_CONTRACT, TIMELOCK_CONTRACT},
    errors::ScriptError,
    solidity::{IBox, IGovernanceToken, IGovernor, ITimeLock},
    types::{GovernorParams, TimelockRoles},
    utils::verify_contract,
};

/// The contract calls made while deploying the governance system.
///
/// State-changing methods return once their transaction is confirmed.
#[allow(async_fn_in_trait)]
pub trait GovernanceBackend {
    /// The account sending every transaction
    fn deployer(&self) -> Address;

    /// Deploy the governance token
    async fn deploy_token(&self, initial_supply_param: U256) -> Result<Address, ScriptError>;

    /// Delegate the sender's voting power on `token` to `delegatee`
    async fn delegate(
        &self,
        token: Address,
        delegatee: Address,
        gas_limit: u64,
    ) -> Result<(), ScriptError>;

    /// The number of voting power checkpoints recorded for `account`
    async fn num_checkpoints(&self, token: Address, account: Address)
        -> Result<u32, ScriptError>;

    /// Deploy the timelock
    async fn deploy_timelock(
        &self,
        min_delay: U256,
        proposers: Vec<Address>,
        executors: Vec<Address>,
        admin: Address,
    ) -> Result<Address, ScriptError>;

    /// Read the timelock's role identifiers
    async fn timelock_roles(&self, timelock: Address) -> Result<TimelockRoles, ScriptError>;

    /// Grant `role` on the timelock to `account`
    async fn grant_role(
        &self,
        timelock: Address,
        role: B256,
        account: Address,
    ) -> Result<(), ScriptError>;

    /// Whether `account` holds `role` on the timelock
    async fn has_role(
        &self,
        timelock: Address,
        role: B256,
        account: Address,
    ) -> Result<bool, ScriptError>;

    /// Deploy the governor
    async fn deploy_governor(&self, params: GovernorParams) -> Result<Address, ScriptError>;

    /// Read the parameters a deployed governor reports
    async fn governor_params(&self, governor: Address) -> Result<GovernorParams, ScriptError>;

    /// Deploy the governed box
    async fn deploy_box(&self) -> Result<Address, ScriptError>;

    /// Transfer ownership of the box to `new_owner`
    async fn transfer_ownership(
        &self,
        target: Address,
        new_owner: Address,
    ) -> Result<(), ScriptError>;

    /// The current owner of the box
    async fn owner(&self, target: Address) -> Result<Address, ScriptError>;
}

/// The call builder type used by the chain backend
type ChainCallBuilder<'a, C> = CallBuilder<(), &'a &'a DynProvider, C, Ethereum>;

/// A [`GovernanceBackend`] sending transactions through an RPC provider
/// with a local signer attached
pub struct ChainBackend {
    /// The provider, with the deployer's wallet attached
    provider: DynProvider,
    /// The deployer's address
    deployer: Address,
    /// The RPC URL, passed along when verifying contracts
    rpc_url: String,
    /// The directory containing compiled contract artifacts
    artifacts_dir: PathBuf,
    /// The number of confirmations to wait for on each transaction
    confirmations: u64,
    /// Whether to verify contract sources after deploying them
    verify_source: bool,
}

impl ChainBackend {
    /// Create a new chain backend
    pub fn new(
        provider: DynProvider,
        deployer: Address,
        rpc_url: String,
        artifacts_dir: PathBuf,
        confirmations: u64,
        verify_source: bool,
    ) -> Self {
        Self {
            provider,
            deployer,
            rpc_url,
            artifacts_dir,
            confirmations,
            verify_source,
        }
    }

    /// Deploy the named contract with the given ABI-encoded constructor
    /// arguments, returning its address
    async fn deploy_contract(
        &self,
        contract_name: &str,
        constructor_args: Vec<u8>,
        verify: bool,
    ) -> Result<Address, ScriptError> {
        let mut code = load_bytecode(&self.artifacts_dir, contract_name)?.to_vec();
        code.extend_from_slice(&constructor_args);

        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(code);
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        check_receipt(&receipt, contract_name)?;

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract address in receipt for {contract_name}"
            ))
        })?;
        debug!(
            tx_hash = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "{contract_name} deployment confirmed"
        );

        if verify {
            info!("Verifying {contract_name} at {address:#x}");
            verify_contract(&self.rpc_url, address, contract_name, &constructor_args)?;
        }

        Ok(address)
    }

    /// Whether the named contract's source is verified after deploying it.
    /// The box is never verified.
    fn verifies_source(&self, contract_name: &str) -> bool {
        self.verify_source && contract_name != BOX_CONTRACT
    }

    /// Send a contract call as a transaction and wait for it to be confirmed
    async fn send_tx<C: CallDecoder>(
        &self,
        tx: ChainCallBuilder<'_, C>,
        description: &str,
    ) -> Result<TransactionReceipt, ScriptError> {
        let receipt = tx
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        check_receipt(&receipt, description)?;

        Ok(receipt)
    }
}

// --------------------
// | Constructor Args |
// --------------------

/// ABI-encode the governance token's constructor arguments
pub fn token_constructor_args(initial_supply_param: U256) -> Vec<u8> {
    (initial_supply_param,).abi_encode_params()
}

/// ABI-encode the timelock's constructor arguments,
/// `(uint256 minDelay, address[] proposers, address[] executors, address admin)`
pub fn timelock_constructor_args(
    min_delay: U256,
    proposers: Vec<Address>,
    executors: Vec<Address>,
    admin: Address,
) -> Vec<u8> {
    (min_delay, proposers, executors, admin).abi_encode_params()
}

/// ABI-encode the governor's constructor arguments, `(address token,
/// address timelock, uint256 quorumPercentage, uint256 votingPeriod, uint256 votingDelay)`
pub fn governor_constructor_args(params: &GovernorParams) -> Vec<u8> {
    (
        params.token,
        params.timelock,
        params.quorum_percentage,
        params.voting_period,
        params.voting_delay,
    )
        .abi_encode_params()
}

/// Ensure a mined transaction succeeded
fn check_receipt(receipt: &TransactionReceipt, description: &str) -> Result<(), ScriptError> {
    if receipt.status() {
        Ok(())
    } else {
        Err(ScriptError::TransactionReverted(format!(
            "{description} (tx {})",
            receipt.transaction_hash
        )))
    }
}

impl GovernanceBackend for ChainBackend {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn deploy_token(&self, initial_supply_param: U256) -> Result<Address, ScriptError> {
        let args = token_constructor_args(initial_supply_param);
        let verify = self.verifies_source(GOVERNANCE_TOKEN_CONTRACT);
        self.deploy_contract(GOVERNANCE_TOKEN_CONTRACT, args, verify)
            .await
    }

    async fn delegate(
        &self,
        token: Address,
        delegatee: Address,
        gas_limit: u64,
    ) -> Result<(), ScriptError> {
        let token = IGovernanceToken::new(token, &self.provider);
        self.send_tx(token.delegate(delegatee).gas(gas_limit), "delegate")
            .await?;
        Ok(())
    }

    async fn num_checkpoints(
        &self,
        token: Address,
        account: Address,
    ) -> Result<u32, ScriptError> {
        let token = IGovernanceToken::new(token, &self.provider);
        let checkpoints = token
            .numCheckpoints(account)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        Ok(checkpoints)
    }

    async fn deploy_timelock(
        &self,
        min_delay: U256,
        proposers: Vec<Address>,
        executors: Vec<Address>,
        admin: Address,
    ) -> Result<Address, ScriptError> {
        let args = timelock_constructor_args(min_delay, proposers, executors, admin);
        let verify = self.verifies_source(TIMELOCK_CONTRACT);
        self.deploy_contract(TIMELOCK_CONTRACT, args, verify).await
    }

    async fn timelock_roles(&self, timelock: Address) -> Result<TimelockRoles, ScriptError> {
        let timelock = ITimeLock::new(timelock, &self.provider);
        let proposer = timelock
            .PROPOSER_ROLE()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let executor = timelock
            .EXECUTOR_ROLE()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let admin = timelock
            .TIMELOCK_ADMIN_ROLE()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;

        Ok(TimelockRoles {
            proposer,
            executor,
            admin,
        })
    }

    async fn grant_role(
        &self,
        timelock: Address,
        role: B256,
        account: Address,
    ) -> Result<(), ScriptError> {
        let timelock = ITimeLock::new(timelock, &self.provider);
        self.send_tx(timelock.grantRole(role, account), "grantRole")
            .await?;
        Ok(())
    }

    async fn has_role(
        &self,
        timelock: Address,
        role: B256,
        account: Address,
    ) -> Result<bool, ScriptError> {
        let timelock = ITimeLock::new(timelock, &self.provider);
        let has_role = timelock
            .hasRole(role, account)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        Ok(has_role)
    }

    async fn deploy_governor(&self, params: GovernorParams) -> Result<Address, ScriptError> {
        let args = governor_constructor_args(&params);
        let verify = self.verifies_source(GOVERNOR_CONTRACT);
        self.deploy_contract(GOVERNOR_CONTRACT, args, verify).await
    }

    async fn governor_params(&self, governor: Address) -> Result<GovernorParams, ScriptError> {
        let governor = IGovernor::new(governor, &self.provider);
        let token = governor
            .token()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let timelock = governor
            .timelock()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let quorum_percentage = governor
            .quorumNumerator()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let voting_period = governor
            .votingPeriod()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let voting_delay = governor
            .votingDelay()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;

        Ok(GovernorParams {
            token,
            timelock,
            quorum_percentage,
            voting_period,
            voting_delay,
        })
    }

    async fn deploy_box(&self) -> Result<Address, ScriptError> {
        let verify = self.verifies_source(BOX_CONTRACT);
        self.deploy_contract(BOX_CONTRACT, Vec::new(), verify).await
    }

    async fn transfer_ownership(
        &self,
        target: Address,
        new_owner: Address,
    ) -> Result<(), ScriptError> {
        let target = IBox::new(target, &self.provider);
        self.send_tx(target.transferOwnership(new_owner), "transferOwnership")
            .await?;
        Ok(())
    }

    async fn owner(&self, target: Address) -> Result<Address, ScriptError> {
        let target = IBox::new(target, &self.provider);
        let owner = target
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy::{
        providers::{DynProvider, ProviderBuilder},
        transports::http::reqwest::Url,
    };
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::SolValue;

    use super::{
        governor_constructor_args, timelock_constructor_args, token_constructor_args,
        ChainBackend,
    };
    use crate::{
        constants::{BOX_CONTRACT, GOVERNANCE_TOKEN_CONTRACT, GOVERNOR_CONTRACT, TIMELOCK_CONTRACT},
        types::GovernorParams,
    };

    /// The size of an ABI word in bytes
    const WORD: usize = 32;

    /// Read the ABI word at the given index as a `U256`
    fn word(args: &[u8], index: usize) -> U256 {
        U256::from_be_slice(&args[index * WORD..(index + 1) * WORD])
    }

    /// A chain backend whose provider is never called
    fn test_backend(verify_source: bool) -> ChainBackend {
        let url = Url::parse("http://127.0.0.1:8545").unwrap();
        let provider = DynProvider::new(ProviderBuilder::new().on_http(url));
        ChainBackend::new(
            provider,
            Address::repeat_byte(0xde),
            "http://127.0.0.1:8545".to_string(),
            PathBuf::from("out"),
            1, /* confirmations */
            verify_source,
        )
    }

    #[test]
    fn test_token_args() {
        let args = token_constructor_args(U256::from(2u64));
        assert_eq!(args.len(), WORD);
        assert_eq!(word(&args, 0), U256::from(2u64));
    }

    #[test]
    fn test_timelock_args_layout() {
        let admin = Address::repeat_byte(0xde);
        let args = timelock_constructor_args(U256::from(5u64), vec![], vec![], admin);

        // Four head words followed by a zero length word for each empty array
        assert_eq!(args.len(), 6 * WORD);
        assert_eq!(word(&args, 0), U256::from(5u64));
        assert_eq!(word(&args, 1), U256::from(4 * WORD));
        assert_eq!(word(&args, 2), U256::from(5 * WORD));
        assert_eq!(&args[3 * WORD + 12..4 * WORD], admin.as_slice());
        assert_eq!(word(&args, 4), U256::ZERO);
        assert_eq!(word(&args, 5), U256::ZERO);

        let (min_delay, proposers, executors, decoded_admin) =
            <(U256, Vec<Address>, Vec<Address>, Address)>::abi_decode_params(&args, true)
                .unwrap();
        assert_eq!(min_delay, U256::from(5u64));
        assert!(proposers.is_empty());
        assert!(executors.is_empty());
        assert_eq!(decoded_admin, admin);
    }

    #[test]
    fn test_governor_args_order() {
        let params = GovernorParams {
            token: Address::repeat_byte(0x01),
            timelock: Address::repeat_byte(0x02),
            quorum_percentage: U256::from(4u64),
            voting_period: U256::from(50u64),
            voting_delay: U256::from(1u64),
        };
        let args = governor_constructor_args(&params);

        assert_eq!(args.len(), 5 * WORD);
        let (token, timelock, quorum, period, delay) =
            <(Address, Address, U256, U256, U256)>::abi_decode_params(&args, true).unwrap();
        assert_eq!(token, params.token);
        assert_eq!(timelock, params.timelock);
        assert_eq!(quorum, U256::from(4u64));
        assert_eq!(period, U256::from(50u64));
        assert_eq!(delay, U256::from(1u64));
    }

    #[test]
    fn test_box_is_never_verified() {
        let backend = test_backend(true /* verify_source */);
        assert!(backend.verifies_source(GOVERNANCE_TOKEN_CONTRACT));
        assert!(backend.verifies_source(TIMELOCK_CONTRACT));
        assert!(backend.verifies_source(GOVERNOR_CONTRACT));
        assert!(!backend.verifies_source(BOX_CONTRACT));

        let backend = test_backend(false /* verify_source */);
        assert!(!backend.verifies_source(GOVERNANCE_TOKEN_CONTRACT));
        assert!(!backend.verifies_source(BOX_CONTRACT));
    }
}
