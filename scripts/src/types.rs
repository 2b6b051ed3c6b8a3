//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy_primitives::{Address, B256, U256};

use crate::{
    constants::{BOX_CONTRACT, GOVERNANCE_TOKEN_CONTRACT, GOVERNOR_CONTRACT, TIMELOCK_CONTRACT},
    errors::ScriptError,
};

/// The steps of a governance deployment, in the order they are run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeployStep {
    /// Deploy the governance token
    GovernanceToken,
    /// Self-delegate the deployer's voting power
    Delegation,
    /// Deploy the timelock
    TimeLock,
    /// Deploy the governor
    Governor,
    /// Grant the timelock's roles
    Roles,
    /// Deploy the box and hand its ownership to the timelock
    Box,
}

impl Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployStep::GovernanceToken => write!(f, "deploying Governance Token"),
            DeployStep::Delegation => write!(f, "delegating Governance Token"),
            DeployStep::TimeLock => write!(f, "deploying Governance TimeLock"),
            DeployStep::Governor => write!(f, "deploying Governor"),
            DeployStep::Roles => write!(f, "setting up roles"),
            DeployStep::Box => write!(f, "deploying Box or transferring ownership"),
        }
    }
}

/// The role identifiers exposed by the timelock
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimelockRoles {
    /// The role allowed to queue proposals
    pub proposer: B256,
    /// The role allowed to execute queued proposals
    pub executor: B256,
    /// The role allowed to administer the timelock
    pub admin: B256,
}

/// The constructor parameters of a governor, also read back from a deployed one
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GovernorParams {
    /// The voting token
    pub token: Address,
    /// The timelock through which proposals execute
    pub timelock: Address,
    /// The quorum, as a percentage of the token supply
    pub quorum_percentage: U256,
    /// The voting period, in blocks
    pub voting_period: U256,
    /// The voting delay, in blocks
    pub voting_delay: U256,
}

/// The result of a complete governance deployment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GovernanceDeployment {
    /// The governance token address
    pub token: Address,
    /// The deployer's checkpoint count after self-delegation
    pub num_checkpoints: u32,
    /// The timelock address
    pub timelock: Address,
    /// The governor address
    pub governor: Address,
    /// The governed box address
    pub target: Address,
}

/// The addresses deployed so far in a governance deployment
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialDeployment {
    /// The governance token address
    pub token: Option<Address>,
    /// The deployer's checkpoint count after self-delegation
    pub num_checkpoints: Option<u32>,
    /// The timelock address
    pub timelock: Option<Address>,
    /// The governor address
    pub governor: Option<Address>,
    /// Whether the timelock's roles were granted
    pub roles_granted: bool,
    /// The governed box address
    pub target: Option<Address>,
}

impl PartialDeployment {
    /// The deployed contracts, keyed by contract name, in deployment order
    pub fn contracts(&self) -> Vec<(&'static str, Address)> {
        [
            (GOVERNANCE_TOKEN_CONTRACT, self.token),
            (TIMELOCK_CONTRACT, self.timelock),
            (GOVERNOR_CONTRACT, self.governor),
            (BOX_CONTRACT, self.target),
        ]
        .into_iter()
        .filter_map(|(name, addr)| addr.map(|addr| (name, addr)))
        .collect()
    }
}

impl From<GovernanceDeployment> for PartialDeployment {
    fn from(deployment: GovernanceDeployment) -> Self {
        Self {
            token: Some(deployment.token),
            num_checkpoints: Some(deployment.num_checkpoints),
            timelock: Some(deployment.timelock),
            governor: Some(deployment.governor),
            roles_granted: true,
            target: Some(deployment.target),
        }
    }
}

/// A governance deployment that stopped at a failed step.
///
/// Steps completed before the failure are left in place on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployFailure {
    /// The step that failed
    pub step: DeployStep,
    /// The error raised by the step
    pub error: ScriptError,
    /// The contracts deployed before the failure
    pub partial: PartialDeployment,
}

impl Display for DeployFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.step, self.error)
    }
}

impl std::error::Error for DeployFailure {}
