//! Implementations of the governance deploy scripts

use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use crate::{
    backend::GovernanceBackend,
    config::DeployConfig,
    errors::ScriptError,
    types::{DeployFailure, DeployStep, GovernanceDeployment, GovernorParams, PartialDeployment},
};

/// Deploy the governance system and wire its contracts together.
///
/// The steps run strictly in order, each waiting for its transactions to be
/// confirmed. The first failing step ends the run; anything deployed before
/// it is left in place and returned in the failure.
pub async fn deploy_contracts<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
) -> Result<GovernanceDeployment, DeployFailure> {
    let account = backend.deployer();
    let mut partial = PartialDeployment::default();
    debug!(initial_supply = %config.initial_supply, "initial token supply");

    let fail = |step: DeployStep, partial: PartialDeployment| {
        move |error: ScriptError| DeployFailure {
            step,
            error,
            partial,
        }
    };

    let token = deploy_token(config, backend)
        .await
        .map_err(fail(DeployStep::GovernanceToken, partial))?;
    partial.token = Some(token);

    let num_checkpoints = delegate_votes(config, backend, token, account)
        .await
        .map_err(fail(DeployStep::Delegation, partial))?;
    partial.num_checkpoints = Some(num_checkpoints);

    let timelock = deploy_timelock(config, backend, account)
        .await
        .map_err(fail(DeployStep::TimeLock, partial))?;
    partial.timelock = Some(timelock);

    let governor = deploy_governor(config, backend, token, timelock)
        .await
        .map_err(fail(DeployStep::Governor, partial))?;
    partial.governor = Some(governor);

    setup_roles(config, backend, timelock, governor, account)
        .await
        .map_err(fail(DeployStep::Roles, partial))?;
    partial.roles_granted = true;

    let target = deploy_box(backend)
        .await
        .map_err(fail(DeployStep::Box, partial))?;
    partial.target = Some(target);

    transfer_box_ownership(backend, target, timelock)
        .await
        .map_err(fail(DeployStep::Box, partial))?;

    Ok(GovernanceDeployment {
        token,
        num_checkpoints,
        timelock,
        governor,
        target,
    })
}

/// Deploy the governance token
async fn deploy_token<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
) -> Result<Address, ScriptError> {
    let token = backend
        .deploy_token(U256::from(config.initial_supply_param))
        .await?;
    info!("Governance Token deployed at: {token:#x}");
    Ok(token)
}

/// Self-delegate the deployer's voting power, returning the deployer's
/// checkpoint count afterwards
async fn delegate_votes<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
    token: Address,
    account: Address,
) -> Result<u32, ScriptError> {
    backend
        .delegate(token, account, config.delegate_gas_limit)
        .await?;
    let num_checkpoints = backend.num_checkpoints(token, account).await?;
    info!("Number of CheckPoints: {num_checkpoints}");
    Ok(num_checkpoints)
}

/// Deploy the timelock with no proposers or executors, administered by the deployer
async fn deploy_timelock<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
    admin: Address,
) -> Result<Address, ScriptError> {
    let timelock = backend
        .deploy_timelock(
            U256::from(config.min_delay),
            Vec::new(), /* proposers */
            Vec::new(), /* executors */
            admin,
        )
        .await?;
    info!("Governance TimeLock deployed at: {timelock:#x}");
    Ok(timelock)
}

/// Deploy the governor over the given token and timelock
async fn deploy_governor<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
    token: Address,
    timelock: Address,
) -> Result<Address, ScriptError> {
    let governor = backend
        .deploy_governor(governor_params(config, token, timelock))
        .await?;
    info!("Governor deployed at: {governor:#x}");
    Ok(governor)
}

/// The parameters the governor is constructed with
fn governor_params(config: &DeployConfig, token: Address, timelock: Address) -> GovernorParams {
    GovernorParams {
        token,
        timelock,
        quorum_percentage: U256::from(config.quorum_percentage),
        voting_period: U256::from(config.voting_period),
        voting_delay: U256::from(config.voting_delay),
    }
}

/// Grant the timelock's proposer role to the governor, its executor role to
/// the configured executor, and its admin role to the deployer
async fn setup_roles<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
    timelock: Address,
    governor: Address,
    account: Address,
) -> Result<(), ScriptError> {
    let roles = backend.timelock_roles(timelock).await?;

    backend
        .grant_role(timelock, roles.proposer, governor)
        .await?;
    backend
        .grant_role(timelock, roles.executor, config.executor)
        .await?;
    backend.grant_role(timelock, roles.admin, account).await?;

    info!("Roles set up successfully.");
    Ok(())
}

/// Deploy the box, owned by the deployer until it is handed to the timelock
async fn deploy_box<B: GovernanceBackend>(backend: &B) -> Result<Address, ScriptError> {
    let target = backend.deploy_box().await?;
    info!("Box deployed at: {target:#x}");
    Ok(target)
}

/// Transfer ownership of the box to the timelock
async fn transfer_box_ownership<B: GovernanceBackend>(
    backend: &B,
    target: Address,
    timelock: Address,
) -> Result<(), ScriptError> {
    backend.transfer_ownership(target, timelock).await?;
    info!("Box ownership transferred to TimeLock.");
    Ok(())
}

/// Check that a completed deployment is wired up as expected
pub async fn check_deployment<B: GovernanceBackend>(
    config: &DeployConfig,
    backend: &B,
    deployment: &GovernanceDeployment,
) -> Result<(), ScriptError> {
    let GovernanceDeployment {
        token,
        timelock,
        governor,
        target,
        ..
    } = *deployment;

    let roles = backend.timelock_roles(timelock).await?;
    let expected_roles = [
        ("proposer", roles.proposer, governor),
        ("executor", roles.executor, config.executor),
        ("admin", roles.admin, backend.deployer()),
    ];
    for (name, role, account) in expected_roles {
        if !backend.has_role(timelock, role, account).await? {
            return Err(ScriptError::DeploymentCheck(format!(
                "{account:#x} does not hold the timelock {name} role"
            )));
        }
    }

    let owner = backend.owner(target).await?;
    if owner != timelock {
        return Err(ScriptError::DeploymentCheck(format!(
            "box is owned by {owner:#x}, expected the timelock at {timelock:#x}"
        )));
    }

    let expected_params = governor_params(config, token, timelock);
    let params = backend.governor_params(governor).await?;
    if params != expected_params {
        return Err(ScriptError::DeploymentCheck(format!(
            "governor reports {params:?}, expected {expected_params:?}"
        )));
    }

    info!("Deployment checks passed");
    Ok(())
}
