use clap::Parser;
use scripts::{
    backend::ChainBackend,
    cli::Cli,
    commands::{check_deployment, deploy_contracts},
    config::{DeployConfig, NetworksConfig},
    constants::DEFAULT_RPC_URL,
    errors::ScriptError,
    types::PartialDeployment,
    utils::{setup_client, write_deployments},
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let network = NetworksConfig::load(&cli.networks_file)?.network(&cli.network);
    let rpc_url = cli
        .rpc_url
        .clone()
        .or(network.rpc_url)
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    let config = DeployConfig::new(network.verify)?;
    info!("Deploying governance contracts to {} ({rpc_url})", cli.network);

    let (provider, deployer) = setup_client(&cli.priv_key, &rpc_url).await?;
    let backend = ChainBackend::new(
        provider,
        deployer,
        rpc_url,
        cli.artifacts_dir.clone(),
        config.confirmations,
        config.verify_source,
    );

    let deployments_path = cli.deployments_path();
    match deploy_contracts(&config, &backend).await {
        Ok(deployment) => {
            write_deployments(&deployments_path, &PartialDeployment::from(deployment))?;
            if cli.skip_check {
                warn!("Skipping deployment checks");
            } else if let Err(e) = check_deployment(&config, &backend, &deployment).await {
                error!("{e}");
            }
        }
        Err(failure) => {
            error!("Error {}: {}", failure.step, failure.error);
            error!("Error type: {}", failure.error.kind());
            write_deployments(&deployments_path, &failure.partial)?;
        }
    }

    Ok(())
}
