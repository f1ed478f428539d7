// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::DeployArgs;
use crate::evm_network::{deployer_wallet, rpc_url};
use crate::exit_code::{
    deployment_error_exit_code, ExitCodeError, INVALID_INPUT_EXIT_CODE, IO_ERROR,
    OUTCOME_UNKNOWN_EXIT_CODE,
};
use alloy::providers::ProviderBuilder;
use color_eyre::eyre::{eyre, Report as EyreReport, WrapErr};
use color_eyre::Section;
use distributor_evm::contract::load_bytecode;
use distributor_evm::{
    AlloyFactory, DeploymentExecutor, DeploymentParameters, DeploymentResult, EmissionSchedule,
    ExecutorConfig, NetworkRegistry, ParameterResolver, Report, TokenSet, TransactionConfig,
    Variant,
};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

pub async fn deploy(args: DeployArgs, registry: &NetworkRegistry) -> Result<(), ExitCodeError> {
    let params = resolve(&args, registry)?;

    if args.dry_run {
        println!("Dry run, nothing was submitted. Resolved parameters:");
        println!("{}", to_json(&params)?);
        return Ok(());
    }

    if let Some(path) = &args.output {
        if let Some(existing) = read_existing_report(path)? {
            if existing.matches(&params) {
                info!("{} already records this deployment, skipping", path.display());
                println!("Already deployed with identical parameters, nothing was submitted.");
                println!("{existing}");
                return Ok(());
            }
            let err = eyre!(
                "{} already records a deployment with different parameters",
                path.display()
            )
            .with_suggestion(|| "Choose another --output file, or remove the old report if it is no longer needed.");
            return Err((err, INVALID_INPUT_EXIT_CODE));
        }
    }

    // Resolution already succeeded, so the network is registered.
    let profile = registry
        .get(params.network)
        .map_err(|err| lib_error(err, "Failed to look up network profile"))?;

    let artifact = args
        .artifact
        .as_deref()
        .ok_or_else(|| (eyre!("--artifact is required to deploy"), INVALID_INPUT_EXIT_CODE))?;
    let bytecode =
        load_bytecode(artifact).map_err(|err| lib_error(err, "Failed to load the artifact"))?;

    let rpc_url = rpc_url(args.rpc_url.as_deref(), profile)
        .map_err(|err| (err, INVALID_INPUT_EXIT_CODE))?;
    let wallet = deployer_wallet().map_err(|err| (err, INVALID_INPUT_EXIT_CODE))?;
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);

    let factory = AlloyFactory::new(provider, bytecode, profile.gas_policy)
        .with_transaction_config(TransactionConfig {
            max_fee_per_gas: args.max_fee_per_gas,
        })
        .with_required_confirmations(args.confirmations);
    let executor = DeploymentExecutor::new(ExecutorConfig {
        confirmation_timeout: Duration::from_secs(args.confirmation_timeout),
    });

    println!("Deploying distributor to {}...", params.network);
    let result =
        deploy_until_interrupted(executor.deploy(params, &factory), tokio::signal::ctrl_c())
            .await?;

    let report = Report::build(&result);
    println!("{report}");

    if let Some(path) = &args.output {
        tokio::fs::write(path, to_json(&report)?)
            .await
            .wrap_err_with(|| format!("Failed to write the report to {}", path.display()))
            .map_err(|err| (err, IO_ERROR))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Runs `deployment` unless `interrupt` completes first. An interrupt leaves the outcome unknown.
async fn deploy_until_interrupted<D, I>(
    deployment: D,
    interrupt: I,
) -> Result<DeploymentResult, ExitCodeError>
where
    D: Future<Output = distributor_evm::Result<DeploymentResult>>,
    I: Future,
{
    tokio::select! {
        result = deployment => result.map_err(|err| lib_error(err, "Deployment failed")),
        _ = interrupt => {
            let err = eyre!("Interrupted before the deployment was confirmed")
                .with_note(|| "A creation transaction may already be pending. Check the deployer account on the block explorer before running again.");
            Err((err, OUTCOME_UNKNOWN_EXIT_CODE))
        }
    }
}

fn resolve(
    args: &DeployArgs,
    registry: &NetworkRegistry,
) -> Result<DeploymentParameters, ExitCodeError> {
    let variant = match (&args.token_set, &args.variant) {
        (Some(path), _) => Variant::Custom(read_token_set(path)?),
        (None, Some(variant)) => variant
            .parse::<Variant>()
            .map_err(|err| lib_error(err, "Invalid --variant"))?,
        (None, None) => {
            return Err((
                eyre!("Either --variant or --token-set must be given"),
                INVALID_INPUT_EXIT_CODE,
            ));
        }
    };

    let schedule =
        EmissionSchedule::from_token_amount(&args.emission_rate, args.decimals, args.start_time)
            .map_err(|err| lib_error(err, "Invalid --emission-rate"))?;

    ParameterResolver::new(registry)
        .resolve(&args.network, &variant, schedule)
        .map_err(|err| lib_error(err, "Failed to resolve deployment parameters"))
}

fn read_token_set(path: &Path) -> Result<TokenSet, ExitCodeError> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read token set {}", path.display()))
        .map_err(|err| (err, IO_ERROR))?;
    serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse token set {}", path.display()))
        .map_err(|err| (err, INVALID_INPUT_EXIT_CODE))
}

fn read_existing_report(path: &Path) -> Result<Option<Report>, ExitCodeError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read existing report {}", path.display()))
        .map_err(|err| (err, IO_ERROR))?;
    serde_json::from_str(&raw)
        .map(Some)
        .wrap_err_with(|| format!("{} exists but is not a deployment report", path.display()))
        .map_err(|err| (err, INVALID_INPUT_EXIT_CODE))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ExitCodeError> {
    serde_json::to_string_pretty(value)
        .wrap_err("Failed to serialize to JSON")
        .map_err(|err| (err, IO_ERROR))
}

fn lib_error(err: distributor_evm::Error, context: &'static str) -> ExitCodeError {
    let exit_code = deployment_error_exit_code(&err);
    let mut report = EyreReport::new(err).wrap_err(context);
    if exit_code == OUTCOME_UNKNOWN_EXIT_CODE {
        report = report.with_note(|| {
            "The outcome is unknown. Check the transaction on the block explorer before resubmitting."
        });
    }
    (report, exit_code)
}
