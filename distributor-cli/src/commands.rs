// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod deploy;
mod networks;

use crate::exit_code::ExitCodeError;
use crate::opt::Opt;
use clap::{error::ErrorKind, Args, CommandFactory as _, Subcommand};
use distributor_evm::{MaxFeePerGas, NetworkRegistry};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    /// Deploy the distributor contract to a network.
    Deploy(DeployArgs),

    /// List the networks a deployment can target.
    Networks,
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// The network to deploy to, e.g. "base" or "base-goerli".
    #[arg(long)]
    pub network: String,

    /// Which address bundle to bind: "mainnet" or "testnet".
    #[arg(long, required_unless_present = "token_set", conflicts_with = "token_set")]
    pub variant: Option<String>,

    /// JSON file with explicit `reward_token`, `treasury` and `booster` addresses.
    #[arg(long)]
    pub token_set: Option<PathBuf>,

    /// Compiled contract artifact (Hardhat or Foundry JSON) holding the creation bytecode.
    #[arg(long, required_unless_present = "dry_run")]
    pub artifact: Option<PathBuf>,

    /// Reward tokens emitted per second, as a decimal amount of whole tokens.
    #[arg(long, default_value = "0.0000006")]
    pub emission_rate: String,

    /// Decimals of the reward token, used to scale `--emission-rate`.
    #[arg(long, default_value_t = 18)]
    pub decimals: u8,

    /// Emission start as a unix timestamp. 0 lets the contract pick its own start.
    #[arg(long, default_value_t = 0)]
    pub start_time: u64,

    /// RPC endpoint. Defaults to the network's RPC environment variable, e.g. `BASE_RPC`.
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Seconds to wait for the creation transaction to be confirmed.
    #[arg(long, default_value_t = 120)]
    pub confirmation_timeout: u64,

    /// Number of confirmations to wait for.
    #[arg(long, default_value_t = 1)]
    pub confirmations: u64,

    /// Max fee per gas: "auto", "unlimited", "limited-auto:<WEI>" or a custom amount in WEI.
    ///
    /// Ignored on networks whose profile pins a gas price.
    #[arg(long, default_value = "auto")]
    pub max_fee_per_gas: MaxFeePerGas,

    /// Write the deployment report as JSON to this file.
    ///
    /// If the file already records a deployment with identical parameters, nothing is deployed.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Resolve and print the parameters without submitting anything.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_subcommand(opt: Opt) -> Result<(), ExitCodeError> {
    let registry = NetworkRegistry::new(opt.explorer_api_key);

    match opt.command {
        Some(SubCmd::Deploy(args)) => deploy::deploy(args, &registry).await,
        Some(SubCmd::Networks) => {
            networks::list(&registry);
            Ok(())
        }
        None => {
            // If no subcommand is given, default to clap's error behaviour.
            Opt::command()
                .error(ErrorKind::MissingSubcommand, "Please provide a subcommand")
                .exit();
        }
    }
}
