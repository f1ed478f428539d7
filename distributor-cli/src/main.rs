// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

mod commands;
mod evm_network;
mod exit_code;
mod logging;
mod opt;

use clap::Parser;
use color_eyre::Result;
use opt::Opt;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // Environment from a local .env file, e.g. DEV_KEY and the per-network RPC urls.
    let dotenv_result = dotenv::dotenv();

    let opt = Opt::parse();

    if opt.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if opt.crate_version {
        println!("Crate version: {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init_logging(opt.log_format);
    info!("distributor-deploy {}", env!("CARGO_PKG_VERSION"));
    if let Some(problem) = evm_network::dotenv_problem(&dotenv_result) {
        warn!("{problem}");
    }

    if let Err((err, exit_code)) = commands::handle_subcommand(opt).await {
        eprintln!("{err:?}");
        std::process::exit(exit_code);
    }

    Ok(())
}
