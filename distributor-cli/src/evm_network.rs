// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use alloy::network::EthereumWallet;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use color_eyre::eyre::{eyre, Context, Result};
use distributor_evm::NetworkProfile;
use std::env;
use std::str::FromStr;

const DEPLOYER_KEY_ENV: &str = "DEV_KEY";

/// RPC endpoint from the command line, falling back to the network's environment variable.
pub(crate) fn rpc_url(cli_url: Option<&str>, profile: &NetworkProfile) -> Result<Url> {
    let raw = match cli_url {
        Some(url) => url.to_string(),
        None => env::var(profile.rpc_url_env).wrap_err(eyre!(
            "No --rpc-url given, make sure you've provided the {} env var",
            profile.rpc_url_env
        ))?,
    };
    Url::parse(&raw).wrap_err_with(|| format!("Invalid RPC url for {}", profile.id))
}

/// Wallet of the deploying account, loaded from the `DEV_KEY` env var.
pub(crate) fn deployer_wallet() -> Result<EthereumWallet> {
    let secret_key = env::var(DEPLOYER_KEY_ENV).wrap_err(eyre!(
        "make sure you've provided the {DEPLOYER_KEY_ENV} env var"
    ))?;
    wallet_from_private_key(&secret_key)
}

/// Why a `.env` file could not be loaded, if it matters. Having no `.env` file is fine.
pub(crate) fn dotenv_problem<T>(result: &dotenv::Result<T>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(err) if err.not_found() => None,
        Err(err) => Some(format!("Failed to load the .env file: {err}")),
    }
}

fn wallet_from_private_key(secret_key: &str) -> Result<EthereumWallet> {
    let signer = PrivateKeySigner::from_str(secret_key.trim())
        .wrap_err("Failed to load the deployer key")?;
    info!("Deploying from {}", signer.address());
    Ok(EthereumWallet::from(signer))
}
