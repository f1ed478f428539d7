// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Local Anvil chain for exercising [`AlloyFactory`] without a real network.

use crate::common::Bytecode;
use crate::factory::AlloyFactory;
use crate::network::GasPolicy;
use alloy::network::{Ethereum, EthereumWallet};
use alloy::node_bindings::{Anvil, AnvilInstance};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;

/// Creation code that deploys a contract whose runtime code is a single `STOP`.
///
/// Anything appended to it (such as constructor arguments) is ignored.
pub const STOP_CREATION_CODE: [u8; 13] = [
    0x60, 0x01, // PUSH1 1     runtime size
    0x60, 0x0c, // PUSH1 12    runtime offset
    0x60, 0x00, // PUSH1 0     memory offset
    0x39, //       CODECOPY
    0x60, 0x01, // PUSH1 1
    0x60, 0x00, // PUSH1 0
    0xf3, //       RETURN
    0x00, //       STOP        runtime
];

/// Creation code whose constructor always reverts.
pub const REVERTING_CREATION_CODE: [u8; 5] = [
    0x60, 0x00, // PUSH1 0
    0x60, 0x00, // PUSH1 0
    0xfd, //       REVERT
];

pub struct Testnet {
    anvil: AnvilInstance,
    rpc_url: Url,
}

impl Testnet {
    /// Starts an Anvil node.
    pub fn new() -> Self {
        let (anvil, rpc_url) = start_node();
        Self { anvil, rpc_url }
    }

    pub fn chain_id(&self) -> u64 {
        self.anvil.chain_id()
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Wallet of the first default Anvil account (Alice).
    pub fn default_wallet(&self) -> EthereumWallet {
        let signer: PrivateKeySigner = self.anvil.keys()[0].clone().into();
        EthereumWallet::from(signer)
    }

    /// A factory deploying `bytecode` from the default wallet.
    pub fn factory(
        &self,
        bytecode: impl Into<Bytecode>,
    ) -> AlloyFactory<impl Provider<Ethereum> + Send + Sync, Ethereum> {
        let provider = ProviderBuilder::new()
            .wallet(self.default_wallet())
            .connect_http(self.rpc_url.clone());

        AlloyFactory::new(provider, bytecode.into(), GasPolicy::estimated())
    }
}

impl Default for Testnet {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a local Anvil node bound to a specified IP address.
///
/// The `AnvilInstance` `endpoint` function is hardcoded to return "localhost", so we must also
/// return the RPC URL if we want to listen on a different address.
///
/// The `anvil` binary respects the `ANVIL_IP_ADDR` environment variable, but defaults to "localhost".
pub fn start_node() -> (AnvilInstance, Url) {
    let host = std::env::var("ANVIL_IP_ADDR").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("ANVIL_PORT")
        .unwrap_or(0.to_string())
        .parse::<u16>()
        .expect("Invalid port number");

    let anvil = Anvil::new()
        .port(port)
        .try_spawn()
        .expect("Could not spawn Anvil node");

    let url = Url::parse(&format!("http://{host}:{}", anvil.port())).expect("Failed to parse URL");

    (anvil, url)
}
