// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::Address;
use crate::error::{Error, Result};
use alloy::primitives::address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BASE_CHAIN_ID: u64 = 8453;
const BASE_GOERLI_CHAIN_ID: u64 = 84531;
const ARBITRUM_ONE_CHAIN_ID: u64 = 42161;
const OPTIMISM_CHAIN_ID: u64 = 10;

/// WETH predeploy, identical on every OP stack chain.
const OP_STACK_WETH_ADDRESS: Address = address!("4200000000000000000000000000000000000006");

const ARBITRUM_ONE_WETH_ADDRESS: Address = address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1");

const BASE_GAS_LIMIT: u64 = 500_000;
const BASE_GAS_PRICE_WEI: u128 = 100;

/// Identifier of every network a deployment can target.
///
/// Adding a variant forces a profile to be added in [`NetworkRegistry::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    Base,
    BaseGoerli,
    Arbitrum,
    Optimism,
}

impl NetworkId {
    pub const ALL: [NetworkId; 4] = [
        NetworkId::Base,
        NetworkId::BaseGoerli,
        NetworkId::Arbitrum,
        NetworkId::Optimism,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            NetworkId::Base => "base",
            NetworkId::BaseGoerli => "base-goerli",
            NetworkId::Arbitrum => "arbitrum",
            NetworkId::Optimism => "optimism",
        }
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl std::str::FromStr for NetworkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(NetworkId::Base),
            "base-goerli" => Ok(NetworkId::BaseGoerli),
            "arbitrum" => Ok(NetworkId::Arbitrum),
            "optimism" => Ok(NetworkId::Optimism),
            _ => Err(Error::UnknownNetwork(s.to_string())),
        }
    }
}

/// Fixed gas settings for networks where the provider's estimates must not be used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPolicy {
    pub gas_limit: Option<u64>,
    /// Legacy gas price in wei. When set it takes precedence over the max fee per gas setting.
    pub gas_price: Option<u128>,
}

impl GasPolicy {
    /// Let the provider estimate everything.
    pub const fn estimated() -> Self {
        Self {
            gas_limit: None,
            gas_price: None,
        }
    }

    pub const fn fixed(gas_limit: u64, gas_price: u128) -> Self {
        Self {
            gas_limit: Some(gas_limit),
            gas_price: Some(gas_price),
        }
    }
}

/// Chain specific constants needed to build deployment parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub id: NetworkId,
    pub chain_id: u64,
    pub wrapped_native_token: Address,
    pub gas_policy: GasPolicy,
    pub explorer_api_key: Option<String>,
    /// Environment variable holding the RPC endpoint for this network.
    pub rpc_url_env: &'static str,
}

/// Immutable table of every targetable network, built once at startup.
#[derive(Clone, Debug)]
pub struct NetworkRegistry {
    profiles: BTreeMap<NetworkId, NetworkProfile>,
}

impl NetworkRegistry {
    pub fn new(explorer_api_key: Option<String>) -> Self {
        let profiles = NetworkId::ALL
            .into_iter()
            .map(|id| {
                let profile = match id {
                    NetworkId::Base => NetworkProfile {
                        id,
                        chain_id: BASE_CHAIN_ID,
                        wrapped_native_token: OP_STACK_WETH_ADDRESS,
                        gas_policy: GasPolicy::fixed(BASE_GAS_LIMIT, BASE_GAS_PRICE_WEI),
                        explorer_api_key: explorer_api_key.clone(),
                        rpc_url_env: "BASE_RPC",
                    },
                    NetworkId::BaseGoerli => NetworkProfile {
                        id,
                        chain_id: BASE_GOERLI_CHAIN_ID,
                        wrapped_native_token: OP_STACK_WETH_ADDRESS,
                        gas_policy: GasPolicy::estimated(),
                        explorer_api_key: explorer_api_key.clone(),
                        rpc_url_env: "BASE_GOERLI_RPC",
                    },
                    NetworkId::Arbitrum => NetworkProfile {
                        id,
                        chain_id: ARBITRUM_ONE_CHAIN_ID,
                        wrapped_native_token: ARBITRUM_ONE_WETH_ADDRESS,
                        gas_policy: GasPolicy::estimated(),
                        explorer_api_key: explorer_api_key.clone(),
                        rpc_url_env: "ARBITRUM_RPC",
                    },
                    NetworkId::Optimism => NetworkProfile {
                        id,
                        chain_id: OPTIMISM_CHAIN_ID,
                        wrapped_native_token: OP_STACK_WETH_ADDRESS,
                        gas_policy: GasPolicy::estimated(),
                        explorer_api_key: explorer_api_key.clone(),
                        rpc_url_env: "OPTIMISM_RPC",
                    },
                };
                (id, profile)
            })
            .collect();

        Self { profiles }
    }

    /// Look up a profile by its string identifier.
    pub fn lookup(&self, network: &str) -> Result<&NetworkProfile> {
        let id: NetworkId = network.parse().inspect_err(|err| {
            warn!("Rejecting lookup: {err}");
        })?;
        self.get(id)
    }

    pub fn get(&self, id: NetworkId) -> Result<&NetworkProfile> {
        self.profiles
            .get(&id)
            .ok_or_else(|| Error::UnknownNetwork(id.to_string()))
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkProfile> {
        self.profiles.values()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_network_id_has_a_profile() {
        let registry = NetworkRegistry::default();

        for id in NetworkId::ALL {
            let profile = registry.lookup(id.identifier()).unwrap();
            assert_eq!(profile.id, id);
            assert!(!profile.wrapped_native_token.is_zero());
            assert!(!profile.rpc_url_env.is_empty());
        }
        assert_eq!(registry.networks().count(), NetworkId::ALL.len());
    }

    #[test]
    fn unknown_networks_are_rejected() {
        let registry = NetworkRegistry::default();

        for network in ["", "mainnet", "BASE", "baseGoerli", "sepolia", " base"] {
            match registry.lookup(network) {
                Err(Error::UnknownNetwork(id)) => assert_eq!(id, network),
                other => panic!("expected UnknownNetwork for {network:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn base_pins_gas_and_chain_id() {
        let registry = NetworkRegistry::default();
        let base = registry.get(NetworkId::Base).unwrap();

        assert_eq!(base.chain_id, 8453);
        assert_eq!(base.gas_policy, GasPolicy::fixed(500_000, 100));
        assert_eq!(
            base.wrapped_native_token,
            address!("4200000000000000000000000000000000000006")
        );

        let goerli = registry.get(NetworkId::BaseGoerli).unwrap();
        assert_eq!(goerli.chain_id, 84531);
        assert_eq!(goerli.gas_policy, GasPolicy::estimated());
    }

    #[test]
    fn explorer_key_is_shared_by_all_profiles() {
        let registry = NetworkRegistry::new(Some("key".to_string()));
        assert!(registry
            .networks()
            .all(|profile| profile.explorer_api_key.as_deref() == Some("key")));
    }

    #[test]
    fn identifiers_round_trip_through_display() {
        for id in NetworkId::ALL {
            assert_eq!(id.to_string().parse::<NetworkId>().unwrap(), id);
        }
    }
}
