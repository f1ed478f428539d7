// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use distributor_evm::{GasPolicy, NetworkProfile, NetworkRegistry};

pub fn list(registry: &NetworkRegistry) {
    for profile in registry.networks() {
        println!("{}", describe(profile));
    }
}

fn describe(profile: &NetworkProfile) -> String {
    format!(
        "{:<12} chain id {:<6} WETH {}  gas: {}  rpc: ${}",
        profile.id.identifier(),
        profile.chain_id,
        profile.wrapped_native_token,
        gas_policy(&profile.gas_policy),
        profile.rpc_url_env,
    )
}

fn gas_policy(policy: &GasPolicy) -> String {
    match (policy.gas_limit, policy.gas_price) {
        (None, None) => "estimated".to_string(),
        (limit, price) => {
            let limit = limit.map_or("estimated".to_string(), |limit| limit.to_string());
            let price = price.map_or("estimated".to_string(), |price| format!("{price} wei"));
            format!("limit {limit}, price {price}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distributor_evm::NetworkId;

    #[test]
    fn base_lists_its_pinned_gas() {
        let registry = NetworkRegistry::default();
        let line = describe(registry.get(NetworkId::Base).unwrap());

        assert!(line.starts_with("base "));
        assert!(line.contains("8453"));
        assert!(line.contains("limit 500000, price 100 wei"));
        assert!(line.contains("$BASE_RPC"));
    }

    #[test]
    fn other_networks_use_estimates() {
        let registry = NetworkRegistry::default();
        let line = describe(registry.get(NetworkId::Arbitrum).unwrap());

        assert!(line.contains("42161"));
        assert!(line.contains("gas: estimated"));
    }
}
