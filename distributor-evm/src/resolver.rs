// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::{Address, U256};
use crate::error::{Error, Result};
use crate::network::{NetworkId, NetworkRegistry};
use crate::token_set::Variant;
use alloy::primitives::utils::{parse_units, ParseUnits};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

const ADDRESS_HEX_LEN: usize = 40;

/// Fully resolved constructor arguments of the distributor, plus the network they were resolved
/// for.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentParameters {
    pub network: NetworkId,
    pub chain_id: u64,
    pub reward_token: Address,
    pub treasury: Address,
    pub wrapped_native_token: Address,
    /// Reward token emitted per second, in the token's smallest unit.
    #[serde_as(as = "DisplayFromStr")]
    pub emission_rate_per_second: U256,
    /// 0 lets the contract derive its own start time.
    pub start_timestamp: u64,
    pub booster: Address,
}

impl DeploymentParameters {
    /// The constructor argument tuple, in constructor order.
    pub fn constructor_args(&self) -> (Address, Address, Address, U256, u64, Address) {
        (
            self.reward_token,
            self.treasury,
            self.wrapped_native_token,
            self.emission_rate_per_second,
            self.start_timestamp,
            self.booster,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmissionSchedule {
    pub rate_per_second: U256,
    pub start_time: u64,
}

impl EmissionSchedule {
    pub fn new(rate_per_second: U256, start_time: u64) -> Self {
        Self {
            rate_per_second,
            start_time,
        }
    }

    /// Build a schedule from a decimal token amount per second, e.g. `"0.0000006"` with 18
    /// decimals.
    ///
    /// Amounts finer than the token's smallest unit are rejected rather than truncated.
    pub fn from_token_amount(rate: &str, decimals: u8, start_time: u64) -> Result<Self> {
        let fraction_digits = rate
            .trim()
            .split_once('.')
            .map_or(0, |(_, fraction)| fraction.trim_end_matches('0').len());
        if fraction_digits > usize::from(decimals) {
            return Err(Error::InvalidRate(format!(
                "{rate} has {fraction_digits} decimal places but the token only has {decimals}"
            )));
        }

        let rate_per_second = match parse_units(rate, decimals) {
            Ok(ParseUnits::U256(value)) => value,
            Ok(ParseUnits::I256(_)) => {
                return Err(Error::InvalidRate(format!("{rate} is negative")));
            }
            Err(err) => {
                return Err(Error::InvalidRate(format!("{rate}: {err}")));
            }
        };

        Ok(Self::new(rate_per_second, start_time))
    }
}

/// Turns a network and a variant into validated constructor arguments.
pub struct ParameterResolver<'a> {
    registry: &'a NetworkRegistry,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(registry: &'a NetworkRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the constructor arguments for `network`.
    ///
    /// Every address is checked to be well formed and non-zero, and the emission rate to be
    /// positive, before anything is returned. The start time is passed through untouched.
    pub fn resolve(
        &self,
        network: &str,
        variant: &Variant,
        schedule: EmissionSchedule,
    ) -> Result<DeploymentParameters> {
        let profile = self.registry.lookup(network)?;
        let token_set = variant.token_set();

        let reward_token = validate_address("reward_token", &token_set.reward_token)?;
        let treasury = validate_address("treasury", &token_set.treasury)?;
        let booster = validate_address("booster", &token_set.booster)?;

        if profile.wrapped_native_token.is_zero() {
            return Err(Error::InvalidAddress {
                field: "wrapped_native_token",
                value: profile.wrapped_native_token.to_string(),
                reason: "zero address".to_string(),
            });
        }

        if schedule.rate_per_second.is_zero() {
            return Err(Error::InvalidRate(
                "emission rate per second must be greater than zero".to_string(),
            ));
        }

        let params = DeploymentParameters {
            network: profile.id,
            chain_id: profile.chain_id,
            reward_token,
            treasury,
            wrapped_native_token: profile.wrapped_native_token,
            emission_rate_per_second: schedule.rate_per_second,
            start_timestamp: schedule.start_time,
            booster,
        };

        info!("Resolved {variant} deployment parameters for {network}: {params:?}");
        Ok(params)
    }
}

/// Parse a configured address, naming `field` in the error if it is malformed or zero.
///
/// Mixed case input must carry a valid EIP-55 checksum.
pub fn validate_address(field: &'static str, value: &str) -> Result<Address> {
    let invalid = |reason: String| Error::InvalidAddress {
        field,
        value: value.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("empty".to_string()));
    }
    let Some(hex) = value.strip_prefix("0x") else {
        return Err(invalid("missing 0x prefix".to_string()));
    };
    if hex.len() != ADDRESS_HEX_LEN {
        return Err(invalid(format!(
            "expected {ADDRESS_HEX_LEN} hex digits, got {}",
            hex.len()
        )));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters".to_string()));
    }

    let mixed_case =
        hex.chars().any(|c| c.is_ascii_uppercase()) && hex.chars().any(|c| c.is_ascii_lowercase());
    let address = if mixed_case {
        Address::parse_checksummed(value, None)
            .map_err(|err| invalid(format!("bad checksum: {err}")))?
    } else {
        value
            .parse::<Address>()
            .map_err(|err| invalid(err.to_string()))?
    };

    if address.is_zero() {
        return Err(invalid("zero address".to_string()));
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkId;
    use crate::token_set::TokenSet;
    use alloy::primitives::address;

    const ZERO: &str = "0x0000000000000000000000000000000000000000";

    fn schedule() -> EmissionSchedule {
        EmissionSchedule::new(U256::from(600), 0)
    }

    fn custom(reward_token: &str, treasury: &str, booster: &str) -> Variant {
        Variant::Custom(TokenSet {
            reward_token: reward_token.to_string(),
            treasury: treasury.to_string(),
            booster: booster.to_string(),
        })
    }

    #[test]
    fn resolves_every_network_and_variant() {
        let registry = NetworkRegistry::default();
        let resolver = ParameterResolver::new(&registry);

        for id in NetworkId::ALL {
            for variant in [Variant::Mainnet, Variant::Testnet] {
                let params = resolver
                    .resolve(id.identifier(), &variant, schedule())
                    .unwrap();

                assert_eq!(params.network, id);
                assert!(!params.reward_token.is_zero());
                assert!(!params.treasury.is_zero());
                assert!(!params.wrapped_native_token.is_zero());
                assert!(!params.booster.is_zero());
                assert!(params.emission_rate_per_second > U256::ZERO);
            }
        }
    }

    #[test]
    fn base_mainnet_binds_mainnet_token_and_booster() {
        let registry = NetworkRegistry::default();
        let params = ParameterResolver::new(&registry)
            .resolve("base", &Variant::Mainnet, schedule())
            .unwrap();

        assert_eq!(
            params.constructor_args(),
            (
                address!("FDa619b6d20975be80A10332cD39b9a4b0FAa8BB"),
                address!("03d4C4b1B115c068Ef864De2e21E724a758892A2"),
                address!("4200000000000000000000000000000000000006"),
                U256::from(600),
                0,
                address!("0fE9E7B39dbdfe32c9F37FAcCec6b33d290CbF50"),
            )
        );
        assert_eq!(params.chain_id, 8453);
    }

    #[test]
    fn zero_address_is_rejected_with_field_name() {
        let registry = NetworkRegistry::default();
        let resolver = ParameterResolver::new(&registry);
        let good = "0x1111111111111111111111111111111111111111";

        let cases = [
            ("reward_token", custom(ZERO, good, good)),
            ("treasury", custom(good, ZERO, good)),
            ("booster", custom(good, good, ZERO)),
        ];
        for (expected_field, variant) in cases {
            match resolver.resolve("base", &variant, schedule()) {
                Err(Error::InvalidAddress { field, reason, .. }) => {
                    assert_eq!(field, expected_field);
                    assert_eq!(reason, "zero address");
                }
                other => panic!("expected InvalidAddress for {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_placeholder_addresses_are_rejected() {
        let registry = NetworkRegistry::default();
        let good = "0x1111111111111111111111111111111111111111";
        let result = ParameterResolver::new(&registry).resolve(
            "base-goerli",
            &custom(good, "", good),
            schedule(),
        );

        assert!(matches!(
            result,
            Err(Error::InvalidAddress { field: "treasury", .. })
        ));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for value in [
            "1111111111111111111111111111111111111111",
            "0x111111111111111111111111111111111111111",
            "0x11111111111111111111111111111111111111111",
            "0x111111111111111111111111111111111111111g",
            // valid address with one letter's case flipped
            "0xfDa619b6d20975be80A10332cD39b9a4b0FAa8BB",
        ] {
            assert!(
                matches!(
                    validate_address("booster", value),
                    Err(Error::InvalidAddress { field: "booster", .. })
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn single_case_addresses_skip_checksum() {
        let lower = "0xfda619b6d20975be80a10332cd39b9a4b0faa8bb";
        let upper = "0xFDA619B6D20975BE80A10332CD39B9A4B0FAA8BB";
        assert_eq!(
            validate_address("reward_token", lower).unwrap(),
            validate_address("reward_token", upper).unwrap()
        );
    }

    #[test]
    fn zero_rate_is_rejected() {
        let registry = NetworkRegistry::default();
        let result = ParameterResolver::new(&registry).resolve(
            "base",
            &Variant::Mainnet,
            EmissionSchedule::new(U256::ZERO, 0),
        );

        assert!(matches!(result, Err(Error::InvalidRate(_))));
    }

    #[test]
    fn unknown_network_fails_before_token_validation() {
        let registry = NetworkRegistry::default();
        let result = ParameterResolver::new(&registry).resolve(
            "polygon",
            &custom("", "", ""),
            schedule(),
        );

        assert!(matches!(result, Err(Error::UnknownNetwork(n)) if n == "polygon"));
    }

    #[test]
    fn start_time_is_never_substituted() {
        let registry = NetworkRegistry::default();
        let resolver = ParameterResolver::new(&registry);

        let zero = resolver
            .resolve("base", &Variant::Mainnet, EmissionSchedule::new(U256::from(1), 0))
            .unwrap();
        assert_eq!(zero.start_timestamp, 0);

        // a past start is passed through; the contract decides whether it is acceptable
        let past = resolver
            .resolve("base", &Variant::Mainnet, EmissionSchedule::new(U256::from(1), 1))
            .unwrap();
        assert_eq!(past.start_timestamp, 1);
    }

    #[test]
    fn token_amounts_scale_to_smallest_unit() {
        let schedule = EmissionSchedule::from_token_amount("0.0000006", 18, 0).unwrap();
        assert_eq!(schedule.rate_per_second, U256::from(600_000_000_000u64));

        let schedule = EmissionSchedule::from_token_amount("0.0000006", 9, 0).unwrap();
        assert_eq!(schedule.rate_per_second, U256::from(600));

        assert!(matches!(
            EmissionSchedule::from_token_amount("-1", 18, 0),
            Err(Error::InvalidRate(_))
        ));
        assert!(matches!(
            EmissionSchedule::from_token_amount("abc", 18, 0),
            Err(Error::InvalidRate(_))
        ));
    }

    #[test]
    fn amounts_finer_than_the_smallest_unit_are_rejected() {
        match EmissionSchedule::from_token_amount("1.0000000000000000009", 18, 0) {
            Err(Error::InvalidRate(reason)) => assert!(reason.contains("19 decimal places")),
            other => panic!("expected InvalidRate, got {other:?}"),
        }

        match EmissionSchedule::from_token_amount("0.0000006", 0, 0) {
            Err(Error::InvalidRate(reason)) => assert!(reason.contains("decimal places")),
            other => panic!("expected InvalidRate, got {other:?}"),
        }

        // trailing zeros carry no precision
        let schedule = EmissionSchedule::from_token_amount("1.50", 1, 0).unwrap();
        assert_eq!(schedule.rate_per_second, U256::from(15));
    }
}
