// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::error::Error;
use serde::{Deserialize, Serialize};

const TREASURY_ADDRESS: &str = "0x03d4C4b1B115c068Ef864De2e21E724a758892A2";

const REWARD_TOKEN_MAINNET_ADDRESS: &str = "0xFDa619b6d20975be80A10332cD39b9a4b0FAa8BB";
const REWARD_TOKEN_TESTNET_ADDRESS: &str = "0xB687282AD4Fb8897D5Cd41f3C1A54DeB4cc88625";

const YIELD_BOOSTER_MAINNET_ADDRESS: &str = "0x0fE9E7B39dbdfe32c9F37FAcCec6b33d290CbF50";
const YIELD_BOOSTER_TESTNET_ADDRESS: &str = "0x4Ab974442D6e67c32E40f44BcDC22388F3F16d9e";

/// Addresses that differ between the mainnet and test deployments of the distributor.
///
/// Fields are kept as the raw configured strings; they are only trusted once the resolver has
/// validated them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub reward_token: String,
    pub treasury: String,
    pub booster: String,
}

impl TokenSet {
    pub fn mainnet() -> Self {
        Self {
            reward_token: REWARD_TOKEN_MAINNET_ADDRESS.to_string(),
            treasury: TREASURY_ADDRESS.to_string(),
            booster: YIELD_BOOSTER_MAINNET_ADDRESS.to_string(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            reward_token: REWARD_TOKEN_TESTNET_ADDRESS.to_string(),
            treasury: TREASURY_ADDRESS.to_string(),
            booster: YIELD_BOOSTER_TESTNET_ADDRESS.to_string(),
        }
    }
}

/// Which address bundle to bind into a deployment. There is deliberately no default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    Mainnet,
    Testnet,
    /// Addresses supplied explicitly, e.g. from a token set file.
    Custom(TokenSet),
}

impl Variant {
    pub fn token_set(&self) -> TokenSet {
        match self {
            Variant::Mainnet => TokenSet::mainnet(),
            Variant::Testnet => TokenSet::testnet(),
            Variant::Custom(token_set) => token_set.clone(),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Mainnet => write!(f, "mainnet"),
            Variant::Testnet => write!(f, "testnet"),
            Variant::Custom(_) => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Variant::Mainnet),
            "testnet" => Ok(Variant::Testnet),
            _ => Err(Error::UnknownVariant(s.to_string())),
        }
    }
}
