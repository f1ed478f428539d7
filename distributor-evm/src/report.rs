// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::{Address, TxHash};
use crate::contract::encode_constructor_args;
use crate::executor::DeploymentResult;
use crate::network::NetworkId;
use crate::resolver::DeploymentParameters;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to audit or reproduce a deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub network: NetworkId,
    pub chain_id: u64,
    pub contract_address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub observed_at: DateTime<Utc>,
    pub parameters: DeploymentParameters,
    /// ABI encoded constructor arguments, as asked for by block explorer verification.
    pub constructor_args: String,
}

impl Report {
    pub fn build(result: &DeploymentResult) -> Self {
        Self {
            network: result.network,
            chain_id: result.parameters.chain_id,
            contract_address: result.contract_address,
            tx_hash: result.confirmation.tx_hash,
            block_number: result.confirmation.block_number,
            observed_at: result.confirmation.observed_at,
            parameters: result.parameters.clone(),
            constructor_args: alloy::hex::encode_prefixed(encode_constructor_args(
                &result.parameters,
            )),
        }
    }

    /// Whether this report records a deployment of exactly `parameters`.
    pub fn matches(&self, parameters: &DeploymentParameters) -> bool {
        &self.parameters == parameters
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = &self.parameters;
        writeln!(f, "Distributor deployed")?;
        writeln!(f, "  network:                  {} (chain {})", self.network, self.chain_id)?;
        writeln!(f, "  contract address:         {}", self.contract_address)?;
        writeln!(f, "  transaction:              {}", self.tx_hash)?;
        match self.block_number {
            Some(block) => writeln!(f, "  block:                    {block}")?,
            None => writeln!(f, "  block:                    unknown")?,
        }
        writeln!(
            f,
            "  observed at:              {}",
            self.observed_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(f, "  reward token:             {}", params.reward_token)?;
        writeln!(f, "  treasury:                 {}", params.treasury)?;
        writeln!(f, "  wrapped native token:     {}", params.wrapped_native_token)?;
        writeln!(f, "  emission rate per second: {}", params.emission_rate_per_second)?;
        writeln!(f, "  start timestamp:          {}", params.start_timestamp)?;
        writeln!(f, "  booster:                  {}", params.booster)?;
        write!(f, "  constructor args:         {}", self.constructor_args)
    }
}
