// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::eyre::Report;
use distributor_evm::Error;

pub(crate) const INVALID_INPUT_EXIT_CODE: i32 = 6;
pub const IO_ERROR: i32 = 12;
const UNKNOWN_NETWORK_EXIT_CODE: i32 = 61;
const UNKNOWN_VARIANT_EXIT_CODE: i32 = 62;
const INVALID_ADDRESS_EXIT_CODE: i32 = 63;
const INVALID_RATE_EXIT_CODE: i32 = 64;
const SUBMISSION_EXIT_CODE: i32 = 71;
/// A transaction may exist on chain. The operator must check before rerunning.
pub(crate) const OUTCOME_UNKNOWN_EXIT_CODE: i32 = 72;

pub type ExitCodeError = (Report, i32);

pub(crate) fn deployment_error_exit_code(err: &Error) -> i32 {
    match err {
        Error::UnknownNetwork(_) => UNKNOWN_NETWORK_EXIT_CODE,
        Error::UnknownVariant(_) => UNKNOWN_VARIANT_EXIT_CODE,
        Error::InvalidAddress { .. } => INVALID_ADDRESS_EXIT_CODE,
        Error::InvalidRate(_) => INVALID_RATE_EXIT_CODE,
        Error::DeploymentSubmission { .. } => SUBMISSION_EXIT_CODE,
        Error::ConfirmationTimeout { .. } | Error::ConfirmationUnknown { .. } => {
            OUTCOME_UNKNOWN_EXIT_CODE
        }
        Error::Artifact(_) => IO_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distributor_evm::common::{Address, TxHash, U256};
    use distributor_evm::{DeploymentParameters, NetworkId};
    use std::time::Duration;

    fn params() -> Box<DeploymentParameters> {
        Box::new(DeploymentParameters {
            network: NetworkId::Base,
            chain_id: 8453,
            reward_token: Address::repeat_byte(1),
            treasury: Address::repeat_byte(2),
            wrapped_native_token: Address::repeat_byte(3),
            emission_rate_per_second: U256::from(600),
            start_timestamp: 0,
            booster: Address::repeat_byte(4),
        })
    }

    #[test]
    fn resolution_errors_have_distinct_codes() {
        let codes = [
            deployment_error_exit_code(&Error::UnknownNetwork("polygon".into())),
            deployment_error_exit_code(&Error::UnknownVariant("staging".into())),
            deployment_error_exit_code(&Error::InvalidAddress {
                field: "treasury",
                value: String::new(),
                reason: "empty".into(),
            }),
            deployment_error_exit_code(&Error::InvalidRate("0".into())),
        ];
        assert_eq!(codes, [61, 62, 63, 64]);
    }

    #[test]
    fn timeout_and_lost_confirmation_share_the_unknown_outcome_code() {
        let timeout = Error::ConfirmationTimeout {
            network: NetworkId::Base,
            parameters: params(),
            tx_hash: TxHash::repeat_byte(0xab),
            timeout: Duration::from_secs(120),
        };
        let unknown = Error::ConfirmationUnknown {
            network: NetworkId::Base,
            parameters: params(),
            tx_hash: None,
            cause: "connection reset".into(),
        };
        let rejected = Error::DeploymentSubmission {
            network: NetworkId::Base,
            parameters: params(),
            tx_hash: None,
            cause: "insufficient funds".into(),
        };

        assert_eq!(deployment_error_exit_code(&timeout), OUTCOME_UNKNOWN_EXIT_CODE);
        assert_eq!(deployment_error_exit_code(&unknown), OUTCOME_UNKNOWN_EXIT_CODE);
        assert_eq!(deployment_error_exit_code(&rejected), SUBMISSION_EXIT_CODE);
    }
}
