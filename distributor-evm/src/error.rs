// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::TxHash;
use crate::network::NetworkId;
use crate::resolver::DeploymentParameters;
use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Resolution errors. Nothing has been sent to the chain when one of these is returned.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
    #[error("Unknown deployment variant: {0}, expected 'mainnet' or 'testnet'")]
    UnknownVariant(String),
    #[error("Invalid address for {field}: {value:?} ({reason})")]
    InvalidAddress {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("Invalid emission rate: {0}")]
    InvalidRate(String),

    // Runtime errors. A transaction may have been broadcast when one of these is returned.
    #[error("Deployment to {network} was not accepted (tx hash: {tx_hash:?}): {cause}")]
    DeploymentSubmission {
        network: NetworkId,
        parameters: Box<DeploymentParameters>,
        tx_hash: Option<TxHash>,
        cause: String,
    },
    #[error(
        "Deployment to {network} was not confirmed within {timeout:?}. Transaction {tx_hash} may still be included, check it manually before resubmitting"
    )]
    ConfirmationTimeout {
        network: NetworkId,
        parameters: Box<DeploymentParameters>,
        tx_hash: TxHash,
        timeout: Duration,
    },
    /// `tx_hash` is `None` when the send request itself failed part way.
    #[error(
        "Lost track of deployment to {network}: {cause}. A transaction (tx hash: {tx_hash:?}) may have been broadcast, check the deployer account before resubmitting"
    )]
    ConfirmationUnknown {
        network: NetworkId,
        parameters: Box<DeploymentParameters>,
        tx_hash: Option<TxHash>,
        cause: String,
    },

    #[error("Could not load contract artifact: {0}")]
    Artifact(String),
}

impl Error {
    /// True for errors raised before anything was submitted. These always point at bad input or
    /// configuration.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::UnknownNetwork(_)
                | Error::UnknownVariant(_)
                | Error::InvalidAddress { .. }
                | Error::InvalidRate(_)
        )
    }

    /// True when a transaction may exist on chain in an unknown state.
    pub fn outcome_unknown(&self) -> bool {
        matches!(
            self,
            Error::ConfirmationTimeout { .. } | Error::ConfirmationUnknown { .. }
        )
    }

    /// Hash of the broadcast transaction, if one was broadcast.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Error::DeploymentSubmission { tx_hash, .. }
            | Error::ConfirmationUnknown { tx_hash, .. } => *tx_hash,
            Error::ConfirmationTimeout { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}
