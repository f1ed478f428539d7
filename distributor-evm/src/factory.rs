// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::{Address, Bytecode, TxHash};
use crate::contract::creation_code;
use crate::network::GasPolicy;
use crate::resolver::DeploymentParameters;
use crate::transaction_config::{MaxFeePerGas, TransactionConfig};
use alloy::network::{Ethereum, Network, ReceiptResponse, TransactionBuilder};
use alloy::providers::{PendingTransactionBuilder, PendingTransactionError, Provider, WatchTxError};
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::time::Duration;

/// A creation transaction that has been accepted by the node but not yet confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingDeployment {
    pub tx_hash: TxHash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmedDeployment {
    pub contract_address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The network refused the transaction, or the constructor reverted.
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error("Timed out waiting for confirmation")]
    Timeout,
    #[error("Transport error: {0}")]
    Transport(String),
    /// The send request failed in a way that does not tell whether the node kept the transaction.
    #[error("Broadcast outcome unknown: {0}")]
    BroadcastUnknown(String),
}

/// Capability to create the distributor contract on one network.
///
/// Implementations hold the signer; callers only see transaction hashes and addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractFactory: Send + Sync {
    /// Broadcast the creation transaction.
    ///
    /// `Rejected` and `Transport` mean nothing was broadcast. A send that may have reached the
    /// node is `BroadcastUnknown`.
    async fn submit(
        &self,
        params: &DeploymentParameters,
    ) -> Result<PendingDeployment, FactoryError>;

    /// Wait until `pending` is included, or `timeout` elapses.
    async fn await_confirmation(
        &self,
        pending: &PendingDeployment,
        timeout: Duration,
    ) -> Result<ConfirmedDeployment, FactoryError>;
}

/// [`ContractFactory`] backed by an alloy provider with a wallet attached.
pub struct AlloyFactory<P, N = Ethereum> {
    provider: P,
    bytecode: Bytecode,
    gas_policy: GasPolicy,
    transaction_config: TransactionConfig,
    required_confirmations: u64,
    _network: PhantomData<N>,
}

impl<P, N> AlloyFactory<P, N>
where
    P: Provider<N>,
    N: Network,
{
    pub fn new(provider: P, bytecode: Bytecode, gas_policy: GasPolicy) -> Self {
        Self {
            provider,
            bytecode,
            gas_policy,
            transaction_config: TransactionConfig::default(),
            required_confirmations: 1,
            _network: PhantomData,
        }
    }

    pub fn with_transaction_config(mut self, transaction_config: TransactionConfig) -> Self {
        self.transaction_config = transaction_config;
        self
    }

    pub fn with_required_confirmations(mut self, confirmations: u64) -> Self {
        self.required_confirmations = confirmations.max(1);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn transaction_request(
        &self,
        params: &DeploymentParameters,
    ) -> Result<N::TransactionRequest, FactoryError> {
        let mut request = self
            .provider
            .transaction_request()
            .with_deploy_code(creation_code(&self.bytecode, params));

        if let Some(gas_limit) = self.gas_policy.gas_limit {
            request.set_gas_limit(gas_limit);
        }

        if let Some(gas_price) = self.gas_policy.gas_price {
            // A pinned legacy gas price overrides any EIP-1559 fee setting.
            request.set_gas_price(gas_price);
            return Ok(request);
        }

        match self.transaction_config.max_fee_per_gas {
            MaxFeePerGas::Auto | MaxFeePerGas::Unlimited => {}
            MaxFeePerGas::Custom(max_fee) => request.set_max_fee_per_gas(max_fee),
            MaxFeePerGas::LimitedAuto(limit) => {
                let gas_price = self
                    .provider
                    .get_gas_price()
                    .await
                    .map_err(transport_error)?;
                if gas_price > limit {
                    return Err(FactoryError::Rejected(format!(
                        "current gas price {gas_price} wei is above the configured limit of {limit} wei"
                    )));
                }
                request.set_max_fee_per_gas(limit);
            }
        }

        Ok(request)
    }
}

#[async_trait]
impl<P, N> ContractFactory for AlloyFactory<P, N>
where
    P: Provider<N> + Send + Sync,
    N: Network,
{
    async fn submit(
        &self,
        params: &DeploymentParameters,
    ) -> Result<PendingDeployment, FactoryError> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(transport_error)?;
        if chain_id != params.chain_id {
            return Err(FactoryError::Rejected(format!(
                "provider is connected to chain {chain_id} but the parameters were resolved for {} (chain {})",
                params.network, params.chain_id
            )));
        }

        let request = self.transaction_request(params).await?;
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(send_error)?;

        let tx_hash = *pending.tx_hash();
        debug!("Distributor creation transaction is pending with tx_hash: {tx_hash:?}");
        Ok(PendingDeployment { tx_hash })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingDeployment,
        timeout: Duration,
    ) -> Result<ConfirmedDeployment, FactoryError> {
        let receipt =
            PendingTransactionBuilder::new(self.provider.root().clone(), pending.tx_hash)
                .with_required_confirmations(self.required_confirmations)
                .with_timeout(Some(timeout))
                .get_receipt()
                .await
                .map_err(|err| match err {
                    PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
                        FactoryError::Timeout
                    }
                    other => FactoryError::Transport(other.to_string()),
                })?;

        if !receipt.status() {
            return Err(FactoryError::Rejected(format!(
                "constructor reverted in transaction {:?}",
                pending.tx_hash
            )));
        }

        let contract_address = receipt.contract_address().ok_or_else(|| {
            FactoryError::Rejected(format!(
                "receipt of {:?} carries no contract address",
                pending.tx_hash
            ))
        })?;

        Ok(ConfirmedDeployment {
            contract_address,
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
        })
    }
}

fn transport_error(err: RpcError<TransportErrorKind>) -> FactoryError {
    FactoryError::Transport(err.to_string())
}

/// Only errors raised before anything left this process are known not to have broadcast.
fn send_error(err: RpcError<TransportErrorKind>) -> FactoryError {
    match err {
        RpcError::ErrorResp(payload) => FactoryError::Rejected(payload.message.to_string()),
        RpcError::SerError(_) | RpcError::LocalUsageError(_) | RpcError::UnsupportedFeature(_) => {
            transport_error(err)
        }
        other => FactoryError::BroadcastUnknown(other.to_string()),
    }
}
