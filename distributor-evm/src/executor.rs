// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::{Address, TxHash};
use crate::error::{Error, Result};
use crate::factory::{ContractFactory, FactoryError};
use crate::network::NetworkId;
use crate::resolver::DeploymentParameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time to wait for the creation transaction to be included.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Extra time given to the factory on top of its own timeout before the executor stops waiting.
const CONFIRMATION_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub confirmation_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Local clock reading when the receipt was seen. Not the block timestamp.
    pub observed_at: DateTime<Utc>,
}

/// Record of one successful deployment. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub contract_address: Address,
    pub network: NetworkId,
    pub parameters: DeploymentParameters,
    pub confirmation: Confirmation,
}

/// Submits the creation transaction and waits for it to be confirmed.
///
/// Nothing is ever retried here. Resubmitting could create a second contract at a different
/// address, so that decision is left to whoever reads the error.
#[derive(Clone, Debug, Default)]
pub struct DeploymentExecutor {
    config: ExecutorConfig,
}

impl DeploymentExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub async fn deploy<F>(
        &self,
        parameters: DeploymentParameters,
        factory: &F,
    ) -> Result<DeploymentResult>
    where
        F: ContractFactory + ?Sized,
    {
        let network = parameters.network;
        info!("Submitting distributor creation transaction to {network}");

        let pending = match factory.submit(&parameters).await {
            Ok(pending) => pending,
            Err(FactoryError::BroadcastUnknown(cause)) => {
                error!("Sending the creation transaction to {network} failed part way: {cause}");
                return Err(Error::ConfirmationUnknown {
                    network,
                    parameters: Box::new(parameters),
                    tx_hash: None,
                    cause,
                });
            }
            Err(err) => {
                error!("Deployment to {network} was not accepted: {err}");
                return Err(Error::DeploymentSubmission {
                    network,
                    parameters: Box::new(parameters),
                    tx_hash: None,
                    cause: err.to_string(),
                });
            }
        };

        let mut in_flight = InFlight::new(network, pending.tx_hash);
        let timeout = self.config.confirmation_timeout;
        info!(
            "Waiting up to {timeout:?} for transaction {} to be confirmed",
            pending.tx_hash
        );

        let outcome = tokio::time::timeout(
            timeout.saturating_add(CONFIRMATION_GRACE),
            factory.await_confirmation(&pending, timeout),
        )
        .await;
        // From here on every outcome is handed back to the caller.
        in_flight.disarm();

        let confirmed = match outcome {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(FactoryError::Timeout)) | Err(_) => {
                warn!(
                    "Transaction {} was not confirmed within {timeout:?}",
                    pending.tx_hash
                );
                return Err(Error::ConfirmationTimeout {
                    network,
                    parameters: Box::new(parameters),
                    tx_hash: pending.tx_hash,
                    timeout,
                });
            }
            Ok(Err(FactoryError::Rejected(cause))) => {
                error!("Transaction {} was rejected: {cause}", pending.tx_hash);
                return Err(Error::DeploymentSubmission {
                    network,
                    parameters: Box::new(parameters),
                    tx_hash: Some(pending.tx_hash),
                    cause,
                });
            }
            Ok(Err(FactoryError::Transport(cause) | FactoryError::BroadcastUnknown(cause))) => {
                error!(
                    "Lost track of transaction {} while waiting for it: {cause}",
                    pending.tx_hash
                );
                return Err(Error::ConfirmationUnknown {
                    network,
                    parameters: Box::new(parameters),
                    tx_hash: Some(pending.tx_hash),
                    cause,
                });
            }
        };

        info!(
            "Distributor deployed to {network} at {} in transaction {}",
            confirmed.contract_address, confirmed.tx_hash
        );

        Ok(DeploymentResult {
            contract_address: confirmed.contract_address,
            network,
            parameters,
            confirmation: Confirmation {
                tx_hash: confirmed.tx_hash,
                block_number: confirmed.block_number,
                observed_at: Utc::now(),
            },
        })
    }
}

/// Reports a broadcast transaction that nobody is waiting for any more.
///
/// Armed between submission and the end of the confirmation wait. If the deploy future is dropped
/// in that window the transaction hash is logged so it can be checked by hand.
struct InFlight {
    network: NetworkId,
    tx_hash: TxHash,
    armed: bool,
}

impl InFlight {
    fn new(network: NetworkId, tx_hash: TxHash) -> Self {
        Self {
            network,
            tx_hash,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            error!(
                "Deployment to {} was abandoned before confirmation. Transaction {} may still be pending network inclusion",
                self.network, self.tx_hash
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::U256;
    use crate::factory::{ConfirmedDeployment, MockContractFactory, PendingDeployment};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn params() -> DeploymentParameters {
        DeploymentParameters {
            network: NetworkId::Base,
            chain_id: 8453,
            reward_token: Address::repeat_byte(0x11),
            treasury: Address::repeat_byte(0x22),
            wrapped_native_token: Address::repeat_byte(0x33),
            emission_rate_per_second: U256::from(600),
            start_timestamp: 0,
            booster: Address::repeat_byte(0x44),
        }
    }

    fn tx_hash() -> TxHash {
        TxHash::repeat_byte(0xab)
    }

    #[tokio::test]
    async fn confirmed_deployment_reports_mined_address_and_input_parameters() {
        let mined = Address::repeat_byte(0xcd);
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .withf(|p| *p == params())
            .times(1)
            .returning(|_| Ok(PendingDeployment { tx_hash: tx_hash() }));
        factory
            .expect_await_confirmation()
            .withf(|pending, timeout| {
                pending.tx_hash == tx_hash() && *timeout == DEFAULT_CONFIRMATION_TIMEOUT
            })
            .times(1)
            .returning(move |pending, _| {
                Ok(ConfirmedDeployment {
                    contract_address: mined,
                    tx_hash: pending.tx_hash,
                    block_number: Some(42),
                })
            });

        let result = DeploymentExecutor::default()
            .deploy(params(), &factory)
            .await
            .unwrap();

        assert_eq!(result.contract_address, mined);
        assert_eq!(result.parameters, params());
        assert_eq!(result.network, NetworkId::Base);
        assert_eq!(result.confirmation.tx_hash, tx_hash());
        assert_eq!(result.confirmation.block_number, Some(42));
    }

    #[tokio::test]
    async fn rejection_before_inclusion_is_a_submission_error() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .times(1)
            .returning(|_| Err(FactoryError::Rejected("insufficient funds".to_string())));
        factory.expect_await_confirmation().never();

        let err = DeploymentExecutor::default()
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        match err {
            Error::DeploymentSubmission {
                network,
                parameters,
                tx_hash,
                cause,
            } => {
                assert_eq!(network, NetworkId::Base);
                assert_eq!(*parameters, params());
                assert_eq!(tx_hash, None);
                assert!(cause.contains("insufficient funds"));
            }
            other => panic!("expected DeploymentSubmission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reverted_constructor_is_a_submission_error_with_tx_hash() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .returning(|_| Ok(PendingDeployment { tx_hash: tx_hash() }));
        factory
            .expect_await_confirmation()
            .returning(|_, _| Err(FactoryError::Rejected("reverted".to_string())));

        let err = DeploymentExecutor::default()
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DeploymentSubmission { .. }));
        assert_eq!(err.tx_hash(), Some(tx_hash()));
        assert!(!err.outcome_unknown());
    }

    #[tokio::test]
    async fn factory_timeout_is_a_confirmation_timeout() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .returning(|_| Ok(PendingDeployment { tx_hash: tx_hash() }));
        factory
            .expect_await_confirmation()
            .returning(|_, _| Err(FactoryError::Timeout));

        let config = ExecutorConfig {
            confirmation_timeout: Duration::from_secs(7),
        };
        let err = DeploymentExecutor::new(config)
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        match &err {
            Error::ConfirmationTimeout {
                tx_hash: hash,
                timeout,
                ..
            } => {
                assert_eq!(*hash, tx_hash());
                assert_eq!(*timeout, Duration::from_secs(7));
            }
            other => panic!("expected ConfirmationTimeout, got {other:?}"),
        }
        assert!(err.outcome_unknown());
        assert!(!err.is_resolution());
    }

    #[tokio::test]
    async fn transport_failure_after_broadcast_is_an_unknown_outcome() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .returning(|_| Ok(PendingDeployment { tx_hash: tx_hash() }));
        factory
            .expect_await_confirmation()
            .returning(|_, _| Err(FactoryError::Transport("connection reset".to_string())));

        let err = DeploymentExecutor::default()
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConfirmationUnknown { .. }));
        assert!(err.outcome_unknown());
    }

    /// Accepts the transaction and then never reports back.
    struct StalledFactory {
        submitted: AtomicBool,
    }

    #[async_trait]
    impl ContractFactory for StalledFactory {
        async fn submit(
            &self,
            _params: &DeploymentParameters,
        ) -> std::result::Result<PendingDeployment, FactoryError> {
            self.submitted.store(true, Ordering::SeqCst);
            Ok(PendingDeployment { tx_hash: tx_hash() })
        }

        async fn await_confirmation(
            &self,
            _pending: &PendingDeployment,
            _timeout: Duration,
        ) -> std::result::Result<ConfirmedDeployment, FactoryError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn executor_bounds_a_factory_that_never_returns() {
        let factory = StalledFactory {
            submitted: AtomicBool::new(false),
        };
        let config = ExecutorConfig {
            confirmation_timeout: Duration::from_secs(30),
        };

        let err = DeploymentExecutor::new(config)
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConfirmationTimeout { .. }));
        assert!(factory.submitted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failure_part_way_through_sending_is_an_unknown_outcome() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .times(1)
            .returning(|_| Err(FactoryError::BroadcastUnknown("request timed out".to_string())));
        factory.expect_await_confirmation().never();

        let err = DeploymentExecutor::default()
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        match &err {
            Error::ConfirmationUnknown { tx_hash, cause, .. } => {
                assert_eq!(*tx_hash, None);
                assert!(cause.contains("request timed out"));
            }
            other => panic!("expected ConfirmationUnknown, got {other:?}"),
        }
        assert!(err.outcome_unknown());
    }

    #[tokio::test]
    async fn transport_failure_before_sending_is_a_submission_error() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .returning(|_| Err(FactoryError::Transport("connection refused".to_string())));
        factory.expect_await_confirmation().never();

        let err = DeploymentExecutor::default()
            .deploy(params(), &factory)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DeploymentSubmission { tx_hash: None, .. }));
        assert!(!err.outcome_unknown());
    }

    #[tokio::test]
    async fn longest_possible_timeout_does_not_overflow() {
        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .returning(|_| Ok(PendingDeployment { tx_hash: tx_hash() }));
        factory
            .expect_await_confirmation()
            .withf(|_, timeout| *timeout == Duration::MAX)
            .returning(|pending, _| {
                Ok(ConfirmedDeployment {
                    contract_address: Address::repeat_byte(0xcd),
                    tx_hash: pending.tx_hash,
                    block_number: Some(1),
                })
            });

        let config = ExecutorConfig {
            confirmation_timeout: Duration::MAX,
        };
        let result = DeploymentExecutor::new(config)
            .deploy(params(), &factory)
            .await
            .unwrap();

        assert_eq!(result.contract_address, Address::repeat_byte(0xcd));
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn abandoning_the_wait_reports_the_pending_transaction() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let factory = Arc::new(StalledFactory {
            submitted: AtomicBool::new(false),
        });
        let task_factory = Arc::clone(&factory);
        let handle = tokio::spawn(async move {
            DeploymentExecutor::default()
                .deploy(params(), task_factory.as_ref())
                .await
        });

        while !factory.submitted.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        assert!(!logs.contents().contains("abandoned"));

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        let output = logs.contents();
        assert!(
            output.contains("abandoned before confirmation"),
            "missing abandonment report in:\n{output}"
        );
        assert!(output.contains(&tx_hash().to_string()));
    }

    #[tokio::test]
    async fn completed_wait_reports_nothing_abandoned() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut factory = MockContractFactory::new();
        factory
            .expect_submit()
            .returning(|_| Ok(PendingDeployment { tx_hash: tx_hash() }));
        factory
            .expect_await_confirmation()
            .returning(|_, _| Err(FactoryError::Timeout));

        let _ = DeploymentExecutor::default().deploy(params(), &factory).await;

        assert!(!logs.contents().contains("abandoned"));
    }
}
